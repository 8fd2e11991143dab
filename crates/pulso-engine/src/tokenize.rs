//! Keyword tokenizer for the comment word clouds.

/// Spanish function words plus survey boilerplate, never counted as
/// keywords.
pub const STOPWORDS: &[&str] = &[
    "a", "al", "buen", "como", "con", "contra", "cuando", "de", "del", "desde", "dia", "donde",
    "durante", "e", "el", "en", "ese", "eso", "este", "fue", "gracias", "ha", "hasta", "hay",
    "hola", "la", "las", "le", "lo", "los", "me", "mi", "muy", "más", "ni", "no", "nos", "o",
    "para", "pero", "por", "que", "quien", "qué", "se", "si", "sin", "sobre", "son", "su", "sus",
    "también", "todo", "un", "una", "uno", "y", "ya",
];

/// Split free text into lowercase keyword tokens.
///
/// Tokens are maximal alphanumeric runs (accented letters included), at
/// least `min_len` chars long and not in [`STOPWORDS`]. Input order is
/// preserved. Pure and total: empty input yields an empty vec.
#[must_use]
pub fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .filter(|word| word.chars().count() >= min_len)
        .filter(|word| !STOPWORDS.contains(word))
        .map(ToString::to_string)
        .collect()
}
