use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

/// A decoded spreadsheet cell, stripped of format-specific detail.
///
/// The ingest layer produces these; the normalizer never sees the workbook
/// format itself.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// The cell rendered as trimmed text, if it has any.
    ///
    /// Real exports put numbers in text columns; those are rendered rather
    /// than dropped.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::DateTime(_) => false,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// One worksheet: a header row plus data rows, in sheet order.
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// The categorical rating attached to a response.
///
/// Labels are matched exactly after trimming; anything unrecognized is
/// `Unknown` and counts toward totals only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingClass {
    VeryPositive,
    Positive,
    Negative,
    VeryNegative,
    Unknown,
}

impl RatingClass {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Muy Positiva" => RatingClass::VeryPositive,
            "Positiva" => RatingClass::Positive,
            "Negativa" => RatingClass::Negative,
            "Muy Negativa" => RatingClass::VeryNegative,
            _ => RatingClass::Unknown,
        }
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        matches!(self, RatingClass::VeryPositive | RatingClass::Positive)
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        matches!(self, RatingClass::Negative | RatingClass::VeryNegative)
    }
}

/// One normalized survey response, ready for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Naive wall-clock timestamp, exactly as written in the sheet. Never
    /// routed through a local timezone, so weekday and hour cannot drift.
    pub timestamp: NaiveDateTime,
    /// Sector and location joined; the one present stands alone when the
    /// other is empty.
    pub sector_key: String,
    pub rating: RatingClass,
    pub comment: Option<String>,
    pub critical_tag: Option<String>,
    pub highlight_tag: Option<String>,
}

impl Response {
    /// Weekday index, 0 = Sunday through 6 = Saturday.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn weekday_index(&self) -> usize {
        self.timestamp.date().weekday().num_days_from_sunday() as usize
    }

    /// Hour of day, 0..=23.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn hour(&self) -> usize {
        self.timestamp.time().hour() as usize
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Count-and-score cell used by every aggregation dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub very_positive: u64,
    pub positive: u64,
    pub negative: u64,
    pub very_negative: u64,
    pub total: u64,
    /// Filled by the finalization pass; zero while counting.
    pub satisfaction: i32,
}

impl Bucket {
    /// Count one response. `total` always moves; `Unknown` moves nothing
    /// else.
    pub fn record(&mut self, rating: RatingClass) {
        self.total += 1;
        match rating {
            RatingClass::VeryPositive => self.very_positive += 1,
            RatingClass::Positive => self.positive += 1,
            RatingClass::Negative => self.negative += 1,
            RatingClass::VeryNegative => self.very_negative += 1,
            RatingClass::Unknown => {}
        }
    }
}

/// Tunables for one analysis run.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Minimum keyword token length, in chars.
    pub min_token_len: usize,
    /// Entries named by each top-N insight list.
    pub top_n: usize,
    /// Responses a sector needs within a weekday before it can be called
    /// the most critical one.
    pub min_sector_sample: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            min_token_len: 3,
            top_n: 3,
            min_sector_sample: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> Response {
        Response {
            timestamp: NaiveDate::from_ymd_opt(y, m, d)
                .expect("valid date")
                .and_hms_opt(h, 0, 0)
                .expect("valid time"),
            sector_key: "Entrance - Gate1".to_string(),
            rating: RatingClass::Positive,
            comment: None,
            critical_tag: None,
            highlight_tag: None,
        }
    }

    #[test]
    fn rating_labels_match_exactly() {
        assert_eq!(RatingClass::from_label("Muy Positiva"), RatingClass::VeryPositive);
        assert_eq!(RatingClass::from_label("Positiva"), RatingClass::Positive);
        assert_eq!(RatingClass::from_label("Negativa"), RatingClass::Negative);
        assert_eq!(RatingClass::from_label("Muy Negativa"), RatingClass::VeryNegative);
    }

    #[test]
    fn rating_labels_trim_whitespace() {
        assert_eq!(RatingClass::from_label("  Positiva  "), RatingClass::Positive);
    }

    #[test]
    fn unrecognized_rating_is_unknown() {
        assert_eq!(RatingClass::from_label("Regular"), RatingClass::Unknown);
        assert_eq!(RatingClass::from_label(""), RatingClass::Unknown);
        assert_eq!(RatingClass::from_label("positiva"), RatingClass::Unknown);
    }

    #[test]
    fn weekday_index_is_sunday_based() {
        // 2025-07-06 was a Sunday, 2025-07-05 a Saturday.
        assert_eq!(at(2025, 7, 6, 12).weekday_index(), 0);
        assert_eq!(at(2025, 7, 5, 12).weekday_index(), 6);
    }

    #[test]
    fn hour_comes_from_the_time_component() {
        assert_eq!(at(2025, 7, 5, 0).hour(), 0);
        assert_eq!(at(2025, 7, 5, 23).hour(), 23);
    }

    #[test]
    fn bucket_records_each_class() {
        let mut bucket = Bucket::default();
        bucket.record(RatingClass::VeryPositive);
        bucket.record(RatingClass::Positive);
        bucket.record(RatingClass::Negative);
        bucket.record(RatingClass::VeryNegative);
        assert_eq!(bucket.very_positive, 1);
        assert_eq!(bucket.positive, 1);
        assert_eq!(bucket.negative, 1);
        assert_eq!(bucket.very_negative, 1);
        assert_eq!(bucket.total, 4);
    }

    #[test]
    fn unknown_rating_only_moves_total() {
        let mut bucket = Bucket::default();
        bucket.record(RatingClass::Unknown);
        assert_eq!(bucket.total, 1);
        assert_eq!(
            bucket.very_positive + bucket.positive + bucket.negative + bucket.very_negative,
            0
        );
    }

    #[test]
    fn cell_text_trims_and_drops_empty() {
        assert_eq!(
            CellValue::Text("  hola  ".to_string()).as_text().as_deref(),
            Some("hola")
        );
        assert_eq!(CellValue::Text("   ".to_string()).as_text(), None);
        assert_eq!(CellValue::Empty.as_text(), None);
    }

    #[test]
    fn cell_text_renders_numbers() {
        assert_eq!(CellValue::Number(3.0).as_text().as_deref(), Some("3"));
        assert_eq!(CellValue::Number(2.5).as_text().as_deref(), Some("2.5"));
    }
}
