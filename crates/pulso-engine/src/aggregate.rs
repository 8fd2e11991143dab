//! Single-pass aggregation over normalized responses.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::tokenize::tokenize;
use crate::types::{Bucket, EngineOptions, RatingClass, Response};

/// Per-sector accumulator inside one weekday.
#[derive(Debug, Clone, Default)]
pub struct SectorDaySlot {
    pub counts: Bucket,
    pub critical_tags: BTreeMap<String, u64>,
    pub highlight_tags: BTreeMap<String, u64>,
    /// Raw comments, kept for the narrative summarizer.
    pub comments: Vec<String>,
    /// Order of first observation, for deterministic tie-breaks.
    pub first_seen: usize,
}

/// Hourly very-positive tracking inside one weekday.
#[derive(Debug, Clone, Default)]
pub struct HourPeakSlot {
    pub very_positive: u64,
    pub by_sector: BTreeMap<String, u64>,
}

/// Everything accumulated for one weekday.
#[derive(Debug, Clone, Default)]
pub struct DaySlot {
    pub counts: Bucket,
    pub hours: [HourPeakSlot; 24],
    pub sectors: BTreeMap<String, SectorDaySlot>,
}

/// Working state of one aggregation pass.
///
/// One instance per analyzed worksheet, owned by the caller for the length
/// of the request. Map-shaped state is `BTree`-backed so serialization
/// order never depends on hashing.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub general: Bucket,
    /// Indexed 0 = Sunday through 6 = Saturday; unobserved days stay
    /// `None`.
    pub days: [Option<DaySlot>; 7],
    pub hours: [Bucket; 24],
    pub sectors: BTreeMap<String, Bucket>,
    pub positive_keywords: BTreeMap<String, u64>,
    pub negative_keywords: BTreeMap<String, u64>,
    pub dates: BTreeSet<NaiveDate>,
}

impl Aggregation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one response into every dimension it touches.
    pub fn observe(&mut self, response: &Response, opts: &EngineOptions) {
        let rating = response.rating;

        self.general.record(rating);
        self.hours[response.hour()].record(rating);
        self.sectors
            .entry(response.sector_key.clone())
            .or_default()
            .record(rating);
        self.dates.insert(response.date());

        let day = self.days[response.weekday_index()].get_or_insert_with(DaySlot::default);
        day.counts.record(rating);

        if rating == RatingClass::VeryPositive {
            let hour = &mut day.hours[response.hour()];
            hour.very_positive += 1;
            *hour
                .by_sector
                .entry(response.sector_key.clone())
                .or_insert(0) += 1;
        }

        let sector_ordinal = day.sectors.len();
        let slot = day
            .sectors
            .entry(response.sector_key.clone())
            .or_insert_with(|| SectorDaySlot {
                first_seen: sector_ordinal,
                ..SectorDaySlot::default()
            });
        slot.counts.record(rating);

        if let Some(tag) = &response.critical_tag {
            if !is_catch_all(tag) {
                *slot.critical_tags.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        if let Some(tag) = &response.highlight_tag {
            if !is_catch_all(tag) {
                *slot.highlight_tags.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        if let Some(comment) = &response.comment {
            slot.comments.push(comment.clone());
            if rating.is_positive() {
                for token in tokenize(comment, opts.min_token_len) {
                    *self.positive_keywords.entry(token).or_insert(0) += 1;
                }
            } else if rating.is_negative() {
                for token in tokenize(comment, opts.min_token_len) {
                    *self.negative_keywords.entry(token).or_insert(0) += 1;
                }
            }
        }
    }
}

/// Aggregate a batch in one forward pass.
#[must_use]
pub fn aggregate(responses: &[Response], opts: &EngineOptions) -> Aggregation {
    let mut state = Aggregation::new();
    for response in responses {
        state.observe(response, opts);
    }
    state
}

/// The export's catch-all tag. Counting it would drown every real tag in
/// the top lists.
fn is_catch_all(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("otros")
}
