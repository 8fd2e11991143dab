//! Survey satisfaction analytics engine.
//!
//! Takes a decoded worksheet of per-response survey rows and produces the
//! aggregate report the frontend renders: rating counts and satisfaction
//! indexes overall and by weekday, hour and sector, keyword frequencies
//! for the word clouds, and per-weekday insights (peak positive hour, most
//! critical sector, narrative summary hooks).
//!
//! The crate is synchronous and network-free. Workbook decoding lives in
//! `pulso-ingest`; the optional narrative summarizer in `pulso-summarizer`.

pub mod aggregate;
pub mod error;
pub mod insight;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod score;
pub mod tokenize;
pub mod types;

pub use error::{EngineError, SkipReason};
pub use insight::{
    CriticalSector, DayInsights, SummaryJob, NARRATIVE_NO_DATA, NARRATIVE_UNAVAILABLE,
};
pub use pipeline::{analyze_sheet, Analysis};
pub use report::{
    DayReport, KeywordFrequencies, SurveyReport, WeekdayReports, WEEKDAY_NAMES,
};
pub use score::satisfaction_index;
pub use tokenize::tokenize;
pub use types::{Bucket, CellValue, EngineOptions, RatingClass, Response, SheetData};
