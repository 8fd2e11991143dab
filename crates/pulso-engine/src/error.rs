use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("no valid responses found in {scanned} data rows")]
    NoValidRows { scanned: usize },
}

/// Why a single row was left out of the aggregation.
///
/// Skips are logged per row and never abort the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("date cell is empty")]
    MissingDate,

    #[error("date cell could not be interpreted")]
    InvalidDate,

    #[error("time cell could not be interpreted")]
    InvalidTime,

    #[error("sector and location cells are both empty")]
    MissingSector,
}
