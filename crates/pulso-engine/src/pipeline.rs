//! End-to-end worksheet analysis.

use crate::aggregate::aggregate;
use crate::error::EngineError;
use crate::insight::SummaryJob;
use crate::normalize::{normalize_row, ColumnIndex};
use crate::report::{build_report, SurveyReport};
use crate::types::{EngineOptions, SheetData};

/// A finished analysis plus its row bookkeeping.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub report: SurveyReport,
    /// Narrative-summary requests the caller may run against the external
    /// summarizer. The report already carries fallback text for each.
    pub pending_summaries: Vec<SummaryJob>,
    pub rows_scanned: usize,
    pub rows_skipped: usize,
}

/// Analyze one decoded worksheet.
///
/// Row-level problems are logged at debug and skipped; the batch only
/// fails when the mandatory columns are missing or when no row at all
/// survives normalization.
///
/// # Errors
///
/// [`EngineError::MissingColumns`] before any row is touched,
/// [`EngineError::NoValidRows`] after every row was rejected.
pub fn analyze_sheet(sheet: &SheetData, opts: &EngineOptions) -> Result<Analysis, EngineError> {
    // 1. Resolve the column layout once, up front.
    let columns = ColumnIndex::from_header(&sheet.header)?;

    // 2. Normalize row by row; rejects are logged, never fatal.
    let mut responses = Vec::with_capacity(sheet.rows.len());
    for (i, row) in sheet.rows.iter().enumerate() {
        match normalize_row(row, &columns) {
            Ok(response) => responses.push(response),
            Err(reason) => {
                // Sheet rows are 1-based and the header occupies row 1.
                tracing::debug!(row = i + 2, reason = %reason, "skipping row");
            }
        }
    }

    let rows_scanned = sheet.rows.len();
    let rows_skipped = rows_scanned - responses.len();
    if responses.is_empty() {
        return Err(EngineError::NoValidRows {
            scanned: rows_scanned,
        });
    }

    // 3. One aggregation pass, then finalization and insight extraction.
    let state = aggregate(&responses, opts);
    let (report, pending_summaries) = build_report(state, opts);

    tracing::debug!(
        rows = rows_scanned,
        kept = rows_scanned - rows_skipped,
        skipped = rows_skipped,
        sectors = report.by_sector.len(),
        "worksheet analyzed"
    );

    Ok(Analysis {
        report,
        pending_summaries,
        rows_scanned,
        rows_skipped,
    })
}
