//! Applies generated summaries onto a finished report.

use pulso_engine::{SummaryJob, SurveyReport};

use crate::client::SummaryClient;

/// Replaces per-weekday fallback text with generated narrative summaries.
///
/// One call per job, sequential. A failed call logs a warning and leaves
/// that weekday's fallback text in place; this step never invalidates the
/// report.
pub async fn apply_summaries(
    report: &mut SurveyReport,
    jobs: &[SummaryJob],
    client: &SummaryClient,
) {
    for job in jobs {
        if job.comments.is_empty() {
            continue;
        }

        match client.summarize(&job.sector, &job.comments).await {
            Ok(summary) => {
                tracing::debug!(
                    weekday = job.weekday,
                    sector = %job.sector,
                    "narrative summary generated"
                );
                if let Some(day) = report.by_weekday.get_mut(job.weekday) {
                    day.analysis.narrative_summary = summary;
                }
            }
            Err(e) => {
                tracing::warn!(
                    weekday = job.weekday,
                    sector = %job.sector,
                    error = %e,
                    "narrative summary failed; keeping fallback text"
                );
            }
        }
    }
}
