//! Per-weekday insight extraction.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::{DaySlot, SectorDaySlot};
use crate::score::satisfaction_index;
use crate::types::EngineOptions;

/// Narrative shown when no qualifying critical sector (or none of its
/// comments) exists.
pub const NARRATIVE_NO_DATA: &str = "Sin comentarios suficientes para generar un resumen.";

/// Narrative left in place until (unless) the external summarizer replaces
/// it.
pub const NARRATIVE_UNAVAILABLE: &str = "Resumen automático no disponible.";

/// Stands in when the critical sector carries no tag counts at all.
pub const GENERIC_TAGS_LABEL: &str = "Comentarios generales";

/// One weekday's derived findings, serialized inside its day entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayInsights {
    /// Hour (0-23) with the most very-positive responses, or -1 when the
    /// day has none.
    pub peak_positive_hour: i32,
    pub peak_hour_count: u64,
    /// Comma-joined sector keys; empty when there is no peak.
    pub peak_hour_sectors: String,
    pub critical_sector: Option<CriticalSector>,
    pub narrative_summary: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CriticalSector {
    pub name: String,
    pub satisfaction: i32,
    pub top_critical_tags: String,
}

/// A narrative-summary request the engine hands back to its caller.
///
/// The engine never talks to the network; whoever owns the report decides
/// whether to run these against the summarizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryJob {
    /// Weekday index, 0 = Sunday.
    pub weekday: usize,
    pub sector: String,
    pub comments: Vec<String>,
}

/// Distil one weekday's accumulators into its reportable insights.
///
/// Also returns, when a critical sector with retained comments exists, the
/// summary job the caller may run against the external summarizer. The
/// insights already carry fallback narrative text either way.
pub(crate) fn day_insights(
    weekday: usize,
    day: &DaySlot,
    opts: &EngineOptions,
) -> (DayInsights, Option<SummaryJob>) {
    let (peak_positive_hour, peak_hour_count, peak_hour_sectors) = peak_positive(day, opts);

    let (critical_sector, job) = match most_critical_sector(day, opts) {
        None => (None, None),
        Some((name, slot)) => {
            let critical = CriticalSector {
                name: name.clone(),
                satisfaction: satisfaction_index(&slot.counts),
                top_critical_tags: top_tags(&slot.critical_tags, opts.top_n),
            };
            let job = if slot.comments.is_empty() {
                None
            } else {
                Some(SummaryJob {
                    weekday,
                    sector: name,
                    comments: slot.comments.clone(),
                })
            };
            (Some(critical), job)
        }
    };

    let narrative_summary = if job.is_some() {
        NARRATIVE_UNAVAILABLE.to_string()
    } else {
        NARRATIVE_NO_DATA.to_string()
    };

    (
        DayInsights {
            peak_positive_hour,
            peak_hour_count,
            peak_hour_sectors,
            critical_sector,
            narrative_summary,
        },
        job,
    )
}

/// Hour with the most very-positive responses; ties go to the earliest
/// hour. A day without any very-positive response reports the -1 sentinel,
/// never a false midnight peak.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn peak_positive(day: &DaySlot, opts: &EngineOptions) -> (i32, u64, String) {
    let mut best: Option<(usize, u64)> = None;
    for (hour, slot) in day.hours.iter().enumerate() {
        if slot.very_positive == 0 {
            continue;
        }
        if best.is_none_or(|(_, count)| slot.very_positive > count) {
            best = Some((hour, slot.very_positive));
        }
    }
    match best {
        None => (-1, 0, String::new()),
        Some((hour, count)) => {
            let sectors = top_entries(&day.hours[hour].by_sector, opts.top_n);
            (hour as i32, count, sectors)
        }
    }
}

/// Lowest-satisfaction sector among those with enough responses that day.
///
/// Sectors below the sample threshold are excluded entirely; two noisy
/// responses must not brand a sector critical. Ties resolve to the sector
/// observed first, so re-runs name the same one.
fn most_critical_sector<'a>(
    day: &'a DaySlot,
    opts: &EngineOptions,
) -> Option<(String, &'a SectorDaySlot)> {
    let mut best: Option<(i32, usize, &str, &SectorDaySlot)> = None;
    for (name, slot) in &day.sectors {
        if slot.counts.total < opts.min_sector_sample {
            continue;
        }
        let score = satisfaction_index(&slot.counts);
        let replace = match best {
            None => true,
            Some((best_score, best_seen, _, _)) => {
                score < best_score || (score == best_score && slot.first_seen < best_seen)
            }
        };
        if replace {
            best = Some((score, slot.first_seen, name, slot));
        }
    }
    best.map(|(_, _, name, slot)| (name.to_string(), slot))
}

/// Top-N entries by count descending, names ascending on ties,
/// comma-joined.
fn top_entries(counts: &BTreeMap<String, u64>, n: usize) -> String {
    let mut entries: Vec<(&String, &u64)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .iter()
        .take(n)
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn top_tags(tags: &BTreeMap<String, u64>, n: usize) -> String {
    let joined = top_entries(tags, n);
    if joined.is_empty() {
        GENERIC_TAGS_LABEL.to_string()
    } else {
        joined
    }
}
