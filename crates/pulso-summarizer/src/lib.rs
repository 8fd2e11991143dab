//! Optional narrative-summary enrichment for survey reports.
//!
//! The engine leaves fixed fallback text in each weekday's
//! `narrativeSummary` and hands back the pending jobs; this crate runs those
//! jobs against a hosted generative-text API and patches the report in
//! place. Summaries are best-effort: any failure keeps the fallback text.

pub mod client;
pub mod enrich;
pub mod error;

pub use client::{SummaryClient, SummaryOptions};
pub use enrich::apply_summaries;
pub use error::SummarizerError;
