//! The serializable survey report.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::aggregate::Aggregation;
use crate::insight::{day_insights, DayInsights, SummaryJob};
use crate::score::satisfaction_index;
use crate::types::{Bucket, EngineOptions};

/// Spanish weekday names in calendar order, Sunday first. Indexes match
/// [`crate::types::Response::weekday_index`].
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Domingo",
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
];

/// One weekday's serialized entry: its counts plus derived findings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayReport {
    #[serde(flatten)]
    pub counts: Bucket,
    pub analysis: DayInsights,
}

/// Weekday entries keyed by Spanish day name.
///
/// A plain map would serialize its keys alphabetically; the report
/// renderer expects calendar order Sunday through Saturday, so this wraps
/// the week as an array and writes the JSON map by hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekdayReports {
    days: [Option<DayReport>; 7],
}

impl WeekdayReports {
    #[must_use]
    pub fn get(&self, weekday: usize) -> Option<&DayReport> {
        self.days.get(weekday).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, weekday: usize) -> Option<&mut DayReport> {
        self.days.get_mut(weekday).and_then(Option::as_mut)
    }

    /// Indexes outside 0..=6 are ignored.
    pub fn insert(&mut self, weekday: usize, report: DayReport) {
        if let Some(slot) = self.days.get_mut(weekday) {
            *slot = Some(report);
        }
    }

    /// Observed days with their names, Sunday first.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DayReport)> {
        WEEKDAY_NAMES
            .iter()
            .zip(self.days.iter())
            .filter_map(|(name, day)| day.as_ref().map(|d| (*name, d)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Option::is_none)
    }
}

impl Serialize for WeekdayReports {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, day) in self.iter() {
            map.serialize_entry(name, day)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct KeywordFrequencies {
    pub positive: BTreeMap<String, u64>,
    pub negative: BTreeMap<String, u64>,
}

/// The full analysis result for one uploaded workbook.
///
/// Serialization is deterministic: struct fields keep declaration order,
/// map keys are `BTree`-sorted, and weekdays follow the calendar. The same
/// rows always produce byte-identical JSON.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurveyReport {
    /// Human-readable range of the observed dates,
    /// e.g. `Del 05/07/2025 al 06/07/2025`.
    pub period: String,
    /// Distinct observed dates, `dd/mm/yyyy`, ascending.
    pub dates: Vec<String>,
    pub general: Bucket,
    pub by_weekday: WeekdayReports,
    pub by_hour: [Bucket; 24],
    pub by_sector: BTreeMap<String, Bucket>,
    pub keyword_frequencies: KeywordFrequencies,
}

/// Finalize an aggregation into the serializable report.
///
/// Satisfaction is derived here for every bucket, in one pass, and nowhere
/// else. Returns the pending narrative-summary jobs alongside the report.
#[must_use]
pub fn build_report(mut agg: Aggregation, opts: &EngineOptions) -> (SurveyReport, Vec<SummaryJob>) {
    agg.general.satisfaction = satisfaction_index(&agg.general);
    for bucket in &mut agg.hours {
        bucket.satisfaction = satisfaction_index(bucket);
    }
    for bucket in agg.sectors.values_mut() {
        bucket.satisfaction = satisfaction_index(bucket);
    }

    let mut by_weekday = WeekdayReports::default();
    let mut jobs = Vec::new();
    for (weekday, slot) in agg.days.iter().enumerate() {
        let Some(day) = slot else { continue };
        let mut counts = day.counts;
        counts.satisfaction = satisfaction_index(&counts);
        let (analysis, job) = day_insights(weekday, day, opts);
        if let Some(job) = job {
            jobs.push(job);
        }
        by_weekday.insert(weekday, DayReport { counts, analysis });
    }

    let period = period_label(&agg.dates);
    let dates = agg
        .dates
        .iter()
        .map(|d| d.format("%d/%m/%Y").to_string())
        .collect();

    (
        SurveyReport {
            period,
            dates,
            general: agg.general,
            by_weekday,
            by_hour: agg.hours,
            by_sector: agg.sectors,
            keyword_frequencies: KeywordFrequencies {
                positive: agg.positive_keywords,
                negative: agg.negative_keywords,
            },
        },
        jobs,
    )
}

/// `Del {first} al {last}` over the observed dates.
fn period_label(dates: &BTreeSet<NaiveDate>) -> String {
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => format!(
            "Del {} al {}",
            first.format("%d/%m/%Y"),
            last.format("%d/%m/%Y")
        ),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::aggregate::aggregate;
    use crate::types::{RatingClass, Response};

    use super::*;

    fn response(day: u32, hour: u32, sector: &str, rating: RatingClass) -> Response {
        Response {
            timestamp: NaiveDate::from_ymd_opt(2025, 7, day)
                .expect("valid date")
                .and_hms_opt(hour, 0, 0)
                .expect("valid time"),
            sector_key: sector.to_string(),
            rating,
            comment: None,
            critical_tag: None,
            highlight_tag: None,
        }
    }

    fn saturday_batch() -> Vec<Response> {
        vec![
            response(5, 10, "Entrance - Gate1", RatingClass::VeryPositive),
            response(5, 10, "Entrance - Gate1", RatingClass::Negative),
            response(5, 14, "Entrance - Gate1", RatingClass::VeryPositive),
        ]
    }

    fn build(batch: &[Response]) -> SurveyReport {
        let agg = aggregate(batch, &EngineOptions::default());
        build_report(agg, &EngineOptions::default()).0
    }

    #[test]
    fn every_bucket_gets_a_satisfaction_index() {
        let report = build(&saturday_batch());
        assert_eq!(report.general.satisfaction, 33);
        assert_eq!(report.by_hour[10].satisfaction, 0);
        assert_eq!(report.by_hour[14].satisfaction, 100);
        assert_eq!(report.by_sector["Entrance - Gate1"].satisfaction, 33);
        let saturday = report.by_weekday.get(6).expect("Saturday present");
        assert_eq!(saturday.counts.satisfaction, 33);
    }

    #[test]
    fn empty_hours_stay_in_the_report_with_zero_score() {
        let report = build(&saturday_batch());
        assert_eq!(report.by_hour.len(), 24);
        assert_eq!(report.by_hour[3].total, 0);
        assert_eq!(report.by_hour[3].satisfaction, 0);
    }

    #[test]
    fn period_and_dates_cover_the_observed_range() {
        let mut batch = saturday_batch();
        batch.push(response(6, 9, "Food Court", RatingClass::Positive));
        let report = build(&batch);
        assert_eq!(report.period, "Del 05/07/2025 al 06/07/2025");
        assert_eq!(report.dates, vec!["05/07/2025", "06/07/2025"]);
    }

    #[test]
    fn weekdays_serialize_in_calendar_order_with_spanish_names() {
        let mut batch = saturday_batch();
        batch.push(response(6, 9, "Food Court", RatingClass::Positive));
        let report = build(&batch);
        let json = serde_json::to_string(&report).expect("serializes");
        let sunday = json.find("\"Domingo\"").expect("Sunday present");
        let saturday = json.find("\"Sábado\"").expect("Saturday present");
        assert!(
            sunday < saturday,
            "Sunday must precede Saturday regardless of lexical order"
        );
    }

    #[test]
    fn day_entries_flatten_counts_beside_the_analysis() {
        let report = build(&saturday_batch());
        let json = serde_json::to_value(&report).expect("serializes");
        let saturday = &json["byWeekday"]["Sábado"];
        assert_eq!(saturday["veryPositive"], 2);
        assert_eq!(saturday["total"], 3);
        assert_eq!(saturday["satisfaction"], 33);
        assert_eq!(saturday["analysis"]["peakPositiveHour"], 10);
    }

    #[test]
    fn unobserved_days_are_omitted_entirely() {
        let report = build(&saturday_batch());
        let json = serde_json::to_value(&report).expect("serializes");
        let by_weekday = json["byWeekday"].as_object().expect("is a map");
        assert_eq!(by_weekday.len(), 1);
        assert!(by_weekday.contains_key("Sábado"));
    }

    #[test]
    fn absent_critical_sector_serializes_as_null() {
        // Two responses only: below the sample floor.
        let report = build(&saturday_batch()[..2].to_vec());
        let json = serde_json::to_value(&report).expect("serializes");
        assert!(json["byWeekday"]["Sábado"]["analysis"]["criticalSector"].is_null());
    }

    #[test]
    fn keyword_maps_serialize_in_camel_case_envelope() {
        let report = build(&saturday_batch());
        let json = serde_json::to_value(&report).expect("serializes");
        assert!(json["keywordFrequencies"]["positive"].is_object());
        assert!(json["keywordFrequencies"]["negative"].is_object());
    }

    #[test]
    fn reaggregation_is_byte_identical() {
        let batch = saturday_batch();
        let first = serde_json::to_string(&build(&batch)).expect("serializes");
        let second = serde_json::to_string(&build(&batch)).expect("serializes");
        assert_eq!(first, second);
    }
}
