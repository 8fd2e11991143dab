//! Header resolution and row normalization.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{EngineError, SkipReason};
use crate::types::{CellValue, RatingClass, Response};

const DATE_ALIASES: &[&str] = &["fecha", "date"];
const TIME_ALIASES: &[&str] = &["hora", "time"];
const SECTOR_ALIASES: &[&str] = &["sector"];
const LOCATION_ALIASES: &[&str] = &["ubicacion", "location"];
const RATING_ALIASES: &[&str] = &["calificacion descripcion", "calificacion", "rating"];
const COMMENT_ALIASES: &[&str] = &["comentario", "comentarios", "comment"];
const CRITICAL_ALIASES: &[&str] = &["puntos criticos", "punto critico"];
const HIGHLIGHT_ALIASES: &[&str] = &["destacados", "destacado"];

/// Resolved column positions for one sheet.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    pub date: usize,
    pub time: Option<usize>,
    pub sector: Option<usize>,
    pub location: Option<usize>,
    pub rating: usize,
    pub comment: Option<usize>,
    pub critical_tag: Option<usize>,
    pub highlight_tag: Option<usize>,
}

impl ColumnIndex {
    /// Resolve column positions from header names.
    ///
    /// Lookup is case-insensitive, ignores accents, and treats underscores
    /// as spaces, so `Calificación_Descripción` and `calificacion
    /// descripcion` land in the same place. The leftmost header wins on
    /// duplicates.
    ///
    /// # Errors
    ///
    /// `EngineError::MissingColumns` when the date column, the rating
    /// column, or both sector and location are absent. Nothing row-level
    /// has happened yet, so this fails the whole batch.
    pub fn from_header(header: &[String]) -> Result<Self, EngineError> {
        let canon: Vec<String> = header.iter().map(|h| canonical_header(h)).collect();

        let find = |aliases: &[&str]| -> Option<usize> {
            canon.iter().position(|h| aliases.contains(&h.as_str()))
        };

        let date = find(DATE_ALIASES);
        let time = find(TIME_ALIASES);
        let sector = find(SECTOR_ALIASES);
        let location = find(LOCATION_ALIASES);
        let rating = find(RATING_ALIASES);
        let comment = find(COMMENT_ALIASES);
        let critical_tag = find(CRITICAL_ALIASES);
        let highlight_tag = find(HIGHLIGHT_ALIASES);

        let mut missing = Vec::new();
        if date.is_none() {
            missing.push("fecha");
        }
        if rating.is_none() {
            missing.push("calificacion descripcion");
        }
        if sector.is_none() && location.is_none() {
            missing.push("sector/ubicacion");
        }

        match (date, rating) {
            (Some(date), Some(rating)) if missing.is_empty() => Ok(Self {
                date,
                time,
                sector,
                location,
                rating,
                comment,
                critical_tag,
                highlight_tag,
            }),
            _ => Err(EngineError::MissingColumns(missing)),
        }
    }
}

/// Lowercase, strip diacritics, fold `_` to space, collapse whitespace.
fn canonical_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.to_lowercase().chars() {
        let c = match fold_accent(c) {
            '_' => ' ',
            other => other,
        };
        if c.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }
    out
}

fn fold_accent(c: char) -> char {
    match c {
        'á' => 'a',
        'é' => 'e',
        'í' => 'i',
        'ó' => 'o',
        'ú' | 'ü' => 'u',
        'ñ' => 'n',
        _ => c,
    }
}

/// Normalize one sheet row into a [`Response`].
///
/// # Errors
///
/// Returns the [`SkipReason`] when the row cannot be attributed to a
/// timestamp or a sector. Callers log the reason and move on; a skipped
/// row never fails the batch.
pub fn normalize_row(row: &[CellValue], columns: &ColumnIndex) -> Result<Response, SkipReason> {
    let timestamp = resolve_timestamp(row, columns)?;

    let sector = columns.sector.and_then(|i| cell_text(row, i));
    let location = columns.location.and_then(|i| cell_text(row, i));
    let sector_key = match (sector, location) {
        (Some(s), Some(l)) => format!("{s} - {l}"),
        (Some(s), None) => s,
        (None, Some(l)) => l,
        (None, None) => return Err(SkipReason::MissingSector),
    };

    let rating = cell_text(row, columns.rating)
        .map_or(RatingClass::Unknown, |label| RatingClass::from_label(&label));

    Ok(Response {
        timestamp,
        sector_key,
        rating,
        comment: columns.comment.and_then(|i| cell_text(row, i)),
        critical_tag: columns.critical_tag.and_then(|i| cell_text(row, i)),
        highlight_tag: columns.highlight_tag.and_then(|i| cell_text(row, i)),
    })
}

fn cell_text(row: &[CellValue], idx: usize) -> Option<String> {
    row.get(idx).and_then(CellValue::as_text)
}

/// Merge the date cell (and the time cell, when that column exists) into
/// one timestamp on the date's calendar day.
fn resolve_timestamp(row: &[CellValue], columns: &ColumnIndex) -> Result<NaiveDateTime, SkipReason> {
    let base = match row.get(columns.date) {
        None => return Err(SkipReason::MissingDate),
        Some(cell) if cell.is_empty() => return Err(SkipReason::MissingDate),
        Some(cell) => parse_date_cell(cell).ok_or(SkipReason::InvalidDate)?,
    };

    let Some(time_idx) = columns.time else {
        return Ok(base);
    };

    // With a dedicated time column, a row whose time cannot be read has no
    // hour bucket to land in; defaulting to midnight would fabricate a
    // false peak there.
    let time = match row.get(time_idx) {
        None => return Err(SkipReason::InvalidTime),
        Some(cell) => parse_time_cell(cell).ok_or(SkipReason::InvalidTime)?,
    };
    Ok(NaiveDateTime::new(base.date(), time))
}

fn parse_date_cell(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Number(serial) => datetime_from_serial(*serial),
        CellValue::Text(raw) => parse_date_text(raw.trim()),
        CellValue::Empty => None,
    }
}

fn parse_date_text(raw: &str) -> Option<NaiveDateTime> {
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Convert an Excel 1900-system day serial to a timestamp.
///
/// Day 0 is 1899-12-30; the fractional part is the fraction of a 86 400
/// second day. Seconds round half-up and clamp to the same calendar day.
/// Shared with the ingest layer, which resolves native date cells through
/// the same epoch.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn datetime_from_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.trunc() as u64;
    let secs = ((serial.fract() * 86_400.0).round() as u32).min(86_399);
    let date = NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(days))?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)?;
    Some(NaiveDateTime::new(date, time))
}

fn parse_time_cell(cell: &CellValue) -> Option<NaiveTime> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.time()),
        CellValue::Number(value) => time_from_day_fraction(*value),
        CellValue::Text(raw) => parse_time_text(raw.trim()),
        CellValue::Empty => None,
    }
}

/// Interpret a numeric time cell as a fraction of the day. Whole days are
/// discarded, so a full date-time serial also lands on its time of day.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn time_from_day_fraction(value: f64) -> Option<NaiveTime> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let secs = ((value.fract() * 86_400.0).round() as u32).min(86_399);
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
}

fn parse_time_text(raw: &str) -> Option<NaiveTime> {
    for fmt in ["%H:%M:%S", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(raw, fmt) {
            return Some(t);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn full_columns() -> ColumnIndex {
        ColumnIndex::from_header(&headers(&[
            "Fecha",
            "Hora",
            "Sector",
            "Ubicación",
            "Comentario",
            "Puntos Críticos",
            "Destacados",
            "Calificación Descripción",
        ]))
        .expect("columns resolve")
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    /// A complete row matching [`full_columns`].
    fn full_row() -> Vec<CellValue> {
        vec![
            text("2025-07-05"),
            text("10:30"),
            text("Entrance"),
            text("Gate1"),
            text("Excelente atención"),
            text("Demoras"),
            text("Personal"),
            text("Muy Positiva"),
        ]
    }

    #[test]
    fn canonical_header_folds_case_accents_and_underscores() {
        assert_eq!(
            canonical_header("  Calificación_Descripción  "),
            "calificacion descripcion"
        );
        assert_eq!(canonical_header("UBICACIÓN"), "ubicacion");
        assert_eq!(canonical_header("puntos   críticos"), "puntos criticos");
    }

    #[test]
    fn resolves_all_known_columns() {
        let columns = full_columns();
        assert_eq!(columns.date, 0);
        assert_eq!(columns.time, Some(1));
        assert_eq!(columns.sector, Some(2));
        assert_eq!(columns.location, Some(3));
        assert_eq!(columns.comment, Some(4));
        assert_eq!(columns.critical_tag, Some(5));
        assert_eq!(columns.highlight_tag, Some(6));
        assert_eq!(columns.rating, 7);
    }

    #[test]
    fn location_alone_satisfies_the_sector_requirement() {
        let columns =
            ColumnIndex::from_header(&headers(&["fecha", "ubicacion", "calificacion"]))
                .expect("columns resolve");
        assert!(columns.sector.is_none());
        assert_eq!(columns.location, Some(1));
    }

    #[test]
    fn missing_mandatory_columns_are_all_reported() {
        let err = ColumnIndex::from_header(&headers(&["comentario"])).unwrap_err();
        match err {
            EngineError::MissingColumns(names) => {
                assert_eq!(
                    names,
                    vec!["fecha", "calificacion descripcion", "sector/ubicacion"]
                );
            }
            other => panic!("expected MissingColumns, got: {other:?}"),
        }
    }

    #[test]
    fn leftmost_duplicate_header_wins() {
        let columns = ColumnIndex::from_header(&headers(&[
            "fecha", "sector", "sector", "calificacion",
        ]))
        .expect("columns resolve");
        assert_eq!(columns.sector, Some(1));
    }

    #[test]
    fn normalizes_a_complete_row() {
        let response = normalize_row(&full_row(), &full_columns()).expect("row is valid");
        assert_eq!(response.sector_key, "Entrance - Gate1");
        assert_eq!(response.rating, RatingClass::VeryPositive);
        assert_eq!(response.comment.as_deref(), Some("Excelente atención"));
        assert_eq!(response.critical_tag.as_deref(), Some("Demoras"));
        assert_eq!(response.highlight_tag.as_deref(), Some("Personal"));
        assert_eq!(response.weekday_index(), 6, "2025-07-05 is a Saturday");
        assert_eq!(response.hour(), 10);
        assert_eq!(response.timestamp.minute(), 30);
    }

    #[test]
    fn sector_alone_when_location_is_empty() {
        let mut row = full_row();
        row[3] = CellValue::Empty;
        let response = normalize_row(&row, &full_columns()).expect("row is valid");
        assert_eq!(response.sector_key, "Entrance");
    }

    #[test]
    fn location_alone_when_sector_is_empty() {
        let mut row = full_row();
        row[2] = text("   ");
        let response = normalize_row(&row, &full_columns()).expect("row is valid");
        assert_eq!(response.sector_key, "Gate1");
    }

    #[test]
    fn both_sector_cells_empty_skips_the_row() {
        let mut row = full_row();
        row[2] = CellValue::Empty;
        row[3] = CellValue::Empty;
        assert_eq!(
            normalize_row(&row, &full_columns()),
            Err(SkipReason::MissingSector)
        );
    }

    #[test]
    fn empty_date_skips_the_row() {
        let mut row = full_row();
        row[0] = CellValue::Empty;
        assert_eq!(
            normalize_row(&row, &full_columns()),
            Err(SkipReason::MissingDate)
        );
    }

    #[test]
    fn unreadable_date_skips_the_row() {
        let mut row = full_row();
        row[0] = text("pronto");
        assert_eq!(
            normalize_row(&row, &full_columns()),
            Err(SkipReason::InvalidDate)
        );
    }

    #[test]
    fn unreadable_time_skips_the_row_when_the_column_exists() {
        let mut row = full_row();
        row[1] = text("mediodía");
        assert_eq!(
            normalize_row(&row, &full_columns()),
            Err(SkipReason::InvalidTime)
        );
    }

    #[test]
    fn empty_time_skips_the_row_when_the_column_exists() {
        let mut row = full_row();
        row[1] = CellValue::Empty;
        assert_eq!(
            normalize_row(&row, &full_columns()),
            Err(SkipReason::InvalidTime)
        );
    }

    #[test]
    fn date_cell_time_is_used_without_a_time_column() {
        let columns = ColumnIndex::from_header(&headers(&["fecha", "sector", "calificacion"]))
            .expect("columns resolve");
        let row = vec![
            CellValue::Number(45_843.4375), // 2025-07-05 10:30
            text("Entrance"),
            text("Positiva"),
        ];
        let response = normalize_row(&row, &columns).expect("row is valid");
        assert_eq!(response.date().to_string(), "2025-07-05");
        assert_eq!(response.hour(), 10);
        assert_eq!(response.timestamp.minute(), 30);
    }

    #[test]
    fn time_column_overrides_the_date_cell_time() {
        let response = normalize_row(&full_row(), &full_columns()).expect("row is valid");
        // Date cell carries no time; the Hora column supplies 10:30.
        assert_eq!(response.hour(), 10);
    }

    #[test]
    fn missing_rating_cell_maps_to_unknown() {
        let mut row = full_row();
        row[7] = CellValue::Empty;
        let response = normalize_row(&row, &full_columns()).expect("row is valid");
        assert_eq!(response.rating, RatingClass::Unknown);
    }

    #[test]
    fn serial_zero_is_the_epoch_midnight() {
        let dt = datetime_from_serial(0.0).expect("valid serial");
        assert_eq!(dt.to_string(), "1899-12-30 00:00:00");
    }

    #[test]
    fn serial_with_fraction_resolves_date_and_time() {
        let dt = datetime_from_serial(45_843.4375).expect("valid serial");
        assert_eq!(dt.to_string(), "2025-07-05 10:30:00");
    }

    #[test]
    fn serial_fraction_never_rolls_into_the_next_day() {
        let dt = datetime_from_serial(45_843.999_999_99).expect("valid serial");
        assert_eq!(dt.date().to_string(), "2025-07-05");
        assert_eq!(dt.time().to_string(), "23:59:59");
    }

    #[test]
    fn negative_serial_is_rejected() {
        assert_eq!(datetime_from_serial(-1.0), None);
    }

    #[test]
    fn text_dates_accept_iso_and_day_first_forms() {
        let iso = parse_date_text("2025-07-05").expect("parses");
        let day_first = parse_date_text("05/07/2025").expect("parses");
        assert_eq!(iso, day_first);
        let with_time = parse_date_text("05/07/2025 14:00").expect("parses");
        assert_eq!(with_time.time().to_string(), "14:00:00");
    }

    #[test]
    fn time_cells_accept_text_fraction_and_datetime() {
        let columns = full_columns();
        for (cell, hour) in [
            (text("14:00"), 14),
            (text("09:15:30"), 9),
            (CellValue::Number(0.583_333_3), 14), // 14:00 as a day fraction
        ] {
            let mut row = full_row();
            row[1] = cell;
            let response = normalize_row(&row, &columns).expect("row is valid");
            assert_eq!(response.hour(), hour);
        }
    }
}
