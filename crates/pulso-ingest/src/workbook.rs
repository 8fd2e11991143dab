//! Decodes `.xlsx` workbooks into [`SheetData`].
//!
//! Only the first worksheet is read. Its first row becomes the header and
//! every following row becomes a row of [`CellValue`]s; interpreting those
//! cells is the engine's job.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook, DataType, Reader, Xlsx};
use pulso_engine::normalize::datetime_from_serial;
use pulso_engine::{CellValue, SheetData};

use crate::error::IngestError;

/// Decodes an in-memory `.xlsx` payload, e.g. an uploaded file.
pub fn decode_workbook(bytes: &[u8]) -> Result<SheetData, IngestError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    first_sheet(&mut workbook)
}

/// Reads a `.xlsx` workbook from disk.
pub fn read_workbook(path: &Path) -> Result<SheetData, IngestError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    first_sheet(&mut workbook)
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<SheetData, IngestError> {
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(IngestError::EmptyWorkbook)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(IngestError::EmptySheet(name));
    };

    let header: Vec<String> = header_row.iter().map(header_text).collect();
    let data_rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    tracing::debug!(sheet = %name, rows = data_rows.len(), "workbook decoded");

    Ok(SheetData {
        header,
        rows: data_rows,
    })
}

fn header_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn convert_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Text(value.to_string()),
        // Native date cells come through as serial day counts.
        DataType::DateTime(serial) => {
            datetime_from_serial(*serial).map_or(CellValue::Empty, CellValue::DateTime)
        }
        // Error cells carry nothing a survey row can use.
        _ => CellValue::Empty,
    }
}
