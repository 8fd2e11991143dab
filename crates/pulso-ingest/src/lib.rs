//! Workbook ingestion: `.xlsx` uploads or files into [`pulso_engine::SheetData`].
//!
//! Decoding is the only place that knows the workbook format. Everything
//! downstream works on format-free cells.

pub mod error;
pub mod workbook;

pub use error::IngestError;
pub use workbook::{decode_workbook, read_workbook};
