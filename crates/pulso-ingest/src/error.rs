use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("workbook has no worksheets")]
    EmptyWorkbook,

    #[error("worksheet {0:?} has no rows")]
    EmptySheet(String),
}
