//! The upload-and-analyze endpoint.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use pulso_core::AppConfig;
use pulso_engine::{analyze_sheet, Analysis, EngineOptions};

use super::{ApiFailure, AppState, ReportData};
use crate::middleware::RequestId;

/// `POST /api/v1/report` — analyze one uploaded workbook.
///
/// Takes the first multipart field that looks like the upload, decodes it,
/// runs the analysis pass, and (when configured) enriches the report with
/// narrative summaries before answering.
pub(super) async fn create_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> Response {
    let upload = match read_upload(&mut multipart).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            return ApiFailure::bad_request("No se subió ningún archivo.").into_response();
        }
        Err(e) => {
            tracing::warn!(request_id = %req_id.0, error = %e, "multipart read failed");
            return ApiFailure::bad_request("No se pudo leer el archivo subido.").into_response();
        }
    };

    let sheet = match pulso_ingest::decode_workbook(&upload) {
        Ok(sheet) => sheet,
        Err(e) => {
            // The caller only learns that processing failed; decoder detail
            // stays in the server log, like the original service did it.
            tracing::error!(request_id = %req_id.0, error = %e, "workbook decode failed");
            return ApiFailure::internal("Error interno del servidor.").into_response();
        }
    };

    let analysis = match analyze_sheet(&sheet, &engine_options(&state.config)) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(request_id = %req_id.0, error = %e, "workbook rejected");
            return ApiFailure::bad_request(e.to_string()).into_response();
        }
    };

    tracing::info!(
        request_id = %req_id.0,
        rows = analysis.rows_scanned,
        skipped = analysis.rows_skipped,
        summaries = analysis.pending_summaries.len(),
        "report generated"
    );

    let Analysis {
        mut report,
        pending_summaries,
        ..
    } = analysis;

    if let Some(client) = &state.summarizer {
        pulso_summarizer::apply_summaries(&mut report, &pending_summaries, client).await;
    }

    (StatusCode::OK, Json(ReportData::new(report))).into_response()
}

/// Finds the uploaded workbook among the multipart fields.
///
/// The original frontend posts the file as `archivoExcel`; `file` and
/// `archivo` are accepted as aliases, as is any field carrying a filename.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Bytes>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        let named_upload = matches!(field.name(), Some("file" | "archivo" | "archivoExcel"));
        if named_upload || field.file_name().is_some() {
            return Ok(Some(field.bytes().await?));
        }
    }
    Ok(None)
}

fn engine_options(config: &AppConfig) -> EngineOptions {
    EngineOptions {
        min_token_len: config.min_token_len,
        top_n: config.top_n,
        min_sector_sample: config.min_sector_sample,
    }
}
