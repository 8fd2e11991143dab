mod report;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pulso_core::AppConfig;
use pulso_summarizer::SummaryClient;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::request_id;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Present only when an API key is configured.
    pub summarizer: Option<Arc<SummaryClient>>,
}

/// Success envelope the frontend consumes: `{ "success": true, "data": … }`.
#[derive(Debug, Serialize)]
pub struct ReportData<T: Serialize> {
    success: bool,
    data: T,
}

impl<T: Serialize> ReportData<T> {
    pub(super) fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure envelope: `{ "success": false, "message": … }`.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct FailureBody {
    success: bool,
    message: String,
}

impl ApiFailure {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(FailureBody {
                success: false,
                message: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    let max_upload = state.config.max_upload_bytes;

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/report", post(report::create_report))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthData { status: "ok" }))
}
