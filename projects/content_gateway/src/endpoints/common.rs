use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

/// Body of every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            success: false,
            error: error.into(),
        }),
    )
        .into_response()
}

/// Open CORS for one method plus `OPTIONS`. The layer answers every `OPTIONS` itself.
pub fn cors_for(method: Method) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([method, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub async fn method_not_allowed(allowed: Method) -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("only {allowed} requests are allowed"),
    )
}

/// ISO-8601 UTC with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
