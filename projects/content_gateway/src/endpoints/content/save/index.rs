use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{
    ContentGateway, ContentKind, UploadRequest, ValidationError, WriteError, WrittenFile,
};
use crate::endpoints::common::ErrorBody;

const DEFAULT_LABEL: &str = "content";

/// JSON payload expected by the endpoint.
#[derive(Deserialize)]
pub struct ContentSaveRequestBody {
    text: Option<String>,
    image: Option<String>,
    filename: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct SaveResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<SavedFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<SavedFile>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFile {
    success: bool,
    url: String,
    filename: String,
    github_url: Option<String>,
}

impl From<WrittenFile> for SavedFile {
    fn from(written: WrittenFile) -> Self {
        Self {
            success: true,
            url: written.url,
            filename: written.generated_name,
            github_url: written.store_url,
        }
    }
}

#[derive(Serialize)]
pub struct ContentSaveResponseBody {
    success: bool,
    message: &'static str,
    results: SaveResults,
}

#[derive(Serialize)]
struct PartialFailureBody {
    #[serde(flatten)]
    error: ErrorBody,
    results: SaveResults,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("InvalidBody: {source}")]
    InvalidBody {
        #[from]
        source: JsonRejection,
    },

    #[error("Validation: {source}")]
    Validation {
        #[from]
        source: ValidationError,
    },

    /// A store write failed; `results` holds the writes that completed before it.
    #[error("Write: {source}")]
    Write {
        source: WriteError,
        results: SaveResults,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let (status, error, results) = match self {
            HandlerError::InvalidBody { source } => {
                (StatusCode::BAD_REQUEST, source.body_text(), None)
            }
            HandlerError::Validation { source } => {
                (StatusCode::BAD_REQUEST, source.to_string(), None)
            }
            HandlerError::Write { source, results } => {
                let status = match source {
                    WriteError::Validation(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = match source {
                    WriteError::RemoteWrite { message, .. } => message,
                    other => other.to_string(),
                };
                (status, message, Some(results))
            }
        };

        let error = ErrorBody {
            success: false,
            error,
        };
        match results {
            Some(results) => (status, Json(PartialFailureBody { error, results })).into_response(),
            None => (status, Json(error)).into_response(),
        }
    }
}

/// Axum handler: POST /save-content
pub async fn handler(
    Extension(gateway): Extension<ContentGateway>,
    body: Result<Json<ContentSaveRequestBody>, JsonRejection>,
) -> Response {
    let Json(input) = match body {
        Ok(body) => body,
        Err(source) => return HandlerError::InvalidBody { source }.into_response(),
    };

    let request = UploadRequest {
        text: input.text,
        image_payload: input.image,
        label: input.filename,
    };
    let label = request
        .label
        .clone()
        .unwrap_or_else(|| DEFAULT_LABEL.to_string());

    let payloads = match request.into_payloads() {
        Ok(payloads) => payloads,
        Err(source) => return HandlerError::Validation { source }.into_response(),
    };

    let mut results = SaveResults::default();
    for payload in &payloads {
        let written = match gateway.writer.write(payload, &label).await {
            Ok(written) => written,
            Err(source) => return HandlerError::Write { source, results }.into_response(),
        };
        match written.kind {
            ContentKind::Text => results.text = Some(written.into()),
            ContentKind::Image => results.image = Some(written.into()),
        }
    }

    (
        StatusCode::OK,
        Json(ContentSaveResponseBody {
            success: true,
            message: "content saved",
            results,
        }),
    )
        .into_response()
}
