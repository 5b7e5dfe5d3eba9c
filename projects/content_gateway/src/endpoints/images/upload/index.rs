use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{ContentGateway, WriteError};
use crate::endpoints::common::error_response;

const DEFAULT_LABEL: &str = "image";

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("InvalidBody: {source}")]
    InvalidBody {
        #[from]
        source: JsonRejection,
    },

    #[error("WriteImage: {source}")]
    WriteImage { source: WriteError },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::InvalidBody { source } => {
                error_response(StatusCode::BAD_REQUEST, source.body_text())
            }
            HandlerError::WriteImage {
                source: WriteError::Validation(err),
            } => error_response(StatusCode::BAD_REQUEST, err.to_string()),
            HandlerError::WriteImage {
                source: WriteError::RemoteWrite { message, .. },
            } => error_response(StatusCode::INTERNAL_SERVER_ERROR, message),
            HandlerError::WriteImage { source } => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("server error: {source}"),
            ),
        }
    }
}

/// JSON payload expected by the endpoint.
#[derive(Deserialize)]
pub struct ImagesUploadRequestBody {
    image: Option<String>,
    filename: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagesUploadResponseBody {
    success: bool,
    message: &'static str,
    image_url: String,
    filename: String,
}

/// Axum handler: POST /upload
pub async fn handler(
    Extension(gateway): Extension<ContentGateway>,
    body: Result<Json<ImagesUploadRequestBody>, JsonRejection>,
) -> Response {
    let Json(input) = match body {
        Ok(body) => body,
        Err(source) => return HandlerError::InvalidBody { source }.into_response(),
    };

    let label = input.filename.unwrap_or_else(|| DEFAULT_LABEL.to_string());
    let image = input.image.unwrap_or_default();

    match gateway.writer.write_image(&image, &label).await {
        Ok(written) => (
            StatusCode::OK,
            Json(ImagesUploadResponseBody {
                success: true,
                message: "image uploaded",
                image_url: written.url,
                filename: written.generated_name,
            }),
        )
            .into_response(),
        Err(source) => HandlerError::WriteImage { source }.into_response(),
    }
}
