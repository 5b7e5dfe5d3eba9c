use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::content::{ContentGateway, ContentKind, ContentRecord};
use crate::endpoints::common::timestamp;

#[derive(Serialize)]
pub struct ImagesReadResponseBody {
    success: bool,
    images: Vec<ContentRecord>,
    count: usize,
    timestamp: String,
}

/// Axum handler: GET /images
pub async fn handler(Extension(gateway): Extension<ContentGateway>) -> impl IntoResponse {
    let images = gateway.lister.list(ContentKind::Image, false).await;

    (
        StatusCode::OK,
        Json(ImagesReadResponseBody {
            success: true,
            count: images.len(),
            images,
            timestamp: timestamp(),
        }),
    )
}
