use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::info;

use crate::content::{ContentGateway, ContentKind, ContentRecord};
use crate::endpoints::common::timestamp;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReadResponseBody {
    success: bool,
    images: Vec<ContentRecord>,
    texts: Vec<ContentRecord>,
    image_count: usize,
    text_count: usize,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReadTotalsResponseBody {
    success: bool,
    images: Vec<ContentRecord>,
    texts: Vec<ContentRecord>,
    total_images: usize,
    total_texts: usize,
    timestamp: String,
}

/// Both folders at once. Each degrades to an empty list on its own.
pub async fn read_all(gateway: &ContentGateway) -> (Vec<ContentRecord>, Vec<ContentRecord>) {
    let (images, texts) = tokio::join!(
        gateway.lister.list(ContentKind::Image, false),
        gateway.lister.list(ContentKind::Text, true),
    );
    info!(images = images.len(), texts = texts.len(), "content listed");
    (images, texts)
}

/// Axum handler: GET /content
pub async fn handler(Extension(gateway): Extension<ContentGateway>) -> impl IntoResponse {
    let (images, texts) = read_all(&gateway).await;

    (
        StatusCode::OK,
        Json(ContentReadResponseBody {
            success: true,
            image_count: images.len(),
            text_count: texts.len(),
            images,
            texts,
            timestamp: timestamp(),
        }),
    )
}

/// Axum handler: GET /get-content
pub async fn totals_handler(Extension(gateway): Extension<ContentGateway>) -> impl IntoResponse {
    let (images, texts) = read_all(&gateway).await;

    (
        StatusCode::OK,
        Json(ContentReadTotalsResponseBody {
            success: true,
            total_images: images.len(),
            total_texts: texts.len(),
            images,
            texts,
            timestamp: timestamp(),
        }),
    )
}
