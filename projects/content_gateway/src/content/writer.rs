use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use interfaces_github_contents::{ContentsClient, PutFileError, PutFileRequest, StatusCode};
use rand::Rng;
use thiserror::Error;
use tracing::{error, info};

use crate::config::GatewayConfig;
use crate::content::record::{ContentKind, TEXT_EXTENSION};

const NAME_SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const NAME_SUFFIX_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no text or image data provided")]
    MissingPayload,

    #[error("no image data provided")]
    MissingImage,

    #[error("invalid image format")]
    InvalidImageFormat,
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    RemoteWrite { status: StatusCode, message: String },

    #[error("Transport: {source}")]
    Transport { source: PutFileError },
}

impl From<PutFileError> for WriteError {
    fn from(source: PutFileError) -> Self {
        match source {
            PutFileError::Rejected { status, message } => WriteError::RemoteWrite { status, message },
            source => WriteError::Transport { source },
        }
    }
}

/// An image payload in `data:image/<subtype>;base64,<data>` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDataUri {
    pub subtype: String,
    pub data: String,
}

impl ImageDataUri {
    pub fn parse(uri: &str) -> Result<Self, ValidationError> {
        let rest = uri
            .strip_prefix("data:image/")
            .ok_or(ValidationError::InvalidImageFormat)?;
        let (subtype, data) = rest
            .split_once(";base64,")
            .ok_or(ValidationError::InvalidImageFormat)?;

        let subtype_ok = !subtype.is_empty()
            && subtype.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        let data_ok = !data.is_empty() && !data.contains(['\n', '\r']);
        if !subtype_ok || !data_ok {
            return Err(ValidationError::InvalidImageFormat);
        }

        Ok(Self {
            subtype: subtype.to_string(),
            data: data.to_string(),
        })
    }
}

/// A validated payload ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Image(ImageDataUri),
}

impl Payload {
    pub fn text(text: impl Into<String>) -> Self {
        Payload::Text(text.into())
    }

    pub fn image(uri: &str) -> Result<Self, ValidationError> {
        ImageDataUri::parse(uri).map(Payload::Image)
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Payload::Text(_) => ContentKind::Text,
            Payload::Image(_) => ContentKind::Image,
        }
    }

    fn extension(&self) -> &str {
        match self {
            Payload::Text(_) => TEXT_EXTENSION,
            Payload::Image(uri) => &uri.subtype,
        }
    }

    /// Body as the store expects it, base64 encoded.
    fn encoded(&self) -> String {
        match self {
            Payload::Text(text) => STANDARD.encode(text.as_bytes()),
            Payload::Image(uri) => uri.data.clone(),
        }
    }

    fn change_message(&self, label: &str) -> String {
        match self {
            Payload::Text(_) => format!("Add text: {label}"),
            Payload::Image(_) => format!("Add image: {label}"),
        }
    }
}

/// Raw request fields accepted by the write endpoints.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub text: Option<String>,
    pub image_payload: Option<String>,
    pub label: Option<String>,
}

impl UploadRequest {
    /// Validates every present payload up front so nothing reaches the store
    /// when any part is malformed. Empty strings count as absent.
    pub fn into_payloads(self) -> Result<Vec<Payload>, ValidationError> {
        let text = self.text.filter(|t| !t.is_empty());
        let image = self.image_payload.filter(|i| !i.is_empty());

        if text.is_none() && image.is_none() {
            return Err(ValidationError::MissingPayload);
        }

        let mut payloads = Vec::with_capacity(2);
        if let Some(text) = text {
            payloads.push(Payload::text(text));
        }
        if let Some(image) = image {
            payloads.push(Payload::image(&image)?);
        }
        Ok(payloads)
    }
}

/// A file created in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub kind: ContentKind,
    pub generated_name: String,
    pub url: String,
    pub store_url: Option<String>,
}

/// `<unix millis>-<6 lowercase alphanumerics>.<ext>`
pub fn generate_name(ext: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..NAME_SUFFIX_LEN)
        .map(|_| NAME_SUFFIX_CHARSET[rng.random_range(0..NAME_SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("{millis}-{suffix}.{ext}")
}

/// Appends new files to the store.
#[derive(Debug, Clone)]
pub struct Writer {
    client: ContentsClient,
    config: Arc<GatewayConfig>,
}

impl Writer {
    pub fn new(client: ContentsClient, config: Arc<GatewayConfig>) -> Self {
        Self { client, config }
    }

    pub fn folder_for(&self, kind: ContentKind) -> &str {
        match kind {
            ContentKind::Image => &self.config.images_folder,
            ContentKind::Text => &self.config.texts_folder,
        }
    }

    /// One PUT per call. No retries; the store's message is surfaced on rejection.
    pub async fn write(&self, payload: &Payload, label: &str) -> Result<WrittenFile, WriteError> {
        let kind = payload.kind();
        let folder = self.folder_for(kind);
        let generated_name = generate_name(payload.extension());
        let path = format!("{folder}/{generated_name}");

        let message = payload.change_message(label);
        let content = payload.encoded();
        let request = PutFileRequest {
            message: &message,
            content: &content,
            branch: &self.config.branch,
        };

        let response = self.client.put_file(&path, &request).await.map_err(|err| {
            error!(%path, error = %err, "store rejected write");
            WriteError::from(err)
        })?;

        info!(%path, "stored new file");

        Ok(WrittenFile {
            kind,
            url: self.config.public_url(folder, &generated_name),
            store_url: response.content.and_then(|c| c.html_url),
            generated_name,
        })
    }

    pub async fn write_text(&self, text: &str, label: &str) -> Result<WrittenFile, WriteError> {
        if text.is_empty() {
            return Err(ValidationError::MissingPayload.into());
        }
        self.write(&Payload::text(text), label).await
    }

    pub async fn write_image(&self, uri: &str, label: &str) -> Result<WrittenFile, WriteError> {
        if uri.is_empty() {
            return Err(ValidationError::MissingImage.into());
        }
        let payload = Payload::image(uri)?;
        self.write(&payload, label).await
    }
}
