use std::sync::Arc;

use futures::stream::{self, StreamExt};
use interfaces_github_contents::{
    ContentEntry, ContentsClient, ContentsListing, DownloadFileError, ListDirectoryError,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::content::record::{
    sort_key_of, sort_newest_first, ContentKind, ContentRecord, UNAVAILABLE_BODY,
};

#[derive(Debug, Error)]
pub enum RemoteListError {
    #[error("ListDirectory: {source}")]
    ListDirectory {
        #[from]
        source: ListDirectoryError,
    },

    #[error("NotADirectory: {folder}")]
    NotADirectory { folder: String },
}

#[derive(Debug, Error)]
pub enum RemoteFetchError {
    #[error("MissingDownloadUrl: {name}")]
    MissingDownloadUrl { name: String },

    #[error("DownloadFile: {source}")]
    DownloadFile {
        #[from]
        source: DownloadFileError,
    },
}

/// Reads a folder of the store and turns it into ordered content records.
#[derive(Debug, Clone)]
pub struct Lister {
    client: ContentsClient,
    config: Arc<GatewayConfig>,
}

impl Lister {
    pub fn new(client: ContentsClient, config: Arc<GatewayConfig>) -> Self {
        Self { client, config }
    }

    pub fn folder_for(&self, kind: ContentKind) -> &str {
        match kind {
            ContentKind::Image => &self.config.images_folder,
            ContentKind::Text => &self.config.texts_folder,
        }
    }

    /// Never fails: an unreachable or malformed folder yields an empty list.
    /// `want_bodies` only has an effect for text records.
    pub async fn list(&self, kind: ContentKind, want_bodies: bool) -> Vec<ContentRecord> {
        let folder = self.folder_for(kind);

        let entries = match self.list_folder(folder).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(folder, error = %err, "folder listing unavailable, returning no records");
                return Vec::new();
            }
        };

        let fetch_bodies = want_bodies && kind == ContentKind::Text;
        let qualifying: Vec<ContentEntry> = entries
            .into_iter()
            .filter(|entry| entry.is_file() && kind.accepts(&entry.name))
            .collect();

        debug!(folder, count = qualifying.len(), fetch_bodies, "building records");

        let mut records: Vec<ContentRecord> = stream::iter(qualifying)
            .map(|entry| self.build_record(kind, folder, entry, fetch_bodies))
            .buffered(self.config.max_concurrent_fetches.max(1))
            .collect()
            .await;

        sort_newest_first(&mut records);
        records
    }

    async fn list_folder(&self, folder: &str) -> Result<Vec<ContentEntry>, RemoteListError> {
        match self.client.list_directory(folder).await? {
            ContentsListing::Directory(entries) => Ok(entries),
            ContentsListing::File(_) => Err(RemoteListError::NotADirectory {
                folder: folder.to_string(),
            }),
        }
    }

    async fn fetch_body(&self, entry: &ContentEntry) -> Result<String, RemoteFetchError> {
        let url = entry
            .download_url
            .as_deref()
            .ok_or_else(|| RemoteFetchError::MissingDownloadUrl {
                name: entry.name.clone(),
            })?;
        Ok(self.client.download(url).await?)
    }

    async fn build_record(
        &self,
        kind: ContentKind,
        folder: &str,
        entry: ContentEntry,
        fetch_body: bool,
    ) -> ContentRecord {
        let (body, error) = if fetch_body {
            match self.fetch_body(&entry).await {
                Ok(body) => (Some(body), false),
                Err(err) => {
                    warn!(name = %entry.name, error = %err, "record body unavailable");
                    (Some(UNAVAILABLE_BODY.to_string()), true)
                }
            }
        } else {
            (None, false)
        };

        ContentRecord {
            url: self.config.public_url(folder, &entry.name),
            sort_key: sort_key_of(&entry.name).to_string(),
            size: entry.size,
            kind,
            body,
            store_url: entry.html_url,
            download_url: match kind {
                ContentKind::Text => entry.download_url,
                ContentKind::Image => None,
            },
            error,
            name: entry.name,
        }
    }
}
