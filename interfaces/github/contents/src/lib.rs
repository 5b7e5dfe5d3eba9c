//! Client for the GitHub repository contents API
//!
//! Covers the three calls the gateway needs: listing a directory, downloading a
//! raw file and creating a file with a PUT.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use reqwest::StatusCode;

/// How the credential is presented in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    #[default]
    Bearer,
    Token,
}

impl AuthScheme {
    pub fn header_value(self, token: &str) -> String {
        match self {
            AuthScheme::Bearer => format!("Bearer {token}"),
            AuthScheme::Token => format!("token {token}"),
        }
    }
}

/// Connection settings for one repository.
#[derive(Debug, Clone)]
pub struct ContentsClientConfig {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub token: String,
    pub auth_scheme: AuthScheme,
    pub user_agent: String,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl ContentEntry {
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

/// The contents endpoint answers with an array for directories and an object for files.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ContentsListing {
    Directory(Vec<ContentEntry>),
    File(ContentEntry),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PutFileRequest<'a> {
    pub message: &'a str,
    /// Base64 encoded file body.
    pub content: &'a str,
    pub branch: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PutFileResponse {
    pub content: Option<PutFileContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PutFileContent {
    pub html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: Option<String>,
}

#[derive(Debug, Error)]
pub enum ListDirectoryError {
    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("UnexpectedStatus: {status}")]
    UnexpectedStatus { status: StatusCode },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum DownloadFileError {
    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("UnexpectedStatus: {status}")]
    UnexpectedStatus { status: StatusCode },
}

#[derive(Debug, Error)]
pub enum PutFileError {
    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

#[derive(Debug, Clone)]
pub struct ContentsClient {
    http: Client,
    config: ContentsClientConfig,
}

impl ContentsClient {
    pub fn new(config: ContentsClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            path.trim_start_matches('/'),
        )
    }

    pub async fn list_directory(&self, path: &str) -> Result<ContentsListing, ListDirectoryError> {
        let url = self.contents_url(path);
        debug!(%url, "listing directory");

        let response = self
            .http
            .get(&url)
            .header(
                "Authorization",
                self.config.auth_scheme.header_value(&self.config.token),
            )
            .header("User-Agent", &self.config.user_agent)
            .send()
            .await
            .map_err(|source| ListDirectoryError::RequestSend { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListDirectoryError::UnexpectedStatus { status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ListDirectoryError::ResponseRead { source })?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches a file body from its direct download URL.
    pub async fn download(&self, download_url: &str) -> Result<String, DownloadFileError> {
        debug!(url = %download_url, "downloading file");

        let response = self
            .http
            .get(download_url)
            .header("User-Agent", &self.config.user_agent)
            .send()
            .await
            .map_err(|source| DownloadFileError::RequestSend { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadFileError::UnexpectedStatus { status });
        }

        response
            .text()
            .await
            .map_err(|source| DownloadFileError::ResponseRead { source })
    }

    pub async fn put_file(
        &self,
        path: &str,
        request: &PutFileRequest<'_>,
    ) -> Result<PutFileResponse, PutFileError> {
        let url = self.contents_url(path);
        debug!(%url, "creating file");

        let response = self
            .http
            .put(&url)
            .header(
                "Authorization",
                self.config.auth_scheme.header_value(&self.config.token),
            )
            .header("Content-Type", "application/json")
            .header("User-Agent", &self.config.user_agent)
            .json(request)
            .send()
            .await
            .map_err(|source| PutFileError::RequestSend { source })?;

        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|source| PutFileError::ResponseRead { source })?;

        if !status.is_success() {
            let message = serde_json::from_str::<GitHubErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.message)
                .unwrap_or_else(|| format!("GitHub API error: {status}"));
            return Err(PutFileError::Rejected { status, message });
        }

        // The file exists once the store answers 2xx, whatever the body says.
        Ok(serde_json::from_str(&body).unwrap_or_else(|err| {
            warn!(%url, error = %err, "store accepted write with an unreadable body");
            PutFileResponse::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, auth_scheme: AuthScheme) -> ContentsClient {
        ContentsClient::new(ContentsClientConfig {
            api_base: server.uri(),
            owner: "octo".to_string(),
            repo: "store".to_string(),
            token: "secret".to_string(),
            auth_scheme,
            user_agent: "contents-test".to_string(),
        })
    }

    #[test]
    fn auth_header_follows_scheme() {
        assert_eq!(AuthScheme::Bearer.header_value("abc"), "Bearer abc");
        assert_eq!(AuthScheme::Token.header_value("abc"), "token abc");
    }

    #[tokio::test]
    async fn lists_directory_entries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/store/contents/img"))
            .and(header("authorization", "Bearer secret"))
            .and(header("user-agent", "contents-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "name": "1.png",
                    "type": "file",
                    "size": 10,
                    "download_url": "https://raw.example/1.png",
                    "html_url": "https://web.example/1.png"
                },
                { "name": "nested", "type": "dir", "size": 0, "download_url": null }
            ])))
            .mount(&server)
            .await;

        let listing = client_for(&server, AuthScheme::Bearer)
            .list_directory("img")
            .await
            .unwrap();

        let ContentsListing::Directory(entries) = listing else {
            panic!("expected a directory listing");
        };
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_file());
        assert_eq!(entries[0].size, 10);
        assert!(!entries[1].is_file());
        assert_eq!(entries[1].download_url, None);
    }

    #[tokio::test]
    async fn single_file_object_is_not_a_directory() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/store/contents/img"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "img", "type": "file", "size": 3
            })))
            .mount(&server)
            .await;

        let listing = client_for(&server, AuthScheme::Bearer)
            .list_directory("img")
            .await
            .unwrap();

        assert!(matches!(listing, ContentsListing::File(_)));
    }

    #[tokio::test]
    async fn list_reports_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
            .mount(&server)
            .await;

        let err = client_for(&server, AuthScheme::Bearer)
            .list_directory("missing")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ListDirectoryError::UnexpectedStatus { status } if status == StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn download_rejects_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/raw/a.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/raw/b.txt"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server, AuthScheme::Bearer);
        let body = client
            .download(&format!("{}/raw/a.txt", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "hello");

        let err = client
            .download(&format!("{}/raw/b.txt", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadFileError::UnexpectedStatus { .. }));
    }

    #[tokio::test]
    async fn put_file_sends_message_content_and_branch() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/repos/octo/store/contents/Wenan/1-abcdef.txt"))
            .and(header("authorization", "token secret"))
            .and(body_json(json!({
                "message": "Add text: note",
                "content": "aGVsbG8=",
                "branch": "main"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "content": {
                    "name": "1-abcdef.txt",
                    "path": "Wenan/1-abcdef.txt",
                    "html_url": "https://web.example/Wenan/1-abcdef.txt"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server, AuthScheme::Token)
            .put_file(
                "Wenan/1-abcdef.txt",
                &PutFileRequest {
                    message: "Add text: note",
                    content: "aGVsbG8=",
                    branch: "main",
                },
            )
            .await
            .unwrap();

        let content = response.content.unwrap();
        assert_eq!(
            content.html_url.as_deref(),
            Some("https://web.example/Wenan/1-abcdef.txt")
        );
    }

    #[tokio::test]
    async fn put_file_accepts_empty_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server, AuthScheme::Bearer)
            .put_file(
                "img/x.png",
                &PutFileRequest {
                    message: "m",
                    content: "AA==",
                    branch: "main",
                },
            )
            .await
            .unwrap();

        assert!(response.content.is_none());
    }

    #[tokio::test]
    async fn put_file_surfaces_store_message() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Invalid request.\n\n\"sha\" wasn't supplied."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, AuthScheme::Bearer)
            .put_file(
                "img/x.png",
                &PutFileRequest {
                    message: "m",
                    content: "AA==",
                    branch: "main",
                },
            )
            .await
            .unwrap_err();

        match err {
            PutFileError::Rejected { status, message } => {
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
                assert!(message.starts_with("Invalid request."));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn put_file_falls_back_to_status_when_body_has_no_message() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let err = client_for(&server, AuthScheme::Bearer)
            .put_file(
                "img/x.png",
                &PutFileRequest {
                    message: "m",
                    content: "AA==",
                    branch: "main",
                },
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("500"));
    }
}
