//! Content synchronization with the backing repository
//!
//! `Lister` reads a folder into ordered `ContentRecord`s, `Writer` appends new files.

pub mod lister;
pub mod record;
pub mod writer;

use std::sync::Arc;

use interfaces_github_contents::ContentsClient;

use crate::config::GatewayConfig;

pub use lister::Lister;
pub use record::{ContentKind, ContentRecord};
pub use writer::{Payload, UploadRequest, ValidationError, WriteError, Writer, WrittenFile};

/// Shared handle given to every endpoint.
#[derive(Debug, Clone)]
pub struct ContentGateway {
    pub lister: Lister,
    pub writer: Writer,
}

impl ContentGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let config = Arc::new(config);
        let client = ContentsClient::new(config.contents_client_config());

        Self {
            lister: Lister::new(client.clone(), Arc::clone(&config)),
            writer: Writer::new(client, config),
        }
    }
}
