//! Content gateway over a GitHub repository
//!
//! - REST API endpoints in `endpoints/`
//! - Listing and writing logic in `content/`
//! - Reads GITHUB_TOKEN and friends from the environment, see `config`

pub mod config;
pub mod content;
pub mod endpoints;
