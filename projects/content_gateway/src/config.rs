use std::net::SocketAddr;

use interfaces_github_contents::{AuthScheme, ContentsClientConfig};
use thiserror::Error;

pub const DEFAULT_OWNER: &str = "6677nnannad";
pub const DEFAULT_REPO: &str = "HHL";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_USER_AGENT: &str = "HHL-Content-Server";
pub const DEFAULT_IMAGES_FOLDER: &str = "img";
pub const DEFAULT_TEXTS_FOLDER: &str = "Wenan";
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Everything the gateway needs to reach its backing repository.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub api_base: String,
    pub raw_base: String,
    pub auth_scheme: AuthScheme,
    pub user_agent: String,
    pub images_folder: String,
    pub texts_folder: String,
    pub max_concurrent_fetches: usize,
    pub bind_addr: SocketAddr,
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("InvalidBindAddr: {value}: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("InvalidAuthScheme: {value} (expected `bearer` or `token`)")]
    InvalidAuthScheme { value: String },

    #[error("InvalidConcurrency: {value} (expected a positive integer)")]
    InvalidConcurrency { value: String },
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            raw_base: DEFAULT_RAW_BASE.to_string(),
            auth_scheme: AuthScheme::Bearer,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            images_folder: DEFAULT_IMAGES_FOLDER.to_string(),
            texts_folder: DEFAULT_TEXTS_FOLDER.to_string(),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str, default: String| lookup(key).unwrap_or(default);

        let bind_value = get("BIND_ADDR", DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_value
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_value.clone(),
                source,
            })?;

        let auth_scheme = match lookup("GITHUB_AUTH_SCHEME") {
            Some(value) => parse_auth_scheme(&value)?,
            None => defaults.auth_scheme,
        };

        let max_concurrent_fetches = match lookup("MAX_CONCURRENT_FETCHES") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidConcurrency { value }),
            },
            None => defaults.max_concurrent_fetches,
        };

        Ok(Self {
            token: get("GITHUB_TOKEN", defaults.token),
            owner: get("GITHUB_OWNER", defaults.owner),
            repo: get("GITHUB_REPO", defaults.repo),
            branch: get("GITHUB_BRANCH", defaults.branch),
            api_base: get("GITHUB_API_URL", defaults.api_base),
            raw_base: get("GITHUB_RAW_URL", defaults.raw_base),
            auth_scheme,
            user_agent: get("GITHUB_USER_AGENT", defaults.user_agent),
            images_folder: get("IMAGES_FOLDER", defaults.images_folder),
            texts_folder: get("TEXTS_FOLDER", defaults.texts_folder),
            max_concurrent_fetches,
            bind_addr,
            log_level: get("LOG_LEVEL", defaults.log_level),
        })
    }

    pub fn contents_client_config(&self) -> ContentsClientConfig {
        ContentsClientConfig {
            api_base: self.api_base.clone(),
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            token: self.token.clone(),
            auth_scheme: self.auth_scheme,
            user_agent: self.user_agent.clone(),
        }
    }

    /// Public read URL: `<raw>/{owner}/{repo}/{branch}/{folder}/{name}`.
    pub fn public_url(&self, folder: &str, name: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}/{}",
            self.raw_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch,
            folder,
            name
        )
    }
}

fn parse_auth_scheme(value: &str) -> Result<AuthScheme, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "bearer" => Ok(AuthScheme::Bearer),
        "token" => Ok(AuthScheme::Token),
        _ => Err(ConfigError::InvalidAuthScheme {
            value: value.to_string(),
        }),
    }
}
