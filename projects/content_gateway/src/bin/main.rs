use projects_content_gateway::{
	config::{ConfigError, GatewayConfig},
	content::ContentGateway,
	endpoints::router,
};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
	#[error("LoadConfig: {source}")]
	LoadConfig {
		#[source]
		source: ConfigError,
	},
	#[error("TracingInit: {source}")]
	TracingInit {
		#[source]
		source: utils_trace::TracingInitError,
	},
	#[error("TcpListenerBind: {source}")]
	TcpListenerBind {
		#[source]
		source: std::io::Error,
	},
	#[error("Serve: {source}")]
	Serve {
		#[source]
		source: std::io::Error,
	},
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	let dotenv = dotenvy::dotenv();

	let config = GatewayConfig::from_env()
		.map_err(|source| MainError::LoadConfig { source })?;

	tracing_init(&config.log_level)
		.map_err(|source| MainError::TracingInit { source })?;

	if let Err(err) = dotenv {
		info!("No .env file loaded: {}", err);
	}
	if config.token.is_empty() {
		warn!("GITHUB_TOKEN is not set, store calls will be unauthenticated");
	}

	let addr = config.bind_addr;
	info!(
		"Serving {}/{} ({} and {}) from branch {}",
		config.owner, config.repo, config.images_folder, config.texts_folder, config.branch
	);

	let app = router(ContentGateway::new(config)).layer(TraceLayer::new_for_http());

	let listener = tokio::net::TcpListener::bind(addr)
		.await
		.map_err(|source| MainError::TcpListenerBind { source })?;

	info!("Server running on addr: {}", addr);

	axum::serve(listener, app)
		.await
		.map_err(|source| MainError::Serve { source })?;

	Ok(())
}
