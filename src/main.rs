//! Assistant Bridge server binary.
//!
//! Loads configuration, builds the OpenAI assistants client and the endpoint
//! router, and serves until Ctrl-C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use assistant_bridge::adapters::assistant::{OpenAIAssistantsClient, OpenAIConfig};
use assistant_bridge::adapters::http::{bridge_router, with_static_files};
use assistant_bridge::application::BridgeHandler;
use assistant_bridge::config::{AppConfig, ConfigError, ValidationError};
use assistant_bridge::domain::bridge::{CatalogError, EndpointCatalog};
use assistant_bridge::ports::{AssistantApi, AssistantError};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to build assistants client: {0}")]
    Client(#[from] AssistantError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

impl From<ValidationError> for StartupError {
    fn from(err: ValidationError) -> Self {
        StartupError::Config(ConfigError::from(err))
    }
}

#[tokio::main]
async fn main() {
    let config = AppConfig::load();

    let (log_level, json) = match &config {
        Ok(config) => (config.server.log_level.as_str(), config.is_production()),
        Err(_) => ("info", false),
    };
    init_tracing(log_level, json);

    let result = match config {
        Ok(config) => run(config).await,
        Err(err) => Err(err.into()),
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "assistant-bridge failed");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over the configured filter when set.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = tracing_subscriber::fmt::layer().with_target(true);
    let layer = if json {
        layer.json().flatten_event(true).boxed()
    } else {
        layer.boxed()
    };

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    config.validate()?;

    let catalog = match &config.server.endpoints_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading endpoint catalog");
            EndpointCatalog::load(path)?
        }
        None => EndpointCatalog::builtin(),
    };

    // Presence was checked by validate().
    let api_key = config.ai.openai_api_key.clone().unwrap_or_default();
    let client = OpenAIAssistantsClient::new(
        OpenAIConfig::new(api_key)
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    )?;
    let api: Arc<dyn AssistantApi> = Arc::new(client);
    let handler = BridgeHandler::new(api, config.ai.bridge_settings());

    let mut app = bridge_router(&catalog, handler, &config.server.cors_origins_list());
    if let Some(dir) = &config.server.static_dir {
        tracing::info!(dir = %dir.display(), "serving static files");
        app = with_static_files(app, dir);
    }
    let app = app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    let routes: Vec<&str> = catalog.iter().map(|p| p.route.as_str()).collect();
    tracing::info!(%addr, ?routes, model = %config.ai.model, "assistant-bridge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("assistant-bridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
