//! Web server for docdrop.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::document::{BlobStore, DocumentService};
use crate::{DocdropError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// HTTP server for the document API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server, preparing the blob directory.
    pub fn new(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| DocdropError::Config(format!("invalid listen address: {e}")))?;

        let storage = BlobStore::new(&config.storage.path)?
            .with_max_size(config.storage.max_upload_size_bytes())
            .with_public_prefix(&config.storage.public_prefix);
        tracing::info!(
            path = %config.storage.path,
            max_upload_size_mb = config.storage.max_upload_size_mb,
            "Blob storage initialized"
        );

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(DocumentService::new(storage))),
            cors_origins: config.server.cors_origins.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Shared state, e.g. for inspecting the registry from tests.
    pub fn app_state(&self) -> Arc<AppState> {
        Arc::clone(&self.app_state)
    }

    fn into_router(self) -> Router {
        create_router(self.app_state, &self.cors_origins)
            .merge(create_health_router())
            .layer(CompressionLayer::new())
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.into_router();

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Bind, serve in a background task and return the bound address.
    ///
    /// Binding to port 0 picks a free port.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.into_router();

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
