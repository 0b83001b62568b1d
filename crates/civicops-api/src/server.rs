//! HTTP server lifecycle

use std::{future::Future, net::SocketAddr};

use axum::Router;
use civicops_config::AppConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    routes::all_routes,
    state::AppState,
};

/// CivicOps API server
pub struct ApiServer {
    state: AppState,
    bind_addr: SocketAddr,
}

impl ApiServer {
    /// Validate `config` and build a server over a fresh in-memory store
    pub fn new(config: AppConfig) -> ApiResult<Self> {
        config.validate()?;
        Self::with_state(AppState::in_memory(config))
    }

    /// Build a server around existing state
    pub fn with_state(state: AppState) -> ApiResult<Self> {
        let bind_addr = state.config.server.socket_addr()?;
        Ok(Self { state, bind_addr })
    }

    /// Shared state handed to handlers
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Router with all routes and middleware
    pub fn router(&self) -> Router {
        all_routes(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> ApiResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.bind_addr)
            .await
            .map_err(|err| ApiError::Internal(format!("Failed to bind {}: {}", self.bind_addr, err)))?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ApiResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = listener
            .local_addr()
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        info!(
            %address,
            environment = ?self.state.config.server.environment,
            "starting CivicOps API"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?;

        info!("CivicOps API stopped");
        Ok(())
    }
}
