//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::{Config, ServerState};
use crate::utils::AppError;

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Public
        .merge(crate::api::health::router())
        // Data model APIs (auth via the CurrentUser extractor)
        .merge(crate::api::inventory::router())
        .merge(crate::api::orders::router())
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for sharing with tests)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        // Start background tasks (connection watchdog)
        state.start_background_tasks();

        let app = build_app()
            .with_state(state.clone())
            // Tower HTTP 中间件
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_millis(
                self.config.request_timeout_ms,
            )))
            .layer(ConcurrencyLimitLayer::new(self.config.max_connections));

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        tracing::info!(
            environment = %self.config.environment,
            "🧺 Larder Server listening on {}",
            addr
        );

        // Graceful shutdown: stop accepting, drain in-flight requests, and
        // force-exit if the drain exceeds the bounded timeout
        let shutdown_timeout = Duration::from_millis(self.config.shutdown_timeout_ms);
        let shutdown = async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received, draining in-flight requests...");

            tokio::spawn(async move {
                tokio::time::sleep(shutdown_timeout).await;
                tracing::warn!(
                    "Shutdown drain exceeded {:?}, exiting forcibly",
                    shutdown_timeout
                );
                std::process::exit(1);
            });
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        // In-flight work is drained; stop the watchdog and release the handle
        state.db.shutdown();
        tracing::info!("Server stopped");

        Ok(())
    }
}
