//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all trap handler
//! - Wire up middleware (tracing, request timeout)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain within the grace period

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Notify};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::alert::AlertDelivery;
use crate::config::TrapConfig;
use crate::http::dispatcher::{trap_handler, AppState};
use crate::http::response::{DecoyResponse, ResponseError};
use crate::notification::Notifier;
use crate::registry::TokenRegistry;

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid response configuration: {0}")]
    Response(#[from] ResponseError),

    #[error("server IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the honeytoken trap.
pub struct TrapServer {
    router: Router,
    config: TrapConfig,
}

impl TrapServer {
    /// Create a new server. `config` is expected to be validated already.
    pub fn new(
        config: TrapConfig,
        registry: Arc<dyn TokenRegistry>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ServerError> {
        let response = Arc::new(DecoyResponse::from_config(&config.response)?);
        let alerts = AlertDelivery::new(notifier, config.alerts.max_in_flight);

        let state = AppState {
            registry,
            alerts,
            response,
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// There is no routing table: every method and path reaches the trap.
    #[allow(deprecated)]
    fn build_router(config: &TrapConfig, state: AppState) -> Router {
        Router::new()
            .fallback(trap_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The configured router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests then get the configured grace
    /// period; whatever is still running after that is abandoned, including
    /// detached alert deliveries.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);

        tracing::info!(
            address = %addr,
            response_file = %self.config.response.file,
            content_type = %self.config.response.content_type,
            status_code = self.config.response.status_code,
            "HTTP server starting"
        );

        let draining = Arc::new(Notify::new());
        let draining_tx = Arc::clone(&draining);

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining in-flight requests");
                draining_tx.notify_one();
            })
            .into_future();

        let deadline = async {
            draining.notified().await;
            tokio::time::sleep(grace).await;
        };

        tokio::select! {
            result = serve => result?,
            _ = deadline => {
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "Grace period elapsed, abandoning in-flight requests"
                );
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
