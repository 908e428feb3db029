//! Per-request trap pipeline.
//!
//! ```text
//! Received → Classified → Looked-Up ─┬─ Matched → alert spawned (detached) ─┐
//!                                    └─ Unmatched ──────────────────────────┴→ Responding → Done
//! ```
//!
//! Every branch converges on the same `DecoyResponse::render` call, so a hit,
//! a miss and a registry failure are indistinguishable to the client. The only
//! early exit is a body read failure, which no branch has seen yet.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::Instrument;
use uuid::Uuid;

use crate::alert::{compose_alert, AlertDelivery};
use crate::http::request::RequestContext;
use crate::http::response::DecoyResponse;
use crate::observability::metrics;
use crate::registry::{Honeytoken, TokenRegistry};

/// Shared, read-only state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn TokenRegistry>,
    pub alerts: AlertDelivery,
    pub response: Arc<DecoyResponse>,
    pub max_body_bytes: usize,
}

/// Catch-all handler: every method, every path.
pub async fn trap_handler(
    State(state): State<AppState>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let span = tracing::info_span!("trap", request_id = %Uuid::new_v4());
    dispatch(&state, remote_addr, request).instrument(span).await
}

/// Run one request through the trap.
pub async fn dispatch(state: &AppState, remote_addr: SocketAddr, request: Request<Body>) -> Response {
    let start = Instant::now();

    // Received → Classified
    let (parts, body) = request.into_parts();
    let mut ctx = RequestContext::from_parts(&parts, remote_addr);

    tracing::info!(
        method = %ctx.method,
        uri = %ctx.uri,
        client_ip = %ctx.client_ip,
        remote_addr = %ctx.remote_addr,
        "Incoming request"
    );

    if let Err(e) = ctx.read_body(body, state.max_body_bytes).await {
        tracing::error!(error = %e, "Aborting request");
        metrics::record_request(ctx.method.as_str(), start);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    tracing::debug!(
        headers = %ctx.header_block(),
        body = %ctx.body_text(),
        "Request captured"
    );

    // Classified → Looked-Up
    if let Some(token) = lookup(state, ctx.lookup_key()).await {
        tracing::info!(
            token_id = token.id,
            title = %token.title,
            client_ip = %ctx.client_ip,
            "Honeytoken triggered"
        );
        metrics::record_trigger();

        // Matched → Notifying. The handle is dropped on purpose.
        drop(state.alerts.dispatch(compose_alert(&token, &ctx)));
    }

    // Responding → Done
    let response = state.response.render().await;
    metrics::record_request(ctx.method.as_str(), start);
    response
}

/// Registry lookup with every failure folded into "no token".
async fn lookup(state: &AppState, key: &str) -> Option<Honeytoken> {
    match state.registry.find(key).await {
        Ok(token) if token.is_stored() => Some(token),
        Ok(_) => {
            tracing::debug!("Registry returned the zero-id sentinel, treating as a miss");
            None
        }
        Err(e) if e.is_not_found() => {
            tracing::debug!("No token registered for this URL");
            None
        }
        Err(e) => {
            // Behave as a miss to prevent token enumeration.
            tracing::warn!(error = %e, "Token lookup failed");
            metrics::record_lookup_error();
            None
        }
    }
}
