//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatcher as its only handler
//! - Wire up middleware (tracing, request ID)
//! - Validate verb and Content-Type, resolve the route, run the handler
//! - Map every failure to a JSON error envelope
//! - Serve on a listener with graceful shutdown

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::{ErrorKind, TwirpError};
use crate::http::{request, response};
use crate::observability::metrics;
use crate::routing::{normalize_prefix, RouteError, RouteTable, SharedRoutes};

/// State injected into the dispatcher.
#[derive(Clone)]
struct DispatchState {
    routes: SharedRoutes,
    max_body_bytes: usize,
}

/// Twirp server over a swappable route table.
pub struct TwirpServer {
    config: ServerConfig,
    routes: SharedRoutes,
}

impl TwirpServer {
    /// Serve `table`, which must be mounted at `config.prefix`.
    pub fn new(config: ServerConfig, table: RouteTable) -> Result<Self, RouteError> {
        if normalize_prefix(&config.prefix) != table.prefix() {
            return Err(RouteError::PrefixMismatch {
                configured: config.prefix,
                table: table.prefix().to_string(),
            });
        }

        Ok(Self {
            config,
            routes: SharedRoutes::new(table),
        })
    }

    /// Handle for replacing handlers while the server runs.
    pub fn routes(&self) -> SharedRoutes {
        self.routes.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the Axum router with all middleware layers.
    pub fn router(&self) -> Router {
        let state = DispatchState {
            routes: self.routes.clone(),
            max_body_bytes: self.config.max_body_bytes,
        };

        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(request::propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(request::set_request_id_layer())
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let table = self.routes.load();
        tracing::info!(
            address = %addr,
            routes = ?table.route_keys(),
            "Twirp server starting"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Twirp server stopped");
        Ok(())
    }
}

/// The dispatcher.
/// Produces exactly one fully buffered response per request.
async fn dispatch(State(state): State<DispatchState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request::request_id(request.headers()).to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        path = %path,
        "Dispatching request"
    );

    let mut route_label: &str = metrics::UNMATCHED_ROUTE;
    let outcome = handle(&state, request, &path, &mut route_label).await;

    match outcome {
        Ok(response) => {
            metrics::record_call(route_label, "ok", start_time);
            response
        }
        Err(err) => {
            match err.kind() {
                ErrorKind::BadRoute | ErrorKind::Malformed => tracing::warn!(
                    request_id = %request_id,
                    path = %path,
                    code = err.code(),
                    msg = %err.msg(),
                    "Rejected request"
                ),
                ErrorKind::Internal => tracing::error!(
                    request_id = %request_id,
                    path = %path,
                    msg = %err.msg(),
                    "Handler failed"
                ),
                _ => tracing::debug!(
                    request_id = %request_id,
                    path = %path,
                    code = err.code(),
                    msg = %err.msg(),
                    "Handler returned error"
                ),
            }
            metrics::record_call(route_label, err.code(), start_time);
            err.into_response()
        }
    }
}

async fn handle<'a>(
    state: &DispatchState,
    request: Request<Body>,
    path: &'a str,
    route_label: &mut &'a str,
) -> Result<Response, TwirpError> {
    // 1. Verb
    request::check_method(request.method())?;

    // 2. Content-Type, before the route is looked at
    let format = request::negotiate_format(request.headers())?;

    // 3. Route, against the table bound right now
    let handler = state.routes.load().resolve(path)?;
    *route_label = path;

    // 4. Body
    let body = axum::body::to_bytes(request.into_body(), state.max_body_bytes)
        .await
        .map_err(|e| TwirpError::malformed(format!("failed to read request body: {}", e)))?;

    // 5. Handler (decode, invoke, encode)
    let output = handler.call(format, body).await?;

    // 6. Response
    Ok(response::encoded(format, output))
}
