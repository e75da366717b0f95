//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app with a single catch-all handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch requests through the device route table
//! - Serve on a listener until shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{self, Body, Bytes},
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::TokenVerifier;
use crate::config::ServerConfig;
use crate::http::error::ApiError;
use crate::http::handlers::{self, Handler};
use crate::http::request::RouteRequest;
use crate::observability::metrics;
use crate::routing::Router as DeviceRouter;
use crate::store::TenantStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<DeviceRouter<Handler>>,
    pub tenants: TenantStore,
    pub verifier: Arc<TokenVerifier>,
    pub max_body_size: usize,
}

impl AppState {
    /// Fresh state with empty tenant storage.
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_tenants(config, TenantStore::new())
    }

    /// State backed by an existing tenant store.
    pub fn with_tenants(config: &ServerConfig, tenants: TenantStore) -> Self {
        Self {
            router: Arc::new(handlers::routes()),
            tenants,
            verifier: Arc::new(TokenVerifier::new(&config.auth.cluster_key)),
            max_body_size: config.limits.max_body_size,
        }
    }
}

/// HTTP server for the fake device API.
pub struct HttpServer {
    router: Router,
    tenants: TenantStore,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_tenants(config, TenantStore::new())
    }

    /// Create a server that serves (and mutates) `tenants`.
    pub fn with_tenants(config: ServerConfig, tenants: TenantStore) -> Self {
        let state = AppState::with_tenants(&config, tenants.clone());
        for route in state.router.routes() {
            tracing::debug!(
                route = route.name,
                method = %route.method,
                template = route.template.as_str(),
                reads_body = route.reads_body,
                "Registered route"
            );
        }

        let router = Self::build_router(&config, state);
        Self { router, tenants }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The Axum app, for driving requests in-process.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn tenants(&self) -> &TenantStore {
        &self.tenants
    }

    /// Run the server until `shutdown` fires (or its sender is dropped).
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: match the route, buffer the body if the route reads one, run the handler.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let method = parts.method.clone();
    let path = parts.uri.path().to_string();
    let request_id = parts
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let Some(matched) = state.router.match_route(&method, &path) else {
        tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
        metrics::record_request("none", method.as_str(), 404, start_time);
        return ApiError::RouteNotFound {
            method: method.to_string(),
            path,
        }
        .into_response();
    };
    let route_name = matched.route.name;

    // Only routes that decode a body read it; the rest accept any body.
    let body = if matched.route.reads_body {
        match body::to_bytes(body, state.max_body_size).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(request_id = %request_id, route = route_name, error = %e, "Failed to read body");
                metrics::record_request(route_name, method.as_str(), 400, start_time);
                return ApiError::MalformedBody(e.to_string()).into_response();
            }
        }
    } else {
        Bytes::new()
    };

    let route_request = RouteRequest {
        params: matched.params,
        headers: parts.headers,
        body,
    };

    let response = match (matched.route.handler)(&state, &route_request) {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            tracing::debug!(request_id = %request_id, route = route_name, error = %e, "Request rejected");
            e.into_response()
        }
    };

    let status = response.status();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(request_id = %request_id, route = route_name, "Handler failed");
    }
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route_name,
        status = status.as_u16(),
        "Request handled"
    );
    metrics::record_request(route_name, method.as_str(), status.as_u16(), start_time);

    response
}
