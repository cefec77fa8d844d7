//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the page handler on every path
//! - Wire up middleware (tracing, request ID, timeout)
//! - Bind server to listener and stop on the shutdown signal
//! - Turn a request into a `RequestContext` and render it through the site
//!
//! # Design Decisions
//! - Rendering is synchronous and runs on the blocking pool
//! - The page is buffered so the status can follow the outcome
//! - Errors keep whatever was rendered before the failure as the body

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, Method, StatusCode, Uri},
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

use crate::compose::RequestContext;
use crate::observability::metrics;
use crate::site::{Dispatch, Site};

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

const HTML: &str = "text/html; charset=utf-8";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<Site>,
}

/// HTTP host for a composed site.
pub struct HttpServer {
    router: Router,
    site: Arc<Site>,
}

impl HttpServer {
    pub fn new(site: Arc<Site>) -> Self {
        let router = Self::build_router(Arc::clone(&site));
        Self { router, site }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(site: Arc<Site>) -> Router {
        let timeout = Duration::from_secs(site.config().server.request_timeout_secs);
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/{*path}", any(page_handler))
            .route("/", any(page_handler))
            .with_state(AppState { site })
            .layer(TimeoutLayer::new(timeout))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn site(&self) -> &Arc<Site> {
        &self.site
    }

    /// Run the server until `shutdown` fires.
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
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Render the page for any method and path.
async fn page_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let start_time = Instant::now();
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let path = uri.path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Rendering page"
    );

    let mut request = RequestContext::new(method.as_str(), path.as_str()).with_query(query);
    if let Some(host) = headers.get(header::HOST).and_then(|v| v.to_str().ok()) {
        request = request.with_host(host);
    }

    let site = Arc::clone(&state.site);
    let rendered = tokio::task::spawn_blocking(move || {
        let mut body = String::new();
        let outcome = site.handle(Arc::new(request), &mut body);
        (outcome, body)
    })
    .await;

    let (status, body) = match rendered {
        Ok((Ok(Some(Dispatch { fallback, .. })), body)) => {
            let status = if fallback {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            (status, body)
        }
        Ok((Ok(None), _)) => {
            tracing::warn!(request_id = %request_id, path = %path, "No route matched");
            (StatusCode::NOT_FOUND, "No matching route found".to_string())
        }
        Ok((Err(e), body)) => {
            tracing::error!(
                request_id = %request_id,
                path = %path,
                kind = ?e.kind(),
                error = %e,
                "Page rendering failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, path = %path, error = %e, "Render task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    };

    metrics::record_request(method.as_str(), status.as_u16(), start_time);
    (status, [(header::CONTENT_TYPE, HTML)], body).into_response()
}
