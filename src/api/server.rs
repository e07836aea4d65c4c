use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::extract::{MatchedPath, Request};
use axum::middleware::{Next, from_fn};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use http::StatusCode;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::api::handler::goal_page;
use crate::constants::{CHANNELS, Channel, GOAL_COUNT};
use crate::total::{ResolveErr, TotalResolver};

#[derive(Clone)]
pub struct AppState {
    pub resolver: TotalResolver,
    pub goal: u64,
    pub channels: &'static [Channel],
}

impl AppState {
    pub fn new(resolver: TotalResolver) -> Self {
        Self {
            resolver,
            goal: GOAL_COUNT,
            channels: &CHANNELS,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(goal_page))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                let method = req.method();
                let uri = req.uri();

                let matched_path = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|matched| matched.as_str());

                tracing::debug_span!("api_request", ?method, ?uri, ?matched_path)
            }),
        )
        .layer(from_fn(log_route_errors))
        .with_state(state)
}

/// Binds `0.0.0.0:{port}` and serves until Ctrl-C
#[instrument(skip(state))]
pub async fn serve(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
    let socket_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), port);
    let listener = tokio::net::TcpListener::bind(socket_addr).await?;

    tracing::info!(
        server_url = &format!("http://127.0.0.1:{}", listener.local_addr()?.port()),
        "server ready"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("shutdown signal received");
}

/// Logs any `RouteError` a handler stashed in the response extensions
#[instrument(skip(request, next), fields(uri = request.uri().to_string()))]
async fn log_route_errors(request: Request, next: Next) -> Response {
    let res = next.run(request).await;
    if let Some(err) = res.extensions().get::<Arc<RouteError>>() {
        tracing::error!(error = ?err, "error occurred inside route handler");
    }

    res
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Resolve(#[from] ResolveErr),
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RouteError::Resolve(ResolveErr::Source(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "unable to fetch subscriber counts",
            ),
            RouteError::Resolve(ResolveErr::Cache(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "unable to read cached subscriber count",
            ),
        };

        let mut response = (status, message).into_response();
        response.extensions_mut().insert(Arc::new(self));

        response
    }
}
