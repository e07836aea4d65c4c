use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use tracing::instrument;

use crate::api::page;
use crate::api::server::{AppState, RouteError};

/// `GET /`
#[instrument(skip(state))]
pub async fn goal_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, RouteError> {
    let count = state.resolver.resolve().await?;
    tracing::debug!(count, goal = state.goal, "rendering goal page");

    Ok(Html(page::render(count, state.goal, state.channels)))
}
