//! Application shell for client-side routes
//!
//! The web client navigates with the History API, so a reload on any of its
//! routes reaches the server and must get `index.html` back.

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let path = state.config.frontend.dist_directory.join("index.html");

    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!("Cannot read application shell {:?}: {}", path, e);
            (StatusCode::NOT_FOUND, "Frontend not built").into_response()
        }
    }
}
