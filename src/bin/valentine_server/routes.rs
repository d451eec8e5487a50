//! HTTP route registration for the valentine server.

use axum::routing::{get, post};

use super::*;

pub(super) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(load_page))
        .route("/create", post(create_link))
        .route("/intro", post(submit_intro))
        .route("/respond", post(respond))
        .fallback(fallback)
        .with_state(state)
}
