use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/static/*path", get(handlers::static_asset))
        .route("/api/charts", get(handlers::get_charts))
        .route("/api/charts/reload", post(handlers::reload_charts))
        .route("/api/charts/retry", post(handlers::retry_charts))
        .route("/api/fields", post(handlers::update_fields))
        .with_state(state)
}
