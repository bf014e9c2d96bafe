use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub const DATASET_ROUTE: &str = "/data/processed/calendar_data.json";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(DATASET_ROUTE, get(handlers::get_dataset))
        .route("/api/months/:year/:month", get(handlers::get_month))
        .with_state(state)
}
