pub mod dto;
pub mod handlers;
pub mod metrics;
pub mod repo;

use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/entries",
        get(handlers::list_entries).post(handlers::upsert_entry),
    )
}
