pub mod handlers;
pub mod model;
pub mod services;

use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new().route("/forecast", get(handlers::get_forecast))
}
