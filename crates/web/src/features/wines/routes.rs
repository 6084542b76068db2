use axum::{Router, routing::get};

use super::handlers::{add_wine, list_wines};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/flights/:flight_id/wines",
        get(list_wines).post(add_wine),
    )
}
