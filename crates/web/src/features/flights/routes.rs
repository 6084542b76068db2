use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    complete_flight, create_flight, get_flight, list_flights, set_timer, start_flight,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/tastings/:tasting_id/flights",
            get(list_flights).post(create_flight),
        )
        .route("/api/flights/:flight_id", get(get_flight))
        .route("/api/flights/:flight_id/start", post(start_flight))
        .route("/api/flights/:flight_id/timer", post(set_timer))
        .route("/api/flights/:flight_id/complete", post(complete_flight))
}
