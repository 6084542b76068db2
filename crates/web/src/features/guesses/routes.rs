use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{list_own_guesses, submit_guess};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/wines/:wine_id/guess", post(submit_guess))
        .route("/api/flights/:flight_id/guesses", get(list_own_guesses))
}
