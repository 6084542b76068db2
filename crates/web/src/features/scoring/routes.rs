use axum::{Router, routing::get};

use super::handlers::{get_scoring_rule, save_scoring_rule};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/tastings/:tasting_id/scoring",
        get(get_scoring_rule).post(save_scoring_rule),
    )
}
