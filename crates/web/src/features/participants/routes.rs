use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{get_leaderboard, join_tasting, list_participants};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tastings/:tasting_id/join", post(join_tasting))
        .route("/api/tastings/:tasting_id/participants", get(list_participants))
        .route("/api/tastings/:tasting_id/leaderboard", get(get_leaderboard))
}
