use axum::{
    Router,
    routing::{get, put},
};

use super::handlers::{create_tasting, delete_tasting, get_tasting, list_tastings, update_status};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tastings", get(list_tastings).post(create_tasting))
        .route(
            "/api/tastings/:tasting_id",
            get(get_tasting).delete(delete_tasting),
        )
        .route("/api/tastings/:tasting_id/status", put(update_status))
}
