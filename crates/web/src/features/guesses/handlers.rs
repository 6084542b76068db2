use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{dto::guess::SubmitGuessRequest, models::Guess};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/wines/{wine_id}/guess",
    params(("wine_id" = Uuid, Path, description = "Wine id")),
    request_body = SubmitGuessRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Guess stored, replacing any earlier one", body = Guess),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller has not joined the tasting"),
        (status = 404, description = "Wine not found"),
        (status = 409, description = "Flight already completed")
    ),
    tag = "guesses"
)]
pub async fn submit_guess(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(wine_id): Path<Uuid>,
    Json(req): Json<SubmitGuessRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let guess = state
        .lifecycle
        .submit_guess(wine_id, user.user_id, &req)
        .await?;

    Ok(Json(guess).into_response())
}

#[utoipa::path(
    get,
    path = "/api/flights/{flight_id}/guesses",
    params(("flight_id" = Uuid, Path, description = "Flight id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's guesses for the flight", body = Vec<Guess>),
        (status = 403, description = "Caller has not joined the tasting"),
        (status = 404, description = "Flight not found")
    ),
    tag = "guesses"
)]
pub async fn list_own_guesses(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(flight_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let guesses = services::own_guesses(state.db.pool(), flight_id, user.user_id).await?;

    Ok(Json(guesses).into_response())
}
