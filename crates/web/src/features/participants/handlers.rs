use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::{participant::LeaderboardResponse, tasting::JoinTastingRequest},
    models::{Participant, ParticipantWithUser},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/tastings/{tasting_id}/join",
    params(("tasting_id" = Uuid, Path, description = "Tasting id")),
    request_body = JoinTastingRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Joined", body = Participant),
        (status = 403, description = "Missing or wrong tasting password"),
        (status = 404, description = "Tasting not found"),
        (status = 409, description = "Already joined or tasting is over")
    ),
    tag = "participants"
)]
pub async fn join_tasting(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(tasting_id): Path<Uuid>,
    req: Option<Json<JoinTastingRequest>>,
) -> Result<Response, WebError> {
    let req = req.map(|Json(req)| req).unwrap_or_default();

    let participant = services::join_tasting(
        state.db.pool(),
        tasting_id,
        user.user_id,
        req.password.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(participant)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tastings/{tasting_id}/participants",
    params(("tasting_id" = Uuid, Path, description = "Tasting id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Participants in join order", body = Vec<ParticipantWithUser>),
        (status = 403, description = "Private tasting"),
        (status = 404, description = "Tasting not found")
    ),
    tag = "participants"
)]
pub async fn list_participants(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(tasting_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let participants =
        services::list_participants(state.db.pool(), tasting_id, user.user_id).await?;

    Ok(Json(participants).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tastings/{tasting_id}/leaderboard",
    params(("tasting_id" = Uuid, Path, description = "Tasting id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ranked participants", body = LeaderboardResponse),
        (status = 403, description = "Private tasting"),
        (status = 404, description = "Tasting not found")
    ),
    tag = "participants"
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(tasting_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let board = services::leaderboard(state.db.pool(), tasting_id, user.user_id).await?;

    Ok(Json(board).into_response())
}
