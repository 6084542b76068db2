use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{dto::scoring::SaveScoringRuleRequest, models::ScoringRule};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tastings/{tasting_id}/scoring",
    params(("tasting_id" = Uuid, Path, description = "Tasting id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current scoring rule", body = ScoringRule),
        (status = 404, description = "Tasting not found or no rule saved yet")
    ),
    tag = "scoring"
)]
pub async fn get_scoring_rule(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(tasting_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let rule = services::get_rule(state.db.pool(), tasting_id, user.user_id).await?;

    Ok(Json(rule).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tastings/{tasting_id}/scoring",
    params(("tasting_id" = Uuid, Path, description = "Tasting id")),
    request_body = SaveScoringRuleRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Rule saved", body = ScoringRule),
        (status = 400, description = "Point values out of range"),
        (status = 403, description = "Caller is not the host"),
        (status = 409, description = "A flight has already started")
    ),
    tag = "scoring"
)]
pub async fn save_scoring_rule(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(tasting_id): Path<Uuid>,
    Json(req): Json<SaveScoringRuleRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let rule = services::save_rule(state.db.pool(), tasting_id, user.user_id, &req).await?;

    Ok(Json(rule).into_response())
}
