use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::wine::{CreateWineRequest, WineView},
    models::Wine,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/flights/{flight_id}/wines",
    params(("flight_id" = Uuid, Path, description = "Flight id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wines, hidden from participants until the flight completes", body = Vec<WineView>),
        (status = 404, description = "Flight not found")
    ),
    tag = "wines"
)]
pub async fn list_wines(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(flight_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let wines = services::list_wines(state.db.pool(), flight_id, user.user_id).await?;

    Ok(Json(wines).into_response())
}

#[utoipa::path(
    post,
    path = "/api/flights/{flight_id}/wines",
    params(("flight_id" = Uuid, Path, description = "Flight id")),
    request_body = CreateWineRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Wine placed in the flight", body = Wine),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not the host"),
        (status = 409, description = "Letter code taken or flight completed")
    ),
    tag = "wines"
)]
pub async fn add_wine(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(flight_id): Path<Uuid>,
    Json(req): Json<CreateWineRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let wine = services::add_wine(
        state.db.pool(),
        flight_id,
        user.user_id,
        &req,
        state.max_varietals,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(wine)).into_response())
}
