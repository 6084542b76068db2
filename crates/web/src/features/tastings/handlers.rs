use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::{
    common::{PaginatedResponse, PaginationParams},
    tasting::{CreateTastingRequest, TastingResponse, UpdateTastingStatusRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tastings",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tastings visible to the caller", body = PaginatedResponse<TastingResponse>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tastings"
)]
pub async fn list_tastings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (tastings, total) =
        services::list_tastings(state.db.pool(), user.user_id, &pagination).await?;
    let data: Vec<TastingResponse> = tastings.into_iter().map(TastingResponse::from).collect();

    Ok(Json(PaginatedResponse::new(data, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tastings/{tasting_id}",
    params(("tasting_id" = Uuid, Path, description = "Tasting id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tasting found", body = TastingResponse),
        (status = 403, description = "Private tasting"),
        (status = 404, description = "Tasting not found")
    ),
    tag = "tastings"
)]
pub async fn get_tasting(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(tasting_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let tasting = services::load_viewable(state.db.pool(), tasting_id, user.user_id).await?;

    Ok(Json(TastingResponse::from(tasting)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tastings",
    request_body = CreateTastingRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Tasting created, caller is its host", body = TastingResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tastings"
)]
pub async fn create_tasting(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateTastingRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let tasting = services::create_tasting(state.db.pool(), user.user_id, &req).await?;

    Ok((StatusCode::CREATED, Json(TastingResponse::from(tasting))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/tastings/{tasting_id}/status",
    params(("tasting_id" = Uuid, Path, description = "Tasting id")),
    request_body = UpdateTastingStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status changed", body = TastingResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not the host"),
        (status = 409, description = "Status can only move forward")
    ),
    tag = "tastings"
)]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(tasting_id): Path<Uuid>,
    Json(req): Json<UpdateTastingStatusRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let tasting =
        services::update_status(state.db.pool(), tasting_id, user.user_id, &req.status).await?;

    Ok(Json(TastingResponse::from(tasting)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/tastings/{tasting_id}",
    params(("tasting_id" = Uuid, Path, description = "Tasting id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Tasting and everything in it deleted"),
        (status = 403, description = "Caller is not the host"),
        (status = 404, description = "Tasting not found")
    ),
    tag = "tastings"
)]
pub async fn delete_tasting(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(tasting_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_tasting(state.db.pool(), tasting_id, user.user_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
