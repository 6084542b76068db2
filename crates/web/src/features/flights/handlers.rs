use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::dto::flight::{CreateFlightRequest, FlightResponse, SetTimerRequest};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tastings/{tasting_id}/flights",
    params(("tasting_id" = Uuid, Path, description = "Tasting id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Flights in running order", body = Vec<FlightResponse>),
        (status = 403, description = "Private tasting"),
        (status = 404, description = "Tasting not found")
    ),
    tag = "flights"
)]
pub async fn list_flights(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(tasting_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let now = Utc::now();
    let flights = services::list_flights(state.db.pool(), tasting_id, user.user_id).await?;

    let response: Vec<FlightResponse> = flights
        .into_iter()
        .map(|flight| FlightResponse::at(flight, now))
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tastings/{tasting_id}/flights",
    params(("tasting_id" = Uuid, Path, description = "Tasting id")),
    request_body = CreateFlightRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Flight created", body = FlightResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not the host")
    ),
    tag = "flights"
)]
pub async fn create_flight(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(tasting_id): Path<Uuid>,
    Json(req): Json<CreateFlightRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let flight = services::create_flight(state.db.pool(), tasting_id, user.user_id, &req).await?;

    Ok((StatusCode::CREATED, Json(FlightResponse::from(flight))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/flights/{flight_id}",
    params(("flight_id" = Uuid, Path, description = "Flight id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Flight with its timer state", body = FlightResponse),
        (status = 404, description = "Flight not found")
    ),
    tag = "flights"
)]
pub async fn get_flight(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(flight_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let flight = services::get_flight(state.db.pool(), flight_id, user.user_id).await?;

    Ok(Json(FlightResponse::from(flight)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/flights/{flight_id}/start",
    params(("flight_id" = Uuid, Path, description = "Flight id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Countdown started", body = FlightResponse),
        (status = 403, description = "Caller is not the host"),
        (status = 404, description = "Flight not found"),
        (status = 409, description = "Flight already started")
    ),
    tag = "flights"
)]
pub async fn start_flight(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(flight_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let flight = state.lifecycle.start(flight_id, user.user_id).await?;

    Ok(Json(FlightResponse::from(flight)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/flights/{flight_id}/timer",
    params(("flight_id" = Uuid, Path, description = "Flight id")),
    request_body = SetTimerRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Countdown started with the given length", body = FlightResponse),
        (status = 400, description = "Minutes out of range"),
        (status = 403, description = "Caller is not the host"),
        (status = 404, description = "Flight not found"),
        (status = 409, description = "Flight already started")
    ),
    tag = "flights"
)]
pub async fn set_timer(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(flight_id): Path<Uuid>,
    Json(req): Json<SetTimerRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let flight = state
        .lifecycle
        .set_timer(flight_id, req.minutes, user.user_id)
        .await?;

    Ok(Json(FlightResponse::from(flight)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/flights/{flight_id}/complete",
    params(("flight_id" = Uuid, Path, description = "Flight id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Flight completed and graded", body = FlightResponse),
        (status = 403, description = "Caller is not the host"),
        (status = 404, description = "Flight not found"),
        (status = 409, description = "Flight is not running")
    ),
    tag = "flights"
)]
pub async fn complete_flight(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(flight_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let completed = state.lifecycle.complete(flight_id, user.user_id).await?;

    Ok(Json(FlightResponse::from(completed.flight)).into_response())
}
