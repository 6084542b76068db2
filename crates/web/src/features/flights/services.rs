use sqlx::PgPool;
use storage::{
    dto::flight::CreateFlightRequest,
    error::Result,
    models::Flight,
    repository::flight::FlightRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::features::tastings::services::{load_hosted, load_viewable};

pub async fn list_flights(pool: &PgPool, tasting_id: Uuid, user_id: Uuid) -> Result<Vec<Flight>> {
    load_viewable(pool, tasting_id, user_id).await?;
    FlightRepository::new(pool).list_by_tasting(tasting_id).await
}

pub async fn get_flight(pool: &PgPool, flight_id: Uuid, user_id: Uuid) -> Result<Flight> {
    let flight = FlightRepository::new(pool).find_by_id(flight_id).await?;
    load_viewable(pool, flight.tasting_id, user_id).await?;
    Ok(flight)
}

pub async fn create_flight(
    pool: &PgPool,
    tasting_id: Uuid,
    user_id: Uuid,
    request: &CreateFlightRequest,
) -> Result<Flight> {
    load_hosted(pool, tasting_id, user_id).await?;

    let flight = FlightRepository::new(pool).create(tasting_id, request).await?;
    info!(
        flight_id = %flight.flight_id,
        tasting_id = %tasting_id,
        order_index = flight.order_index,
        "Flight created"
    );
    Ok(flight)
}
