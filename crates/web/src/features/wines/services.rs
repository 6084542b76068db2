use sqlx::PgPool;
use storage::{
    canonical::canonicalize_country,
    dto::wine::{CreateWineRequest, WineView},
    error::{Result, StorageError},
    models::Wine,
    repository::{flight::FlightRepository, wine::WineRepository},
    services::authorization::is_host,
};
use tracing::info;
use uuid::Uuid;

use crate::features::tastings::services::{load_hosted, load_viewable};

/// Wines of a flight. Everyone but the host sees only letter codes until the
/// flight is completed.
pub async fn list_wines(pool: &PgPool, flight_id: Uuid, user_id: Uuid) -> Result<Vec<WineView>> {
    let flight = FlightRepository::new(pool).find_by_id(flight_id).await?;
    let tasting = load_viewable(pool, flight.tasting_id, user_id).await?;
    let revealed = flight.is_completed() || is_host(&tasting, user_id);

    let wines = WineRepository::new(pool).list_by_flight(flight_id).await?;

    Ok(wines
        .into_iter()
        .map(|wine| WineView::new(wine, revealed))
        .collect())
}

pub async fn add_wine(
    pool: &PgPool,
    flight_id: Uuid,
    user_id: Uuid,
    request: &CreateWineRequest,
    max_varietals: usize,
) -> Result<Wine> {
    let flight = FlightRepository::new(pool).find_by_id(flight_id).await?;
    load_hosted(pool, flight.tasting_id, user_id).await?;

    if flight.is_completed() {
        return Err(StorageError::Conflict(
            "flight is completed, its wines are fixed".to_string(),
        ));
    }

    let varietals: Vec<String> = request
        .varietals
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    if varietals.is_empty() || varietals.len() > max_varietals {
        return Err(StorageError::Invalid(format!(
            "a wine has between 1 and {} varietals",
            max_varietals
        )));
    }

    let request = CreateWineRequest {
        varietals,
        ..request.clone()
    };
    let country = canonicalize_country(&request.country);

    let wine = WineRepository::new(pool)
        .create(flight_id, &request, &country)
        .await?;
    info!(
        wine_id = %wine.wine_id,
        flight_id = %flight_id,
        letter_code = %wine.letter_code,
        "Wine added"
    );
    Ok(wine)
}
