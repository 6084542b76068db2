use sqlx::PgPool;
use storage::{
    dto::{common::PaginationParams, tasting::CreateTastingRequest},
    error::{Result, StorageError},
    models::{Tasting, TastingStatus, Visibility},
    repository::{participant::ParticipantRepository, tasting::TastingRepository},
    services::authorization::{ensure_host, is_host},
};
use tracing::info;
use uuid::Uuid;

/// Loads a tasting the caller is allowed to look at: public ones, or
/// private ones they host or joined.
pub async fn load_viewable(pool: &PgPool, tasting_id: Uuid, user_id: Uuid) -> Result<Tasting> {
    let tasting = TastingRepository::new(pool).find_by_id(tasting_id).await?;

    if tasting.visibility() == Visibility::Public || is_host(&tasting, user_id) {
        return Ok(tasting);
    }

    match ParticipantRepository::new(pool).find(tasting_id, user_id).await? {
        Some(_) => Ok(tasting),
        None => Err(StorageError::Forbidden(
            "this tasting is private".to_string(),
        )),
    }
}

/// Loads a tasting and checks the caller hosts it.
pub async fn load_hosted(pool: &PgPool, tasting_id: Uuid, user_id: Uuid) -> Result<Tasting> {
    let tasting = TastingRepository::new(pool).find_by_id(tasting_id).await?;
    ensure_host(&tasting, user_id)?;
    Ok(tasting)
}

pub async fn list_tastings(
    pool: &PgPool,
    user_id: Uuid,
    pagination: &PaginationParams,
) -> Result<(Vec<Tasting>, i64)> {
    TastingRepository::new(pool)
        .list_visible(user_id, pagination)
        .await
}

pub async fn create_tasting(
    pool: &PgPool,
    host_id: Uuid,
    request: &CreateTastingRequest,
) -> Result<Tasting> {
    let tasting = TastingRepository::new(pool).create(host_id, request).await?;
    info!(tasting_id = %tasting.tasting_id, host_id = %host_id, "Tasting created");
    Ok(tasting)
}

pub async fn update_status(
    pool: &PgPool,
    tasting_id: Uuid,
    user_id: Uuid,
    status: &str,
) -> Result<Tasting> {
    let tasting = load_hosted(pool, tasting_id, user_id).await?;
    let next = TastingStatus::parse(status)
        .ok_or_else(|| StorageError::Invalid(format!("unknown status '{}'", status)))?;

    if !tasting.status().can_transition_to(next) {
        return Err(StorageError::Conflict(format!(
            "cannot move a {} tasting to {}",
            tasting.status,
            next.as_str()
        )));
    }

    let updated = TastingRepository::new(pool)
        .update_status(tasting_id, next)
        .await?;
    info!(tasting_id = %tasting_id, status = next.as_str(), "Tasting status changed");
    Ok(updated)
}

pub async fn delete_tasting(pool: &PgPool, tasting_id: Uuid, user_id: Uuid) -> Result<()> {
    load_hosted(pool, tasting_id, user_id).await?;
    TastingRepository::new(pool).delete(tasting_id).await?;
    info!(tasting_id = %tasting_id, "Tasting deleted");
    Ok(())
}
