use sqlx::PgPool;
use storage::{
    dto::scoring::SaveScoringRuleRequest,
    error::{Result, StorageError},
    models::ScoringRule,
    repository::scoring_rule::ScoringRuleRepository,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::features::tastings::services::{load_hosted, load_viewable};

pub async fn get_rule(pool: &PgPool, tasting_id: Uuid, user_id: Uuid) -> Result<ScoringRule> {
    load_viewable(pool, tasting_id, user_id).await?;
    ScoringRuleRepository::new(pool)
        .find(tasting_id)
        .await?
        .ok_or(StorageError::NotFound)
}

/// Saves the rule while no flight of the tasting has started yet.
pub async fn save_rule(
    pool: &PgPool,
    tasting_id: Uuid,
    user_id: Uuid,
    request: &SaveScoringRuleRequest,
) -> Result<ScoringRule> {
    load_hosted(pool, tasting_id, user_id).await?;

    match ScoringRuleRepository::new(pool)
        .save_unless_started(tasting_id, request)
        .await?
    {
        Some(rule) => {
            info!(
                tasting_id = %tasting_id,
                max_total = rule.max_total(),
                "Scoring rule saved"
            );
            Ok(rule)
        }
        None => {
            warn!(tasting_id = %tasting_id, "Scoring rule locked, a flight has started");
            Err(StorageError::Conflict(
                "scoring rule cannot change once a flight has started".to_string(),
            ))
        }
    }
}
