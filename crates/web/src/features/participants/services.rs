use sqlx::PgPool;
use storage::{
    dto::participant::LeaderboardResponse,
    error::{Result, StorageError},
    models::{Participant, ParticipantWithUser, TastingStatus},
    repository::{
        participant::ParticipantRepository, scoring_rule::ScoringRuleRepository,
        tasting::TastingRepository,
    },
    services::{authorization::verify_tasting_password, leaderboard::rank},
};
use tracing::info;
use uuid::Uuid;

use crate::features::tastings::services::load_viewable;

pub async fn join_tasting(
    pool: &PgPool,
    tasting_id: Uuid,
    user_id: Uuid,
    password: Option<&str>,
) -> Result<Participant> {
    let tasting = TastingRepository::new(pool).find_by_id(tasting_id).await?;

    if tasting.status() == TastingStatus::Completed {
        return Err(StorageError::Conflict("tasting is over".to_string()));
    }
    verify_tasting_password(&tasting, password)?;

    let participant = ParticipantRepository::new(pool)
        .join(tasting_id, user_id)
        .await?;
    info!(tasting_id = %tasting_id, user_id = %user_id, "Participant joined");
    Ok(participant)
}

pub async fn list_participants(
    pool: &PgPool,
    tasting_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<ParticipantWithUser>> {
    load_viewable(pool, tasting_id, user_id).await?;
    ParticipantRepository::new(pool)
        .list_with_users(tasting_id)
        .await
}

/// Ranked view of the cached participant totals, cut to the rule's
/// `display_count` when one is set.
pub async fn leaderboard(
    pool: &PgPool,
    tasting_id: Uuid,
    user_id: Uuid,
) -> Result<LeaderboardResponse> {
    load_viewable(pool, tasting_id, user_id).await?;

    let display_count = ScoringRuleRepository::new(pool)
        .find(tasting_id)
        .await?
        .and_then(|rule| rule.display_count);
    let participants = ParticipantRepository::new(pool)
        .list_with_users(tasting_id)
        .await?;
    let total_participants = participants.len();

    Ok(LeaderboardResponse {
        tasting_id,
        total_participants,
        display_count,
        entries: rank(participants, display_count),
    })
}
