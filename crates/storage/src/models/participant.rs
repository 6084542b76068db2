use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A user's seat in a tasting.
///
/// `score` caches the sum of the participant's graded guesses. Only the
/// grading pass writes it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participant {
    pub participant_id: Uuid,
    pub tasting_id: Uuid,
    pub user_id: Uuid,
    pub score: i32,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ParticipantWithUser {
    pub participant_id: Uuid,
    pub tasting_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub score: i32,
    pub joined_at: DateTime<Utc>,
}
