use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub participant_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    pub tasting_id: Uuid,
    pub total_participants: usize,
    pub display_count: Option<i32>,
    pub entries: Vec<LeaderboardEntry>,
}
