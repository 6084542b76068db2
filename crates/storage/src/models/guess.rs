use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Guess {
    pub guess_id: Uuid,
    pub participant_id: Uuid,
    pub wine_id: Uuid,
    pub country: String,
    pub region: String,
    pub producer: String,
    pub name: String,
    pub vintage: String,
    pub varietals: Vec<String>,
    pub notes: Option<String>,
    pub rating: Option<i16>,
    /// Points awarded, `None` until the flight is graded
    pub score: Option<i32>,
    pub submitted_at: DateTime<Utc>,
}
