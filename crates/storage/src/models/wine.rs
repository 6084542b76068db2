use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Wine {
    pub wine_id: Uuid,
    pub flight_id: Uuid,
    /// Anonymous label shown to participants until the flight is revealed
    pub letter_code: String,
    pub country: String,
    pub region: String,
    pub producer: String,
    pub name: String,
    /// Text so that non-numeric vintages such as "N.V." survive
    pub vintage: String,
    pub varietals: Vec<String>,
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
}
