use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Wine;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWineRequest {
    #[validate(length(min = 1, max = 3, message = "letter_code must be 1 to 3 characters"))]
    pub letter_code: String,

    #[validate(length(max = 255))]
    pub country: String,

    #[validate(length(max = 255))]
    pub region: String,

    #[validate(length(max = 255))]
    pub producer: String,

    #[validate(length(max = 255))]
    pub name: String,

    #[validate(length(max = 16))]
    pub vintage: String,

    #[validate(length(min = 1, message = "at least one varietal is required"))]
    pub varietals: Vec<String>,

    #[serde(default = "default_is_custom")]
    pub is_custom: bool,
}

fn default_is_custom() -> bool {
    true
}

/// Placeholder shown while a flight is still blind.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HiddenWine {
    pub wine_id: Uuid,
    pub flight_id: Uuid,
    pub letter_code: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum WineView {
    Revealed(Wine),
    Hidden(HiddenWine),
}

impl WineView {
    pub fn new(wine: Wine, revealed: bool) -> Self {
        if revealed {
            Self::Revealed(wine)
        } else {
            Self::Hidden(HiddenWine {
                wine_id: wine.wine_id,
                flight_id: wine.flight_id,
                letter_code: wine.letter_code,
            })
        }
    }
}
