use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Points per correctly guessed attribute, each between 0 and 5
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SaveScoringRuleRequest {
    #[validate(range(min = 0, max = 5))]
    pub country: i16,

    #[validate(range(min = 0, max = 5))]
    pub region: i16,

    #[validate(range(min = 0, max = 5))]
    pub producer: i16,

    #[validate(range(min = 0, max = 5))]
    pub wine_name: i16,

    #[validate(range(min = 0, max = 5))]
    pub vintage: i16,

    #[validate(range(min = 0, max = 5))]
    pub varietals: i16,

    #[serde(default)]
    pub any_varietal_point: bool,

    #[validate(range(min = 1, message = "display_count must be at least 1"))]
    pub display_count: Option<i32>,
}
