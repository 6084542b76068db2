use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Tasting, TastingStatus, Visibility};

/// Request payload for creating a new tasting
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTastingRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(custom(function = "validate_visibility"))]
    #[serde(default = "default_visibility")]
    pub visibility: String,

    /// Optional join password, only meaningful for private tastings
    #[validate(length(min = 4, max = 128))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTastingStatusRequest {
    #[validate(custom(function = "validate_status"))]
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct JoinTastingRequest {
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TastingResponse {
    pub tasting_id: Uuid,
    pub host_id: Uuid,
    pub name: String,
    pub status: String,
    pub visibility: String,
    pub has_password: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Tasting> for TastingResponse {
    fn from(tasting: Tasting) -> Self {
        Self {
            tasting_id: tasting.tasting_id,
            host_id: tasting.host_id,
            name: tasting.name,
            status: tasting.status,
            visibility: tasting.visibility,
            has_password: tasting.password_hash.is_some(),
            created_at: tasting.created_at,
        }
    }
}

fn default_visibility() -> String {
    Visibility::Public.as_str().to_string()
}

fn validate_visibility(visibility: &str) -> Result<(), validator::ValidationError> {
    if Visibility::ALL.contains(&visibility) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_visibility"))
    }
}

fn validate_status(status: &str) -> Result<(), validator::ValidationError> {
    if TastingStatus::ALL.contains(&status) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_status"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let ok = CreateTastingRequest {
            name: "Friday Burgundy".to_string(),
            visibility: "private".to_string(),
            password: Some("secret".to_string()),
        };
        assert!(ok.validate().is_ok());

        let bad_visibility = CreateTastingRequest {
            visibility: "hidden".to_string(),
            ..ok.clone()
        };
        assert!(bad_visibility.validate().is_err());

        let empty_name = CreateTastingRequest {
            name: String::new(),
            ..ok
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_visibility_defaults_to_public() {
        let req: CreateTastingRequest = serde_json::from_str(r#"{"name": "Open"}"#).unwrap();
        assert_eq!(req.visibility, "public");
        assert!(req.password.is_none());
    }
}
