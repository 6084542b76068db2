use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitGuessRequest {
    #[validate(length(max = 255))]
    #[serde(default)]
    pub country: String,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub region: String,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub producer: String,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub name: String,

    #[validate(length(max = 16))]
    #[serde(default)]
    pub vintage: String,

    #[validate(length(min = 1, message = "at least one varietal is required"))]
    #[serde(default)]
    pub varietals: Vec<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,

    #[validate(range(min = 0, max = 100))]
    pub rating: Option<i16>,
}

impl SubmitGuessRequest {
    /// Drops blank entries and surrounding whitespace from the varietal list.
    pub fn cleaned_varietals(&self) -> Vec<String> {
        self.varietals
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_varietals_fail_validation_not_decoding() {
        let request: SubmitGuessRequest =
            serde_json::from_str(r#"{"country":"Frankreich","region":"Burgund"}"#).unwrap();

        assert!(request.varietals.is_empty());
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("varietals"));
    }
}
