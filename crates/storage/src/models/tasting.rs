use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tasting {
    pub tasting_id: Uuid,
    pub host_id: Uuid,
    pub name: String,
    pub status: String,
    pub visibility: String,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Tasting {
    pub fn is_host(&self, user_id: Uuid) -> bool {
        self.host_id == user_id
    }

    pub fn status(&self) -> TastingStatus {
        TastingStatus::parse(&self.status).unwrap_or_default()
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::parse(&self.visibility).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TastingStatus {
    #[default]
    Draft,
    Active,
    Completed,
}

impl TastingStatus {
    pub const ALL: &'static [&'static str] = &["draft", "active", "completed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Status changes only move forward: draft, then active, then completed.
    pub fn can_transition_to(&self, next: TastingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Active) | (Self::Active, Self::Completed)
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub const ALL: &'static [&'static str] = &["public", "private"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_moves_forward() {
        assert!(TastingStatus::Draft.can_transition_to(TastingStatus::Active));
        assert!(TastingStatus::Active.can_transition_to(TastingStatus::Completed));
        assert!(!TastingStatus::Active.can_transition_to(TastingStatus::Draft));
        assert!(!TastingStatus::Completed.can_transition_to(TastingStatus::Active));
        assert!(!TastingStatus::Draft.can_transition_to(TastingStatus::Completed));
    }

    #[test]
    fn test_unknown_status_defaults_to_draft() {
        assert_eq!(TastingStatus::parse("live"), None);
        assert_eq!(TastingStatus::parse("active"), Some(TastingStatus::Active));
    }
}
