use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Points awarded per correctly guessed attribute, one rule per tasting.
///
/// Each point value lies in `0..=5`; `display_count`, when present, is at
/// least 1 and bounds how many leaderboard entries are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScoringRule {
    pub tasting_id: Uuid,
    pub country: i16,
    pub region: i16,
    pub producer: i16,
    pub wine_name: i16,
    pub vintage: i16,
    pub varietals: i16,
    /// Award the varietal points when any guessed varietal matches, instead
    /// of requiring the exact set
    pub any_varietal_point: bool,
    pub display_count: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl ScoringRule {
    pub const MAX_POINTS: i16 = 5;

    /// Rule applied when a flight is graded before the host saved one:
    /// one point per attribute, any-varietal credit, no display limit.
    pub fn default_for(tasting_id: Uuid) -> Self {
        Self {
            tasting_id,
            country: 1,
            region: 1,
            producer: 1,
            wine_name: 1,
            vintage: 1,
            varietals: 1,
            any_varietal_point: true,
            display_count: None,
            updated_at: Utc::now(),
        }
    }

    /// Highest total a single guess can earn under this rule.
    pub fn max_total(&self) -> u32 {
        [
            self.country,
            self.region,
            self.producer,
            self.wine_name,
            self.vintage,
            self.varietals,
        ]
        .iter()
        .map(|p| u32::from((*p).clamp(0, Self::MAX_POINTS).unsigned_abs()))
        .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_total_sums_all_fields() {
        let mut rule = ScoringRule::default_for(Uuid::new_v4());
        assert_eq!(rule.max_total(), 6);

        rule.country = 5;
        rule.region = 5;
        rule.producer = 5;
        rule.wine_name = 5;
        rule.vintage = 5;
        rule.varietals = 5;
        assert_eq!(rule.max_total(), 30);
    }
}
