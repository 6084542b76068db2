use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Flight {
    pub flight_id: Uuid,
    pub tasting_id: Uuid,
    pub name: String,
    pub order_index: i32,
    /// Countdown length in seconds
    pub time_limit: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle position derived from the two timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FlightState {
    NotStarted,
    Running,
    Completed,
}

impl Flight {
    pub fn state(&self) -> FlightState {
        match (self.started_at, self.completed_at) {
            (_, Some(_)) => FlightState::Completed,
            (Some(_), None) => FlightState::Running,
            (None, None) => FlightState::NotStarted,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Advisory end of the countdown. Nothing on the server acts on it.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.started_at
            .map(|started| started + Duration::seconds(i64::from(self.time_limit)))
    }

    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        if self.is_completed() {
            return Some(0);
        }
        self.deadline()
            .map(|deadline| (deadline - now).num_seconds().max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight() -> Flight {
        Flight {
            flight_id: Uuid::new_v4(),
            tasting_id: Uuid::new_v4(),
            name: "Flight 1".to_string(),
            order_index: 0,
            time_limit: 600,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_state_follows_timestamps() {
        let mut f = flight();
        assert_eq!(f.state(), FlightState::NotStarted);

        f.started_at = Some(Utc::now());
        assert_eq!(f.state(), FlightState::Running);

        f.completed_at = Some(Utc::now());
        assert_eq!(f.state(), FlightState::Completed);
    }

    #[test]
    fn test_remaining_seconds_counts_down_and_clamps() {
        let mut f = flight();
        assert_eq!(f.remaining_seconds(Utc::now()), None);

        let start = Utc::now();
        f.started_at = Some(start);
        assert_eq!(f.remaining_seconds(start + Duration::seconds(100)), Some(500));
        assert_eq!(f.remaining_seconds(start + Duration::seconds(900)), Some(0));

        f.completed_at = Some(start + Duration::seconds(10));
        assert_eq!(f.remaining_seconds(start + Duration::seconds(20)), Some(0));
    }
}
