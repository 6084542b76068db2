use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notifications pushed to clients watching a tasting.
///
/// Delivery is best-effort and at-most-once. Clients treat every message as a
/// hint to re-fetch and must ignore types they do not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TastingEvent {
    #[serde(rename_all = "camelCase")]
    TimerStarted {
        flight_id: Uuid,
        time_limit: i32,
        started_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    FlightCompleted {
        flight_id: Uuid,
        completed_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    ScoresUpdated { flight_id: Uuid },
}

impl TastingEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TimerStarted { .. } => "timer_started",
            Self::FlightCompleted { .. } => "flight_completed",
            Self::ScoresUpdated { .. } => "scores_updated",
        }
    }
}

/// Fan-out sink for [`TastingEvent`]s. Publishing never fails the caller.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, tasting_id: Uuid, event: TastingEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let flight_id = Uuid::nil();
        let started_at = DateTime::parse_from_rfc3339("2024-05-01T18:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let json = serde_json::to_value(TastingEvent::TimerStarted {
            flight_id,
            time_limit: 600,
            started_at,
        })
        .unwrap();

        assert_eq!(json["type"], "timer_started");
        assert_eq!(json["flightId"], flight_id.to_string());
        assert_eq!(json["timeLimit"], 600);
        assert!(json["startedAt"].is_string());

        let json = serde_json::to_value(TastingEvent::ScoresUpdated { flight_id }).unwrap();
        assert_eq!(json["type"], "scores_updated");
    }
}
