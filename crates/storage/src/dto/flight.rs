use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Flight, FlightState};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateFlightRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Position within the tasting; appended after the last flight when omitted
    #[validate(range(min = 0))]
    pub order_index: Option<i32>,

    /// Countdown in seconds
    #[validate(range(min = 10, max = 10800))]
    #[serde(default = "default_time_limit")]
    pub time_limit: i32,
}

fn default_time_limit() -> i32 {
    600
}

/// Starts a flight with an explicit countdown length.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetTimerRequest {
    #[validate(range(min = 1, max = 180, message = "minutes must be between 1 and 180"))]
    pub minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FlightResponse {
    pub flight_id: Uuid,
    pub tasting_id: Uuid,
    pub name: String,
    pub order_index: i32,
    pub time_limit: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub state: FlightState,
    /// Advisory seconds left on the countdown; `None` before the start
    pub remaining_seconds: Option<i64>,
}

impl FlightResponse {
    pub fn at(flight: Flight, now: DateTime<Utc>) -> Self {
        Self {
            state: flight.state(),
            remaining_seconds: flight.remaining_seconds(now),
            flight_id: flight.flight_id,
            tasting_id: flight.tasting_id,
            name: flight.name,
            order_index: flight.order_index,
            time_limit: flight.time_limit,
            started_at: flight.started_at,
            completed_at: flight.completed_at,
        }
    }
}

impl From<Flight> for FlightResponse {
    fn from(flight: Flight) -> Self {
        Self::at(flight, Utc::now())
    }
}
