//! Persistence seam for the flight lifecycle.
//!
//! The lifecycle manager only talks to a [`TastingStore`]; Postgres backs it
//! in production and [`MemoryStore`] stands in for it in tests.

#[cfg(any(test, feature = "memory-store"))]
mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dto::guess::SubmitGuessRequest;
use crate::error::Result;
use crate::models::{Flight, Guess, Participant, ScoringRule, Tasting, Wine};

#[cfg(any(test, feature = "memory-store"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result of a completion that won the conditional update.
#[derive(Debug, Clone)]
pub struct CompletedFlight {
    pub flight: Flight,
    pub graded: usize,
    pub missing: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone)]
pub enum GuessWrite {
    Saved(Guess),
    /// The flight was completed before the write could land
    FlightClosed,
}

#[async_trait]
pub trait TastingStore: Send + Sync {
    async fn find_tasting(&self, tasting_id: Uuid) -> Result<Tasting>;

    async fn find_flight(&self, flight_id: Uuid) -> Result<Flight>;

    async fn find_wine(&self, wine_id: Uuid) -> Result<Wine>;

    async fn find_participant(&self, tasting_id: Uuid, user_id: Uuid)
    -> Result<Option<Participant>>;

    async fn scoring_rule(&self, tasting_id: Uuid) -> Result<Option<ScoringRule>>;

    /// Sets `started_at` (and `time_limit` when given) only if the flight has
    /// not started yet. Returns `None` when the guard did not match.
    async fn mark_started(
        &self,
        flight_id: Uuid,
        started_at: DateTime<Utc>,
        time_limit: Option<i32>,
    ) -> Result<Option<Flight>>;

    /// Sets `completed_at` only on a running flight, then grades every guess
    /// of the flight and re-derives participant totals, all atomically.
    /// Returns `None`, having written nothing, when the guard did not match.
    async fn complete_and_grade(
        &self,
        flight_id: Uuid,
        completed_at: DateTime<Utc>,
        rule: &ScoringRule,
        max_varietals: usize,
    ) -> Result<Option<CompletedFlight>>;

    /// Inserts or overwrites the participant's guess for a wine unless the
    /// wine's flight has been completed.
    async fn upsert_guess(
        &self,
        participant_id: Uuid,
        wine: &Wine,
        guess: &SubmitGuessRequest,
        submitted_at: DateTime<Utc>,
    ) -> Result<GuessWrite>;
}
