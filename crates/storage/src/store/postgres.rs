use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{CompletedFlight, GuessWrite, TastingStore};
use crate::dto::guess::SubmitGuessRequest;
use crate::error::Result;
use crate::models::{Flight, Participant, ScoringRule, Tasting, Wine};
use crate::repository::flight::FlightRepository;
use crate::repository::guess::GuessRepository;
use crate::repository::participant::ParticipantRepository;
use crate::repository::scoring_rule::ScoringRuleRepository;
use crate::repository::tasting::TastingRepository;
use crate::repository::wine::WineRepository;
use crate::services::grading::{grade_flight, participant_totals};

/// [`TastingStore`] backed by the Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TastingStore for PgStore {
    async fn find_tasting(&self, tasting_id: Uuid) -> Result<Tasting> {
        TastingRepository::new(&self.pool).find_by_id(tasting_id).await
    }

    async fn find_flight(&self, flight_id: Uuid) -> Result<Flight> {
        FlightRepository::new(&self.pool).find_by_id(flight_id).await
    }

    async fn find_wine(&self, wine_id: Uuid) -> Result<Wine> {
        WineRepository::new(&self.pool).find_by_id(wine_id).await
    }

    async fn find_participant(
        &self,
        tasting_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Participant>> {
        ParticipantRepository::new(&self.pool)
            .find(tasting_id, user_id)
            .await
    }

    async fn scoring_rule(&self, tasting_id: Uuid) -> Result<Option<ScoringRule>> {
        ScoringRuleRepository::new(&self.pool).find(tasting_id).await
    }

    async fn mark_started(
        &self,
        flight_id: Uuid,
        started_at: DateTime<Utc>,
        time_limit: Option<i32>,
    ) -> Result<Option<Flight>> {
        FlightRepository::new(&self.pool)
            .mark_started(flight_id, started_at, time_limit)
            .await
    }

    async fn complete_and_grade(
        &self,
        flight_id: Uuid,
        completed_at: DateTime<Utc>,
        rule: &ScoringRule,
        max_varietals: usize,
    ) -> Result<Option<CompletedFlight>> {
        let mut tx = self.pool.begin().await?;

        let Some(flight) = FlightRepository::mark_completed(&mut *tx, flight_id, completed_at).await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let wines = WineRepository::list_in(&mut *tx, flight_id).await?;
        let participants = ParticipantRepository::list_in(&mut *tx, flight.tasting_id).await?;
        let guesses = GuessRepository::list_for_flight(&mut *tx, flight_id).await?;

        let outcome = grade_flight(&wines, &participants, &guesses, rule, max_varietals);
        for assignment in &outcome.assignments {
            GuessRepository::set_score(&mut *tx, assignment.guess_id, assignment.score).await?;
        }

        let all_guesses = GuessRepository::list_for_tasting(&mut *tx, flight.tasting_id).await?;
        let totals = participant_totals(&participants, &all_guesses);
        for (participant_id, total) in &totals {
            ParticipantRepository::set_score(&mut *tx, *participant_id, *total).await?;
        }
        debug!(
            flight_id = %flight_id,
            participants = totals.len(),
            "Participant totals re-derived"
        );

        tx.commit().await?;

        info!(
            flight_id = %flight_id,
            tasting_id = %flight.tasting_id,
            graded = outcome.assignments.len(),
            missing = outcome.missing,
            rejected = outcome.rejected,
            "Flight graded"
        );

        Ok(Some(CompletedFlight {
            flight,
            graded: outcome.assignments.len(),
            missing: outcome.missing,
            rejected: outcome.rejected,
        }))
    }

    async fn upsert_guess(
        &self,
        participant_id: Uuid,
        wine: &Wine,
        guess: &SubmitGuessRequest,
        submitted_at: DateTime<Utc>,
    ) -> Result<GuessWrite> {
        let mut tx = self.pool.begin().await?;

        let flight = FlightRepository::lock_for_share(&mut *tx, wine.flight_id).await?;
        if flight.is_completed() {
            tx.rollback().await?;
            return Ok(GuessWrite::FlightClosed);
        }

        let saved =
            GuessRepository::upsert(&mut *tx, participant_id, wine.wine_id, guess, submitted_at)
                .await?;
        tx.commit().await?;

        Ok(GuessWrite::Saved(saved))
    }
}
