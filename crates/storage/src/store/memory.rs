use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CompletedFlight, GuessWrite, TastingStore};
use crate::dto::guess::SubmitGuessRequest;
use crate::error::{Result, StorageError};
use crate::models::{Flight, Guess, Participant, ScoringRule, Tasting, TastingStatus, Visibility, Wine};
use crate::services::grading::{grade_flight, participant_totals};

#[derive(Default)]
struct Tables {
    tastings: HashMap<Uuid, Tasting>,
    rules: HashMap<Uuid, ScoringRule>,
    flights: HashMap<Uuid, Flight>,
    wines: HashMap<Uuid, Wine>,
    participants: Vec<Participant>,
    guesses: Vec<Guess>,
}

/// In-process [`TastingStore`] with the same guard semantics as Postgres.
///
/// One mutex covers every table, so each trait call is atomic the way a
/// transaction would be.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_tasting(&self, host_id: Uuid, name: &str) -> Tasting {
        let tasting = Tasting {
            tasting_id: Uuid::new_v4(),
            host_id,
            name: name.to_string(),
            status: TastingStatus::Active.as_str().to_string(),
            visibility: Visibility::Public.as_str().to_string(),
            password_hash: None,
            created_at: Utc::now(),
        };
        self.tables
            .lock()
            .await
            .tastings
            .insert(tasting.tasting_id, tasting.clone());
        tasting
    }

    pub async fn insert_flight(&self, tasting_id: Uuid, time_limit: i32) -> Flight {
        let mut tables = self.tables.lock().await;
        let order_index = tables
            .flights
            .values()
            .filter(|f| f.tasting_id == tasting_id)
            .count();
        let flight = Flight {
            flight_id: Uuid::new_v4(),
            tasting_id,
            name: format!("Flight {}", order_index + 1),
            order_index: i32::try_from(order_index).unwrap_or(i32::MAX),
            time_limit,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        };
        tables.flights.insert(flight.flight_id, flight.clone());
        flight
    }

    /// Stores the wine under the given flight, replacing its `flight_id`.
    pub async fn insert_wine(&self, flight_id: Uuid, mut wine: Wine) -> Wine {
        wine.flight_id = flight_id;
        self.tables
            .lock()
            .await
            .wines
            .insert(wine.wine_id, wine.clone());
        wine
    }

    pub async fn join(&self, tasting_id: Uuid, user_id: Uuid) -> Participant {
        let participant = Participant {
            participant_id: Uuid::new_v4(),
            tasting_id,
            user_id,
            score: 0,
            joined_at: Utc::now(),
        };
        self.tables.lock().await.participants.push(participant.clone());
        participant
    }

    pub async fn save_rule(&self, rule: ScoringRule) {
        self.tables.lock().await.rules.insert(rule.tasting_id, rule);
    }

    pub async fn participant(&self, participant_id: Uuid) -> Option<Participant> {
        self.tables
            .lock()
            .await
            .participants
            .iter()
            .find(|p| p.participant_id == participant_id)
            .cloned()
    }

    pub async fn guesses_of(&self, participant_id: Uuid) -> Vec<Guess> {
        self.tables
            .lock()
            .await
            .guesses
            .iter()
            .filter(|g| g.participant_id == participant_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TastingStore for MemoryStore {
    async fn find_tasting(&self, tasting_id: Uuid) -> Result<Tasting> {
        self.tables
            .lock()
            .await
            .tastings
            .get(&tasting_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn find_flight(&self, flight_id: Uuid) -> Result<Flight> {
        self.tables
            .lock()
            .await
            .flights
            .get(&flight_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn find_wine(&self, wine_id: Uuid) -> Result<Wine> {
        self.tables
            .lock()
            .await
            .wines
            .get(&wine_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn find_participant(
        &self,
        tasting_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Participant>> {
        Ok(self
            .tables
            .lock()
            .await
            .participants
            .iter()
            .find(|p| p.tasting_id == tasting_id && p.user_id == user_id)
            .cloned())
    }

    async fn scoring_rule(&self, tasting_id: Uuid) -> Result<Option<ScoringRule>> {
        Ok(self.tables.lock().await.rules.get(&tasting_id).cloned())
    }

    async fn mark_started(
        &self,
        flight_id: Uuid,
        started_at: DateTime<Utc>,
        time_limit: Option<i32>,
    ) -> Result<Option<Flight>> {
        let mut tables = self.tables.lock().await;
        let flight = tables
            .flights
            .get_mut(&flight_id)
            .ok_or(StorageError::NotFound)?;

        if flight.started_at.is_some() {
            return Ok(None);
        }
        flight.started_at = Some(started_at);
        if let Some(limit) = time_limit {
            flight.time_limit = limit;
        }

        Ok(Some(flight.clone()))
    }

    async fn complete_and_grade(
        &self,
        flight_id: Uuid,
        completed_at: DateTime<Utc>,
        rule: &ScoringRule,
        max_varietals: usize,
    ) -> Result<Option<CompletedFlight>> {
        let mut tables = self.tables.lock().await;
        let tables = &mut *tables;

        let flight = tables
            .flights
            .get_mut(&flight_id)
            .ok_or(StorageError::NotFound)?;
        if flight.started_at.is_none() || flight.completed_at.is_some() {
            return Ok(None);
        }
        flight.completed_at = Some(completed_at);
        let flight = flight.clone();

        let wines: Vec<Wine> = tables
            .wines
            .values()
            .filter(|w| w.flight_id == flight_id)
            .cloned()
            .collect();
        let participants: Vec<Participant> = tables
            .participants
            .iter()
            .filter(|p| p.tasting_id == flight.tasting_id)
            .cloned()
            .collect();
        let flight_guesses: Vec<Guess> = tables
            .guesses
            .iter()
            .filter(|g| wines.iter().any(|w| w.wine_id == g.wine_id))
            .cloned()
            .collect();

        let outcome = grade_flight(&wines, &participants, &flight_guesses, rule, max_varietals);
        for assignment in &outcome.assignments {
            if let Some(guess) = tables
                .guesses
                .iter_mut()
                .find(|g| g.guess_id == assignment.guess_id)
            {
                guess.score = Some(assignment.score);
            }
        }

        let totals = participant_totals(&participants, &tables.guesses);
        for participant in tables.participants.iter_mut() {
            if let Some(total) = totals.get(&participant.participant_id) {
                participant.score = *total;
            }
        }

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
        let mut tables = self.tables.lock().await;

        let closed = tables
            .flights
            .get(&wine.flight_id)
            .ok_or(StorageError::NotFound)?
            .is_completed();
        if closed {
            return Ok(GuessWrite::FlightClosed);
        }

        let existing = tables
            .guesses
            .iter()
            .position(|g| g.participant_id == participant_id && g.wine_id == wine.wine_id);
        let guess_id = existing
            .map(|index| tables.guesses[index].guess_id)
            .unwrap_or_else(Uuid::new_v4);

        let saved = Guess {
            guess_id,
            participant_id,
            wine_id: wine.wine_id,
            country: guess.country.trim().to_string(),
            region: guess.region.trim().to_string(),
            producer: guess.producer.trim().to_string(),
            name: guess.name.trim().to_string(),
            vintage: guess.vintage.trim().to_string(),
            varietals: guess.cleaned_varietals(),
            notes: guess.notes.clone(),
            rating: guess.rating,
            score: None,
            submitted_at,
        };

        match existing {
            Some(index) => tables.guesses[index] = saved.clone(),
            None => tables.guesses.push(saved.clone()),
        }

        Ok(GuessWrite::Saved(saved))
    }
}
