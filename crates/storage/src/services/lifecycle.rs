use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::guess::SubmitGuessRequest;
use crate::error::{Result, StorageError};
use crate::events::{EventPublisher, TastingEvent};
use crate::models::{Flight, Guess, ScoringRule};
use crate::services::authorization::ensure_host;
use crate::store::{CompletedFlight, GuessWrite, TastingStore};

pub const MIN_TIMER_MINUTES: i32 = 1;
pub const MAX_TIMER_MINUTES: i32 = 180;

/// Drives a flight through NotStarted, Running and Completed.
///
/// Every transition is a conditional write in the store, so two hosts
/// pressing the same button race on the database and only one of them wins.
/// Events go out after the write is durable and never fail the caller.
#[derive(Clone)]
pub struct FlightLifecycle {
    store: Arc<dyn TastingStore>,
    events: Arc<dyn EventPublisher>,
    max_varietals: usize,
}

impl FlightLifecycle {
    pub fn new(
        store: Arc<dyn TastingStore>,
        events: Arc<dyn EventPublisher>,
        max_varietals: usize,
    ) -> Self {
        Self {
            store,
            events,
            max_varietals,
        }
    }

    pub fn max_varietals(&self) -> usize {
        self.max_varietals
    }

    /// Starts the countdown with the flight's stored time limit.
    pub async fn start(&self, flight_id: Uuid, caller: Uuid) -> Result<Flight> {
        self.begin(flight_id, caller, None).await
    }

    /// Starts the countdown with a host-chosen length.
    pub async fn set_timer(&self, flight_id: Uuid, minutes: i32, caller: Uuid) -> Result<Flight> {
        self.begin(flight_id, caller, Some(minutes)).await
    }

    async fn begin(&self, flight_id: Uuid, caller: Uuid, minutes: Option<i32>) -> Result<Flight> {
        let flight = self.store.find_flight(flight_id).await?;
        let tasting = self.store.find_tasting(flight.tasting_id).await?;
        ensure_host(&tasting, caller)?;

        let time_limit = match minutes {
            Some(m) if !(MIN_TIMER_MINUTES..=MAX_TIMER_MINUTES).contains(&m) => {
                return Err(StorageError::Invalid(format!(
                    "timer must be between {} and {} minutes",
                    MIN_TIMER_MINUTES, MAX_TIMER_MINUTES
                )));
            }
            Some(m) => Some(m * 60),
            None => None,
        };

        let Some(started) = self
            .store
            .mark_started(flight_id, Utc::now(), time_limit)
            .await?
        else {
            warn!(flight_id = %flight_id, "Start rejected, flight already started");
            return Err(StorageError::Conflict("flight has already started".to_string()));
        };

        info!(
            flight_id = %flight_id,
            tasting_id = %started.tasting_id,
            time_limit = started.time_limit,
            "Flight started"
        );

        if let Some(started_at) = started.started_at {
            self.events.publish(
                started.tasting_id,
                TastingEvent::TimerStarted {
                    flight_id,
                    time_limit: started.time_limit,
                    started_at,
                },
            );
        }

        Ok(started)
    }

    /// Closes the flight and grades it. Only the first successful call grades.
    pub async fn complete(&self, flight_id: Uuid, caller: Uuid) -> Result<CompletedFlight> {
        let flight = self.store.find_flight(flight_id).await?;
        let tasting = self.store.find_tasting(flight.tasting_id).await?;
        ensure_host(&tasting, caller)?;

        let rule = self
            .store
            .scoring_rule(tasting.tasting_id)
            .await?
            .unwrap_or_else(|| ScoringRule::default_for(tasting.tasting_id));

        let Some(completed) = self
            .store
            .complete_and_grade(flight_id, Utc::now(), &rule, self.max_varietals)
            .await?
        else {
            warn!(
                flight_id = %flight_id,
                state = ?flight.state(),
                "Completion rejected, flight is not running"
            );
            return Err(StorageError::Conflict(
                "flight is not running".to_string(),
            ));
        };

        info!(
            flight_id = %flight_id,
            tasting_id = %tasting.tasting_id,
            graded = completed.graded,
            missing = completed.missing,
            rejected = completed.rejected,
            "Flight completed"
        );

        if let Some(completed_at) = completed.flight.completed_at {
            self.events.publish(
                tasting.tasting_id,
                TastingEvent::FlightCompleted {
                    flight_id,
                    completed_at,
                },
            );
        }
        self.events
            .publish(tasting.tasting_id, TastingEvent::ScoresUpdated { flight_id });

        Ok(completed)
    }

    /// Stores or overwrites the caller's guess for a wine while its flight is open.
    pub async fn submit_guess(
        &self,
        wine_id: Uuid,
        caller: Uuid,
        guess: &SubmitGuessRequest,
    ) -> Result<Guess> {
        let wine = self.store.find_wine(wine_id).await?;
        let flight = self.store.find_flight(wine.flight_id).await?;

        let Some(participant) = self
            .store
            .find_participant(flight.tasting_id, caller)
            .await?
        else {
            return Err(StorageError::Forbidden(
                "join the tasting before guessing".to_string(),
            ));
        };

        let varietals = guess.cleaned_varietals();
        if varietals.is_empty() || varietals.len() > self.max_varietals {
            return Err(StorageError::Invalid(format!(
                "guess between 1 and {} varietals",
                self.max_varietals
            )));
        }

        match self
            .store
            .upsert_guess(participant.participant_id, &wine, guess, Utc::now())
            .await?
        {
            GuessWrite::Saved(saved) => Ok(saved),
            GuessWrite::FlightClosed => {
                warn!(
                    wine_id = %wine_id,
                    participant_id = %participant.participant_id,
                    "Guess rejected, flight already completed"
                );
                Err(StorageError::Conflict(
                    "flight is completed, guesses are closed".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::models::Wine;
    use crate::services::scoring::tests::{rule, wine};
    use crate::store::MemoryStore;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(Uuid, TastingEvent)>>,
    }

    impl Recorder {
        fn kinds(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().iter().map(|(_, e)| e.kind()).collect()
        }
    }

    impl EventPublisher for Recorder {
        fn publish(&self, tasting_id: Uuid, event: TastingEvent) {
            self.events.lock().unwrap().push((tasting_id, event));
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        events: Arc<Recorder>,
        lifecycle: FlightLifecycle,
        host: Uuid,
        tasting_id: Uuid,
        flight: Flight,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let events = Arc::new(Recorder::default());
        let host = Uuid::new_v4();
        let tasting = store.insert_tasting(host, "Friday blind").await;
        let flight = store.insert_flight(tasting.tasting_id, 600).await;
        let lifecycle = FlightLifecycle::new(store.clone(), events.clone(), 3);

        Fixture {
            store,
            events,
            lifecycle,
            host,
            tasting_id: tasting.tasting_id,
            flight,
        }
    }

    fn answer(wine: &Wine) -> SubmitGuessRequest {
        SubmitGuessRequest {
            country: wine.country.clone(),
            region: wine.region.clone(),
            producer: wine.producer.clone(),
            name: wine.name.clone(),
            vintage: wine.vintage.clone(),
            varietals: wine.varietals.clone(),
            notes: None,
            rating: Some(88),
        }
    }

    #[tokio::test]
    async fn test_start_runs_once_and_publishes() {
        let f = fixture().await;

        let started = f.lifecycle.start(f.flight.flight_id, f.host).await.unwrap();
        assert!(started.started_at.is_some());
        assert_eq!(started.time_limit, 600);

        let again = f.lifecycle.start(f.flight.flight_id, f.host).await;
        assert!(matches!(again, Err(StorageError::Conflict(_))));
        assert_eq!(f.events.kinds(), vec!["timer_started"]);

        let stored = f.store.find_flight(f.flight.flight_id).await.unwrap();
        assert_eq!(stored.started_at, started.started_at);
        assert!(stored.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_non_host_changes_nothing() {
        let f = fixture().await;
        let guest = Uuid::new_v4();

        assert!(matches!(
            f.lifecycle.start(f.flight.flight_id, guest).await,
            Err(StorageError::Forbidden(_))
        ));
        assert!(matches!(
            f.lifecycle.set_timer(f.flight.flight_id, 10, guest).await,
            Err(StorageError::Forbidden(_))
        ));
        assert!(matches!(
            f.lifecycle.complete(f.flight.flight_id, guest).await,
            Err(StorageError::Forbidden(_))
        ));

        let flight = f.store.find_flight(f.flight.flight_id).await.unwrap();
        assert!(flight.started_at.is_none());
        assert!(f.events.kinds().is_empty());
    }

    #[tokio::test]
    async fn test_set_timer_persists_limit() {
        let f = fixture().await;

        assert!(matches!(
            f.lifecycle.set_timer(f.flight.flight_id, 0, f.host).await,
            Err(StorageError::Invalid(_))
        ));
        assert!(matches!(
            f.lifecycle.set_timer(f.flight.flight_id, 181, f.host).await,
            Err(StorageError::Invalid(_))
        ));

        let started = f
            .lifecycle
            .set_timer(f.flight.flight_id, 15, f.host)
            .await
            .unwrap();
        assert_eq!(started.time_limit, 900);

        let (_, event) = f.events.events.lock().unwrap()[0].clone();
        assert!(matches!(event, TastingEvent::TimerStarted { time_limit: 900, .. }));
    }

    #[tokio::test]
    async fn test_complete_requires_running_flight() {
        let f = fixture().await;

        let early = f.lifecycle.complete(f.flight.flight_id, f.host).await;
        assert!(matches!(early, Err(StorageError::Conflict(_))));
        let untouched = f.store.find_flight(f.flight.flight_id).await.unwrap();
        assert!(untouched.started_at.is_none());
        assert!(untouched.completed_at.is_none());

        f.lifecycle.start(f.flight.flight_id, f.host).await.unwrap();
        f.lifecycle.complete(f.flight.flight_id, f.host).await.unwrap();
        let done = f.store.find_flight(f.flight.flight_id).await.unwrap();
        assert!(done.completed_at.is_some());

        let late = f.lifecycle.complete(f.flight.flight_id, f.host).await;
        assert!(matches!(late, Err(StorageError::Conflict(_))));
        let after = f.store.find_flight(f.flight.flight_id).await.unwrap();
        assert_eq!(after.started_at, done.started_at);
        assert_eq!(after.completed_at, done.completed_at);

        let missing = f.lifecycle.complete(Uuid::new_v4(), f.host).await;
        assert!(matches!(missing, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_complete_grades_exactly_once() {
        let f = fixture().await;
        f.store.save_rule(ScoringRule { tasting_id: f.tasting_id, ..rule(2, true) }).await;
        let w = f
            .store
            .insert_wine(f.flight.flight_id, wine("Frankreich", "Burgund", &["Pinot Noir"]))
            .await;
        let alice = f.store.join(f.tasting_id, Uuid::new_v4()).await;
        f.lifecycle
            .submit_guess(w.wine_id, alice.user_id, &answer(&w))
            .await
            .unwrap();

        f.lifecycle.start(f.flight.flight_id, f.host).await.unwrap();
        let completed = f.lifecycle.complete(f.flight.flight_id, f.host).await.unwrap();
        assert_eq!(completed.graded, 1);
        assert_eq!(f.store.participant(alice.participant_id).await.unwrap().score, 12);

        let again = f.lifecycle.complete(f.flight.flight_id, f.host).await;
        assert!(matches!(again, Err(StorageError::Conflict(_))));
        assert_eq!(f.store.participant(alice.participant_id).await.unwrap().score, 12);
        assert_eq!(
            f.events.kinds(),
            vec!["timer_started", "flight_completed", "scores_updated"]
        );
    }

    #[tokio::test]
    async fn test_region_alias_guess_earns_full_score() {
        let f = fixture().await;
        let r = ScoringRule { tasting_id: f.tasting_id, ..rule(2, true) };
        f.store.save_rule(r.clone()).await;
        let w = f
            .store
            .insert_wine(f.flight.flight_id, wine("Frankreich", "Burgund", &["Pinot Noir"]))
            .await;
        let alice = f.store.join(f.tasting_id, Uuid::new_v4()).await;
        let mut guess = answer(&w);
        guess.region = "Bourgogne".to_string();
        f.lifecycle
            .submit_guess(w.wine_id, alice.user_id, &guess)
            .await
            .unwrap();

        f.lifecycle.start(f.flight.flight_id, f.host).await.unwrap();
        f.lifecycle.complete(f.flight.flight_id, f.host).await.unwrap();

        let max = r.max_total() as i32;
        assert_eq!(max, 12);
        let graded = f.store.guesses_of(alice.participant_id).await;
        assert_eq!(graded.len(), 1);
        assert_eq!(graded[0].score, Some(max));
        assert_eq!(f.store.participant(alice.participant_id).await.unwrap().score, max);
    }

    #[tokio::test]
    async fn test_concurrent_completion_grades_once() {
        let f = fixture().await;
        f.lifecycle.start(f.flight.flight_id, f.host).await.unwrap();

        let (a, b) = tokio::join!(
            f.lifecycle.complete(f.flight.flight_id, f.host),
            f.lifecycle.complete(f.flight.flight_id, f.host)
        );

        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert_eq!(
            f.events.kinds().iter().filter(|k| **k == "scores_updated").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_missing_guess_scores_zero_with_default_rule() {
        let f = fixture().await;
        let w1 = f
            .store
            .insert_wine(f.flight.flight_id, wine("Italien", "Piemont", &["Nebbiolo"]))
            .await;
        let _w2 = f
            .store
            .insert_wine(f.flight.flight_id, wine("Spanien", "Rioja", &["Tempranillo"]))
            .await;
        let alice = f.store.join(f.tasting_id, Uuid::new_v4()).await;
        let bob = f.store.join(f.tasting_id, Uuid::new_v4()).await;
        f.lifecycle
            .submit_guess(w1.wine_id, alice.user_id, &answer(&w1))
            .await
            .unwrap();

        f.lifecycle.start(f.flight.flight_id, f.host).await.unwrap();
        let completed = f.lifecycle.complete(f.flight.flight_id, f.host).await.unwrap();

        assert_eq!(completed.missing, 3);
        assert_eq!(f.store.participant(alice.participant_id).await.unwrap().score, 6);
        assert_eq!(f.store.participant(bob.participant_id).await.unwrap().score, 0);
        assert!(f.store.guesses_of(bob.participant_id).await.is_empty());
    }

    #[tokio::test]
    async fn test_guess_overwrite_then_closed() {
        let f = fixture().await;
        let w = f
            .store
            .insert_wine(f.flight.flight_id, wine("Österreich", "Wachau", &["Grüner Veltliner"]))
            .await;
        let alice = f.store.join(f.tasting_id, Uuid::new_v4()).await;

        let mut first = answer(&w);
        first.country = "Deutschland".to_string();
        f.lifecycle.submit_guess(w.wine_id, alice.user_id, &first).await.unwrap();
        f.lifecycle
            .submit_guess(w.wine_id, alice.user_id, &answer(&w))
            .await
            .unwrap();

        let stored = f.store.guesses_of(alice.participant_id).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].country, "Österreich");

        f.lifecycle.start(f.flight.flight_id, f.host).await.unwrap();
        f.lifecycle.complete(f.flight.flight_id, f.host).await.unwrap();

        let late = f.lifecycle.submit_guess(w.wine_id, alice.user_id, &first).await;
        assert!(matches!(late, Err(StorageError::Conflict(_))));
        assert_eq!(f.store.guesses_of(alice.participant_id).await[0].country, "Österreich");
    }

    #[tokio::test]
    async fn test_guess_preconditions() {
        let f = fixture().await;
        let w = f
            .store
            .insert_wine(f.flight.flight_id, wine("Chile", "Maipo", &["Carmenère"]))
            .await;

        let outsider = f.lifecycle.submit_guess(w.wine_id, Uuid::new_v4(), &answer(&w)).await;
        assert!(matches!(outsider, Err(StorageError::Forbidden(_))));

        let alice = f.store.join(f.tasting_id, Uuid::new_v4()).await;
        let mut crowded = answer(&w);
        crowded.varietals = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        let rejected = f.lifecycle.submit_guess(w.wine_id, alice.user_id, &crowded).await;
        assert!(matches!(rejected, Err(StorageError::Invalid(_))));

        let mut blank = answer(&w);
        blank.varietals = vec!["  ".into()];
        let rejected = f.lifecycle.submit_guess(w.wine_id, alice.user_id, &blank).await;
        assert!(matches!(rejected, Err(StorageError::Invalid(_))));
        assert!(f.store.guesses_of(alice.participant_id).await.is_empty());
    }
}
