use sqlx::PgPool;
use storage::{
    error::{Result, StorageError},
    models::Guess,
    repository::{
        flight::FlightRepository, guess::GuessRepository, participant::ParticipantRepository,
    },
};
use uuid::Uuid;

/// The caller's own guesses for a flight, with scores once it is graded.
pub async fn own_guesses(pool: &PgPool, flight_id: Uuid, user_id: Uuid) -> Result<Vec<Guess>> {
    let flight = FlightRepository::new(pool).find_by_id(flight_id).await?;

    let participant = ParticipantRepository::new(pool)
        .find(flight.tasting_id, user_id)
        .await?
        .ok_or_else(|| StorageError::Forbidden("not a participant of this tasting".to_string()))?;

    GuessRepository::new(pool)
        .list_by_flight_and_participant(flight_id, participant.participant_id)
        .await
}
