use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::guess::SubmitGuessRequest;
use crate::error::Result;
use crate::models::Guess;

const GUESS_COLUMNS: &str = "g.guess_id, g.participant_id, g.wine_id, g.country, g.region, \
                             g.producer, g.name, g.vintage, g.varietals, g.notes, g.rating, \
                             g.score, g.submitted_at";

pub struct GuessRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GuessRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One participant's guesses on the flight's wines.
    pub async fn list_by_flight_and_participant(
        &self,
        flight_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Vec<Guess>> {
        let guesses = sqlx::query_as::<_, Guess>(&format!(
            r#"
            SELECT {GUESS_COLUMNS}
            FROM guesses g
            INNER JOIN wines w ON w.wine_id = g.wine_id
            WHERE w.flight_id = $1 AND g.participant_id = $2
            ORDER BY w.letter_code
            "#
        ))
        .bind(flight_id)
        .bind(participant_id)
        .fetch_all(self.pool)
        .await?;

        Ok(guesses)
    }

    pub async fn list_for_flight(conn: &mut PgConnection, flight_id: Uuid) -> Result<Vec<Guess>> {
        let guesses = sqlx::query_as::<_, Guess>(&format!(
            r#"
            SELECT {GUESS_COLUMNS}
            FROM guesses g
            INNER JOIN wines w ON w.wine_id = g.wine_id
            WHERE w.flight_id = $1
            ORDER BY w.letter_code, g.submitted_at
            "#
        ))
        .bind(flight_id)
        .fetch_all(conn)
        .await?;

        Ok(guesses)
    }

    /// Every guess of the tasting's participants, graded or not.
    pub async fn list_for_tasting(conn: &mut PgConnection, tasting_id: Uuid) -> Result<Vec<Guess>> {
        let guesses = sqlx::query_as::<_, Guess>(&format!(
            r#"
            SELECT {GUESS_COLUMNS}
            FROM guesses g
            INNER JOIN participants p ON p.participant_id = g.participant_id
            WHERE p.tasting_id = $1
            "#
        ))
        .bind(tasting_id)
        .fetch_all(conn)
        .await?;

        Ok(guesses)
    }

    /// Insert-or-overwrite keyed by (participant, wine). Overwriting clears
    /// any score so a regraded flight never mixes old and new answers.
    pub async fn upsert(
        conn: &mut PgConnection,
        participant_id: Uuid,
        wine_id: Uuid,
        guess: &SubmitGuessRequest,
        submitted_at: DateTime<Utc>,
    ) -> Result<Guess> {
        let saved = sqlx::query_as::<_, Guess>(
            r#"
            INSERT INTO guesses (
                guess_id, participant_id, wine_id, country, region, producer, name,
                vintage, varietals, notes, rating, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (participant_id, wine_id)
            DO UPDATE SET
                country = EXCLUDED.country,
                region = EXCLUDED.region,
                producer = EXCLUDED.producer,
                name = EXCLUDED.name,
                vintage = EXCLUDED.vintage,
                varietals = EXCLUDED.varietals,
                notes = EXCLUDED.notes,
                rating = EXCLUDED.rating,
                score = NULL,
                submitted_at = EXCLUDED.submitted_at
            RETURNING guess_id, participant_id, wine_id, country, region, producer, name,
                      vintage, varietals, notes, rating, score, submitted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(participant_id)
        .bind(wine_id)
        .bind(guess.country.trim())
        .bind(guess.region.trim())
        .bind(guess.producer.trim())
        .bind(guess.name.trim())
        .bind(guess.vintage.trim())
        .bind(guess.cleaned_varietals())
        .bind(guess.notes.as_deref())
        .bind(guess.rating)
        .bind(submitted_at)
        .fetch_one(conn)
        .await?;

        Ok(saved)
    }

    pub async fn set_score(conn: &mut PgConnection, guess_id: Uuid, score: i32) -> Result<()> {
        sqlx::query("UPDATE guesses SET score = $2 WHERE guess_id = $1")
            .bind(guess_id)
            .bind(score)
            .execute(conn)
            .await?;

        Ok(())
    }
}
