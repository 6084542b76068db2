use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Participant, ParticipantWithUser};

pub struct ParticipantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Participants with display names in join order.
    pub async fn list_with_users(&self, tasting_id: Uuid) -> Result<Vec<ParticipantWithUser>> {
        let participants = sqlx::query_as::<_, ParticipantWithUser>(
            r#"
            SELECT p.participant_id, p.tasting_id, p.user_id, u.display_name, p.score, p.joined_at
            FROM participants p
            INNER JOIN users u ON u.user_id = p.user_id
            WHERE p.tasting_id = $1
            ORDER BY p.joined_at, p.participant_id
            "#,
        )
        .bind(tasting_id)
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    pub async fn list_in(conn: &mut PgConnection, tasting_id: Uuid) -> Result<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"
            SELECT participant_id, tasting_id, user_id, score, joined_at
            FROM participants
            WHERE tasting_id = $1
            ORDER BY joined_at, participant_id
            "#,
        )
        .bind(tasting_id)
        .fetch_all(conn)
        .await?;

        Ok(participants)
    }

    pub async fn find(&self, tasting_id: Uuid, user_id: Uuid) -> Result<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            SELECT participant_id, tasting_id, user_id, score, joined_at
            FROM participants
            WHERE tasting_id = $1 AND user_id = $2
            "#,
        )
        .bind(tasting_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(participant)
    }

    /// Adds the user to the tasting. Joining twice is a constraint violation.
    pub async fn join(&self, tasting_id: Uuid, user_id: Uuid) -> Result<Participant> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants (participant_id, tasting_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING participant_id, tasting_id, user_id, score, joined_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tasting_id)
        .bind(user_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_unique_violation("already joined this tasting"))?;

        Ok(participant)
    }

    pub async fn set_score(conn: &mut PgConnection, participant_id: Uuid, score: i32) -> Result<()> {
        sqlx::query("UPDATE participants SET score = $2 WHERE participant_id = $1")
            .bind(participant_id)
            .bind(score)
            .execute(conn)
            .await?;

        Ok(())
    }
}
