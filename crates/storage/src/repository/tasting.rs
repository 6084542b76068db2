use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::tasting::CreateTastingRequest;
use crate::error::{Result, StorageError};
use crate::models::{Tasting, TastingStatus};
use crate::services::authorization::hash_tasting_password;

/// Repository for Tasting database operations
pub struct TastingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TastingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Tastings the user may see: public ones, hosted ones and joined ones
    pub async fn list_visible(
        &self,
        user_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Tasting>, i64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM tastings t
            WHERE t.visibility = 'public'
               OR t.host_id = $1
               OR EXISTS (
                   SELECT 1 FROM participants p
                   WHERE p.tasting_id = t.tasting_id AND p.user_id = $1
               )
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        let tastings = sqlx::query_as::<_, Tasting>(
            r#"
            SELECT t.tasting_id, t.host_id, t.name, t.status, t.visibility,
                   t.password_hash, t.created_at
            FROM tastings t
            WHERE t.visibility = 'public'
               OR t.host_id = $1
               OR EXISTS (
                   SELECT 1 FROM participants p
                   WHERE p.tasting_id = t.tasting_id AND p.user_id = $1
               )
            ORDER BY t.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((tastings, total))
    }

    pub async fn find_by_id(&self, tasting_id: Uuid) -> Result<Tasting> {
        sqlx::query_as::<_, Tasting>(
            r#"
            SELECT tasting_id, host_id, name, status, visibility, password_hash, created_at
            FROM tastings
            WHERE tasting_id = $1
            "#,
        )
        .bind(tasting_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, host_id: Uuid, req: &CreateTastingRequest) -> Result<Tasting> {
        let tasting_id = Uuid::new_v4();
        let password_hash = req
            .password
            .as_deref()
            .map(|password| hash_tasting_password(tasting_id, password));

        let tasting = sqlx::query_as::<_, Tasting>(
            r#"
            INSERT INTO tastings (tasting_id, host_id, name, status, visibility, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING tasting_id, host_id, name, status, visibility, password_hash, created_at
            "#,
        )
        .bind(tasting_id)
        .bind(host_id)
        .bind(&req.name)
        .bind(TastingStatus::Draft.as_str())
        .bind(&req.visibility)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await?;

        Ok(tasting)
    }

    pub async fn update_status(&self, tasting_id: Uuid, status: TastingStatus) -> Result<Tasting> {
        sqlx::query_as::<_, Tasting>(
            r#"
            UPDATE tastings
            SET status = $2
            WHERE tasting_id = $1
            RETURNING tasting_id, host_id, name, status, visibility, password_hash, created_at
            "#,
        )
        .bind(tasting_id)
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Deletes the tasting; flights, wines, participants, guesses and the
    /// scoring rule go with it through the foreign-key cascades.
    pub async fn delete(&self, tasting_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tastings WHERE tasting_id = $1")
            .bind(tasting_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
