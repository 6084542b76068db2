use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::wine::CreateWineRequest;
use crate::error::{Result, StorageError};
use crate::models::Wine;

const WINE_COLUMNS: &str = "wine_id, flight_id, letter_code, country, region, producer, name, \
                            vintage, varietals, is_custom, created_at";

pub struct WineRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WineRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_flight(&self, flight_id: Uuid) -> Result<Vec<Wine>> {
        Self::list_in(&mut *self.pool.acquire().await?, flight_id).await
    }

    pub async fn list_in(conn: &mut PgConnection, flight_id: Uuid) -> Result<Vec<Wine>> {
        let wines = sqlx::query_as::<_, Wine>(&format!(
            "SELECT {WINE_COLUMNS} FROM wines WHERE flight_id = $1 ORDER BY letter_code"
        ))
        .bind(flight_id)
        .fetch_all(conn)
        .await?;

        Ok(wines)
    }

    pub async fn find_by_id(&self, wine_id: Uuid) -> Result<Wine> {
        sqlx::query_as::<_, Wine>(&format!(
            "SELECT {WINE_COLUMNS} FROM wines WHERE wine_id = $1"
        ))
        .bind(wine_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Stores a wine with its country already canonicalized by the caller.
    pub async fn create(
        &self,
        flight_id: Uuid,
        req: &CreateWineRequest,
        country: &str,
    ) -> Result<Wine> {
        let wine = sqlx::query_as::<_, Wine>(&format!(
            r#"
            INSERT INTO wines (
                wine_id, flight_id, letter_code, country, region, producer, name,
                vintage, varietals, is_custom
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {WINE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(flight_id)
        .bind(req.letter_code.trim())
        .bind(country)
        .bind(req.region.trim())
        .bind(req.producer.trim())
        .bind(req.name.trim())
        .bind(req.vintage.trim())
        .bind(&req.varietals)
        .bind(req.is_custom)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            StorageError::from(e).on_unique_violation("letter code already used in this flight")
        })?;

        Ok(wine)
    }
}
