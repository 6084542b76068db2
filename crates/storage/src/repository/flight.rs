use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::flight::CreateFlightRequest;
use crate::error::{Result, StorageError};
use crate::models::Flight;

const FLIGHT_COLUMNS: &str =
    "flight_id, tasting_id, name, order_index, time_limit, started_at, completed_at, created_at";

/// Repository for Flight database operations
pub struct FlightRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FlightRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_tasting(&self, tasting_id: Uuid) -> Result<Vec<Flight>> {
        let flights = sqlx::query_as::<_, Flight>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights WHERE tasting_id = $1 ORDER BY order_index, created_at"
        ))
        .bind(tasting_id)
        .fetch_all(self.pool)
        .await?;

        Ok(flights)
    }

    pub async fn find_by_id(&self, flight_id: Uuid) -> Result<Flight> {
        sqlx::query_as::<_, Flight>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights WHERE flight_id = $1"
        ))
        .bind(flight_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Appends a flight. Without an explicit position it goes after the last one.
    pub async fn create(&self, tasting_id: Uuid, req: &CreateFlightRequest) -> Result<Flight> {
        let flight = sqlx::query_as::<_, Flight>(&format!(
            r#"
            INSERT INTO flights (flight_id, tasting_id, name, order_index, time_limit)
            VALUES (
                $1, $2, $3,
                COALESCE($4, (SELECT COALESCE(MAX(order_index) + 1, 0) FROM flights WHERE tasting_id = $2)),
                $5
            )
            RETURNING {FLIGHT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(tasting_id)
        .bind(&req.name)
        .bind(req.order_index)
        .bind(req.time_limit)
        .fetch_one(self.pool)
        .await
        .map_err(StorageError::from)
        .map_err(|e| {
            if e.is_foreign_key_violation() {
                StorageError::NotFound
            } else {
                e
            }
        })?;

        Ok(flight)
    }

    /// Conditional start: only matches a flight whose `started_at` is unset.
    pub async fn mark_started(
        &self,
        flight_id: Uuid,
        started_at: DateTime<Utc>,
        time_limit: Option<i32>,
    ) -> Result<Option<Flight>> {
        let flight = sqlx::query_as::<_, Flight>(&format!(
            r#"
            UPDATE flights
            SET started_at = $2,
                time_limit = COALESCE($3, time_limit)
            WHERE flight_id = $1 AND started_at IS NULL
            RETURNING {FLIGHT_COLUMNS}
            "#
        ))
        .bind(flight_id)
        .bind(started_at)
        .bind(time_limit)
        .fetch_optional(self.pool)
        .await?;

        Ok(flight)
    }

    /// Conditional completion inside the caller's transaction: only matches a
    /// running flight, so at most one caller ever gets a row back.
    pub async fn mark_completed(
        conn: &mut PgConnection,
        flight_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<Flight>> {
        let flight = sqlx::query_as::<_, Flight>(&format!(
            r#"
            UPDATE flights
            SET completed_at = $2
            WHERE flight_id = $1
              AND started_at IS NOT NULL
              AND completed_at IS NULL
            RETURNING {FLIGHT_COLUMNS}
            "#
        ))
        .bind(flight_id)
        .bind(completed_at)
        .fetch_optional(conn)
        .await?;

        Ok(flight)
    }

    /// Locks the flight row against a concurrent completion for the rest of
    /// the caller's transaction.
    pub async fn lock_for_share(conn: &mut PgConnection, flight_id: Uuid) -> Result<Flight> {
        sqlx::query_as::<_, Flight>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights WHERE flight_id = $1 FOR SHARE"
        ))
        .bind(flight_id)
        .fetch_optional(conn)
        .await?
        .ok_or(StorageError::NotFound)
    }
}
