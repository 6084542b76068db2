use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::scoring::SaveScoringRuleRequest;
use crate::error::Result;
use crate::models::ScoringRule;

pub struct ScoringRuleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoringRuleRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, tasting_id: Uuid) -> Result<Option<ScoringRule>> {
        let rule = sqlx::query_as::<_, ScoringRule>(
            r#"
            SELECT tasting_id, country, region, producer, wine_name, vintage, varietals,
                   any_varietal_point, display_count, updated_at
            FROM scoring_rules
            WHERE tasting_id = $1
            "#,
        )
        .bind(tasting_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(rule)
    }

    /// Inserts or replaces the rule as long as no flight of the tasting has
    /// started. Returns `None` when a started flight blocked the write.
    pub async fn save_unless_started(
        &self,
        tasting_id: Uuid,
        req: &SaveScoringRuleRequest,
    ) -> Result<Option<ScoringRule>> {
        let rule = sqlx::query_as::<_, ScoringRule>(
            r#"
            INSERT INTO scoring_rules (
                tasting_id, country, region, producer, wine_name, vintage, varietals,
                any_varietal_point, display_count, updated_at
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, NOW()
            WHERE NOT EXISTS (
                SELECT 1 FROM flights
                WHERE tasting_id = $1 AND started_at IS NOT NULL
            )
            ON CONFLICT (tasting_id)
            DO UPDATE SET
                country = EXCLUDED.country,
                region = EXCLUDED.region,
                producer = EXCLUDED.producer,
                wine_name = EXCLUDED.wine_name,
                vintage = EXCLUDED.vintage,
                varietals = EXCLUDED.varietals,
                any_varietal_point = EXCLUDED.any_varietal_point,
                display_count = EXCLUDED.display_count,
                updated_at = EXCLUDED.updated_at
            RETURNING tasting_id, country, region, producer, wine_name, vintage, varietals,
                      any_varietal_point, display_count, updated_at
            "#,
        )
        .bind(tasting_id)
        .bind(req.country)
        .bind(req.region)
        .bind(req.producer)
        .bind(req.wine_name)
        .bind(req.vintage)
        .bind(req.varietals)
        .bind(req.any_varietal_point)
        .bind(req.display_count)
        .fetch_optional(self.pool)
        .await?;

        Ok(rule)
    }
}
