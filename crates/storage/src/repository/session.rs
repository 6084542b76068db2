use sqlx::PgPool;

use crate::error::Result;
use crate::models::User;

/// Resolves bearer tokens issued by the login service.
pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// User behind a session token, if the session exists and has not expired
    pub async fn find_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.user_id, u.display_name, u.created_at
            FROM sessions s
            INNER JOIN users u ON u.user_id = s.user_id
            WHERE s.token = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}
