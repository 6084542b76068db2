use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use storage::repository::session::SessionRepository;
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

/// The authenticated caller, placed in request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

/// Resolves `Authorization: Bearer <token>` through the sessions table.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let Some(token) = bearer_token(req.headers()) else {
        return Err(WebError::Unauthorized);
    };

    let user = SessionRepository::new(state.db.pool())
        .find_user_by_token(token)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Unknown or expired session token");
            WebError::Unauthorized
        })?;

    tracing::debug!(user_id = %user.user_id, user = %user.display_name, "Session resolved");
    req.extensions_mut().insert(CurrentUser {
        user_id: user.user_id,
    });

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("Basic abc123")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
