//! Opaque database-backed bearer sessions.
//!
//! Login issues an access session (short TTL) and a refresh session (long
//! TTL); both are random tokens stored with their expiry and verified per
//! request by the [`AuthUser`] extractor. Revocation is a row delete.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Session;
use crate::state::AppState;

pub const ACCESS: &str = "access";
pub const REFRESH: &str = "refresh";

/// Issues a session of the given kind for a user.
pub async fn issue(
    pool: &PgPool,
    user_id: Uuid,
    kind: &str,
    ttl_minutes: i64,
) -> Result<Session, AppError> {
    // Two v4 UUIDs give 244 bits of randomness; the column's unique index
    // keeps a collision from ever producing two live rows.
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());

    let session: Session = sqlx::query_as(
        r#"
        INSERT INTO sessions (id, user_id, token, kind, expires_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&token)
    .bind(kind)
    .bind(Utc::now() + Duration::minutes(ttl_minutes))
    .fetch_one(pool)
    .await?;

    Ok(session)
}

/// Looks up a live session of the given kind.
/// Unknown and expired tokens are both `Unauthorized`.
pub async fn lookup(pool: &PgPool, token: &str, kind: &str) -> Result<Session, AppError> {
    sqlx::query_as::<_, Session>(
        "SELECT * FROM sessions WHERE token = $1 AND kind = $2 AND expires_at > NOW()",
    )
    .bind(token)
    .bind(kind)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::Unauthorized)
}

/// Deletes the session holding this token. Idempotent.
pub async fn revoke(pool: &PgPool, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Deletes every session for a user, e.g. after a credential change.
pub async fn revoke_all(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    (!token.is_empty()).then(|| token.to_string())
}

/// Authenticated identity. Rejects requests without a live access session.
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let session = lookup(&state.db, &token, ACCESS).await?;
        Ok(AuthUser {
            user_id: session.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracts_value() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_missing_header_yields_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_non_bearer_scheme_yields_none() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_empty_token_yields_none() {
        let headers = headers_with("Bearer ");
        assert_eq!(bearer_token(&headers), None);
    }
}
