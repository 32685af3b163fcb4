use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_secret, verify_secret};
use crate::auth::session;
use crate::errors::{on_unique_conflict, AppError};
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub security_question: String,
    pub security_answer: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub id: Uuid,
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    validate_register(&req)?;

    let password_hash = hash_secret(&req.password)?;
    let security_answer_hash = hash_secret(&req.security_answer)?;

    // The unique indexes on username and email are the authoritative
    // duplicate guard; no pre-check lookup.
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, security_question, security_answer_hash)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.username.trim())
    .bind(req.email.trim())
    .bind(&password_hash)
    .bind(req.security_question.trim())
    .bind(&security_answer_hash)
    .fetch_one(&state.db)
    .await
    .map_err(|e| on_unique_conflict(e, "User already exists"))?;

    info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            id: user.id,
        }),
    ))
}

fn validate_register(req: &RegisterRequest) -> Result<(), AppError> {
    if req.username.trim().is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }
    if !req.email.contains('@') {
        return Err(AppError::Validation("invalid email format".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if req.password != req.confirm_password {
        return Err(AppError::Validation("passwords do not match".to_string()));
    }
    if req.security_question.trim().is_empty() || req.security_answer.trim().is_empty() {
        return Err(AppError::Validation(
            "security question and answer are required".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    // Unknown user and bad password are indistinguishable to the caller.
    let user = find_by_username_or_email(&state, &req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_secret(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let access = session::issue(
        &state.db,
        user.id,
        session::ACCESS,
        state.config.access_ttl_minutes,
    )
    .await?;
    let refresh = session::issue(
        &state.db,
        user.id,
        session::REFRESH,
        state.config.refresh_ttl_minutes,
    )
    .await?;

    info!("User {} logged in", user.id);

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        access_token: access.token,
        refresh_token: refresh.token,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub message: String,
    pub access_token: String,
}

/// POST /api/auth/refresh
pub async fn handle_refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let refresh = session::lookup(&state.db, &req.refresh_token, session::REFRESH).await?;
    let access = session::issue(
        &state.db,
        refresh.user_id,
        session::ACCESS,
        state.config.access_ttl_minutes,
    )
    .await?;

    Ok(Json(RefreshResponse {
        message: "Token refreshed".to_string(),
        access_token: access.token,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Username or email.
    pub username: String,
    pub security_answer: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/auth/change-password
///
/// Security-answer verified reset. All existing sessions are revoked so a
/// stolen token does not outlive the credential change.
pub async fn handle_change_password(
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.new_password.len() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if req.new_password != req.confirm_password {
        return Err(AppError::Validation("passwords do not match".to_string()));
    }

    let user = find_by_username_or_email(&state, &req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_secret(&req.security_answer, &user.security_answer_hash)? {
        return Err(AppError::Unauthorized);
    }

    let password_hash = hash_secret(&req.new_password)?;
    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(&password_hash)
        .bind(user.id)
        .execute(&state.db)
        .await?;

    session::revoke_all(&state.db, user.id).await?;
    info!("Password changed for user {}", user.id);

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}

/// POST /api/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let token = session::bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    session::revoke(&state.db, &token).await?;

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

async fn find_by_username_or_email(
    state: &AppState,
    identifier: &str,
) -> Result<Option<User>, AppError> {
    Ok(
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1 OR email = $1")
            .bind(identifier.trim())
            .fetch_optional(&state.db)
            .await?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_register() -> RegisterRequest {
        RegisterRequest {
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password: "correct horse".to_string(),
            confirm_password: "correct horse".to_string(),
            security_question: "First pet?".to_string(),
            security_answer: "Rex".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(validate_register(&make_register()).is_ok());
    }

    #[test]
    fn test_password_mismatch_is_rejected() {
        let mut req = make_register();
        req.confirm_password = "something else".to_string();
        assert!(matches!(
            validate_register(&req),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_short_password_is_rejected() {
        let mut req = make_register();
        req.password = "short".to_string();
        req.confirm_password = "short".to_string();
        assert!(validate_register(&req).is_err());
    }

    #[test]
    fn test_bad_email_is_rejected() {
        let mut req = make_register();
        req.email = "not-an-email".to_string();
        assert!(validate_register(&req).is_err());
    }
}
