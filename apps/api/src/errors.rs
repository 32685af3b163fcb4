use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Role resolution and match scoring are library-style components: they
/// return these variants to their caller and never write to the transport
/// themselves. Only `into_response` maps them to status codes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    /// The authenticated user has neither an applicant nor an employer profile.
    #[error("Profile not found")]
    ProfileNotFound,

    /// Recommendation scoring was invoked without a resolvable applicant record.
    #[error("Applicant profile not found")]
    NoApplicant,

    /// The applicant's preference record is missing required fields.
    #[error("Invalid preference: {0}")]
    InvalidPreference(String),

    /// A uniqueness-constrained create collided with an existing record.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::ProfileNotFound => (
                StatusCode::NOT_FOUND,
                "PROFILE_NOT_FOUND",
                "No profile found for this account. Complete registration first.".to_string(),
            ),
            AppError::NoApplicant => (
                StatusCode::NOT_FOUND,
                "NO_APPLICANT",
                "Applicant profile not found".to_string(),
            ),
            AppError::InvalidPreference(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_PREFERENCE",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// True when the error is a Postgres unique-constraint violation (SQLSTATE 23505).
///
/// The unique indexes on `applicants.user_id`, `employers.user_id`,
/// `applications (job_id, applicant_id)` and `saved_jobs (applicant_id, job_id)`
/// are the authoritative guard against concurrent duplicate creates; handlers
/// surface the rejection as `Conflict` via [`on_unique_conflict`].
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

/// Maps a unique-constraint rejection to `Conflict`, passing every other
/// database error through unchanged.
pub fn on_unique_conflict(e: sqlx::Error, message: &str) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict(message.to_string())
    } else {
        AppError::Database(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn test_on_unique_conflict_passes_other_errors_through() {
        let mapped = on_unique_conflict(sqlx::Error::RowNotFound, "duplicate");
        assert!(matches!(mapped, AppError::Database(_)));
    }
}
