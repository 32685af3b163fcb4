use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account identity record. Credential fields are never serialized to clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub security_question: String,
    #[serde(skip_serializing)]
    pub security_answer_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Opaque bearer session. The token is issued at login and presented on
/// every request; expiry is checked server-side on lookup.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub token: String,
    /// "access" or "refresh".
    pub kind: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
