//! Role resolution.
//!
//! A user's functional role is derived from which profile row exists for the
//! account, not from a stored flag. Resolution is read-only and idempotent:
//! probe `applicants` by `user_id`, then `employers`. A user somehow holding
//! both profiles always resolves as applicant; that order is the fixed
//! tie-break, applied before any role-gated handler runs.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Applicant,
    Employer,
}

impl RoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Applicant => "applicant",
            RoleKind::Employer => "employer",
        }
    }
}

/// A resolved role with the matched profile's identifier.
/// An account with no profile is `ProfileNotFound`, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Applicant { profile_id: Uuid },
    Employer { profile_id: Uuid },
}

impl Role {
    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Applicant { .. } => RoleKind::Applicant,
            Role::Employer { .. } => RoleKind::Employer,
        }
    }

    pub fn profile_id(&self) -> Uuid {
        match self {
            Role::Applicant { profile_id } | Role::Employer { profile_id } => *profile_id,
        }
    }
}

/// Applicant-before-employer tie-break over the two probe results.
fn classify(applicant: Option<Uuid>, employer: Option<Uuid>) -> Result<Role, AppError> {
    if let Some(profile_id) = applicant {
        return Ok(Role::Applicant { profile_id });
    }
    if let Some(profile_id) = employer {
        return Ok(Role::Employer { profile_id });
    }
    Err(AppError::ProfileNotFound)
}

/// Resolves `(role, profile_id)` for a user with at most two point lookups.
/// The employer probe is skipped once an applicant profile is found.
pub async fn resolve_role(pool: &PgPool, user_id: Uuid) -> Result<Role, AppError> {
    let applicant: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM applicants WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let employer: Option<Uuid> = match applicant {
        Some(_) => None,
        None => sqlx::query_scalar("SELECT id FROM employers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?,
    };

    classify(applicant, employer)
}

/// Access-control gate: admits the role or rejects with `Forbidden`.
/// Exactly one outcome per request: accept and reject are the two arms of a
/// single `Result`, never both.
pub fn authorize(role: &Role, allowed: &[RoleKind]) -> Result<(), AppError> {
    if allowed.contains(&role.kind()) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extractors — resolution runs before the handler body ever executes
// ────────────────────────────────────────────────────────────────────────────

/// The caller's resolved role, available as a handler argument.
pub struct ResolvedRole(pub Role);

#[async_trait]
impl FromRequestParts<AppState> for ResolvedRole {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let AuthUser { user_id } = AuthUser::from_request_parts(parts, state).await?;
        let role = resolve_role(&state.db, user_id).await?;
        Ok(ResolvedRole(role))
    }
}

/// Admits only users with an applicant profile.
pub struct ApplicantOnly {
    pub profile_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for ApplicantOnly {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let ResolvedRole(role) = ResolvedRole::from_request_parts(parts, state).await?;
        authorize(&role, &[RoleKind::Applicant])?;
        Ok(ApplicantOnly {
            profile_id: role.profile_id(),
        })
    }
}

/// Admits only users with an employer profile.
pub struct EmployerOnly {
    pub profile_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for EmployerOnly {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let ResolvedRole(role) = ResolvedRole::from_request_parts(parts, state).await?;
        authorize(&role, &[RoleKind::Employer])?;
        Ok(EmployerOnly {
            profile_id: role.profile_id(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_profiles_resolve_as_applicant() {
        let applicant_id = Uuid::new_v4();
        let employer_id = Uuid::new_v4();
        let role = classify(Some(applicant_id), Some(employer_id)).unwrap();
        assert_eq!(
            role,
            Role::Applicant {
                profile_id: applicant_id
            }
        );
    }

    #[test]
    fn test_employer_only_resolves_as_employer() {
        let employer_id = Uuid::new_v4();
        let role = classify(None, Some(employer_id)).unwrap();
        assert_eq!(role.kind(), RoleKind::Employer);
        assert_eq!(role.profile_id(), employer_id);
    }

    #[test]
    fn test_no_profile_is_profile_not_found() {
        let err = classify(None, None).unwrap_err();
        assert!(matches!(err, AppError::ProfileNotFound));
    }

    #[test]
    fn test_authorize_admits_allowed_role() {
        let role = Role::Applicant {
            profile_id: Uuid::new_v4(),
        };
        assert!(authorize(&role, &[RoleKind::Applicant]).is_ok());
        assert!(authorize(&role, &[RoleKind::Applicant, RoleKind::Employer]).is_ok());
    }

    #[test]
    fn test_authorize_rejects_role_mismatch() {
        let role = Role::Employer {
            profile_id: Uuid::new_v4(),
        };
        let err = authorize(&role, &[RoleKind::Applicant]).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn test_authorize_yields_exactly_one_outcome() {
        // Accept and reject are the two arms of one Result; assert the gate
        // lands in exactly one of them for both branches.
        let applicant = Role::Applicant {
            profile_id: Uuid::new_v4(),
        };
        for allowed in [
            &[RoleKind::Applicant][..],
            &[RoleKind::Employer][..],
        ] {
            let outcome = authorize(&applicant, allowed);
            assert_ne!(outcome.is_ok(), outcome.is_err());
        }
    }
}
