use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::{on_unique_conflict, AppError};
use crate::jobscape::deletion;
use crate::jobscape::role::{ResolvedRole, Role, RoleKind};
use crate::jobscape::validation::{
    validate_applicant, validate_applicant_update, validate_employer, validate_employer_update,
    ApplicantRegistration, ApplicantUpdate, EmployerRegistration, EmployerUpdate,
};
use crate::models::jobscape::{Applicant, Employer};
use crate::state::AppState;

/// GET /api/jobscape/profile
///
/// Role-resolving profile fetch: applicant first, then employer, the same
/// tie-break the role extractors apply.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
) -> Result<Json<Value>, AppError> {
    let applicant: Option<Applicant> =
        sqlx::query_as("SELECT * FROM applicants WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?;
    if let Some(profile) = applicant {
        return Ok(Json(json!({
            "profile": profile,
            "role": RoleKind::Applicant.as_str(),
            "message": "Success"
        })));
    }

    let employer: Option<Employer> = sqlx::query_as("SELECT * FROM employers WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;
    if let Some(profile) = employer {
        return Ok(Json(json!({
            "profile": profile,
            "role": RoleKind::Employer.as_str(),
            "message": "Success"
        })));
    }

    Err(AppError::ProfileNotFound)
}

/// POST /api/jobscape/applicant/register
pub async fn handle_register_applicant(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    Json(req): Json<ApplicantRegistration>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_applicant(&req)?;
    reject_cross_profile(&state, user_id, "employers", "account is registered as an employer")
        .await?;

    let preference = serde_json::to_value(&req.preference)
        .map_err(|e| AppError::Internal(e.into()))?;

    // The unique index on user_id is the authoritative guard against two
    // concurrent registrations for the same account.
    let applicant: Applicant = sqlx::query_as(
        r#"
        INSERT INTO applicants
            (id, user_id, full_name, contact_email, phone_number, photo_url,
             profile_summary, resume_url, skills, languages, preference)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(req.full_name.trim())
    .bind(req.contact_email.trim())
    .bind(req.phone_number.trim())
    .bind(&req.photo_url)
    .bind(&req.profile_summary)
    .bind(req.resume_url.trim())
    .bind(&req.skills)
    .bind(&req.languages)
    .bind(&preference)
    .fetch_one(&state.db)
    .await
    .map_err(|e| on_unique_conflict(e, "Applicant profile already exists"))?;

    info!("Registered applicant {} for user {}", applicant.id, user_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Applicant registered successfully",
            "applicant": applicant
        })),
    ))
}

/// POST /api/jobscape/employer/register
pub async fn handle_register_employer(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    Json(req): Json<EmployerRegistration>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_employer(&req)?;
    reject_cross_profile(&state, user_id, "applicants", "account is registered as an applicant")
        .await?;

    let employer: Employer = sqlx::query_as(
        r#"
        INSERT INTO employers
            (id, user_id, company_name, logo_url, contact_number, industry,
             address, website_url, company_overview, employee_strength)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(req.company_name.trim())
    .bind(req.logo_url.trim())
    .bind(req.contact_number.trim())
    .bind(req.industry.trim())
    .bind(req.address.trim())
    .bind(&req.website_url)
    .bind(&req.company_overview)
    .bind(req.employee_strength)
    .fetch_one(&state.db)
    .await
    .map_err(|e| on_unique_conflict(e, "Employer profile already exists"))?;

    info!("Registered employer {} for user {}", employer.id, user_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Employer registered successfully",
            "employer": employer
        })),
    ))
}

/// Write-time exclusivity: one account never holds both profile types, so
/// the read-side tie-break can never mask a double registration.
async fn reject_cross_profile(
    state: &AppState,
    user_id: Uuid,
    other_table: &str,
    message: &str,
) -> Result<(), AppError> {
    let query = format!("SELECT EXISTS (SELECT 1 FROM {other_table} WHERE user_id = $1)");
    let exists: bool = sqlx::query_scalar(&query)
        .bind(user_id)
        .fetch_one(&state.db)
        .await?;
    if exists {
        return Err(AppError::Conflict(message.to_string()));
    }
    Ok(())
}

/// PATCH /api/jobscape/profile
///
/// Role-dispatched partial update of the caller's own profile.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    ResolvedRole(role): ResolvedRole,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    match role {
        Role::Applicant { profile_id } => {
            let req: ApplicantUpdate = serde_json::from_value(body)
                .map_err(|e| AppError::Validation(format!("invalid payload: {e}")))?;
            validate_applicant_update(&req)?;

            let preference = match &req.preference {
                Some(pref) => {
                    Some(serde_json::to_value(pref).map_err(|e| AppError::Internal(e.into()))?)
                }
                None => None,
            };

            let updated: Applicant = sqlx::query_as(
                r#"
                UPDATE applicants SET
                    full_name = COALESCE($2, full_name),
                    contact_email = COALESCE($3, contact_email),
                    phone_number = COALESCE($4, phone_number),
                    photo_url = COALESCE($5, photo_url),
                    profile_summary = COALESCE($6, profile_summary),
                    resume_url = COALESCE($7, resume_url),
                    skills = COALESCE($8, skills),
                    languages = COALESCE($9, languages),
                    preference = COALESCE($10, preference),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(profile_id)
            .bind(&req.full_name)
            .bind(&req.contact_email)
            .bind(&req.phone_number)
            .bind(&req.photo_url)
            .bind(&req.profile_summary)
            .bind(&req.resume_url)
            .bind(&req.skills)
            .bind(&req.languages)
            .bind(&preference)
            .fetch_one(&state.db)
            .await?;

            Ok(Json(json!({
                "message": "Profile updated successfully",
                "profile": updated
            })))
        }
        Role::Employer { profile_id } => {
            let req: EmployerUpdate = serde_json::from_value(body)
                .map_err(|e| AppError::Validation(format!("invalid payload: {e}")))?;
            validate_employer_update(&req)?;

            let updated: Employer = sqlx::query_as(
                r#"
                UPDATE employers SET
                    company_name = COALESCE($2, company_name),
                    logo_url = COALESCE($3, logo_url),
                    contact_number = COALESCE($4, contact_number),
                    industry = COALESCE($5, industry),
                    address = COALESCE($6, address),
                    website_url = COALESCE($7, website_url),
                    company_overview = COALESCE($8, company_overview),
                    employee_strength = COALESCE($9, employee_strength),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(profile_id)
            .bind(&req.company_name)
            .bind(&req.logo_url)
            .bind(&req.contact_number)
            .bind(&req.industry)
            .bind(&req.address)
            .bind(&req.website_url)
            .bind(&req.company_overview)
            .bind(req.employee_strength)
            .fetch_one(&state.db)
            .await?;

            Ok(Json(json!({
                "message": "Profile updated successfully",
                "profile": updated
            })))
        }
    }
}

/// DELETE /api/jobscape/account/:account_id
///
/// Only the owner may delete their account; the cascade is dispatched by
/// the resolved role.
pub async fn handle_delete_account(
    State(state): State<AppState>,
    ResolvedRole(role): ResolvedRole,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if role.profile_id() != account_id {
        return Err(AppError::Forbidden);
    }

    match role {
        Role::Applicant { profile_id } => {
            deletion::delete_applicant_account(&state.db, profile_id).await?;
            Ok(Json(json!({ "message": "Applicant account deleted" })))
        }
        Role::Employer { profile_id } => {
            deletion::delete_employer_account(&state.db, profile_id).await?;
            Ok(Json(json!({ "message": "Employer account deleted" })))
        }
    }
}
