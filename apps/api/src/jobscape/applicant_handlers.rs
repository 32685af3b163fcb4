use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::{on_unique_conflict, AppError};
use crate::jobscape::matching::rank_jobs;
use crate::jobscape::role::ApplicantOnly;
use crate::models::jobscape::{Application, Employer, Job, JobListing, Preference};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Case-insensitive substring filter on the title / company name.
    pub name: Option<String>,
}

impl ListQuery {
    /// (filter, limit, offset); defaults to page 1, 10 rows.
    fn params(&self) -> (String, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(10).clamp(1, 100);
        let filter = self.name.clone().unwrap_or_default();
        (filter, limit, (page - 1) * limit)
    }
}

const ACTIVE_LISTING_SELECT: &str = r#"
    SELECT j.id, j.title, j.location, j.employment_type, j.shift_type, j.salary_range,
           e.company_name, e.logo_url,
           (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS total_applicants
    FROM jobs j
    LEFT JOIN employers e ON e.id = j.posted_by
    WHERE j.is_archived = FALSE
"#;

/// GET /api/jobscape/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let (filter, limit, offset) = query.params();

    let sql = format!(
        "{ACTIVE_LISTING_SELECT}
          AND ($1 = '' OR j.title ILIKE '%' || $1 || '%')
        ORDER BY j.created_at, j.id
        LIMIT $2 OFFSET $3"
    );
    let jobs: Vec<JobListing> = sqlx::query_as(&sql)
        .bind(&filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.db)
        .await?;

    let count = jobs.len();
    Ok(Json(json!({
        "success": true,
        "jobs": jobs,
        "count": count,
        "page": query.page.unwrap_or(1).max(1),
        "limit": limit
    })))
}

/// GET /api/jobscape/jobs/:job_id/briefing
///
/// Archived postings are invisible here; they 404 like unknown ids.
pub async fn handle_job_briefing(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job: Job = sqlx::query_as("SELECT * FROM jobs WHERE id = $1 AND is_archived = FALSE")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    let employer: Option<Employer> = sqlx::query_as("SELECT * FROM employers WHERE id = $1")
        .bind(job.posted_by)
        .fetch_optional(&state.db)
        .await?;

    let application_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&state.db)
            .await?;

    Ok(Json(json!({
        "success": true,
        "job": job,
        "companyName": employer.as_ref().map(|e| e.company_name.clone()),
        "logoURL": employer.as_ref().map(|e| e.logo_url.clone()),
        "applicationCount": application_count
    })))
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub id: Uuid,
    pub company_name: String,
    #[serde(rename = "logoURL")]
    pub logo_url: String,
    pub address: String,
    pub active_jobs_count: i64,
}

/// GET /api/jobscape/companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let (filter, limit, offset) = query.params();

    let companies: Vec<CompanySummary> = sqlx::query_as(
        r#"
        SELECT e.id, e.company_name, e.logo_url, e.address,
               (SELECT COUNT(*) FROM jobs j
                 WHERE j.posted_by = e.id AND j.is_archived = FALSE) AS active_jobs_count
        FROM employers e
        WHERE ($1 = '' OR e.company_name ILIKE '%' || $1 || '%')
        ORDER BY e.company_name, e.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(&filter)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    let count = companies.len();
    Ok(Json(json!({
        "success": true,
        "companies": companies,
        "count": count,
        "page": query.page.unwrap_or(1).max(1),
        "limit": limit
    })))
}

/// GET /api/jobscape/companies/:company_id
pub async fn handle_company_details(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let company: Employer = sqlx::query_as("SELECT * FROM employers WHERE id = $1")
        .bind(company_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    let sql = format!("{ACTIVE_LISTING_SELECT} AND j.posted_by = $1 ORDER BY j.created_at, j.id");
    let jobs: Vec<JobListing> = sqlx::query_as(&sql)
        .bind(company_id)
        .fetch_all(&state.db)
        .await?;

    let job_count = jobs.len();
    Ok(Json(json!({
        "success": true,
        "company": company,
        "jobs": jobs,
        "jobCount": job_count
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub job_id: Uuid,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

/// POST /api/jobscape/applicant/jobs/apply
///
/// The unique index on (job_id, applicant_id) is the authoritative guard:
/// two concurrent applies for the same pair store exactly one row, the
/// loser surfaces as `Conflict`.
pub async fn handle_apply(
    State(state): State<AppState>,
    ApplicantOnly { profile_id }: ApplicantOnly,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1 AND is_archived = FALSE)",
    )
    .bind(req.job_id)
    .fetch_one(&state.db)
    .await?;
    if !exists {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    let application: Application = sqlx::query_as(
        r#"
        INSERT INTO applications (id, job_id, applicant_id, status, cover_letter)
        VALUES ($1, $2, $3, 'pending', $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.job_id)
    .bind(profile_id)
    .bind(&req.cover_letter)
    .fetch_one(&state.db)
    .await
    .map_err(|e| on_unique_conflict(e, "Already applied to this job"))?;

    info!("Applicant {} applied to job {}", profile_id, req.job_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Application submitted successfully",
            "application": application
        })),
    ))
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJob {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub employment_type: String,
    pub salary_range: String,
    pub company_name: Option<String>,
    #[serde(rename = "logoURL")]
    pub logo_url: Option<String>,
    pub status: String,
    pub cover_letter: Option<String>,
    pub applied_at: DateTime<Utc>,
}

/// GET /api/jobscape/applicant/applications
pub async fn handle_my_applications(
    State(state): State<AppState>,
    ApplicantOnly { profile_id }: ApplicantOnly,
) -> Result<Json<Value>, AppError> {
    let applications: Vec<AppliedJob> = sqlx::query_as(
        r#"
        SELECT j.id, j.title, j.location, j.employment_type, j.salary_range,
               e.company_name, e.logo_url,
               a.status, a.cover_letter, a.created_at AS applied_at
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        LEFT JOIN employers e ON e.id = j.posted_by
        WHERE a.applicant_id = $1 AND j.is_archived = FALSE
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(profile_id)
    .fetch_all(&state.db)
    .await?;

    let count = applications.len();
    Ok(Json(json!({
        "success": true,
        "applications": applications,
        "count": count
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveJobRequest {
    pub job_id: Uuid,
}

/// POST /api/jobscape/applicant/jobs/save
pub async fn handle_save_job(
    State(state): State<AppState>,
    ApplicantOnly { profile_id }: ApplicantOnly,
    Json(req): Json<SaveJobRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1 AND is_archived = FALSE)",
    )
    .bind(req.job_id)
    .fetch_one(&state.db)
    .await?;
    if !exists {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    sqlx::query("INSERT INTO saved_jobs (id, applicant_id, job_id) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(req.job_id)
        .execute(&state.db)
        .await
        .map_err(|e| on_unique_conflict(e, "Job already saved"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Job saved successfully" })),
    ))
}

/// GET /api/jobscape/applicant/jobs/saved
pub async fn handle_saved_jobs(
    State(state): State<AppState>,
    ApplicantOnly { profile_id }: ApplicantOnly,
) -> Result<Json<Value>, AppError> {
    let jobs: Vec<JobListing> = sqlx::query_as(
        r#"
        SELECT j.id, j.title, j.location, j.employment_type, j.shift_type, j.salary_range,
               e.company_name, e.logo_url,
               (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS total_applicants
        FROM saved_jobs s
        JOIN jobs j ON j.id = s.job_id
        LEFT JOIN employers e ON e.id = j.posted_by
        WHERE s.applicant_id = $1 AND j.is_archived = FALSE
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(profile_id)
    .fetch_all(&state.db)
    .await?;

    let count = jobs.len();
    Ok(Json(json!({
        "success": true,
        "jobs": jobs,
        "count": count
    })))
}

/// DELETE /api/jobscape/applicant/jobs/saved/:job_id
pub async fn handle_unsave_job(
    State(state): State<AppState>,
    ApplicantOnly { profile_id }: ApplicantOnly,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let removed = sqlx::query("DELETE FROM saved_jobs WHERE applicant_id = $1 AND job_id = $2")
        .bind(profile_id)
        .bind(job_id)
        .execute(&state.db)
        .await?
        .rows_affected();

    if removed == 0 {
        return Err(AppError::NotFound("Saved job not found".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Job removed from saved jobs"
    })))
}

/// GET /api/jobscape/applicant/jobs/recommended
///
/// Runs the scoring engine over the full active job set. Zero matches is a
/// 200 with an empty list; only a missing profile or unusable preference
/// record is an error.
pub async fn handle_recommended_jobs(
    State(state): State<AppState>,
    ApplicantOnly { profile_id }: ApplicantOnly,
) -> Result<Json<Value>, AppError> {
    let preference: serde_json::Value =
        sqlx::query_scalar("SELECT preference FROM applicants WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::NoApplicant)?;
    let preference = Preference::from_value(&preference)?;

    let sql = format!("{ACTIVE_LISTING_SELECT} ORDER BY j.created_at, j.id");
    let jobs: Vec<JobListing> = sqlx::query_as(&sql).fetch_all(&state.db).await?;

    let ranked = rank_jobs(&preference, &jobs, &state.match_weights)?;

    let count = ranked.len();
    Ok(Json(json!({
        "success": true,
        "jobs": ranked,
        "count": count
    })))
}
