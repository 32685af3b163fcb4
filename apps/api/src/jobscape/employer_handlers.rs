use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobscape::role::EmployerOnly;
use crate::jobscape::validation::{validate_job, validate_job_update, JobPayload, JobUpdate};
use crate::models::jobscape::{Application, ApplicationStatus, Job};
use crate::state::AppState;

/// Fetches a posting and checks it belongs to the calling employer.
async fn owned_job(state: &AppState, job_id: Uuid, employer_id: Uuid) -> Result<Job, AppError> {
    let job: Job = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    if job.posted_by != employer_id {
        return Err(AppError::Forbidden);
    }
    Ok(job)
}

/// POST /api/jobscape/employer/jobs
pub async fn handle_post_job(
    State(state): State<AppState>,
    EmployerOnly { profile_id }: EmployerOnly,
    Json(req): Json<JobPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_job(&req)?;

    let job: Job = sqlx::query_as(
        r#"
        INSERT INTO jobs
            (id, posted_by, title, location, skills_required, experience_required,
             salary_range, employment_type, shift_type, description,
             responsibilities, requirements, benefits, application_deadline)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(profile_id)
    .bind(req.title.trim())
    .bind(req.location.trim())
    .bind(&req.skills_required)
    .bind(req.experience_required.trim())
    .bind(req.salary_range.trim())
    .bind(req.employment_type.as_str())
    .bind(req.shift_type.as_str())
    .bind(&req.description)
    .bind(&req.responsibilities)
    .bind(&req.requirements)
    .bind(&req.benefits)
    .bind(req.application_deadline)
    .fetch_one(&state.db)
    .await?;

    info!("Employer {} posted job {}", profile_id, job.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Job posted successfully",
            "job": job
        })),
    ))
}

/// GET /api/jobscape/employer/jobs
pub async fn handle_my_jobs(
    State(state): State<AppState>,
    EmployerOnly { profile_id }: EmployerOnly,
) -> Result<Json<Value>, AppError> {
    let jobs: Vec<Job> =
        sqlx::query_as("SELECT * FROM jobs WHERE posted_by = $1 ORDER BY created_at DESC")
            .bind(profile_id)
            .fetch_all(&state.db)
            .await?;

    let count = jobs.len();
    Ok(Json(json!({
        "success": true,
        "count": count,
        "jobs": jobs
    })))
}

/// GET /api/jobscape/employer/jobs/:job_id
pub async fn handle_job_details(
    State(state): State<AppState>,
    EmployerOnly { profile_id }: EmployerOnly,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job = owned_job(&state, job_id, profile_id).await?;

    let application_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&state.db)
            .await?;

    Ok(Json(json!({
        "success": true,
        "job": job,
        "applicationCount": application_count
    })))
}

/// PATCH /api/jobscape/employer/jobs/:job_id
pub async fn handle_update_job(
    State(state): State<AppState>,
    EmployerOnly { profile_id }: EmployerOnly,
    Path(job_id): Path<Uuid>,
    Json(req): Json<JobUpdate>,
) -> Result<Json<Value>, AppError> {
    validate_job_update(&req)?;
    owned_job(&state, job_id, profile_id).await?;

    let updated: Job = sqlx::query_as(
        r#"
        UPDATE jobs SET
            title = COALESCE($2, title),
            location = COALESCE($3, location),
            skills_required = COALESCE($4, skills_required),
            experience_required = COALESCE($5, experience_required),
            salary_range = COALESCE($6, salary_range),
            employment_type = COALESCE($7, employment_type),
            shift_type = COALESCE($8, shift_type),
            description = COALESCE($9, description),
            responsibilities = COALESCE($10, responsibilities),
            requirements = COALESCE($11, requirements),
            benefits = COALESCE($12, benefits),
            application_deadline = COALESCE($13, application_deadline),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(&req.title)
    .bind(&req.location)
    .bind(&req.skills_required)
    .bind(&req.experience_required)
    .bind(&req.salary_range)
    .bind(req.employment_type.map(|t| t.as_str()))
    .bind(req.shift_type.map(|s| s.as_str()))
    .bind(&req.description)
    .bind(&req.responsibilities)
    .bind(&req.requirements)
    .bind(&req.benefits)
    .bind(req.application_deadline)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Job updated successfully",
        "job": updated
    })))
}

#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    pub archive: bool,
}

/// PATCH /api/jobscape/employer/jobs/:job_id/archive
///
/// Archived postings leave listings and scoring but are retained for records.
pub async fn handle_archive_job(
    State(state): State<AppState>,
    EmployerOnly { profile_id }: EmployerOnly,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ArchiveRequest>,
) -> Result<Json<Value>, AppError> {
    owned_job(&state, job_id, profile_id).await?;

    let job: Job = sqlx::query_as(
        "UPDATE jobs SET is_archived = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(job_id)
    .bind(req.archive)
    .fetch_one(&state.db)
    .await?;

    let action = if req.archive { "archived" } else { "unarchived" };
    Ok(Json(json!({
        "success": true,
        "message": format!("Job has been successfully {action}."),
        "job": job
    })))
}

/// DELETE /api/jobscape/employer/jobs/:job_id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    EmployerOnly { profile_id }: EmployerOnly,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    owned_job(&state, job_id, profile_id).await?;

    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM applications WHERE job_id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM saved_jobs WHERE job_id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("Employer {} deleted job {}", profile_id, job_id);

    Ok(Json(json!({
        "success": true,
        "message": "Job deleted successfully"
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkArchiveRequest {
    pub job_ids: Vec<Uuid>,
    pub archive: bool,
}

/// POST /api/jobscape/employer/jobs/bulk/archive
pub async fn handle_bulk_archive(
    State(state): State<AppState>,
    EmployerOnly { profile_id }: EmployerOnly,
    Json(req): Json<BulkArchiveRequest>,
) -> Result<Json<Value>, AppError> {
    if req.job_ids.is_empty() {
        return Err(AppError::Validation(
            "jobIds must be a non-empty array".to_string(),
        ));
    }

    // Scoped to own postings; ids owned by others are silently skipped.
    let modified = sqlx::query(
        "UPDATE jobs SET is_archived = $1, updated_at = NOW()
         WHERE id = ANY($2) AND posted_by = $3",
    )
    .bind(req.archive)
    .bind(&req.job_ids)
    .bind(profile_id)
    .execute(&state.db)
    .await?
    .rows_affected();

    let action = if req.archive { "archived" } else { "unarchived" };
    Ok(Json(json!({
        "success": true,
        "message": format!("Jobs have been successfully {action}."),
        "modifiedCount": modified
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    pub job_ids: Vec<Uuid>,
}

/// POST /api/jobscape/employer/jobs/bulk/delete
pub async fn handle_bulk_delete(
    State(state): State<AppState>,
    EmployerOnly { profile_id }: EmployerOnly,
    Json(req): Json<BulkDeleteRequest>,
) -> Result<Json<Value>, AppError> {
    if req.job_ids.is_empty() {
        return Err(AppError::Validation(
            "jobIds must be a non-empty array".to_string(),
        ));
    }

    let mut tx = state.db.begin().await?;
    sqlx::query(
        "DELETE FROM applications WHERE job_id IN
           (SELECT id FROM jobs WHERE id = ANY($1) AND posted_by = $2)",
    )
    .bind(&req.job_ids)
    .bind(profile_id)
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "DELETE FROM saved_jobs WHERE job_id IN
           (SELECT id FROM jobs WHERE id = ANY($1) AND posted_by = $2)",
    )
    .bind(&req.job_ids)
    .bind(profile_id)
    .execute(&mut *tx)
    .await?;
    let deleted = sqlx::query("DELETE FROM jobs WHERE id = ANY($1) AND posted_by = $2")
        .bind(&req.job_ids)
        .bind(profile_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;

    Ok(Json(json!({
        "success": true,
        "message": "Job deleted successfully",
        "deletedCount": deleted
    })))
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReview {
    pub id: Uuid,
    pub status: String,
    pub cover_letter: Option<String>,
    pub interview_date: Option<i64>,
    pub feedback: Option<String>,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub full_name: String,
    pub contact_email: String,
    pub phone_number: String,
    pub photo_url: Option<String>,
    #[serde(rename = "resumeURL")]
    pub resume_url: String,
}

/// GET /api/jobscape/employer/jobs/:job_id/applications
///
/// A posting without applications yields a success with an empty list.
pub async fn handle_job_applications(
    State(state): State<AppState>,
    EmployerOnly { profile_id }: EmployerOnly,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    owned_job(&state, job_id, profile_id).await?;

    let applications: Vec<ApplicationReview> = sqlx::query_as(
        r#"
        SELECT a.id, a.status, a.cover_letter, a.interview_date, a.feedback, a.notes,
               a.created_at AS applied_at,
               ap.full_name, ap.contact_email, ap.phone_number, ap.photo_url, ap.resume_url
        FROM applications a
        JOIN applicants ap ON ap.id = a.applicant_id
        WHERE a.job_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(job_id)
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
pub struct ApplicationUpdateRequest {
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub interview_date: Option<i64>,
}

/// PATCH /api/jobscape/employer/applications/:application_id
pub async fn handle_update_application(
    State(state): State<AppState>,
    EmployerOnly { profile_id }: EmployerOnly,
    Path(application_id): Path<Uuid>,
    Json(req): Json<ApplicationUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    let application: Application = sqlx::query_as("SELECT * FROM applications WHERE id = $1")
        .bind(application_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    // Ownership is checked through the posting the application targets.
    owned_job(&state, application.job_id, profile_id).await?;

    let updated: Application = sqlx::query_as(
        r#"
        UPDATE applications SET
            status = COALESCE($2, status),
            feedback = COALESCE($3, feedback),
            notes = COALESCE($4, notes),
            interview_date = COALESCE($5, interview_date),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(application_id)
    .bind(req.status.map(|s| s.as_str()))
    .bind(&req.feedback)
    .bind(&req.notes)
    .bind(req.interview_date)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Application updated successfully",
        "application": updated
    })))
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub archived_jobs: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobPerformance {
    pub job_id: Uuid,
    pub title: String,
    pub applications: i64,
}

/// GET /api/jobscape/employer/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    EmployerOnly { profile_id }: EmployerOnly,
) -> Result<Json<Value>, AppError> {
    let summary: JobSummary = sqlx::query_as(
        r#"
        SELECT COUNT(*) AS total_jobs,
               COUNT(*) FILTER (WHERE NOT is_archived) AS active_jobs,
               COUNT(*) FILTER (WHERE is_archived) AS archived_jobs
        FROM jobs
        WHERE posted_by = $1
        "#,
    )
    .bind(profile_id)
    .fetch_one(&state.db)
    .await?;

    let application_stats: Vec<StatusCount> = sqlx::query_as(
        r#"
        SELECT a.status, COUNT(*) AS count
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE j.posted_by = $1
        GROUP BY a.status
        "#,
    )
    .bind(profile_id)
    .fetch_all(&state.db)
    .await?;

    let performance: Vec<JobPerformance> = sqlx::query_as(
        r#"
        SELECT j.id AS job_id, j.title, COUNT(a.id) AS applications
        FROM jobs j
        LEFT JOIN applications a ON a.job_id = j.id
        WHERE j.posted_by = $1
        GROUP BY j.id, j.title
        ORDER BY applications ASC, j.id
        "#,
    )
    .bind(profile_id)
    .fetch_all(&state.db)
    .await?;

    let least = performance.first();
    let most = if performance.len() > 1 {
        performance.last()
    } else {
        None
    };

    Ok(Json(json!({
        "success": true,
        "data": {
            "jobSummary": summary,
            "applicationStats": application_stats,
            "jobPerformance": {
                "leastApplicantJob": least,
                "mostApplicantJob": most
            }
        }
    })))
}
