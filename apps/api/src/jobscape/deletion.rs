//! Cascading account deletion.
//!
//! Multi-collection cleanup is an explicit script of ordered steps running
//! child-first inside one transaction. Every step is a plain `DELETE`, so a
//! retried saga converges on the same end state.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// Removes an applicant profile with its saved jobs and applications.
pub async fn delete_applicant_account(pool: &PgPool, profile_id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM saved_jobs WHERE applicant_id = $1")
        .bind(profile_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM applications WHERE applicant_id = $1")
        .bind(profile_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM applicants WHERE id = $1")
        .bind(profile_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        // Transaction rolls back on drop.
        return Err(AppError::ProfileNotFound);
    }

    tx.commit().await?;
    info!("Deleted applicant account {profile_id}");
    Ok(())
}

/// Removes an employer profile with its postings, and every application and
/// saved-job reference to those postings.
pub async fn delete_employer_account(pool: &PgPool, profile_id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM applications WHERE job_id IN (SELECT id FROM jobs WHERE posted_by = $1)",
    )
    .bind(profile_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "DELETE FROM saved_jobs WHERE job_id IN (SELECT id FROM jobs WHERE posted_by = $1)",
    )
    .bind(profile_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM jobs WHERE posted_by = $1")
        .bind(profile_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM employers WHERE id = $1")
        .bind(profile_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::ProfileNotFound);
    }

    tx.commit().await?;
    info!("Deleted employer account {profile_id}");
    Ok(())
}
