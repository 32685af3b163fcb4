pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::jobscape::{applicant_handlers, employer_handlers, profile_handlers};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/refresh", post(auth::handle_refresh))
        .route(
            "/api/auth/change-password",
            post(auth::handle_change_password),
        )
        .route("/api/auth/logout", post(auth::handle_logout))
        // Profiles (role-resolving)
        .route(
            "/api/jobscape/profile",
            get(profile_handlers::handle_get_profile).patch(profile_handlers::handle_update_profile),
        )
        .route(
            "/api/jobscape/applicant/register",
            post(profile_handlers::handle_register_applicant),
        )
        .route(
            "/api/jobscape/employer/register",
            post(profile_handlers::handle_register_employer),
        )
        .route(
            "/api/jobscape/account/:account_id",
            delete(profile_handlers::handle_delete_account),
        )
        // Job board (any authenticated user)
        .route("/api/jobscape/jobs", get(applicant_handlers::handle_list_jobs))
        .route(
            "/api/jobscape/jobs/:job_id/briefing",
            get(applicant_handlers::handle_job_briefing),
        )
        .route(
            "/api/jobscape/companies",
            get(applicant_handlers::handle_list_companies),
        )
        .route(
            "/api/jobscape/companies/:company_id",
            get(applicant_handlers::handle_company_details),
        )
        // Applicant-gated
        .route(
            "/api/jobscape/applicant/jobs/apply",
            post(applicant_handlers::handle_apply),
        )
        .route(
            "/api/jobscape/applicant/applications",
            get(applicant_handlers::handle_my_applications),
        )
        .route(
            "/api/jobscape/applicant/jobs/save",
            post(applicant_handlers::handle_save_job),
        )
        .route(
            "/api/jobscape/applicant/jobs/saved",
            get(applicant_handlers::handle_saved_jobs),
        )
        .route(
            "/api/jobscape/applicant/jobs/saved/:job_id",
            delete(applicant_handlers::handle_unsave_job),
        )
        .route(
            "/api/jobscape/applicant/jobs/recommended",
            get(applicant_handlers::handle_recommended_jobs),
        )
        // Employer-gated
        .route(
            "/api/jobscape/employer/jobs",
            get(employer_handlers::handle_my_jobs).post(employer_handlers::handle_post_job),
        )
        .route(
            "/api/jobscape/employer/jobs/bulk/archive",
            post(employer_handlers::handle_bulk_archive),
        )
        .route(
            "/api/jobscape/employer/jobs/bulk/delete",
            post(employer_handlers::handle_bulk_delete),
        )
        .route(
            "/api/jobscape/employer/jobs/:job_id",
            get(employer_handlers::handle_job_details)
                .patch(employer_handlers::handle_update_job)
                .delete(employer_handlers::handle_delete_job),
        )
        .route(
            "/api/jobscape/employer/jobs/:job_id/archive",
            patch(employer_handlers::handle_archive_job),
        )
        .route(
            "/api/jobscape/employer/jobs/:job_id/applications",
            get(employer_handlers::handle_job_applications),
        )
        .route(
            "/api/jobscape/employer/applications/:application_id",
            patch(employer_handlers::handle_update_application),
        )
        .route(
            "/api/jobscape/employer/dashboard",
            get(employer_handlers::handle_dashboard),
        )
        .with_state(state)
}
