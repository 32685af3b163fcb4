//! Row types and domain enums for the Jobscape module.
//!
//! A user's role is never stored on the account: it is derived from which
//! profile row (`applicants` / `employers`) references the user. Both
//! profile tables carry a unique index on `user_id`, so at most one row of
//! each type can exist per account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Domain enums
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contractual,
    Freelance,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contractual => "contractual",
            JobType::Freelance => "freelance",
            JobType::Internship => "internship",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Day,
    Night,
    Flexible,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Day => "day",
            Shift::Night => "night",
            Shift::Flexible => "flexible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Rejected,
    Contacted,
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Contacted => "contacted",
            ApplicationStatus::Hired => "hired",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Applicant preference — the scoring engine's input record
// ────────────────────────────────────────────────────────────────────────────

/// Stated job preferences, embedded in the applicant profile as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub expected_salary: i64,
    pub job_type: JobType,
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<Shift>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industries: Option<Vec<String>>,
}

impl Preference {
    /// Deserializes the JSONB preference column.
    /// A record that does not parse is unusable for scoring, not a crash.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, AppError> {
        let pref: Preference = serde_json::from_value(value.clone())
            .map_err(|e| AppError::InvalidPreference(format!("malformed preference: {e}")))?;
        pref.validate()?;
        Ok(pref)
    }

    /// Required-field checks shared by registration and scoring.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.expected_salary <= 0 {
            return Err(AppError::InvalidPreference(
                "expectedSalary must be a positive number".to_string(),
            ));
        }
        if self.locations.is_empty() {
            return Err(AppError::InvalidPreference(
                "at least one preferred location is required".to_string(),
            ));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub contact_email: String,
    pub phone_number: String,
    pub photo_url: Option<String>,
    pub profile_summary: Option<String>,
    #[serde(rename = "resumeURL")]
    pub resume_url: String,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    /// JSONB column; parsed into [`Preference`] on demand.
    pub preference: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    #[serde(rename = "logoURL")]
    pub logo_url: String,
    pub contact_number: String,
    pub industry: String,
    pub address: String,
    pub website_url: Option<String>,
    pub company_overview: Option<String>,
    pub employee_strength: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub posted_by: Uuid,
    pub title: String,
    pub location: String,
    pub skills_required: Vec<String>,
    pub experience_required: String,
    /// Encoded as `"<min>-<max>"`, e.g. `"50000-70000"`.
    pub salary_range: String,
    pub employment_type: String,
    pub shift_type: String,
    pub description: Option<String>,
    pub responsibilities: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    /// Unix timestamp in seconds.
    pub application_deadline: Option<i64>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row shared by job search, company detail and recommendations:
/// a job joined with its employer's public fields and applicant count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub employment_type: String,
    pub shift_type: String,
    pub salary_range: String,
    pub company_name: Option<String>,
    #[serde(rename = "logoURL")]
    pub logo_url: Option<String>,
    pub total_applicants: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub status: String,
    pub cover_letter: Option<String>,
    /// Unix timestamp in seconds.
    pub interview_date: Option<i64>,
    pub feedback: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub job_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preference_parses_camel_case() {
        let value = json!({
            "expectedSalary": 50000,
            "jobType": "full-time",
            "locations": ["Remote", "Berlin"],
            "shift": "day",
            "roles": ["engineer"]
        });
        let pref = Preference::from_value(&value).unwrap();
        assert_eq!(pref.expected_salary, 50000);
        assert_eq!(pref.job_type, JobType::FullTime);
        assert_eq!(pref.shift, Some(Shift::Day));
        assert_eq!(pref.roles.as_deref(), Some(&["engineer".to_string()][..]));
        assert!(pref.industries.is_none());
    }

    #[test]
    fn test_preference_rejects_missing_locations() {
        let value = json!({
            "expectedSalary": 50000,
            "jobType": "part-time",
            "locations": []
        });
        let err = Preference::from_value(&value).unwrap_err();
        assert!(matches!(err, AppError::InvalidPreference(_)));
    }

    #[test]
    fn test_preference_rejects_non_positive_salary() {
        let pref = Preference {
            expected_salary: 0,
            job_type: JobType::Freelance,
            locations: vec!["Remote".to_string()],
            shift: None,
            roles: None,
            industries: None,
        };
        assert!(matches!(
            pref.validate(),
            Err(AppError::InvalidPreference(_))
        ));
    }

    #[test]
    fn test_preference_rejects_unknown_job_type() {
        let value = json!({
            "expectedSalary": 50000,
            "jobType": "gig",
            "locations": ["Remote"]
        });
        assert!(Preference::from_value(&value).is_err());
    }

    #[test]
    fn test_job_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&JobType::FullTime).unwrap(),
            "\"full-time\""
        );
        assert_eq!(JobType::PartTime.as_str(), "part-time");
    }

    #[test]
    fn test_application_status_wire_names() {
        let status: ApplicationStatus = serde_json::from_str("\"shortlisted\"").unwrap();
        assert_eq!(status, ApplicationStatus::Shortlisted);
        assert_eq!(status.as_str(), "shortlisted");
    }
}
