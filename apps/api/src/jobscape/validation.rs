//! Request payloads for profile and job endpoints, with their field checks.
//!
//! Checks return the first failure as a `Validation` error; handlers call
//! them before touching storage.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::jobscape::{JobType, Preference, Shift};

// ────────────────────────────────────────────────────────────────────────────
// Applicant
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantRegistration {
    pub full_name: String,
    pub contact_email: String,
    pub phone_number: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub profile_summary: Option<String>,
    #[serde(rename = "resumeURL")]
    pub resume_url: String,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub preference: Preference,
}

pub fn validate_applicant(req: &ApplicantRegistration) -> Result<(), AppError> {
    require_non_blank(&req.full_name, "fullName")?;
    require_email(&req.contact_email, "contactEmail")?;
    require_phone(&req.phone_number, "phoneNumber")?;
    require_url(&req.resume_url, "resumeURL")?;
    if let Some(url) = &req.photo_url {
        require_url(url, "photoUrl")?;
    }
    if req.skills.iter().any(|s| s.trim().is_empty()) {
        return Err(AppError::Validation("skill cannot be empty".to_string()));
    }
    if req.languages.iter().any(|l| l.trim().is_empty()) {
        return Err(AppError::Validation("language cannot be empty".to_string()));
    }
    req.preference.validate()?;
    Ok(())
}

/// Partial update: absent fields keep their stored values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub profile_summary: Option<String>,
    #[serde(default, rename = "resumeURL")]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub preference: Option<Preference>,
}

pub fn validate_applicant_update(req: &ApplicantUpdate) -> Result<(), AppError> {
    if let Some(name) = &req.full_name {
        require_non_blank(name, "fullName")?;
    }
    if let Some(email) = &req.contact_email {
        require_email(email, "contactEmail")?;
    }
    if let Some(phone) = &req.phone_number {
        require_phone(phone, "phoneNumber")?;
    }
    if let Some(url) = &req.resume_url {
        require_url(url, "resumeURL")?;
    }
    if let Some(url) = &req.photo_url {
        require_url(url, "photoUrl")?;
    }
    if let Some(pref) = &req.preference {
        pref.validate()?;
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Employer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerRegistration {
    pub company_name: String,
    #[serde(rename = "logoURL")]
    pub logo_url: String,
    pub contact_number: String,
    pub industry: String,
    pub address: String,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub company_overview: Option<String>,
    #[serde(default)]
    pub employee_strength: Option<i32>,
}

pub fn validate_employer(req: &EmployerRegistration) -> Result<(), AppError> {
    require_non_blank(&req.company_name, "companyName")?;
    require_url(&req.logo_url, "logoURL")?;
    require_phone(&req.contact_number, "contactNumber")?;
    require_non_blank(&req.industry, "industry")?;
    require_non_blank(&req.address, "address")?;
    if let Some(url) = &req.website_url {
        require_url(url, "websiteUrl")?;
    }
    if matches!(req.employee_strength, Some(n) if n <= 0) {
        return Err(AppError::Validation(
            "employeeStrength must be a positive number".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerUpdate {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default, rename = "logoURL")]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub company_overview: Option<String>,
    #[serde(default)]
    pub employee_strength: Option<i32>,
}

pub fn validate_employer_update(req: &EmployerUpdate) -> Result<(), AppError> {
    if let Some(name) = &req.company_name {
        require_non_blank(name, "companyName")?;
    }
    if let Some(url) = &req.logo_url {
        require_url(url, "logoURL")?;
    }
    if let Some(phone) = &req.contact_number {
        require_phone(phone, "contactNumber")?;
    }
    if matches!(req.employee_strength, Some(n) if n <= 0) {
        return Err(AppError::Validation(
            "employeeStrength must be a positive number".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Job postings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    pub title: String,
    pub location: String,
    pub skills_required: Vec<String>,
    pub experience_required: String,
    /// Encoded as `"<min>-<max>"`; the format is not enforced here, scoring
    /// tolerates unparseable ranges.
    pub salary_range: String,
    pub employment_type: JobType,
    pub shift_type: Shift,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub responsibilities: Option<Vec<String>>,
    #[serde(default)]
    pub requirements: Option<Vec<String>>,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
    #[serde(default)]
    pub application_deadline: Option<i64>,
}

pub fn validate_job(req: &JobPayload) -> Result<(), AppError> {
    require_non_blank(&req.title, "title")?;
    require_non_blank(&req.location, "location")?;
    require_non_blank(&req.experience_required, "experienceRequired")?;
    require_non_blank(&req.salary_range, "salaryRange")?;
    if req.skills_required.iter().any(|s| s.trim().is_empty()) {
        return Err(AppError::Validation("skill cannot be empty".to_string()));
    }
    if matches!(req.application_deadline, Some(ts) if ts <= 0) {
        return Err(AppError::Validation(
            "applicationDeadline must be a valid Unix timestamp".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills_required: Option<Vec<String>>,
    #[serde(default)]
    pub experience_required: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub employment_type: Option<JobType>,
    #[serde(default)]
    pub shift_type: Option<Shift>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub responsibilities: Option<Vec<String>>,
    #[serde(default)]
    pub requirements: Option<Vec<String>>,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
    #[serde(default)]
    pub application_deadline: Option<i64>,
}

pub fn validate_job_update(req: &JobUpdate) -> Result<(), AppError> {
    if let Some(title) = &req.title {
        require_non_blank(title, "title")?;
    }
    if let Some(location) = &req.location {
        require_non_blank(location, "location")?;
    }
    if let Some(range) = &req.salary_range {
        require_non_blank(range, "salaryRange")?;
    }
    if matches!(req.application_deadline, Some(ts) if ts <= 0) {
        return Err(AppError::Validation(
            "applicationDeadline must be a valid Unix timestamp".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Field checks
// ────────────────────────────────────────────────────────────────────────────

fn require_non_blank(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_email(value: &str, field: &str) -> Result<(), AppError> {
    if !value.contains('@') || value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field}: invalid email format")));
    }
    Ok(())
}

fn require_phone(value: &str, field: &str) -> Result<(), AppError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !(10..=15).contains(&digits) {
        return Err(AppError::Validation(format!(
            "{field} must be 10-15 digits"
        )));
    }
    Ok(())
}

fn require_url(value: &str, field: &str) -> Result<(), AppError> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(AppError::Validation(format!("{field}: invalid URL format")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_applicant() -> ApplicantRegistration {
        ApplicantRegistration {
            full_name: "Jane Doe".to_string(),
            contact_email: "jane@example.com".to_string(),
            phone_number: "0123456789".to_string(),
            photo_url: None,
            profile_summary: None,
            resume_url: "https://cdn.example.com/resume.pdf".to_string(),
            skills: vec!["rust".to_string()],
            languages: vec!["English".to_string()],
            preference: Preference {
                expected_salary: 50000,
                job_type: JobType::FullTime,
                locations: vec!["Remote".to_string()],
                shift: None,
                roles: None,
                industries: None,
            },
        }
    }

    #[test]
    fn test_valid_applicant_passes() {
        assert!(validate_applicant(&make_applicant()).is_ok());
    }

    #[test]
    fn test_applicant_with_bad_resume_url_fails() {
        let mut req = make_applicant();
        req.resume_url = "resume.pdf".to_string();
        assert!(validate_applicant(&req).is_err());
    }

    #[test]
    fn test_applicant_with_short_phone_fails() {
        let mut req = make_applicant();
        req.phone_number = "12345".to_string();
        assert!(validate_applicant(&req).is_err());
    }

    #[test]
    fn test_applicant_with_empty_preference_locations_fails() {
        let mut req = make_applicant();
        req.preference.locations.clear();
        assert!(matches!(
            validate_applicant(&req),
            Err(AppError::InvalidPreference(_))
        ));
    }

    #[test]
    fn test_job_with_blank_title_fails() {
        let req = JobPayload {
            title: "  ".to_string(),
            location: "Remote".to_string(),
            skills_required: vec![],
            experience_required: "2 years".to_string(),
            salary_range: "50000-70000".to_string(),
            employment_type: JobType::FullTime,
            shift_type: Shift::Day,
            description: None,
            responsibilities: None,
            requirements: None,
            benefits: None,
            application_deadline: None,
        };
        assert!(validate_job(&req).is_err());
    }

    #[test]
    fn test_job_update_with_negative_deadline_fails() {
        let req = JobUpdate {
            title: None,
            location: None,
            skills_required: None,
            experience_required: None,
            salary_range: None,
            employment_type: None,
            shift_type: None,
            description: None,
            responsibilities: None,
            requirements: None,
            benefits: None,
            application_deadline: Some(-5),
        };
        assert!(validate_job_update(&req).is_err());
    }

    #[test]
    fn test_employer_with_non_positive_strength_fails() {
        let req = EmployerRegistration {
            company_name: "Acme".to_string(),
            logo_url: "https://cdn.example.com/logo.png".to_string(),
            contact_number: "0123456789".to_string(),
            industry: "Software".to_string(),
            address: "1 Main St".to_string(),
            website_url: None,
            company_overview: None,
            employee_strength: Some(0),
        };
        assert!(validate_employer(&req).is_err());
    }
}
