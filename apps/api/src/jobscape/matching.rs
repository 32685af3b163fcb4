//! Job match scoring engine.
//!
//! A deterministic, pure function of an applicant's stated preferences and
//! the active job set. Point values live in [`MatchWeights`], part of the
//! engine's explicit input carried in `AppState`, never inlined at the
//! scoring sites. Storage fetches happen in the calling handler; this module
//! only ever sees already-fetched rows.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::jobscape::{JobListing, Preference};

/// Points awarded per criterion, plus the inclusion threshold.
///
/// Criteria are independent, so a job can earn up to
/// `salary + job_type + location + shift + role_keyword` = 105 points;
/// totals are not normalized to 100.
#[derive(Debug, Clone)]
pub struct MatchWeights {
    /// Job's salary-range lower bound meets the expected salary.
    pub salary: u32,
    /// Employment type equals the preferred job type.
    pub job_type: u32,
    /// Job location is one of the preferred locations.
    pub location: u32,
    /// Shift type equals the preferred shift, when one is stated.
    pub shift: u32,
    /// Any stated role keyword appears in the job title.
    pub role_keyword: u32,
    /// Minimum total score for a job to be recommended.
    pub threshold: u32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        MatchWeights {
            salary: 45,
            job_type: 20,
            location: 10,
            shift: 20,
            role_keyword: 10,
            threshold: 30,
        }
    }
}

/// A recommended job annotated with its match score.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: JobListing,
    pub match_score: u32,
}

/// Parses the lower bound of a `"<min>-<max>"` salary range.
///
/// Returns `None` for anything that does not start with an integer followed
/// by `-`; a malformed range makes the salary criterion a non-match, never
/// an error.
pub fn parse_salary_floor(salary_range: &str) -> Option<i64> {
    let (floor, _) = salary_range.split_once('-')?;
    floor.trim().parse::<i64>().ok()
}

/// Scores a single job against one applicant's preferences.
pub fn score_job(preference: &Preference, job: &JobListing, weights: &MatchWeights) -> u32 {
    let mut score = 0;

    if let Some(floor) = parse_salary_floor(&job.salary_range) {
        if floor >= preference.expected_salary {
            score += weights.salary;
        }
    }

    if job.employment_type == preference.job_type.as_str() {
        score += weights.job_type;
    }

    if preference.locations.iter().any(|l| l == &job.location) {
        score += weights.location;
    }

    if let Some(shift) = preference.shift {
        if job.shift_type == shift.as_str() {
            score += weights.shift;
        }
    }

    if let Some(roles) = &preference.roles {
        let title = job.title.to_lowercase();
        if roles
            .iter()
            .any(|role| !role.is_empty() && title.contains(&role.to_lowercase()))
        {
            score += weights.role_keyword;
        }
    }

    score
}

/// Scores, filters and ranks the job set.
///
/// Jobs below the threshold are dropped; the rest sort descending by score.
/// The sort is stable, so ties keep the job set's query order. An empty
/// result is a successful outcome, not an error; the caller returns it as a
/// 200 with an empty list.
pub fn rank_jobs(
    preference: &Preference,
    jobs: &[JobListing],
    weights: &MatchWeights,
) -> Result<Vec<ScoredJob>, AppError> {
    preference.validate()?;

    let mut ranked: Vec<ScoredJob> = jobs
        .iter()
        .map(|job| ScoredJob {
            job: job.clone(),
            match_score: score_job(preference, job, weights),
        })
        .filter(|scored| scored.match_score >= weights.threshold)
        .collect();

    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::jobscape::{JobType, Shift};
    use uuid::Uuid;

    fn make_preference() -> Preference {
        Preference {
            expected_salary: 50000,
            job_type: JobType::FullTime,
            locations: vec!["Remote".to_string()],
            shift: Some(Shift::Day),
            roles: None,
            industries: None,
        }
    }

    fn make_job(
        title: &str,
        salary_range: &str,
        employment_type: &str,
        location: &str,
        shift_type: &str,
    ) -> JobListing {
        JobListing {
            id: Uuid::new_v4(),
            title: title.to_string(),
            location: location.to_string(),
            employment_type: employment_type.to_string(),
            shift_type: shift_type.to_string(),
            salary_range: salary_range.to_string(),
            company_name: Some("Acme".to_string()),
            logo_url: None,
            total_applicants: 0,
        }
    }

    #[test]
    fn test_parse_salary_floor() {
        assert_eq!(parse_salary_floor("50000-70000"), Some(50000));
        assert_eq!(parse_salary_floor(" 60000 - 80000"), Some(60000));
        assert_eq!(parse_salary_floor("50000-"), Some(50000));
        assert_eq!(parse_salary_floor("invalid"), None);
        assert_eq!(parse_salary_floor("50000"), None);
        assert_eq!(parse_salary_floor("abc-def"), None);
    }

    #[test]
    fn test_salary_and_type_match_scores_65() {
        // Salary floor 60000 >= 50000 (45) and matching full-time (20).
        let job = make_job("Engineer", "60000-80000", "full-time", "Onsite", "night");
        assert_eq!(score_job(&make_preference(), &job, &MatchWeights::default()), 65);
    }

    #[test]
    fn test_location_and_shift_match_scores_30_boundary() {
        // Location (10) + shift (20) = 30, exactly at the threshold.
        let job = make_job("Clerk", "40000-50000", "part-time", "Remote", "day");
        let pref = make_preference();
        let weights = MatchWeights::default();
        assert_eq!(score_job(&pref, &job, &weights), 30);

        let ranked = rank_jobs(&pref, &[job], &weights).unwrap();
        assert_eq!(ranked.len(), 1, "a job at the threshold is included");
        assert_eq!(ranked[0].match_score, 30);
    }

    #[test]
    fn test_no_criteria_met_scores_zero_and_is_excluded() {
        let job = make_job("Clerk", "10000-20000", "contractual", "Onsite", "night");
        let pref = make_preference();
        let weights = MatchWeights::default();
        assert_eq!(score_job(&pref, &job, &weights), 0);
        assert!(rank_jobs(&pref, &[job], &weights).unwrap().is_empty());
    }

    #[test]
    fn test_below_threshold_is_excluded() {
        // Shift alone scores 20 < 30.
        let job = make_job("Clerk", "10000-20000", "contractual", "Onsite", "day");
        let ranked = rank_jobs(&make_preference(), &[job], &MatchWeights::default()).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_malformed_salary_range_is_non_fatal() {
        let job = make_job("Engineer", "invalid", "full-time", "Remote", "day");
        // Salary criterion scores 0; the rest still award points.
        assert_eq!(score_job(&make_preference(), &job, &MatchWeights::default()), 50);
    }

    #[test]
    fn test_role_keyword_matches_title_case_insensitive() {
        let mut pref = make_preference();
        pref.roles = Some(vec!["engineer".to_string()]);
        let with_keyword = make_job("Senior ENGINEER", "0-1", "contractual", "X", "night");
        let without = make_job("Accountant", "0-1", "contractual", "X", "night");
        let weights = MatchWeights::default();
        assert_eq!(score_job(&pref, &with_keyword, &weights), 10);
        assert_eq!(score_job(&pref, &without, &weights), 0);
    }

    #[test]
    fn test_empty_role_keyword_never_matches() {
        let mut pref = make_preference();
        pref.roles = Some(vec![String::new()]);
        let job = make_job("Accountant", "0-1", "contractual", "X", "night");
        assert_eq!(score_job(&pref, &job, &MatchWeights::default()), 0);
    }

    #[test]
    fn test_adding_a_criterion_never_decreases_score() {
        let pref = make_preference();
        let weights = MatchWeights::default();
        let base = make_job("Engineer", "60000-80000", "full-time", "Onsite", "night");
        let with_location = make_job("Engineer", "60000-80000", "full-time", "Remote", "night");
        assert!(
            score_job(&pref, &with_location, &weights) >= score_job(&pref, &base, &weights)
        );
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let pref = make_preference();
        let weights = MatchWeights::default();
        let jobs = vec![
            make_job("A", "60000-80000", "full-time", "Onsite", "night"),
            make_job("B", "40000-50000", "part-time", "Remote", "day"),
            make_job("C", "60000-80000", "full-time", "Remote", "day"),
        ];
        let first = rank_jobs(&pref, &jobs, &weights).unwrap();
        let second = rank_jobs(&pref, &jobs, &weights).unwrap();
        let ids = |r: &[ScoredJob]| r.iter().map(|s| (s.job.id, s.match_score)).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_ranking_sorts_descending_with_stable_ties() {
        let pref = make_preference();
        let weights = MatchWeights::default();
        // Two boundary jobs tie at 30; they must keep their input order.
        let tie_a = make_job("Tie A", "40000-50000", "part-time", "Remote", "day");
        let tie_b = make_job("Tie B", "40000-50000", "part-time", "Remote", "day");
        let top = make_job("Top", "60000-80000", "full-time", "Remote", "day");
        let jobs = vec![tie_a.clone(), tie_b.clone(), top.clone()];

        let ranked = rank_jobs(&pref, &jobs, &weights).unwrap();
        assert_eq!(ranked[0].job.id, top.id);
        assert_eq!(ranked[0].match_score, 95);
        assert_eq!(ranked[1].job.id, tie_a.id);
        assert_eq!(ranked[2].job.id, tie_b.id);
    }

    #[test]
    fn test_empty_result_is_success() {
        let pref = make_preference();
        let jobs = vec![make_job("X", "0-1", "contractual", "Nowhere", "night")];
        let ranked = rank_jobs(&pref, &jobs, &MatchWeights::default()).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_unusable_preference_fails_fast() {
        let mut pref = make_preference();
        pref.locations.clear();
        let err = rank_jobs(&pref, &[], &MatchWeights::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidPreference(_)));
    }

    #[test]
    fn test_custom_weights_are_honored() {
        let pref = make_preference();
        let weights = MatchWeights {
            salary: 40,
            job_type: 20,
            location: 10,
            shift: 20,
            role_keyword: 10,
            threshold: 30,
        };
        let job = make_job("Engineer", "60000-80000", "full-time", "Onsite", "night");
        assert_eq!(score_job(&pref, &job, &weights), 60);
    }
}
