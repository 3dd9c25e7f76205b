//! CV generation request shapes and the date reshaping the backend
//! expects: form dates arrive as `MM/YYYY` (work experience) or bare
//! `YYYY` (education) and go out as ISO `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    /// ISO date, first of the month.
    pub start_date: Option<String>,
    /// None while the position is current.
    pub end_date: Option<String>,
    pub current: bool,
    pub description: Vec<String>,
    #[serde(default)]
    pub location: String,
}

impl WorkExperience {
    /// Builds an entry from form-style fields. An end date of "present"
    /// (any case) marks a current position, as does `is_current`.
    pub fn from_form(
        title: &str,
        company: &str,
        start_date: &str,
        end_date: &str,
        is_current: bool,
        description: Vec<String>,
        location: &str,
    ) -> Self {
        let current = is_current || end_date.trim().eq_ignore_ascii_case("present");
        WorkExperience {
            title: title.to_string(),
            company: company.to_string(),
            start_date: reshape_form_date(start_date),
            end_date: if current { None } else { reshape_form_date(end_date) },
            current,
            description,
            location: location.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub field_of_study: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
}

impl Education {
    /// Form years come as bare `YYYY`; ongoing studies get no end date.
    pub fn from_form(
        degree: &str,
        institution: &str,
        field_of_study: &str,
        start_year: &str,
        end_year: &str,
        ongoing: bool,
        gpa: Option<f64>,
    ) -> Self {
        Education {
            degree: degree.to_string(),
            institution: institution.to_string(),
            field_of_study: field_of_study.to_string(),
            start_date: year_to_iso(start_year, 1, 1),
            end_date: if ongoing {
                None
            } else {
                year_to_iso(end_year, 12, 31)
            },
            gpa,
        }
    }
}

/// Full payload for POST /api/cv/generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvGenerationRequest {
    pub personal_info: PersonalInfo,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub template: String,
    pub format: String,
}

impl CvGenerationRequest {
    /// Template defaults to "modern" and format to "pdf".
    pub fn new(
        personal_info: PersonalInfo,
        work_experience: Vec<WorkExperience>,
        education: Vec<Education>,
        skills: Vec<String>,
    ) -> Self {
        CvGenerationRequest {
            personal_info,
            work_experience,
            education,
            skills,
            template: "modern".to_string(),
            format: "pdf".to_string(),
        }
    }

    pub fn with_template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    /// The backend matches the format exactly, so it is lowercased here.
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.to_lowercase();
        self
    }
}

/// `MM/YYYY` becomes `YYYY-MM-01`; anything else non-empty passes through
/// as typed, since some forms already submit ISO dates.
fn reshape_form_date(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Some(month_year_to_iso(s).unwrap_or_else(|| s.to_string()))
}

/// "05/2021" -> "2021-05-01". None for anything that is not `MM/YYYY`.
fn month_year_to_iso(s: &str) -> Option<String> {
    let (month, year) = s.split_once('/')?;
    let month: u32 = month.trim().parse().ok()?;
    let year: i32 = year.trim().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Bare `YYYY` expanded to a concrete day of that year.
fn year_to_iso(s: &str, month: u32, day: u32) -> Option<String> {
    let year: i32 = s.trim().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_year_to_iso() {
        assert_eq!(month_year_to_iso("05/2021").as_deref(), Some("2021-05-01"));
        assert_eq!(month_year_to_iso("5/2021").as_deref(), Some("2021-05-01"));
        assert_eq!(month_year_to_iso("13/2021"), None); // no month 13
        assert_eq!(month_year_to_iso("2021-05-01"), None);
        assert_eq!(month_year_to_iso("May 2021"), None);
    }

    #[test]
    fn test_reshape_form_date_passes_iso_through() {
        assert_eq!(
            reshape_form_date("2021-05-01").as_deref(),
            Some("2021-05-01")
        );
        assert_eq!(reshape_form_date(""), None);
        assert_eq!(reshape_form_date("  "), None);
    }

    #[test]
    fn test_work_experience_present_marks_current() {
        let exp = WorkExperience::from_form(
            "Engineer",
            "Acme",
            "05/2021",
            "Present",
            false,
            vec!["Did things".to_string()],
            "Remote",
        );
        assert!(exp.current);
        assert_eq!(exp.start_date.as_deref(), Some("2021-05-01"));
        assert_eq!(exp.end_date, None);
    }

    #[test]
    fn test_work_experience_ended_position() {
        let exp =
            WorkExperience::from_form("Engineer", "Acme", "05/2019", "08/2021", false, vec![], "");
        assert!(!exp.current);
        assert_eq!(exp.end_date.as_deref(), Some("2021-08-01"));
    }

    #[test]
    fn test_education_year_expansion() {
        let edu = Education::from_form("BSc", "MIT", "CS", "2015", "2019", false, Some(3.8));
        assert_eq!(edu.start_date.as_deref(), Some("2015-01-01"));
        assert_eq!(edu.end_date.as_deref(), Some("2019-12-31"));
    }

    #[test]
    fn test_education_ongoing_has_no_end_date() {
        let edu = Education::from_form("PhD", "MIT", "CS", "2022", "2026", true, None);
        assert_eq!(edu.end_date, None);
    }

    #[test]
    fn test_education_bad_year_is_dropped() {
        let edu = Education::from_form("BSc", "MIT", "CS", "soon", "", false, None);
        assert_eq!(edu.start_date, None);
        assert_eq!(edu.end_date, None);
    }

    #[test]
    fn test_request_defaults_and_format_lowercasing() {
        let req = CvGenerationRequest::new(PersonalInfo::default(), vec![], vec![], vec![])
            .with_format("PDF");
        assert_eq!(req.template, "modern");
        assert_eq!(req.format, "pdf");
    }

    #[test]
    fn test_request_serializes_expected_shape() {
        let req = CvGenerationRequest::new(
            PersonalInfo {
                name: "Ada Lovelace".to_string(),
                ..Default::default()
            },
            vec![],
            vec![],
            vec!["Rust".to_string()],
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["personal_info"]["name"], "Ada Lovelace");
        assert_eq!(json["skills"][0], "Rust");
        assert_eq!(json["template"], "modern");
        assert_eq!(json["format"], "pdf");
    }
}
