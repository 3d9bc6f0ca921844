// src/types/job.rs
use serde::{Deserialize, Serialize};

/// Structured description of one job posting. Built from CLI arguments, one
/// element of a batch file, or AI extraction of a chat message; lives only for
/// the duration of a single pipeline run.
///
/// `title`, `location` and `requirements` are required by the publish
/// pipeline; everything else falls back to a default at prompt time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobFields {
    pub title: Option<String>,
    pub location: Option<String>,
    pub requirements: Option<String>,
    pub company: Option<String>,
    pub salary: Option<String>,
    #[serde(rename = "type", alias = "job_type")]
    pub job_type: Option<String>,
    #[serde(alias = "applyLink")]
    pub apply_link: Option<String>,
    #[serde(alias = "applyEmail")]
    pub apply_email: Option<String>,
    #[serde(alias = "interviewDate")]
    pub interview_date: Option<String>,
    #[serde(alias = "interviewTime")]
    pub interview_time: Option<String>,
    #[serde(alias = "interviewLocation")]
    pub interview_location: Option<String>,
    pub labels: Vec<String>,
}

impl JobFields {
    /// First required field that is absent or blank, if any.
    pub fn missing_required(&self) -> Option<&'static str> {
        let required = [
            ("title", &self.title),
            ("location", &self.location),
            ("requirements", &self.requirements),
        ];
        for (name, value) in required {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                return Some(name);
            }
        }
        None
    }

    /// Post title as it appears on the blog: "<title> - <location>".
    pub fn post_title(&self) -> String {
        format!(
            "{} - {}",
            self.title.as_deref().unwrap_or_default(),
            self.location.as_deref().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_job() -> JobFields {
        JobFields {
            title: Some("Backend Engineer".to_string()),
            location: Some("Remote".to_string()),
            requirements: Some("3+ yrs Node".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_required() {
        assert_eq!(complete_job().missing_required(), None);

        let mut job = complete_job();
        job.location = None;
        assert_eq!(job.missing_required(), Some("location"));

        let mut job = complete_job();
        job.requirements = Some("   ".to_string());
        assert_eq!(job.missing_required(), Some("requirements"));

        assert_eq!(JobFields::default().missing_required(), Some("title"));
    }

    #[test]
    fn test_post_title() {
        assert_eq!(complete_job().post_title(), "Backend Engineer - Remote");
    }

    #[test]
    fn test_deserialize_camel_case_with_nulls() {
        // Shape emitted by the extraction model and by legacy batch files.
        let json = r#"{
            "title": "React Dev",
            "location": "Dubai",
            "requirements": "3yrs exp",
            "company": null,
            "salary": null,
            "type": "Full-time",
            "applyLink": null,
            "applyEmail": "jobs@tech.com",
            "interviewDate": null,
            "interviewTime": null,
            "interviewLocation": null
        }"#;
        let job: JobFields = serde_json::from_str(json).unwrap();
        assert_eq!(job.title.as_deref(), Some("React Dev"));
        assert_eq!(job.job_type.as_deref(), Some("Full-time"));
        assert_eq!(job.apply_email.as_deref(), Some("jobs@tech.com"));
        assert_eq!(job.company, None);
        assert!(job.labels.is_empty());
    }

    #[test]
    fn test_deserialize_batch_entry_with_labels() {
        let json = r#"{
            "title": "Nurse",
            "location": "Abu Dhabi",
            "requirements": "DOH license",
            "labels": ["Healthcare", "UAE"]
        }"#;
        let job: JobFields = serde_json::from_str(json).unwrap();
        assert_eq!(job.labels, vec!["Healthcare", "UAE"]);
    }
}
