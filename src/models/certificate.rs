use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COORDINATORS: [&str; 1] = ["L. Lephallo"];

/// What the certificate page needs. Carried as navigation state from the quiz
/// page and also persisted so the page can be reopened later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateData {
    pub student_name: String,
    #[serde(default)]
    pub quiz_name: String,
    pub completion_date: String,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default = "default_coordinators")]
    pub coordinators: Vec<String>,
}

impl CertificateData {
    pub fn new(student_name: impl Into<String>, quiz_name: impl Into<String>, date: NaiveDate, score: u8) -> Self {
        Self {
            student_name: student_name.into(),
            quiz_name: quiz_name.into(),
            completion_date: format_completion_date(date),
            score: Some(score),
            coordinators: default_coordinators(),
        }
    }
}

fn default_coordinators() -> Vec<String> {
    DEFAULT_COORDINATORS.iter().map(|c| c.to_string()).collect()
}

/// "October 17, 2026"
pub fn format_completion_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_date_is_long_form() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(format_completion_date(date), "March 5, 2026");
    }

    #[test]
    fn missing_coordinators_fall_back() {
        let data: CertificateData = serde_json::from_str(
            r#"{"studentName":"Thabo","completionDate":"March 5, 2026"}"#,
        )
        .unwrap();
        assert_eq!(data.coordinators, vec!["L. Lephallo".to_string()]);
        assert_eq!(data.score, None);
    }
}
