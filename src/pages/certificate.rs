use std::io::Write;

use chrono::Local;

use crate::error::ClientError;
use crate::models::certificate::{DEFAULT_COORDINATORS, format_completion_date};
use crate::models::CertificateData;
use crate::storage::{CertificateKey, SessionStore};

const WIDTH: usize = 64;

pub struct CertificatePage {
    data: CertificateData,
}

impl CertificatePage {
    pub fn new(data: CertificateData) -> Self {
        Self { data }
    }

    /// Navigation state wins, then the persisted snapshot, then placeholders.
    pub async fn resolve(
        navigation: Option<CertificateData>,
        store: &SessionStore,
    ) -> Result<Self, ClientError> {
        let data = match navigation {
            Some(data) => data,
            None => match store.get::<CertificateKey>().await? {
                Some(data) => data,
                None => CertificateData {
                    student_name: "Student Name".to_string(),
                    quiz_name: String::new(),
                    completion_date: format_completion_date(Local::now().date_naive()),
                    score: None,
                    coordinators: DEFAULT_COORDINATORS.iter().map(|c| c.to_string()).collect(),
                },
            },
        };
        Ok(Self { data })
    }

    pub fn data(&self) -> &CertificateData {
        &self.data
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(WIDTH);
        let mut lines = vec![
            rule.clone(),
            String::new(),
            centered("CYBER SECURITY"),
            centered("CERTIFICATE OF PARTICIPATION"),
            String::new(),
            centered("This certificate is Proudly Presented to"),
            String::new(),
            centered(&self.data.student_name.to_uppercase()),
            String::new(),
            centered("for successfully completing the Cybersecurity Course"),
        ];
        if !self.data.quiz_name.is_empty() {
            lines.push(centered(&self.data.quiz_name));
        }
        lines.push(centered(&self.data.completion_date));
        lines.push(String::new());
        for coordinator in &self.data.coordinators {
            lines.push(centered(coordinator));
        }
        lines.push(centered("Coordinator"));
        lines.push(String::new());
        lines.push(centered("DEPARTMENT OF CYBERSECURITY"));
        lines.push(String::new());
        lines.push(rule);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    pub fn print(&self, out: &mut impl Write) -> Result<(), ClientError> {
        out.write_all(self.render().as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

fn centered(text: &str) -> String {
    let len = text.chars().count();
    if len >= WIDTH {
        return text.to_string();
    }
    let pad = (WIDTH - len) / 2;
    format!("{}{}", " ".repeat(pad), text).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn sample() -> CertificateData {
        CertificateData::new(
            "Naledi Mokoena",
            "Phishing Basics",
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            100,
        )
    }

    #[test]
    fn renders_fixed_layout() {
        let text = CertificatePage::new(sample()).render();
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        assert_eq!(lines[2], "CYBER SECURITY");
        assert!(lines.contains(&"NALEDI MOKOENA"));
        assert!(lines.contains(&"October 17, 2026"));
        assert!(lines.contains(&"L. Lephallo"));
        assert_eq!(lines[lines.len() - 3], "DEPARTMENT OF CYBERSECURITY");
    }

    #[test]
    fn print_writes_the_rendered_document() {
        let page = CertificatePage::new(sample());
        let mut buf = Vec::new();
        page.print(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), page.render());
    }

    #[tokio::test]
    async fn navigation_state_is_preferred_over_snapshot() {
        let store = SessionStore::in_memory().await.unwrap();
        let mut stored = sample();
        stored.student_name = "Stored".into();
        store.set::<CertificateKey>(&stored).await.unwrap();

        let page = CertificatePage::resolve(Some(sample()), &store).await.unwrap();
        assert_eq!(page.data().student_name, "Naledi Mokoena");

        let page = CertificatePage::resolve(None, &store).await.unwrap();
        assert_eq!(page.data().student_name, "Stored");
    }

    #[tokio::test]
    async fn placeholder_when_nothing_is_known() {
        let store = SessionStore::in_memory().await.unwrap();
        let page = CertificatePage::resolve(None, &store).await.unwrap();
        assert_eq!(page.data().student_name, "Student Name");
        assert_eq!(page.data().coordinators, vec!["L. Lephallo".to_string()]);
    }
}
