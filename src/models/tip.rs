use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const TIP_CATEGORIES: [&str; 8] = [
    "General",
    "Password Security",
    "Phishing Awareness",
    "Social Media",
    "Network Security",
    "Mobile Security",
    "Data Protection",
    "Privacy",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_id::deserialize")]
    pub author_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTip {
    pub title: String,
    pub content: String,
    pub category: String,
    pub author_id: Option<i64>,
    pub week: u32,
}

/// Week of the year a tip is stamped with: day 1..=7 is week 1.
pub fn week_of_year(date: NaiveDate) -> u32 {
    (date.ordinal0() + 7) / 7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weeks_start_on_january_first() {
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
        assert_eq!(week_of_year(d(1, 1)), 1);
        assert_eq!(week_of_year(d(1, 7)), 1);
        assert_eq!(week_of_year(d(1, 8)), 2);
        assert_eq!(week_of_year(d(12, 31)), 53);
    }

    #[test]
    fn author_id_may_be_a_string() {
        let tip: Tip = serde_json::from_str(
            r#"{"id":2,"title":"Lock screens","content":"Always","author_id":"12"}"#,
        )
        .unwrap();
        assert_eq!(tip.author_id, Some(12));
        assert_eq!(tip.category, "");
    }
}
