use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(OptionLabel::A),
            "B" => Some(OptionLabel::B),
            "C" => Some(OptionLabel::C),
            "D" => Some(OptionLabel::D),
            _ => None,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = (b'A' + *self as u8) as char;
        write!(f, "{}", c)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub option_label: OptionLabel,
    pub option_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    #[serde(default)]
    pub options: Vec<QuizOption>,
}

impl Question {
    pub fn offers(&self, label: OptionLabel) -> bool {
        self.options.iter().any(|o| o.option_label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub quiz_name: String,
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Empty on the list endpoint.
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Quiz {
    pub fn question(&self, id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Percentage score, always within 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const PERFECT: Score = Score(100);

    pub fn new(value: u8) -> Option<Self> {
        (value <= 100).then_some(Score(value))
    }

    /// `round(100 * correct / total)`; an empty quiz scores zero.
    pub fn percentage(correct: u32, total: u32) -> Self {
        if total == 0 {
            return Score(0);
        }
        let correct = correct.min(total) as f64;
        Score((100.0 * correct / total as f64).round() as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_perfect(self) -> bool {
        self.0 == 100
    }
}

impl TryFrom<i64> for Score {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Score::new)
            .ok_or_else(|| format!("score {} is outside 0..=100", value))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub answers: BTreeMap<i64, OptionLabel>,
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerReview {
    pub question_id: i64,
    #[serde(default)]
    pub user_answer: Option<OptionLabel>,
    pub correct_answer: OptionLabel,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub score: Score,
    pub total_questions: u32,
    pub correct_count: u32,
    #[serde(default)]
    pub answers: Vec<AnswerReview>,
}

impl SubmitResponse {
    pub fn review(&self, question_id: i64) -> Option<&AnswerReview> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub user_name: String,
    pub quiz_name: String,
    pub score: i64,
    #[serde(default)]
    pub submitted_at: Option<String>,
}

/// Question as the quiz-create endpoint expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewQuizQuestion {
    pub question: String,
    pub options: [String; 4],
    pub correct: OptionLabel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_rejects_out_of_range_values() {
        let ok: Result<SubmitResponse, _> = serde_json::from_str(
            r#"{"score":100,"totalQuestions":2,"correctCount":2,"answers":[]}"#,
        );
        assert!(ok.unwrap().score.is_perfect());

        let too_high: Result<SubmitResponse, _> = serde_json::from_str(
            r#"{"score":120,"totalQuestions":2,"correctCount":2,"answers":[]}"#,
        );
        assert!(too_high.is_err());

        let negative: Result<SubmitResponse, _> = serde_json::from_str(
            r#"{"score":-1,"totalQuestions":2,"correctCount":0,"answers":[]}"#,
        );
        assert!(negative.is_err());
    }

    #[test]
    fn percentage_rounds() {
        assert_eq!(Score::percentage(2, 3).value(), 67);
        assert_eq!(Score::percentage(1, 3).value(), 33);
        assert_eq!(Score::percentage(5, 5), Score::PERFECT);
        assert_eq!(Score::percentage(0, 0).value(), 0);
    }

    #[test]
    fn submit_body_uses_question_ids_as_keys() {
        let mut answers = BTreeMap::new();
        answers.insert(7, OptionLabel::C);
        let body = serde_json::to_value(SubmitRequest { answers, user_id: "4".into() }).unwrap();
        assert_eq!(body, serde_json::json!({"answers": {"7": "C"}, "userId": "4"}));
    }

    #[test]
    fn labels_follow_letter_order() {
        assert_eq!(OptionLabel::from_index(2), Some(OptionLabel::C));
        assert_eq!(OptionLabel::from_index(4), None);
        assert_eq!(OptionLabel::parse(" b"), Some(OptionLabel::B));
        assert_eq!(OptionLabel::D.to_string(), "D");
    }
}
