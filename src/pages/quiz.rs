use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::api::PlatformApi;
use crate::error::ClientError;
use crate::models::{CertificateData, OptionLabel, Quiz, Score, SubmitRequest, SubmitResponse};
use crate::storage::{CertificateKey, SessionStore};

pub const INCOMPLETE_MESSAGE: &str = "Please answer all questions before submitting.";
pub const SUBMITTED_MESSAGE: &str = "Quiz submitted successfully!";
pub const SUBMIT_FAILED_MESSAGE: &str = "Error submitting quiz.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to fetch quiz";

const FALLBACK_USER_ID: i64 = 1;
const FALLBACK_USER_NAME: &str = "Student";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    Error(String),
    /// Loaded and accepting selections.
    Answering,
    Submitting,
    Reviewed,
}

/// Per-option marker shown once the quiz has been reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionFeedback {
    Correct,
    YourAnswer,
}

pub struct QuizPage {
    api: Arc<dyn PlatformApi>,
    store: SessionStore,
    quiz_id: i64,
    phase: QuizPhase,
    quiz: Option<Quiz>,
    answers: BTreeMap<i64, OptionLabel>,
    result: Option<SubmitResponse>,
    certificate: Option<CertificateData>,
    message: Option<String>,
}

impl QuizPage {
    pub fn new(api: Arc<dyn PlatformApi>, store: SessionStore, quiz_id: i64) -> Self {
        Self {
            api,
            store,
            quiz_id,
            phase: QuizPhase::Loading,
            quiz: None,
            answers: BTreeMap::new(),
            result: None,
            certificate: None,
            message: None,
        }
    }

    pub async fn load(&mut self) {
        self.phase = QuizPhase::Loading;
        match self.api.fetch_quiz(self.quiz_id).await {
            Ok(quiz) => {
                info!("loaded quiz {} ({} questions)", quiz.id, quiz.questions.len());
                self.quiz = Some(quiz);
                self.phase = QuizPhase::Answering;
            }
            Err(e) => {
                warn!("failed to load quiz {}: {}", self.quiz_id, e);
                let message = e.server_message().unwrap_or(LOAD_FAILED_MESSAGE);
                self.phase = QuizPhase::Error(message.to_string());
            }
        }
    }

    /// Discards the attempt and loads the quiz again.
    pub async fn retake(&mut self) {
        self.quiz = None;
        self.answers.clear();
        self.result = None;
        self.certificate = None;
        self.message = None;
        self.load().await;
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn answers(&self) -> &BTreeMap<i64, OptionLabel> {
        &self.answers
    }

    pub fn answer(&self, question_id: i64) -> Option<OptionLabel> {
        self.answers.get(&question_id).copied()
    }

    pub fn result(&self) -> Option<&SubmitResponse> {
        self.result.as_ref()
    }

    pub fn score(&self) -> Option<Score> {
        self.result.as_ref().map(|r| r.score)
    }

    /// Inputs are disabled once the attempt has been reviewed.
    pub fn is_locked(&self) -> bool {
        self.phase != QuizPhase::Answering
    }

    pub fn select(&mut self, question_id: i64, label: OptionLabel) -> Result<(), ClientError> {
        if self.is_locked() {
            return Err(ClientError::validation("Answers can no longer be changed."));
        }
        let quiz = self
            .quiz
            .as_ref()
            .ok_or_else(|| ClientError::validation("Quiz is not loaded."))?;
        let question = quiz
            .question(question_id)
            .ok_or_else(|| ClientError::validation(format!("No question {} in this quiz.", question_id)))?;
        if !question.offers(label) {
            return Err(ClientError::validation(format!(
                "Option {} is not available for this question.",
                label
            )));
        }

        self.answers.insert(question_id, label);
        self.message = None;
        Ok(())
    }

    /// Question ids still lacking a selection, in quiz order.
    pub fn missing_answers(&self) -> Vec<i64> {
        self.quiz
            .as_ref()
            .map(|quiz| {
                quiz.questions
                    .iter()
                    .filter(|q| !self.answers.contains_key(&q.id))
                    .map(|q| q.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn submit(&mut self) -> Result<Score, ClientError> {
        match self.phase {
            QuizPhase::Answering => {}
            QuizPhase::Reviewed => {
                return Err(ClientError::validation("This quiz has already been submitted."));
            }
            _ => return Err(ClientError::validation("Quiz is not loaded.")),
        }

        if !self.missing_answers().is_empty() {
            self.message = Some(INCOMPLETE_MESSAGE.to_string());
            return Err(ClientError::validation(INCOMPLETE_MESSAGE));
        }

        let user_id = self.store.user_id().await?.unwrap_or(FALLBACK_USER_ID);
        let request = SubmitRequest {
            answers: self.answers.clone(),
            user_id: user_id.to_string(),
        };

        self.phase = QuizPhase::Submitting;
        let response = match self.api.submit_quiz(self.quiz_id, &request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("quiz {} submission failed: {}", self.quiz_id, e);
                self.phase = QuizPhase::Answering;
                self.message = Some(match e.server_message() {
                    Some(message) => format!("Submission failed: {}", message),
                    None => SUBMIT_FAILED_MESSAGE.to_string(),
                });
                return Err(e);
            }
        };

        let score = response.score;
        info!(
            "quiz {} reviewed: {} ({}/{})",
            self.quiz_id, score, response.correct_count, response.total_questions
        );

        // Recorded server side; nothing below may fail the submission.
        self.result = Some(response);
        self.phase = QuizPhase::Reviewed;
        self.message = Some(SUBMITTED_MESSAGE.to_string());

        if score.is_perfect() {
            self.issue_certificate(score).await;
        }
        Ok(score)
    }

    /// Builds the certificate and keeps a copy in the session store. A store
    /// failure only costs the persisted copy.
    async fn issue_certificate(&mut self, score: Score) {
        let student_name = match self.store.user_name().await {
            Ok(name) => name,
            Err(e) => {
                warn!("could not read user name for certificate: {}", e);
                None
            }
        }
        .unwrap_or_else(|| FALLBACK_USER_NAME.to_string());
        let quiz_name = self.quiz.as_ref().map(|q| q.quiz_name.clone()).unwrap_or_default();
        let data = CertificateData::new(
            student_name,
            quiz_name,
            Local::now().date_naive(),
            score.value(),
        );

        if let Err(e) = self.store.set::<CertificateKey>(&data).await {
            warn!("could not persist certificate for quiz {}: {}", self.quiz_id, e);
        }
        self.certificate = Some(data);
    }

    pub fn certificate_available(&self) -> bool {
        self.phase == QuizPhase::Reviewed && self.score().is_some_and(Score::is_perfect)
    }

    /// Navigation state for the certificate page.
    pub fn certificate(&self) -> Option<CertificateData> {
        if self.certificate_available() {
            self.certificate.clone()
        } else {
            None
        }
    }

    pub fn is_correct(&self, question_id: i64) -> Option<bool> {
        self.result
            .as_ref()
            .and_then(|r| r.review(question_id))
            .map(|review| review.is_correct)
    }

    pub fn feedback(&self, question_id: i64, label: OptionLabel) -> Option<OptionFeedback> {
        let review = self.result.as_ref()?.review(question_id)?;
        if label == review.correct_answer {
            Some(OptionFeedback::Correct)
        } else if Some(label) == review.user_answer && !review.is_correct {
            Some(OptionFeedback::YourAnswer)
        } else {
            None
        }
    }
}
