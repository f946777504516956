use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{NewQuiz, PlatformApi};
use crate::error::ClientError;
use crate::models::{NewQuizQuestion, OptionLabel, Upload};
use crate::storage::SessionStore;

pub const MAX_QUESTIONS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionDraft {
    pub question: String,
    pub options: [String; 4],
    pub correct: Option<OptionLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizDraft {
    pub quiz_name: String,
    pub introduction: String,
    pub image: Option<Upload>,
    pub questions: Vec<QuestionDraft>,
}

impl Default for QuizDraft {
    fn default() -> Self {
        Self {
            quiz_name: String::new(),
            introduction: String::new(),
            image: None,
            questions: vec![QuestionDraft::default()],
        }
    }
}

impl QuizDraft {
    /// Checks the draft top to bottom and reports the first problem.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.quiz_name.trim().is_empty() {
            return Err(ClientError::validation("Please enter a quiz name."));
        }
        match &self.image {
            None => return Err(ClientError::validation("Please upload a quiz image.")),
            Some(image) if !image.is_image() => {
                return Err(ClientError::validation("Please select an image file."));
            }
            Some(_) => {}
        }
        if self.questions.is_empty() {
            return Err(ClientError::validation("Add at least one question."));
        }
        if self.questions.len() > MAX_QUESTIONS {
            return Err(max_questions());
        }

        for (index, draft) in self.questions.iter().enumerate() {
            let n = index + 1;
            if draft.question.trim().is_empty() {
                return Err(ClientError::validation(format!("Question {} is empty.", n)));
            }
            if draft.options.iter().any(|o| o.trim().is_empty()) {
                return Err(ClientError::validation(format!(
                    "All options must be filled for Question {}.",
                    n
                )));
            }
            if draft.correct.is_none() {
                return Err(ClientError::validation(format!(
                    "Select a correct answer for Question {}.",
                    n
                )));
            }
        }
        Ok(())
    }

    fn questions(&self) -> Vec<NewQuizQuestion> {
        self.questions
            .iter()
            .filter_map(|draft| {
                Some(NewQuizQuestion {
                    question: draft.question.trim().to_string(),
                    options: draft.options.clone().map(|o| o.trim().to_string()),
                    correct: draft.correct?,
                })
            })
            .collect()
    }
}

fn max_questions() -> ClientError {
    ClientError::validation(format!(
        "You can only add a maximum of {} questions.",
        MAX_QUESTIONS
    ))
}

/// Teacher quiz authoring.
pub struct QuizBuilderPage {
    api: Arc<dyn PlatformApi>,
    store: SessionStore,
    pub draft: QuizDraft,
    pub message: Option<String>,
}

impl QuizBuilderPage {
    pub fn new(api: Arc<dyn PlatformApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            draft: QuizDraft::default(),
            message: None,
        }
    }

    /// Appends an empty question and returns its index.
    pub fn add_question(&mut self) -> Result<usize, ClientError> {
        if self.draft.questions.len() >= MAX_QUESTIONS {
            let e = max_questions();
            self.message = Some(e.user_message());
            return Err(e);
        }
        self.draft.questions.push(QuestionDraft::default());
        Ok(self.draft.questions.len() - 1)
    }

    pub fn remove_question(&mut self, index: usize) {
        if index < self.draft.questions.len() {
            self.draft.questions.remove(index);
        }
    }

    fn question_mut(&mut self, index: usize) -> Result<&mut QuestionDraft, ClientError> {
        self.draft
            .questions
            .get_mut(index)
            .ok_or_else(|| ClientError::validation(format!("No question {}", index + 1)))
    }

    pub fn set_question(&mut self, index: usize, text: &str) -> Result<(), ClientError> {
        self.question_mut(index)?.question = text.to_string();
        Ok(())
    }

    pub fn set_option(&mut self, index: usize, label: OptionLabel, text: &str) -> Result<(), ClientError> {
        self.question_mut(index)?.options[label.index()] = text.to_string();
        Ok(())
    }

    pub fn set_correct(&mut self, index: usize, label: OptionLabel) -> Result<(), ClientError> {
        self.question_mut(index)?.correct = Some(label);
        Ok(())
    }

    pub fn set_image(&mut self, image: Upload) {
        self.draft.image = Some(image);
    }

    pub async fn save(&mut self) -> Result<(), ClientError> {
        if let Err(e) = self.draft.validate() {
            self.message = Some(e.user_message());
            return Err(e);
        }
        let Some(image) = self.draft.image.clone() else {
            return Err(ClientError::validation("Please upload a quiz image."));
        };
        let user_id = self.store.user_id().await?.unwrap_or(1);

        let quiz = NewQuiz {
            quiz_name: self.draft.quiz_name.trim().to_string(),
            introduction: self.draft.introduction.trim().to_string(),
            image,
            questions: self.draft.questions(),
            user_id,
        };
        let question_count = quiz.questions.len();

        if let Err(e) = self.api.create_quiz(quiz).await {
            warn!("failed to save quiz: {}", e);
            self.message = Some(format!("Failed to save quiz: {}", e.user_message()));
            return Err(e);
        }

        info!("saved quiz {:?} with {} questions", self.draft.quiz_name, question_count);
        self.draft = QuizDraft::default();
        self.message = Some("Quiz saved successfully!".to_string());
        Ok(())
    }
}
