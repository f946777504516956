#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use frontend::api::{NewMaterial, NewQuiz, PlatformApi, ProfileUpdate};
use frontend::error::ClientError;
use frontend::models::{
    AnswerReview, LoginRequest, Material, NewTip, OptionLabel, Question, Quiz, QuizOption,
    QuizResult, RegisterRequest, Role, Score, Student, SubmitRequest, SubmitResponse, Tip, User,
    UserPayload,
};
use frontend::storage::SessionStore;
use reqwest::StatusCode;

/// In-memory stand-in for the platform API. Lists are mutated by the
/// create/delete calls so pages can be checked against them.
#[derive(Default)]
pub struct FakeApi {
    pub users: Mutex<Vec<User>>,
    pub quizzes: Mutex<Vec<Quiz>>,
    pub answer_key: Mutex<BTreeMap<i64, OptionLabel>>,
    pub materials: Mutex<Vec<Material>>,
    pub tips: Mutex<Vec<Tip>>,
    pub results: Mutex<Vec<QuizResult>>,
    /// Returned once by the next `submit_quiz` call.
    pub submit_failure: Mutex<Option<ClientError>>,
    /// Returned once by the next `fetch_quiz` call.
    pub fetch_failure: Mutex<Option<ClientError>>,
    /// Closed while the next submission is in flight.
    pub close_on_submit: Mutex<Option<SessionStore>>,
    pub tips_unavailable: AtomicBool,
    pub submit_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub last_submit: Mutex<Option<SubmitRequest>>,
    pub created_quizzes: Mutex<Vec<NewQuiz>>,
}

impl FakeApi {
    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Adds a quiz whose question `n` (1-based) has id `10 + n` and correct
    /// answer `key[n - 1]`.
    pub fn with_quiz(self, id: i64, name: &str, key: &[OptionLabel]) -> Self {
        let mut questions = Vec::new();
        {
            let mut answer_key = self.answer_key.lock().unwrap();
            for (index, correct) in key.iter().enumerate() {
                let question_id = 11 + index as i64;
                answer_key.insert(question_id, *correct);
                questions.push(question(question_id, &format!("Question {}", index + 1)));
            }
        }
        self.quizzes.lock().unwrap().push(Quiz {
            id,
            quiz_name: name.to_string(),
            introduction: "Read carefully.".to_string(),
            image_url: Some("quiz.png".to_string()),
            questions,
            created_at: None,
        });
        self
    }

    pub fn with_user(self, id: i64, name: &str, role: Role) -> Self {
        self.users.lock().unwrap().push(user(id, name, role));
        self
    }

    pub fn with_material(self, material: Material) -> Self {
        self.materials.lock().unwrap().push(material);
        self
    }

    pub fn with_tip(self, id: i64, title: &str) -> Self {
        self.tips.lock().unwrap().push(Tip {
            id,
            title: title.to_string(),
            content: "Stay safe online.".to_string(),
            category: "General".to_string(),
            week: Some(1),
            created_at: None,
            author_id: Some(2),
        });
        self
    }
}

pub fn question(id: i64, text: &str) -> Question {
    Question {
        id,
        question_text: text.to_string(),
        options: OptionLabel::ALL
            .iter()
            .map(|label| QuizOption {
                option_label: *label,
                option_text: format!("Option {}", label),
            })
            .collect(),
    }
}

pub fn user(id: i64, name: &str, role: Role) -> User {
    User {
        id,
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        user_type: role,
        profile_image: None,
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::Api {
        status: StatusCode::NOT_FOUND,
        message: Some(format!("{} not found", what)),
    }
}

#[async_trait]
impl PlatformApi for FakeApi {
    async fn login(&self, req: &LoginRequest) -> Result<User, ClientError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == req.email)
            .cloned()
            .ok_or_else(|| ClientError::Api {
                status: StatusCode::UNAUTHORIZED,
                message: Some("Invalid email or password".to_string()),
            })
    }

    async fn register(&self, req: &RegisterRequest) -> Result<(), ClientError> {
        let mut users = self.users.lock().unwrap();
        let id = users.len() as i64 + 1;
        users.push(User {
            id,
            full_name: req.full_name.clone(),
            email: req.email.clone(),
            user_type: req.user_type,
            profile_image: None,
        });
        Ok(())
    }

    async fn fetch_user(&self, id: i64) -> Result<User, ClientError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| not_found("User"))
    }

    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<User, ClientError> {
        let mut users = self.users.lock().unwrap();
        let user = users.iter_mut().find(|u| u.id == id).ok_or_else(|| not_found("User"))?;
        user.full_name = update.full_name;
        user.email = update.email;
        if let Some(image) = update.profile_image {
            user.profile_image = Some(image.file_name);
        }
        Ok(user.clone())
    }

    async fn fetch_users(&self) -> Result<Vec<User>, ClientError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, payload: &UserPayload) -> Result<(), ClientError> {
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        users.push(User {
            id,
            full_name: payload.full_name.clone(),
            email: payload.email.clone(),
            user_type: payload.user_type,
            profile_image: None,
        });
        Ok(())
    }

    async fn update_user(&self, id: i64, payload: &UserPayload) -> Result<(), ClientError> {
        let mut users = self.users.lock().unwrap();
        let user = users.iter_mut().find(|u| u.id == id).ok_or_else(|| not_found("User"))?;
        user.full_name = payload.full_name.clone();
        user.email = payload.email.clone();
        user.user_type = payload.user_type;
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), ClientError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }

    async fn fetch_students(&self) -> Result<Vec<Student>, ClientError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.user_type == Role::Student)
            .map(|u| Student {
                full_name: Some(u.full_name.clone()),
                email: Some(u.email.clone()),
            })
            .collect())
    }

    async fn fetch_quiz_results(&self) -> Result<Vec<QuizResult>, ClientError> {
        Ok(self.results.lock().unwrap().clone())
    }

    async fn fetch_quizzes(&self) -> Result<Vec<Quiz>, ClientError> {
        Ok(self.quizzes.lock().unwrap().clone())
    }

    async fn fetch_quiz(&self, id: i64) -> Result<Quiz, ClientError> {
        let failure = self.fetch_failure.lock().unwrap().take();
        if let Some(e) = failure {
            return Err(e);
        }
        self.quizzes
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| not_found("Quiz"))
    }

    async fn submit_quiz(&self, id: i64, req: &SubmitRequest) -> Result<SubmitResponse, ClientError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_submit.lock().unwrap() = Some(req.clone());
        let failure = self.submit_failure.lock().unwrap().take();
        if let Some(e) = failure {
            return Err(e);
        }
        let store = self.close_on_submit.lock().unwrap().take();
        if let Some(store) = store {
            store.close().await;
        }

        let quiz = self.fetch_quiz(id).await?;
        let key = self.answer_key.lock().unwrap().clone();
        let answers: Vec<AnswerReview> = quiz
            .questions
            .iter()
            .map(|q| {
                let correct_answer = key[&q.id];
                let user_answer = req.answers.get(&q.id).copied();
                AnswerReview {
                    question_id: q.id,
                    user_answer,
                    correct_answer,
                    is_correct: user_answer == Some(correct_answer),
                }
            })
            .collect();
        let total = answers.len() as u32;
        let correct = answers.iter().filter(|a| a.is_correct).count() as u32;
        Ok(SubmitResponse {
            score: Score::percentage(correct, total),
            total_questions: total,
            correct_count: correct,
            answers,
        })
    }

    async fn create_quiz(&self, quiz: NewQuiz) -> Result<(), ClientError> {
        self.created_quizzes.lock().unwrap().push(quiz);
        Ok(())
    }

    async fn fetch_materials(&self) -> Result<Vec<Material>, ClientError> {
        Ok(self.materials.lock().unwrap().clone())
    }

    async fn fetch_material_text(&self, id: i64) -> Result<String, ClientError> {
        self.materials
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .and_then(|m| m.description.clone())
            .ok_or_else(|| not_found("Material"))
    }

    async fn create_material(&self, material: NewMaterial) -> Result<Material, ClientError> {
        let mut materials = self.materials.lock().unwrap();
        let id = materials.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let created = Material {
            id,
            material_type: material.material_type,
            course_name: material.course_name,
            material_title: material.material_title,
            description: material.text_content,
            file_url: material.video_url,
            course_image: material.course_image.map(|i| i.file_name),
            created_at: None,
        };
        materials.push(created.clone());
        Ok(created)
    }

    async fn delete_material(&self, id: i64) -> Result<(), ClientError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.materials.lock().unwrap().retain(|m| m.id != id);
        Ok(())
    }

    async fn fetch_tips(&self) -> Result<Vec<Tip>, ClientError> {
        if self.tips_unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: None,
            });
        }
        Ok(self.tips.lock().unwrap().clone())
    }

    async fn create_tip(&self, tip: &NewTip) -> Result<(), ClientError> {
        let mut tips = self.tips.lock().unwrap();
        let id = tips.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        tips.push(Tip {
            id,
            title: tip.title.clone(),
            content: tip.content.clone(),
            category: tip.category.clone(),
            week: Some(tip.week),
            created_at: None,
            author_id: tip.author_id,
        });
        Ok(())
    }

    async fn delete_tip(&self, id: i64) -> Result<(), ClientError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.tips.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }
}
