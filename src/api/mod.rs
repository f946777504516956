pub mod dto;
mod http;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::models::{
    LoginRequest, Material, NewTip, Quiz, QuizResult, RegisterRequest, Student, SubmitRequest,
    SubmitResponse, Tip, User, UserPayload,
};

pub use dto::{NewMaterial, NewQuiz, ProfileUpdate};
pub use http::HttpPlatformApi;

/// Typed calls against the platform REST API, shared by every page.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<User, ClientError>;
    async fn register(&self, req: &RegisterRequest) -> Result<(), ClientError>;

    async fn fetch_user(&self, id: i64) -> Result<User, ClientError>;
    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<User, ClientError>;

    async fn fetch_users(&self) -> Result<Vec<User>, ClientError>;
    async fn create_user(&self, payload: &UserPayload) -> Result<(), ClientError>;
    async fn update_user(&self, id: i64, payload: &UserPayload) -> Result<(), ClientError>;
    async fn delete_user(&self, id: i64) -> Result<(), ClientError>;

    async fn fetch_students(&self) -> Result<Vec<Student>, ClientError>;
    async fn fetch_quiz_results(&self) -> Result<Vec<QuizResult>, ClientError>;

    async fn fetch_quizzes(&self) -> Result<Vec<Quiz>, ClientError>;
    async fn fetch_quiz(&self, id: i64) -> Result<Quiz, ClientError>;
    async fn submit_quiz(&self, id: i64, req: &SubmitRequest) -> Result<SubmitResponse, ClientError>;
    async fn create_quiz(&self, quiz: NewQuiz) -> Result<(), ClientError>;

    async fn fetch_materials(&self) -> Result<Vec<Material>, ClientError>;
    async fn fetch_material_text(&self, id: i64) -> Result<String, ClientError>;
    async fn create_material(&self, material: NewMaterial) -> Result<Material, ClientError>;
    async fn delete_material(&self, id: i64) -> Result<(), ClientError>;

    async fn fetch_tips(&self) -> Result<Vec<Tip>, ClientError>;
    async fn create_tip(&self, tip: &NewTip) -> Result<(), ClientError>;
    async fn delete_tip(&self, id: i64) -> Result<(), ClientError>;
}
