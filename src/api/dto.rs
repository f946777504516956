use crate::models::{MaterialType, NewQuizQuestion, Upload};

/// Multipart body of `POST /api/quizzes/create`.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub quiz_name: String,
    pub introduction: String,
    pub image: Upload,
    pub questions: Vec<NewQuizQuestion>,
    pub user_id: i64,
}

/// Multipart body of `POST /api/materials`. Only the payload matching
/// `material_type` is expected to be set.
#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub course_name: String,
    pub material_title: String,
    pub material_type: MaterialType,
    pub course_image: Option<Upload>,
    pub pdf_file: Option<Upload>,
    pub video_file: Option<Upload>,
    pub video_url: Option<String>,
    pub text_content: Option<String>,
}

/// Multipart body of `PUT /api/update-profile/:id`.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
    pub password: Option<String>,
    pub profile_image: Option<Upload>,
}
