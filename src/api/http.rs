use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::PlatformApi;
use super::dto::{NewMaterial, NewQuiz, ProfileUpdate};
use crate::config::Config;
use crate::error::{ClientError, ErrorResponse};
use crate::models::{
    LoginRequest, LoginResponse, Material, MaterialText, NewTip, ProfileUpdateResponse, Quiz,
    QuizResult, RegisterRequest, Student, SubmitRequest, SubmitResponse, Tip, Upload, User,
    UserPayload,
};

pub struct HttpPlatformApi {
    client: Client,
    config: Config,
}

impl HttpPlatformApi {
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        self.config.api_url(path)
    }

    /// Sends the request and returns the body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ClientError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Network(e)
            }
        })?;

        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Network(e)
            }
        })?;

        if !status.is_success() {
            warn!("API error {} from {}: {}", status, url, body);
            return Err(api_error(status, &body));
        }

        debug!("{} {}", status, url);
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let body = self.send(request).await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!("Failed to parse response: {}", e);
            ClientError::Decode(e.to_string())
        })
    }
}

fn api_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error.or(e.message))
        .filter(|m| !m.trim().is_empty());
    ClientError::Api { status, message }
}

fn file_part(upload: Upload) -> Result<Part, ClientError> {
    let Upload { file_name, mime, bytes } = upload;
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(&mime)
        .map_err(|_| ClientError::validation(format!("Unsupported file type: {}", mime)))
}

#[async_trait]
impl PlatformApi for HttpPlatformApi {
    async fn login(&self, req: &LoginRequest) -> Result<User, ClientError> {
        let response: LoginResponse = self
            .send_json(self.client.post(self.url("/api/login")).json(req))
            .await?;
        Ok(response.user)
    }

    async fn register(&self, req: &RegisterRequest) -> Result<(), ClientError> {
        self.send(self.client.post(self.url("/api/register")).json(req))
            .await?;
        Ok(())
    }

    async fn fetch_user(&self, id: i64) -> Result<User, ClientError> {
        self.send_json(self.client.get(self.url(&format!("/api/user/{}", id))))
            .await
    }

    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<User, ClientError> {
        let mut form = Form::new()
            .text("fullName", update.full_name)
            .text("email", update.email);
        if let Some(password) = update.password.filter(|p| !p.trim().is_empty()) {
            form = form.text("password", password);
        }
        if let Some(image) = update.profile_image {
            form = form.part("profileImage", file_part(image)?);
        }

        let request = self
            .client
            .put(self.url(&format!("/api/update-profile/{}", id)))
            .multipart(form)
            .timeout(self.config.profile_timeout);
        let response: ProfileUpdateResponse = self.send_json(request).await?;
        Ok(response.user)
    }

    async fn fetch_users(&self) -> Result<Vec<User>, ClientError> {
        self.send_json(self.client.get(self.url("/api/users"))).await
    }

    async fn create_user(&self, payload: &UserPayload) -> Result<(), ClientError> {
        self.send(self.client.post(self.url("/api/users/add")).json(payload))
            .await?;
        Ok(())
    }

    async fn update_user(&self, id: i64, payload: &UserPayload) -> Result<(), ClientError> {
        self.send(
            self.client
                .put(self.url(&format!("/api/users/update/{}", id)))
                .json(payload),
        )
        .await?;
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), ClientError> {
        self.send(self.client.delete(self.url(&format!("/api/users/delete/{}", id))))
            .await?;
        Ok(())
    }

    async fn fetch_students(&self) -> Result<Vec<Student>, ClientError> {
        self.send_json(self.client.get(self.url("/api/students"))).await
    }

    async fn fetch_quiz_results(&self) -> Result<Vec<QuizResult>, ClientError> {
        self.send_json(self.client.get(self.url("/api/quiz-results")))
            .await
    }

    async fn fetch_quizzes(&self) -> Result<Vec<Quiz>, ClientError> {
        self.send_json(self.client.get(self.url("/api/quizzes"))).await
    }

    async fn fetch_quiz(&self, id: i64) -> Result<Quiz, ClientError> {
        self.send_json(self.client.get(self.url(&format!("/api/quizzes/{}", id))))
            .await
    }

    async fn submit_quiz(&self, id: i64, req: &SubmitRequest) -> Result<SubmitResponse, ClientError> {
        self.send_json(
            self.client
                .post(self.url(&format!("/api/quizzes/{}/submit", id)))
                .json(req),
        )
        .await
    }

    async fn create_quiz(&self, quiz: NewQuiz) -> Result<(), ClientError> {
        let questions = serde_json::to_string(&quiz.questions)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        let form = Form::new()
            .text("quizName", quiz.quiz_name)
            .text("introduction", quiz.introduction)
            .part("image", file_part(quiz.image)?)
            .text("questions", questions)
            .text("userId", quiz.user_id.to_string());

        self.send(self.client.post(self.url("/api/quizzes/create")).multipart(form))
            .await?;
        Ok(())
    }

    async fn fetch_materials(&self) -> Result<Vec<Material>, ClientError> {
        self.send_json(self.client.get(self.url("/api/materials"))).await
    }

    async fn fetch_material_text(&self, id: i64) -> Result<String, ClientError> {
        let text: MaterialText = self
            .send_json(self.client.get(self.url(&format!("/api/materials/text/{}", id))))
            .await?;
        Ok(text.text_content)
    }

    async fn create_material(&self, material: NewMaterial) -> Result<Material, ClientError> {
        let mut form = Form::new()
            .text("courseName", material.course_name)
            .text("materialTitle", material.material_title)
            .text("materialType", material.material_type.as_str());
        if let Some(image) = material.course_image {
            form = form.part("courseImage", file_part(image)?);
        }
        if let Some(pdf) = material.pdf_file {
            form = form.part("pdfFile", file_part(pdf)?);
        }
        if let Some(video) = material.video_file {
            form = form.part("videoFile", file_part(video)?);
        }
        if let Some(url) = material.video_url.filter(|u| !u.is_empty()) {
            form = form.text("videoUrl", url);
        }
        if let Some(text) = material.text_content.filter(|t| !t.is_empty()) {
            form = form.text("textContent", text);
        }

        self.send_json(self.client.post(self.url("/api/materials")).multipart(form))
            .await
    }

    async fn delete_material(&self, id: i64) -> Result<(), ClientError> {
        self.send(self.client.delete(self.url(&format!("/api/materials/{}", id))))
            .await?;
        Ok(())
    }

    async fn fetch_tips(&self) -> Result<Vec<Tip>, ClientError> {
        self.send_json(self.client.get(self.url("/api/tips"))).await
    }

    async fn create_tip(&self, tip: &NewTip) -> Result<(), ClientError> {
        self.send(self.client.post(self.url("/api/tips")).json(tip))
            .await?;
        Ok(())
    }

    async fn delete_tip(&self, id: i64) -> Result<(), ClientError> {
        self.send(self.client.delete(self.url(&format!("/api/tips/{}", id))))
            .await?;
        Ok(())
    }
}
