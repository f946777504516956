use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::PlatformApi;
use crate::error::ClientError;
use crate::models::{Material, Quiz, QuizResult, Role, Student, User};
use crate::storage::SessionStore;

pub const QUIZZES_ERROR: &str = "Unable to load quizzes. Please try again later.";
pub const MATERIALS_ERROR: &str = "Unable to load materials. Please try again later.";
pub const TEXT_ERROR: &str = "Error loading content. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub total_users: usize,
    pub total_students: usize,
    pub total_teachers: usize,
    pub total_admins: usize,
}

pub fn user_stats(users: &[User]) -> UserStats {
    let count = |role: Role| users.iter().filter(|u| u.user_type == role).count();
    UserStats {
        total_users: users.len(),
        total_students: count(Role::Student),
        total_teachers: count(Role::Teacher),
        total_admins: count(Role::Admin),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentAverage {
    pub name: String,
    pub quizzes_completed: usize,
    pub average: i64,
}

/// Mean rounded half up, as the dashboards display it.
pub fn rounded_mean(scores: &[i64]) -> i64 {
    if scores.is_empty() {
        return 0;
    }
    let sum: i64 = scores.iter().sum();
    (sum as f64 / scores.len() as f64 + 0.5).floor() as i64
}

/// Per-student average score, students in the order they first appear.
pub fn average_scores(results: &[QuizResult]) -> Vec<StudentAverage> {
    let mut order: Vec<&str> = Vec::new();
    let mut scores: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for result in results {
        let name = result.user_name.as_str();
        if !scores.contains_key(name) {
            order.push(name);
        }
        scores.entry(name).or_default().push(result.score);
    }

    order
        .into_iter()
        .map(|name| {
            let student_scores = &scores[name];
            StudentAverage {
                name: name.to_string(),
                quizzes_completed: student_scores.len(),
                average: rounded_mean(student_scores),
            }
        })
        .collect()
}

pub struct StudentDashboard {
    api: Arc<dyn PlatformApi>,
    store: SessionStore,
    pub student_name: String,
    pub quizzes: Vec<Quiz>,
    pub videos: Vec<Material>,
    pub readings: Vec<Material>,
    pub quizzes_error: Option<String>,
    pub materials_error: Option<String>,
    ratings: BTreeMap<i64, u8>,
    full_text: BTreeMap<i64, String>,
}

impl StudentDashboard {
    pub fn new(api: Arc<dyn PlatformApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            student_name: "Student".to_string(),
            quizzes: Vec::new(),
            videos: Vec::new(),
            readings: Vec::new(),
            quizzes_error: None,
            materials_error: None,
            ratings: BTreeMap::new(),
            full_text: BTreeMap::new(),
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.load_student_name().await?;
        self.load_quizzes().await;
        self.load_materials().await;
        self.ratings = self.store.ratings().await?;
        Ok(())
    }

    async fn load_student_name(&mut self) -> Result<(), ClientError> {
        self.student_name = "Student".to_string();
        let Some(user_id) = self.store.user_id().await? else {
            return Ok(());
        };
        match self.api.fetch_user(user_id).await {
            Ok(user) if !user.full_name.is_empty() => self.student_name = user.full_name,
            Ok(_) => {}
            Err(e) => warn!("failed to load student {}: {}", user_id, e),
        }
        Ok(())
    }

    pub async fn load_quizzes(&mut self) {
        self.quizzes_error = None;
        match self.api.fetch_quizzes().await {
            Ok(quizzes) => self.quizzes = quizzes,
            Err(e) => {
                warn!("failed to load quizzes: {}", e);
                self.quizzes.clear();
                self.quizzes_error = Some(QUIZZES_ERROR.to_string());
            }
        }
    }

    pub async fn load_materials(&mut self) {
        self.materials_error = None;
        match self.api.fetch_materials().await {
            Ok(materials) => {
                self.videos.clear();
                self.readings.clear();
                for material in materials {
                    if material.material_type.is_video() {
                        self.videos.push(material);
                    } else if material.material_type.is_reading() {
                        self.readings.push(material);
                    } else {
                        debug!("skipping material {} of unknown type", material.id);
                    }
                }
            }
            Err(e) => {
                warn!("failed to load materials: {}", e);
                self.videos.clear();
                self.readings.clear();
                self.materials_error = Some(MATERIALS_ERROR.to_string());
            }
        }
    }

    /// Stars given to a material, 0 when unrated.
    pub fn rating(&self, material_id: i64) -> u8 {
        self.ratings.get(&material_id).copied().unwrap_or(0)
    }

    pub async fn rate(&mut self, material_id: i64, stars: u8) -> Result<(), ClientError> {
        self.store.rate_material(material_id, stars).await?;
        self.ratings.insert(material_id, stars);
        Ok(())
    }

    /// Full text of a reading, fetched on first use.
    pub async fn full_text(&mut self, material_id: i64) -> &str {
        if !self.full_text.contains_key(&material_id) {
            let text = match self.api.fetch_material_text(material_id).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("failed to load text of material {}: {}", material_id, e);
                    TEXT_ERROR.to_string()
                }
            };
            self.full_text.insert(material_id, text);
        }
        self.full_text
            .get(&material_id)
            .map(String::as_str)
            .unwrap_or(TEXT_ERROR)
    }
}

pub struct TeacherDashboard {
    api: Arc<dyn PlatformApi>,
    pub students: Vec<Student>,
    pub error: Option<String>,
}

impl TeacherDashboard {
    pub fn new(api: Arc<dyn PlatformApi>) -> Self {
        Self {
            api,
            students: Vec::new(),
            error: None,
        }
    }

    /// A failed fetch leaves the list empty and shows the error; nothing is
    /// substituted for the missing data.
    pub async fn load(&mut self) {
        self.error = None;
        match self.api.fetch_students().await {
            Ok(students) => self.students = students,
            Err(e) => {
                warn!("failed to load students: {}", e);
                self.students.clear();
                self.error = Some(e.user_message());
            }
        }
    }

    pub fn total_students(&self) -> usize {
        self.students.len()
    }

    /// The endpoint carries no activity flag, every listed student counts.
    pub fn active_students(&self) -> usize {
        self.students.len()
    }

    pub fn export_file_name(today: NaiveDate) -> String {
        format!("students_{}.csv", today.format("%Y-%m-%d"))
    }

    pub fn export_csv(&self, out: &mut impl Write) -> Result<usize, ClientError> {
        if self.students.is_empty() {
            return Err(ClientError::validation("No students to export"));
        }

        writeln!(out, "ID,Full Name,Email,Status,Registration Date")?;
        for (index, student) in self.students.iter().enumerate() {
            let id = (index + 1).to_string();
            let row = [
                id.as_str(),
                student.display_name(),
                student.display_email(),
                "active",
                "",
            ];
            let cells: Vec<String> = row.iter().map(|cell| csv_cell(cell)).collect();
            writeln!(out, "{}", cells.join(","))?;
        }
        out.flush()?;
        Ok(self.students.len())
    }
}

fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub struct AdminDashboard {
    api: Arc<dyn PlatformApi>,
    pub users: Vec<User>,
    pub results: Vec<QuizResult>,
    pub error: Option<String>,
}

impl AdminDashboard {
    pub fn new(api: Arc<dyn PlatformApi>) -> Self {
        Self {
            api,
            users: Vec::new(),
            results: Vec::new(),
            error: None,
        }
    }

    pub async fn load(&mut self) {
        self.error = None;
        match self.api.fetch_users().await {
            Ok(users) => self.users = users,
            Err(e) => {
                warn!("failed to load users: {}", e);
                self.error = Some(e.user_message());
                return;
            }
        }
        match self.api.fetch_quiz_results().await {
            Ok(results) => self.results = results,
            Err(e) => {
                warn!("failed to load quiz results: {}", e);
                self.error = Some(e.user_message());
            }
        }
    }

    pub fn stats(&self) -> UserStats {
        user_stats(&self.users)
    }

    pub fn averages(&self) -> Vec<StudentAverage> {
        average_scores(&self.results)
    }
}

/// Student progress table: quizzes completed and average per student.
pub struct ProgressPage {
    api: Arc<dyn PlatformApi>,
    pub rows: Vec<StudentAverage>,
    pub error: Option<String>,
}

impl ProgressPage {
    pub fn new(api: Arc<dyn PlatformApi>) -> Self {
        Self {
            api,
            rows: Vec::new(),
            error: None,
        }
    }

    pub async fn load(&mut self) {
        self.error = None;
        match self.api.fetch_quiz_results().await {
            Ok(results) => self.rows = average_scores(&results),
            Err(e) => {
                warn!("failed to load quiz results: {}", e);
                self.rows.clear();
                self.error = Some(e.user_message());
            }
        }
    }
}
