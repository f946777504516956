//! Page controllers. Each page owns its view state and talks to the API
//! through [`PlatformApi`](crate::api::PlatformApi); nothing is shared between
//! pages except the session store.

pub mod auth;
pub mod certificate;
pub mod dashboard;
pub mod materials;
pub mod profile;
pub mod quiz;
pub mod quiz_builder;
pub mod tips;
pub mod users;

pub use auth::{LoginPage, RegisterPage};
pub use certificate::CertificatePage;
pub use dashboard::{AdminDashboard, StudentDashboard, TeacherDashboard};
pub use materials::MaterialsPage;
pub use profile::ProfilePage;
pub use quiz::{OptionFeedback, QuizPage, QuizPhase};
pub use quiz_builder::QuizBuilderPage;
pub use tips::TipsPage;
pub use users::UsersPage;

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub(crate) fn require(value: &str, message: &str) -> Result<(), crate::error::ClientError> {
    if value.trim().is_empty() {
        Err(crate::error::ClientError::validation(message))
    } else {
        Ok(())
    }
}
