use std::fmt;

use crate::error::ClientError;
use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    StudentDashboard,
    TeacherDashboard,
    AdminDashboard,
    ManageUsers,
    ViewProgress,
    UpdateProfile,
    TakeQuiz(i64),
    Certificate,
    ManageQuizzes,
    Tips,
    Materials,
}

/// What a session must be allowed to do to open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Public,
    SignedIn,
    TakeQuizzes,
    ManageContent,
    Administer,
}

impl Route {
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Route::Home,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/student" => Route::StudentDashboard,
            "/teacher" => Route::TeacherDashboard,
            "/admin" => Route::AdminDashboard,
            "/admin/manage-users" => Route::ManageUsers,
            "/admin/view-progress" => Route::ViewProgress,
            "/update-profile" => Route::UpdateProfile,
            "/certificate" => Route::Certificate,
            "/manage-quizzes" => Route::ManageQuizzes,
            "/tips" => Route::Tips,
            "/materials" => Route::Materials,
            other => {
                let id = other.strip_prefix("/take-quiz/")?;
                Route::TakeQuiz(id.parse().ok()?)
            }
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::StudentDashboard => "/student".to_string(),
            Route::TeacherDashboard => "/teacher".to_string(),
            Route::AdminDashboard => "/admin".to_string(),
            Route::ManageUsers => "/admin/manage-users".to_string(),
            Route::ViewProgress => "/admin/view-progress".to_string(),
            Route::UpdateProfile => "/update-profile".to_string(),
            Route::TakeQuiz(id) => format!("/take-quiz/{}", id),
            Route::Certificate => "/certificate".to_string(),
            Route::ManageQuizzes => "/manage-quizzes".to_string(),
            Route::Tips => "/tips".to_string(),
            Route::Materials => "/materials".to_string(),
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            Route::Home | Route::Login | Route::Register => Capability::Public,
            Route::UpdateProfile | Route::Tips => Capability::SignedIn,
            Route::StudentDashboard | Route::TakeQuiz(_) | Route::Certificate => {
                Capability::TakeQuizzes
            }
            Route::TeacherDashboard | Route::ManageQuizzes | Route::Materials => {
                Capability::ManageContent
            }
            Route::AdminDashboard | Route::ManageUsers | Route::ViewProgress => {
                Capability::Administer
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Role {
    pub fn can(&self, capability: Capability) -> bool {
        match capability {
            Capability::Public | Capability::SignedIn => true,
            Capability::TakeQuizzes => *self == Role::Student,
            Capability::ManageContent => matches!(self, Role::Teacher | Role::Admin),
            Capability::Administer => *self == Role::Admin,
        }
    }

    /// Landing page after login.
    pub fn home_route(&self) -> Route {
        match self {
            Role::Student => Route::StudentDashboard,
            Role::Teacher => Route::TeacherDashboard,
            Role::Admin => Route::AdminDashboard,
        }
    }
}

/// Capability check applied before a page is opened.
pub fn authorize(route: Route, role: Option<Role>) -> Result<Route, ClientError> {
    match (route.capability(), role) {
        (Capability::Public, _) => Ok(route),
        (_, None) => Err(ClientError::Forbidden("Please log in to continue.".to_string())),
        (capability, Some(role)) if role.can(capability) => Ok(route),
        (_, Some(role)) => Err(ClientError::Forbidden(format!(
            "{} accounts cannot open {}",
            role, route
        ))),
    }
}

/// Resolves a path and authorizes it in one step.
pub fn navigate(path: &str, role: Option<Role>) -> Result<Route, ClientError> {
    let route = Route::parse(path)
        .ok_or_else(|| ClientError::validation(format!("No page at {}", path)))?;
    authorize(route, role)
}
