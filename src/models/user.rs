use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub user_type: Role,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Row of the student list on the teacher dashboard. The endpoint only guarantees name and
/// email, and either may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Student {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().filter(|s| !s.is_empty()).unwrap_or("Unknown")
    }

    pub fn display_email(&self) -> &str {
        self.email.as_deref().filter(|s| !s.is_empty()).unwrap_or("No email")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub user_type: Role,
}

/// Body of the admin create/update user calls.
#[derive(Debug, Clone, Serialize)]
pub struct UserPayload {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub user_type: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdateResponse {
    pub user: User,
}
