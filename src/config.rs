use std::env;
use std::time::Duration;

use crate::error::ClientError;

pub const DEFAULT_API_ORIGIN: &str = "https://securityict4d2.onrender.com";
pub const DEFAULT_SESSION_DB_URL: &str = "sqlite://session.db";
pub const DEFAULT_PROFILE_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    /// Origin of the REST API and of uploaded assets, without trailing slash.
    pub api_origin: String,
    pub session_db_url: String,
    pub profile_timeout: Duration,
}

impl Config {
    pub fn new(api_origin: impl Into<String>) -> Self {
        Self {
            api_origin: trim_origin(api_origin.into()),
            session_db_url: DEFAULT_SESSION_DB_URL.to_string(),
            profile_timeout: Duration::from_secs(DEFAULT_PROFILE_TIMEOUT_SECS),
        }
    }

    pub fn new_from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let api_origin = env::var("API_ORIGIN").unwrap_or_else(|_| DEFAULT_API_ORIGIN.to_string());
        let session_db_url =
            env::var("SESSION_DB_URL").unwrap_or_else(|_| DEFAULT_SESSION_DB_URL.to_string());
        let profile_timeout = match env::var("PROFILE_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!("PROFILE_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            Err(_) => DEFAULT_PROFILE_TIMEOUT_SECS,
        };

        if !api_origin.starts_with("http://") && !api_origin.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "API_ORIGIN must be an http(s) URL: {}",
                api_origin
            )));
        }

        Ok(Self {
            api_origin: trim_origin(api_origin),
            session_db_url,
            profile_timeout: Duration::from_secs(profile_timeout),
        })
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_origin, path)
    }

    /// Absolute URL of an uploaded asset. Bare file names live under
    /// `/uploads/`, paths starting with `/` are already rooted on the origin.
    pub fn asset_url(&self, file: &str) -> String {
        if file.starts_with("http://") || file.starts_with("https://") {
            file.to_string()
        } else if file.starts_with('/') {
            format!("{}{}", self.api_origin, file)
        } else {
            format!("{}/uploads/{}", self.api_origin, file)
        }
    }
}

fn trim_origin(origin: String) -> String {
    origin.trim_end_matches('/').to_string()
}
