use std::sync::Arc;

use tracing::{info, warn};

use super::require;
use crate::api::PlatformApi;
use crate::error::ClientError;
use crate::models::{LoginRequest, RegisterRequest, Role, User};
use crate::router::Route;
use crate::storage::SessionStore;

pub struct LoginPage {
    api: Arc<dyn PlatformApi>,
    store: SessionStore,
    pub email: String,
    pub password: String,
    pub message: Option<String>,
}

impl LoginPage {
    pub fn new(api: Arc<dyn PlatformApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            email: String::new(),
            password: String::new(),
            message: None,
        }
    }

    /// Signs in and returns the dashboard for the user's role.
    pub async fn submit(&mut self) -> Result<(User, Route), ClientError> {
        self.message = None;
        let result = self.try_submit().await;
        match &result {
            Ok((user, _)) => self.message = Some(format!("Welcome, {}!", user.full_name)),
            Err(e) => {
                warn!("login failed: {}", e);
                self.message = Some(e.user_message());
            }
        }
        result
    }

    async fn try_submit(&mut self) -> Result<(User, Route), ClientError> {
        require(&self.email, "Please enter your email.")?;
        require(&self.password, "Please enter your password.")?;

        let request = LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        let user = self.api.login(&request).await?;
        self.store.sign_in(&user).await?;
        self.password.clear();

        let route = user.user_type.home_route();
        info!("{} logged in, landing on {}", user.email, route);
        Ok((user, route))
    }
}

pub struct RegisterPage {
    api: Arc<dyn PlatformApi>,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub user_type: Role,
    pub message: Option<String>,
}

impl RegisterPage {
    pub fn new(api: Arc<dyn PlatformApi>) -> Self {
        Self {
            api,
            full_name: String::new(),
            email: String::new(),
            password: String::new(),
            user_type: Role::Student,
            message: None,
        }
    }

    /// Creates the account and sends the user to the login page.
    pub async fn submit(&mut self) -> Result<Route, ClientError> {
        let result = self.try_submit().await;
        self.message = Some(match &result {
            Ok(_) => "Registration successful! You can now log in.".to_string(),
            Err(e) => e.user_message(),
        });
        result
    }

    async fn try_submit(&mut self) -> Result<Route, ClientError> {
        require(&self.full_name, "Please enter your full name.")?;
        require(&self.email, "Please enter your email.")?;
        require(&self.password, "Please enter a password.")?;

        let request = RegisterRequest {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            user_type: self.user_type,
        };
        self.api.register(&request).await?;
        info!("registered {}", request.email);
        Ok(Route::Login)
    }
}

/// Ends the session; material ratings survive.
pub async fn logout(store: &SessionStore) -> Result<Route, ClientError> {
    store.sign_out().await?;
    Ok(Route::Home)
}
