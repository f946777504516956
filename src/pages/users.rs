use std::sync::Arc;

use tracing::{info, warn};

use super::{Confirm, require};
use crate::api::PlatformApi;
use crate::error::ClientError;
use crate::models::{Role, User, UserPayload};

#[derive(Debug, Clone, PartialEq)]
pub struct UserForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Student,
        }
    }
}

/// Admin user management: list, create, edit, delete.
pub struct UsersPage {
    api: Arc<dyn PlatformApi>,
    pub users: Vec<User>,
    pub form: UserForm,
    editing: Option<i64>,
    pub message: Option<String>,
}

impl UsersPage {
    pub fn new(api: Arc<dyn PlatformApi>) -> Self {
        Self {
            api,
            users: Vec::new(),
            form: UserForm::default(),
            editing: None,
            message: None,
        }
    }

    pub async fn load(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!("failed to load users: {}", e);
            self.message = Some(e.user_message());
        }
    }

    async fn refresh(&mut self) -> Result<(), ClientError> {
        self.users = self.api.fetch_users().await?;
        Ok(())
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    /// Loads a user into the form. The password is left blank.
    pub fn edit(&mut self, id: i64) -> Result<(), ClientError> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| ClientError::validation(format!("No user with id {}", id)))?;
        self.form = UserForm {
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            password: String::new(),
            role: user.user_type,
        };
        self.editing = Some(id);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.form = UserForm::default();
        self.editing = None;
    }

    pub async fn submit(&mut self) -> Result<(), ClientError> {
        let result = self.try_submit().await;
        match &result {
            Ok(()) => {}
            Err(e) => self.message = Some(e.user_message()),
        }
        result
    }

    async fn try_submit(&mut self) -> Result<(), ClientError> {
        require(&self.form.full_name, "Full name is required.")?;
        require(&self.form.email, "Email is required.")?;
        if self.editing.is_none() {
            require(&self.form.password, "Password is required.")?;
        }

        let payload = UserPayload {
            full_name: self.form.full_name.trim().to_string(),
            email: self.form.email.trim().to_string(),
            password: self.form.password.clone(),
            user_type: self.form.role,
        };

        match self.editing {
            Some(id) => {
                self.api.update_user(id, &payload).await?;
                info!("updated user {}", id);
                self.message = Some("User updated successfully!".to_string());
            }
            None => {
                self.api.create_user(&payload).await?;
                info!("added user {}", payload.email);
                self.message = Some("User added successfully!".to_string());
            }
        }

        self.cancel_edit();
        if let Err(e) = self.refresh().await {
            warn!("user saved but the list could not be reloaded: {}", e);
        }
        Ok(())
    }

    /// Returns `false` when the user backs out of the confirmation.
    pub async fn delete(&mut self, id: i64, confirm: &impl Confirm) -> Result<bool, ClientError> {
        if !confirm.confirm("Are you sure you want to delete this user?") {
            return Ok(false);
        }
        if let Err(e) = self.api.delete_user(id).await {
            warn!("failed to delete user {}: {}", id, e);
            self.message = Some(e.user_message());
            return Err(e);
        }

        info!("deleted user {}", id);
        self.users.retain(|u| u.id != id);
        if self.editing == Some(id) {
            self.cancel_edit();
        }
        self.message = Some("User deleted.".to_string());
        if let Err(e) = self.refresh().await {
            warn!("user deleted but the list could not be reloaded: {}", e);
        }
        Ok(true)
    }
}
