use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{PlatformApi, ProfileUpdate};
use crate::error::ClientError;
use crate::models::Upload;
use crate::storage::SessionStore;

pub const MAX_PICTURE_BYTES: usize = 5 * 1024 * 1024;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub profile_picture: Option<Upload>,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.password != self.confirm_password {
            return Err(ClientError::validation("Passwords do not match!"));
        }
        if !self.password.is_empty() && self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::validation(format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

pub fn check_picture(upload: &Upload) -> Result<(), ClientError> {
    if upload.size() > MAX_PICTURE_BYTES {
        return Err(ClientError::validation(
            "File size too large. Please choose a file smaller than 5MB.",
        ));
    }
    if !upload.is_image() {
        return Err(ClientError::validation("Please select an image file."));
    }
    Ok(())
}

pub struct ProfilePage {
    api: Arc<dyn PlatformApi>,
    store: SessionStore,
    user_id: Option<i64>,
    pub form: ProfileForm,
    pub current_picture: Option<String>,
    pub message: Option<String>,
}

impl ProfilePage {
    pub fn new(api: Arc<dyn PlatformApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            user_id: None,
            form: ProfileForm::default(),
            current_picture: None,
            message: None,
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.user_id = self.store.user_id().await?;
        let Some(user_id) = self.user_id else {
            self.message = Some("User ID is missing. Please log in again.".to_string());
            return Ok(());
        };

        match self.api.fetch_user(user_id).await {
            Ok(user) => {
                self.form = ProfileForm {
                    full_name: user.full_name,
                    email: user.email,
                    ..ProfileForm::default()
                };
                self.current_picture = user.profile_image;
                self.message = None;
            }
            Err(e) => {
                warn!("failed to load profile {}: {}", user_id, e);
                self.message = Some("Failed to load user data. Please try again.".to_string());
            }
        }
        Ok(())
    }

    /// Attaches a new profile picture after the size and type checks.
    pub fn attach_picture(&mut self, upload: Upload) -> Result<(), ClientError> {
        if let Err(e) = check_picture(&upload) {
            self.message = Some(e.user_message());
            return Err(e);
        }
        self.form.profile_picture = Some(upload);
        self.message = None;
        Ok(())
    }

    /// Drops password fields and the pending picture.
    pub fn clear(&mut self) {
        self.form.password.clear();
        self.form.confirm_password.clear();
        self.form.profile_picture = None;
        self.message = None;
    }

    pub async fn submit(&mut self) -> Result<(), ClientError> {
        let result = self.try_submit().await;
        self.message = Some(match &result {
            Ok(()) => "Profile updated successfully!".to_string(),
            Err(e) if e.is_timeout() => e.user_message(),
            Err(e) if e.server_message().is_some() => e.user_message(),
            Err(e @ ClientError::Validation(_)) => e.user_message(),
            Err(_) => "Failed to update profile. Please try again.".to_string(),
        });
        result
    }

    async fn try_submit(&mut self) -> Result<(), ClientError> {
        let user_id = self
            .user_id
            .ok_or_else(|| ClientError::validation("User ID is missing. Cannot update profile."))?;
        self.form.validate()?;

        let password = Some(self.form.password.clone()).filter(|p| !p.trim().is_empty());
        let update = ProfileUpdate {
            full_name: self.form.full_name.clone(),
            email: self.form.email.clone(),
            password,
            profile_image: self.form.profile_picture.clone(),
        };

        let user = self.api.update_profile(user_id, update).await?;
        info!("profile {} updated", user_id);

        self.current_picture = user.profile_image;
        self.store.set::<crate::storage::UserNameKey>(&user.full_name).await?;
        self.clear();
        Ok(())
    }
}
