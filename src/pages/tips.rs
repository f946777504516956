use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use super::Confirm;
use crate::api::PlatformApi;
use crate::error::ClientError;
use crate::models::tip::week_of_year;
use crate::models::{NewTip, Role, TIP_CATEGORIES, Tip};
use crate::router::Capability;
use crate::storage::SessionStore;

pub const LOAD_FAILED: &str = "Failed to load tips.";
pub const POST_FAILED: &str = "Failed to post tip.";
pub const DELETE_FAILED: &str = "Failed to delete tip.";

#[derive(Debug, Clone, PartialEq)]
pub struct TipForm {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl Default for TipForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            category: TIP_CATEGORIES[0].to_string(),
        }
    }
}

impl TipForm {
    /// Builds the request stamped with the week `today` falls in.
    pub fn to_request(&self, author_id: Option<i64>, today: NaiveDate) -> Result<NewTip, ClientError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(ClientError::validation(
                "Please fill in both title and tip content.",
            ));
        }
        if !TIP_CATEGORIES.contains(&self.category.as_str()) {
            return Err(ClientError::validation(format!(
                "Unknown category: {}",
                self.category
            )));
        }
        Ok(NewTip {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            category: self.category.clone(),
            author_id,
            week: week_of_year(today),
        })
    }
}

pub struct TipsPage {
    api: Arc<dyn PlatformApi>,
    store: SessionStore,
    role: Option<Role>,
    pub tips: Vec<Tip>,
    pub form: TipForm,
    pub message: Option<String>,
}

impl TipsPage {
    pub fn new(api: Arc<dyn PlatformApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            role: None,
            tips: Vec::new(),
            form: TipForm::default(),
            message: None,
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.role = self.store.role().await?;
        if let Err(e) = self.refresh().await {
            warn!("failed to load tips: {}", e);
            self.message = Some(LOAD_FAILED.to_string());
        }
        Ok(())
    }

    async fn refresh(&mut self) -> Result<(), ClientError> {
        self.tips = self.api.fetch_tips().await?;
        Ok(())
    }

    /// Whether the signed-in role may delete tips.
    pub fn can_delete(&self) -> bool {
        self.role
            .is_some_and(|role| role.can(Capability::ManageContent))
    }

    pub async fn post(&mut self) -> Result<(), ClientError> {
        let author_id = self.store.user_id().await?;
        let request = match self.form.to_request(author_id, Local::now().date_naive()) {
            Ok(request) => request,
            Err(e) => {
                self.message = Some(e.user_message());
                return Err(e);
            }
        };

        if let Err(e) = self.api.create_tip(&request).await {
            warn!("failed to post tip: {}", e);
            self.message = Some(POST_FAILED.to_string());
            return Err(e);
        }

        info!("posted tip {:?} for week {}", request.title, request.week);
        self.form = TipForm::default();
        self.message = Some("Tip posted successfully!".to_string());
        if let Err(e) = self.refresh().await {
            warn!("tip posted but the list could not be reloaded: {}", e);
        }
        Ok(())
    }

    pub async fn delete(&mut self, id: i64, confirm: &impl Confirm) -> Result<bool, ClientError> {
        if !self.can_delete() {
            let role = self.role.map(|r| r.to_string()).unwrap_or_else(|| "Guest".to_string());
            return Err(ClientError::Forbidden(format!(
                "{} accounts cannot delete tips",
                role
            )));
        }
        if !confirm.confirm("Are you sure you want to delete this tip?") {
            return Ok(false);
        }
        if let Err(e) = self.api.delete_tip(id).await {
            warn!("failed to delete tip {}: {}", id, e);
            self.message = Some(DELETE_FAILED.to_string());
            return Err(e);
        }

        info!("deleted tip {}", id);
        self.tips.retain(|t| t.id != id);
        self.message = Some("Tip deleted successfully!".to_string());
        if let Err(e) = self.refresh().await {
            warn!("tip deleted but the list could not be reloaded: {}", e);
        }
        Ok(true)
    }
}
