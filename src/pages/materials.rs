use std::sync::Arc;

use tracing::{info, warn};

use super::{Confirm, require};
use crate::api::{NewMaterial, PlatformApi};
use crate::error::ClientError;
use crate::models::{Material, MaterialType, Upload};

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialForm {
    pub course_name: String,
    pub material_title: String,
    pub material_type: MaterialType,
    pub course_image: Option<Upload>,
    pub pdf_file: Option<Upload>,
    pub video_file: Option<Upload>,
    pub video_url: String,
    pub text_content: String,
}

impl Default for MaterialForm {
    fn default() -> Self {
        Self {
            course_name: String::new(),
            material_title: String::new(),
            material_type: MaterialType::Pdf,
            course_image: None,
            pdf_file: None,
            video_file: None,
            video_url: String::new(),
            text_content: String::new(),
        }
    }
}

impl MaterialForm {
    pub fn validate(&self) -> Result<(), ClientError> {
        require(&self.course_name, "Fill required fields")?;
        require(&self.material_title, "Fill required fields")?;

        if let Some(image) = &self.course_image {
            if !image.is_image() {
                return Err(ClientError::validation("Course image must be an image file."));
            }
        }

        match self.material_type {
            MaterialType::Pdf | MaterialType::Document => match &self.pdf_file {
                None => Err(ClientError::validation("Upload PDF")),
                Some(file) if !file.is_pdf() => {
                    Err(ClientError::validation("Please select a PDF file."))
                }
                Some(_) => Ok(()),
            },
            MaterialType::Video => match &self.video_file {
                None if self.video_url.trim().is_empty() => {
                    Err(ClientError::validation("Provide video file or URL"))
                }
                Some(file) if !file.is_video() => {
                    Err(ClientError::validation("Please select a video file."))
                }
                _ => Ok(()),
            },
            MaterialType::Text => require(&self.text_content, "Enter text content"),
            MaterialType::Other => Err(ClientError::validation("Choose a material type")),
        }
    }

    fn into_request(self) -> NewMaterial {
        NewMaterial {
            course_name: self.course_name.trim().to_string(),
            material_title: self.material_title.trim().to_string(),
            material_type: self.material_type,
            course_image: self.course_image,
            pdf_file: self.pdf_file,
            video_file: self.video_file,
            video_url: Some(self.video_url.trim().to_string()).filter(|u| !u.is_empty()),
            text_content: Some(self.text_content).filter(|t| !t.trim().is_empty()),
        }
    }
}

/// Teacher view of course materials.
pub struct MaterialsPage {
    api: Arc<dyn PlatformApi>,
    pub materials: Vec<Material>,
    pub form: MaterialForm,
    pub message: Option<String>,
}

impl MaterialsPage {
    pub fn new(api: Arc<dyn PlatformApi>) -> Self {
        Self {
            api,
            materials: Vec::new(),
            form: MaterialForm::default(),
            message: None,
        }
    }

    pub async fn load(&mut self) {
        match self.api.fetch_materials().await {
            Ok(materials) => self.materials = materials,
            Err(e) => {
                warn!("failed to load materials: {}", e);
                self.message = Some(e.user_message());
            }
        }
    }

    pub async fn submit(&mut self) -> Result<&Material, ClientError> {
        if let Err(e) = self.form.validate() {
            self.message = Some(e.user_message());
            return Err(e);
        }

        let request = self.form.clone().into_request();
        let created = match self.api.create_material(request).await {
            Ok(material) => material,
            Err(e) => {
                warn!("failed to add material: {}", e);
                self.message = Some("Failed to add material".to_string());
                return Err(e);
            }
        };

        info!("added material {} ({})", created.id, created.material_type);
        self.materials.insert(0, created);
        self.form = MaterialForm::default();
        self.message = Some("Material added successfully!".to_string());
        Ok(&self.materials[0])
    }

    pub async fn delete(&mut self, id: i64, confirm: &impl Confirm) -> Result<bool, ClientError> {
        if !confirm.confirm("Are you sure you want to delete this material?") {
            return Ok(false);
        }
        if let Err(e) = self.api.delete_material(id).await {
            warn!("failed to delete material {}: {}", id, e);
            self.message = Some("Failed to delete material".to_string());
            return Err(e);
        }
        info!("deleted material {}", id);
        self.materials.retain(|m| m.id != id);
        Ok(true)
    }
}
