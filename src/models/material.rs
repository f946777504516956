use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Pdf,
    Video,
    Text,
    Document,
    /// Any type this client does not know how to show.
    #[serde(other)]
    Other,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Pdf => "pdf",
            MaterialType::Video => "video",
            MaterialType::Text => "text",
            MaterialType::Document => "document",
            MaterialType::Other => "other",
        }
    }

    /// Materials shown in the reading list.
    pub fn is_reading(&self) -> bool {
        matches!(self, MaterialType::Pdf | MaterialType::Text | MaterialType::Document)
    }

    pub fn is_video(&self) -> bool {
        *self == MaterialType::Video
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The list endpoint returns snake_case, the create endpoint echoes camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    #[serde(alias = "materialType")]
    pub material_type: MaterialType,
    #[serde(default, alias = "courseName")]
    pub course_name: String,
    #[serde(default, alias = "materialTitle")]
    pub material_title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "fileUrl")]
    pub file_url: Option<String>,
    #[serde(default, alias = "courseImage")]
    pub course_image: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialText {
    #[serde(default)]
    pub text_content: String,
}
