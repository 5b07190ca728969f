use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflows::intake::UserId;

/// Status given to a project when the client does not pick one.
pub const DEFAULT_PROJECT_STATUS: &str = "New";
/// Status of a freshly uploaded document.
pub const UPLOADED: &str = "Uploaded";
/// Status of a document whose contents have been extracted.
pub const PROCESSED: &str = "Processed";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

/// Progress counters kept on a project. Counters are signed and never clamped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectMetrics {
    pub total_documents: i64,
    pub processed_documents: i64,
    pub completed_forms: i64,
    pub pending_forms: i64,
    pub completion_percentage: f64,
}

/// A disaster-recovery project that groups uploaded documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ProjectId,
    pub title: String,
    pub disaster_id: String,
    pub description: String,
    pub status: String,
    pub user: UserId,
    pub metrics: ProjectMetrics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// File category derived from the upload's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "PDF")]
    Pdf,
    Word,
    Excel,
    Image,
    Other,
}

impl DocumentType {
    /// Case-insensitive extension match; unknown or missing extensions are `Other`.
    pub fn from_file_name(file_name: &str) -> Self {
        match file_extension(file_name).as_deref() {
            Some("pdf") => Self::Pdf,
            Some("doc" | "docx") => Self::Word,
            Some("xls" | "xlsx") => Self::Excel,
            Some("jpg" | "jpeg" | "png") => Self::Image,
            _ => Self::Other,
        }
    }
}

/// Lowercased extension of a file name, without the dot.
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
}

/// An uploaded supporting document attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub project: ProjectId,
    pub document_type: DocumentType,
    pub file_name: String,
    pub file_path: String,
    pub status: String,
    #[serde(default)]
    pub extracted_data: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn is_processed(&self) -> bool {
        self.status == PROCESSED
    }
}

/// Answers a project owner gave to the guided questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub project: ProjectId,
    pub responses: Vec<QuestionAnswer>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswer {
    pub question_id: String,
    pub question_text: String,
    pub answer_text: String,
    pub response_date: DateTime<Utc>,
}
