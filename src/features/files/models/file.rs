use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Detected source document type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "file_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Pptx,
    Video,
}

impl FileType {
    /// `.pdf` and `.pptx` by extension, anything else accepted is video
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            FileType::Pdf
        } else if lower.ends_with(".pptx") {
            FileType::Pptx
        } else {
            FileType::Video
        }
    }
}

/// Processing lifecycle of an uploaded file.
///
/// `pending → processing → {completed, failed}`, plus `failed → processing`
/// for a manual retry. `completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "processing_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
        }
    }

    /// States from which `target` may be entered
    pub fn allowed_sources(target: ProcessingStatus) -> &'static [ProcessingStatus] {
        match target {
            ProcessingStatus::Pending => &[],
            ProcessingStatus::Processing => {
                &[ProcessingStatus::Pending, ProcessingStatus::Failed]
            }
            ProcessingStatus::Completed | ProcessingStatus::Failed => {
                &[ProcessingStatus::Processing]
            }
        }
    }

    pub fn can_transition_to(self, target: ProcessingStatus) -> bool {
        Self::allowed_sources(target).contains(&self)
    }
}

/// Database model for files
#[derive(Debug, Clone, FromRow)]
pub struct File {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: Uuid,
    pub file_name: String,
    pub file_type: FileType,
    pub file_size: i64,
    pub file_path: String,
    pub mime_type: String,
    pub content_hash: Option<String>,
    pub processing_status: ProcessingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a freshly uploaded file; status starts at `pending`
#[derive(Debug, Clone)]
pub struct NewFile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: Uuid,
    pub file_name: String,
    pub file_type: FileType,
    pub file_size: i64,
    pub file_path: String,
    pub mime_type: String,
    pub content_hash: String,
}
