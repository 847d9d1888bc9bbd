//! Content editor and dashboard DTOs.

use serde::{Deserialize, Serialize};

use super::{FileEntry, FileKind, FileRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorContent {
    Text { text: String },
    /// Binary content as `data:<mime>;base64,...`.
    DataUrl { url: String },
    /// Native documents are edited in Drive itself.
    ReadOnly { web_view_link: Option<String> },
}

#[derive(Debug, Clone, Serialize)]
pub struct EditorDocument {
    pub record: FileRecord,
    pub kind: FileKind,
    pub content: EditorContent,
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub content: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuotaView {
    pub used: u64,
    pub total: Option<u64>,
    pub used_display: String,
    pub total_display: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub recent: Vec<FileEntry>,
    pub quota: QuotaView,
    pub file_count: usize,
    pub folder_count: usize,
}
