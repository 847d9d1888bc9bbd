//! File record DTOs and presentation helpers.
//!
//! - `FileRecord`: one Drive entry as the rest of the server sees it
//! - `FileKind`: closed classification every branch in the UI and state machine uses
//! - `FileEntry`: a record decorated for display (size, relative time, icon)
//! - `Quota`: storage usage for the dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const NATIVE_MIME_PREFIX: &str = "application/vnd.google-apps.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    /// Always `None` for containers.
    pub size: Option<u64>,
    pub created_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub parents: Vec<String>,
    pub web_view_link: Option<String>,
    pub thumbnail_link: Option<String>,
    pub icon_link: Option<String>,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub trashed: bool,
}

impl FileRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            size: None,
            created_time: None,
            modified_time: None,
            parents: Vec::new(),
            web_view_link: None,
            thumbnail_link: None,
            icon_link: None,
            shared: false,
            starred: false,
            trashed: false,
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::classify(&self.mime_type)
    }

    pub fn is_container(&self) -> bool {
        self.kind() == FileKind::Container
    }

    /// Case-insensitive substring match on name or MIME type.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.mime_type.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Container,
    /// Google Docs, Sheets, Slides...; only editable in Drive itself.
    NativeDocument,
    EditableFile,
    OtherFile,
}

impl FileKind {
    pub fn classify(mime_type: &str) -> Self {
        if mime_type == FOLDER_MIME {
            return FileKind::Container;
        }
        if mime_type.starts_with(NATIVE_MIME_PREFIX) {
            return FileKind::NativeDocument;
        }
        if is_text_mime(mime_type) {
            FileKind::EditableFile
        } else {
            FileKind::OtherFile
        }
    }
}

fn is_text_mime(mime_type: &str) -> bool {
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    if essence.is_empty() || essence.starts_with("text/") {
        return true;
    }
    matches!(
        essence,
        "application/json"
            | "application/xml"
            | "application/javascript"
            | "application/x-javascript"
            | "application/typescript"
            | "application/x-yaml"
            | "application/yaml"
            | "application/toml"
            | "application/x-toml"
            | "application/x-sh"
            | "application/sql"
            | "application/x-tex"
    ) || essence.ends_with("+json")
        || essence.ends_with("+xml")
}

/// Icon name the page maps to a glyph.
pub fn icon_for(record: &FileRecord) -> &'static str {
    let mime = record.mime_type.as_str();
    match record.kind() {
        FileKind::Container => "folder",
        FileKind::NativeDocument => match mime.trim_start_matches(NATIVE_MIME_PREFIX) {
            "spreadsheet" => "sheet",
            "presentation" => "slides",
            _ => "doc",
        },
        FileKind::EditableFile => {
            if mime.starts_with("text/plain") || mime.starts_with("text/markdown") || mime.is_empty() {
                "text"
            } else {
                "code"
            }
        }
        FileKind::OtherFile => {
            if mime.starts_with("image/") {
                "image"
            } else if mime == "application/pdf" {
                "pdf"
            } else {
                "file"
            }
        }
    }
}

/// Human-readable byte count in 1024 steps ("0 B", "1.5 KB", "2.25 GB").
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", (value * 100.0).round() / 100.0);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

pub fn format_relative_time(timestamp: i64) -> String {
    let now = Utc::now().timestamp();
    let diff = now - timestamp;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    #[serde(flatten)]
    pub record: FileRecord,
    pub kind: FileKind,
    pub display_size: String,
    pub modified_relative: Option<String>,
    pub icon: &'static str,
}

impl From<&FileRecord> for FileEntry {
    fn from(record: &FileRecord) -> Self {
        Self {
            record: record.clone(),
            kind: record.kind(),
            display_size: record.size.map(format_file_size).unwrap_or_default(),
            modified_relative: record
                .modified_time
                .map(|t| format_relative_time(t.timestamp())),
            icon: icon_for(record),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    pub used: u64,
    /// `None` for unlimited plans.
    pub total: Option<u64>,
}
