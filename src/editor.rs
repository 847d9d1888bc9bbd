//! Content editor and dashboard.
//!
//! The editor opens one record at a time. Editable files load as text,
//! binaries as a data URL, and native documents are never downloaded (the page
//! links out to Drive instead). Saving writes the text back, renames when the
//! name changed and then refreshes the navigator so the listing shows the new
//! size and modified time.

use std::sync::Arc;

use tracing::{info, warn};

use crate::drive::{FileContent, SharedClient};
use crate::error::{AppError, Result};
use crate::models::{
    Dashboard, EditorContent, EditorDocument, FileEntry, FileKind, FileRecord, QuotaView,
    format_file_size,
};
use crate::nav::Navigator;

pub struct Editor {
    client: SharedClient,
    navigator: Arc<Navigator>,
}

impl Editor {
    pub fn new(client: SharedClient, navigator: Arc<Navigator>) -> Self {
        Self { client, navigator }
    }

    pub async fn open(&self, id: &str) -> Result<EditorDocument> {
        let record = self.client.get(id).await?;
        let kind = record.kind();

        let content = match kind {
            FileKind::Container => {
                return Err(AppError::InvalidRequest(format!(
                    "{} is a folder and cannot be opened in the editor",
                    record.name
                )));
            }
            FileKind::NativeDocument => EditorContent::ReadOnly {
                web_view_link: record.web_view_link.clone(),
            },
            FileKind::EditableFile | FileKind::OtherFile => {
                match self.client.get_content(id).await? {
                    FileContent::Text(text) => EditorContent::Text { text },
                    FileContent::DataUrl(url) => EditorContent::DataUrl { url },
                }
            }
        };

        Ok(EditorDocument {
            record,
            kind,
            content,
        })
    }

    /// Writes `content`, renames to `name` when given and different, returns the updated record.
    pub async fn save(&self, id: &str, content: &str, name: Option<&str>) -> Result<FileRecord> {
        let record = self.client.get(id).await?;
        if record.kind() != FileKind::EditableFile {
            return Err(AppError::InvalidRequest(format!(
                "{} is not an editable text file",
                record.name
            )));
        }

        self.client.set_content(id, content).await?;

        let new_name = name.map(str::trim).filter(|n| !n.is_empty() && *n != record.name);
        if let Some(new_name) = new_name {
            self.client.rename(id, new_name).await?;
        }
        info!("Saved {} ({} bytes)", id, content.len());

        if let Err(err) = self.navigator.refresh().await {
            warn!("Saved {} but refreshing the listing failed: {}", id, err);
        }

        Ok(self.client.get(id).await?)
    }

    /// Recent files, storage quota and counts over the visible set.
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let recent = self.client.recent().await?;
        let quota = self.client.quota().await?;

        let visible = self.navigator.snapshot().files;
        let folder_count = visible.iter().filter(|e| e.kind == FileKind::Container).count();

        Ok(Dashboard {
            recent: recent.iter().map(FileEntry::from).collect(),
            quota: QuotaView {
                used: quota.used,
                total: quota.total,
                used_display: format_file_size(quota.used),
                total_display: quota.total.map(format_file_size),
            },
            file_count: visible.len() - folder_count,
            folder_count,
        })
    }
}
