//! Navigation DTOs: breadcrumb segments, view mode, snapshot and request bodies.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::FileEntry;

pub const ROOT_ID: &str = "root";
pub const ROOT_NAME: &str = "My Drive";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub id: String,
    pub name: String,
}

impl PathSegment {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_ID, ROOT_NAME)
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// Container id as the state machine stores it (`None` for the root).
    pub fn folder_id(&self) -> Option<String> {
        if self.is_root() {
            None
        } else {
            Some(self.id.clone())
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Where the visible set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingScope {
    /// Children of the current container.
    Folder,
    /// Drive-wide name search.
    Drive,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationSnapshot {
    pub current_folder_id: Option<String>,
    pub path: Vec<PathSegment>,
    pub files: Vec<FileEntry>,
    pub search_query: String,
    pub scope: ListingScope,
    pub view_mode: ViewMode,
    pub selection: BTreeSet<String>,
    pub busy: bool,
}

#[derive(Debug, Deserialize)]
pub struct OpenRequest {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BreadcrumbRequest {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ViewModeRequest {
    pub mode: ViewMode,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFileRequest {
    pub name: String,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}
