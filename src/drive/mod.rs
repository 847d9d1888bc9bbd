//! Remote directory access.
//!
//! `DirectoryClient` is the seam between the navigation state machine and the
//! store that actually holds the files:
//! - `google`: Google Drive v3 over REST (reqwest)
//! - `memory`: in-process store used by `--demo` and by tests
//! - `query`: Drive `q` string construction
//!
//! Clients are constructed per signed-in session and passed to the `Navigator`
//! and `Editor` by `Arc`; nothing here is process-global.

pub mod google;
pub mod memory;
pub mod query;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::{Config, DriveEndpoints};
use crate::error::DriveResult;
use crate::models::{FileKind, FileRecord, Quota, UserInfo};

pub use google::GoogleDriveClient;
pub use memory::MemoryDrive;

pub const LIST_PAGE_SIZE: u32 = 100;
pub const SEARCH_PAGE_SIZE: u32 = 50;
pub const RECENT_PAGE_SIZE: u32 = 10;

/// Content of a single file as the editor receives it.
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    Text(String),
    /// `data:<mime>;base64,...`
    DataUrl(String),
}

impl FileContent {
    /// Text when the type is editable and the bytes are UTF-8, a data URL otherwise.
    pub fn from_bytes(mime_type: &str, bytes: Vec<u8>) -> Self {
        if FileKind::classify(mime_type) == FileKind::EditableFile {
            match String::from_utf8(bytes) {
                Ok(text) => return FileContent::Text(text),
                Err(err) => return Self::data_url(mime_type, &err.into_bytes()),
            }
        }
        Self::data_url(mime_type, &bytes)
    }

    fn data_url(mime_type: &str, bytes: &[u8]) -> Self {
        let mime = if mime_type.is_empty() {
            "application/octet-stream"
        } else {
            mime_type
        };
        FileContent::DataUrl(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }
}

#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Identity of the credential this client was built with.
    async fn user_info(&self) -> DriveResult<UserInfo>;

    /// Children of `parent` (`None` = root), optionally filtered on name or type.
    async fn list(&self, parent: Option<&str>, query: Option<&str>) -> DriveResult<Vec<FileRecord>>;

    /// Drive-wide search on name or type.
    async fn search(&self, query: &str) -> DriveResult<Vec<FileRecord>>;

    async fn get(&self, id: &str) -> DriveResult<FileRecord>;

    async fn create_container(&self, name: &str, parent: Option<&str>) -> DriveResult<FileRecord>;

    async fn create_file(&self, name: &str, content: &str, parent: Option<&str>) -> DriveResult<FileRecord>;

    async fn get_content(&self, id: &str) -> DriveResult<FileContent>;

    async fn set_content(&self, id: &str, text: &str) -> DriveResult<()>;

    async fn rename(&self, id: &str, name: &str) -> DriveResult<()>;

    async fn delete(&self, id: &str) -> DriveResult<()>;

    /// Most recently modified non-folder files.
    async fn recent(&self) -> DriveResult<Vec<FileRecord>>;

    async fn quota(&self) -> DriveResult<Quota>;

    /// Drops the credential; later calls fail with `NotInitialized`.
    async fn sign_out(&self) -> DriveResult<()>;
}

pub type SharedClient = Arc<dyn DirectoryClient>;

/// Which store sessions connect to.
#[derive(Clone)]
pub enum Backend {
    Google(DriveEndpoints),
    Demo(Arc<MemoryDrive>),
}

impl Backend {
    /// Google Drive, or the seeded in-memory drive when `config.demo` is set.
    pub fn from_config(config: &Config) -> Self {
        if config.demo {
            let drive = MemoryDrive::seeded().with_latency(config.demo_latency);
            Backend::Demo(Arc::new(drive))
        } else {
            Backend::Google(config.endpoints.clone())
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Google(_) => "google",
            Backend::Demo(_) => "demo",
        }
    }

    pub fn connect(&self, access_token: &str) -> DriveResult<SharedClient> {
        match self {
            Backend::Google(endpoints) => {
                let client = GoogleDriveClient::new(endpoints.clone(), access_token)?;
                Ok(Arc::new(client))
            }
            Backend::Demo(drive) => {
                drive.sign_in(access_token);
                let client: SharedClient = drive.clone();
                Ok(client)
            }
        }
    }
}

/// Containers first, keeping the client's order inside each group; duplicate ids dropped.
pub fn order_listing(records: Vec<FileRecord>) -> Vec<FileRecord> {
    let mut seen = HashSet::new();
    let mut records: Vec<FileRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect();
    records.sort_by_key(|r| !r.is_container());
    records
}

/// MIME type for a new file, from its extension.
pub fn guess_mime(name: &str) -> String {
    mime_guess::from_path(name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "text/plain".to_string())
}
