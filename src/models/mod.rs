//! Data transfer objects (DTOs) for API responses and request bodies.
//!
//! These structs are serialized to JSON for the embedded page.
//! - `file`: FileRecord, FileKind classification, FileEntry, Quota, formatting helpers
//! - `navigation`: PathSegment, ViewMode, NavigationSnapshot, navigation requests
//! - `editor`: EditorDocument, EditorContent, Dashboard
//! - `session`: UserInfo, StoredSession, LoginRequest

pub mod editor;
pub mod file;
pub mod navigation;
pub mod session;

pub use editor::*;
pub use file::*;
pub use navigation::*;
pub use session::*;
