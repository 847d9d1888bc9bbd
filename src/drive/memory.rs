//! In-process directory store.
//!
//! Backs `--demo` mode and doubles as the injected client in tests. Behaves
//! like Drive where the state machine can observe it (root sentinel, trashed
//! filtering, name/type matching, native documents without downloadable
//! content) and adds knobs Drive does not have:
//! - per-scope latency, so listings can complete out of issue order
//! - fault injection: fail the next N calls, go offline, expire the token
//!
//! Listings come back in name order only; putting containers first is the
//! caller's job, as it would be against a store that does not sort that way.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use super::{DirectoryClient, FileContent, RECENT_PAGE_SIZE, SEARCH_PAGE_SIZE, guess_mime};
use crate::error::{DriveError, DriveResult};
use crate::models::{FOLDER_MIME, FileKind, FileRecord, Quota, ROOT_ID, UserInfo};

const DEMO_QUOTA: u64 = 15 * 1024 * 1024 * 1024;

/// Latency scope used by `search`.
pub const SEARCH_SCOPE: &str = "search";

struct StoredFile {
    record: FileRecord,
    content: Vec<u8>,
}

#[derive(Default)]
struct Store {
    files: Vec<StoredFile>,
    next_id: u64,
    last_tick: Option<DateTime<Utc>>,
}

impl Store {
    /// Strictly increasing timestamps so "recent" ordering is deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_tick {
            Some(last) if now <= last => last + TimeDelta::milliseconds(1),
            _ => now,
        };
        self.last_tick = Some(next);
        next
    }

    fn find_mut(&mut self, id: &str) -> DriveResult<&mut StoredFile> {
        self.files
            .iter_mut()
            .find(|f| f.record.id == id)
            .ok_or_else(|| DriveError::NotFound(id.to_string()))
    }

    fn insert(&mut self, name: &str, mime_type: &str, parent: Option<&str>, content: Vec<u8>) -> FileRecord {
        self.next_id += 1;
        let now = self.tick();

        let mut record = FileRecord::new(format!("mem-{}", self.next_id), name, mime_type);
        record.parents = vec![parent.unwrap_or(ROOT_ID).to_string()];
        record.created_time = Some(now);
        record.modified_time = Some(now);
        match record.kind() {
            FileKind::Container => {}
            FileKind::NativeDocument => {
                record.web_view_link = Some(format!("https://docs.google.com/open?id={}", record.id));
            }
            _ => record.size = Some(content.len() as u64),
        }

        self.files.push(StoredFile {
            record: record.clone(),
            content,
        });
        record
    }

    fn visible(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter().map(|f| &f.record).filter(|r| !r.trashed)
    }
}

#[derive(Default)]
struct Faults {
    fail_next: usize,
    offline: bool,
    token_expired: bool,
}

pub struct MemoryDrive {
    store: Mutex<Store>,
    faults: Mutex<Faults>,
    latency: Mutex<HashMap<String, Duration>>,
    default_latency: Duration,
    signed_in: Mutex<bool>,
    user: UserInfo,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for MemoryDrive {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDrive {
    /// Empty drive with a signed-in demo user.
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store::default()),
            faults: Mutex::new(Faults::default()),
            latency: Mutex::new(HashMap::new()),
            default_latency: Duration::ZERO,
            signed_in: Mutex::new(true),
            user: UserInfo {
                id: "demo".to_string(),
                email: "student@example.edu".to_string(),
                name: "Demo Student".to_string(),
                picture: String::new(),
            },
        }
    }

    /// A small student drive to click around in.
    pub fn seeded() -> Self {
        let drive = Self::new();
        let cs = drive.insert_folder("CS 101", None);
        let math = drive.insert_folder("Calculus", None);
        drive.insert_folder("Assignments", Some(&cs.id));
        drive.insert_file(
            "Lecture 1.md",
            "# Lecture 1\n\n- Variables\n- Control flow\n",
            Some(&cs.id),
        );
        drive.insert_file("notes.md", "# Notes\n\nRead chapter 2.\n", Some(&cs.id));
        drive.insert_file("limits.txt", "lim x->0 sin(x)/x = 1\n", Some(&math.id));
        drive.insert_binary(
            "graph.png",
            "image/png",
            vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
            Some(&math.id),
        );
        drive.insert_native("Essay draft", "application/vnd.google-apps.document", None);
        drive.insert_native("Grades", "application/vnd.google-apps.spreadsheet", None);
        drive.insert_file(
            "Welcome.md",
            "# Welcome\n\nThis is your Student Drive.\n",
            None,
        );
        drive
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.default_latency = latency;
        self
    }

    /// Delay for listings of one container (`"root"` for the root) or `SEARCH_SCOPE`.
    pub fn set_latency(&self, scope: &str, latency: Duration) {
        lock(&self.latency).insert(scope.to_string(), latency);
    }

    /// The next `calls` calls fail with a 503.
    pub fn fail_next(&self, calls: usize) {
        lock(&self.faults).fail_next = calls;
    }

    pub fn set_offline(&self, offline: bool) {
        lock(&self.faults).offline = offline;
    }

    pub fn expire_token(&self) {
        lock(&self.faults).token_expired = true;
    }

    pub fn sign_in(&self, _access_token: &str) {
        *lock(&self.signed_in) = true;
        lock(&self.faults).token_expired = false;
    }

    pub fn insert_folder(&self, name: &str, parent: Option<&str>) -> FileRecord {
        lock(&self.store).insert(name, FOLDER_MIME, parent, Vec::new())
    }

    pub fn insert_file(&self, name: &str, content: &str, parent: Option<&str>) -> FileRecord {
        lock(&self.store).insert(name, &guess_mime(name), parent, content.as_bytes().to_vec())
    }

    pub fn insert_native(&self, name: &str, mime_type: &str, parent: Option<&str>) -> FileRecord {
        lock(&self.store).insert(name, mime_type, parent, Vec::new())
    }

    pub fn insert_binary(&self, name: &str, mime_type: &str, bytes: Vec<u8>, parent: Option<&str>) -> FileRecord {
        lock(&self.store).insert(name, mime_type, parent, bytes)
    }

    /// Waits out the scope's latency, then applies injected faults.
    async fn enter(&self, scope: &str) -> DriveResult<()> {
        let delay = lock(&self.latency)
            .get(scope)
            .copied()
            .unwrap_or(self.default_latency);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if !*lock(&self.signed_in) {
            return Err(DriveError::NotInitialized);
        }

        let mut faults = lock(&self.faults);
        if faults.token_expired {
            return Err(DriveError::Auth("Invalid Credentials".to_string()));
        }
        if faults.offline {
            return Err(DriveError::Status {
                status: 503,
                message: "Backend offline".to_string(),
            });
        }
        if faults.fail_next > 0 {
            faults.fail_next -= 1;
            return Err(DriveError::Status {
                status: 503,
                message: "Injected failure".to_string(),
            });
        }
        Ok(())
    }
}

fn by_name(records: &mut [FileRecord]) {
    records.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

#[async_trait]
impl DirectoryClient for MemoryDrive {
    async fn user_info(&self) -> DriveResult<UserInfo> {
        self.enter("user").await?;
        Ok(self.user.clone())
    }

    async fn list(&self, parent: Option<&str>, filter: Option<&str>) -> DriveResult<Vec<FileRecord>> {
        let parent = parent.unwrap_or(ROOT_ID);
        self.enter(parent).await?;

        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        let store = lock(&self.store);
        let mut records: Vec<FileRecord> = store
            .visible()
            .filter(|r| r.parents.iter().any(|p| p == parent))
            .filter(|r| filter.is_none_or(|f| r.matches(f)))
            .cloned()
            .collect();
        by_name(&mut records);
        Ok(records)
    }

    async fn search(&self, query: &str) -> DriveResult<Vec<FileRecord>> {
        self.enter(SEARCH_SCOPE).await?;

        let query = query.trim();
        let store = lock(&self.store);
        let mut records: Vec<FileRecord> = store
            .visible()
            .filter(|r| r.matches(query))
            .cloned()
            .collect();
        by_name(&mut records);
        records.truncate(SEARCH_PAGE_SIZE as usize);
        Ok(records)
    }

    async fn get(&self, id: &str) -> DriveResult<FileRecord> {
        self.enter("get").await?;
        let mut store = lock(&self.store);
        Ok(store.find_mut(id)?.record.clone())
    }

    async fn create_container(&self, name: &str, parent: Option<&str>) -> DriveResult<FileRecord> {
        self.enter("create").await?;
        Ok(lock(&self.store).insert(name, FOLDER_MIME, parent, Vec::new()))
    }

    async fn create_file(&self, name: &str, content: &str, parent: Option<&str>) -> DriveResult<FileRecord> {
        self.enter("create").await?;
        Ok(lock(&self.store).insert(name, &guess_mime(name), parent, content.as_bytes().to_vec()))
    }

    async fn get_content(&self, id: &str) -> DriveResult<FileContent> {
        self.enter("content").await?;
        let mut store = lock(&self.store);
        let file = store.find_mut(id)?;
        match file.record.kind() {
            FileKind::Container => Err(DriveError::Status {
                status: 400,
                message: format!("{} is a folder", file.record.name),
            }),
            FileKind::NativeDocument => Err(DriveError::Status {
                status: 403,
                message: "Only files with binary content can be downloaded".to_string(),
            }),
            _ => Ok(FileContent::from_bytes(
                &file.record.mime_type,
                file.content.clone(),
            )),
        }
    }

    async fn set_content(&self, id: &str, text: &str) -> DriveResult<()> {
        self.enter("content").await?;
        let mut store = lock(&self.store);
        let now = store.tick();
        let file = store.find_mut(id)?;
        file.content = text.as_bytes().to_vec();
        file.record.size = Some(file.content.len() as u64);
        file.record.modified_time = Some(now);
        Ok(())
    }

    async fn rename(&self, id: &str, name: &str) -> DriveResult<()> {
        self.enter("rename").await?;
        let mut store = lock(&self.store);
        let now = store.tick();
        let file = store.find_mut(id)?;
        file.record.name = name.to_string();
        file.record.modified_time = Some(now);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DriveResult<()> {
        self.enter("delete").await?;
        let mut store = lock(&self.store);
        store.find_mut(id)?;

        // Deleting a folder takes its descendants with it.
        let mut doomed: HashSet<String> = HashSet::from([id.to_string()]);
        loop {
            let before = doomed.len();
            for file in &store.files {
                if file.record.parents.iter().any(|p| doomed.contains(p)) {
                    doomed.insert(file.record.id.clone());
                }
            }
            if doomed.len() == before {
                break;
            }
        }
        store.files.retain(|f| !doomed.contains(&f.record.id));
        Ok(())
    }

    async fn recent(&self) -> DriveResult<Vec<FileRecord>> {
        self.enter("recent").await?;
        let store = lock(&self.store);
        let mut records: Vec<FileRecord> = store
            .visible()
            .filter(|r| !r.is_container())
            .cloned()
            .collect();
        records.sort_by(|a, b| b.modified_time.cmp(&a.modified_time));
        records.truncate(RECENT_PAGE_SIZE as usize);
        Ok(records)
    }

    async fn quota(&self) -> DriveResult<Quota> {
        self.enter("quota").await?;
        let used = lock(&self.store).visible().filter_map(|r| r.size).sum();
        Ok(Quota {
            used,
            total: Some(DEMO_QUOTA),
        })
    }

    async fn sign_out(&self) -> DriveResult<()> {
        let mut signed_in = lock(&self.signed_in);
        if !*signed_in {
            return Err(DriveError::NotInitialized);
        }
        *signed_in = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listing_is_scoped_and_name_ordered() {
        let drive = MemoryDrive::new();
        let cs = drive.insert_folder("CS", None);
        drive.insert_file("zeta.md", "", None);
        drive.insert_file("alpha.md", "", None);
        drive.insert_file("inner.md", "", Some(&cs.id));

        let names: Vec<_> = drive
            .list(None, None)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["alpha.md", "CS", "zeta.md"]);

        let inside = drive.list(Some(&cs.id), None).await.unwrap();
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].name, "inner.md");
    }

    #[tokio::test]
    async fn search_spans_every_folder() {
        let drive = MemoryDrive::new();
        let cs = drive.insert_folder("CS", None);
        drive.insert_file("notes.md", "", Some(&cs.id));
        drive.insert_file("Notes 2.txt", "", None);
        drive.insert_file("todo.txt", "", None);

        let found = drive.search("notes").await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_descendants() {
        let drive = MemoryDrive::new();
        let cs = drive.insert_folder("CS", None);
        let sub = drive.insert_folder("Week 1", Some(&cs.id));
        let leaf = drive.insert_file("a.md", "", Some(&sub.id));

        drive.delete(&cs.id).await.unwrap();
        assert!(matches!(drive.get(&leaf.id).await, Err(DriveError::NotFound(_))));
        assert!(drive.list(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn content_round_trip_updates_size() {
        let drive = MemoryDrive::new();
        let file = drive.insert_file("a.md", "old", None);
        drive.set_content(&file.id, "brand new").await.unwrap();

        assert_eq!(
            drive.get_content(&file.id).await.unwrap(),
            FileContent::Text("brand new".into())
        );
        assert_eq!(drive.get(&file.id).await.unwrap().size, Some(9));
    }

    #[tokio::test]
    async fn faults() {
        let drive = MemoryDrive::new();
        drive.fail_next(1);
        assert!(matches!(
            drive.list(None, None).await,
            Err(DriveError::Status { status: 503, .. })
        ));
        assert!(drive.list(None, None).await.is_ok());

        drive.expire_token();
        assert!(matches!(drive.quota().await, Err(DriveError::Auth(_))));

        drive.sign_in("fresh");
        drive.sign_out().await.unwrap();
        assert!(matches!(drive.recent().await, Err(DriveError::NotInitialized)));
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_skips_folders() {
        let drive = MemoryDrive::new();
        drive.insert_folder("CS", None);
        let a = drive.insert_file("a.md", "", None);
        let b = drive.insert_file("b.md", "", None);
        drive.set_content(&a.id, "touched").await.unwrap();

        let ids: Vec<_> = drive.recent().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, [a.id, b.id]);
    }
}
