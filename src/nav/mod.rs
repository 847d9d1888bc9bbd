//! Folder navigation and file listing.
//!
//! `Navigator` is the only writer of a session's `NavigationState`. Every
//! operation follows the same shape: decide under the lock, release it, await
//! the directory client, re-take the lock and apply.
//!
//! Reloads are tagged with a generation number when issued. A listing that
//! lands after a newer reload was issued is dropped (`NavOutcome::Superseded`),
//! so the last navigation a user asked for is the one they see, whatever order
//! the responses arrive in. In-flight requests are never cancelled.
//!
//! A failed call leaves path, container, visible set and selection exactly as
//! they were and returns the error to the caller.

pub mod state;

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::drive::SharedClient;
use crate::error::{AppError, DriveResult, Result};
use crate::models::{FileRecord, NavigationSnapshot, PathSegment, ViewMode};

use state::{ListingSource, NavigationState, Reload};

/// What a navigation call did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Applied,
    /// Already there; nothing was requested.
    Unchanged,
    /// A newer reload was issued before this one landed; its result was dropped.
    Superseded,
}

pub struct Navigator {
    client: SharedClient,
    state: Mutex<NavigationState>,
}

/// Counts a directory call as in flight until dropped, including when the
/// awaiting future is itself dropped.
struct InFlight<'a> {
    navigator: &'a Navigator,
}

impl<'a> InFlight<'a> {
    fn start(navigator: &'a Navigator) -> Self {
        navigator.state().begin_remote();
        Self { navigator }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.navigator.state().end_remote();
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidRequest("Name must not be empty".to_string()));
    }
    Ok(name)
}

impl Navigator {
    pub fn new(client: SharedClient) -> Self {
        Self {
            client,
            state: Mutex::new(NavigationState::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, NavigationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        self.state().snapshot()
    }

    /// Runs one directory call with the busy flag raised.
    async fn remote<T>(&self, call: impl Future<Output = DriveResult<T>>) -> DriveResult<T> {
        let _flight = InFlight::start(self);
        call.await
    }

    async fn fetch(&self, source: &ListingSource) -> DriveResult<Vec<FileRecord>> {
        match source {
            ListingSource::Folder { parent, filter } => {
                self.client.list(parent.as_deref(), filter.as_deref()).await
            }
            ListingSource::Search(query) => self.client.search(query).await,
        }
    }

    /// Opens a container (`None` = root), appending it to the breadcrumb path
    /// unless it is already on it.
    pub async fn open_container(&self, id: Option<&str>, name: &str) -> Result<NavOutcome> {
        let (generation, path, source) = {
            let mut state = self.state();
            let Some(path) = state.path_for_open(id, name) else {
                return Ok(NavOutcome::Unchanged);
            };
            let source = state.folder_source(path.last().and_then(PathSegment::folder_id));
            (state.issue_navigation(&path), path, source)
        };
        self.navigate(generation, path, source).await
    }

    /// Jumps back to breadcrumb `index` (0 = root).
    pub async fn navigate_to_breadcrumb(&self, index: usize) -> Result<NavOutcome> {
        let (generation, path, source) = {
            let mut state = self.state();
            let Some(path) = state.path_for_breadcrumb(index)? else {
                return Ok(NavOutcome::Unchanged);
            };
            let source = state.folder_source(path.last().and_then(PathSegment::folder_id));
            (state.issue_navigation(&path), path, source)
        };
        self.navigate(generation, path, source).await
    }

    async fn navigate(
        &self,
        generation: u64,
        path: Vec<PathSegment>,
        source: ListingSource,
    ) -> Result<NavOutcome> {
        let target = path.last().and_then(PathSegment::folder_id);
        let result = self.remote(self.fetch(&source)).await;

        let mut state = self.state();
        match state.tag(generation, result) {
            Reload::Stale { issued, latest } => {
                debug!("Dropping listing for {:?} (generation {} < {})", target, issued, latest);
                Ok(NavOutcome::Superseded)
            }
            Reload::Current(Ok(files)) => {
                info!("Opened {:?} ({} entries)", target, files.len());
                state.commit_navigation(path, files);
                Ok(NavOutcome::Applied)
            }
            Reload::Current(Err(err)) => {
                warn!("Failed to open {:?}: {}", target, err);
                state.abandon();
                Err(err.into())
            }
        }
    }

    /// Reloads the children of the current container, filtered by the active query.
    pub async fn refresh(&self) -> Result<NavOutcome> {
        let (generation, source) = {
            let mut state = self.state();
            (state.issue_refresh(), state.source())
        };
        let result = self.remote(self.fetch(&source)).await;

        let mut state = self.state();
        match state.tag(generation, result) {
            Reload::Stale { issued, latest } => {
                debug!("Dropping refresh (generation {} < {})", issued, latest);
                Ok(NavOutcome::Superseded)
            }
            Reload::Current(Ok(files)) => {
                state.commit_listing(files);
                Ok(NavOutcome::Applied)
            }
            Reload::Current(Err(err)) => {
                warn!("Failed to list {:?}: {}", source, err);
                state.abandon();
                Err(err.into())
            }
        }
    }

    /// Non-empty: list matches from the whole drive. Empty: back to the current container.
    /// Later refreshes and navigations keep filtering by the query until it is cleared.
    pub async fn set_search_query(&self, query: &str) -> Result<NavOutcome> {
        let query = query.trim().to_string();
        let (generation, source) = {
            let mut state = self.state();
            let source = if query.is_empty() {
                ListingSource::Folder {
                    parent: state.current_folder_id().map(str::to_string),
                    filter: None,
                }
            } else {
                ListingSource::Search(query.clone())
            };
            (state.issue_refresh(), source)
        };
        let result = self.remote(self.fetch(&source)).await;

        let mut state = self.state();
        match state.tag(generation, result) {
            Reload::Stale { issued, latest } => {
                debug!("Dropping search {:?} (generation {} < {})", query, issued, latest);
                Ok(NavOutcome::Superseded)
            }
            Reload::Current(Ok(files)) => {
                state.commit_search(query, files);
                Ok(NavOutcome::Applied)
            }
            Reload::Current(Err(err)) => {
                warn!("Search {:?} failed: {}", query, err);
                state.abandon();
                Err(err.into())
            }
        }
    }

    pub fn set_view_mode(&self, mode: ViewMode) {
        self.state().set_view_mode(mode);
    }

    pub fn toggle_selection(&self, id: &str) -> Result<()> {
        self.state().toggle_selection(id)
    }

    pub async fn create_container(&self, name: &str) -> Result<FileRecord> {
        let name = validate_name(name)?;
        let parent = self.state().current_folder_id().map(str::to_string);

        let record = self
            .remote(self.client.create_container(name, parent.as_deref()))
            .await
            .inspect_err(|err| warn!("Failed to create folder {:?}: {}", name, err))?;
        self.refresh_after("create folder", &record.id).await?;
        Ok(record)
    }

    pub async fn create_file(&self, name: &str, content: &str) -> Result<FileRecord> {
        let name = validate_name(name)?;
        let parent = self.state().current_folder_id().map(str::to_string);

        let record = self
            .remote(self.client.create_file(name, content, parent.as_deref()))
            .await
            .inspect_err(|err| warn!("Failed to create file {:?}: {}", name, err))?;
        self.refresh_after("create file", &record.id).await?;
        Ok(record)
    }

    pub async fn rename_record(&self, id: &str, new_name: &str) -> Result<()> {
        let new_name = validate_name(new_name)?;
        self.ensure_visible(id)?;

        self.remote(self.client.rename(id, new_name))
            .await
            .inspect_err(|err| warn!("Failed to rename {}: {}", id, err))?;
        self.refresh_after("rename", id).await
    }

    pub async fn delete_record(&self, id: &str) -> Result<()> {
        self.ensure_visible(id)?;

        self.remote(self.client.delete(id))
            .await
            .inspect_err(|err| warn!("Failed to delete {}: {}", id, err))?;
        self.refresh_after("delete", id).await
    }

    fn ensure_visible(&self, id: &str) -> Result<()> {
        if self.state().is_visible(id) {
            Ok(())
        } else {
            Err(AppError::NotVisible(id.to_string()))
        }
    }

    async fn refresh_after(&self, action: &str, id: &str) -> Result<()> {
        self.refresh()
            .await
            .inspect_err(|err| warn!("{} of {} succeeded but refresh failed: {}", action, id, err))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::drive::{DirectoryClient, MemoryDrive};
    use crate::drive::memory::SEARCH_SCOPE;
    use crate::models::{ListingScope, ROOT_ID};

    struct Fixture {
        drive: Arc<MemoryDrive>,
        nav: Navigator,
        cs: FileRecord,
        math: FileRecord,
    }

    async fn fixture() -> Fixture {
        let drive = Arc::new(MemoryDrive::new());
        let cs = drive.insert_folder("CS", None);
        let math = drive.insert_folder("Math", None);
        drive.insert_file("readme.md", "hi", None);
        drive.insert_file("notes.md", "# cs notes", Some(cs.id.as_str()));
        drive.insert_folder("Week 1", Some(cs.id.as_str()));
        drive.insert_file("notes on limits.txt", "", Some(math.id.as_str()));

        let nav = Navigator::new(drive.clone());
        nav.refresh().await.unwrap();
        Fixture { drive, nav, cs, math }
    }

    fn names(snapshot: &NavigationSnapshot) -> Vec<String> {
        snapshot.files.iter().map(|f| f.record.name.clone()).collect()
    }

    fn assert_path_matches_folder(snapshot: &NavigationSnapshot) {
        let last = snapshot.path.last().unwrap();
        assert_eq!(last.folder_id(), snapshot.current_folder_id);
        assert_eq!(snapshot.path[0].id, ROOT_ID);
    }

    #[tokio::test]
    async fn open_and_return_via_breadcrumb() {
        let f = fixture().await;

        assert_eq!(
            f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap(),
            NavOutcome::Applied
        );
        let snap = f.nav.snapshot();
        assert_eq!(
            snap.path,
            [PathSegment::new("root", "My Drive"), PathSegment::new(&f.cs.id, "CS")]
        );
        assert_eq!(snap.current_folder_id.as_deref(), Some(f.cs.id.as_str()));
        assert!(snap.selection.is_empty());
        assert_eq!(names(&snap), ["Week 1", "notes.md"]);

        f.nav.navigate_to_breadcrumb(0).await.unwrap();
        let snap = f.nav.snapshot();
        assert_eq!(snap.path, [PathSegment::root()]);
        assert_eq!(snap.current_folder_id, None);
        assert_eq!(names(&snap), ["CS", "Math", "readme.md"]);
    }

    #[tokio::test]
    async fn path_tracks_folder_across_sequences() {
        let f = fixture().await;
        let week = f.drive.list(Some(f.cs.id.as_str()), None).await.unwrap();
        let week = week.iter().find(|r| r.name == "Week 1").unwrap();

        f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap();
        f.nav.open_container(Some(week.id.as_str()), "Week 1").await.unwrap();
        assert_path_matches_folder(&f.nav.snapshot());
        assert_eq!(f.nav.snapshot().path.len(), 3);

        f.nav.navigate_to_breadcrumb(1).await.unwrap();
        assert_path_matches_folder(&f.nav.snapshot());
        assert_eq!(f.nav.snapshot().path.len(), 2);

        f.nav.open_container(None, "My Drive").await.unwrap();
        assert_path_matches_folder(&f.nav.snapshot());
        assert_eq!(f.nav.snapshot().path.len(), 1);
    }

    #[tokio::test]
    async fn reopening_the_current_folder_is_a_no_op() {
        let f = fixture().await;
        f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap();
        f.drive.fail_next(1);

        assert_eq!(
            f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap(),
            NavOutcome::Unchanged
        );
        assert_eq!(f.nav.snapshot().path.len(), 2);
    }

    #[tokio::test]
    async fn breadcrumb_is_idempotent() {
        let f = fixture().await;
        f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap();

        f.nav.navigate_to_breadcrumb(0).await.unwrap();
        let first = f.nav.snapshot();
        assert_eq!(
            f.nav.navigate_to_breadcrumb(0).await.unwrap(),
            NavOutcome::Unchanged
        );
        let second = f.nav.snapshot();
        assert_eq!(first.path, second.path);
        assert_eq!(first.current_folder_id, second.current_folder_id);
    }

    #[tokio::test]
    async fn breadcrumb_out_of_range_is_rejected() {
        let f = fixture().await;
        assert!(matches!(
            f.nav.navigate_to_breadcrumb(3).await,
            Err(AppError::BreadcrumbOutOfRange { index: 3, len: 1 })
        ));
    }

    #[tokio::test]
    async fn late_listing_never_clobbers_newer_navigation() {
        let f = fixture().await;
        f.drive.set_latency(&f.cs.id, Duration::from_millis(80));

        let (slow, fast) = tokio::join!(
            f.nav.open_container(Some(f.cs.id.as_str()), "CS"),
            f.nav.open_container(Some(f.math.id.as_str()), "Math"),
        );
        assert_eq!(slow.unwrap(), NavOutcome::Superseded);
        assert_eq!(fast.unwrap(), NavOutcome::Applied);

        let snap = f.nav.snapshot();
        assert_eq!(snap.current_folder_id.as_deref(), Some(f.math.id.as_str()));
        assert_eq!(
            snap.path,
            [PathSegment::root(), PathSegment::new(&f.math.id, "Math")]
        );
        assert_eq!(names(&snap), ["notes on limits.txt"]);
        assert!(!snap.busy);
    }

    #[tokio::test]
    async fn returning_home_while_a_folder_loads_wins() {
        let f = fixture().await;
        f.drive.set_latency(&f.cs.id, Duration::from_millis(80));

        let (slow, home) = tokio::join!(
            f.nav.open_container(Some(f.cs.id.as_str()), "CS"),
            f.nav.open_container(None, "My Drive"),
        );
        assert_eq!(slow.unwrap(), NavOutcome::Superseded);
        assert_eq!(home.unwrap(), NavOutcome::Applied);
        assert_eq!(f.nav.snapshot().current_folder_id, None);
    }

    #[tokio::test]
    async fn busy_while_listing_is_in_flight() {
        let f = fixture().await;
        f.drive.set_latency(&f.cs.id, Duration::from_millis(50));

        let watch_busy = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            f.nav.snapshot().busy
        };
        let (opened, busy) = tokio::join!(f.nav.open_container(Some(f.cs.id.as_str()), "CS"), watch_busy);
        opened.unwrap();
        assert!(busy);
        assert!(!f.nav.snapshot().busy);
    }

    #[tokio::test]
    async fn failed_navigation_leaves_state_untouched() {
        let f = fixture().await;
        f.nav.toggle_selection(&f.cs.id).unwrap();
        let before = f.nav.snapshot();

        f.drive.fail_next(1);
        let err = f.nav.open_container(Some(f.math.id.as_str()), "Math").await.unwrap_err();
        assert!(matches!(err, AppError::Remote(_)));

        let after = f.nav.snapshot();
        assert_eq!(before.path, after.path);
        assert_eq!(before.current_folder_id, after.current_folder_id);
        assert_eq!(before.selection, after.selection);
        assert_eq!(names(&before), names(&after));
        assert!(!after.busy);

        // The failed target is not remembered as "already there".
        assert_eq!(
            f.nav.open_container(Some(f.math.id.as_str()), "Math").await.unwrap(),
            NavOutcome::Applied
        );
    }

    #[tokio::test]
    async fn failures_are_not_empty_listings() {
        let f = fixture().await;
        f.drive.set_offline(true);
        assert!(f.nav.refresh().await.is_err());
        assert_eq!(names(&f.nav.snapshot()), ["CS", "Math", "readme.md"]);
    }

    #[tokio::test]
    async fn expired_credentials_surface_as_auth_errors() {
        let f = fixture().await;
        f.drive.expire_token();
        assert!(matches!(f.nav.refresh().await, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn search_is_global_and_clearing_restores_folder() {
        let f = fixture().await;
        f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap();

        f.nav.set_search_query("notes").await.unwrap();
        let snap = f.nav.snapshot();
        assert_eq!(names(&snap), ["notes on limits.txt", "notes.md"]);
        assert_eq!(snap.search_query, "notes");
        assert_eq!(snap.current_folder_id.as_deref(), Some(f.cs.id.as_str()));

        f.nav.set_search_query("").await.unwrap();
        let snap = f.nav.snapshot();
        assert_eq!(names(&snap), ["Week 1", "notes.md"]);
        assert_eq!(snap.search_query, "");
    }

    #[tokio::test]
    async fn failed_search_keeps_previous_query() {
        let f = fixture().await;
        f.drive.fail_next(1);
        assert!(f.nav.set_search_query("notes").await.is_err());
        assert_eq!(f.nav.snapshot().search_query, "");
    }

    #[tokio::test]
    async fn stale_search_results_are_dropped() {
        let f = fixture().await;
        f.drive.set_latency(SEARCH_SCOPE, Duration::from_millis(80));

        let (search, opened) = tokio::join!(
            f.nav.set_search_query("notes"),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                f.nav.open_container(Some(f.math.id.as_str()), "Math").await
            },
        );
        assert_eq!(search.unwrap(), NavOutcome::Superseded);
        assert_eq!(opened.unwrap(), NavOutcome::Applied);
        assert_eq!(f.nav.snapshot().search_query, "");
    }

    #[tokio::test]
    async fn toggle_selection_round_trip_and_rejects_stale_ids() {
        let f = fixture().await;
        f.nav.toggle_selection(&f.cs.id).unwrap();
        f.nav.toggle_selection(&f.cs.id).unwrap();
        assert!(f.nav.snapshot().selection.is_empty());

        f.nav.toggle_selection(&f.math.id).unwrap();
        f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap();
        assert!(f.nav.snapshot().selection.is_empty());

        // Math was visible in the previous listing only.
        assert!(matches!(
            f.nav.toggle_selection(&f.math.id),
            Err(AppError::NotVisible(_))
        ));
        assert!(f.nav.snapshot().selection.is_empty());
    }

    #[tokio::test]
    async fn created_file_is_listed_exactly_once() {
        let f = fixture().await;
        f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap();

        let record = f.nav.create_file("notes.md", "# hi").await.unwrap();
        assert_eq!(record.name, "notes.md");
        assert_eq!(record.parents, [f.cs.id.clone()]);

        let snap = f.nav.snapshot();
        let hits = snap.files.iter().filter(|e| e.record.id == record.id).count();
        assert_eq!(hits, 1);
    }

    #[tokio::test]
    async fn created_folder_sorts_before_files() {
        let f = fixture().await;
        let folder = f.nav.create_container("Zoology").await.unwrap();
        assert!(folder.is_container());
        assert_eq!(folder.size, None);
        assert_eq!(names(&f.nav.snapshot()), ["CS", "Math", "Zoology", "readme.md"]);
    }

    #[tokio::test]
    async fn failed_create_changes_nothing() {
        let f = fixture().await;
        f.drive.fail_next(1);
        assert!(f.nav.create_file("x.md", "").await.is_err());
        assert!(f.drive.search("x.md").await.unwrap().is_empty());
        assert_eq!(names(&f.nav.snapshot()), ["CS", "Math", "readme.md"]);
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let f = fixture().await;
        assert!(matches!(
            f.nav.create_container("   ").await,
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn rename_and_delete_refresh_the_listing() {
        let f = fixture().await;
        let readme = f.nav.snapshot().files[2].record.clone();
        f.nav.toggle_selection(&readme.id).unwrap();

        f.nav.rename_record(&readme.id, "README.md").await.unwrap();
        let snap = f.nav.snapshot();
        assert_eq!(names(&snap), ["CS", "Math", "README.md"]);
        assert!(snap.selection.contains(&readme.id));

        f.nav.delete_record(&readme.id).await.unwrap();
        let snap = f.nav.snapshot();
        assert_eq!(names(&snap), ["CS", "Math"]);
        assert!(snap.selection.is_empty());
    }

    #[tokio::test]
    async fn mutations_require_a_visible_record() {
        let f = fixture().await;
        let hidden = f.drive.list(Some(f.cs.id.as_str()), None).await.unwrap().remove(0);
        assert!(matches!(
            f.nav.delete_record(&hidden.id).await,
            Err(AppError::NotVisible(_))
        ));
        assert!(matches!(
            f.nav.rename_record(&hidden.id, "x").await,
            Err(AppError::NotVisible(_))
        ));
    }

    #[tokio::test]
    async fn refresh_during_search_filters_the_current_folder() {
        let f = fixture().await;
        f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap();
        f.nav.set_search_query("notes").await.unwrap();
        assert_eq!(names(&f.nav.snapshot()), ["notes on limits.txt", "notes.md"]);

        f.nav.refresh().await.unwrap();
        let snap = f.nav.snapshot();
        assert_eq!(names(&snap), ["notes.md"]);
        assert_eq!(snap.search_query, "notes");
        assert_eq!(snap.scope, ListingScope::Folder);
    }

    #[tokio::test]
    async fn navigation_keeps_filtering_by_the_query() {
        let f = fixture().await;
        f.nav.set_search_query("notes").await.unwrap();

        f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap();
        let snap = f.nav.snapshot();
        assert_eq!(names(&snap), ["notes.md"]);
        assert_eq!(snap.search_query, "notes");

        f.nav.set_search_query("").await.unwrap();
        assert_eq!(names(&f.nav.snapshot()), ["Week 1", "notes.md"]);
    }

    #[tokio::test]
    async fn reopening_current_folder_mid_navigation_never_repeats_it() {
        let f = fixture().await;
        f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap();
        let week = f.nav.snapshot().files[0].record.clone();
        f.drive.set_latency(&week.id, Duration::from_millis(80));

        let (away, back) = tokio::join!(
            f.nav.open_container(Some(week.id.as_str()), "Week 1"),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                f.nav.open_container(Some(f.cs.id.as_str()), "CS").await
            },
        );
        assert_eq!(away.unwrap(), NavOutcome::Superseded);
        assert_eq!(back.unwrap(), NavOutcome::Applied);

        let snap = f.nav.snapshot();
        assert_eq!(
            snap.path,
            [PathSegment::root(), PathSegment::new(&f.cs.id, "CS")]
        );
        assert_eq!(snap.current_folder_id.as_deref(), Some(f.cs.id.as_str()));
        assert_eq!(names(&snap), ["Week 1", "notes.md"]);
    }

    #[tokio::test]
    async fn reopening_an_ancestor_goes_back_to_it() {
        let f = fixture().await;
        f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap();
        let week = f.nav.snapshot().files[0].record.clone();
        f.nav.open_container(Some(week.id.as_str()), "Week 1").await.unwrap();

        f.nav.open_container(Some(f.cs.id.as_str()), "CS").await.unwrap();
        assert_eq!(f.nav.snapshot().path.len(), 2);
        assert_path_matches_folder(&f.nav.snapshot());
    }

    #[tokio::test]
    async fn view_mode_switches() {
        let f = fixture().await;
        assert_eq!(f.nav.snapshot().view_mode, ViewMode::Grid);
        f.nav.set_view_mode(ViewMode::List);
        assert_eq!(f.nav.snapshot().view_mode, ViewMode::List);
    }
}
