//! Navigation state and its synchronous transitions.
//!
//! Nothing here awaits. The `Navigator` takes the lock, asks this module what a
//! call would do, releases the lock while the directory client works, then
//! takes it again and either commits the result or drops it.
//!
//! Invariants held after every commit:
//! - `path[0]` is the root segment and `path.last()` names `current_folder_id`
//!   (root normalised to `None`)
//! - `selection` only holds ids present in `files`

use std::collections::BTreeSet;

use crate::drive::order_listing;
use crate::error::{AppError, Result};
use crate::models::{
    FileEntry, FileRecord, ListingScope, NavigationSnapshot, PathSegment, ROOT_ID, ViewMode,
};

/// What a listing request asks the directory client for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    /// Children of a container (`None` = root), narrowed by name or type when filtered.
    Folder {
        parent: Option<String>,
        filter: Option<String>,
    },
    /// Drive-wide name/type search.
    Search(String),
}

/// A reload result paired against the generation that is current when it lands.
#[derive(Debug)]
pub enum Reload<T> {
    Current(T),
    Stale { issued: u64, latest: u64 },
}

#[derive(Debug, Clone)]
pub struct NavigationState {
    current_folder_id: Option<String>,
    path: Vec<PathSegment>,
    files: Vec<FileRecord>,
    search_query: String,
    /// Where the visible set came from.
    scope: ListingScope,
    view_mode: ViewMode,
    selection: BTreeSet<String>,
    /// Generation of the most recently issued reload.
    generation: u64,
    /// Container the latest issued navigation is heading to; equals
    /// `current_folder_id` whenever no navigation is in flight.
    heading_to: Option<String>,
    in_flight: usize,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(id: Option<&str>) -> Option<&str> {
    id.filter(|id| !id.is_empty() && *id != ROOT_ID)
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            current_folder_id: None,
            path: vec![PathSegment::root()],
            files: Vec::new(),
            search_query: String::new(),
            scope: ListingScope::Folder,
            view_mode: ViewMode::default(),
            selection: BTreeSet::new(),
            generation: 0,
            heading_to: None,
            in_flight: 0,
        }
    }

    pub fn current_folder_id(&self) -> Option<&str> {
        self.current_folder_id.as_deref()
    }

    pub fn busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.files.iter().any(|f| f.id == id)
    }

    /// Children of `parent`, filtered by the active query if there is one.
    pub fn folder_source(&self, parent: Option<String>) -> ListingSource {
        let filter = Some(self.search_query.clone()).filter(|q| !q.is_empty());
        ListingSource::Folder { parent, filter }
    }

    /// Where a refresh reads from right now.
    pub fn source(&self) -> ListingSource {
        self.folder_source(self.current_folder_id.clone())
    }

    /// Path that opening `id` would produce, or `None` when already there.
    ///
    /// A container already on the path (the root, the current container or an
    /// ancestor) truncates back to it instead of being appended again. Reopening
    /// the current container while another navigation is in flight therefore
    /// yields the committed path, and reloading it supersedes that navigation.
    pub fn path_for_open(&self, id: Option<&str>, name: &str) -> Option<Vec<PathSegment>> {
        let id = normalize(id);
        if id == self.heading_to.as_deref() {
            return None;
        }

        match self.path.iter().position(|s| s.folder_id().as_deref() == id) {
            Some(index) => Some(self.path[..=index].to_vec()),
            None => {
                // The root is always path[0], so only real containers get here.
                let mut path = self.path.clone();
                path.push(PathSegment::new(id?, name));
                Some(path)
            }
        }
    }

    /// Path that jumping to breadcrumb `index` would produce, or `None` when already there.
    pub fn path_for_breadcrumb(&self, index: usize) -> Result<Option<Vec<PathSegment>>> {
        if index >= self.path.len() {
            return Err(AppError::BreadcrumbOutOfRange {
                index,
                len: self.path.len(),
            });
        }

        let path = self.path[..=index].to_vec();
        let target = path.last().and_then(PathSegment::folder_id);
        if target == self.heading_to {
            return Ok(None);
        }
        Ok(Some(path))
    }

    /// Starts a navigation reload towards the last segment of `path`.
    pub fn issue_navigation(&mut self, path: &[PathSegment]) -> u64 {
        self.heading_to = path.last().and_then(PathSegment::folder_id);
        self.generation += 1;
        self.generation
    }

    /// Starts a reload of the current view; supersedes any navigation in flight.
    pub fn issue_refresh(&mut self) -> u64 {
        self.heading_to = self.current_folder_id.clone();
        self.generation += 1;
        self.generation
    }

    pub fn tag<T>(&self, issued: u64, value: T) -> Reload<T> {
        if issued == self.generation {
            Reload::Current(value)
        } else {
            Reload::Stale {
                issued,
                latest: self.generation,
            }
        }
    }

    /// Applies a navigation whose listing arrived for the latest generation.
    /// The search query survives; the listing was already filtered by it.
    pub fn commit_navigation(&mut self, path: Vec<PathSegment>, files: Vec<FileRecord>) {
        self.current_folder_id = path.last().and_then(PathSegment::folder_id);
        self.heading_to = self.current_folder_id.clone();
        self.path = path;
        self.scope = ListingScope::Folder;
        self.files = order_listing(files);
        self.selection.clear();
    }

    /// Replaces the visible set, keeping whatever selection is still visible.
    pub fn commit_listing(&mut self, files: Vec<FileRecord>) {
        self.scope = ListingScope::Folder;
        self.replace_files(files);
    }

    /// Applies a search: drive-wide results for a query, the folder listing for an empty one.
    pub fn commit_search(&mut self, query: String, files: Vec<FileRecord>) {
        self.scope = if query.is_empty() {
            ListingScope::Folder
        } else {
            ListingScope::Drive
        };
        self.search_query = query;
        self.replace_files(files);
    }

    fn replace_files(&mut self, files: Vec<FileRecord>) {
        self.heading_to = self.current_folder_id.clone();
        self.files = order_listing(files);
        let files = &self.files;
        self.selection.retain(|id| files.iter().any(|f| &f.id == id));
    }

    /// The latest reload failed: nothing changes except where we are heading.
    pub fn abandon(&mut self) {
        self.heading_to = self.current_folder_id.clone();
    }

    pub fn toggle_selection(&mut self, id: &str) -> Result<()> {
        if !self.is_visible(id) {
            return Err(AppError::NotVisible(id.to_string()));
        }
        if !self.selection.remove(id) {
            self.selection.insert(id.to_string());
        }
        Ok(())
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn begin_remote(&mut self) {
        self.in_flight += 1;
    }

    pub fn end_remote(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            current_folder_id: self.current_folder_id.clone(),
            path: self.path.clone(),
            files: self.files.iter().map(FileEntry::from).collect(),
            search_query: self.search_query.clone(),
            scope: self.scope,
            view_mode: self.view_mode,
            selection: self.selection.clone(),
            busy: self.busy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FOLDER_MIME;

    fn in_folder(id: &str, name: &str) -> NavigationState {
        let mut state = NavigationState::new();
        let path = state.path_for_open(Some(id), name).unwrap();
        state.issue_navigation(&path);
        state.commit_navigation(path, vec![FileRecord::new("x", "x.md", "text/markdown")]);
        state
    }

    #[test]
    fn starts_at_root() {
        let state = NavigationState::new();
        assert_eq!(state.snapshot().path, [PathSegment::new("root", "My Drive")]);
        assert_eq!(state.current_folder_id(), None);
        assert_eq!(
            state.source(),
            ListingSource::Folder {
                parent: None,
                filter: None
            }
        );
        assert!(!state.busy());
    }

    #[test]
    fn opening_the_current_container_is_a_no_op() {
        let state = in_folder("f1", "CS");
        assert!(state.path_for_open(Some("f1"), "CS").is_none());
        assert!(NavigationState::new().path_for_open(None, "My Drive").is_none());
        assert!(NavigationState::new().path_for_open(Some("root"), "My Drive").is_none());
    }

    #[test]
    fn commit_keeps_path_and_folder_in_step() {
        let state = in_folder("f1", "CS");
        assert_eq!(state.current_folder_id(), Some("f1"));
        assert_eq!(state.snapshot().path.last().unwrap().id, "f1");
        assert_eq!(state.snapshot().path.len(), 2);
    }

    #[test]
    fn breadcrumb_truncates_inclusive() {
        let state = in_folder("f1", "CS");
        let path = state.path_for_breadcrumb(0).unwrap().unwrap();
        assert_eq!(path, [PathSegment::root()]);
        assert!(state.path_for_breadcrumb(1).unwrap().is_none());
        assert!(matches!(
            state.path_for_breadcrumb(2),
            Err(AppError::BreadcrumbOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn stale_generations_are_tagged() {
        let mut state = NavigationState::new();
        let first = state.issue_refresh();
        let second = state.issue_refresh();
        assert!(matches!(
            state.tag(first, ()),
            Reload::Stale { issued, latest } if issued == first && latest == second
        ));
        assert!(matches!(state.tag(second, ()), Reload::Current(())));
    }

    #[test]
    fn selection_only_accepts_visible_ids() {
        let mut state = in_folder("f1", "CS");
        state.toggle_selection("x").unwrap();
        assert!(state.snapshot().selection.contains("x"));
        state.toggle_selection("x").unwrap();
        assert!(state.snapshot().selection.is_empty());

        assert!(matches!(state.toggle_selection("ghost"), Err(AppError::NotVisible(_))));
        assert!(state.snapshot().selection.is_empty());
    }

    #[test]
    fn listing_prunes_selection_and_orders_containers_first() {
        let mut state = in_folder("f1", "CS");
        state.toggle_selection("x").unwrap();
        state.commit_listing(vec![
            FileRecord::new("b", "b.md", "text/markdown"),
            FileRecord::new("d", "Docs", FOLDER_MIME),
        ]);
        assert!(state.snapshot().selection.is_empty());
        let ids: Vec<_> = state.snapshot().files.iter().map(|f| f.record.id.clone()).collect();
        assert_eq!(ids, ["d", "b"]);
    }

    #[test]
    fn search_results_are_drive_wide_but_refresh_filters_the_folder() {
        let mut state = in_folder("f1", "CS");
        state.commit_search("notes".into(), Vec::new());
        assert_eq!(state.snapshot().scope, ListingScope::Drive);
        assert_eq!(
            state.source(),
            ListingSource::Folder {
                parent: Some("f1".into()),
                filter: Some("notes".into())
            }
        );

        state.commit_listing(Vec::new());
        assert_eq!(state.snapshot().scope, ListingScope::Folder);
        assert_eq!(state.snapshot().search_query, "notes");

        state.commit_search(String::new(), Vec::new());
        assert_eq!(
            state.source(),
            ListingSource::Folder {
                parent: Some("f1".into()),
                filter: None
            }
        );
    }

    #[test]
    fn reopening_a_container_on_the_path_truncates() {
        let mut state = in_folder("f1", "CS");
        let path = state.path_for_open(Some("f2"), "Week 1").unwrap();
        state.issue_navigation(&path);
        state.commit_navigation(path, Vec::new());

        let path = state.path_for_open(Some("f1"), "CS").unwrap();
        assert_eq!(path, [PathSegment::root(), PathSegment::new("f1", "CS")]);
    }

    #[test]
    fn reopening_current_container_mid_navigation_keeps_the_path() {
        let mut state = in_folder("f1", "CS");
        let away = state.path_for_open(Some("f2"), "Week 1").unwrap();
        let first = state.issue_navigation(&away);

        let back = state.path_for_open(Some("f1"), "CS").unwrap();
        assert_eq!(back, state.snapshot().path);
        let second = state.issue_navigation(&back);
        assert!(matches!(state.tag(first, ()), Reload::Stale { .. }));
        assert!(matches!(state.tag(second, ()), Reload::Current(())));
    }

    #[test]
    fn busy_tracks_calls_in_flight() {
        let mut state = NavigationState::new();
        state.begin_remote();
        state.begin_remote();
        state.end_remote();
        assert!(state.busy());
        state.end_remote();
        assert!(!state.busy());
        assert!(!state.snapshot().busy);
    }
}
