//! Navigation state endpoints. Every one answers with the resulting snapshot.
//!
//! - GET /api/v1/navigation
//!   Path, current container, visible files, query, view mode, selection, busy.
//!
//! - POST /api/v1/navigation/open { id: string | null, name: string }
//!   Opens a container; `null` or "root" goes to My Drive.
//!
//! - POST /api/v1/navigation/breadcrumb { index: number }
//!   Jumps back to a breadcrumb; 0 is the root.
//!
//! - POST /api/v1/navigation/refresh
//!   Re-lists the current container, or re-runs the search while one is active.
//!
//! - POST /api/v1/navigation/search { query: string }
//!   Non-empty searches the whole drive; empty returns to the container listing.
//!
//! - POST /api/v1/navigation/view-mode { mode: "grid" | "list" }
//! - POST /api/v1/navigation/selection { id: string }
//!   Toggles one visible record in the selection.
//!
//! - POST /api/v1/navigation/folders { name: string }
//! - POST /api/v1/navigation/files { name: string, content?: string }
//!   Creates inside the current container and refreshes.
//!
//! - PATCH /api/v1/navigation/records/{id} { name: string }
//! - DELETE /api/v1/navigation/records/{id}
//!   Renames or deletes a visible record and refreshes.

use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};

use crate::error::Result;
use crate::models::{
    BreadcrumbRequest, CreateFileRequest, CreateFolderRequest, NavigationSnapshot, OpenRequest,
    RenameRequest, SearchRequest, SelectionRequest, ViewModeRequest,
};
use crate::session::SharedSessions;

/// Body of a note created without content.
const NEW_NOTE_TEMPLATE: &str = "# New Note\n\nStart writing your note here...";

pub fn routes(sessions: SharedSessions) -> Router {
    Router::new()
        .route("/api/v1/navigation", get(get_snapshot))
        .route("/api/v1/navigation/open", post(open_container))
        .route("/api/v1/navigation/breadcrumb", post(navigate_to_breadcrumb))
        .route("/api/v1/navigation/refresh", post(refresh))
        .route("/api/v1/navigation/search", post(search))
        .route("/api/v1/navigation/view-mode", post(set_view_mode))
        .route("/api/v1/navigation/selection", post(toggle_selection))
        .route("/api/v1/navigation/folders", post(create_folder))
        .route("/api/v1/navigation/files", post(create_file))
        .route(
            "/api/v1/navigation/records/{id}",
            patch(rename_record).delete(delete_record),
        )
        .with_state(sessions)
}

async fn get_snapshot(State(sessions): State<SharedSessions>) -> Result<Json<NavigationSnapshot>> {
    let session = sessions.current()?;
    Ok(Json(session.navigator.snapshot()))
}

async fn open_container(
    State(sessions): State<SharedSessions>,
    Json(request): Json<OpenRequest>,
) -> Result<Json<NavigationSnapshot>> {
    let navigator = sessions.current()?.navigator.clone();
    navigator
        .open_container(request.id.as_deref(), &request.name)
        .await?;
    Ok(Json(navigator.snapshot()))
}

async fn navigate_to_breadcrumb(
    State(sessions): State<SharedSessions>,
    Json(request): Json<BreadcrumbRequest>,
) -> Result<Json<NavigationSnapshot>> {
    let navigator = sessions.current()?.navigator.clone();
    navigator.navigate_to_breadcrumb(request.index).await?;
    Ok(Json(navigator.snapshot()))
}

async fn refresh(State(sessions): State<SharedSessions>) -> Result<Json<NavigationSnapshot>> {
    let navigator = sessions.current()?.navigator.clone();
    navigator.refresh().await?;
    Ok(Json(navigator.snapshot()))
}

async fn search(
    State(sessions): State<SharedSessions>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<NavigationSnapshot>> {
    let navigator = sessions.current()?.navigator.clone();
    navigator.set_search_query(&request.query).await?;
    Ok(Json(navigator.snapshot()))
}

async fn set_view_mode(
    State(sessions): State<SharedSessions>,
    Json(request): Json<ViewModeRequest>,
) -> Result<Json<NavigationSnapshot>> {
    let navigator = sessions.current()?.navigator.clone();
    navigator.set_view_mode(request.mode);
    Ok(Json(navigator.snapshot()))
}

async fn toggle_selection(
    State(sessions): State<SharedSessions>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<NavigationSnapshot>> {
    let navigator = sessions.current()?.navigator.clone();
    navigator.toggle_selection(&request.id)?;
    Ok(Json(navigator.snapshot()))
}

async fn create_folder(
    State(sessions): State<SharedSessions>,
    Json(request): Json<CreateFolderRequest>,
) -> Result<Json<NavigationSnapshot>> {
    let navigator = sessions.current()?.navigator.clone();
    navigator.create_container(&request.name).await?;
    Ok(Json(navigator.snapshot()))
}

async fn create_file(
    State(sessions): State<SharedSessions>,
    Json(request): Json<CreateFileRequest>,
) -> Result<Json<NavigationSnapshot>> {
    let navigator = sessions.current()?.navigator.clone();
    let content = request.content.as_deref().unwrap_or(NEW_NOTE_TEMPLATE);
    navigator.create_file(&request.name, content).await?;
    Ok(Json(navigator.snapshot()))
}

async fn rename_record(
    State(sessions): State<SharedSessions>,
    Path(id): Path<String>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<NavigationSnapshot>> {
    let navigator = sessions.current()?.navigator.clone();
    navigator.rename_record(&id, &request.name).await?;
    Ok(Json(navigator.snapshot()))
}

async fn delete_record(
    State(sessions): State<SharedSessions>,
    Path(id): Path<String>,
) -> Result<Json<NavigationSnapshot>> {
    let navigator = sessions.current()?.navigator.clone();
    navigator.delete_record(&id).await?;
    Ok(Json(navigator.snapshot()))
}
