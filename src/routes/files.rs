//! Stateless file lookups; these never touch the navigation state.
//!
//! - GET /api/v1/files?parent=&q=
//!   Children of `parent` (omitted = root), optionally filtered on name or type.
//!   Containers first.
//!
//! - GET /api/v1/files/{id}
//!   Metadata for one record.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::drive::order_listing;
use crate::error::Result;
use crate::models::{FileEntry, ROOT_ID};
use crate::session::SharedSessions;

pub fn routes(sessions: SharedSessions) -> Router {
    Router::new()
        .route("/api/v1/files", get(list_files))
        .route("/api/v1/files/{id}", get(get_file))
        .with_state(sessions)
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    parent: Option<String>,
    q: Option<String>,
}

async fn list_files(
    State(sessions): State<SharedSessions>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FileEntry>>> {
    let session = sessions.current()?;
    let parent = query
        .parent
        .as_deref()
        .filter(|p| !p.is_empty() && *p != ROOT_ID);
    let filter = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let records = session.client.list(parent, filter).await?;
    Ok(Json(order_listing(records).iter().map(FileEntry::from).collect()))
}

async fn get_file(
    State(sessions): State<SharedSessions>,
    Path(id): Path<String>,
) -> Result<Json<FileEntry>> {
    let session = sessions.current()?;
    let record = session.client.get(&id).await?;
    Ok(Json(FileEntry::from(&record)))
}
