//! Editor endpoints.
//!
//! - GET /api/v1/editor/{id}
//!   Text for editable files, a data URL for binaries, a Drive link for native documents.
//!
//! - PUT /api/v1/editor/{id} { content: string, name?: string }
//!   Saves text content, renames when `name` differs, refreshes the listing.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::models::{EditorDocument, FileEntry, SaveRequest};
use crate::session::SharedSessions;

pub fn routes(sessions: SharedSessions) -> Router {
    Router::new()
        .route("/api/v1/editor/{id}", get(open_document).put(save_document))
        .with_state(sessions)
}

async fn open_document(
    State(sessions): State<SharedSessions>,
    Path(id): Path<String>,
) -> Result<Json<EditorDocument>> {
    let session = sessions.current()?;
    Ok(Json(session.editor.open(&id).await?))
}

async fn save_document(
    State(sessions): State<SharedSessions>,
    Path(id): Path<String>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<FileEntry>> {
    let session = sessions.current()?;
    let record = session
        .editor
        .save(&id, &request.content, request.name.as_deref())
        .await?;
    Ok(Json(FileEntry::from(&record)))
}
