//! API route handlers - maps HTTP endpoints to session, navigation and editor operations.
//!
//! Each submodule defines routes for a feature area:
//! - `auth`: Sign in, restore and sign out (GET/POST/DELETE /api/v1/auth/session)
//! - `navigation`: The navigation state machine, one endpoint per operation
//! - `files`: Stateless listing and metadata lookups
//! - `editor`: Open and save a single file
//! - `dashboard`: Recent files and storage quota

pub mod auth;
pub mod dashboard;
pub mod editor;
pub mod files;
pub mod navigation;

use axum::Router;

use crate::session::SharedSessions;

pub fn create_router(sessions: SharedSessions) -> Router {
    Router::new()
        .merge(auth::routes(sessions.clone()))
        .merge(navigation::routes(sessions.clone()))
        .merge(files::routes(sessions.clone()))
        .merge(editor::routes(sessions.clone()))
        .merge(dashboard::routes(sessions))
}
