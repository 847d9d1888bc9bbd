//! Session endpoints.
//!
//! - GET /api/v1/auth/session
//!   Current user and backend, or 401 when nobody is signed in.
//!
//! - POST /api/v1/auth/session { access_token: string }
//!   Resolves the user behind the token, persists the session and lists the root.
//!
//! - DELETE /api/v1/auth/session
//!   Revokes the token (best-effort) and forgets the stored session.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::models::{LoginRequest, SessionInfo};
use crate::session::SharedSessions;

pub fn routes(sessions: SharedSessions) -> Router {
    Router::new()
        .route(
            "/api/v1/auth/session",
            get(get_session).post(login).delete(logout),
        )
        .with_state(sessions)
}

async fn get_session(State(sessions): State<SharedSessions>) -> Result<Json<SessionInfo>> {
    Ok(Json(sessions.info()?))
}

async fn login(
    State(sessions): State<SharedSessions>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionInfo>> {
    let info = sessions.login(&request.access_token).await?;
    Ok(Json(info))
}

async fn logout(State(sessions): State<SharedSessions>) -> Result<Json<()>> {
    sessions.logout().await?;
    Ok(Json(()))
}
