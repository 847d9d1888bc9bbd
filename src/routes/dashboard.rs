use axum::{extract::State, routing::get, Json, Router};

use crate::error::Result;
use crate::models::Dashboard;
use crate::session::SharedSessions;

pub fn routes(sessions: SharedSessions) -> Router {
    Router::new()
        .route("/api/v1/dashboard", get(get_dashboard))
        .with_state(sessions)
}

async fn get_dashboard(State(sessions): State<SharedSessions>) -> Result<Json<Dashboard>> {
    let session = sessions.current()?;
    Ok(Json(session.editor.dashboard().await?))
}
