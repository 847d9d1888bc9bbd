//! Signed-in session: the persisted credential and the live registry.
//!
//! `SessionStore` keeps `{user, access_token}` in a JSON file so a restart does
//! not force a new login. `Sessions` holds at most one `ActiveSession`, which
//! owns the directory client, the `Navigator` and the `Editor` built on it.
//! Logging out drops all three, so the next login starts at the root again.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::drive::{Backend, SharedClient};
use crate::editor::Editor;
use crate::error::{AppError, Result};
use crate::models::{SessionInfo, StoredSession, UserInfo};
use crate::nav::Navigator;

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Stored session, if any. A file that does not parse is removed.
    pub fn load(&self) -> Option<StoredSession> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("Cannot read session file {}: {}", self.path.display(), err);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!("Discarding corrupt session file {}: {}", self.path.display(), err);
                let _ = fs::remove_file(&self.path);
                None
            }
        }
    }

    pub fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::Internal(format!("Cannot create {}: {}", dir.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| AppError::Internal(format!("Cannot encode session: {}", e)))?;
        fs::write(&self.path, json).map_err(|e| {
            AppError::Internal(format!("Cannot write {}: {}", self.path.display(), e))
        })
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Internal(format!(
                "Cannot remove {}: {}",
                self.path.display(),
                err
            ))),
        }
    }
}

pub struct ActiveSession {
    pub user: UserInfo,
    pub client: SharedClient,
    pub navigator: Arc<Navigator>,
    pub editor: Editor,
}

impl ActiveSession {
    fn new(user: UserInfo, client: SharedClient) -> Self {
        let navigator = Arc::new(Navigator::new(client.clone()));
        let editor = Editor::new(client.clone(), navigator.clone());
        Self {
            user,
            client,
            navigator,
            editor,
        }
    }
}

pub struct Sessions {
    backend: Backend,
    store: SessionStore,
    active: RwLock<Option<Arc<ActiveSession>>>,
}

pub type SharedSessions = Arc<Sessions>;

impl Sessions {
    pub fn new(backend: Backend, store: SessionStore) -> Self {
        Self {
            backend,
            store,
            active: RwLock::new(None),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn install(&self, user: UserInfo, client: SharedClient) -> Result<Arc<ActiveSession>> {
        let session = Arc::new(ActiveSession::new(user, client));
        let mut active = self
            .active
            .write()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
        *active = Some(session.clone());
        Ok(session)
    }

    /// Installs the stored session without contacting the backend; a stale
    /// token shows up as `Auth` on first use.
    pub fn restore(&self) -> Result<Option<UserInfo>> {
        let Some(stored) = self.store.load() else {
            return Ok(None);
        };
        let client = self.backend.connect(&stored.access_token)?;
        self.install(stored.user.clone(), client)?;
        info!("Restored session for {}", stored.user.email);
        Ok(Some(stored.user))
    }

    pub async fn login(&self, access_token: &str) -> Result<SessionInfo> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(AppError::InvalidRequest("Access token is required".to_string()));
        }

        let client = self.backend.connect(access_token)?;
        let user = client
            .user_info()
            .await
            .inspect_err(|err| warn!("Login failed: {}", err))?;

        self.store.save(&StoredSession {
            user: user.clone(),
            access_token: access_token.to_string(),
        })?;
        let session = self.install(user, client)?;
        info!("Signed in as {}", session.user.email);

        if let Err(err) = session.navigator.refresh().await {
            warn!("Initial listing failed: {}", err);
        }
        Ok(self.describe(&session))
    }

    /// Signs out and forgets the stored credential. Revocation is best-effort.
    pub async fn logout(&self) -> Result<()> {
        let previous = self
            .active
            .write()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?
            .take();

        if let Some(session) = previous {
            if let Err(err) = session.client.sign_out().await {
                warn!("Sign-out for {} failed: {}", session.user.email, err);
            }
            info!("Signed out {}", session.user.email);
        }
        self.store.clear()
    }

    pub fn current(&self) -> Result<Arc<ActiveSession>> {
        self.active
            .read()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?
            .clone()
            .ok_or_else(|| AppError::Auth("Not signed in".to_string()))
    }

    pub fn info(&self) -> Result<SessionInfo> {
        let session = self.current()?;
        Ok(self.describe(&session))
    }

    fn describe(&self, session: &ActiveSession) -> SessionInfo {
        SessionInfo {
            user: session.user.clone(),
            backend: self.backend_name().to_string(),
        }
    }
}
