use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

/// On-disk form of a signed-in session.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: UserInfo,
    pub access_token: String,
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("user", &self.user)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub user: UserInfo,
    pub backend: String,
}
