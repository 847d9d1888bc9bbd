//! Runtime configuration.
//!
//! Built once in `main` from CLI flags (each with an environment override) and
//! used to construct the session registry and the directory backend.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
pub const DEFAULT_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const DEFAULT_REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";

/// Google endpoints, overridable for proxies and test doubles.
#[derive(Debug, Clone, Args)]
pub struct DriveEndpoints {
    #[arg(long, env = "GOOGLE_DRIVE_API_BASE", default_value = DEFAULT_API_BASE, hide = true)]
    pub api_base: String,

    #[arg(long, env = "GOOGLE_DRIVE_UPLOAD_BASE", default_value = DEFAULT_UPLOAD_BASE, hide = true)]
    pub upload_base: String,

    #[arg(long, env = "GOOGLE_USERINFO_URL", default_value = DEFAULT_USERINFO_URL, hide = true)]
    pub userinfo_url: String,

    #[arg(long, env = "GOOGLE_REVOKE_URL", default_value = DEFAULT_REVOKE_URL, hide = true)]
    pub revoke_url: String,
}

impl Default for DriveEndpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
            userinfo_url: DEFAULT_USERINFO_URL.to_string(),
            revoke_url: DEFAULT_REVOKE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub session_file: PathBuf,
    pub endpoints: DriveEndpoints,
    /// Serve the in-memory drive instead of Google Drive.
    pub demo: bool,
    /// Artificial delay for every demo drive call.
    pub demo_latency: Duration,
}

/// `<tmp>/student-drive/session.json`; demo sessions live beside it so they
/// never shadow a real login.
pub fn default_session_file(demo: bool) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("student-drive");
    path.push(if demo { "demo-session.json" } else { "session.json" });
    path
}
