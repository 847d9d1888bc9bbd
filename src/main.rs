//! Student Drive - a local browser front-end for Google Drive
//!
//! # Usage
//! ```bash
//! student-drive                       # Start server
//! student-drive --open                # Start and open browser
//! student-drive --demo                # Serve a seeded in-memory drive
//! student-drive login --token TOKEN   # Store a session without the server
//! student-drive logout                # Revoke and forget the stored session
//! student-drive status                # Check if running
//! student-drive kill                  # Stop running instance
//! ```

mod config;
mod drive;
mod editor;
mod error;
mod models;
mod nav;
mod routes;
mod session;

use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::routing::get;
use clap::{Parser, Subcommand};
use rust_embed::Embed;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, DriveEndpoints, default_session_file};
use drive::Backend;
use session::{SessionStore, Sessions};

/// Embedded frontend static files
#[derive(Embed)]
#[folder = "frontend/dist"]
struct Assets;

/// Student Drive - Browse and edit your Google Drive in the browser
#[derive(Parser)]
#[command(name = "student-drive")]
#[command(about = "A local browser front-end for Google Drive", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Open browser automatically after starting
    #[arg(short, long)]
    open: bool,

    /// Port to run the server on
    #[arg(short, long, env = "STUDENT_DRIVE_PORT", default_value = "3001")]
    port: u16,

    /// Serve a seeded in-memory drive instead of Google Drive
    #[arg(long)]
    demo: bool,

    /// Artificial delay for every demo drive call, in milliseconds
    #[arg(long, default_value = "0")]
    demo_latency_ms: u64,

    /// Where the signed-in session is stored
    #[arg(long, env = "STUDENT_DRIVE_SESSION_FILE", value_name = "PATH")]
    session_file: Option<PathBuf>,

    #[command(flatten)]
    endpoints: DriveEndpoints,
}

#[derive(Subcommand)]
enum Commands {
    /// Check if student-drive is currently running
    Status,
    /// Stop the running student-drive instance
    Kill,
    /// Store a session for an OAuth access token
    Login {
        /// Google OAuth access token with a Drive scope
        #[arg(long, env = "STUDENT_DRIVE_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Sign out and remove the stored session
    Logout,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            port: self.port,
            session_file: self
                .session_file
                .clone()
                .unwrap_or_else(|| default_session_file(self.demo)),
            endpoints: self.endpoints.clone(),
            demo: self.demo,
            demo_latency: Duration::from_millis(self.demo_latency_ms),
        }
    }
}

/// PID file info stored as JSON
#[derive(serde::Serialize, serde::Deserialize)]
struct PidInfo {
    pid: u32,
    port: u16,
    backend: String,
}

fn get_pid_file_path() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("student-drive.pid");
    path
}

fn read_pid_info() -> Option<PidInfo> {
    let path = get_pid_file_path();
    let mut file = fs::File::open(&path).ok()?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

fn write_pid_info(info: &PidInfo) -> anyhow::Result<()> {
    let path = get_pid_file_path();
    let mut file = fs::File::create(&path)?;
    file.write_all(serde_json::to_string(info)?.as_bytes())?;
    Ok(())
}

fn remove_pid_file() {
    let _ = fs::remove_file(get_pid_file_path());
}

#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    // Signal 0 only checks that the process exists
    unsafe { libc::kill(pid as i32, 0) == 0 }
}

#[cfg(windows)]
fn is_process_running(pid: u32) -> bool {
    use std::process::Command;
    Command::new("tasklist")
        .args(["/FI", &format!("PID eq {}", pid), "/NH"])
        .output()
        .map(|output| String::from_utf8_lossy(&output.stdout).contains(&pid.to_string()))
        .unwrap_or(false)
}

#[cfg(unix)]
fn kill_process(pid: u32) -> bool {
    unsafe { libc::kill(pid as i32, libc::SIGTERM) == 0 }
}

#[cfg(windows)]
fn kill_process(pid: u32) -> bool {
    use std::process::Command;
    Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/F"])
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn handle_status() {
    match read_pid_info() {
        Some(info) if is_process_running(info.pid) => {
            println!("✓ student-drive is running");
            println!("  PID:     {}", info.pid);
            println!("  Backend: {}", info.backend);
            println!("  URL:     http://127.0.0.1:{}", info.port);
        }
        Some(_) => {
            println!("✗ student-drive is not running (stale PID file)");
            remove_pid_file();
        }
        None => println!("✗ student-drive is not running"),
    }
}

fn handle_kill() {
    match read_pid_info() {
        Some(info) if is_process_running(info.pid) => {
            if kill_process(info.pid) {
                println!("✓ Stopped student-drive (PID {})", info.pid);
                remove_pid_file();
            } else {
                println!("✗ Failed to stop student-drive (PID {})", info.pid);
            }
        }
        Some(_) => {
            println!("✗ student-drive is not running (stale PID file)");
            remove_pid_file();
        }
        None => println!("✗ student-drive is not running"),
    }
}

async fn handle_login(sessions: &Sessions, token: &str) -> anyhow::Result<()> {
    let info = sessions.login(token).await?;
    println!("✓ Signed in as {} <{}>", info.user.name, info.user.email);
    Ok(())
}

async fn handle_logout(sessions: &Sessions) -> anyhow::Result<()> {
    if sessions.restore()?.is_none() {
        println!("✗ No stored session");
        return Ok(());
    }
    sessions.logout().await?;
    println!("✓ Signed out");
    Ok(())
}

fn asset_response(path: &str, data: Vec<u8>) -> Response<Body> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let mut response = Response::new(Body::from(data));
    if let Ok(value) = header::HeaderValue::from_str(mime.as_ref()) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

/// Serve embedded static files
async fn serve_static(req: Request<Body>) -> Response<Body> {
    let path = req.uri().path().trim_start_matches('/');

    // Non-file paths all get the single page
    let path = if path.is_empty() || !path.contains('.') {
        "index.html"
    } else {
        path
    };

    match Assets::get(path) {
        Some(content) => asset_response(path, content.data.into_owned()),
        None => match Assets::get("index.html") {
            Some(content) => asset_response("index.html", content.data.into_owned()),
            None => {
                let mut response = Response::new(Body::from("Not Found"));
                *response.status_mut() = StatusCode::NOT_FOUND;
                response
            }
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (quieter for production)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.config();
    let backend = Backend::from_config(&config);
    let sessions = Sessions::new(backend, SessionStore::new(&config.session_file));

    // Handle subcommands
    match &cli.command {
        Some(Commands::Status) => {
            handle_status();
            return Ok(());
        }
        Some(Commands::Kill) => {
            handle_kill();
            return Ok(());
        }
        Some(Commands::Login { token }) => return handle_login(&sessions, token).await,
        Some(Commands::Logout) => return handle_logout(&sessions).await,
        None => {}
    }

    // Check if already running
    if let Some(info) = read_pid_info() {
        if is_process_running(info.pid) {
            eprintln!("✗ student-drive is already running (PID {})", info.pid);
            eprintln!("  URL:  http://127.0.0.1:{}", info.port);
            eprintln!();
            eprintln!("Run 'student-drive kill' to stop it first.");
            std::process::exit(1);
        } else {
            remove_pid_file();
        }
    }

    let signed_in = sessions.restore()?;
    let sessions = Arc::new(sessions);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router with API routes and static file serving
    let app = Router::new()
        .merge(routes::create_router(sessions.clone()))
        .fallback(get(serve_static))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Bind to the port
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to port {}: {}", config.port, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    write_pid_info(&PidInfo {
        pid: std::process::id(),
        port: config.port,
        backend: sessions.backend_name().to_string(),
    })?;

    // Print startup message
    let url = format!("http://127.0.0.1:{}", config.port);
    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │                Student Drive                │");
    println!("  └─────────────────────────────────────────────┘");
    println!();
    println!("  Backend:    {}", sessions.backend_name());
    match &signed_in {
        Some(user) => println!("  Signed in:  {} <{}>", user.name, user.email),
        None => println!("  Signed in:  no (sign in from the page)"),
    }
    println!("  Session:    {}", config.session_file.display());
    println!("  Server:     {}", url);
    println!();
    println!("  Commands:");
    println!("    student-drive status  - Check if running");
    println!("    student-drive kill    - Stop the server");
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    // Open browser if requested
    if cli.open {
        if let Err(e) = open::that(&url) {
            eprintln!("  Warning: Could not open browser: {}", e);
        }
    }

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\n  Shutting down...");
        remove_pid_file();
    };

    // Start the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
