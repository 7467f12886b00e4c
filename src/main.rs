//! cmsconsole - command-line console for the CMS community service
//!
//! Signs in against the community API and exposes the admin moderation
//! console (dashboard, review queue, posts, notices, users, reports,
//! monitoring, notifications) and the public portal from the terminal.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, failed action, etc.)
//!   2 - Authentication required (no session, expired session, not an admin)

mod actions;
mod analysis;
mod api;
mod cli;
mod commands;
mod config;
mod filters;
mod models;
mod session;
mod state;
mod upload;
mod view;

use anyhow::{Context, Result};
use api::{ensure_auth_any, Navigation};
use cli::{Args, Command};
use commands::Console;
use config::{Config, DEFAULT_CONFIG_FILE};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // No logging or API access needed
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    init_logging(&args);

    info!("cmsconsole v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args.command);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle `init-config`: generate a default .cmsconsole.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set the API base URL, session file and polling interval.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run one command. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    debug!("API base: {}", config.api.base_url);

    let mut console = Console::new(config, &args)?;

    match commands::dispatch(&mut console, args.command).await {
        Ok(code) => Ok(code),
        Err(e) => match ensure_auth_any(&e) {
            Some(Navigation::Login(page)) => {
                warn!("Session rejected by the API: {:#}", e);
                console.session.clear()?;
                eprintln!("🔒 세션이 만료되었습니다. 다시 로그인하세요. ({})", page);
                Ok(2)
            }
            None => Err(e),
        },
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionUser;
    use crate::session::SessionStore;
    use clap::Parser;
    use mockito::Server;
    use tempfile::TempDir;

    fn args_for(base_url: &str, dir: &std::path::Path, command: &str) -> Args {
        let session = dir.join("session.json");
        let output = dir.join("out.md");
        Args::try_parse_from([
            "cmsconsole",
            "--api-base",
            base_url,
            "--session-file",
            session.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "-q",
            command,
        ])
        .unwrap()
    }

    fn sign_in_admin(dir: &std::path::Path) {
        let mut session = SessionStore::hydrate(dir.join("session.json"));
        session.set(
            Some(SessionUser {
                id: Some(1),
                username: Some("admin".to_string()),
                role: Some("ADMIN".to_string()),
                ..Default::default()
            }),
            Some("JSESSIONID=stale".to_string()),
        );
        session.persist().unwrap();
    }

    #[tokio::test]
    async fn test_rejected_session_is_cleared() {
        let mut server = Server::new_async().await;
        let _dashboard = server
            .mock("GET", "/api/admin/dashboard")
            .with_status(401)
            .create_async()
            .await;
        let _unread = server
            .mock("GET", "/admin/api/notifications/unread-count")
            .with_status(401)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        sign_in_admin(dir.path());

        let code = run(args_for(&server.url(), dir.path(), "dashboard")).await.unwrap();
        assert_eq!(code, 2);
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_load_failure_exits_one_and_keeps_session() {
        let mut server = Server::new_async().await;
        let _dashboard = server
            .mock("GET", "/api/admin/dashboard")
            .with_status(500)
            .create_async()
            .await;
        let _unread = server
            .mock("GET", "/admin/api/notifications/unread-count")
            .with_status(200)
            .with_body(r#"{"count": 0}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        sign_in_admin(dir.path());

        let code = run(args_for(&server.url(), dir.path(), "dashboard")).await.unwrap();
        assert_eq!(code, 1);
        assert!(dir.path().join("session.json").exists());
        let rendered = std::fs::read_to_string(dir.path().join("out.md")).unwrap();
        assert!(rendered.contains("대시보드 데이터를 불러오지 못했습니다."));
    }

    #[tokio::test]
    async fn test_anonymous_admin_command_exits_two() {
        let dir = TempDir::new().unwrap();
        let code = run(args_for("http://127.0.0.1:9", dir.path(), "dashboard"))
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
