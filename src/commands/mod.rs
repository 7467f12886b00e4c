//! Command handlers.
//!
//! Every handler builds a [`Page`] from API data; [`dispatch`] checks the
//! cached session, runs the handler and writes the rendered page.

mod account;
mod admin;
mod portal;

use crate::actions::{ActionExecutor, AdminAction};
use crate::api::error::DEFAULT_FAILURE_MESSAGE;
use crate::api::{ApiClient, ApiError};
use crate::cli::{Args, Command, NotificationsCommand};
use crate::config::Config;
use crate::models::{Credentials, SessionUser};
use crate::session::SessionStore;
use crate::state::AppState;
use crate::upload::{collect_upload_files, upload_files};
use crate::view::{self, admin::message_page, admin::uploads_page, admin::user_page, Page};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Everything a command needs: configuration, API client, session and
/// fetched state.
pub struct Console {
    pub config: Config,
    pub client: ApiClient,
    pub session: SessionStore,
    pub state: AppState,
    output: Option<PathBuf>,
    show_progress: bool,
    failed: bool,
}

impl Console {
    pub fn new(config: Config, args: &Args) -> Result<Self> {
        let session = SessionStore::hydrate(config.session.path.clone());
        let client = ApiClient::new(&config.api)
            .context("Failed to create HTTP client")?
            .with_cookie(session.cookie().map(str::to_string));
        let state = AppState::new(session.user().cloned());

        Ok(Self {
            config,
            client,
            session,
            state,
            output: args.output.clone(),
            show_progress: !args.quiet,
            failed: false,
        })
    }

    /// Render a page to stdout or the `--output` file.
    pub fn emit(&self, page: &Page) -> Result<()> {
        let rendered = view::render(page, self.config.output.format)?;

        match self.output {
            Some(ref path) => {
                std::fs::write(path, &rendered)
                    .with_context(|| format!("Failed to write output to {}", path.display()))?;
                info!("Output written to {}", path.display());
            }
            None => {
                print!("{}", rendered);
                if !rendered.ends_with('\n') {
                    println!();
                }
            }
        }
        Ok(())
    }

    /// Run admin actions and report them on one page. Any failed action makes
    /// the command exit with 1.
    async fn run_actions(&mut self, title: &str, actions: &[AdminAction]) -> Result<Page> {
        let results = ActionExecutor::new(&self.client)
            .execute_all(actions)
            .await?;
        if results.iter().any(|r| !r.success) {
            self.failed = true;
        }
        Ok(view::admin::action_page(title, &results))
    }

    /// Page shown in place of a screen whose data failed to load.
    ///
    /// Authentication failures are passed on so the session gets cleared.
    /// Anything else is rendered as a message and the command exits with 1.
    fn load_failed(&mut self, title: &str, fallback: &str, err: ApiError) -> Result<Page> {
        if err.is_unauthorized() {
            return Err(err.into());
        }
        warn!("{}: {}", fallback, err);
        self.failed = true;
        Ok(message_page(title, &load_failure_message(&err, fallback)))
    }

    /// Store the signed-in user (and a fresh cookie, if any) in the session
    /// file.
    fn remember_user(&mut self, user: Option<SessionUser>, cookie: Option<String>) -> Result<()> {
        if cookie.is_some() {
            self.client.set_cookie(cookie.clone());
        }
        self.session.set(user.clone(), cookie);
        self.state.user = user;
        self.session.persist()
    }

    async fn upload_attachments(&self, paths: &[PathBuf], directory: &str) -> Result<Vec<String>> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        let files = collect_upload_files(paths)?;
        let uploaded = upload_files(&self.client, &files, directory, self.show_progress).await?;
        Ok(uploaded.into_iter().map(|f| f.url).collect())
    }
}

/// The server's message when it sent one, the screen's fallback otherwise.
fn load_failure_message(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Status { message, .. } if message != DEFAULT_FAILURE_MESSAGE => message.clone(),
        ApiError::Status { .. } => fallback.to_string(),
        other => format!("{} ({})", fallback, other),
    }
}

enum Access {
    Granted,
    LoginRequired,
    AdminRequired,
}

fn check_access(command: &Command, state: &AppState) -> Access {
    if !command.requires_login() {
        return Access::Granted;
    }
    match state.user {
        None => Access::LoginRequired,
        Some(_) if command.requires_admin() && !state.is_admin() => Access::AdminRequired,
        Some(_) => Access::Granted,
    }
}

/// Run one command. Returns the process exit code.
pub async fn dispatch(console: &mut Console, command: Command) -> Result<i32> {
    match check_access(&command, &console.state) {
        Access::Granted => {}
        Access::LoginRequired => {
            eprintln!("🔒 로그인이 필요합니다. `cmsconsole login`을 먼저 실행하세요.");
            return Ok(2);
        }
        Access::AdminRequired => {
            eprintln!("🔒 관리자 권한이 없습니다.");
            return Ok(2);
        }
    }

    let page = match command {
        // Handled before the console is built.
        Command::InitConfig => return Ok(0),
        Command::Login {
            username,
            password,
            portal,
        } => return login(console, username, password, portal).await,
        Command::Logout => logout(console).await?,
        Command::Whoami => match whoami(console).await? {
            Some(page) => page,
            None => {
                eprintln!("🔒 로그인이 필요합니다. `cmsconsole login`을 먼저 실행하세요.");
                return Ok(2);
            }
        },
        Command::Profile { nickname } => profile(console, &nickname).await?,
        Command::Account(cmd) => account::account(console, cmd).await?,
        Command::Dashboard => admin::dashboard(console).await?,
        Command::Moderation(cmd) => admin::moderation(console, cmd).await?,
        Command::Posts(cmd) => admin::posts(console, cmd).await?,
        Command::Notices(cmd) => admin::notices(console, cmd).await?,
        Command::Users(cmd) => admin::users(console, cmd).await?,
        Command::Reports(cmd) => admin::reports(console, cmd).await?,
        Command::Monitoring(cmd) => admin::monitoring(console, cmd).await?,
        Command::Notifications(NotificationsCommand::Watch { interval }) => {
            return admin::watch_notifications(console, interval).await;
        }
        Command::Notifications(cmd) => admin::notifications(console, cmd).await?,
        Command::Portal(cmd) => portal::portal(console, cmd).await?,
        Command::Upload { paths, directory } => upload(console, &paths, &directory).await?,
    };

    console.emit(&page)?;
    Ok(if console.failed { 1 } else { 0 })
}

async fn login(console: &mut Console, username: String, password: String, portal: bool) -> Result<i32> {
    let credentials = Credentials { username, password };

    let outcome = match console.client.login(&credentials).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Login failed: {}", e);
            eprintln!("❌ 로그인에 실패했습니다. {}", e);
            return Ok(1);
        }
    };

    if outcome.cookie.is_some() {
        console.client.set_cookie(outcome.cookie.clone());
    }
    let user = match outcome.user {
        Some(user) => Some(user),
        None => {
            debug!("Login returned no user, asking /api/auth/me");
            console.client.me().await?
        }
    };

    let Some(user) = user else {
        eprintln!("❌ 로그인에 실패했습니다.");
        return Ok(1);
    };

    if !portal && !user.is_admin() {
        eprintln!("🔒 관리자 권한이 없습니다.");
        return Ok(2);
    }

    console.remember_user(Some(user.clone()), outcome.cookie)?;
    info!("Logged in as {}", user.display_name("사용자"));
    console.emit(&user_page("로그인", &user))?;
    Ok(0)
}

async fn logout(console: &mut Console) -> Result<Page> {
    if console.client.cookie().is_some() {
        if let Err(e) = console.client.logout().await {
            warn!("Logout request failed: {}", e);
        }
    }
    console.session.clear()?;
    console.state.user = None;
    debug!("Session removed: {}", console.session.path().display());
    Ok(message_page("로그아웃", "로그아웃되었습니다."))
}

/// The signed-in user, refreshed from the API when the session is still
/// valid. `None` when nobody is signed in.
async fn whoami(console: &mut Console) -> Result<Option<Page>> {
    if console.session.cookie().is_none() && console.session.user().is_none() {
        return Ok(None);
    }

    match console.client.me().await? {
        Some(user) => {
            console.remember_user(Some(user.clone()), None)?;
            Ok(Some(user_page("내 정보", &user)))
        }
        None => Ok(console.state.user.as_ref().map(|u| user_page("내 정보", u))),
    }
}

async fn profile(console: &mut Console, nickname: &str) -> Result<Page> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        anyhow::bail!("닉네임을 입력하세요.");
    }

    let updated = console
        .client
        .update_profile(nickname)
        .await
        .context("프로필 저장에 실패했습니다.")?;

    let user = match updated {
        Some(user) => user,
        None => {
            let mut user = console.state.user.clone().unwrap_or_default();
            user.nickname = Some(nickname.to_string());
            user
        }
    };
    console.remember_user(Some(user.clone()), None)?;

    Ok(user_page("프로필이 저장되었습니다.", &user))
}

async fn upload(console: &Console, paths: &[PathBuf], directory: &str) -> Result<Page> {
    let files = collect_upload_files(paths)?;
    let uploaded = upload_files(&console.client, &files, directory, console.show_progress).await?;
    Ok(uploads_page(&uploaded))
}

/// Console wired to a mock API, with its session file and output under
/// `dir`.
#[cfg(test)]
pub(crate) fn test_console(base_url: &str, dir: &std::path::Path, user: Option<SessionUser>) -> Console {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_seconds = 5;
    config.session.path = dir.join("session.json");

    let mut session = SessionStore::hydrate(config.session.path.clone());
    session.set(user.clone(), Some("JSESSIONID=test".to_string()));
    session.persist().unwrap();

    Console {
        client: ApiClient::new(&config.api)
            .unwrap()
            .with_cookie(Some("JSESSIONID=test".to_string())),
        session,
        state: AppState::new(user),
        output: Some(dir.join("out.md")),
        show_progress: false,
        failed: false,
        config,
    }
}

#[cfg(test)]
pub(crate) fn admin_user() -> SessionUser {
    SessionUser {
        id: Some(1),
        username: Some("admin".to_string()),
        role: Some("ADMIN".to_string()),
        ..Default::default()
    }
}
