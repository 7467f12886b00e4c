//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::filters::{ModerationField, NoticeField, PostField, ReportField};
use crate::models::{PostStatus, ReportStatus, ReportType};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// cmsconsole - moderation console and portal client for the CMS community
///
/// Review flagged content, manage posts, notices, users and reports, watch
/// admin notifications, and browse or post to the public portal.
///
/// Examples:
///   cmsconsole login -u admin
///   cmsconsole moderation list --keyword 이미지 --field detection
///   cmsconsole reports approve 12 --note "spam"
///   cmsconsole notifications watch
///   cmsconsole --format json portal board --sub-board free
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the community API
    ///
    /// Overrides `[api] base_url` from the configuration file.
    #[arg(long, value_name = "URL", env = "CMS_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .cmsconsole.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Write the rendered output to a file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Session cache file
    #[arg(long, value_name = "FILE", env = "CMS_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format for rendered screens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a default .cmsconsole.toml configuration file
    InitConfig,

    /// Sign in and cache the session
    Login {
        #[arg(short, long, env = "CMS_USERNAME")]
        username: String,

        #[arg(short, long, env = "CMS_PASSWORD", hide_env_values = true)]
        password: String,

        /// Accept accounts without the ADMIN role (portal use only)
        #[arg(long)]
        portal: bool,
    },

    /// Sign out and clear the cached session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Sign-up, email verification and account recovery
    #[command(subcommand)]
    Account(AccountCommand),

    /// Update the signed-in user's nickname
    Profile {
        #[arg(long)]
        nickname: String,
    },

    /// Admin dashboard: headline numbers, charts and system metrics
    Dashboard,

    /// Flagged content awaiting review
    #[command(subcommand)]
    Moderation(ModerationCommand),

    /// Post management
    #[command(subcommand)]
    Posts(PostsCommand),

    /// Notice management
    #[command(subcommand)]
    Notices(NoticesCommand),

    /// User management
    #[command(subcommand)]
    Users(UsersCommand),

    /// User reports
    #[command(subcommand)]
    Reports(ReportsCommand),

    /// Infrastructure monitoring
    #[command(subcommand)]
    Monitoring(MonitoringCommand),

    /// Admin notifications
    #[command(subcommand)]
    Notifications(NotificationsCommand),

    /// Public community portal
    #[command(subcommand)]
    Portal(PortalCommand),

    /// Upload local files through presigned URLs and print their public URLs
    Upload {
        /// Files or directories (uploaded recursively)
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Storage directory requested for the upload
        #[arg(long, default_value = "uploads")]
        directory: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AccountCommand {
    /// Create a portal account; a verification code is emailed
    Signup {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "CMS_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        nickname: String,

        #[arg(long)]
        email: String,

        /// Image uploaded as the profile picture
        #[arg(long, value_name = "FILE")]
        profile_picture: Option<PathBuf>,
    },
    /// Confirm the emailed verification code
    VerifyEmail {
        #[arg(short, long)]
        username: String,

        #[arg(long)]
        code: String,
    },
    /// Send the verification code again
    ResendCode {
        #[arg(short, long)]
        username: String,
    },
    /// Look up the username registered to an email address
    FindId {
        #[arg(long)]
        email: String,
    },
    /// Email a password reset code
    RequestResetCode {
        #[arg(short, long)]
        username: String,

        #[arg(long)]
        email: String,
    },
    /// Check a password reset code
    VerifyResetCode {
        #[arg(short, long)]
        username: String,

        #[arg(long)]
        code: String,
    },
    /// Set a new password with a reset code
    ResetPassword {
        #[arg(short, long)]
        username: String,

        #[arg(long)]
        code: String,

        #[arg(long)]
        new_password: String,

        #[arg(long)]
        confirm_password: String,
    },
    /// Change the signed-in user's password
    ChangePassword {
        #[arg(long)]
        current_password: String,

        #[arg(long)]
        new_password: String,

        #[arg(long)]
        confirm_password: String,
    },
    /// Delete the signed-in account
    Delete {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ModerationCommand {
    /// List flagged content, one row per post or comment
    List {
        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(long, value_enum, default_value_t = ModerationField::All)]
        field: ModerationField,
    },
    /// Show a review item merged with its sibling detections
    Show { id: i64 },
    /// Approve a review item
    Approve { id: i64 },
    /// Reject a review item
    Reject { id: i64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum PostsCommand {
    /// List posts
    List {
        #[arg(long, value_enum)]
        status: Option<PostStatus>,

        #[arg(long)]
        author_id: Option<i64>,

        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(long, value_enum, default_value_t = PostField::All)]
        field: PostField,
    },
    /// Show a post with its comments and moderation results
    Show { id: i64 },
    /// Publish a post
    Publish { id: i64 },
    /// Hide a post
    Hide { id: i64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum NoticesCommand {
    /// List notices
    List {
        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(long, value_enum, default_value_t = NoticeField::All)]
        field: NoticeField,
    },
    /// Show a notice
    Show { id: i64 },
    /// Create a notice
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        #[arg(long)]
        pinned: bool,

        /// Local file to upload and attach (repeatable)
        #[arg(long = "attach", value_name = "FILE")]
        attachments: Vec<PathBuf>,

        /// Already uploaded URL to attach (repeatable)
        #[arg(long = "attachment-url", value_name = "URL")]
        attachment_urls: Vec<String>,
    },
    /// Edit a notice; omitted fields keep their current value
    Edit {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        pinned: Option<bool>,

        #[arg(long = "attach", value_name = "FILE")]
        attachments: Vec<PathBuf>,

        #[arg(long = "attachment-url", value_name = "URL")]
        attachment_urls: Vec<String>,

        /// Drop the existing attachments
        #[arg(long)]
        clear_attachments: bool,
    },
    /// Pin a notice to the top
    Pin { id: i64 },
    /// Unpin a notice
    Unpin { id: i64 },
    /// Delete a notice
    Delete { id: i64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum UsersCommand {
    /// List users
    List,
    /// Show a user with activity counts
    Show { id: i64 },
    /// Send a warning to a user
    Warn {
        id: i64,
        #[arg(short, long)]
        message: String,
    },
    /// Block a user
    Block {
        id: i64,
        #[arg(short, long)]
        message: String,
    },
    /// Unblock a user
    Unblock { id: i64 },
    /// Delete a user
    Delete { id: i64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReportsCommand {
    /// List reports
    List {
        #[arg(long, value_enum)]
        status: Option<ReportStatus>,

        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(long, value_enum, default_value_t = ReportField::All)]
        field: ReportField,
    },
    /// Show a report
    Show { id: i64 },
    /// Accept a report and block the target
    Approve {
        id: i64,
        #[arg(short, long)]
        note: String,
    },
    /// Reject a report
    Reject {
        id: i64,
        #[arg(short, long)]
        note: String,
    },
    /// Block the reported target without closing the report
    Block {
        id: i64,
        #[arg(short, long)]
        note: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum MonitoringCommand {
    /// System metrics and recent S3 uploads
    Overview,
    /// Rekognition labels of an uploaded object
    Rekognition {
        #[arg(value_name = "OBJECT_KEY")]
        object_key: String,
    },
    /// Print the proxied Grafana URL
    Grafana {
        #[arg(default_value = "")]
        path: String,

        #[arg(long)]
        query: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum NotificationsCommand {
    /// List notifications, one entry per report or reviewed target
    List {
        /// Number of notifications fetched
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Mark a notification and the entries merged with it as read
    Read {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Mark every notification as read
    ReadAll,
    /// Poll notifications until interrupted
    Watch {
        /// Seconds between polls
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum PortalCommand {
    /// Boards with recent and popular posts
    Home,
    /// List posts of a board
    Board {
        #[arg(long)]
        sub_board: Option<String>,

        #[arg(long)]
        tab: Option<String>,

        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        size: u32,

        #[arg(long, default_value = "all")]
        search_type: String,

        #[arg(short, long)]
        keyword: Option<String>,
    },
    /// Show a post with its comment thread
    Post {
        id: i64,

        #[arg(long, default_value_t = 0)]
        comment_page: u32,
    },
    /// Comment on a post
    Comment {
        post_id: i64,

        #[arg(long)]
        content: String,

        /// Reply to this comment
        #[arg(long, value_name = "COMMENT_ID")]
        reply_to: Option<i64>,
    },
    /// Delete one of your comments
    Uncomment { id: i64 },
    /// List gallery posts
    Gallery {
        #[arg(long)]
        sub_board: Option<String>,

        #[arg(long)]
        tab: Option<String>,

        #[arg(long, default_value = "latest")]
        sort: String,

        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value = "all")]
        search_type: String,

        #[arg(short, long)]
        keyword: Option<String>,
    },
    /// Show a gallery post
    GalleryPost { id: i64 },
    /// List public notices
    Notices,
    /// Show a public notice
    Notice { id: i64 },
    /// Write a post
    Write {
        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        #[arg(long)]
        main_board: String,

        #[arg(long)]
        sub_board: String,

        #[arg(long, default_value = "")]
        tab: String,

        /// Local file to upload and attach (repeatable)
        #[arg(long = "file", value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// Delete one of your posts
    DeletePost { id: i64 },
    /// Recommend a post
    Vote { id: i64 },
    /// Recommend a gallery post
    GalleryVote { id: i64 },
    /// Report a post or comment
    Report {
        target_id: i64,

        #[arg(long = "type", value_enum)]
        kind: ReportType,

        #[arg(long)]
        reason: String,
    },
}

impl Command {
    /// Whether the command talks to `/api/admin` and needs the ADMIN role.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Command::Dashboard
                | Command::Moderation(_)
                | Command::Posts(_)
                | Command::Notices(_)
                | Command::Users(_)
                | Command::Reports(_)
                | Command::Monitoring(_)
                | Command::Notifications(_)
        )
    }

    /// Whether the command needs a cached session.
    pub fn requires_login(&self) -> bool {
        self.requires_admin()
            || matches!(
                self,
                Command::Profile { .. }
                    | Command::Upload { .. }
                    | Command::Account(
                        AccountCommand::ChangePassword { .. } | AccountCommand::Delete { .. }
                    )
                    | Command::Portal(
                        PortalCommand::Comment { .. }
                            | PortalCommand::Uncomment { .. }
                            | PortalCommand::Write { .. }
                            | PortalCommand::DeletePost { .. }
                            | PortalCommand::Vote { .. }
                            | PortalCommand::GalleryVote { .. }
                            | PortalCommand::Report { .. }
                    )
            )
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref base) = self.api_base {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err("API base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        match &self.command {
            Command::Notifications(NotificationsCommand::Watch {
                interval: Some(0), ..
            }) => Err("Poll interval must be at least 1 second".to_string()),
            Command::Notifications(NotificationsCommand::List { limit: Some(0) }) => {
                Err("Limit must be at least 1".to_string())
            }
            Command::Portal(PortalCommand::Board { size: 0, .. }) => {
                Err("Page size must be at least 1".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
