//! Data models for the community API.
//!
//! This module contains the record types returned by every endpoint the
//! console talks to, the request payloads it sends, and the aggregated
//! display records built from them. Every wire field is optional or
//! defaulted so that malformed records degrade to placeholders instead of
//! failing deserialization.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parse an API timestamp.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.fff]` (the backend's local
/// date-time form) and RFC 3339. Returns `None` for anything else.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Returns the value if it is present and not blank.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    Published,
    Hidden,
    Reported,
    Removed,
}

impl PostStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Published => "PUBLISHED",
            PostStatus::Hidden => "HIDDEN",
            PostStatus::Reported => "REPORTED",
            PostStatus::Removed => "REMOVED",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Processing status of a user report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    ActionTaken,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "PENDING",
            ReportStatus::ActionTaken => "ACTION_TAKEN",
            ReportStatus::Rejected => "REJECTED",
        }
    }
}

/// What a user report points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    Post,
    Comment,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Post => "POST",
            ReportType::Comment => "COMMENT",
        }
    }
}

/// Kind of an admin notification.
///
/// Only `REPORT` changes behavior (grouping and navigation); every other
/// type is a moderation detection event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotificationType {
    Report,
    Other(String),
}

impl From<&str> for NotificationType {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "REPORT" => NotificationType::Report,
            other => NotificationType::Other(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

/// A flagged post, comment or media record awaiting review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewItem {
    pub id: i64,
    pub content_type: Option<String>,
    pub detection_type: Option<String>,
    pub detection_component: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content_url: Option<String>,
    pub moderation_result: Option<String>,
    pub inappropriate_detected: bool,
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub author_name: Option<String>,
    pub main_board_name: Option<String>,
    pub sub_board_name: Option<String>,
    pub created_at: Option<String>,
    pub reviewed_at: Option<String>,
    pub review_status: Option<String>,
}

/// Post summary embedded in a review item detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostInfo {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(alias = "authorUsername")]
    pub author_name: Option<String>,
    pub author_id: Option<i64>,
    pub created_at: Option<String>,
    pub main_board_name: Option<String>,
    pub sub_board_name: Option<String>,
    pub file_urls: Vec<String>,
}

/// Comment summary embedded in a review item or report detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentInfo {
    pub id: Option<i64>,
    pub content: Option<String>,
    #[serde(alias = "authorUsername")]
    pub author_name: Option<String>,
    pub author_id: Option<i64>,
    pub created_at: Option<String>,
}

/// Full record of a single review item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewItemDetail {
    pub id: i64,
    pub content_type: Option<String>,
    pub detection_type: Option<String>,
    pub detection_component: Option<String>,
    pub detection_labels: Vec<String>,
    pub content_url: Option<String>,
    pub moderated_text: Option<String>,
    pub moderation_result: Option<String>,
    pub inappropriate_detected: bool,
    pub review_status: Option<String>,
    pub created_at: Option<String>,
    pub reviewed_at: Option<String>,
    pub post: Option<PostInfo>,
    pub comment: Option<CommentInfo>,
}

/// One display row per flagged post, comment or standalone item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedModerationItem {
    #[serde(flatten)]
    pub item: ReviewItem,
    pub group_key: String,
    /// Review item opened from this row (prefers the one carrying media).
    pub detail_id: i64,
    pub detection_labels: Vec<String>,
    pub detection_summary: String,
}

/// A review item detail merged with its sibling records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDetail {
    #[serde(flatten)]
    pub detail: ReviewItemDetail,
    pub detection_summary: String,
    pub raw_labels: Vec<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub title_texts: Vec<String>,
    pub body_texts: Vec<String>,
    pub flagged_media_urls: Vec<String>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// An admin notification about a report or a detection event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    pub target_id: Option<i64>,
    pub read: bool,
    pub created_at: Option<String>,
    pub link: Option<String>,
    pub target_label: Option<String>,
    pub author_label: Option<String>,
    pub board_label: Option<String>,
    pub summary: Option<String>,
    pub main_board_name: Option<String>,
    pub sub_board_name: Option<String>,
    pub reporter_label: Option<String>,
    pub detection_label: Option<String>,
}

impl Notification {
    pub fn kind(&self) -> NotificationType {
        NotificationType::from(self.kind.as_deref().unwrap_or(""))
    }
}

/// One display entry per report or reviewed target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedNotification {
    #[serde(flatten)]
    pub notification: Notification,
    pub group_key: String,
    /// Ids of every merged notification, in input order.
    pub ids: Vec<i64>,
    pub detection_labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnreadCount {
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Dashboard and monitoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailySignup {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemMetricPoint {
    pub timestamp: Option<String>,
    pub cpu_usage_percent: f64,
    pub memory_usage_mb: f64,
    pub request_count: f64,
    pub error_rate_percent: f64,
}

/// Headline numbers and chart series of the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users: u64,
    pub blocked_users: u64,
    pub harmful_posts: u64,
    pub daily_signups: Vec<DailySignup>,
    pub category_distribution: Vec<LabelCount>,
    pub detection_counts: Vec<LabelCount>,
    pub system_metrics: Vec<SystemMetricPoint>,
    pub latest_metrics: Option<MonitoringMetrics>,
    pub s3_objects: Vec<S3Object>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitoringMetrics {
    pub cpu_usage: f64,
    pub memory_usage_bytes: f64,
    pub request_count: f64,
    pub error_rate: f64,
    pub harmful_posts_today: i64,
    pub ec2_status: Option<String>,
    pub rds_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct S3Object {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RekognitionLabel {
    #[serde(alias = "label")]
    pub name: String,
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// Posts, notices, users, reports (admin side)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminPost {
    pub id: i64,
    pub title: Option<String>,
    pub author: Option<String>,
    pub main_board_name: Option<String>,
    pub sub_board_name: Option<String>,
    pub status: Option<String>,
    pub moderation_status: Option<String>,
    pub blocked: bool,
    pub harmful: bool,
    pub created_at: Option<String>,
    pub reported_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminCommentView {
    pub id: i64,
    pub author_id: Option<i64>,
    pub author_username: Option<String>,
    pub content: Option<String>,
    pub blocked: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageModerationView {
    pub image_url: Option<String>,
    pub inappropriate_detected: bool,
    pub moderation_result: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminPostDetail {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub main_board_name: Option<String>,
    pub sub_board_name: Option<String>,
    pub tab_item: Option<String>,
    pub status: Option<String>,
    pub moderation_status: Option<String>,
    pub blocked: bool,
    pub harmful: bool,
    pub published_after_harmful: bool,
    pub created_at: Option<String>,
    pub view_count: i64,
    pub author_id: Option<i64>,
    pub author_username: Option<String>,
    pub file_urls: Vec<String>,
    pub comments: Vec<AdminCommentView>,
    pub image_moderations: Vec<ImageModerationView>,
    pub text_moderation: Option<serde_json::Value>,
    pub video_moderation: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notice {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pinned: bool,
    pub attachment_urls: Vec<String>,
}

/// Body of a notice create or update request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticePayload {
    pub title: String,
    pub content: String,
    pub pinned: bool,
    pub attachment_urls: Vec<String>,
}

impl From<&Notice> for NoticePayload {
    fn from(notice: &Notice) -> Self {
        Self {
            title: notice.title.clone().unwrap_or_default(),
            content: notice.content.clone().unwrap_or_default(),
            pinned: notice.pinned,
            attachment_urls: notice.attachment_urls.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSummary {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub status: Option<String>,
    pub enabled: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDetail {
    pub id: i64,
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub enabled: bool,
    pub warn_count: Option<i64>,
    pub created_at: Option<String>,
    pub last_sanction_at: Option<String>,
    pub suspended_at: Option<String>,
    pub profile_picture_url: Option<String>,
    pub post_count: i64,
    pub comment_count: i64,
    pub report_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSummary {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub target_id: Option<i64>,
    pub reporter_name: Option<String>,
    pub author_name: Option<String>,
    pub main_board_name: Option<String>,
    pub sub_board_name: Option<String>,
    pub reason: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportDetail {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub action: Option<String>,
    pub reason: Option<String>,
    pub admin_note: Option<String>,
    pub created_at: Option<String>,
    pub processed_at: Option<String>,
    pub reporter_name: Option<String>,
    pub reporter_username: Option<String>,
    pub post: Option<PostInfo>,
    pub comment: Option<CommentInfo>,
}

// ---------------------------------------------------------------------------
// Session and portal
// ---------------------------------------------------------------------------

/// The authenticated user as returned by `/api/auth/me` and login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionUser {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub warn_count: Option<i64>,
    pub created_at: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl SessionUser {
    /// Name shown in headers: nickname, then username, then the fallback.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_empty(&self.nickname)
            .or_else(|| non_empty(&self.username))
            .unwrap_or(fallback)
    }

    /// Single upper-cased initial used for the avatar.
    pub fn initial(&self) -> String {
        self.display_name("U")
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "U".to_string())
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("ADMIN")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardSection {
    pub name: String,
    pub display_name: Option<String>,
    pub sub_boards: Vec<String>,
}

/// A post as seen from the public portal (board row, detail or gallery card).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortalPost {
    pub id: i64,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author_username: Option<String>,
    pub author_nickname: Option<String>,
    pub main_board_name: Option<String>,
    pub sub_board_name: Option<String>,
    pub tab_item: Option<String>,
    pub created_at: Option<String>,
    pub view_count: i64,
    pub vote_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub blocked: bool,
    pub harmful: bool,
    pub moderation_status: Option<String>,
    pub file_urls: Vec<String>,
    pub thumbnail_urls: Vec<String>,
}

impl PortalPost {
    pub fn author_label(&self) -> &str {
        non_empty(&self.author_nickname)
            .or_else(|| non_empty(&self.author_username))
            .unwrap_or("익명")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeResponse {
    pub boards: Vec<BoardSection>,
    pub recent_posts: Vec<PortalPost>,
    pub popular_posts: Vec<PortalPost>,
}

/// One page of a paged listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(alias = "number")]
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub total_elements: Option<u64>,
    pub total_pages: Option<u32>,
    pub last: bool,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            page: None,
            size: None,
            total_elements: None,
            total_pages: None,
            last: true,
        }
    }
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        !self.last
    }

    /// Total count, falling back to the number of records on this page.
    pub fn total(&self) -> u64 {
        self.total_elements.unwrap_or(self.content.len() as u64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub id: i64,
    pub content: Option<String>,
    pub author_username: Option<String>,
    pub author_nickname: Option<String>,
    pub parent_id: Option<i64>,
    pub created_at: Option<String>,
    pub status: Option<String>,
}

impl Comment {
    pub fn author_label(&self) -> &str {
        non_empty(&self.author_nickname)
            .or_else(|| non_empty(&self.author_username))
            .unwrap_or("익명")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    pub main_board_name: String,
    pub sub_board_name: String,
    pub tab_item: String,
    pub file_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub target_id: i64,
    #[serde(rename = "type")]
    pub kind: ReportType,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignRequest {
    pub directory: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresignedUpload {
    pub upload_url: String,
    pub public_url: String,
    pub key: Option<String>,
    pub expires_at: Option<String>,
}

// ============================================================================
// Account recovery and management
// ============================================================================

/// Sign-up form fields. Sent as multipart together with an optional
/// profile picture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyEmailRequest {
    pub username: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResendVerificationRequest {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindIdRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordResetCodeRequest {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordResetVerifyRequest {
    pub username: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub username: String,
    pub verification_code: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// `{ "message": ... }` answer of the account endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageResponse {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindIdResponse {
    pub username: Option<String>,
}
