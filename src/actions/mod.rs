//! State-changing admin commands.
//!
//! [`AdminAction`] is the closed set of commands the console can issue.
//! Mapping a command to its request is pure; [`ActionExecutor`] performs it
//! and folds ordinary failures into an [`ActionResult`]. Authentication
//! failures are returned as errors so the caller can send the user to the
//! login page.

use crate::api::{ApiClient, ApiError};
use crate::models::{AggregatedNotification, PostStatus};
use futures::future::join_all;
use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// An admin command.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    ApproveReviewItem(i64),
    RejectReviewItem(i64),
    SetPostStatus { id: i64, status: PostStatus },
    PinNotice { id: i64, pinned: bool },
    DeleteNotice(i64),
    WarnUser { id: i64, message: String },
    BlockUser { id: i64, message: String },
    UnblockUser(i64),
    DeleteUser(i64),
    ApproveReport { id: i64, note: String },
    RejectReport { id: i64, note: String },
    BlockReportTarget { id: i64, note: String },
    MarkNotificationRead(i64),
    MarkAllNotificationsRead,
}

impl AdminAction {
    /// Method, path and JSON body of the request for this command.
    pub fn request(&self) -> (Method, String, Option<Value>) {
        match self {
            AdminAction::ApproveReviewItem(id) => (
                Method::POST,
                format!("/api/admin/review-items/{}/approve", id),
                None,
            ),
            AdminAction::RejectReviewItem(id) => (
                Method::POST,
                format!("/api/admin/review-items/{}/reject", id),
                None,
            ),
            AdminAction::SetPostStatus { id, status } => (
                Method::POST,
                format!("/api/admin/posts/{}/status", id),
                Some(json!({ "status": status.as_str() })),
            ),
            AdminAction::PinNotice { id, pinned } => (
                Method::POST,
                format!("/api/admin/notices/{}/pin?pinned={}", id, pinned),
                None,
            ),
            AdminAction::DeleteNotice(id) => {
                (Method::DELETE, format!("/api/admin/notices/{}", id), None)
            }
            AdminAction::WarnUser { id, message } => (
                Method::POST,
                format!("/api/admin/users/{}/warn", id),
                Some(json!({ "message": message })),
            ),
            AdminAction::BlockUser { id, message } => (
                Method::POST,
                format!("/api/admin/users/{}/block", id),
                Some(json!({ "message": message })),
            ),
            AdminAction::UnblockUser(id) => (
                Method::POST,
                format!("/api/admin/users/{}/unblock", id),
                None,
            ),
            AdminAction::DeleteUser(id) => {
                (Method::DELETE, format!("/api/admin/users/{}", id), None)
            }
            AdminAction::ApproveReport { id, note } => (
                Method::POST,
                format!("/api/admin/reports/{}/approve", id),
                Some(json!({ "note": note })),
            ),
            AdminAction::RejectReport { id, note } => (
                Method::POST,
                format!("/api/admin/reports/{}/reject", id),
                Some(json!({ "note": note })),
            ),
            AdminAction::BlockReportTarget { id, note } => (
                Method::POST,
                format!("/api/admin/reports/{}/block", id),
                Some(json!({ "note": note })),
            ),
            AdminAction::MarkNotificationRead(id) => (
                Method::POST,
                format!("/admin/api/notifications/{}/read", id),
                None,
            ),
            AdminAction::MarkAllNotificationsRead => (
                Method::POST,
                "/admin/api/notifications/read-all".to_string(),
                None,
            ),
        }
    }

    /// Status message shown after the command succeeded.
    pub fn success_message(&self) -> &'static str {
        match self {
            AdminAction::ApproveReviewItem(_) | AdminAction::RejectReviewItem(_) => {
                "처리가 완료되었습니다."
            }
            AdminAction::SetPostStatus {
                status: PostStatus::Published,
                ..
            } => "게시글을 승인했습니다.",
            AdminAction::SetPostStatus { .. } => "게시글을 숨김 처리했습니다.",
            AdminAction::PinNotice { pinned: true, .. } => "공지를 상단에 고정했습니다.",
            AdminAction::PinNotice { pinned: false, .. } => "공지 고정을 해제했습니다.",
            AdminAction::DeleteNotice(_) => "삭제되었습니다.",
            AdminAction::WarnUser { .. } => "경고를 발송했습니다.",
            AdminAction::BlockUser { .. } => "사용자를 차단했습니다.",
            AdminAction::UnblockUser(_) => "차단을 해제했습니다.",
            AdminAction::DeleteUser(_) => "사용자가 삭제되었습니다.",
            AdminAction::ApproveReport { .. } => "신고를 승인(차단)했습니다.",
            AdminAction::RejectReport { .. } => "신고를 반려했습니다.",
            AdminAction::BlockReportTarget { .. } => "신고 대상을 차단했습니다.",
            AdminAction::MarkNotificationRead(_) => "알림을 읽음 처리했습니다.",
            AdminAction::MarkAllNotificationsRead => "모든 알림을 읽음 처리했습니다.",
        }
    }
}

/// Outcome of one admin command.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Response body, when the API returned one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl ActionResult {
    pub fn success(message: String, response: Option<Value>) -> Self {
        Self {
            success: true,
            message,
            error: None,
            response,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: String::new(),
            error: Some(message),
            response: None,
        }
    }
}

/// Runs admin commands against the API.
pub struct ActionExecutor<'a> {
    client: &'a ApiClient,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute a command.
    ///
    /// Returns `Err` only for authentication failures; every other failure
    /// becomes an unsuccessful [`ActionResult`].
    pub async fn execute(&self, action: &AdminAction) -> Result<ActionResult, ApiError> {
        let (method, path, body) = action.request();
        debug!("Executing action {:?}", action);

        match self
            .client
            .request::<Value>(method, &path, &[], body.as_ref())
            .await
        {
            Ok(response) => {
                info!("{}", action.success_message());
                Ok(ActionResult::success(
                    action.success_message().to_string(),
                    response,
                ))
            }
            Err(e) if e.is_unauthorized() => Err(e),
            Err(e) => {
                warn!("Action failed (status {:?}): {}", e.status(), e);
                Ok(ActionResult::error(e.to_string()))
            }
        }
    }

    /// Execute several commands concurrently, keeping their order.
    pub async fn execute_all(&self, actions: &[AdminAction]) -> Result<Vec<ActionResult>, ApiError> {
        join_all(actions.iter().map(|action| self.execute(action)))
            .await
            .into_iter()
            .collect()
    }

    /// Mark an aggregated notification read: one request per merged id.
    pub async fn mark_read(&self, notification: &AggregatedNotification) -> Result<ActionResult, ApiError> {
        let actions: Vec<AdminAction> = notification
            .ids
            .iter()
            .map(|id| AdminAction::MarkNotificationRead(*id))
            .collect();

        let results = self.execute_all(&actions).await?;
        let failures: Vec<String> = results
            .into_iter()
            .filter_map(|result| result.error)
            .collect();

        if failures.is_empty() {
            Ok(ActionResult::success(
                AdminAction::MarkNotificationRead(notification.notification.id)
                    .success_message()
                    .to_string(),
                None,
            ))
        } else {
            Ok(ActionResult::error(failures.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate_notifications;
    use crate::config::ApiConfig;
    use crate::models::Notification;
    use mockito::{Matcher, Server};

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: server.url(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_request_paths() {
        let cases = vec![
            (
                AdminAction::ApproveReviewItem(1),
                Method::POST,
                "/api/admin/review-items/1/approve",
            ),
            (
                AdminAction::RejectReviewItem(1),
                Method::POST,
                "/api/admin/review-items/1/reject",
            ),
            (
                AdminAction::PinNotice { id: 4, pinned: false },
                Method::POST,
                "/api/admin/notices/4/pin?pinned=false",
            ),
            (
                AdminAction::DeleteNotice(4),
                Method::DELETE,
                "/api/admin/notices/4",
            ),
            (
                AdminAction::UnblockUser(9),
                Method::POST,
                "/api/admin/users/9/unblock",
            ),
            (
                AdminAction::DeleteUser(9),
                Method::DELETE,
                "/api/admin/users/9",
            ),
            (
                AdminAction::MarkNotificationRead(3),
                Method::POST,
                "/admin/api/notifications/3/read",
            ),
            (
                AdminAction::MarkAllNotificationsRead,
                Method::POST,
                "/admin/api/notifications/read-all",
            ),
        ];

        for (action, method, path) in cases {
            let (m, p, body) = action.request();
            assert_eq!(m, method);
            assert_eq!(p, path);
            assert!(body.is_none());
        }
    }

    #[test]
    fn test_request_bodies() {
        let (_, path, body) = AdminAction::SetPostStatus {
            id: 2,
            status: PostStatus::Hidden,
        }
        .request();
        assert_eq!(path, "/api/admin/posts/2/status");
        assert_eq!(body, Some(json!({"status": "HIDDEN"})));

        let (_, path, body) = AdminAction::WarnUser {
            id: 5,
            message: "주의".to_string(),
        }
        .request();
        assert_eq!(path, "/api/admin/users/5/warn");
        assert_eq!(body, Some(json!({"message": "주의"})));

        let (_, path, body) = AdminAction::BlockReportTarget {
            id: 6,
            note: "abuse".to_string(),
        }
        .request();
        assert_eq!(path, "/api/admin/reports/6/block");
        assert_eq!(body, Some(json!({"note": "abuse"})));
    }

    #[test]
    fn test_success_messages() {
        assert_eq!(
            AdminAction::SetPostStatus {
                id: 1,
                status: PostStatus::Published
            }
            .success_message(),
            "게시글을 승인했습니다."
        );
        assert_eq!(
            AdminAction::RejectReport {
                id: 1,
                note: String::new()
            }
            .success_message(),
            "신고를 반려했습니다."
        );
    }

    #[tokio::test]
    async fn test_execute_success_and_failure() {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("POST", "/api/admin/review-items/1/approve")
            .with_status(200)
            .create_async()
            .await;
        let _fail = server
            .mock("POST", "/api/admin/review-items/2/approve")
            .with_status(409)
            .with_body("이미 처리된 항목입니다.")
            .create_async()
            .await;

        let client = client_for(&server);
        let executor = ActionExecutor::new(&client);

        let ok = executor
            .execute(&AdminAction::ApproveReviewItem(1))
            .await
            .unwrap();
        assert!(ok.success);
        assert_eq!(ok.message, "처리가 완료되었습니다.");

        let failed = executor
            .execute(&AdminAction::ApproveReviewItem(2))
            .await
            .unwrap();
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("이미 처리된 항목입니다."));
    }

    #[tokio::test]
    async fn test_execute_propagates_auth_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/api/admin/users/3")
            .with_status(401)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = ActionExecutor::new(&client)
            .execute(&AdminAction::DeleteUser(3))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_pin_query_reaches_server() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/admin/notices/4/pin")
            .match_query(Matcher::UrlEncoded("pinned".into(), "true".into()))
            .with_status(200)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = ActionExecutor::new(&client)
            .execute(&AdminAction::PinNotice { id: 4, pinned: true })
            .await
            .unwrap();
        mock.assert_async().await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_mark_read_hits_every_merged_id() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("POST", "/admin/api/notifications/1/read")
            .with_status(204)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/admin/api/notifications/2/read")
            .with_status(204)
            .create_async()
            .await;

        let merged = aggregate_notifications(&[
            Notification {
                id: 1,
                kind: Some("CONTENT_WARNING".to_string()),
                target_id: Some(10),
                ..Default::default()
            },
            Notification {
                id: 2,
                kind: Some("CONTENT_WARNING".to_string()),
                target_id: Some(10),
                ..Default::default()
            },
        ]);
        assert_eq!(merged.len(), 1);

        let client = client_for(&server);
        let result = ActionExecutor::new(&client)
            .mark_read(&merged[0])
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert!(result.success);
    }
}
