//! Admin endpoint bindings (`/api/admin/*`, `/admin/api/notifications*`).
//!
//! State-changing commands with no interesting response live in
//! [`crate::actions`]; this module covers reads and notice writes.

use crate::analysis::grafana_proxy_url;
use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::models::{
    AdminPost, AdminPostDetail, DashboardStats, MonitoringMetrics, Notice, NoticePayload,
    Notification, PostStatus, RekognitionLabel, ReportDetail, ReportStatus, ReportSummary,
    ReviewItem, ReviewItemDetail, S3Object, UnreadCount, UserDetail, UserSummary,
};

impl ApiClient {
    pub async fn dashboard(&self) -> Result<Option<DashboardStats>, ApiError> {
        self.get_json("/api/admin/dashboard").await
    }

    pub async fn review_items(&self) -> Result<Vec<ReviewItem>, ApiError> {
        self.get_list("/api/admin/review-items", &[]).await
    }

    pub async fn review_item(&self, id: i64) -> Result<Option<ReviewItemDetail>, ApiError> {
        self.get_json(&format!("/api/admin/review-items/{}", id))
            .await
    }

    pub async fn admin_posts(
        &self,
        status: Option<PostStatus>,
        author_id: Option<i64>,
    ) -> Result<Vec<AdminPost>, ApiError> {
        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(author_id) = author_id {
            query.push(("authorId", author_id.to_string()));
        }
        self.get_list("/api/admin/posts", &query).await
    }

    pub async fn admin_post(&self, id: i64) -> Result<Option<AdminPostDetail>, ApiError> {
        self.get_json(&format!("/api/admin/posts/{}", id)).await
    }

    pub async fn admin_notices(&self) -> Result<Vec<Notice>, ApiError> {
        self.get_list("/api/admin/notices", &[]).await
    }

    pub async fn admin_notice(&self, id: i64) -> Result<Option<Notice>, ApiError> {
        self.get_json(&format!("/api/admin/notices/{}", id)).await
    }

    pub async fn create_notice(&self, payload: &NoticePayload) -> Result<Option<Notice>, ApiError> {
        self.post_json("/api/admin/notices", payload).await
    }

    /// Updates use POST on the notice path.
    pub async fn update_notice(
        &self,
        id: i64,
        payload: &NoticePayload,
    ) -> Result<Option<Notice>, ApiError> {
        self.post_json(&format!("/api/admin/notices/{}", id), payload)
            .await
    }

    pub async fn users(&self) -> Result<Vec<UserSummary>, ApiError> {
        self.get_list("/api/admin/users", &[]).await
    }

    pub async fn user(&self, id: i64) -> Result<Option<UserDetail>, ApiError> {
        self.get_json(&format!("/api/admin/users/{}", id)).await
    }

    pub async fn reports(&self, status: Option<ReportStatus>) -> Result<Vec<ReportSummary>, ApiError> {
        let query: Vec<(&str, String)> = status
            .map(|s| vec![("status", s.as_str().to_string())])
            .unwrap_or_default();
        self.get_list("/api/admin/reports", &query).await
    }

    pub async fn report(&self, id: i64) -> Result<Option<ReportDetail>, ApiError> {
        self.get_json(&format!("/api/admin/reports/{}", id)).await
    }

    pub async fn monitoring_metrics(&self) -> Result<Option<MonitoringMetrics>, ApiError> {
        self.get_json("/api/admin/monitoring/metrics").await
    }

    pub async fn s3_objects(&self) -> Result<Vec<S3Object>, ApiError> {
        self.get_list("/api/admin/monitoring/s3", &[]).await
    }

    pub async fn rekognition_labels(&self, object_key: &str) -> Result<Vec<RekognitionLabel>, ApiError> {
        self.get_list(
            "/api/admin/monitoring/rekognition",
            &[("objectKey", object_key.to_string())],
        )
        .await
    }

    pub fn grafana_url(&self, path: &str, query: Option<&str>) -> String {
        grafana_proxy_url(self.base_url(), path, query)
    }

    pub async fn notifications(&self, limit: u32) -> Result<Vec<Notification>, ApiError> {
        self.get_list("/admin/api/notifications", &[("limit", limit.to_string())])
            .await
    }

    pub async fn unread_count(&self) -> Result<u64, ApiError> {
        Ok(self
            .get_json::<UnreadCount>("/admin/api/notifications/unread-count")
            .await?
            .map(|c| c.count)
            .unwrap_or(0))
    }
}
