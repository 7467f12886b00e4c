//! Session and public portal endpoint bindings.

use crate::api::client::{cookie_from_headers, decode_body, ApiClient};
use crate::api::error::ApiError;
use crate::models::{
    Comment, CommentPayload, Credentials, HomeResponse, Notice, Page, PortalPost, PostPayload,
    PresignRequest, PresignedUpload, ReportPayload, SessionUser,
};
use reqwest::Method;
use serde_json::{json, Value};

/// Result of a successful login call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginOutcome {
    pub user: Option<SessionUser>,
    /// Session cookie set by the API, ready for a `Cookie` header.
    pub cookie: Option<String>,
}

/// Query of the board listing.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardQuery {
    pub sub_board: Option<String>,
    pub tab: Option<String>,
    pub page: u32,
    pub size: u32,
    pub search_type: String,
    pub keyword: Option<String>,
}

impl Default for BoardQuery {
    fn default() -> Self {
        Self {
            sub_board: None,
            tab: None,
            page: 0,
            size: 20,
            search_type: "all".to_string(),
            keyword: None,
        }
    }
}

impl BoardQuery {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("searchType", self.search_type.clone()),
        ];
        if let Some(ref sub_board) = self.sub_board {
            query.push(("subBoard", sub_board.clone()));
        }
        if let Some(ref keyword) = self.keyword {
            query.push(("kw", keyword.clone()));
        }
        if let Some(ref tab) = self.tab {
            query.push(("tab", tab.clone()));
        }
        query
    }
}

/// Query of the gallery listing.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryQuery {
    pub sub_board: Option<String>,
    pub tab: Option<String>,
    pub sort: String,
    pub page: u32,
    pub search_type: String,
    pub keyword: Option<String>,
}

impl Default for GalleryQuery {
    fn default() -> Self {
        Self {
            sub_board: None,
            tab: None,
            sort: "latest".to_string(),
            page: 0,
            search_type: "all".to_string(),
            keyword: None,
        }
    }
}

impl GalleryQuery {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("sort", self.sort.clone()),
            ("searchType", self.search_type.clone()),
        ];
        if let Some(ref sub_board) = self.sub_board {
            query.push(("subBoard", sub_board.clone()));
        }
        if let Some(ref keyword) = self.keyword {
            query.push(("kw", keyword.clone()));
        }
        if let Some(ref tab) = self.tab {
            query.push(("tab", tab.clone()));
        }
        query
    }
}

impl ApiClient {
    pub async fn me(&self) -> Result<Option<SessionUser>, ApiError> {
        self.get_json("/api/auth/me").await
    }

    /// Sign in and capture the session cookie from `Set-Cookie`.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, ApiError> {
        let body = serde_json::to_value(credentials)?;
        let response = self
            .send(Method::POST, "/api/auth/login", &[], Some(&body))
            .await?;
        let cookie = cookie_from_headers(response.headers());
        let user = decode_body(response).await?;
        Ok(LoginOutcome { user, cookie })
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.request::<Value>(Method::POST, "/api/auth/logout", &[], Some(&json!({})))
            .await?;
        Ok(())
    }

    /// Update the nickname (multipart form, like the profile dialog).
    pub async fn update_profile(&self, nickname: &str) -> Result<Option<SessionUser>, ApiError> {
        let form = reqwest::multipart::Form::new().text("nickname", nickname.to_string());
        self.send_multipart(Method::PUT, "/api/auth/profile", form)
            .await
    }

    pub async fn home(&self) -> Result<HomeResponse, ApiError> {
        Ok(self.get_json("/api/home").await?.unwrap_or_default())
    }

    pub async fn board_posts(&self, query: &BoardQuery) -> Result<Page<PortalPost>, ApiError> {
        Ok(self
            .get_json_with_query("/api/posts", &query.to_query())
            .await?
            .unwrap_or_default())
    }

    pub async fn portal_post(&self, id: i64) -> Result<Option<PortalPost>, ApiError> {
        self.get_json(&format!("/api/posts/{}", id)).await
    }

    /// Delete one of the signed-in user's posts.
    pub async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        self.request::<Value>(Method::DELETE, &format!("/api/posts/{}", id), &[], None)
            .await?;
        Ok(())
    }

    pub async fn vote_post(&self, id: i64) -> Result<(), ApiError> {
        self.request::<Value>(Method::POST, &format!("/api/posts/{}/vote", id), &[], None)
            .await?;
        Ok(())
    }

    pub async fn vote_gallery(&self, id: i64) -> Result<(), ApiError> {
        self.request::<Value>(Method::POST, &format!("/api/gallery/{}/vote", id), &[], None)
            .await?;
        Ok(())
    }

    pub async fn create_post(&self, payload: &PostPayload) -> Result<Option<PortalPost>, ApiError> {
        self.post_json("/api/posts", payload).await
    }

    /// One page of a post's comments, oldest first.
    pub async fn comments(&self, post_id: i64, page: u32, size: u32) -> Result<Page<Comment>, ApiError> {
        let query = [
            ("postId", post_id.to_string()),
            ("page", page.to_string()),
            ("size", size.to_string()),
            ("sort", "oldest".to_string()),
        ];
        Ok(self
            .get_json_with_query("/api/comments", &query)
            .await?
            .unwrap_or_default())
    }

    pub async fn add_comment(&self, payload: &CommentPayload) -> Result<Option<Comment>, ApiError> {
        self.post_json("/api/comments", payload).await
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), ApiError> {
        self.request::<Value>(Method::DELETE, &format!("/api/comments/{}", id), &[], None)
            .await?;
        Ok(())
    }

    pub async fn gallery(&self, query: &GalleryQuery) -> Result<Page<PortalPost>, ApiError> {
        Ok(self
            .get_json_with_query("/api/gallery", &query.to_query())
            .await?
            .unwrap_or_default())
    }

    pub async fn gallery_post(&self, id: i64) -> Result<Option<PortalPost>, ApiError> {
        self.get_json(&format!("/api/gallery/{}", id)).await
    }

    pub async fn public_notices(&self) -> Result<Vec<Notice>, ApiError> {
        self.get_list("/api/notices", &[]).await
    }

    pub async fn public_notice(&self, id: i64) -> Result<Option<Notice>, ApiError> {
        self.get_json(&format!("/api/notices/{}", id)).await
    }

    pub async fn submit_report(&self, payload: &ReportPayload) -> Result<(), ApiError> {
        self.post_json::<Value, _>("/api/reports", payload).await?;
        Ok(())
    }

    pub async fn presign(&self, request: &PresignRequest) -> Result<Option<PresignedUpload>, ApiError> {
        self.post_json("/api/media/presigned", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::models::ReportType;
    use mockito::{Matcher, Server};

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: server.url(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_captures_cookie() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/login")
            .match_body(Matcher::Json(serde_json::json!({
                "username": "admin",
                "password": "secret"
            })))
            .with_status(200)
            .with_header("set-cookie", "JSESSIONID=abc123; Path=/; HttpOnly")
            .with_body(r#"{"id": 1, "username": "admin", "role": "ADMIN"}"#)
            .create_async()
            .await;

        let outcome = client_for(&server)
            .login(&Credentials {
                username: "admin".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(outcome.cookie.as_deref(), Some("JSESSIONID=abc123"));
        assert!(outcome.user.unwrap().is_admin());
    }

    #[tokio::test]
    async fn test_login_failure_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/auth/login")
            .with_status(400)
            .with_body("아이디 또는 비밀번호가 올바르지 않습니다.")
            .create_async()
            .await;

        let err = client_for(&server)
            .login(&Credentials {
                username: "x".to_string(),
                password: "y".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "아이디 또는 비밀번호가 올바르지 않습니다.");
    }

    #[tokio::test]
    async fn test_logout_sends_empty_object() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/logout")
            .match_body("{}")
            .with_status(204)
            .create_async()
            .await;

        client_for(&server).logout().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_board_posts_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/posts")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("size".into(), "20".into()),
                Matcher::UrlEncoded("searchType".into(), "all".into()),
                Matcher::UrlEncoded("subBoard".into(), "free".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"content": [{"id": 1, "title": "hi"}], "last": true, "totalElements": 1}"#)
            .create_async()
            .await;

        let page = client_for(&server)
            .board_posts(&BoardQuery {
                sub_board: Some("free".to_string()),
                page: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(page.content.len(), 1);
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn test_comments_sorted_oldest() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/comments")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("postId".into(), "7".into()),
                Matcher::UrlEncoded("sort".into(), "oldest".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"content": [{"id": 1}, {"id": 2, "parentId": 1}], "last": true}"#)
            .create_async()
            .await;

        let page = client_for(&server).comments(7, 0, 20).await.unwrap();
        mock.assert_async().await;
        assert_eq!(page.content[1].parent_id, Some(1));
    }

    #[tokio::test]
    async fn test_submit_report_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/reports")
            .match_body(Matcher::Json(serde_json::json!({
                "targetId": 3,
                "type": "POST",
                "reason": "광고"
            })))
            .with_status(201)
            .with_body(r#"{"id": 99}"#)
            .create_async()
            .await;

        client_for(&server)
            .submit_report(&ReportPayload {
                target_id: 3,
                kind: ReportType::Post,
                reason: "광고".to_string(),
            })
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_votes_and_delete_paths() {
        let mut server = Server::new_async().await;
        let vote = server
            .mock("POST", "/api/posts/4/vote")
            .with_status(204)
            .create_async()
            .await;
        let gallery_vote = server
            .mock("POST", "/api/gallery/5/vote")
            .with_status(204)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/api/posts/6")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        client.vote_post(4).await.unwrap();
        client.vote_gallery(5).await.unwrap();
        client.delete_post(6).await.unwrap();

        vote.assert_async().await;
        gallery_vote.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_vote_conflict_keeps_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/posts/4/vote")
            .with_status(409)
            .with_body("이미 추천한 게시글입니다.")
            .create_async()
            .await;

        let err = client_for(&server).vote_post(4).await.unwrap_err();
        assert_eq!(err.to_string(), "이미 추천한 게시글입니다.");
    }

    #[tokio::test]
    async fn test_home_no_content_defaults() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/home")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let home = client_for(&server).home().await.unwrap();
        assert!(home.boards.is_empty());
    }

    #[tokio::test]
    async fn test_profile_update_is_multipart() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/auth/profile")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data.*".to_string()),
            )
            .match_body(Matcher::Regex("name=\"nickname\"".to_string()))
            .with_status(200)
            .with_body(r#"{"id": 1, "nickname": "새닉네임"}"#)
            .create_async()
            .await;

        let user = client_for(&server)
            .update_profile("새닉네임")
            .await
            .unwrap()
            .unwrap();
        mock.assert_async().await;
        assert_eq!(user.nickname.as_deref(), Some("새닉네임"));
    }
}
