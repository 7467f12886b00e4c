//! HTTP client for the community API.
//!
//! Every call goes through [`ApiClient::request`], which sends JSON with the
//! cached session cookie and applies one response contract:
//! 401/403 become [`ApiError::Unauthorized`], other failures carry the
//! response body, and 204, empty or non-JSON bodies decode to `None`.
//! JSON of the wrong shape is an [`ApiError::Decode`], except inside list
//! responses, where a malformed record is skipped.

use crate::api::error::ApiError;
use crate::config::ApiConfig;
use reqwest::header::{HeaderMap, CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Query string pairs appended to a request.
pub type Query<'a> = [(&'a str, String)];

/// Client for the community API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout_seconds: u64,
    cookie: Option<String>,
}

impl ApiClient {
    /// Create a client for the configured API.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_seconds: config.timeout_seconds,
            cookie: None,
        })
    }

    /// Attach a session cookie sent with every API request.
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie;
        self
    }

    pub fn set_cookie(&mut self, cookie: Option<String>) {
        self.cookie = cookie;
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an API path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header(CONTENT_TYPE, "application/json");
        if let Some(ref cookie) = self.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder
    }

    fn map_send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.timeout_seconds)
        } else if e.is_connect() {
            ApiError::Connect(self.base_url.clone())
        } else {
            ApiError::Transport(e)
        }
    }

    /// Send a prepared request and turn non-2xx statuses into errors.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("API error {}: {}", status, body);
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        Ok(response)
    }

    /// Send a JSON request and return the raw response.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<&Value>,
    ) -> Result<Response, ApiError> {
        debug!("{} {}", method, path);
        let mut builder = self.builder(method, path);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }
        self.execute(builder).await
    }

    /// Send a JSON request and decode the response body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<&Value>,
    ) -> Result<Option<T>, ApiError> {
        let response = self.send(method, path, query, body).await?;
        decode_body(response).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        self.request(Method::GET, path, &[], None).await
    }

    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<Option<T>, ApiError> {
        self.request(Method::GET, path, query, None).await
    }

    /// GET a list endpoint; "no content" yields an empty list.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<Vec<T>, ApiError> {
        let values = self
            .request::<Vec<Value>>(Method::GET, path, query, None)
            .await?
            .unwrap_or_default();

        Ok(values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!("Skipping malformed record from {}: {}", path, e);
                    None
                }
            })
            .collect())
    }

    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, &[], Some(&body)).await
    }

    /// Send a multipart form (profile updates and sign-up).
    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Option<T>, ApiError> {
        let mut builder = self.http.request(method, self.url(path)).multipart(form);
        if let Some(ref cookie) = self.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let response = self.execute(builder).await?;
        decode_body(response).await
    }

    /// PUT raw bytes to a presigned storage URL. The session cookie is not sent.
    pub async fn put_presigned(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let builder = self
            .http
            .put(upload_url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        self.execute(builder).await?;
        Ok(())
    }
}

/// Decode a successful response.
///
/// 204, an empty body and a body that is not JSON at all mean "no content".
pub async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<Option<T>, ApiError> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let text = response.text().await.map_err(ApiError::Transport)?;
    if text.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(&text) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_syntax() || e.is_eof() => {
            warn!("Ignoring unparsable response body: {}", e);
            Ok(None)
        }
        Err(e) => Err(ApiError::Decode(e)),
    }
}

/// Collect `name=value` pairs of all `Set-Cookie` headers into a `Cookie`
/// header value.
pub fn cookie_from_headers(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
