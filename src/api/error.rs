//! API error taxonomy.

use thiserror::Error;

/// Page the browser console redirected to on authentication failure.
pub const LOGIN_PAGE: &str = "login.html";

/// Message shown when a failed response carries no body.
pub const DEFAULT_FAILURE_MESSAGE: &str = "요청이 실패했습니다.";

#[derive(Error, Debug)]
pub enum ApiError {
    /// 401 or 403 from the API.
    #[error("{message}")]
    Unauthorized { status: u16, message: String },

    /// Any other non-2xx response. The message is the response body.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Cannot connect to the API at {0}")]
    Connect(String),

    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// Well-formed JSON that does not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Build the error for a non-2xx response.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            body.to_string()
        };

        match status {
            401 | 403 => ApiError::Unauthorized { status, message },
            _ => ApiError::Status { status, message },
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. } | ApiError::Status { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// Where the user has to go after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Login(&'static str),
}

/// Returns the login redirect for authentication failures, `None` otherwise.
pub fn ensure_auth(err: &ApiError) -> Option<Navigation> {
    if err.is_unauthorized() {
        Some(Navigation::Login(LOGIN_PAGE))
    } else {
        None
    }
}

/// Same as [`ensure_auth`] for errors that went through `anyhow`.
pub fn ensure_auth_any(err: &anyhow::Error) -> Option<Navigation> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ApiError>())
        .and_then(ensure_auth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_from_status_uses_body() {
        let err = ApiError::from_status(400, "제목을 입력하세요.");
        assert_eq!(err.to_string(), "제목을 입력하세요.");
        assert_eq!(err.status(), Some(400));
        assert!(ensure_auth(&err).is_none());
    }

    #[test]
    fn test_from_status_empty_body_fallback() {
        let err = ApiError::from_status(500, "  ");
        assert_eq!(err.to_string(), DEFAULT_FAILURE_MESSAGE);
    }

    #[test]
    fn test_auth_statuses_navigate_to_login() {
        for status in [401, 403] {
            let err = ApiError::from_status(status, "");
            assert!(err.is_unauthorized());
            assert_eq!(ensure_auth(&err), Some(Navigation::Login("login.html")));
        }
    }

    #[test]
    fn test_ensure_auth_through_anyhow_context() {
        let result: Result<(), ApiError> = Err(ApiError::from_status(401, "expired"));
        let err = result.context("Failed to load dashboard").unwrap_err();
        assert_eq!(ensure_auth_any(&err), Some(Navigation::Login(LOGIN_PAGE)));

        let other = anyhow::anyhow!("disk full");
        assert!(ensure_auth_any(&other).is_none());
    }
}
