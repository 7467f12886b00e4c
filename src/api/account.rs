//! Sign-up, verification and account recovery endpoints.

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::models::{
    FindIdRequest, FindIdResponse, MessageResponse, PasswordChangeRequest,
    PasswordResetCodeRequest, PasswordResetRequest, PasswordResetVerifyRequest,
    ResendVerificationRequest, SignupForm, VerifyEmailRequest,
};
use reqwest::multipart::{Form, Part};
use reqwest::Method;

/// File attached to a sign-up as the profile picture.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePicture {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ApiClient {
    /// Create an account. The server emails a verification code.
    pub async fn signup(
        &self,
        form: &SignupForm,
        picture: Option<ProfilePicture>,
    ) -> Result<Option<MessageResponse>, ApiError> {
        let mut multipart = Form::new()
            .text("username", form.username.clone())
            .text("password", form.password.clone())
            .text("nickname", form.nickname.clone())
            .text("email", form.email.clone());

        if let Some(picture) = picture {
            let part = Part::bytes(picture.bytes)
                .file_name(picture.file_name)
                .mime_str(&picture.content_type)?;
            multipart = multipart.part("profilePicture", part);
        }

        self.send_multipart(Method::POST, "/api/auth/signup", multipart)
            .await
    }

    pub async fn verify_email(
        &self,
        request: &VerifyEmailRequest,
    ) -> Result<Option<MessageResponse>, ApiError> {
        self.post_json("/api/auth/verify-email", request).await
    }

    pub async fn resend_verification_code(
        &self,
        request: &ResendVerificationRequest,
    ) -> Result<Option<MessageResponse>, ApiError> {
        self.post_json("/api/auth/resend-verification-code", request)
            .await
    }

    pub async fn find_id(&self, request: &FindIdRequest) -> Result<Option<FindIdResponse>, ApiError> {
        self.post_json("/api/auth/find-id", request).await
    }

    pub async fn request_password_reset_code(
        &self,
        request: &PasswordResetCodeRequest,
    ) -> Result<Option<MessageResponse>, ApiError> {
        self.post_json("/api/auth/find-password/request-code", request)
            .await
    }

    pub async fn verify_password_reset_code(
        &self,
        request: &PasswordResetVerifyRequest,
    ) -> Result<Option<MessageResponse>, ApiError> {
        self.post_json("/api/auth/find-password/verify-code", request)
            .await
    }

    pub async fn reset_password(
        &self,
        request: &PasswordResetRequest,
    ) -> Result<Option<MessageResponse>, ApiError> {
        self.post_json("/api/auth/find-password/reset", request)
            .await
    }

    pub async fn change_password(
        &self,
        request: &PasswordChangeRequest,
    ) -> Result<Option<MessageResponse>, ApiError> {
        self.post_json("/api/auth/password/change", request).await
    }

    /// Delete the signed-in account. The server drops the session too.
    pub async fn delete_account(&self) -> Result<Option<MessageResponse>, ApiError> {
        self.request(Method::DELETE, "/api/auth/me", &[], None)
            .await
    }
}
