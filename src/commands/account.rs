//! Sign-up, email verification and account recovery.

use super::Console;
use crate::api::ProfilePicture;
use crate::cli::AccountCommand;
use crate::models::{
    FindIdRequest, MessageResponse, PasswordChangeRequest, PasswordResetCodeRequest,
    PasswordResetRequest, PasswordResetVerifyRequest, ResendVerificationRequest, SignupForm,
    VerifyEmailRequest,
};
use crate::upload::content_type_for;
use crate::view::admin::message_page;
use crate::view::Page;
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::debug;

const TITLE: &str = "계정";

/// The server's message when it sent one.
fn account_page(response: Option<MessageResponse>, default: &str) -> Page {
    let message = response
        .and_then(|r| r.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default.to_string());
    message_page(TITLE, &message)
}

async fn read_picture(path: &Path) -> Result<ProfilePicture> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "profile".to_string());
    Ok(ProfilePicture {
        file_name,
        content_type: content_type_for(&bytes).to_string(),
        bytes,
    })
}

pub async fn account(console: &mut Console, command: AccountCommand) -> Result<Page> {
    let client = &console.client;

    match command {
        AccountCommand::Signup {
            username,
            password,
            nickname,
            email,
            profile_picture,
        } => {
            let picture = match profile_picture {
                Some(ref path) => Some(read_picture(path).await?),
                None => None,
            };
            let form = SignupForm {
                username,
                password,
                nickname,
                email,
            };
            let response = match client.signup(&form, picture).await {
                Ok(response) => response,
                Err(e) if e.to_string().contains("Username") => {
                    bail!("이미 사용 중인 아이디입니다.")
                }
                Err(e) => return Err(e).context("회원가입에 실패했습니다."),
            };
            Ok(account_page(
                response,
                "회원가입이 완료되었습니다. 이메일 인증을 진행해 주세요.",
            ))
        }
        AccountCommand::VerifyEmail { username, code } => {
            let response = client
                .verify_email(&VerifyEmailRequest { username, code })
                .await
                .context("인증에 실패했습니다.")?;
            Ok(account_page(
                response,
                "이메일 인증이 완료되었습니다. 로그인해 주세요.",
            ))
        }
        AccountCommand::ResendCode { username } => {
            let response = client
                .resend_verification_code(&ResendVerificationRequest { username })
                .await
                .context("재전송에 실패했습니다.")?;
            Ok(account_page(
                response,
                "인증 코드를 다시 보냈습니다. 이메일을 확인하세요.",
            ))
        }
        AccountCommand::FindId { email } => {
            let found = client
                .find_id(&FindIdRequest { email })
                .await
                .context("아이디 찾기에 실패했습니다.")?;
            match found.and_then(|f| f.username).filter(|u| !u.is_empty()) {
                Some(username) => Ok(message_page(TITLE, &format!("아이디: {}", username))),
                None => {
                    console.failed = true;
                    Ok(message_page(TITLE, "해당 이메일로 등록된 아이디가 없습니다."))
                }
            }
        }
        AccountCommand::RequestResetCode { username, email } => {
            let response = client
                .request_password_reset_code(&PasswordResetCodeRequest { username, email })
                .await
                .context("코드 요청에 실패했습니다.")?;
            Ok(account_page(response, "인증 코드가 이메일로 전송되었습니다."))
        }
        AccountCommand::VerifyResetCode { username, code } => {
            let response = client
                .verify_password_reset_code(&PasswordResetVerifyRequest { username, code })
                .await
                .context("코드 검증에 실패했습니다.")?;
            Ok(account_page(
                response,
                "코드가 확인되었습니다. 새 비밀번호를 입력하세요.",
            ))
        }
        AccountCommand::ResetPassword {
            username,
            code,
            new_password,
            confirm_password,
        } => {
            if new_password != confirm_password {
                bail!("새 비밀번호가 일치하지 않습니다.");
            }
            let request = PasswordResetRequest {
                username,
                verification_code: code,
                new_password,
                confirm_password,
            };
            let response = client
                .reset_password(&request)
                .await
                .context("비밀번호 재설정에 실패했습니다.")?;
            Ok(account_page(
                response,
                "비밀번호가 재설정되었습니다. 로그인해 주세요.",
            ))
        }
        AccountCommand::ChangePassword {
            current_password,
            new_password,
            confirm_password,
        } => {
            if new_password != confirm_password {
                bail!("새 비밀번호가 일치하지 않습니다.");
            }
            let request = PasswordChangeRequest {
                current_password,
                new_password,
                confirm_new_password: confirm_password,
            };
            let response = client
                .change_password(&request)
                .await
                .context("비밀번호 변경에 실패했습니다.")?;
            Ok(account_page(response, "비밀번호가 변경되었습니다."))
        }
        AccountCommand::Delete { yes } => {
            if !yes {
                bail!("회원 탈퇴를 진행하려면 --yes를 지정하세요.");
            }
            let response = client
                .delete_account()
                .await
                .context("회원 탈퇴에 실패했습니다.")?;

            console.session.clear()?;
            console.state.user = None;
            console.client.set_cookie(None);
            debug!("Session removed after account deletion");
            Ok(account_page(response, "회원 탈퇴가 완료되었습니다."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{admin_user, test_console};
    use mockito::{Matcher, Server};
    use tempfile::TempDir;
    use tokio_test::assert_err;

    #[tokio::test]
    async fn test_signup_duplicate_username_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/auth/signup")
            .with_status(400)
            .with_body("Username is already taken")
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let mut console = test_console(&server.url(), dir.path(), None);
        let command = AccountCommand::Signup {
            username: "kim".to_string(),
            password: "pw".to_string(),
            nickname: "김".to_string(),
            email: "kim@example.com".to_string(),
            profile_picture: None,
        };
        let err = account(&mut console, command).await.unwrap_err();
        assert_eq!(err.to_string(), "이미 사용 중인 아이디입니다.");
    }

    #[tokio::test]
    async fn test_signup_with_picture_uses_server_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/signup")
            .match_body(Matcher::Regex("Content-Type: image/png".to_string()))
            .with_status(200)
            .with_body(r#"{"message": "인증 메일을 보냈습니다."}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let picture = dir.path().join("me.png");
        std::fs::write(&picture, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();

        let mut console = test_console(&server.url(), dir.path(), None);
        let command = AccountCommand::Signup {
            username: "kim".to_string(),
            password: "pw".to_string(),
            nickname: "김".to_string(),
            email: "kim@example.com".to_string(),
            profile_picture: Some(picture),
        };
        let page = account(&mut console, command).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page, message_page(TITLE, "인증 메일을 보냈습니다."));
    }

    #[tokio::test]
    async fn test_find_id_not_found_fails() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/auth/find-id")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let mut console = test_console(&server.url(), dir.path(), None);
        let command = AccountCommand::FindId {
            email: "nobody@example.com".to_string(),
        };
        let page = account(&mut console, command).await.unwrap();

        assert_eq!(page, message_page(TITLE, "해당 이메일로 등록된 아이디가 없습니다."));
        assert!(console.failed);
    }

    #[tokio::test]
    async fn test_reset_password_mismatch_sends_nothing() {
        let dir = TempDir::new().unwrap();
        let mut console = test_console("http://127.0.0.1:9", dir.path(), None);
        let command = AccountCommand::ResetPassword {
            username: "kim".to_string(),
            code: "123456".to_string(),
            new_password: "a".to_string(),
            confirm_password: "b".to_string(),
        };
        assert_err!(account(&mut console, command).await);
    }

    #[tokio::test]
    async fn test_change_password_default_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/auth/password/change")
            .with_status(204)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let mut console = test_console(&server.url(), dir.path(), Some(admin_user()));
        let command = AccountCommand::ChangePassword {
            current_password: "old".to_string(),
            new_password: "new".to_string(),
            confirm_password: "new".to_string(),
        };
        let page = account(&mut console, command).await.unwrap();
        assert_eq!(page, message_page(TITLE, "비밀번호가 변경되었습니다."));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut console = test_console("http://127.0.0.1:9", dir.path(), Some(admin_user()));
        assert_err!(account(&mut console, AccountCommand::Delete { yes: false }).await);
        assert!(console.state.user.is_some());
    }

    #[tokio::test]
    async fn test_delete_clears_session() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/auth/me")
            .match_header("cookie", "JSESSIONID=test")
            .with_status(200)
            .with_body(r#"{"message": "회원 탈퇴가 완료되었습니다."}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let mut console = test_console(&server.url(), dir.path(), Some(admin_user()));
        account(&mut console, AccountCommand::Delete { yes: true })
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(console.state.user.is_none());
        assert!(console.session.user().is_none());
        assert!(console.client.cookie().is_none());
    }
}
