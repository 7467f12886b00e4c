//! File uploads through presigned storage URLs.
//!
//! Each file is announced to the API, which answers with a one-time upload
//! URL and the public URL the file will be served from. The bytes are then
//! PUT straight to storage.

use crate::api::ApiClient;
use crate::models::PresignRequest;
use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A file stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub url: String,
}

/// Expand the given paths into the list of files to upload.
///
/// Directories are walked recursively and their files added in sorted
/// order. Paths that do not exist are an error.
pub fn collect_upload_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .collect();
            found.sort();
            debug!("{} files under {}", found.len(), path.display());
            files.extend(found);
        } else {
            return Err(anyhow!("File not found: {}", path.display()));
        }
    }

    Ok(files)
}

/// MIME type of a file, sniffed from its leading bytes.
pub fn content_type_for(bytes: &[u8]) -> &'static str {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Upload one file and return where it is served from.
pub async fn upload_file(client: &ApiClient, path: &Path, directory: &str) -> Result<UploadedFile> {
    let name = file_name(path);
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let content_type = content_type_for(&bytes);

    let presigned = client
        .presign(&PresignRequest {
            directory: directory.to_string(),
            content_type: content_type.to_string(),
        })
        .await
        .with_context(|| format!("Failed to request upload URL for {}", name))?
        .ok_or_else(|| anyhow!("No upload URL returned for {}", name))?;

    client
        .put_presigned(&presigned.upload_url, content_type, bytes)
        .await
        .with_context(|| format!("Failed to upload {}", name))?;

    debug!("Uploaded {} to {}", name, presigned.public_url);
    Ok(UploadedFile {
        name,
        url: presigned.public_url,
    })
}

/// Upload files one after another. The first failure aborts the batch.
pub async fn upload_files(
    client: &ApiClient,
    files: &[PathBuf],
    directory: &str,
    show_progress: bool,
) -> Result<Vec<UploadedFile>> {
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let progress = if show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut uploaded = Vec::with_capacity(files.len());
    for path in files {
        if let Some(ref pb) = progress {
            pb.set_message(file_name(path));
        }

        let result = upload_file(client, path, directory).await;
        match result {
            Ok(file) => {
                uploaded.push(file);
                if let Some(ref pb) = progress {
                    pb.inc(1);
                }
            }
            Err(e) => {
                if let Some(ref pb) = progress {
                    pb.abandon_with_message("upload failed");
                }
                return Err(e);
            }
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }
    info!("Uploaded {} files to {}", uploaded.len(), directory);

    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use mockito::{Matcher, Server};
    use std::fs;
    use tempfile::TempDir;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: server.url(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(&PNG_HEADER), "image/png");
        assert_eq!(content_type_for(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(content_type_for(b"%PDF-1.7\n"), "application/pdf");
        assert_eq!(content_type_for(b"plain words"), FALLBACK_CONTENT_TYPE);
        assert_eq!(content_type_for(&[]), FALLBACK_CONTENT_TYPE);
    }

    #[test]
    fn test_collect_expands_directories_sorted() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("b.png"), b"b").unwrap();
        fs::write(dir.path().join("a.png"), b"a").unwrap();
        fs::write(nested.join("c.png"), b"c").unwrap();

        let single = dir.path().join("b.png");
        let files = collect_upload_files(&[single.clone(), dir.path().to_path_buf()]).unwrap();

        assert_eq!(
            files,
            vec![
                single,
                dir.path().join("a.png"),
                dir.path().join("b.png"),
                nested.join("c.png"),
            ]
        );
    }

    #[test]
    fn test_collect_missing_path_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.png");
        tokio_test::assert_err!(collect_upload_files(&[missing]));
    }

    #[tokio::test]
    async fn test_upload_files_presigns_and_puts() {
        let mut server = Server::new_async().await;
        let upload_url = format!("{}/storage/abc", server.url());

        let presign = server
            .mock("POST", "/api/media/presigned")
            .match_body(Matcher::Json(serde_json::json!({
                "directory": "notices",
                "contentType": "image/png"
            })))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "uploadUrl": upload_url,
                    "publicUrl": "https://cdn.example.com/notices/abc.png"
                })
                .to_string(),
            )
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/storage/abc")
            .match_header("content-type", "image/png")
            .match_header("cookie", Matcher::Missing)
            .with_status(200)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("banner.png");
        fs::write(&file, PNG_HEADER).unwrap();

        let client = client_for(&server).with_cookie(Some("SESSION=1".to_string()));
        let uploaded = upload_files(&client, &[file], "notices", false)
            .await
            .unwrap();

        presign.assert_async().await;
        put.assert_async().await;
        assert_eq!(
            uploaded,
            vec![UploadedFile {
                name: "banner.png".to_string(),
                url: "https://cdn.example.com/notices/abc.png".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_batch() {
        let mut server = Server::new_async().await;
        let presign = server
            .mock("POST", "/api/media/presigned")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let first = dir.path().join("one.txt");
        let second = dir.path().join("two.txt");
        fs::write(&first, b"1").unwrap();
        fs::write(&second, b"2").unwrap();

        let result = upload_files(&client_for(&server), &[first, second], "uploads", false).await;
        tokio_test::assert_err!(result);
        presign.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_nothing() {
        let server = Server::new_async().await;
        let uploaded = upload_files(&client_for(&server), &[], "uploads", true)
            .await
            .unwrap();
        assert!(uploaded.is_empty());
    }
}
