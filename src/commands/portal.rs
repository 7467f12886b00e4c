//! Public portal commands.

use super::Console;
use crate::api::{BoardQuery, GalleryQuery};
use crate::cli::PortalCommand;
use crate::models::{CommentPayload, Page as Listing, PostPayload, ReportPayload};
use crate::view::admin::message_page;
use crate::view::portal::{
    board_page, gallery_page, home_page, post_page, public_notice_page, public_notices_page,
};
use crate::view::{Page, Section};
use anyhow::{bail, Context, Result};

const COMMENT_PAGE_SIZE: u32 = 20;

fn not_found(title: &str) -> Page {
    message_page(title, "게시글을 찾을 수 없습니다.")
}

pub async fn portal(console: &mut Console, command: PortalCommand) -> Result<Page> {
    match command {
        PortalCommand::Home => {
            let loaded = console.client.home().await;
            match loaded {
                Ok(home) => Ok(home_page(&home)),
                Err(e) => console.load_failed("홈", "게시판 정보를 불러오지 못했습니다.", e),
            }
        }
        PortalCommand::Board {
            sub_board,
            tab,
            page,
            size,
            search_type,
            keyword,
        } => {
            let title = sub_board.clone().unwrap_or_else(|| "게시판".to_string());
            let query = BoardQuery {
                sub_board,
                tab,
                page,
                size,
                search_type,
                keyword,
            };
            let loaded = console.client.board_posts(&query).await;
            match loaded {
                Ok(posts) => Ok(board_page(&title, &posts)),
                Err(e) => console.load_failed(&title, "게시글을 불러오지 못했습니다.", e),
            }
        }
        PortalCommand::Post { id, comment_page } => {
            let title = format!("게시글 #{}", id);
            let client = &console.client;
            let loaded = tokio::try_join!(
                client.portal_post(id),
                client.comments(id, comment_page, COMMENT_PAGE_SIZE)
            );
            match loaded {
                Ok((Some(post), comments)) => Ok(post_page(&post, &comments)),
                Ok((None, _)) => Ok(not_found(&title)),
                Err(e) => console.load_failed(&title, "게시글을 불러오지 못했습니다.", e),
            }
        }
        PortalCommand::Comment {
            post_id,
            content,
            reply_to,
        } => {
            if content.trim().is_empty() {
                bail!("댓글 내용을 입력하세요.");
            }
            let payload = CommentPayload {
                post_id,
                parent_id: reply_to,
                content,
            };
            console
                .client
                .add_comment(&payload)
                .await
                .context("댓글 등록에 실패했습니다.")?;
            Ok(message_page("댓글", "댓글이 등록되었습니다."))
        }
        PortalCommand::Uncomment { id } => {
            console
                .client
                .delete_comment(id)
                .await
                .context("댓글 삭제에 실패했습니다.")?;
            Ok(message_page("댓글", "댓글이 삭제되었습니다."))
        }
        PortalCommand::Gallery {
            sub_board,
            tab,
            sort,
            page,
            search_type,
            keyword,
        } => {
            let title = sub_board.clone().unwrap_or_else(|| "갤러리".to_string());
            let query = GalleryQuery {
                sub_board,
                tab,
                sort,
                page,
                search_type,
                keyword,
            };
            let loaded = console.client.gallery(&query).await;
            match loaded {
                Ok(posts) => Ok(gallery_page(&title, &posts)),
                Err(e) => console.load_failed(&title, "갤러리를 불러오지 못했습니다.", e),
            }
        }
        PortalCommand::GalleryPost { id } => {
            let title = format!("작품 #{}", id);
            let client = &console.client;
            let loaded = tokio::try_join!(
                client.gallery_post(id),
                client.comments(id, 0, COMMENT_PAGE_SIZE)
            );
            match loaded {
                Ok((Some(post), comments)) => Ok(post_page(&post, &comments)),
                Ok((None, _)) => Ok(not_found(&title)),
                Err(e) => console.load_failed(&title, "작품을 불러오지 못했습니다.", e),
            }
        }
        PortalCommand::Notices => {
            let loaded = console.client.public_notices().await;
            match loaded {
                Ok(notices) => Ok(public_notices_page(&notices)),
                Err(e) => console.load_failed("공지사항", "공지사항을 불러오지 못했습니다.", e),
            }
        }
        PortalCommand::Notice { id } => {
            let loaded = console.client.public_notice(id).await;
            match loaded {
                Ok(Some(notice)) => Ok(public_notice_page(&notice)),
                Ok(None) => Ok(message_page("공지사항", "공지사항을 찾을 수 없습니다.")),
                Err(e) => console.load_failed("공지사항", "공지사항을 불러오지 못했습니다.", e),
            }
        }
        PortalCommand::Write {
            title,
            content,
            main_board,
            sub_board,
            tab,
            files,
        } => {
            if title.trim().is_empty() || content.trim().is_empty() {
                bail!("제목과 내용을 입력하세요.");
            }
            let file_urls = console.upload_attachments(&files, "posts").await?;
            let payload = PostPayload {
                title,
                content,
                main_board_name: main_board,
                sub_board_name: sub_board,
                tab_item: tab,
                file_urls,
            };
            let created = console
                .client
                .create_post(&payload)
                .await
                .context("게시글 등록에 실패했습니다.")?;

            let mut page = match created {
                Some(post) => post_page(&post, &Listing::default()),
                None => Page::new("게시글"),
            };
            page.sections
                .insert(0, Section::message("게시글이 등록되었습니다."));
            Ok(page)
        }
        PortalCommand::DeletePost { id } => {
            console
                .client
                .delete_post(id)
                .await
                .context("게시글 삭제에 실패했습니다.")?;
            Ok(message_page("게시글", "게시글이 삭제되었습니다."))
        }
        PortalCommand::Vote { id } => {
            console
                .client
                .vote_post(id)
                .await
                .context("추천에 실패했습니다.")?;
            Ok(message_page(&format!("게시글 #{}", id), "추천했습니다."))
        }
        PortalCommand::GalleryVote { id } => {
            console
                .client
                .vote_gallery(id)
                .await
                .context("추천에 실패했습니다.")?;
            Ok(message_page(&format!("작품 #{}", id), "추천했습니다."))
        }
        PortalCommand::Report {
            target_id,
            kind,
            reason,
        } => {
            if reason.trim().is_empty() {
                bail!("신고 사유를 입력하세요.");
            }
            let payload = ReportPayload {
                target_id,
                kind,
                reason,
            };
            console
                .client
                .submit_report(&payload)
                .await
                .context("신고 접수에 실패했습니다.")?;
            Ok(message_page("신고", "신고가 접수되었습니다."))
        }
    }
}
