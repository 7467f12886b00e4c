//! Public portal screens.

use super::{Field, ListItem, Page, Section, Table};
use crate::analysis::{build_comment_tree, format_board_label, format_datetime, CommentNode, UNTITLED};
use crate::models::{non_empty, Comment, HomeResponse, Notice, Page as Listing, PortalPost};

fn title_of(post: &PortalPost) -> String {
    non_empty(&post.title).unwrap_or(UNTITLED).to_string()
}

fn board_of(post: &PortalPost) -> String {
    format_board_label(
        post.main_board_name.as_deref(),
        post.sub_board_name.as_deref(),
        "-",
    )
}

fn post_table(posts: &[PortalPost], empty_message: &str) -> Table {
    let mut table = Table::new(
        &["번호", "제목", "게시판", "작성자", "작성일", "조회", "댓글"],
        empty_message,
    );
    for post in posts {
        table.row(vec![
            post.id.to_string(),
            title_of(post),
            board_of(post),
            post.author_label().to_string(),
            format_datetime(post.created_at.as_deref()),
            post.view_count.to_string(),
            post.comment_count.to_string(),
        ]);
    }
    table
}

fn paging_fields<T>(listing: &Listing<T>) -> Vec<Field> {
    let current = listing.page.unwrap_or(0) + 1;
    let mut fields = vec![Field::new("전체", listing.total())];
    match listing.total_pages {
        Some(pages) if pages > 0 => fields.push(Field::new("페이지", format!("{}/{}", current, pages))),
        _ => fields.push(Field::new("페이지", current)),
    }
    if listing.has_next() {
        fields.push(Field::new("다음 페이지", format!("--page {}", current)));
    }
    fields
}

pub fn home_page(home: &HomeResponse) -> Page {
    let boards = home
        .boards
        .iter()
        .map(|board| {
            let name = non_empty(&board.display_name).unwrap_or(board.name.as_str());
            let text = if board.sub_boards.is_empty() {
                name.to_string()
            } else {
                format!("{}: {}", name, board.sub_boards.join(", "))
            };
            ListItem { depth: 0, text }
        })
        .collect();

    Page::new("홈")
        .section(Section::List {
            heading: Some("게시판".to_string()),
            items: boards,
            empty_message: "등록된 게시판이 없습니다. 관리자에게 문의하세요.".to_string(),
        })
        .section(Section::table(
            Some("최신 게시글"),
            post_table(&home.recent_posts, "등록된 게시글이 없습니다."),
        ))
        .section(Section::table(
            Some("인기 게시글"),
            post_table(&home.popular_posts, "등록된 게시글이 없습니다."),
        ))
}

pub fn board_page(title: &str, listing: &Listing<PortalPost>) -> Page {
    Page::new(title)
        .section(Section::table(
            None,
            post_table(&listing.content, "등록된 게시글이 없습니다."),
        ))
        .section(Section::fields(None, paging_fields(listing)))
}

pub fn gallery_page(title: &str, listing: &Listing<PortalPost>) -> Page {
    let mut table = Table::new(
        &["번호", "제목", "작성자", "작성일", "추천", "첨부"],
        "등록된 작품이 없습니다.",
    );
    for post in &listing.content {
        let attachments = if post.file_urls.is_empty() && post.thumbnail_urls.is_empty() {
            "첨부된 파일이 없습니다.".to_string()
        } else {
            format!("{}개", post.file_urls.len().max(post.thumbnail_urls.len()))
        };
        table.row(vec![
            post.id.to_string(),
            title_of(post),
            post.author_label().to_string(),
            format_datetime(post.created_at.as_deref()),
            post.vote_count.max(post.like_count).to_string(),
            attachments,
        ]);
    }

    Page::new(title)
        .section(Section::table(None, table))
        .section(Section::fields(None, paging_fields(listing)))
}

fn flatten_thread(nodes: &[CommentNode], depth: usize, into: &mut Vec<ListItem>) {
    for node in nodes {
        let comment: &Comment = &node.comment;
        into.push(ListItem {
            depth,
            text: format!(
                "**{}** ({}, #{}): {}",
                comment.author_label(),
                format_datetime(comment.created_at.as_deref()),
                comment.id,
                non_empty(&comment.content).unwrap_or("-")
            ),
        });
        flatten_thread(&node.children, depth + 1, into);
    }
}

/// A post with one page of its comment thread.
pub fn post_page(post: &PortalPost, comments: &Listing<Comment>) -> Page {
    let fields = vec![
        Field::new("번호", post.id),
        Field::new("게시판", board_of(post)),
        Field::new("작성자", post.author_label()),
        Field::new("작성일", format_datetime(post.created_at.as_deref())),
        Field::new("조회", post.view_count),
        Field::new("추천", post.vote_count.max(post.like_count)),
    ];

    let mut page = Page::new(title_of(post))
        .section(Section::fields(None, fields))
        .section(Section::text(
            "본문",
            non_empty(&post.content)
                .or_else(|| non_empty(&post.excerpt))
                .unwrap_or("내용이 없습니다."),
        ));

    if !post.file_urls.is_empty() {
        page.push(Section::List {
            heading: Some("첨부 파일".to_string()),
            items: post
                .file_urls
                .iter()
                .map(|url| ListItem {
                    depth: 0,
                    text: url.clone(),
                })
                .collect(),
            empty_message: String::new(),
        });
    }

    let tree = build_comment_tree(&comments.content);
    let mut items = Vec::new();
    flatten_thread(&tree, 0, &mut items);
    page.push(Section::List {
        heading: Some(format!("댓글 ({})", comments.total())),
        items,
        empty_message: "댓글이 없습니다.".to_string(),
    });
    if comments.has_next() {
        let shown: usize = tree.iter().map(CommentNode::count).sum();
        page.push(Section::message(format!(
            "댓글 {}개 표시됨. 다음 댓글: --comment-page {}",
            shown,
            comments.page.unwrap_or(0) + 1
        )));
    }

    page
}

pub fn public_notices_page(notices: &[Notice]) -> Page {
    let mut table = Table::new(&["번호", "제목", "작성일"], "공지사항이 없습니다.");
    for notice in notices {
        let title = non_empty(&notice.title).unwrap_or(UNTITLED);
        table.row(vec![
            notice.id.to_string(),
            if notice.pinned {
                format!("[공지] {}", title)
            } else {
                title.to_string()
            },
            format_datetime(notice.created_at.as_deref()),
        ]);
    }
    Page::new("공지사항").section(Section::table(None, table))
}

pub fn public_notice_page(notice: &Notice) -> Page {
    let mut page = Page::new(non_empty(&notice.title).unwrap_or(UNTITLED))
        .section(Section::fields(
            None,
            vec![
                Field::new("작성자", non_empty(&notice.author).unwrap_or("관리자")),
                Field::new("작성일", format_datetime(notice.created_at.as_deref())),
            ],
        ))
        .section(Section::text(
            "내용",
            non_empty(&notice.content).unwrap_or("내용이 없습니다."),
        ));
    if !notice.attachment_urls.is_empty() {
        page.push(Section::List {
            heading: Some("첨부 파일".to_string()),
            items: notice
                .attachment_urls
                .iter()
                .map(|url| ListItem {
                    depth: 0,
                    text: url.clone(),
                })
                .collect(),
            empty_message: String::new(),
        });
    }
    page
}
