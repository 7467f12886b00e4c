//! Search filters over already-loaded lists.
//!
//! Every filter takes a free-text keyword and a field selector. The keyword
//! is trimmed and lower-cased; an empty keyword keeps every record. Ids
//! match against their `#<id>` display form.

use crate::analysis::format_datetime;
use crate::models::{
    parse_timestamp, AdminPost, AggregatedModerationItem, Notice, PostStatus, ReportSummary,
    S3Object,
};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ModerationField {
    #[default]
    All,
    Id,
    Detection,
    Author,
    Menu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PostField {
    #[default]
    All,
    Id,
    Title,
    Author,
    Menu,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum NoticeField {
    #[default]
    All,
    Title,
    Content,
    Pinned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportField {
    #[default]
    All,
    Id,
    Type,
    Status,
    Menu,
    Author,
    Reporter,
    Reason,
}

/// Trimmed, lower-cased keyword, or `None` when there is nothing to match.
pub fn normalize_keyword(keyword: Option<&str>) -> Option<String> {
    keyword
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
}

fn lower(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().to_lowercase()
}

fn id_matches(id: i64, keyword: &str) -> bool {
    format!("#{}", id).contains(keyword)
}

fn menu_text(main: &Option<String>, sub: &Option<String>) -> String {
    format!(
        "{} {}",
        main.as_deref().unwrap_or_default(),
        sub.as_deref().unwrap_or_default()
    )
    .to_lowercase()
}

/// Filter aggregated moderation rows.
///
/// `All` also matches the displayed creation time.
pub fn filter_moderation_items(
    items: &[AggregatedModerationItem],
    keyword: Option<&str>,
    field: ModerationField,
) -> Vec<AggregatedModerationItem> {
    let Some(query) = normalize_keyword(keyword) else {
        return items.to_vec();
    };
    let q = query.as_str();

    items
        .iter()
        .filter(|row| {
            let item = &row.item;
            let detection = item
                .detection_type
                .as_deref()
                .filter(|d| !d.is_empty())
                .or(item.content_type.as_deref())
                .unwrap_or_default()
                .to_lowercase();
            let author = lower(&item.author_name);
            let menu = menu_text(&item.main_board_name, &item.sub_board_name);
            let id_match = id_matches(item.id, q);

            match field {
                ModerationField::Id => id_match,
                ModerationField::Detection => detection.contains(q),
                ModerationField::Author => author.contains(q),
                ModerationField::Menu => menu.contains(q),
                ModerationField::All => {
                    let created = match item.created_at.as_deref() {
                        Some(raw) => format_datetime(Some(raw)).to_lowercase(),
                        None => String::new(),
                    };
                    detection.contains(q)
                        || author.contains(q)
                        || created.contains(q)
                        || id_match
                        || menu.contains(q)
                }
            }
        })
        .cloned()
        .collect()
}

/// Filter admin posts. The status filter is exact and applies first.
pub fn filter_posts(
    posts: &[AdminPost],
    status: Option<PostStatus>,
    keyword: Option<&str>,
    field: PostField,
) -> Vec<AdminPost> {
    let query = normalize_keyword(keyword);

    posts
        .iter()
        .filter(|post| match status {
            Some(status) => post.status.as_deref() == Some(status.as_str()),
            None => true,
        })
        .filter(|post| {
            let Some(q) = query.as_deref() else {
                return true;
            };
            let id_match = id_matches(post.id, q);
            let title = lower(&post.title);
            let author = lower(&post.author);
            let menu = menu_text(&post.main_board_name, &post.sub_board_name);
            let status = lower(&post.status);

            match field {
                PostField::Id => id_match,
                PostField::Title => title.contains(q),
                PostField::Author => author.contains(q),
                PostField::Menu => menu.contains(q),
                PostField::Status => status.contains(q),
                PostField::All => {
                    id_match
                        || title.contains(q)
                        || author.contains(q)
                        || menu.contains(q)
                        || status.contains(q)
                }
            }
        })
        .cloned()
        .collect()
}

/// Searchable text of the pinned flag.
fn pinned_text(pinned: bool) -> &'static str {
    if pinned {
        "pinned 고정 true yes"
    } else {
        "unpinned false"
    }
}

pub fn filter_notices(notices: &[Notice], keyword: Option<&str>, field: NoticeField) -> Vec<Notice> {
    let Some(query) = normalize_keyword(keyword) else {
        return notices.to_vec();
    };
    let q = query.as_str();

    notices
        .iter()
        .filter(|notice| {
            let title = lower(&notice.title);
            let content = lower(&notice.content);
            let pinned = pinned_text(notice.pinned);

            match field {
                NoticeField::Title => title.contains(q),
                NoticeField::Content => content.contains(q),
                NoticeField::Pinned => pinned.contains(q),
                NoticeField::All => title.contains(q) || content.contains(q) || pinned.contains(q),
            }
        })
        .cloned()
        .collect()
}

pub fn filter_reports(
    reports: &[ReportSummary],
    keyword: Option<&str>,
    field: ReportField,
) -> Vec<ReportSummary> {
    let Some(query) = normalize_keyword(keyword) else {
        return reports.to_vec();
    };
    let q = query.as_str();

    reports
        .iter()
        .filter(|report| {
            let author = lower(&report.author_name);
            let reporter = lower(&report.reporter_name);
            let reason = lower(&report.reason);
            let kind = lower(&report.kind);
            let status = lower(&report.status);
            let menu = menu_text(&report.main_board_name, &report.sub_board_name);
            let id_match = id_matches(report.id, q);

            match field {
                ReportField::Id => id_match,
                ReportField::Type => kind.contains(q),
                ReportField::Status => status.contains(q),
                ReportField::Menu => menu.contains(q),
                ReportField::Author => author.contains(q),
                ReportField::Reporter => reporter.contains(q),
                ReportField::Reason => reason.contains(q),
                ReportField::All => {
                    id_match
                        || kind.contains(q)
                        || status.contains(q)
                        || menu.contains(q)
                        || author.contains(q)
                        || reporter.contains(q)
                        || reason.contains(q)
                }
            }
        })
        .cloned()
        .collect()
}

/// Order S3 objects newest first; objects without a time go last.
pub fn sort_s3_objects(objects: &mut [S3Object]) {
    objects.sort_by(|a, b| {
        let a_time = a.last_modified.as_deref().and_then(parse_timestamp);
        let b_time = b.last_modified.as_deref().and_then(parse_timestamp);
        match (a_time, b_time) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
