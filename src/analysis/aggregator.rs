//! Record aggregation.
//!
//! The API reports one record per detection (a post flagged for its title
//! and its image yields two review items; a report produces several
//! notifications). These functions fold such records into one display
//! record per target. All of them are pure and never fail.

use crate::models::{
    non_empty, parse_timestamp, AggregatedDetail, AggregatedModerationItem,
    AggregatedNotification, Notification, NotificationType, ReviewItem, ReviewItemDetail,
};
use std::collections::HashMap;

/// Placeholder title the backend uses for untitled posts.
pub const UNTITLED: &str = "(제목 없음)";

/// Translate a detection component or content type into its display label.
///
/// Case-insensitive. Unknown values pass through unchanged and blank or
/// absent values become `-`. Applying it to its own output is a no-op.
pub fn map_moderation_type(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return "-".to_string();
    };

    let label = match raw.trim().to_uppercase().as_str() {
        "TITLE" => "제목",
        "BODY" | "TEXT" | "CONTENT" => "본문",
        "IMAGE" => "이미지",
        "VIDEO" => "동영상",
        _ => return raw.to_string(),
    };
    label.to_string()
}

/// Grouping key of a review item: comment, then post, then the item itself.
pub fn moderation_group_key(item: &ReviewItem) -> String {
    if let Some(comment_id) = item.comment_id {
        format!("comment-{}", comment_id)
    } else if let Some(post_id) = item.post_id {
        format!("post-{}", post_id)
    } else {
        format!("item-{}", item.id)
    }
}

/// Grouping key of a notification: one per report, one per reviewed target.
pub fn notification_group_key(notification: &Notification) -> String {
    match notification.kind() {
        NotificationType::Report => format!("report-{}", notification.id),
        NotificationType::Other(_) => {
            format!("review-{}", notification.target_id.unwrap_or(notification.id))
        }
    }
}

/// Ordered, deduplicated label list.
#[derive(Debug, Default)]
struct LabelSet(Vec<String>);

impl LabelSet {
    fn insert(&mut self, label: String) {
        if !self.0.contains(&label) {
            self.0.push(label);
        }
    }

    fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    fn into_vec(self) -> Vec<String> {
        self.0
    }
}

fn first_filled<'a>(values: &[&'a Option<String>]) -> Option<&'a str> {
    values.iter().find_map(|v| non_empty(v))
}

fn fill_if_empty(target: &mut Option<String>, candidate: &Option<String>) {
    if non_empty(target).is_none() {
        if let Some(value) = non_empty(candidate) {
            *target = Some(value.to_string());
        }
    }
}

/// Whether `candidate` should replace `current` when the earliest time wins.
fn is_earlier(candidate: &Option<String>, current: &Option<String>) -> bool {
    let Some(candidate) = non_empty(candidate).and_then(parse_timestamp) else {
        return false;
    };
    match non_empty(current).and_then(parse_timestamp) {
        Some(current) => candidate < current,
        None => true,
    }
}

/// Whether `candidate` should replace `current` when the latest time wins.
fn is_later(candidate: &Option<String>, current: &Option<String>) -> bool {
    let Some(candidate) = non_empty(candidate).and_then(parse_timestamp) else {
        return false;
    };
    match non_empty(current).and_then(parse_timestamp) {
        Some(current) => candidate > current,
        None => true,
    }
}

fn moderation_labels(item: &ReviewItem) -> (String, Option<String>) {
    let component = non_empty(&item.detection_component);
    let primary = map_moderation_type(
        component.or_else(|| first_filled(&[&item.detection_type, &item.content_type])),
    );
    let secondary = match component {
        Some(_) => None,
        None => Some(map_moderation_type(first_filled(&[
            &item.content_type,
            &item.detection_type,
        ]))),
    };
    (primary, secondary)
}

/// Fold review items into one row per comment, post or standalone item.
///
/// The earliest creation time wins, the first item carrying a media URL
/// supplies the media fields and the detail id, and text fields are filled
/// left to right (the untitled placeholder counts as empty).
pub fn aggregate_moderation_items(items: &[ReviewItem]) -> Vec<AggregatedModerationItem> {
    let mut order: Vec<(String, ReviewItem, i64, LabelSet)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let key = moderation_group_key(item);
        let (primary, secondary) = moderation_labels(item);

        let Some(&slot) = index.get(&key) else {
            let mut labels = LabelSet::default();
            labels.insert(primary);
            if let Some(secondary) = secondary {
                labels.insert(secondary);
            }
            index.insert(key.clone(), order.len());
            order.push((key, item.clone(), item.id, labels));
            continue;
        };

        let (_, existing, detail_id, labels) = &mut order[slot];

        if is_earlier(&item.created_at, &existing.created_at) {
            existing.created_at = item.created_at.clone();
        }

        let untitled = non_empty(&existing.title).map_or(true, |t| t == UNTITLED);
        if untitled && non_empty(&item.title).is_some() {
            existing.title = item.title.clone();
        }

        if non_empty(&existing.content_url).is_none() && non_empty(&item.content_url).is_some() {
            existing.content_url = item.content_url.clone();
            existing.content_type = item.content_type.clone();
            *detail_id = item.id;
        }

        fill_if_empty(&mut existing.excerpt, &item.excerpt);
        fill_if_empty(&mut existing.author_name, &item.author_name);
        fill_if_empty(&mut existing.main_board_name, &item.main_board_name);
        fill_if_empty(&mut existing.sub_board_name, &item.sub_board_name);

        labels.insert(primary);
        if let Some(secondary) = secondary {
            labels.insert(secondary);
        }
    }

    order
        .into_iter()
        .map(|(group_key, item, detail_id, labels)| {
            let detection_labels = labels.into_vec();
            AggregatedModerationItem {
                detection_summary: detection_labels.join(", "),
                item,
                group_key,
                detail_id,
                detection_labels,
            }
        })
        .collect()
}

fn split_detection_label(label: &Option<String>, into: &mut LabelSet) {
    let Some(raw) = label.as_deref() else {
        return;
    };
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .for_each(|token| into.insert(map_moderation_type(Some(token))));
}

/// Fold notifications into one entry per report or per reviewed target.
///
/// Unlike moderation rows the most recent creation time wins. The merged
/// entry is read only when every constituent is read.
pub fn aggregate_notifications(notifications: &[Notification]) -> Vec<AggregatedNotification> {
    let mut order: Vec<(String, Notification, Vec<i64>, LabelSet)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for notification in notifications {
        let key = notification_group_key(notification);

        let Some(&slot) = index.get(&key) else {
            let mut labels = LabelSet::default();
            split_detection_label(&notification.detection_label, &mut labels);
            index.insert(key.clone(), order.len());
            order.push((key, notification.clone(), vec![notification.id], labels));
            continue;
        };

        let (_, existing, ids, labels) = &mut order[slot];
        ids.push(notification.id);
        split_detection_label(&notification.detection_label, labels);

        if is_later(&notification.created_at, &existing.created_at) {
            existing.created_at = notification.created_at.clone();
        }
        existing.read = existing.read && notification.read;

        fill_if_empty(&mut existing.target_label, &notification.target_label);
        fill_if_empty(&mut existing.summary, &notification.summary);
        fill_if_empty(&mut existing.message, &notification.message);
        fill_if_empty(&mut existing.author_label, &notification.author_label);
        fill_if_empty(&mut existing.board_label, &notification.board_label);
        fill_if_empty(&mut existing.main_board_name, &notification.main_board_name);
        fill_if_empty(&mut existing.sub_board_name, &notification.sub_board_name);
        fill_if_empty(&mut existing.reporter_label, &notification.reporter_label);
        fill_if_empty(&mut existing.link, &notification.link);
    }

    order
        .into_iter()
        .map(|(group_key, mut notification, ids, labels)| {
            let detection_labels = labels.into_vec();
            notification.detection_label = if detection_labels.is_empty() {
                None
            } else {
                Some(detection_labels.join(", "))
            };
            AggregatedNotification {
                notification,
                group_key,
                ids,
                detection_labels,
            }
        })
        .collect()
}

/// The fields of a review record that detail aggregation reads.
struct DetailConstituent<'a> {
    detection_component: &'a Option<String>,
    content_type: &'a Option<String>,
    detection_type: &'a Option<String>,
    detection_labels: &'a [String],
    content_url: &'a Option<String>,
    moderated_text: Option<&'a str>,
    excerpt: Option<&'a str>,
}

impl<'a> From<&'a ReviewItemDetail> for DetailConstituent<'a> {
    fn from(detail: &'a ReviewItemDetail) -> Self {
        Self {
            detection_component: &detail.detection_component,
            content_type: &detail.content_type,
            detection_type: &detail.detection_type,
            detection_labels: &detail.detection_labels,
            content_url: &detail.content_url,
            moderated_text: non_empty(&detail.moderated_text),
            excerpt: None,
        }
    }
}

impl<'a> From<&'a ReviewItem> for DetailConstituent<'a> {
    fn from(item: &'a ReviewItem) -> Self {
        Self {
            detection_component: &item.detection_component,
            content_type: &item.content_type,
            detection_type: &item.detection_type,
            detection_labels: &[],
            content_url: &item.content_url,
            moderated_text: None,
            excerpt: non_empty(&item.excerpt),
        }
    }
}

/// Split a `[COMPONENT] text` prefix. Returns the upper-cased component and
/// the remaining text with leading whitespace removed.
pub fn split_component_prefix(text: &str) -> (Option<String>, &str) {
    let Some(rest) = text.strip_prefix('[') else {
        return (None, text);
    };
    match rest.find(']') {
        Some(end) if end > 0 => (
            Some(rest[..end].to_uppercase()),
            rest[end + 1..].trim_start(),
        ),
        _ => (None, text),
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut set = LabelSet::default();
    values
        .into_iter()
        .filter(|v| !v.is_empty())
        .for_each(|v| set.insert(v));
    set.into_vec()
}

/// Merge a review item detail with the related list entries that refer to
/// the same post or comment.
pub fn aggregate_detail(detail: &ReviewItemDetail, related: &[ReviewItem]) -> AggregatedDetail {
    let post_id = detail.post.as_ref().and_then(|p| p.id);
    let comment_id = detail.comment.as_ref().and_then(|c| c.id);

    let same = related.iter().filter(|item| {
        (post_id.is_some() && item.post_id == post_id)
            || (comment_id.is_some() && item.comment_id == comment_id)
            || item.id == detail.id
    });

    let all: Vec<DetailConstituent<'_>> = std::iter::once(DetailConstituent::from(detail))
        .chain(same.map(DetailConstituent::from))
        .collect();

    let mut labels = LabelSet::default();
    let mut raw_labels = LabelSet::default();
    let mut media_url = non_empty(&detail.content_url).map(str::to_string);
    let mut media_type = detail.content_type.clone();
    let mut title_texts = Vec::new();
    let mut body_texts = Vec::new();

    for item in &all {
        labels.insert(map_moderation_type(first_filled(&[
            item.detection_component,
            item.content_type,
            item.detection_type,
        ])));
        for label in item.detection_labels {
            raw_labels.insert(label.clone());
        }

        let ctype = item
            .content_type
            .as_deref()
            .unwrap_or_default()
            .to_uppercase();
        if media_url.is_none() && (ctype == "IMAGE" || ctype == "VIDEO") {
            if let Some(url) = non_empty(item.content_url) {
                media_url = Some(url.to_string());
                media_type = Some(ctype.clone());
            }
        }

        let (prefix, _) = split_component_prefix(item.moderated_text.unwrap_or_default());
        let component = prefix.unwrap_or(ctype);
        let source = item.moderated_text.or(item.excerpt).unwrap_or_default();
        let (_, cleaned) = split_component_prefix(source);
        if cleaned.is_empty() {
            continue;
        }
        match component.as_str() {
            "TITLE" => title_texts.push(cleaned.to_string()),
            "BODY" | "TEXT" | "CONTENT" => body_texts.push(cleaned.to_string()),
            _ => {}
        }
    }

    let post = detail.post.as_ref();
    if title_texts.is_empty() && labels.contains("제목") {
        if let Some(title) = post.and_then(|p| non_empty(&p.title)) {
            title_texts.push(title.to_string());
        }
    }
    if body_texts.is_empty() && labels.contains("본문") {
        if let Some(content) = post.and_then(|p| non_empty(&p.content)) {
            body_texts.push(content.to_string());
        }
    }

    let flagged_media_urls = dedup(
        all.iter()
            .filter_map(|item| non_empty(item.content_url).map(str::to_string))
            .collect(),
    );

    let detection_labels = labels.into_vec();
    let mut merged = detail.clone();
    merged.detection_labels = detection_labels.clone();

    AggregatedDetail {
        detail: merged,
        detection_summary: detection_labels.join(", "),
        raw_labels: raw_labels.into_vec(),
        media_url,
        media_type,
        title_texts: dedup(title_texts),
        body_texts: dedup(body_texts),
        flagged_media_urls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommentInfo, PostInfo};

    fn review_item(id: i64, post_id: Option<i64>, component: &str, created_at: &str) -> ReviewItem {
        ReviewItem {
            id,
            post_id,
            detection_component: Some(component.to_string()),
            created_at: Some(created_at.to_string()),
            ..Default::default()
        }
    }

    fn notification(id: i64, kind: &str, target_id: Option<i64>, created_at: &str) -> Notification {
        Notification {
            id,
            kind: Some(kind.to_string()),
            target_id,
            created_at: Some(created_at.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_map_moderation_type() {
        assert_eq!(map_moderation_type(Some("IMAGE")), "이미지");
        assert_eq!(map_moderation_type(Some("text")), "본문");
        assert_eq!(map_moderation_type(Some("Body")), "본문");
        assert_eq!(map_moderation_type(Some("CONTENT")), "본문");
        assert_eq!(map_moderation_type(Some("title")), "제목");
        assert_eq!(map_moderation_type(Some("VIDEO")), "동영상");
        assert_eq!(map_moderation_type(Some("POST")), "POST");
        assert_eq!(map_moderation_type(Some("")), "-");
        assert_eq!(map_moderation_type(Some("   ")), "-");
        assert_eq!(map_moderation_type(None), "-");
    }

    #[test]
    fn test_map_moderation_type_idempotent() {
        for raw in ["IMAGE", "TEXT", "TITLE", "VIDEO", "OTHER", ""] {
            let once = map_moderation_type(Some(raw));
            assert_eq!(map_moderation_type(Some(&once)), once);
        }
    }

    #[test]
    fn test_moderation_empty_input() {
        assert!(aggregate_moderation_items(&[]).is_empty());
    }

    #[test]
    fn test_moderation_single_item_keeps_fields() {
        let mut item = review_item(3, Some(9), "IMAGE", "2024-02-01T10:00:00");
        item.title = Some("hello".to_string());
        item.author_name = Some("kim".to_string());

        let result = aggregate_moderation_items(std::slice::from_ref(&item));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item, item);
        assert_eq!(result[0].group_key, "post-9");
        assert_eq!(result[0].detail_id, 3);
        assert_eq!(result[0].detection_labels, vec!["이미지"]);
        assert_eq!(result[0].detection_summary, "이미지");
    }

    #[test]
    fn test_moderation_merges_by_post() {
        let items = vec![
            review_item(1, Some(5), "IMAGE", "2024-01-02"),
            review_item(2, Some(5), "TITLE", "2024-01-01"),
        ];

        let result = aggregate_moderation_items(&items);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].group_key, "post-5");
        assert_eq!(result[0].detection_labels, vec!["이미지", "제목"]);
        assert_eq!(result[0].item.created_at.as_deref(), Some("2024-01-01"));
        assert_eq!(result[0].detection_summary, "이미지, 제목");
    }

    #[test]
    fn test_moderation_earliest_timestamp_wins() {
        let items = vec![
            review_item(1, Some(5), "TITLE", "2024-01-01T08:00:00"),
            review_item(2, Some(5), "BODY", "2024-03-01T08:00:00"),
            review_item(3, Some(5), "IMAGE", "not a date"),
        ];

        let result = aggregate_moderation_items(&items);
        assert_eq!(
            result[0].item.created_at.as_deref(),
            Some("2024-01-01T08:00:00")
        );
    }

    #[test]
    fn test_moderation_group_key_precedence() {
        let items = vec![
            ReviewItem {
                id: 1,
                post_id: Some(5),
                comment_id: Some(8),
                ..Default::default()
            },
            ReviewItem {
                id: 2,
                post_id: Some(5),
                ..Default::default()
            },
            ReviewItem {
                id: 3,
                ..Default::default()
            },
        ];

        let keys: Vec<String> = aggregate_moderation_items(&items)
            .into_iter()
            .map(|a| a.group_key)
            .collect();
        assert_eq!(keys, vec!["comment-8", "post-5", "item-3"]);
    }

    #[test]
    fn test_moderation_secondary_label_without_component() {
        let item = ReviewItem {
            id: 1,
            detection_type: Some("TEXT".to_string()),
            content_type: Some("IMAGE".to_string()),
            ..Default::default()
        };

        let result = aggregate_moderation_items(&[item]);
        assert_eq!(result[0].detection_labels, vec!["본문", "이미지"]);
    }

    #[test]
    fn test_moderation_dedupes_labels_in_first_seen_order() {
        let items = vec![
            review_item(1, Some(5), "BODY", "2024-01-01"),
            review_item(2, Some(5), "IMAGE", "2024-01-01"),
            review_item(3, Some(5), "TEXT", "2024-01-01"),
        ];

        let result = aggregate_moderation_items(&items);
        assert_eq!(result[0].detection_labels, vec!["본문", "이미지"]);
    }

    #[test]
    fn test_moderation_title_placeholder_is_replaced() {
        let mut first = review_item(1, Some(5), "IMAGE", "2024-01-01");
        first.title = Some(UNTITLED.to_string());
        let mut second = review_item(2, Some(5), "TITLE", "2024-01-01");
        second.title = Some("real title".to_string());
        let mut third = review_item(3, Some(5), "BODY", "2024-01-01");
        third.title = Some("later title".to_string());

        let result = aggregate_moderation_items(&[first, second, third]);
        assert_eq!(result[0].item.title.as_deref(), Some("real title"));
    }

    #[test]
    fn test_moderation_first_media_supplies_detail_id() {
        let first = review_item(1, Some(5), "TITLE", "2024-01-01");
        let mut second = review_item(2, Some(5), "IMAGE", "2024-01-01");
        second.content_url = Some("https://cdn/a.png".to_string());
        second.content_type = Some("IMAGE".to_string());
        let mut third = review_item(3, Some(5), "IMAGE", "2024-01-01");
        third.content_url = Some("https://cdn/b.png".to_string());

        let result = aggregate_moderation_items(&[first, second, third]);
        assert_eq!(result[0].detail_id, 2);
        assert_eq!(result[0].item.content_url.as_deref(), Some("https://cdn/a.png"));
        assert_eq!(result[0].item.content_type.as_deref(), Some("IMAGE"));
    }

    #[test]
    fn test_moderation_preserves_first_seen_order() {
        let items = vec![
            review_item(1, Some(2), "TITLE", "2024-01-01"),
            review_item(2, Some(1), "TITLE", "2024-01-01"),
            review_item(3, Some(2), "BODY", "2024-01-01"),
        ];

        let result = aggregate_moderation_items(&items);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].group_key, "post-2");
        assert_eq!(result[1].group_key, "post-1");
    }

    #[test]
    fn test_notifications_empty_input() {
        assert!(aggregate_notifications(&[]).is_empty());
    }

    #[test]
    fn test_notifications_single_item_keeps_fields() {
        let original = Notification {
            id: 7,
            kind: Some("CONTENT_WARNING".to_string()),
            message: Some("유해 콘텐츠가 감지되었습니다.".to_string()),
            target_id: Some(12),
            read: true,
            created_at: Some("2024-01-02T03:04:05".to_string()),
            board_label: Some("자유".to_string()),
            detection_label: Some("IMAGE".to_string()),
            ..Default::default()
        };

        let result = aggregate_notifications(std::slice::from_ref(&original));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].group_key, "review-12");
        assert_eq!(result[0].ids, vec![7]);
        assert_eq!(result[0].detection_labels, vec!["이미지".to_string()]);

        let expected = Notification {
            detection_label: Some("이미지".to_string()),
            ..original
        };
        assert_eq!(result[0].notification, expected);
    }

    #[test]
    fn test_notifications_latest_timestamp_wins() {
        let items = vec![
            notification(1, "CONTENT_WARNING", Some(40), "2024-01-01T00:00:00"),
            notification(2, "CONTENT_WARNING", Some(40), "2024-01-03T00:00:00"),
            notification(3, "CONTENT_WARNING", Some(40), "2024-01-02T00:00:00"),
        ];

        let result = aggregate_notifications(&items);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].group_key, "review-40");
        assert_eq!(result[0].ids, vec![1, 2, 3]);
        assert_eq!(
            result[0].notification.created_at.as_deref(),
            Some("2024-01-03T00:00:00")
        );
    }

    #[test]
    fn test_notifications_reports_never_merge() {
        let items = vec![
            notification(1, "REPORT", Some(40), "2024-01-01"),
            notification(2, "REPORT", Some(40), "2024-01-02"),
        ];

        let result = aggregate_notifications(&items);
        let keys: Vec<&str> = result.iter().map(|a| a.group_key.as_str()).collect();
        assert_eq!(keys, vec!["report-1", "report-2"]);
    }

    #[test]
    fn test_notifications_fall_back_to_own_id() {
        let result = aggregate_notifications(&[notification(7, "WARNING", None, "2024-01-01")]);
        assert_eq!(result[0].group_key, "review-7");
    }

    #[test]
    fn test_notifications_merge_detection_labels() {
        let mut first = notification(1, "CONTENT_WARNING", Some(4), "2024-01-01");
        first.detection_label = Some("IMAGE, TITLE".to_string());
        let mut second = notification(2, "CONTENT_WARNING", Some(4), "2024-01-02");
        second.detection_label = Some("title,,VIDEO ".to_string());

        let result = aggregate_notifications(&[first, second]);
        assert_eq!(result[0].detection_labels, vec!["이미지", "제목", "동영상"]);
        assert_eq!(
            result[0].notification.detection_label.as_deref(),
            Some("이미지, 제목, 동영상")
        );
    }

    #[test]
    fn test_notifications_left_biased_fallback() {
        let first = notification(1, "CONTENT_WARNING", Some(4), "2024-01-01");
        let mut second = notification(2, "CONTENT_WARNING", Some(4), "2024-01-02");
        second.summary = Some("second summary".to_string());
        second.target_label = Some("post #4".to_string());
        let mut third = notification(3, "CONTENT_WARNING", Some(4), "2024-01-02");
        third.summary = Some("third summary".to_string());

        let result = aggregate_notifications(&[first, second, third]);
        let merged = &result[0].notification;
        assert_eq!(merged.summary.as_deref(), Some("second summary"));
        assert_eq!(merged.target_label.as_deref(), Some("post #4"));
    }

    #[test]
    fn test_notifications_read_only_when_all_read() {
        let mut first = notification(1, "CONTENT_WARNING", Some(4), "2024-01-01");
        first.read = true;
        let second = notification(2, "CONTENT_WARNING", Some(4), "2024-01-02");

        let result = aggregate_notifications(&[first, second]);
        assert!(!result[0].notification.read);
    }

    #[test]
    fn test_split_component_prefix() {
        assert_eq!(
            split_component_prefix("[title]  Hello"),
            (Some("TITLE".to_string()), "Hello")
        );
        assert_eq!(split_component_prefix("no prefix"), (None, "no prefix"));
        assert_eq!(split_component_prefix("[] empty"), (None, "[] empty"));
        assert_eq!(split_component_prefix("[open"), (None, "[open"));
    }

    #[test]
    fn test_aggregate_detail_merges_related() {
        let detail = ReviewItemDetail {
            id: 10,
            content_type: Some("TEXT".to_string()),
            moderated_text: Some("[TITLE] bad words".to_string()),
            detection_labels: vec!["Profanity".to_string()],
            post: Some(PostInfo {
                id: Some(5),
                title: Some("bad words".to_string()),
                content: Some("post body".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let related = vec![
            ReviewItem {
                id: 11,
                post_id: Some(5),
                content_type: Some("IMAGE".to_string()),
                content_url: Some("https://cdn/x.png".to_string()),
                ..Default::default()
            },
            ReviewItem {
                id: 12,
                post_id: Some(5),
                detection_component: Some("BODY".to_string()),
                content_type: Some("TEXT".to_string()),
                ..Default::default()
            },
            ReviewItem {
                id: 99,
                post_id: Some(6),
                detection_component: Some("VIDEO".to_string()),
                ..Default::default()
            },
        ];

        let aggregated = aggregate_detail(&detail, &related);
        assert_eq!(
            aggregated.detail.detection_labels,
            vec!["본문", "이미지"]
        );
        assert_eq!(aggregated.detection_summary, "본문, 이미지");
        assert_eq!(aggregated.raw_labels, vec!["Profanity"]);
        assert_eq!(aggregated.media_url.as_deref(), Some("https://cdn/x.png"));
        assert_eq!(aggregated.media_type.as_deref(), Some("IMAGE"));
        assert_eq!(aggregated.title_texts, vec!["bad words"]);
        assert_eq!(aggregated.body_texts, vec!["post body"]);
        assert_eq!(aggregated.flagged_media_urls, vec!["https://cdn/x.png"]);
    }

    #[test]
    fn test_aggregate_detail_matches_comment_and_id() {
        let detail = ReviewItemDetail {
            id: 20,
            content_type: Some("TEXT".to_string()),
            comment: Some(CommentInfo {
                id: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        };
        let related = vec![
            ReviewItem {
                id: 21,
                comment_id: Some(3),
                content_type: Some("TEXT".to_string()),
                excerpt: Some("[BODY] rude reply".to_string()),
                ..Default::default()
            },
            ReviewItem {
                id: 20,
                content_type: Some("TEXT".to_string()),
                excerpt: Some("[BODY] rude reply".to_string()),
                ..Default::default()
            },
            ReviewItem {
                id: 22,
                comment_id: Some(4),
                content_type: Some("IMAGE".to_string()),
                ..Default::default()
            },
        ];

        let aggregated = aggregate_detail(&detail, &related);
        assert_eq!(aggregated.detail.detection_labels, vec!["본문"]);
        assert_eq!(aggregated.body_texts, vec!["rude reply"]);
        assert!(aggregated.media_url.is_none());
    }

    #[test]
    fn test_aggregate_detail_without_related() {
        let detail = ReviewItemDetail {
            id: 1,
            ..Default::default()
        };
        let aggregated = aggregate_detail(&detail, &[]);
        assert_eq!(aggregated.detail.detection_labels, vec!["-"]);
        assert!(aggregated.title_texts.is_empty());
        assert!(aggregated.flagged_media_urls.is_empty());
    }
}
