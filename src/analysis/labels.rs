//! Display label helpers shared by filters and views.

use crate::models::{non_empty, parse_timestamp, Notification, NotificationType};
use chrono::Timelike;

/// Fallback shown when a record carries no board names.
pub const UNKNOWN_BOARD: &str = "게시판 미확인";

/// `main / sub`, either name alone, or the fallback.
pub fn format_board_label(main: Option<&str>, sub: Option<&str>, fallback: &str) -> String {
    let main = main.filter(|m| !m.is_empty());
    let sub = sub.filter(|s| !s.is_empty());
    match (main, sub) {
        (Some(main), Some(sub)) => format!("{} / {}", main, sub),
        (Some(main), None) => main.to_string(),
        (None, Some(sub)) => sub.to_string(),
        (None, None) => fallback.to_string(),
    }
}

/// Format a wire timestamp the way the Korean locale prints it,
/// e.g. `2024. 1. 2. 오후 3:04:05`.
///
/// Absent values become `-`; unparsable values are returned as-is.
pub fn format_datetime(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return "-".to_string();
    };
    let Some(dt) = parse_timestamp(raw) else {
        return raw.to_string();
    };

    let (pm, hour) = dt.hour12();
    format!(
        "{} {} {}:{:02}:{:02}",
        dt.format("%Y. %-m. %-d."),
        if pm { "오후" } else { "오전" },
        hour,
        dt.minute(),
        dt.second()
    )
}

/// Date part only, e.g. `2024. 1. 2.`
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return "-".to_string();
    };
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%Y. %-m. %-d.").to_string(),
        None => raw.to_string(),
    }
}

pub fn translate_report_status(status: Option<&str>) -> String {
    match status {
        Some("PENDING") => "대기".to_string(),
        Some("ACTION_TAKEN") => "조치 완료".to_string(),
        Some("REJECTED") => "기각".to_string(),
        Some(other) if !other.is_empty() => other.to_string(),
        _ => "-".to_string(),
    }
}

pub fn translate_report_type(kind: Option<&str>) -> String {
    match kind {
        Some("COMMENT") => "댓글".to_string(),
        Some("POST") => "게시글".to_string(),
        Some(other) if !other.is_empty() => other.to_string(),
        _ => "-".to_string(),
    }
}

pub fn translate_post_status(status: Option<&str>) -> String {
    match status {
        Some("PUBLISHED") => "게시".to_string(),
        Some("HIDDEN") => "숨김".to_string(),
        Some("REPORTED") => "신고됨".to_string(),
        Some("REMOVED") => "삭제".to_string(),
        Some(other) if !other.is_empty() => other.to_string(),
        _ => "-".to_string(),
    }
}

/// Badge label and detection label of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMeta {
    pub label: &'static str,
    pub detection_label: Option<String>,
}

pub fn notification_type_meta(notification: &Notification) -> NotificationMeta {
    match notification.kind() {
        NotificationType::Report => NotificationMeta {
            label: "신고",
            detection_label: None,
        },
        NotificationType::Other(_) => NotificationMeta {
            label: "유해 감지",
            detection_label: non_empty(&notification.detection_label).map(str::to_string),
        },
    }
}

/// Unread badge text; hidden at zero and capped at `99+`.
pub fn format_badge_count(count: u64) -> Option<String> {
    match count {
        0 => None,
        1..=99 => Some(count.to_string()),
        _ => Some("99+".to_string()),
    }
}

/// URL of the Grafana dashboard proxied through the admin API.
pub fn grafana_proxy_url(base_url: &str, path: &str, query: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim();
    let mut url = format!("{}/api/admin/monitoring/grafana/proxy", base);
    if !path.is_empty() {
        if !path.starts_with('/') {
            url.push('/');
        }
        url.push_str(path);
    }
    if let Some(query) = query.map(|q| q.trim_start_matches('?')).filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}
