//! Admin console screens.

use super::{Card, Field, ListItem, Page, Section, Table};
use crate::actions::ActionResult;
use crate::analysis::{
    format_badge_count, format_board_label, format_date, format_datetime, map_moderation_type,
    notification_type_meta, translate_post_status, translate_report_status,
    translate_report_type, UNKNOWN_BOARD, UNTITLED,
};
use crate::models::{
    non_empty, AdminPost, AdminPostDetail, AggregatedDetail, AggregatedModerationItem,
    AggregatedNotification, CommentInfo, DashboardStats, MonitoringMetrics, Notice, PostInfo,
    RekognitionLabel, ReportDetail, ReportSummary, S3Object, SessionUser, UserDetail,
    UserSummary,
};
use crate::upload::UploadedFile;

pub const NO_SEARCH_RESULTS: &str = "검색 결과가 없습니다.";
pub const NO_DATA: &str = "데이터가 없습니다.";
pub const NO_RESULT: &str = "결과가 없습니다.";
const UNKNOWN_AUTHOR: &str = "알 수 없음";

/// Empty-state message of a filtered list: the list's own message when the
/// API returned nothing, otherwise the search message.
fn empty_message(fetched: usize, when_empty: &str) -> &str {
    if fetched == 0 {
        when_empty
    } else {
        NO_SEARCH_RESULTS
    }
}

fn or_dash(value: &Option<String>) -> String {
    non_empty(value).unwrap_or("-").to_string()
}

fn or_default(value: &Option<String>, fallback: &str) -> String {
    non_empty(value).unwrap_or(fallback).to_string()
}

fn title_or_untitled(value: &Option<String>) -> String {
    or_default(value, UNTITLED)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "예"
    } else {
        "아니오"
    }
}

/// `1234567` → `1,234,567`.
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub fn dashboard_page(stats: &DashboardStats, unread: u64) -> Page {
    let mut title = "대시보드".to_string();
    if let Some(badge) = format_badge_count(unread) {
        title.push_str(&format!(" (알림 {})", badge));
    }

    let mut page = Page::new(title).section(Section::Cards {
        heading: None,
        cards: vec![
            Card::new("총 사용자", stats.total_users),
            Card::new("활성 사용자", stats.active_users),
            Card::new("차단 사용자", stats.blocked_users),
            Card::new("유해 게시물", stats.harmful_posts),
        ],
    });

    let mut signups = Table::new(&["날짜", "일별 가입자 수"], NO_DATA);
    for point in &stats.daily_signups {
        signups.row(vec![point.date.clone(), point.count.to_string()]);
    }
    page.push(Section::table(Some("일별 가입자 수"), signups));

    let mut categories = Table::new(&["카테고리", "게시글 수"], NO_DATA);
    for entry in &stats.category_distribution {
        categories.row(vec![entry.label.clone(), entry.count.to_string()]);
    }
    page.push(Section::table(Some("카테고리 분포"), categories));

    let count_of = |label: &str| {
        stats
            .detection_counts
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.count)
            .unwrap_or(0)
    };
    let mut detection = Table::new(&["구분", "게시글 수"], NO_DATA);
    detection.row(vec!["Clean".to_string(), count_of("Clean").to_string()]);
    detection.row(vec![
        "Harmful".to_string(),
        count_of("Harmful Detected").to_string(),
    ]);
    page.push(Section::table(Some("유해 감지 현황"), detection));

    let mut metrics = Table::new(&["시각", "CPU (%)", "메모리 (MB)"], NO_DATA);
    for point in &stats.system_metrics {
        let time = point
            .timestamp
            .as_deref()
            .and_then(|t| t.get(11..16))
            .unwrap_or_default()
            .to_string();
        metrics.row(vec![
            time,
            format!("{:.2}", point.cpu_usage_percent),
            format!("{:.1}", point.memory_usage_mb),
        ]);
    }
    page.push(Section::table(Some("시스템 지표"), metrics));

    page
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

pub fn moderation_page(fetched: usize, items: &[AggregatedModerationItem]) -> Page {
    let mut table = Table::new(
        &["ID", "제목", "감지 타입", "메뉴", "작성자", "감지 시각"],
        empty_message(fetched, "대기 중인 항목이 없습니다."),
    );

    for item in items {
        let detection = if item.detection_summary.is_empty() {
            non_empty(&item.item.detection_type)
                .or_else(|| non_empty(&item.item.content_type))
                .unwrap_or("-")
                .to_string()
        } else {
            item.detection_summary.clone()
        };
        table.row(vec![
            format!("#{}", item.detail_id),
            title_or_untitled(&item.item.title),
            detection,
            format_board_label(
                item.item.main_board_name.as_deref(),
                item.item.sub_board_name.as_deref(),
                UNKNOWN_BOARD,
            ),
            or_default(&item.item.author_name, UNKNOWN_AUTHOR),
            format_datetime(item.item.created_at.as_deref()),
        ]);
    }

    Page::new("콘텐츠 검토").section(Section::table(None, table))
}

pub fn moderation_detail_page(detail: &AggregatedDetail) -> Page {
    let raw = &detail.detail;
    let post = raw.post.as_ref();

    let mut fields = vec![
        Field::new("ID", format!("#{}", raw.id)),
        Field::new("감지 타입", &detail.detection_summary),
        Field::new("검토 상태", or_dash(&raw.review_status)),
        Field::new("감지 시각", format_datetime(raw.created_at.as_deref())),
    ];
    if let Some(post) = post {
        fields.push(Field::new("게시글", title_or_untitled(&post.title)));
        fields.push(Field::new(
            "메뉴",
            format_board_label(
                post.main_board_name.as_deref(),
                post.sub_board_name.as_deref(),
                UNKNOWN_BOARD,
            ),
        ));
        fields.push(Field::new(
            "작성자",
            or_default(&post.author_name, UNKNOWN_AUTHOR),
        ));
    }
    if let Some(comment) = raw.comment.as_ref() {
        fields.push(Field::new(
            "댓글 작성자",
            or_default(&comment.author_name, UNKNOWN_AUTHOR),
        ));
    }
    if !detail.raw_labels.is_empty() {
        fields.push(Field::new("감지 레이블", detail.raw_labels.join(", ")));
    }

    let mut page = Page::new(format!("검토 항목 #{}", raw.id)).section(Section::fields(None, fields));

    let mut detection = Vec::new();
    for text in &detail.title_texts {
        detection.push(ListItem {
            depth: 0,
            text: format!("[제목] {}", text),
        });
    }
    for text in &detail.body_texts {
        detection.push(ListItem {
            depth: 0,
            text: format!("[본문] {}", text),
        });
    }
    page.push(Section::List {
        heading: Some("감지 텍스트".to_string()),
        items: detection,
        empty_message: "표시할 감지 텍스트가 없습니다.".to_string(),
    });

    let mut media: Vec<ListItem> = Vec::new();
    if let Some(ref url) = detail.media_url {
        let kind = detail.media_type.as_deref().unwrap_or("-");
        media.push(ListItem {
            depth: 0,
            text: format!("{} ({})", url, kind),
        });
    }
    for url in &detail.flagged_media_urls {
        if detail.media_url.as_deref() != Some(url.as_str()) {
            media.push(ListItem {
                depth: 0,
                text: url.clone(),
            });
        }
    }
    page.push(Section::List {
        heading: Some("미디어".to_string()),
        items: media,
        empty_message: "미디어가 없습니다.".to_string(),
    });

    page.push(Section::text(
        "콘텐츠",
        non_empty(&raw.moderated_text)
            .or_else(|| post.and_then(|p| non_empty(&p.content)))
            .unwrap_or("콘텐츠 정보를 불러올 수 없습니다."),
    ));
    page.push(Section::text(
        "모더레이션 결과",
        or_default(&raw.moderation_result, NO_RESULT),
    ));

    page
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

pub fn posts_page(fetched: usize, posts: &[AdminPost]) -> Page {
    let mut table = Table::new(
        &["ID", "제목", "메뉴", "작성자", "작성 시각", "상태"],
        empty_message(fetched, "게시글이 없습니다."),
    );

    for post in posts {
        table.row(vec![
            format!("#{}", post.id),
            title_or_untitled(&post.title),
            format_board_label(
                post.main_board_name.as_deref(),
                post.sub_board_name.as_deref(),
                "-",
            ),
            or_default(&post.author, "익명"),
            format_datetime(post.created_at.as_deref()),
            translate_post_status(post.status.as_deref()),
        ]);
    }

    Page::new("게시글 관리").section(Section::table(None, table))
}

pub fn post_detail_page(post: &AdminPostDetail) -> Page {
    let fields = vec![
        Field::new("ID", format!("#{}", post.id)),
        Field::new("제목", title_or_untitled(&post.title)),
        Field::new(
            "메뉴",
            format_board_label(
                post.main_board_name.as_deref(),
                post.sub_board_name.as_deref(),
                "-",
            ),
        ),
        Field::new("탭", or_dash(&post.tab_item)),
        Field::new("작성자", or_default(&post.author_username, "익명")),
        Field::new("작성 시각", format_datetime(post.created_at.as_deref())),
        Field::new("상태", translate_post_status(post.status.as_deref())),
        Field::new("모더레이션", or_dash(&post.moderation_status)),
        Field::new("유해", yes_no(post.harmful)),
        Field::new("차단", yes_no(post.blocked)),
        Field::new("조회수", post.view_count),
    ];

    let mut page = Page::new(format!("게시글 #{}", post.id))
        .section(Section::fields(None, fields))
        .section(Section::text("본문", or_default(&post.content, "-")));

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
        empty_message: "첨부 파일 없음".to_string(),
    });

    let mut images = Table::new(&["이미지", "유해 감지", "결과"], NO_DATA);
    for image in &post.image_moderations {
        images.row(vec![
            or_dash(&image.image_url),
            yes_no(image.inappropriate_detected).to_string(),
            or_dash(&image.moderation_result),
        ]);
    }
    page.push(Section::table(Some("이미지 모더레이션"), images));

    let text_moderation = post
        .text_moderation
        .as_ref()
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::to_string_pretty(v).ok())
        .map(|json| format!("```json\n{}\n```", json))
        .unwrap_or_else(|| "텍스트 모더레이션 데이터가 없습니다.".to_string());
    page.push(Section::text("텍스트 모더레이션", text_moderation));

    let mut comments = Table::new(&["ID", "작성자", "내용", "차단", "작성 시각"], "댓글이 없습니다.");
    for comment in &post.comments {
        comments.row(vec![
            format!("#{}", comment.id),
            or_default(&comment.author_username, "익명"),
            or_dash(&comment.content),
            yes_no(comment.blocked).to_string(),
            format_datetime(comment.created_at.as_deref()),
        ]);
    }
    page.push(Section::table(Some("댓글"), comments));

    page
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

fn notice_title(notice: &Notice) -> String {
    let mut title = title_or_untitled(&notice.title);
    if notice.pinned {
        title = format!("[고정] {}", title);
    }
    if !notice.attachment_urls.is_empty() {
        title.push_str(" 📎");
    }
    title
}

pub fn notices_page(fetched: usize, notices: &[Notice]) -> Page {
    let mut table = Table::new(
        &["ID", "제목", "작성자", "작성일"],
        empty_message(fetched, "공지사항이 없습니다."),
    );

    for notice in notices {
        table.row(vec![
            format!("#{}", notice.id),
            notice_title(notice),
            or_default(&notice.author, "관리자"),
            format_datetime(notice.created_at.as_deref()),
        ]);
    }

    Page::new("공지사항 관리").section(Section::table(None, table))
}

pub fn notice_detail_page(notice: &Notice) -> Page {
    let fields = vec![
        Field::new("ID", format!("#{}", notice.id)),
        Field::new("작성자", or_default(&notice.author, "관리자")),
        Field::new("작성일", format_datetime(notice.created_at.as_deref())),
        Field::new("수정일", format_datetime(notice.updated_at.as_deref())),
        Field::new("상단 고정", yes_no(notice.pinned)),
    ];

    Page::new(notice_title(notice))
        .section(Section::fields(None, fields))
        .section(Section::text("내용", or_default(&notice.content, "내용이 없습니다.")))
        .section(Section::List {
            heading: Some("첨부 파일".to_string()),
            items: notice
                .attachment_urls
                .iter()
                .map(|url| ListItem {
                    depth: 0,
                    text: url.clone(),
                })
                .collect(),
            empty_message: "첨부 파일 없음".to_string(),
        })
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub fn users_page(users: &[UserSummary]) -> Page {
    let mut table = Table::new(
        &["ID", "아이디", "닉네임", "상태", "가입일"],
        "사용자가 없습니다.",
    );

    for user in users {
        table.row(vec![
            format!("#{}", user.id),
            or_dash(&user.username),
            or_dash(&user.nickname),
            or_dash(&user.status),
            format_date(user.created_at.as_deref()),
        ]);
    }

    Page::new("사용자 관리").section(Section::table(None, table))
}

pub fn user_detail_page(user: &UserDetail, posts: &[AdminPost]) -> Page {
    let fields = vec![
        Field::new("ID", format!("#{}", user.id)),
        Field::new("아이디", or_dash(&user.username)),
        Field::new("닉네임", or_dash(&user.nickname)),
        Field::new("이메일", or_dash(&user.email)),
        Field::new("상태", or_dash(&user.status)),
        Field::new("활성화", yes_no(user.enabled)),
        Field::new("경고 횟수", user.warn_count.unwrap_or(0)),
        Field::new("가입일", format_datetime(user.created_at.as_deref())),
        Field::new("최근 제재", format_datetime(user.last_sanction_at.as_deref())),
        Field::new("정지일", format_datetime(user.suspended_at.as_deref())),
        Field::new("게시글 수", user.post_count),
        Field::new("댓글 수", user.comment_count),
        Field::new("신고 수", user.report_count),
    ];

    let mut table = Table::new(&["ID", "제목", "상태", "작성 시각"], "작성한 게시글이 없습니다.");
    for post in posts {
        table.row(vec![
            format!("#{}", post.id),
            title_or_untitled(&post.title),
            translate_post_status(post.status.as_deref()),
            format_datetime(post.created_at.as_deref()),
        ]);
    }

    Page::new(format!("사용자 #{}", user.id))
        .section(Section::fields(None, fields))
        .section(Section::table(Some("작성한 게시글"), table))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

pub fn reports_page(fetched: usize, reports: &[ReportSummary]) -> Page {
    let mut table = Table::new(
        &["ID", "유형", "상태", "메뉴", "작성자", "신고자", "사유", "신고 시각"],
        empty_message(fetched, "등록된 신고가 없습니다."),
    );

    for report in reports {
        table.row(vec![
            format!("#{}", report.id),
            translate_report_type(report.kind.as_deref()),
            translate_report_status(report.status.as_deref()),
            format_board_label(
                report.main_board_name.as_deref(),
                report.sub_board_name.as_deref(),
                "-",
            ),
            or_default(&report.author_name, "작성자 미확인"),
            or_default(&report.reporter_name, "신고자 미확인"),
            or_dash(&report.reason),
            format_datetime(report.created_at.as_deref()),
        ]);
    }

    Page::new("신고 관리").section(Section::table(None, table))
}

fn post_info_fields(post: &PostInfo) -> Vec<Field> {
    vec![
        Field::new("ID", post.id.map(|id| format!("#{}", id)).unwrap_or_else(|| "-".to_string())),
        Field::new("제목", title_or_untitled(&post.title)),
        Field::new(
            "메뉴",
            format_board_label(
                post.main_board_name.as_deref(),
                post.sub_board_name.as_deref(),
                "-",
            ),
        ),
        Field::new("작성자", or_default(&post.author_name, "작성자 미확인")),
        Field::new("작성 시각", format_datetime(post.created_at.as_deref())),
        Field::new("본문", or_dash(&post.content)),
    ]
}

fn comment_info_fields(comment: &CommentInfo) -> Vec<Field> {
    vec![
        Field::new(
            "ID",
            comment.id.map(|id| format!("#{}", id)).unwrap_or_else(|| "-".to_string()),
        ),
        Field::new("작성자", or_default(&comment.author_name, "작성자 미확인")),
        Field::new("작성 시각", format_datetime(comment.created_at.as_deref())),
        Field::new("내용", or_dash(&comment.content)),
    ]
}

pub fn report_detail_page(report: &ReportDetail) -> Page {
    let reporter = non_empty(&report.reporter_name)
        .or_else(|| non_empty(&report.reporter_username))
        .unwrap_or("신고자 미확인");
    let fields = vec![
        Field::new("ID", format!("#{}", report.id)),
        Field::new("유형", translate_report_type(report.kind.as_deref())),
        Field::new("상태", translate_report_status(report.status.as_deref())),
        Field::new("조치", or_dash(&report.action)),
        Field::new("신고자", reporter),
        Field::new("사유", or_dash(&report.reason)),
        Field::new("관리자 메모", or_dash(&report.admin_note)),
        Field::new("신고 시각", format_datetime(report.created_at.as_deref())),
        Field::new("처리 시각", format_datetime(report.processed_at.as_deref())),
    ];

    let mut page = Page::new(format!("신고 #{}", report.id)).section(Section::fields(None, fields));

    match report.post.as_ref() {
        Some(post) => page.push(Section::fields(Some("관련 게시글"), post_info_fields(post))),
        None => page.push(Section::text("관련 게시글", "관련 게시글이 없습니다.")),
    }
    match report.comment.as_ref() {
        Some(comment) => page.push(Section::fields(
            Some("관련 댓글"),
            comment_info_fields(comment),
        )),
        None => page.push(Section::text("관련 댓글", "관련 댓글이 없습니다.")),
    }

    page
}

// ---------------------------------------------------------------------------
// Monitoring
// ---------------------------------------------------------------------------

pub fn monitoring_cards(metrics: &MonitoringMetrics) -> Vec<Card> {
    vec![
        Card::new("CPU 사용률", format!("{:.2}%", metrics.cpu_usage * 100.0)),
        Card::new(
            "메모리 사용량",
            format!("{:.1} MB", metrics.memory_usage_bytes / (1024.0 * 1024.0)),
        ),
        Card::new(
            "요청 수",
            format!("{} 건", group_thousands(metrics.request_count.round() as i64)),
        ),
        Card::new("에러율", format!("{:.2}%", metrics.error_rate * 100.0)),
        Card::new(
            "오늘 감지된 유해 게시물",
            format!("{} 건", metrics.harmful_posts_today),
        ),
        Card::new("EC2 상태", or_default(&metrics.ec2_status, "UNKNOWN")),
        Card::new("RDS 상태", or_default(&metrics.rds_status, "UNKNOWN")),
    ]
}

/// Monitoring overview. `objects` are expected newest first.
pub fn monitoring_page(metrics: Option<&MonitoringMetrics>, objects: &[S3Object]) -> Page {
    let mut page = Page::new("모니터링");

    match metrics {
        Some(metrics) => page.push(Section::Cards {
            heading: Some("시스템 상태".to_string()),
            cards: monitoring_cards(metrics),
        }),
        None => page.push(Section::message("모니터링 데이터를 불러오지 못했습니다.")),
    }

    let mut table = Table::new(&["키", "크기", "수정 시각"], "표시할 파일이 없습니다.");
    for object in objects {
        table.row(vec![
            if object.key.is_empty() {
                "-".to_string()
            } else {
                object.key.clone()
            },
            format!("{:.2} KB", object.size as f64 / 1024.0),
            format_datetime(object.last_modified.as_deref()),
        ]);
    }
    page.push(Section::table(Some("S3 객체"), table));

    page
}

pub fn rekognition_page(object_key: &str, labels: &[RekognitionLabel]) -> Page {
    let mut table = Table::new(&["레이블", "신뢰도"], "유해 요소가 감지되지 않았습니다.");
    for label in labels {
        table.row(vec![label.name.clone(), format!("{:.2}%", label.confidence)]);
    }

    Page::new("Rekognition 분석")
        .section(Section::fields(None, vec![Field::new("객체", object_key)]))
        .section(Section::table(None, table))
}

pub fn grafana_page(url: &str) -> Page {
    Page::new("Grafana").section(Section::fields(None, vec![Field::new("URL", url)]))
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

fn notification_item(item: &AggregatedNotification) -> ListItem {
    let n = &item.notification;
    let meta = notification_type_meta(n);

    let mut tags = vec![format!("[{}]", meta.label)];
    if item.detection_labels.is_empty() {
        let chip = map_moderation_type(meta.detection_label.as_deref());
        if chip != "-" {
            tags.push(format!("[{}]", chip));
        }
    } else {
        tags.extend(item.detection_labels.iter().map(|l| format!("[{}]", l)));
    }
    tags.push(format_board_label(
        n.main_board_name.as_deref(),
        n.sub_board_name.as_deref(),
        non_empty(&n.board_label).unwrap_or(UNKNOWN_BOARD),
    ));

    let headline = non_empty(&n.target_label)
        .or_else(|| non_empty(&n.summary))
        .or_else(|| non_empty(&n.message))
        .unwrap_or("알림");
    let body = non_empty(&n.summary)
        .or_else(|| non_empty(&n.message))
        .unwrap_or("-");

    let mut meta_line = vec![format!(
        "작성자: {}",
        non_empty(&n.author_label).unwrap_or(UNKNOWN_AUTHOR)
    )];
    if let Some(reporter) = non_empty(&n.reporter_label) {
        meta_line.push(format!("신고자: {}", reporter));
    }
    meta_line.push(format_datetime(n.created_at.as_deref()));
    meta_line.push(if n.read { "읽음" } else { "안 읽음" }.to_string());
    let ids: Vec<String> = item.ids.iter().map(|id| id.to_string()).collect();
    meta_line.push(format!("ID: {}", ids.join(",")));

    ListItem {
        depth: 0,
        text: format!(
            "{} **{}**\n{}\n{}",
            tags.join(" "),
            headline,
            body,
            meta_line.join(" · ")
        ),
    }
}

pub fn notifications_page(items: &[AggregatedNotification], unread: u64) -> Page {
    let title = match format_badge_count(unread) {
        Some(badge) => format!("알림 ({})", badge),
        None => "알림".to_string(),
    };

    Page::new(title).section(Section::List {
        heading: None,
        items: items.iter().map(notification_item).collect(),
        empty_message: "새 알림이 없습니다.".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Session, actions and uploads
// ---------------------------------------------------------------------------

pub fn user_page(title: &str, user: &SessionUser) -> Page {
    let fields = vec![
        Field::new("이름", user.display_name("사용자")),
        Field::new("아이디", or_dash(&user.username)),
        Field::new("이메일", or_dash(&user.email)),
        Field::new("권한", or_dash(&user.role)),
        Field::new("상태", or_dash(&user.status)),
        Field::new("가입일", format_date(user.created_at.as_deref())),
    ];
    Page::new(format!("{} [{}]", title, user.initial())).section(Section::fields(None, fields))
}

pub fn action_page(title: &str, results: &[ActionResult]) -> Page {
    let mut page = Page::new(title);
    for result in results {
        let text = if result.success {
            format!("✅ {}", result.message)
        } else {
            format!("❌ {}", result.error.as_deref().unwrap_or("처리에 실패했습니다."))
        };
        page.push(Section::message(text));
    }
    page
}

pub fn message_page(title: &str, message: &str) -> Page {
    Page::new(title).section(Section::message(message))
}

pub fn uploads_page(files: &[UploadedFile]) -> Page {
    let mut table = Table::new(&["파일", "URL"], "업로드한 파일이 없습니다.");
    for file in files {
        table.row(vec![file.name.clone(), file.url.clone()]);
    }
    Page::new("업로드").section(Section::table(None, table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{aggregate_moderation_items, aggregate_notifications};
    use crate::models::{DailySignup, LabelCount, Notification, ReviewItem};
    use crate::view::render_markdown;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-1000), "-1,000");
    }

    #[test]
    fn test_dashboard_cards_and_series() {
        let stats = DashboardStats {
            total_users: 10,
            active_users: 8,
            blocked_users: 2,
            harmful_posts: 3,
            daily_signups: vec![DailySignup {
                date: "2024-01-01".to_string(),
                count: 4,
            }],
            detection_counts: vec![LabelCount {
                label: "Harmful Detected".to_string(),
                count: 7,
            }],
            ..Default::default()
        };

        let page = dashboard_page(&stats, 120);
        assert_eq!(page.title, "대시보드 (알림 99+)");
        match &page.sections[0] {
            Section::Cards { cards, .. } => {
                assert_eq!(cards[0], Card::new("총 사용자", 10));
                assert_eq!(cards[3], Card::new("유해 게시물", 3));
            }
            other => panic!("unexpected section {:?}", other),
        }

        let md = render_markdown(&page);
        assert!(md.contains("| 2024-01-01 | 4 |"));
        assert!(md.contains("| Harmful | 7 |"));
        assert!(md.contains("| Clean | 0 |"));
    }

    #[test]
    fn test_monitoring_cards_formatting() {
        let metrics = MonitoringMetrics {
            cpu_usage: 0.4567,
            memory_usage_bytes: 1024.0 * 1024.0 * 512.5,
            request_count: 12345.6,
            error_rate: 0.01,
            harmful_posts_today: 4,
            ec2_status: Some("running".to_string()),
            rds_status: None,
        };
        let values: Vec<String> = monitoring_cards(&metrics).into_iter().map(|c| c.value).collect();
        assert_eq!(
            values,
            vec!["45.67%", "512.5 MB", "12,346 건", "1.00%", "4 건", "running", "UNKNOWN"]
        );
    }

    #[test]
    fn test_moderation_page_rows_and_empty_states() {
        let items = aggregate_moderation_items(&[ReviewItem {
            id: 1,
            post_id: Some(5),
            detection_component: Some("IMAGE".to_string()),
            title: Some("제목".to_string()),
            created_at: Some("2024-01-02T15:04:05".to_string()),
            ..Default::default()
        }]);
        let md = render_markdown(&moderation_page(1, &items));
        assert!(md.contains("| #1 | 제목 | 이미지 | 게시판 미확인 | 알 수 없음 | 2024. 1. 2. 오후 3:04:05 |"));

        let none = render_markdown(&moderation_page(0, &[]));
        assert!(none.contains("_대기 중인 항목이 없습니다._"));
        let filtered = render_markdown(&moderation_page(3, &[]));
        assert!(filtered.contains("_검색 결과가 없습니다._"));
    }

    #[test]
    fn test_posts_page_defaults() {
        let posts = vec![AdminPost {
            id: 2,
            status: Some("HIDDEN".to_string()),
            ..Default::default()
        }];
        let md = render_markdown(&posts_page(1, &posts));
        assert!(md.contains("| #2 | (제목 없음) | - | 익명 | - | 숨김 |"));
    }

    #[test]
    fn test_reports_page_translates() {
        let reports = vec![ReportSummary {
            id: 3,
            kind: Some("COMMENT".to_string()),
            status: Some("PENDING".to_string()),
            ..Default::default()
        }];
        let md = render_markdown(&reports_page(1, &reports));
        assert!(md.contains("| #3 | 댓글 | 대기 | - | 작성자 미확인 | 신고자 미확인 | - | - |"));
    }

    #[test]
    fn test_report_detail_without_targets() {
        let md = render_markdown(&report_detail_page(&ReportDetail {
            id: 9,
            ..Default::default()
        }));
        assert!(md.contains("관련 게시글이 없습니다."));
        assert!(md.contains("관련 댓글이 없습니다."));
    }

    #[test]
    fn test_notifications_page() {
        let merged = aggregate_notifications(&[
            Notification {
                id: 1,
                kind: Some("REPORT".to_string()),
                target_label: Some("신고된 글".to_string()),
                reporter_label: Some("bob".to_string()),
                ..Default::default()
            },
            Notification {
                id: 2,
                kind: Some("CONTENT_WARNING".to_string()),
                target_id: Some(7),
                detection_label: Some("IMAGE".to_string()),
                ..Default::default()
            },
        ]);

        let page = notifications_page(&merged, 2);
        assert_eq!(page.title, "알림 (2)");
        let md = render_markdown(&page);
        assert!(md.contains("[신고] 게시판 미확인 **신고된 글**"));
        assert!(md.contains("신고자: bob"));
        assert!(md.contains("[유해 감지] [이미지]"));

        let empty = notifications_page(&[], 0);
        assert_eq!(empty.title, "알림");
        assert!(render_markdown(&empty).contains("_새 알림이 없습니다._"));
    }

    #[test]
    fn test_rekognition_empty() {
        let md = render_markdown(&rekognition_page("a.png", &[]));
        assert!(md.contains("유해 요소가 감지되지 않았습니다."));
    }

    #[test]
    fn test_action_page() {
        let page = action_page(
            "처리 결과",
            &[
                ActionResult::success("삭제되었습니다.".to_string(), None),
                ActionResult::error("서버 오류".to_string()),
            ],
        );
        let md = render_markdown(&page);
        assert!(md.contains("> ✅ 삭제되었습니다."));
        assert!(md.contains("> ❌ 서버 오류"));
    }
}
