//! Admin console commands.

use super::Console;
use crate::actions::{ActionExecutor, AdminAction};
use crate::analysis::{aggregate_detail, aggregate_moderation_items, aggregate_notifications};
use crate::cli::{
    ModerationCommand, MonitoringCommand, NoticesCommand, NotificationsCommand, PostsCommand,
    ReportsCommand, UsersCommand,
};
use crate::filters::{
    filter_moderation_items, filter_notices, filter_posts, filter_reports, sort_s3_objects,
};
use crate::api::{ApiClient, ApiError};
use crate::models::{AggregatedNotification, Notice, NoticePayload, PostStatus, ReportDetail};
use crate::state::FetchTicket;
use crate::view::admin::{
    action_page, dashboard_page, grafana_page, message_page, moderation_detail_page,
    moderation_page, monitoring_page, notice_detail_page, notices_page, notifications_page,
    post_detail_page, posts_page, rekognition_page, report_detail_page, reports_page,
    user_detail_page, users_page,
};
use crate::view::{Page, Section};
use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub async fn dashboard(console: &mut Console) -> Result<Page> {
    let client = &console.client;
    let loaded = tokio::try_join!(client.dashboard(), client.unread_count());
    let (stats, unread) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => return console.load_failed("대시보드", "대시보드 데이터를 불러오지 못했습니다.", e),
    };
    console.state.unread_count = unread;
    Ok(dashboard_page(&stats.unwrap_or_default(), unread))
}

pub async fn moderation(console: &mut Console, command: ModerationCommand) -> Result<Page> {
    match command {
        ModerationCommand::List { keyword, field } => {
            let ticket = console.state.moderation.begin();
            let loaded = console.client.review_items().await;
            let items = match loaded {
                Ok(items) => items,
                Err(e) => return console.load_failed("콘텐츠 검토", "검토 목록을 불러오지 못했습니다.", e),
            };
            let fetched = items.len();
            console
                .state
                .moderation
                .commit(ticket, aggregate_moderation_items(&items));

            let aggregated = console.state.moderation.get().cloned().unwrap_or_default();
            let filtered = filter_moderation_items(&aggregated, keyword.as_deref(), field);
            Ok(moderation_page(fetched, &filtered))
        }
        ModerationCommand::Show { id } => {
            let title = format!("검토 항목 #{}", id);
            let client = &console.client;
            let loaded = tokio::try_join!(client.review_item(id), client.review_items());
            match loaded {
                Ok((Some(detail), related)) => {
                    Ok(moderation_detail_page(&aggregate_detail(&detail, &related)))
                }
                Ok((None, _)) => Ok(message_page(&title, "상세 정보를 불러오지 못했습니다.")),
                Err(e) => console.load_failed(&title, "상세 정보를 불러오지 못했습니다.", e),
            }
        }
        ModerationCommand::Approve { id } => {
            console
                .run_actions("콘텐츠 검토", &[AdminAction::ApproveReviewItem(id)])
                .await
        }
        ModerationCommand::Reject { id } => {
            console
                .run_actions("콘텐츠 검토", &[AdminAction::RejectReviewItem(id)])
                .await
        }
    }
}

pub async fn posts(console: &mut Console, command: PostsCommand) -> Result<Page> {
    match command {
        PostsCommand::List {
            status,
            author_id,
            keyword,
            field,
        } => {
            let loaded = console.client.admin_posts(status, author_id).await;
            let posts = match loaded {
                Ok(posts) => posts,
                Err(e) => return console.load_failed("게시글 관리", "게시글을 불러오지 못했습니다.", e),
            };
            let filtered = filter_posts(&posts, status, keyword.as_deref(), field);
            Ok(posts_page(posts.len(), &filtered))
        }
        PostsCommand::Show { id } => {
            let title = format!("게시글 #{}", id);
            let loaded = console.client.admin_post(id).await;
            match loaded {
                Ok(Some(post)) => Ok(post_detail_page(&post)),
                Ok(None) => Ok(message_page(&title, "게시글을 찾을 수 없습니다.")),
                Err(e) => console.load_failed(&title, "게시글을 불러오지 못했습니다.", e),
            }
        }
        PostsCommand::Publish { id } => {
            let action = AdminAction::SetPostStatus {
                id,
                status: PostStatus::Published,
            };
            console.run_actions("게시글 관리", &[action]).await
        }
        PostsCommand::Hide { id } => {
            let action = AdminAction::SetPostStatus {
                id,
                status: PostStatus::Hidden,
            };
            console.run_actions("게시글 관리", &[action]).await
        }
    }
}

pub async fn notices(console: &mut Console, command: NoticesCommand) -> Result<Page> {
    match command {
        NoticesCommand::List { keyword, field } => {
            let ticket = console.state.notices.begin();
            let loaded = console.client.admin_notices().await;
            let notices = match loaded {
                Ok(notices) => notices,
                Err(e) => {
                    return console.load_failed("공지사항 관리", "공지사항을 불러오지 못했습니다.", e)
                }
            };
            let fetched = notices.len();
            console.state.notices.commit(ticket, notices);

            let all = console.state.notices.get().cloned().unwrap_or_default();
            Ok(notices_page(fetched, &filter_notices(&all, keyword.as_deref(), field)))
        }
        NoticesCommand::Show { id } => {
            let loaded = console.client.admin_notice(id).await;
            match loaded {
                Ok(Some(notice)) => Ok(notice_detail_page(&notice)),
                Ok(None) => Ok(message_page("공지사항", "공지사항을 찾을 수 없습니다.")),
                Err(e) => console.load_failed("공지사항", "공지 정보를 불러오지 못했습니다.", e),
            }
        }
        NoticesCommand::Create {
            title,
            content,
            pinned,
            attachments,
            attachment_urls,
        } => {
            let mut urls = attachment_urls;
            urls.extend(console.upload_attachments(&attachments, "notices").await?);

            let payload = NoticePayload {
                title,
                content,
                pinned,
                attachment_urls: urls,
            };
            let saved = console
                .client
                .create_notice(&payload)
                .await
                .context("저장에 실패했습니다.")?;
            Ok(saved_notice_page(saved.as_ref()))
        }
        NoticesCommand::Edit {
            id,
            title,
            content,
            pinned,
            attachments,
            attachment_urls,
            clear_attachments,
        } => {
            let current = console
                .client
                .admin_notice(id)
                .await?
                .ok_or_else(|| anyhow!("공지사항 #{}을(를) 찾을 수 없습니다.", id))?;

            let mut payload = NoticePayload::from(&current);
            if let Some(title) = title {
                payload.title = title;
            }
            if let Some(content) = content {
                payload.content = content;
            }
            if let Some(pinned) = pinned {
                payload.pinned = pinned;
            }
            if clear_attachments {
                payload.attachment_urls.clear();
            }
            payload.attachment_urls.extend(attachment_urls);
            payload
                .attachment_urls
                .extend(console.upload_attachments(&attachments, "notices").await?);

            let saved = console
                .client
                .update_notice(id, &payload)
                .await
                .context("저장에 실패했습니다.")?;
            Ok(saved_notice_page(saved.as_ref()))
        }
        NoticesCommand::Pin { id } => {
            console
                .run_actions("공지사항 관리", &[AdminAction::PinNotice { id, pinned: true }])
                .await
        }
        NoticesCommand::Unpin { id } => {
            console
                .run_actions("공지사항 관리", &[AdminAction::PinNotice { id, pinned: false }])
                .await
        }
        NoticesCommand::Delete { id } => {
            console
                .run_actions("공지사항 관리", &[AdminAction::DeleteNotice(id)])
                .await
        }
    }
}

fn saved_notice_page(saved: Option<&Notice>) -> Page {
    match saved {
        Some(notice) => {
            let mut page = notice_detail_page(notice);
            page.sections.insert(0, Section::message("저장되었습니다."));
            page
        }
        None => message_page("공지사항", "저장되었습니다."),
    }
}

pub async fn users(console: &mut Console, command: UsersCommand) -> Result<Page> {
    match command {
        UsersCommand::List => {
            let loaded = console.client.users().await;
            match loaded {
                Ok(users) => Ok(users_page(&users)),
                Err(e) => console.load_failed("사용자 관리", "사용자 목록을 불러오지 못했습니다.", e),
            }
        }
        UsersCommand::Show { id } => {
            let title = format!("사용자 #{}", id);
            let client = &console.client;
            let loaded = tokio::try_join!(client.user(id), client.admin_posts(None, Some(id)));
            match loaded {
                Ok((Some(user), posts)) => Ok(user_detail_page(&user, &posts)),
                Ok((None, _)) => Ok(message_page(&title, "사용자를 찾을 수 없습니다.")),
                Err(e) => console.load_failed(&title, "사용자 정보를 불러오지 못했습니다.", e),
            }
        }
        UsersCommand::Warn { id, message } => {
            console
                .run_actions("사용자 관리", &[AdminAction::WarnUser { id, message }])
                .await
        }
        UsersCommand::Block { id, message } => {
            console
                .run_actions("사용자 관리", &[AdminAction::BlockUser { id, message }])
                .await
        }
        UsersCommand::Unblock { id } => {
            console
                .run_actions("사용자 관리", &[AdminAction::UnblockUser(id)])
                .await
        }
        UsersCommand::Delete { id } => {
            console
                .run_actions("사용자 관리", &[AdminAction::DeleteUser(id)])
                .await
        }
    }
}

pub async fn reports(console: &mut Console, command: ReportsCommand) -> Result<Page> {
    let action = match command {
        ReportsCommand::List {
            status,
            keyword,
            field,
        } => {
            let ticket = console.state.reports.begin();
            let loaded = console.client.reports(status).await;
            let reports = match loaded {
                Ok(reports) => reports,
                Err(e) => return console.load_failed("신고 관리", "신고 데이터를 불러오지 못했습니다.", e),
            };
            let fetched = reports.len();
            console.state.reports.commit(ticket, reports);

            let all = console.state.reports.get().cloned().unwrap_or_default();
            return Ok(reports_page(
                fetched,
                &filter_reports(&all, keyword.as_deref(), field),
            ));
        }
        ReportsCommand::Show { id } => {
            let title = format!("신고 #{}", id);
            let loaded = console.client.report(id).await;
            return match loaded {
                Ok(Some(report)) => Ok(report_detail_page(&report)),
                Ok(None) => Ok(message_page(&title, "신고를 찾을 수 없습니다.")),
                Err(e) => console.load_failed(&title, "신고 정보를 불러오지 못했습니다.", e),
            };
        }
        ReportsCommand::Approve { id, note } => AdminAction::ApproveReport { id, note },
        ReportsCommand::Reject { id, note } => AdminAction::RejectReport { id, note },
        ReportsCommand::Block { id, note } => AdminAction::BlockReportTarget { id, note },
    };

    let result = ActionExecutor::new(&console.client).execute(&action).await?;
    if !result.success {
        console.failed = true;
    }

    let mut page = action_page("신고 관리", std::slice::from_ref(&result));
    let updated = result
        .response
        .and_then(|value| serde_json::from_value::<ReportDetail>(value).ok());
    if let Some(report) = updated {
        page.sections.extend(report_detail_page(&report).sections);
    }
    Ok(page)
}

pub async fn monitoring(console: &mut Console, command: MonitoringCommand) -> Result<Page> {
    let client = &console.client;
    match command {
        MonitoringCommand::Overview => {
            let loaded = tokio::try_join!(client.monitoring_metrics(), client.s3_objects());
            match loaded {
                Ok((metrics, mut objects)) => {
                    sort_s3_objects(&mut objects);
                    Ok(monitoring_page(metrics.as_ref(), &objects))
                }
                Err(e) => console.load_failed("모니터링", "모니터링 데이터를 불러오지 못했습니다.", e),
            }
        }
        MonitoringCommand::Rekognition { object_key } => {
            let loaded = client.rekognition_labels(&object_key).await;
            match loaded {
                Ok(labels) => Ok(rekognition_page(&object_key, &labels)),
                Err(e) => console.load_failed("Rekognition 분석", "결과를 가져오지 못했습니다.", e),
            }
        }
        MonitoringCommand::Grafana { path, query } => {
            Ok(grafana_page(&client.grafana_url(&path, query.as_deref())))
        }
    }
}

/// Aggregated notifications and the unread count.
type NotificationFetch = Result<(Vec<AggregatedNotification>, u64), ApiError>;

/// Fetch and aggregate notifications together with the unread count.
async fn fetch_notifications(client: &ApiClient, limit: u32) -> NotificationFetch {
    let (list, unread) = tokio::try_join!(client.notifications(limit), client.unread_count())?;
    Ok((aggregate_notifications(&list), unread))
}

/// Aggregated entries containing any of `ids`. Ids that match no entry are
/// marked on their own.
fn notifications_to_mark(
    aggregated: &[AggregatedNotification],
    ids: &[i64],
) -> (Vec<AggregatedNotification>, Vec<i64>) {
    let mut seen = HashSet::new();
    let mut groups = Vec::new();
    let mut loose = Vec::new();

    for id in ids {
        match aggregated.iter().find(|n| n.ids.contains(id)) {
            Some(group) => {
                if seen.insert(group.group_key.clone()) {
                    groups.push(group.clone());
                }
            }
            None => loose.push(*id),
        }
    }
    (groups, loose)
}

pub async fn notifications(console: &mut Console, command: NotificationsCommand) -> Result<Page> {
    let limit = console.config.notifications.limit;
    match command {
        NotificationsCommand::List { limit: requested } => {
            let ticket = console.state.notifications.begin();
            let loaded = fetch_notifications(&console.client, requested.unwrap_or(limit)).await;
            let (aggregated, unread) = match loaded {
                Ok(loaded) => loaded,
                Err(e) => return console.load_failed("알림", "알림을 불러오지 못했습니다.", e),
            };
            console.state.unread_count = unread;
            console.state.notifications.commit(ticket, aggregated);

            let items = console.state.notifications.get().cloned().unwrap_or_default();
            Ok(notifications_page(&items, unread))
        }
        NotificationsCommand::Read { ids } => {
            let (aggregated, _) = fetch_notifications(&console.client, limit).await?;
            let (groups, loose) = notifications_to_mark(&aggregated, &ids);
            debug!("Marking {} groups and {} loose ids read", groups.len(), loose.len());

            let executor = ActionExecutor::new(&console.client);
            let mut results = Vec::new();
            for group in &groups {
                results.push(executor.mark_read(group).await?);
            }
            let loose: Vec<AdminAction> = loose
                .into_iter()
                .map(AdminAction::MarkNotificationRead)
                .collect();
            results.extend(executor.execute_all(&loose).await?);

            if results.iter().any(|r| !r.success) {
                console.failed = true;
            }
            Ok(action_page("알림", &results))
        }
        NotificationsCommand::ReadAll => {
            console
                .run_actions("알림", &[AdminAction::MarkAllNotificationsRead])
                .await
        }
        NotificationsCommand::Watch { .. } => {
            Err(anyhow!("`notifications watch` is run by the watcher"))
        }
    }
}

/// Apply the result of one watcher poll and re-render.
///
/// Results of polls that a newer poll has superseded are dropped. Returns
/// whether the page was rendered.
fn apply_poll(console: &mut Console, ticket: FetchTicket, result: NotificationFetch) -> Result<bool> {
    match result {
        Ok((aggregated, unread)) => {
            if !console.state.notifications.commit(ticket, aggregated) {
                debug!("Dropping superseded notification poll {:?}", ticket);
                return Ok(false);
            }
            console.state.unread_count = unread;
            let items = console.state.notifications.get().cloned().unwrap_or_default();
            console.emit(&notifications_page(&items, unread))?;
            Ok(true)
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            warn!("알림을 불러오지 못했습니다: {}", e);
            Ok(false)
        }
    }
}

/// Poll notifications until Ctrl-C, re-rendering on every tick.
///
/// The session file is re-read before each poll so that a logout or a
/// different login in another terminal stops the watcher. Polls run as
/// their own tasks, so a slow response may arrive after a newer one.
pub async fn watch_notifications(console: &mut Console, interval: Option<u64>) -> Result<i32> {
    let seconds = interval.unwrap_or(console.config.notifications.poll_interval_seconds);
    let limit = console.config.notifications.limit;
    let mut ticker = tokio::time::interval(Duration::from_secs(seconds.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let (tx, mut rx) = mpsc::unbounded_channel::<(FetchTicket, NotificationFetch)>();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    info!("Watching notifications every {}s (Ctrl-C to stop)", seconds);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if console.session.reload_if_changed() {
                    console.state.user = console.session.user().cloned();
                    console.client.set_cookie(console.session.cookie().map(str::to_string));
                    if !console.state.is_admin() {
                        eprintln!("🔒 세션이 변경되었습니다. 다시 로그인하세요.");
                        return Ok(2);
                    }
                }

                let ticket = console.state.notifications.begin();
                let client = console.client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = fetch_notifications(&client, limit).await;
                    // Fails only once the watcher has returned.
                    let _ = tx.send((ticket, result));
                });
            }
            Some((ticket, result)) = rx.recv() => {
                apply_poll(console, ticket, result)?;
            }
            _ = &mut ctrl_c => {
                info!("Stopped watching notifications");
                return Ok(0);
            }
        }
    }
}
