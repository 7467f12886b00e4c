//! In-memory state of one console session.
//!
//! Fetches may overlap (the notification watcher refreshes while a slow
//! response is still in flight), so each list is held in a [`Snapshot`]
//! that only accepts the result of the most recently started fetch.

use crate::models::{
    AggregatedModerationItem, AggregatedNotification, Notice, ReportSummary, SessionUser,
};

/// Generation token of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Latest committed value of a fetched list.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    issued: u64,
    committed: u64,
    data: Option<T>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            committed: 0,
            data: None,
        }
    }
}

impl<T> Snapshot<T> {
    /// Start a fetch.
    pub fn begin(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Store the result of the fetch identified by `ticket`.
    ///
    /// Ignored when a newer fetch has been started or committed since.
    /// Returns whether the data was applied.
    pub fn commit(&mut self, ticket: FetchTicket, data: T) -> bool {
        if ticket.0 != self.issued || ticket.0 <= self.committed {
            return false;
        }
        self.committed = ticket.0;
        self.data = Some(data);
        true
    }

    pub fn get(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

/// State shared by the commands of one invocation.
#[derive(Debug, Default)]
pub struct AppState {
    pub user: Option<SessionUser>,
    pub moderation: Snapshot<Vec<AggregatedModerationItem>>,
    pub notifications: Snapshot<Vec<AggregatedNotification>>,
    pub unread_count: u64,
    pub reports: Snapshot<Vec<ReportSummary>>,
    pub notices: Snapshot<Vec<Notice>>,
}

impl AppState {
    pub fn new(user: Option<SessionUser>) -> Self {
        Self {
            user,
            ..Default::default()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(SessionUser::is_admin)
    }
}
