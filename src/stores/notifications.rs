//! Notification store: the list and its read state

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::Notification;
use crate::state::AppContext;

/// Point-in-time copy of notification state for rendering.
#[derive(Debug, Clone)]
pub struct NotificationSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Default)]
struct NotificationState {
    notifications: Vec<Notification>,
    unread_count: usize,
    loading: bool,
    error: Option<String>,
}

impl NotificationState {
    fn finish(&mut self) {
        self.loading = false;
    }

    /// Last successful fetch wins; the unread count is derived from the
    /// replaced list.
    fn replace(&mut self, notifications: Vec<Notification>) {
        self.unread_count = notifications.iter().filter(|n| !n.is_read).count();
        self.notifications = notifications;
    }

    /// Flip one notification to read; the counter never goes below zero and
    /// re-marking a read notification does not move it.
    fn mark_read(&mut self, id: i64) {
        if let Some(notification) = self.notifications.iter_mut().find(|n| n.id == id) {
            if !notification.is_read {
                notification.is_read = true;
                self.unread_count = self.unread_count.saturating_sub(1);
            }
        }
    }

    fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.is_read = true;
        }
        self.unread_count = 0;
    }
}

/// Local cache of the notification list.
#[derive(Clone)]
pub struct NotificationStore {
    ctx: AppContext,
    inner: Arc<RwLock<NotificationState>>,
}

impl NotificationStore {
    pub(crate) fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            inner: Arc::new(RwLock::new(NotificationState::default())),
        }
    }

    /// Current notification contents for rendering.
    pub async fn snapshot(&self) -> NotificationSnapshot {
        let state = self.inner.read().await;
        NotificationSnapshot {
            notifications: state.notifications.clone(),
            unread_count: state.unread_count,
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    pub async fn unread_count(&self) -> usize {
        self.inner.read().await.unread_count
    }

    pub async fn loading(&self) -> bool {
        self.inner.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.read().await.error.clone()
    }

    /// Fetch notifications, replacing the cached list.
    pub async fn fetch(&self) -> AppResult<Vec<Notification>> {
        let token = self.ctx.require_token().await?;
        self.begin().await;
        match self.ctx.api.notifications(&token).await {
            Ok(notifications) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.replace(notifications.clone());
                Ok(notifications)
            }
            Err(err) => self.fail("Failed to fetch notifications", err).await,
        }
    }

    /// Mark one notification as read: server first, then the local copy.
    pub async fn mark_read(&self, id: i64) -> AppResult<()> {
        let token = self.ctx.require_token().await?;
        self.begin().await;
        match self.ctx.api.mark_notification_read(id, &token).await {
            Ok(()) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.mark_read(id);
                Ok(())
            }
            Err(err) => self.fail("Failed to mark as read", err).await,
        }
    }

    /// Mark every notification as read.
    pub async fn mark_all_read(&self) -> AppResult<()> {
        let token = self.ctx.require_token().await?;
        self.begin().await;
        match self.ctx.api.mark_all_notifications_read(&token).await {
            Ok(()) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.mark_all_read();
                Ok(())
            }
            Err(err) => self.fail("Failed to mark all as read", err).await,
        }
    }

    async fn begin(&self) {
        let mut state = self.inner.write().await;
        state.loading = true;
        state.error = None;
    }

    /// Record the failure message for the view and re-throw.
    async fn fail<T>(&self, fallback: &str, err: AppError) -> AppResult<T> {
        let message = err.user_message(fallback);
        tracing::warn!("{}: {}", fallback, err);
        let mut state = self.inner.write().await;
        state.loading = false;
        state.error = Some(message);
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationKind;
    use chrono::Utc;

    fn notification(id: i64, is_read: bool) -> Notification {
        Notification {
            id,
            user_id: 1,
            kind: NotificationKind::Like,
            content: format!("notification {}", id),
            is_read,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unread_count_derived_from_fetched_list() {
        let mut state = NotificationState::default();

        state.replace(vec![
            notification(1, false),
            notification(2, true),
            notification(3, false),
        ]);

        assert_eq!(state.unread_count, 2);
    }

    #[test]
    fn test_refetch_replaces_list() {
        let mut state = NotificationState::default();
        state.replace(vec![notification(1, false), notification(2, false)]);

        state.replace(vec![notification(3, false)]);

        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.unread_count, 1);
    }

    #[test]
    fn test_mark_read_decrements_once() {
        let mut state = NotificationState::default();
        state.replace(vec![notification(1, false), notification(2, false)]);

        state.mark_read(1);
        assert_eq!(state.unread_count, 1);
        assert!(state.notifications[0].is_read);

        // Re-marking the same notification does not move the counter.
        state.mark_read(1);
        assert_eq!(state.unread_count, 1);

        // Marking an unknown id is a no-op.
        state.mark_read(99);
        assert_eq!(state.unread_count, 1);
    }

    #[test]
    fn test_mark_all_read_zeroes_counter() {
        let mut state = NotificationState::default();
        state.replace(vec![notification(1, false), notification(2, false)]);

        state.mark_all_read();

        assert_eq!(state.unread_count, 0);
        assert!(state.notifications.iter().all(|n| n.is_read));
    }
}
