//! Notification endpoints

use serde::Serialize;

use crate::error::AppResult;
use crate::models::Notification;

use super::ApiClient;

impl ApiClient {
    /// All notifications for the current user
    pub async fn notifications(&self, token: &str) -> AppResult<Vec<Notification>> {
        self.get("/notifications", Some(token)).await
    }

    /// Mark one notification as read
    pub async fn mark_notification_read(&self, id: i64, token: &str) -> AppResult<()> {
        #[derive(Serialize)]
        struct MarkReadRequest {
            is_read: bool,
        }

        self.put_unit(
            &format!("/notifications/{}", id),
            &MarkReadRequest { is_read: true },
            Some(token),
        )
        .await
    }

    /// Mark every notification as read
    pub async fn mark_all_notifications_read(&self, token: &str) -> AppResult<()> {
        self.put_empty("/notifications/read-all", Some(token)).await
    }
}
