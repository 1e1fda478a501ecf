//! Follow endpoints

use serde::Serialize;

use crate::error::AppResult;
use crate::models::Follow;

use super::ApiClient;

impl ApiClient {
    /// Follow a user
    pub async fn follow(&self, user_id: i64, token: &str) -> AppResult<Follow> {
        #[derive(Serialize)]
        struct FollowRequest {
            following_id: i64,
        }

        self.post("/follows", &FollowRequest { following_id: user_id }, Some(token))
            .await
    }

    /// Unfollow a user
    pub async fn unfollow(&self, user_id: i64, token: &str) -> AppResult<()> {
        self.delete(&format!("/follows/{}", user_id), Some(token)).await
    }

    /// Users following `user_id`
    pub async fn followers(&self, user_id: i64, token: Option<&str>) -> AppResult<Vec<Follow>> {
        self.get(&format!("/follows/followers/{}", user_id), token).await
    }

    /// Users `user_id` follows
    pub async fn following(&self, user_id: i64, token: Option<&str>) -> AppResult<Vec<Follow>> {
        self.get(&format!("/follows/following/{}", user_id), token).await
    }
}
