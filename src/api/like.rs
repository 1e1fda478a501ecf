//! Like endpoints

use serde::Serialize;

use crate::error::AppResult;
use crate::models::Like;

use super::ApiClient;

impl ApiClient {
    /// Like a tweet
    pub async fn like(&self, tweet_id: i64, token: &str) -> AppResult<Like> {
        #[derive(Serialize)]
        struct LikeRequest {
            tweet_id: i64,
        }

        self.post("/likes", &LikeRequest { tweet_id }, Some(token)).await
    }

    /// Remove a like from a tweet
    pub async fn unlike(&self, tweet_id: i64, token: &str) -> AppResult<()> {
        self.delete(&format!("/likes/{}", tweet_id), Some(token)).await
    }

    /// Likes on a tweet
    pub async fn tweet_likes(&self, tweet_id: i64, token: Option<&str>) -> AppResult<Vec<Like>> {
        self.get(&format!("/likes/tweet/{}", tweet_id), token).await
    }
}
