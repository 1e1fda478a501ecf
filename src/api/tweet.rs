//! Tweet endpoints

use crate::error::AppResult;
use crate::models::{CreateTweetRequest, Tweet, UpdateTweetRequest};

use super::ApiClient;

impl ApiClient {
    /// The home feed
    pub async fn tweets(&self, token: Option<&str>) -> AppResult<Vec<Tweet>> {
        self.get("/tweets", token).await
    }

    /// Get tweet by ID
    pub async fn tweet(&self, id: i64, token: Option<&str>) -> AppResult<Tweet> {
        self.get(&format!("/tweets/{}", id), token).await
    }

    /// Post a new tweet
    pub async fn create_tweet(&self, request: &CreateTweetRequest, token: &str) -> AppResult<Tweet> {
        self.post("/tweets", request, Some(token)).await
    }

    /// Edit a tweet
    pub async fn update_tweet(
        &self,
        id: i64,
        request: &UpdateTweetRequest,
        token: &str,
    ) -> AppResult<Tweet> {
        self.put(&format!("/tweets/{}", id), request, Some(token)).await
    }

    /// Delete a tweet
    pub async fn delete_tweet(&self, id: i64, token: &str) -> AppResult<()> {
        self.delete(&format!("/tweets/{}", id), Some(token)).await
    }
}
