//! Media endpoints

use reqwest::multipart::{Form, Part};

use crate::error::AppResult;
use crate::models::Media;

use super::ApiClient;

impl ApiClient {
    /// Upload a media file as a multipart form
    pub async fn upload_media(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
        token: &str,
    ) -> AppResult<Media> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);
        self.post_multipart("/media", form, Some(token)).await
    }

    /// Media attached to a tweet
    pub async fn media_for_tweet(&self, tweet_id: i64, token: Option<&str>) -> AppResult<Vec<Media>> {
        self.get(&format!("/media/tweet/{}", tweet_id), token).await
    }

    /// Delete a media record
    pub async fn delete_media(&self, id: i64, token: &str) -> AppResult<()> {
        self.delete(&format!("/media/{}", id), Some(token)).await
    }
}
