//! Feed store: tweets, likes, composer media

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{CreateTweetRequest, Like, Media, Tweet, UpdateTweetRequest};
use crate::state::AppContext;
use crate::toggle::{OptimisticToggle, ToggleOutcome, ToggleState};

/// Point-in-time copy of the feed for rendering.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub tweets: Vec<Tweet>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Default)]
struct FeedState {
    tweets: Vec<Tweet>,
    likes: HashMap<i64, OptimisticToggle>,
    loading: bool,
    error: Option<String>,
}

impl FeedState {
    fn finish(&mut self) {
        self.loading = false;
    }

    /// Last successful fetch wins: replace, never append.
    fn replace(&mut self, tweets: Vec<Tweet>) {
        for tweet in &tweets {
            self.seed_like(tweet);
        }
        self.tweets = tweets;
    }

    /// Create or refresh the like cell for a fetched tweet.
    fn seed_like(&mut self, tweet: &Tweet) {
        match self.likes.get(&tweet.id) {
            Some(cell) => cell.reseed(tweet.is_liked, tweet.likes_count),
            None => {
                self.likes.insert(
                    tweet.id,
                    OptimisticToggle::new(tweet.is_liked, tweet.likes_count),
                );
            }
        }
    }

    fn insert(&mut self, tweet: Tweet) {
        self.seed_like(&tweet);
        self.tweets.insert(0, tweet);
    }

    fn replace_one(&mut self, tweet: Tweet) {
        if let Some(slot) = self.tweets.iter_mut().find(|t| t.id == tweet.id) {
            *slot = tweet;
        }
    }

    fn remove(&mut self, id: i64) {
        self.tweets.retain(|t| t.id != id);
        self.likes.remove(&id);
    }
}

/// Local cache of the home feed plus per-tweet like state.
#[derive(Clone)]
pub struct FeedStore {
    ctx: AppContext,
    inner: Arc<RwLock<FeedState>>,
}

impl FeedStore {
    pub(crate) fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            inner: Arc::new(RwLock::new(FeedState::default())),
        }
    }

    /// Current feed contents for rendering.
    pub async fn snapshot(&self) -> FeedSnapshot {
        let state = self.inner.read().await;
        FeedSnapshot {
            tweets: state.tweets.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    pub async fn loading(&self) -> bool {
        self.inner.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.read().await.error.clone()
    }

    /// Fetch the home feed, replacing the cached list.
    pub async fn fetch(&self) -> AppResult<Vec<Tweet>> {
        self.begin().await;
        let token = self.ctx.token().await;
        match self.ctx.api.tweets(token.as_deref()).await {
            Ok(tweets) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.replace(tweets.clone());
                Ok(tweets)
            }
            Err(err) => self.fail("Failed to fetch tweets", err).await,
        }
    }

    /// Fetch a single tweet. The cached list is left alone; the tweet's
    /// like cell is seeded so a detail view can toggle it.
    pub async fn tweet(&self, id: i64) -> AppResult<Tweet> {
        self.begin().await;
        let token = self.ctx.token().await;
        match self.ctx.api.tweet(id, token.as_deref()).await {
            Ok(tweet) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.seed_like(&tweet);
                Ok(tweet)
            }
            Err(err) => self.fail("Failed to fetch tweet", err).await,
        }
    }

    /// Post a new tweet; prepends it to the cached feed.
    pub async fn post(&self, content: &str, media_url: Option<&str>) -> AppResult<Tweet> {
        let token = self.ctx.require_token().await?;
        self.begin().await;
        let request = CreateTweetRequest {
            content: content.to_string(),
            media_url: media_url.map(str::to_string),
        };
        match self.ctx.api.create_tweet(&request, &token).await {
            Ok(tweet) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.insert(tweet.clone());
                Ok(tweet)
            }
            Err(err) => self.fail("Failed to post tweet", err).await,
        }
    }

    /// Edit a tweet; replaces it in the cached feed.
    pub async fn edit(&self, id: i64, request: &UpdateTweetRequest) -> AppResult<Tweet> {
        let token = self.ctx.require_token().await?;
        self.begin().await;
        match self.ctx.api.update_tweet(id, request, &token).await {
            Ok(tweet) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.replace_one(tweet.clone());
                Ok(tweet)
            }
            Err(err) => self.fail("Failed to update tweet", err).await,
        }
    }

    /// Delete a tweet and drop it from the cached feed.
    pub async fn remove(&self, id: i64) -> AppResult<()> {
        let token = self.ctx.require_token().await?;
        self.begin().await;
        match self.ctx.api.delete_tweet(id, &token).await {
            Ok(()) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.remove(id);
                Ok(())
            }
            Err(err) => self.fail("Failed to delete tweet", err).await,
        }
    }

    /// Like state for a tweet, optimistic mutations included. Views render
    /// like buttons from this, not from the cached tweet record.
    pub async fn like_state(&self, tweet_id: i64) -> Option<ToggleState> {
        self.inner
            .read()
            .await
            .likes
            .get(&tweet_id)
            .map(|cell| cell.state())
    }

    /// Toggle the like relationship for a tweet.
    ///
    /// The flip lands in local state before the network call; on failure the
    /// pre-toggle snapshot is restored and the failure is published as
    /// [`crate::events::AppEvent::ActionFailed`] so the shell can show it.
    pub async fn toggle_like(&self, tweet_id: i64) -> AppResult<ToggleOutcome> {
        let token = self.ctx.require_token().await?;
        let cell = {
            let mut state = self.inner.write().await;
            state
                .likes
                .entry(tweet_id)
                .or_insert_with(|| OptimisticToggle::new(false, 0))
                .clone()
        };

        let api = self.ctx.api.clone();
        let result = cell
            .toggle(move |now_liked| async move {
                if now_liked {
                    api.like(tweet_id, &token).await.map(|_| ())
                } else {
                    api.unlike(tweet_id, &token).await
                }
            })
            .await;

        match &result {
            Ok(ToggleOutcome::Applied(settled)) => {
                // Keep the cached record consistent with the settled cell.
                let mut state = self.inner.write().await;
                if let Some(tweet) = state.tweets.iter_mut().find(|t| t.id == tweet_id) {
                    tweet.is_liked = settled.active;
                    tweet.likes_count = settled.count;
                }
            }
            Ok(ToggleOutcome::Ignored) => {}
            Err(err) => {
                self.ctx
                    .events
                    .action_failed("like", err.user_message("Failed to toggle like"));
            }
        }
        result
    }

    /// Likes on a tweet
    pub async fn likes_of(&self, tweet_id: i64) -> AppResult<Vec<Like>> {
        self.begin().await;
        let token = self.ctx.token().await;
        match self.ctx.api.tweet_likes(tweet_id, token.as_deref()).await {
            Ok(likes) => {
                self.inner.write().await.finish();
                Ok(likes)
            }
            Err(err) => self.fail("Failed to fetch likes", err).await,
        }
    }

    /// Upload composer media; returns the stored record.
    pub async fn upload_media(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> AppResult<Media> {
        let token = self.ctx.require_token().await?;
        self.begin().await;
        match self
            .ctx
            .api
            .upload_media(bytes, file_name, content_type, &token)
            .await
        {
            Ok(media) => {
                self.inner.write().await.finish();
                Ok(media)
            }
            Err(err) => self.fail("Failed to upload media", err).await,
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
    use chrono::Utc;

    fn tweet(id: i64) -> Tweet {
        Tweet {
            id,
            user_id: 1,
            user: None,
            content: format!("tweet {}", id),
            media_url: None,
            is_liked: false,
            likes_count: 0,
            replies_count: 0,
            retweets_count: 0,
            bookmarks_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn liked_tweet(id: i64, likes: i64) -> Tweet {
        Tweet {
            is_liked: true,
            likes_count: likes,
            ..tweet(id)
        }
    }

    #[test]
    fn test_refetch_replaces_instead_of_appending() {
        let mut state = FeedState::default();

        state.replace(vec![tweet(1), tweet(2), tweet(3)]);
        assert_eq!(state.tweets.len(), 3);

        state.replace(vec![tweet(2), tweet(4)]);
        assert_eq!(state.tweets.len(), 2);
        assert_eq!(state.tweets[0].id, 2);
        assert_eq!(state.tweets[1].id, 4);
    }

    #[test]
    fn test_new_tweet_is_prepended() {
        let mut state = FeedState::default();
        state.replace(vec![tweet(1)]);

        state.insert(tweet(2));

        assert_eq!(state.tweets[0].id, 2);
        assert_eq!(state.tweets[1].id, 1);
    }

    #[test]
    fn test_edit_replaces_in_place() {
        let mut state = FeedState::default();
        state.replace(vec![tweet(1), tweet(2)]);

        let mut edited = tweet(2);
        edited.content = "edited".to_string();
        state.replace_one(edited);

        assert_eq!(state.tweets[1].content, "edited");
        assert_eq!(state.tweets.len(), 2);
    }

    #[test]
    fn test_remove_drops_tweet_and_like_cell() {
        let mut state = FeedState::default();
        state.replace(vec![tweet(1), tweet(2)]);
        assert!(state.likes.contains_key(&1));

        state.remove(1);

        assert_eq!(state.tweets.len(), 1);
        assert!(!state.likes.contains_key(&1));
    }

    #[test]
    fn test_like_cells_are_seeded_from_fetched_tweets() {
        let mut state = FeedState::default();
        state.replace(vec![liked_tweet(7, 12)]);

        let cell = state.likes.get(&7).unwrap();
        assert_eq!(cell.state(), ToggleState::new(true, 12));

        // A refetch reseeds the settled cell.
        state.replace(vec![liked_tweet(7, 15)]);
        let cell = state.likes.get(&7).unwrap();
        assert_eq!(cell.state(), ToggleState::new(true, 15));
    }
}
