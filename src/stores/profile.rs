//! Profile store: users, the directory, and follow relationships

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{Follow, UpdateUserRequest, User};
use crate::state::AppContext;
use crate::toggle::{OptimisticToggle, ToggleOutcome, ToggleState};

/// Point-in-time copy of profile state for rendering.
#[derive(Debug, Clone)]
pub struct ProfileSnapshot {
    pub user: Option<User>,
    pub directory: Vec<User>,
    pub followers: Vec<Follow>,
    pub following: Vec<Follow>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Default)]
struct ProfileState {
    user: Option<User>,
    directory: Vec<User>,
    followers: Vec<Follow>,
    following: Vec<Follow>,
    follows: HashMap<i64, OptimisticToggle>,
    loading: bool,
    error: Option<String>,
}

impl ProfileState {
    fn finish(&mut self) {
        self.loading = false;
    }

    /// Replace the follower list for a profile and seed its follow cell:
    /// active when the signed-in user appears among the followers, counting
    /// the whole list.
    fn set_followers(&mut self, profile_id: i64, followers: Vec<Follow>, me: Option<i64>) {
        let active = me
            .map(|id| followers.iter().any(|f| f.follower_id == id))
            .unwrap_or(false);
        let count = followers.len() as i64;
        match self.follows.get(&profile_id) {
            Some(cell) => cell.reseed(active, count),
            None => {
                self.follows
                    .insert(profile_id, OptimisticToggle::new(active, count));
            }
        }
        self.followers = followers;
    }

    fn set_following(&mut self, following: Vec<Follow>) {
        self.following = following;
    }
}

/// Local cache of a profile view plus per-user follow state.
#[derive(Clone)]
pub struct ProfileStore {
    ctx: AppContext,
    inner: Arc<RwLock<ProfileState>>,
}

impl ProfileStore {
    pub(crate) fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            inner: Arc::new(RwLock::new(ProfileState::default())),
        }
    }

    /// Current profile contents for rendering.
    pub async fn snapshot(&self) -> ProfileSnapshot {
        let state = self.inner.read().await;
        ProfileSnapshot {
            user: state.user.clone(),
            directory: state.directory.clone(),
            followers: state.followers.clone(),
            following: state.following.clone(),
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

    /// Fetch a user's profile.
    pub async fn fetch(&self, user_id: i64) -> AppResult<User> {
        self.begin().await;
        let token = self.ctx.token().await;
        match self.ctx.api.user(user_id, token.as_deref()).await {
            Ok(user) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.user = Some(user.clone());
                Ok(user)
            }
            Err(err) => self.fail("Failed to fetch user", err).await,
        }
    }

    /// Fetch the user directory (who-to-follow material), replacing the
    /// cached list.
    pub async fn fetch_directory(&self) -> AppResult<Vec<User>> {
        self.begin().await;
        let token = self.ctx.token().await;
        match self.ctx.api.users(token.as_deref()).await {
            Ok(users) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.directory = users.clone();
                Ok(users)
            }
            Err(err) => self.fail("Failed to fetch users", err).await,
        }
    }

    /// Update profile fields; refreshes the cached profile when it is the
    /// same user.
    pub async fn update(&self, user_id: i64, request: &UpdateUserRequest) -> AppResult<User> {
        let token = self.ctx.require_token().await?;
        self.begin().await;
        match self.ctx.api.update_user(user_id, request, &token).await {
            Ok(user) => {
                let mut state = self.inner.write().await;
                state.finish();
                if state.user.as_ref().map(|u| u.id) == Some(user.id) {
                    state.user = Some(user.clone());
                }
                Ok(user)
            }
            Err(err) => self.fail("Failed to update profile", err).await,
        }
    }

    /// Delete an account.
    pub async fn remove(&self, user_id: i64) -> AppResult<()> {
        let token = self.ctx.require_token().await?;
        self.begin().await;
        match self.ctx.api.delete_user(user_id, &token).await {
            Ok(()) => {
                let mut state = self.inner.write().await;
                state.finish();
                if state.user.as_ref().map(|u| u.id) == Some(user_id) {
                    state.user = None;
                }
                Ok(())
            }
            Err(err) => self.fail("Failed to delete account", err).await,
        }
    }

    /// Fetch who follows `user_id`, replacing the cached list and seeding
    /// the profile's follow cell.
    pub async fn followers(&self, user_id: i64) -> AppResult<Vec<Follow>> {
        self.begin().await;
        let token = self.ctx.token().await;
        let me = self.ctx.state.read().await.user_id();
        match self.ctx.api.followers(user_id, token.as_deref()).await {
            Ok(followers) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.set_followers(user_id, followers.clone(), me);
                Ok(followers)
            }
            Err(err) => self.fail("Failed to fetch followers", err).await,
        }
    }

    /// Fetch who `user_id` follows, replacing the cached list.
    pub async fn following(&self, user_id: i64) -> AppResult<Vec<Follow>> {
        self.begin().await;
        let token = self.ctx.token().await;
        match self.ctx.api.following(user_id, token.as_deref()).await {
            Ok(following) => {
                let mut state = self.inner.write().await;
                state.finish();
                state.set_following(following.clone());
                Ok(following)
            }
            Err(err) => self.fail("Failed to fetch following", err).await,
        }
    }

    /// Follow state for a profile, optimistic mutations included.
    pub async fn follow_state(&self, user_id: i64) -> Option<ToggleState> {
        self.inner
            .read()
            .await
            .follows
            .get(&user_id)
            .map(|cell| cell.state())
    }

    /// Toggle the follow relationship for a user.
    ///
    /// Same contract as the like toggle: optimistic flip, rollback to the
    /// pre-toggle snapshot on failure, failure published to the event bus,
    /// overlapping toggles on one user ignored.
    pub async fn toggle_follow(&self, user_id: i64) -> AppResult<ToggleOutcome> {
        let token = self.ctx.require_token().await?;
        let cell = {
            let mut state = self.inner.write().await;
            state
                .follows
                .entry(user_id)
                .or_insert_with(|| OptimisticToggle::new(false, 0))
                .clone()
        };

        let api = self.ctx.api.clone();
        let result = cell
            .toggle(move |now_following| async move {
                if now_following {
                    api.follow(user_id, &token).await.map(|_| ())
                } else {
                    api.unfollow(user_id, &token).await
                }
            })
            .await;

        if let Err(err) = &result {
            self.ctx
                .events
                .action_failed("follow", err.user_message("Failed to toggle follow"));
        }
        result
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
