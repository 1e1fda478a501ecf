//! Application state management
//!
//! Uses Arc<RwLock<>> for thread-safe concurrent access to shared state.
//! The session is an explicitly-scoped object with a defined lifecycle:
//! established on bootstrap or login, torn down on logout.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::events::EventBus;
use crate::models::User;
use crate::token::TokenStore;

/// Authenticated user session
#[derive(Debug, Clone)]
pub struct UserSession {
    pub token: String,
    pub user: User,
}

/// Process-wide client state
pub struct AppState {
    /// Current user session (None if not authenticated)
    pub session: Option<UserSession>,
    /// True while an auth call or session check is in flight
    pub loading: bool,
    /// Message from the last failed auth operation
    pub error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: None,
            loading: false,
            error: None,
        }
    }

    /// Check if user is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Get current user if authenticated
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Get current user ID if authenticated
    pub fn user_id(&self) -> Option<i64> {
        self.session.as_ref().map(|s| s.user.id)
    }

    /// Get current auth token if authenticated
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Set user session after successful authentication
    pub fn set_session(&mut self, session: UserSession) {
        self.error = None;
        self.session = Some(session);
    }

    /// Clear user session on logout or expiry
    pub fn clear_session(&mut self) {
        self.session = None;
    }

    /// Require authentication, returning error if not authenticated
    pub fn require_auth(&self) -> AppResult<&UserSession> {
        self.session.as_ref().ok_or(AppError::NotAuthenticated)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe shared state type
pub type SharedState = Arc<RwLock<AppState>>;

/// Create a new shared state instance
pub fn create_shared_state() -> SharedState {
    Arc::new(RwLock::new(AppState::new()))
}

/// Everything a store needs to do its work: the API client, the shared
/// session state, the token cookie store, and the event bus.
#[derive(Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub state: SharedState,
    pub tokens: TokenStore,
    pub events: EventBus,
}

impl AppContext {
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            api: ApiClient::new(config),
            state: create_shared_state(),
            tokens: TokenStore::open(config.cookie_path.clone())?,
            events: EventBus::new(),
        })
    }

    /// Bearer token for outgoing requests, when a session is live.
    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token().map(str::to_string)
    }

    /// Bearer token, or `NotAuthenticated` when no session is live.
    pub async fn require_token(&self) -> AppResult<String> {
        let state = self.state.read().await;
        state.require_auth().map(|s| s.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64) -> User {
        User {
            id,
            email: format!("user{}@example.com", id),
            name: format!("User {}", id),
            username: format!("user{}", id),
            avatar: None,
            banner: None,
            bio: None,
            verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let mut state = AppState::new();
        assert!(!state.is_authenticated());
        assert!(state.require_auth().is_err());

        state.error = Some("unauthorized".to_string());
        state.set_session(UserSession {
            token: "jwt".to_string(),
            user: user(1),
        });
        assert!(state.is_authenticated());
        assert_eq!(state.user_id(), Some(1));
        assert_eq!(state.token(), Some("jwt"));
        // Establishing a session clears a stale auth error.
        assert!(state.error.is_none());

        state.clear_session();
        assert!(state.user().is_none());
        assert!(state.token().is_none());
    }
}
