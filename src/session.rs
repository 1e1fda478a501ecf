//! Auth session lifecycle
//!
//! Process-wide current-user state: initialized from the access-token cookie
//! at startup, established by login, torn down by logout. There is no
//! background refresh and no token renewal; when the token expires, the next
//! call that notices clears the session and the shell must re-prompt login.

use crate::error::{AppError, AppResult};
use crate::events::AppEvent;
use crate::models::{AuthSession, LoginRequest, RegisterRequest, User};
use crate::state::{AppContext, UserSession};

/// Marker stored in auth state when no valid token is present.
pub const UNAUTHORIZED: &str = "unauthorized";

/// Session lifecycle operations
#[derive(Clone)]
pub struct SessionManager {
    ctx: AppContext,
}

impl SessionManager {
    pub(crate) fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Initialize session state at application start.
    ///
    /// Reads the access-token cookie; if present, validates it against the
    /// who-am-I endpoint. A missing or rejected token leaves the user null
    /// with the unauthorized marker set.
    pub async fn bootstrap(&self) -> AppResult<Option<User>> {
        let Some(token) = self.ctx.tokens.access_token() else {
            let mut state = self.ctx.state.write().await;
            state.clear_session();
            state.loading = false;
            state.error = Some(UNAUTHORIZED.to_string());
            return Ok(None);
        };

        self.begin().await;
        match self.ctx.api.me(&token).await {
            Ok(user) => {
                tracing::info!("Session restored for user {}", user.id);
                let mut state = self.ctx.state.write().await;
                state.loading = false;
                state.set_session(UserSession {
                    token,
                    user: user.clone(),
                });
                Ok(Some(user))
            }
            Err(err) if err.is_unauthorized() => {
                self.ctx.tokens.clear()?;
                let mut state = self.ctx.state.write().await;
                state.loading = false;
                state.clear_session();
                state.error = Some(UNAUTHORIZED.to_string());
                Ok(None)
            }
            Err(err) => self.fail("Failed to restore session", err).await,
        }
    }

    /// Sign in with an email or username plus password.
    pub async fn login(&self, request: &LoginRequest) -> AppResult<AuthSession> {
        self.begin().await;
        match self.ctx.api.login(request).await {
            Ok(auth) => match self.apply_login(&auth).await {
                Ok(()) => Ok(auth),
                Err(err) => self.fail("Login failed", err).await,
            },
            Err(err) => self.fail("Login failed", err).await,
        }
    }

    /// Store the token cookie and establish the in-memory session.
    pub(crate) async fn apply_login(&self, auth: &AuthSession) -> AppResult<()> {
        self.ctx.tokens.set_access_token(&auth.token)?;
        let mut state = self.ctx.state.write().await;
        state.loading = false;
        state.set_session(UserSession {
            token: auth.token.clone(),
            user: auth.user.clone(),
        });
        tracing::info!("User logged in: {}", auth.user.id);
        Ok(())
    }

    /// Create a new account. Returns the created user; the caller signs in
    /// separately. A validation failure carries every field message.
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        self.begin().await;
        match self.ctx.api.register(request).await {
            Ok(user) => {
                let mut state = self.ctx.state.write().await;
                state.loading = false;
                Ok(user)
            }
            Err(err) => self.fail("Registration failed", err).await,
        }
    }

    /// Clear the token cookie and the in-memory session. No network call.
    pub async fn logout(&self) -> AppResult<()> {
        self.ctx.tokens.clear()?;
        let mut state = self.ctx.state.write().await;
        state.clear_session();
        state.error = None;
        tracing::info!("User logged out");
        Ok(())
    }

    /// Current user from local state, no network.
    pub async fn user(&self) -> Option<User> {
        self.ctx.state.read().await.user().cloned()
    }

    /// Re-validate the session against the server.
    ///
    /// An unauthorized reply tears the session down and publishes
    /// [`AppEvent::SessionExpired`] so the shell can re-prompt login.
    pub async fn current_user(&self) -> AppResult<Option<User>> {
        let Some(token) = self.ctx.token().await else {
            return Ok(None);
        };

        match self.ctx.api.me(&token).await {
            Ok(user) => {
                let mut state = self.ctx.state.write().await;
                if let Some(session) = &mut state.session {
                    session.user = user.clone();
                }
                Ok(Some(user))
            }
            Err(err) if err.is_unauthorized() => {
                self.ctx.tokens.clear()?;
                {
                    let mut state = self.ctx.state.write().await;
                    state.clear_session();
                    state.error = Some(UNAUTHORIZED.to_string());
                }
                self.ctx.events.emit(AppEvent::SessionExpired);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// True while an auth call is in flight.
    pub async fn loading(&self) -> bool {
        self.ctx.state.read().await.loading
    }

    /// Message from the last failed auth operation.
    pub async fn error(&self) -> Option<String> {
        self.ctx.state.read().await.error.clone()
    }

    async fn begin(&self) {
        let mut state = self.ctx.state.write().await;
        state.loading = true;
        state.error = None;
    }

    /// Record the failure message for the shell and re-throw.
    async fn fail<T>(&self, fallback: &str, err: AppError) -> AppResult<T> {
        let message = err.user_message(fallback);
        tracing::warn!("{}: {}", fallback, err);
        let mut state = self.ctx.state.write().await;
        state.loading = false;
        state.error = Some(message);
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::Utc;

    fn test_ctx() -> AppContext {
        // Nothing listens here; calls that reach the network fail fast.
        let config = Config::new("http://127.0.0.1:1").unwrap();
        AppContext::new(&config).unwrap()
    }

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

    #[tokio::test]
    async fn test_login_stores_token_and_user_for_next_check() {
        let ctx = test_ctx();
        let session = SessionManager::new(ctx.clone());

        session
            .apply_login(&AuthSession {
                token: "jwt-login".to_string(),
                user: user(1),
            })
            .await
            .unwrap();

        assert_eq!(ctx.tokens.access_token().as_deref(), Some("jwt-login"));
        assert_eq!(session.user().await.map(|u| u.id), Some(1));
        assert!(session.error().await.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_token_and_user_immediately() {
        let ctx = test_ctx();
        let session = SessionManager::new(ctx.clone());
        session
            .apply_login(&AuthSession {
                token: "jwt-login".to_string(),
                user: user(1),
            })
            .await
            .unwrap();

        session.logout().await.unwrap();

        assert!(ctx.tokens.access_token().is_none());
        assert!(session.user().await.is_none());
        assert!(!ctx.state.read().await.is_authenticated());
    }

    #[tokio::test]
    async fn test_bootstrap_without_token_sets_unauthorized_marker() {
        let ctx = test_ctx();
        let session = SessionManager::new(ctx);

        // No cookie: resolves locally, no network call is made.
        let restored = session.bootstrap().await.unwrap();

        assert!(restored.is_none());
        assert_eq!(session.error().await.as_deref(), Some(UNAUTHORIZED));
        assert!(!session.loading().await);
    }

    #[tokio::test]
    async fn test_failed_bootstrap_records_error_and_rethrows() {
        let ctx = test_ctx();
        ctx.tokens.set_access_token("jwt-stale").unwrap();
        let session = SessionManager::new(ctx);

        let err = session.bootstrap().await.unwrap_err();

        assert!(!err.is_unauthorized());
        assert_eq!(
            session.error().await.as_deref(),
            Some("Failed to restore session")
        );
        assert!(!session.loading().await);
    }

    #[tokio::test]
    async fn test_current_user_without_session_is_none() {
        let ctx = test_ctx();
        let session = SessionManager::new(ctx);

        assert!(session.current_user().await.unwrap().is_none());
    }
}
