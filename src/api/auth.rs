//! Authentication endpoints

use crate::error::AppResult;
use crate::models::{AuthSession, LoginRequest, RegisterRequest, User};

use super::ApiClient;

impl ApiClient {
    /// Exchange credentials for a bearer token and the signed-in user.
    pub async fn login(&self, request: &LoginRequest) -> AppResult<AuthSession> {
        self.post("/auth/login", request, None).await
    }

    /// Create a new account. Returns the created user; signing in is a
    /// separate step.
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        self.post("/auth/register", request, None).await
    }
}
