//! User endpoints

use crate::error::AppResult;
use crate::models::{UpdateUserRequest, User};

use super::ApiClient;

impl ApiClient {
    /// List all users
    pub async fn users(&self, token: Option<&str>) -> AppResult<Vec<User>> {
        self.get("/users", token).await
    }

    /// Get user by ID
    pub async fn user(&self, id: i64, token: Option<&str>) -> AppResult<User> {
        self.get(&format!("/users/{}", id), token).await
    }

    /// Get the user the token belongs to
    pub async fn me(&self, token: &str) -> AppResult<User> {
        self.get("/users/token", Some(token)).await
    }

    /// Update profile fields
    pub async fn update_user(
        &self,
        id: i64,
        request: &UpdateUserRequest,
        token: &str,
    ) -> AppResult<User> {
        self.put(&format!("/users/{}", id), request, Some(token)).await
    }

    /// Delete an account
    pub async fn delete_user(&self, id: i64, token: &str) -> AppResult<()> {
        self.delete(&format!("/users/{}", id), Some(token)).await
    }
}
