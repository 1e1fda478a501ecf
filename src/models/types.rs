//! Shared data types mirroring the Chirp REST resources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Types
// ============================================================================

/// Login request body; either `email` or `username` identifies the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
}

impl LoginRequest {
    pub fn with_email(email: &str, password: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            username: None,
            password: password.to_string(),
        }
    }

    pub fn with_username(username: &str, password: &str) -> Self {
        Self {
            email: None,
            username: Some(username.to_string()),
            password: password.to_string(),
        }
    }
}

/// Registration request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub password: String,
}

/// Successful login payload: a bearer token plus the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

// ============================================================================
// Users
// ============================================================================

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; unset fields are left unchanged by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

// ============================================================================
// Tweets
// ============================================================================

/// A post in the feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: i64,
    pub user_id: i64,
    /// Embedded author, present on feed responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    /// Whether the requesting user has liked this tweet
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub likes_count: i64,
    #[serde(default)]
    pub replies_count: i64,
    #[serde(default)]
    pub retweets_count: i64,
    #[serde(default)]
    pub bookmarks_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compose request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTweetRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

/// Edit request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTweetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

// ============================================================================
// Relationships
// ============================================================================

/// A following relationship between two users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    #[serde(default)]
    pub id: i64,
    pub follower_id: i64,
    pub following_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A user liking a tweet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    #[serde(default)]
    pub id: i64,
    pub user_id: i64,
    pub tweet_id: i64,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Notifications
// ============================================================================

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Follow,
    Reply,
    Mention,
    #[serde(other)]
    Other,
}

/// A notification delivered to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Media
// ============================================================================

/// Metadata for media attached to a tweet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: i64,
    pub tweet_id: i64,
    pub media_url: String,
    pub media_type: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Response Envelope
// ============================================================================

/// The `{ data }` wrapper the backend puts around every JSON response.
/// Error payloads share the shape, carrying `message` and field `errors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging: Option<PageMetaData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl<T> Envelope<T> {
    /// An envelope with nothing in it, for bodies that fail to parse.
    pub fn empty() -> Self {
        Self {
            message: None,
            data: None,
            paging: None,
            errors: Vec::new(),
        }
    }
}

/// Pagination metadata the backend attaches to list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMetaData {
    pub page: i64,
    pub size: i64,
    pub total_item: i64,
    pub total_page: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Navigation links for a paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub current: String,
    pub first: String,
    pub prev: String,
    pub next: String,
    pub last: String,
}

/// Per-field validation failure from the server's error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tweet_counters_default_when_absent() {
        let tweet: Tweet = serde_json::from_str(
            r#"{
                "id": 7,
                "user_id": 3,
                "content": "hello",
                "created_at": "2025-06-01T12:00:00Z",
                "updated_at": "2025-06-01T12:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(tweet.id, 7);
        assert!(!tweet.is_liked);
        assert_eq!(tweet.likes_count, 0);
        assert!(tweet.user.is_none());
        assert!(tweet.media_url.is_none());
    }

    #[test]
    fn test_envelope_unwraps_data() {
        let envelope: Envelope<Vec<Like>> = serde_json::from_str(
            r#"{
                "message": "ok",
                "data": [
                    {"id": 1, "user_id": 2, "tweet_id": 9, "created_at": "2025-06-01T12:00:00Z"}
                ]
            }"#,
        )
        .unwrap();

        let likes = envelope.data.unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].tweet_id, 9);
    }

    #[test]
    fn test_envelope_carries_field_errors() {
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(
            r#"{
                "message": "validation failed",
                "errors": [
                    {"field": "email", "message": "must be a valid email"},
                    {"field": "password", "message": "is required"}
                ]
            }"#,
        )
        .unwrap();

        assert!(envelope.data.is_none());
        assert_eq!(envelope.errors.len(), 2);
        assert_eq!(envelope.errors[0].field, "email");
    }

    #[test]
    fn test_unknown_notification_kind_maps_to_other() {
        let notification: Notification = serde_json::from_str(
            r#"{
                "id": 4,
                "user_id": 2,
                "type": "retweet",
                "content": "someone retweeted your post",
                "is_read": false,
                "created_at": "2025-06-01T12:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(notification.kind, NotificationKind::Other);

        let known: Notification = serde_json::from_str(
            r#"{
                "id": 5,
                "user_id": 2,
                "type": "like",
                "content": "someone liked your post",
                "created_at": "2025-06-01T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(known.kind, NotificationKind::Like);
        assert!(!known.is_read);
    }
}
