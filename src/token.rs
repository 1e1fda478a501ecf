//! Access-token cookie store
//!
//! The bearer token lives in a cookie named `accessToken`, matching the web
//! client. An optional backing file keeps the cookie across restarts the way
//! a browser jar would; this is the only durable state the client owns.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cookie::time::{Duration as CookieDuration, OffsetDateTime};
use cookie::{Cookie, CookieJar};

use crate::error::AppResult;

/// Name of the cookie holding the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Days until a stored token cookie expires, matching the web client.
const TOKEN_TTL_DAYS: i64 = 7;

/// Cookie jar for the access token, optionally backed by a file.
///
/// Cheap to clone; clones share the same jar.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: Option<PathBuf>,
    jar: Arc<Mutex<CookieJar>>,
}

impl TokenStore {
    /// In-memory store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            jar: Arc::new(Mutex::new(CookieJar::new())),
        }
    }

    /// Open a store backed by `path`, loading any cookie persisted there.
    /// Expired cookies are discarded on load.
    pub fn open(path: Option<PathBuf>) -> AppResult<Self> {
        let mut jar = CookieJar::new();
        if let Some(path) = &path {
            if path.exists() {
                let contents = fs::read_to_string(path)?;
                for line in contents.lines().filter(|l| !l.trim().is_empty()) {
                    match Cookie::parse(line.trim().to_string()) {
                        Ok(cookie) if !is_expired(&cookie) => jar.add_original(cookie),
                        Ok(_) => {}
                        Err(e) => tracing::warn!("Skipping unparsable cookie line: {}", e),
                    }
                }
            }
        }
        Ok(Self {
            path,
            jar: Arc::new(Mutex::new(jar)),
        })
    }

    /// Current access token, if a live cookie is present.
    pub fn access_token(&self) -> Option<String> {
        let jar = self.lock();
        jar.get(ACCESS_TOKEN_COOKIE)
            .filter(|c| !is_expired(c))
            .map(|c| c.value().to_string())
    }

    /// Store `token` with the standard expiry and persist the jar.
    pub fn set_access_token(&self, token: &str) -> AppResult<()> {
        let expires = OffsetDateTime::now_utc() + CookieDuration::days(TOKEN_TTL_DAYS);
        let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, token.to_string()))
            .path("/")
            .expires(expires)
            .build();
        {
            let mut jar = self.lock();
            jar.add_original(cookie);
        }
        self.persist()
    }

    /// Remove the token cookie and persist. Synchronous, no network.
    pub fn clear(&self) -> AppResult<()> {
        {
            let mut jar = self.lock();
            jar.remove(ACCESS_TOKEN_COOKIE);
        }
        self.persist()
    }

    fn persist(&self) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let lines: Vec<String> = {
            let jar = self.lock();
            jar.iter()
                .filter(|c| !is_expired(c))
                .map(|c| c.to_string())
                .collect()
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, lines.join("\n"))?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, CookieJar> {
        self.jar.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_expired(cookie: &Cookie<'_>) -> bool {
    match cookie.expires_datetime() {
        Some(when) => when <= OffsetDateTime::now_utc(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_read_token() {
        let store = TokenStore::in_memory();
        assert!(store.access_token().is_none());

        store.set_access_token("jwt-abc").unwrap();
        assert_eq!(store.access_token().as_deref(), Some("jwt-abc"));
    }

    #[test]
    fn test_clear_removes_token_without_network() {
        let store = TokenStore::in_memory();
        store.set_access_token("jwt-abc").unwrap();

        store.clear().unwrap();
        assert!(store.access_token().is_none());
    }

    #[test]
    fn test_token_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies");

        let store = TokenStore::open(Some(path.clone())).unwrap();
        store.set_access_token("jwt-persisted").unwrap();

        let reopened = TokenStore::open(Some(path)).unwrap();
        assert_eq!(reopened.access_token().as_deref(), Some("jwt-persisted"));
    }

    #[test]
    fn test_cleared_token_stays_cleared_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies");

        let store = TokenStore::open(Some(path.clone())).unwrap();
        store.set_access_token("jwt-transient").unwrap();
        store.clear().unwrap();

        let reopened = TokenStore::open(Some(path)).unwrap();
        assert!(reopened.access_token().is_none());
    }

    #[test]
    fn test_expired_cookie_is_discarded_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies");

        let expired = Cookie::build((ACCESS_TOKEN_COOKIE, "stale"))
            .path("/")
            .expires(OffsetDateTime::now_utc() - CookieDuration::days(1))
            .build();
        fs::write(&path, expired.to_string()).unwrap();

        let store = TokenStore::open(Some(path)).unwrap();
        assert!(store.access_token().is_none());
    }
}
