//! Chirp Client Core
//!
//! This crate is the headless core of the Chirp social client: all client
//! behavior — REST calls, the auth session, per-resource caches, and
//! optimistic mutation — lives here behind a typed API, and a UI shell
//! renders the state the stores expose.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod session;
pub mod state;
pub mod stores;
pub mod toggle;
pub mod token;

pub use crate::api::ApiClient;
pub use crate::config::Config;
pub use crate::error::{AppError, AppResult};
pub use crate::events::{AppEvent, EventBus};
pub use crate::session::SessionManager;
pub use crate::stores::{FeedStore, NotificationStore, ProfileStore};
pub use crate::toggle::{OptimisticToggle, ToggleOutcome, ToggleState};

use tokio::sync::broadcast;

use crate::state::AppContext;

/// Initialize logging for an embedding shell.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirp_client=info".into()),
        )
        .init();
}

/// The assembled client: API access, session state, stores, and events.
///
/// Lifecycle: construct once at startup, run [`SessionManager::bootstrap`]
/// to restore any persisted session, and tear the session down through
/// [`SessionManager::logout`]. Stores handed out here are per-view caches;
/// create them where a view mounts and drop them with it.
pub struct App {
    ctx: AppContext,
}

impl App {
    /// Wire up the client from a resolved configuration.
    pub fn new(config: Config) -> AppResult<Self> {
        let ctx = AppContext::new(&config)?;
        tracing::info!("Chirp client initialized for {}", config.server_url);
        Ok(Self { ctx })
    }

    /// Wire up the client from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Self::new(Config::from_env()?)
    }

    /// Session lifecycle: bootstrap, login, register, logout.
    pub fn session(&self) -> SessionManager {
        SessionManager::new(self.ctx.clone())
    }

    /// Home feed: tweets, likes, composer media.
    pub fn feed(&self) -> FeedStore {
        FeedStore::new(self.ctx.clone())
    }

    /// Profiles, the user directory, and follow relationships.
    pub fn profile(&self) -> ProfileStore {
        ProfileStore::new(self.ctx.clone())
    }

    /// Notification list and read state.
    pub fn notifications(&self) -> NotificationStore {
        NotificationStore::new(self.ctx.clone())
    }

    /// Subscribe to user-facing events (toast material).
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.ctx.events.subscribe()
    }
}
