//! Application events surfaced to the embedding shell
//!
//! Stores publish user-facing failures here so a shell can show a toast
//! instead of the failure disappearing into a log line. The channel is the
//! library-side analogue of a desktop shell's event emitter.

use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Events a shell may want to present to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The stored token was rejected by the server; the session was cleared.
    SessionExpired,
    /// A user-initiated action failed after its optimistic state was
    /// rolled back.
    ActionFailed { action: String, message: String },
}

/// Broadcast fan-out for [`AppEvent`]s.
///
/// Cheap to clone; clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    /// Subscribe to events; a receiver sees every event emitted after it
    /// subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Emit an event. Dropped silently when no shell is listening.
    pub fn emit(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("No event subscribers; event dropped");
        }
    }

    pub(crate) fn action_failed(&self, action: &str, message: impl Into<String>) {
        self.emit(AppEvent::ActionFailed {
            action: action.to_string(),
            message: message.into(),
        });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
