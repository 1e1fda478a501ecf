//! Optimistic toggle engine
//!
//! Flips a boolean relationship (liked / following) and its counter in local
//! state before the network call resolves, then reconciles with the outcome.
//! One cell tracks one entity, and a cell serializes its own toggles: while
//! a call is in flight, further toggles are ignored, so a double-click can
//! never stack two optimistic mutations on the same entity.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::AppResult;

/// Boolean relationship plus its counter, as a view renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    pub active: bool,
    pub count: i64,
}

impl ToggleState {
    pub fn new(active: bool, count: i64) -> Self {
        Self { active, count }
    }
}

#[derive(Debug)]
struct ToggleInner {
    state: ToggleState,
    in_flight: bool,
}

/// Result of a [`OptimisticToggle::toggle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The toggle settled; this is the state after reconciliation.
    Applied(ToggleState),
    /// A toggle for this entity was already in flight; nothing changed.
    Ignored,
}

/// Optimistic state cell for a single entity.
///
/// Cheap to clone; clones share the same cell.
#[derive(Debug, Clone)]
pub struct OptimisticToggle {
    inner: Arc<Mutex<ToggleInner>>,
}

impl OptimisticToggle {
    pub fn new(active: bool, count: i64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ToggleInner {
                state: ToggleState::new(active, count),
                in_flight: false,
            })),
        }
    }

    /// Current state, optimistic mutations included.
    pub fn state(&self) -> ToggleState {
        self.lock().state
    }

    /// Reseed from a fresh server copy. A cell with a toggle in flight
    /// keeps its optimistic state; the refetch lost that race.
    pub fn reseed(&self, active: bool, count: i64) {
        let mut inner = self.lock();
        if !inner.in_flight {
            inner.state = ToggleState::new(active, count);
        }
    }

    /// Flip the relationship optimistically, then reconcile with the result
    /// of `send`, which receives the new desired state and must issue the
    /// matching activate or deactivate call.
    ///
    /// The pre-toggle snapshot is captured before the mutation; a failure
    /// restores exactly that snapshot. While a call is in flight, further
    /// toggles on this cell return [`ToggleOutcome::Ignored`].
    pub async fn toggle<F, Fut>(&self, send: F) -> AppResult<ToggleOutcome>
    where
        F: FnOnce(bool) -> Fut,
        Fut: Future<Output = AppResult<()>>,
    {
        let (snapshot, desired) = {
            let mut inner = self.lock();
            if inner.in_flight {
                return Ok(ToggleOutcome::Ignored);
            }
            let snapshot = inner.state;
            inner.in_flight = true;
            inner.state.active = !snapshot.active;
            inner.state.count = if inner.state.active {
                snapshot.count + 1
            } else {
                snapshot.count - 1
            };
            (snapshot, inner.state.active)
        };

        // The lock is released before the network call; the snapshot
        // travels with the future, not with the cell.
        let result = send(desired).await;

        let mut inner = self.lock();
        inner.in_flight = false;
        match result {
            Ok(()) => Ok(ToggleOutcome::Applied(inner.state)),
            Err(err) => {
                inner.state = snapshot;
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ToggleInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn ok() -> AppResult<()> {
        Ok(())
    }

    fn network_error() -> AppResult<()> {
        Err(AppError::Api {
            status: 500,
            message: String::new(),
        })
    }

    #[tokio::test]
    async fn test_activate_then_deactivate_restores_initial_state() {
        let cell = OptimisticToggle::new(false, 3);

        let first = cell.toggle(|_| async { ok() }).await.unwrap();
        assert_eq!(first, ToggleOutcome::Applied(ToggleState::new(true, 4)));

        let second = cell.toggle(|_| async { ok() }).await.unwrap();
        assert_eq!(second, ToggleOutcome::Applied(ToggleState::new(false, 3)));

        assert_eq!(cell.state(), ToggleState::new(false, 3));
    }

    #[tokio::test]
    async fn test_send_receives_new_desired_state() {
        let cell = OptimisticToggle::new(true, 10);

        cell.toggle(|desired| async move {
            assert!(!desired, "toggling an active cell must deactivate");
            ok()
        })
        .await
        .unwrap();

        cell.toggle(|desired| async move {
            assert!(desired, "toggling an inactive cell must activate");
            ok()
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_optimistic_flip_is_visible_before_send_resolves() {
        let cell = OptimisticToggle::new(false, 3);

        let observer = cell.clone();
        cell.toggle(move |_| async move {
            // The flip happened before this future ran.
            assert_eq!(observer.state(), ToggleState::new(true, 4));
            ok()
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_failure_reverts_to_pre_toggle_snapshot() {
        let cell = OptimisticToggle::new(false, 3);

        let err = cell.toggle(|_| async { network_error() }).await.unwrap_err();
        assert!(matches!(err, AppError::Api { status: 500, .. }));

        assert_eq!(cell.state(), ToggleState::new(false, 3));
    }

    #[tokio::test]
    async fn test_failed_deactivation_restores_active_state() {
        let cell = OptimisticToggle::new(true, 8);

        cell.toggle(|_| async { network_error() }).await.unwrap_err();

        assert_eq!(cell.state(), ToggleState::new(true, 8));
    }

    #[tokio::test]
    async fn test_toggle_while_in_flight_is_ignored() {
        let cell = OptimisticToggle::new(false, 0);
        let (release, gate) = tokio::sync::oneshot::channel::<()>();

        let in_flight = cell.clone();
        let first = tokio::spawn(async move {
            in_flight
                .toggle(|_| async move {
                    gate.await.ok();
                    ok()
                })
                .await
        });

        // Wait for the optimistic flip to land.
        while cell.state().count == 0 {
            tokio::task::yield_now().await;
        }

        let second = cell.toggle(|_| async { ok() }).await.unwrap();
        assert_eq!(second, ToggleOutcome::Ignored);
        // The ignored toggle touched nothing.
        assert_eq!(cell.state(), ToggleState::new(true, 1));

        release.send(()).ok();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first, ToggleOutcome::Applied(ToggleState::new(true, 1)));
    }

    #[tokio::test]
    async fn test_reseed_during_flight_keeps_optimistic_state() {
        let cell = OptimisticToggle::new(false, 3);
        let (release, gate) = tokio::sync::oneshot::channel::<()>();

        let in_flight = cell.clone();
        let pending = tokio::spawn(async move {
            in_flight
                .toggle(|_| async move {
                    gate.await.ok();
                    ok()
                })
                .await
        });

        while cell.state().count == 3 {
            tokio::task::yield_now().await;
        }

        // A refetch that raced the toggle must not clobber it.
        cell.reseed(false, 3);
        assert_eq!(cell.state(), ToggleState::new(true, 4));

        release.send(()).ok();
        pending.await.unwrap().unwrap();

        // Once settled, reseeding applies again.
        cell.reseed(false, 9);
        assert_eq!(cell.state(), ToggleState::new(false, 9));
    }
}
