//! Per-resource state stores
//!
//! The view-facing layer: each store holds a local cache of fetched entities
//! plus `loading`/`error` flags, calls the API layer, and copies results into
//! local state. Last successful fetch wins: a refetch replaces cached lists.
//! Stores are per-view caches with no lifecycle of their own — create one
//! per view, drop it on unmount. Dropping a fetch future cancels its request,
//! so an unmounted view can never receive a late state update.

mod feed;
mod notifications;
mod profile;

pub use feed::{FeedSnapshot, FeedStore};
pub use notifications::{NotificationSnapshot, NotificationStore};
pub use profile::{ProfileSnapshot, ProfileStore};
