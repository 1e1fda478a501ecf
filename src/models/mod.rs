//! Data models for the Chirp client core
//!
//! Plain records mirroring server resources; the client holds transient,
//! disposable copies with no independent lifecycle.

mod types;

pub use types::*;
