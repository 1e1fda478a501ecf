//! REST API layer: one module per backend resource
//!
//! All endpoint calls go through [`ApiClient`]; the resource modules add
//! the endpoint methods in their own `impl` blocks.

mod auth;
mod client;
mod follow;
mod like;
mod media;
mod notification;
mod tweet;
mod user;

pub use client::ApiClient;
