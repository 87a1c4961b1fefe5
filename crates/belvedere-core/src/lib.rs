//! Core types, trait definitions and workflow rules for the Belvedere
//! landscape observatory.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod actor;
pub mod annotate;
pub mod campaign;
pub mod error;
pub mod lookup;
pub mod picture;
pub mod serde_ext;
pub mod store;
pub mod viewpoint;
pub mod workflow;

pub use error::{Error, Result};
