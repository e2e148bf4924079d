//! Core types and trait definitions for the Roster volunteer console.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod action;
pub mod assign;
pub mod error;
pub mod event;
pub mod participation;
pub mod role;
pub mod roster;
pub mod selection;
pub mod store;
pub mod volunteer;

pub use error::{Error, Result};
