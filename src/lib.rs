//! flixbridge - resolve TMDB IDs to streaming sources
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod fetch;
pub mod metadata;
pub mod pipeline;
pub mod server;
pub mod skiptimes;
pub mod streams;
