//! # coach_core
//!
//! Core relay logic for Growth Coach: ChatKit configuration, the ChatKit
//! client, and the session-then-message relay sequence.

pub mod chatkit;
pub mod config;
pub mod relay;

#[cfg(test)]
mod testing;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
