//! SwingScope Common Utilities
//!
//! Shared infrastructure for all SwingScope crates:
//! - Error types and result aliases
//! - Configuration sections and the standard config location
//! - Tracing/logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
