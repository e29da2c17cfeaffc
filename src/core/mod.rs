//! # Core Module
//!
//! Configuration and shared runtime defaults.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

pub mod config;

// Re-export commonly used items
pub use config::Config;
