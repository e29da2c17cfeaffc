//! # Feature: Todo List
//!
//! The todo collection and its one-shot reminder engine. Each todo may
//! carry an optional reminder timestamp that fires once when wall-clock
//! time passes it.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Hour/minute reminder scheduling with roll-to-tomorrow
//! - 1.1.0: One-shot due-check engine with trailing window and set-diff dedup
//! - 1.0.0: Initial release with add/toggle/delete/clear-completed

pub mod reminder;
pub mod store;

pub use reminder::{upcoming_reminders, ReminderWatcher};
pub use store::{Todo, TodoStats, TodoStore};
