//! # Feature: Recurring Reminders
//!
//! Named reminders that re-fire every time their interval elapses since the
//! last firing, independent of the todo list. Firing re-arms from the fire
//! time, so drift accumulates and missed intervals are never backfilled.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Seed last-triggered at creation to defer the first fire
//! - 1.0.0: Initial release with interval scheduling and enable toggle

pub mod scheduler;
pub mod store;

pub use scheduler::{is_due, time_until_next};
pub use store::{RecurringReminder, RecurringStore, ReminderIcon};
