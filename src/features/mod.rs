//! # Features Layer
//!
//! The todo list, its one-shot reminders, the recurring-reminder engine,
//! and the notification seam they deliver through.

pub mod notify;
pub mod recurring;
pub mod todos;

pub use notify::{LogNotifier, Notifier};
pub use recurring::{RecurringReminder, RecurringStore, ReminderIcon};
pub use todos::{ReminderWatcher, Todo, TodoStats, TodoStore};
