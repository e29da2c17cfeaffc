// Core layer - shared types and configuration
pub mod core;

// Features layer - all feature modules
pub mod features;

// Infrastructure - key-value persistence
pub mod storage;

// Application layer - the poll loop driving both reminder engines
pub mod sweep;

// Re-export core config
pub use core::Config;

// Re-export feature items
pub use features::{
    // Notifications
    LogNotifier, Notifier,
    // Recurring reminders
    RecurringReminder, RecurringStore, ReminderIcon,
    // Todos
    ReminderWatcher, Todo, TodoStats, TodoStore,
};

// Re-export infrastructure and the sweep loop
pub use storage::{JsonFileStore, KvStore, MemoryStore, Persister};
pub use sweep::{SweepHandle, SweepService};
