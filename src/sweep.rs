//! # Reminder Sweep
//!
//! The poll loop driving both reminder engines. One repeating timer
//! re-evaluates every reminder each tick against a single captured `now`;
//! a second, slower timer refreshes the display clock used by the
//! upcoming-reminder view. There are no per-entity timers, so latency is
//! bounded by the poll period and the timer count stays constant however
//! many reminders exist.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::features::notify::Notifier;
use crate::features::recurring::RecurringStore;
use crate::features::todos::reminder::{upcoming_reminders, ReminderWatcher, REMINDER_TITLE};
use crate::features::todos::{Todo, TodoStore};

/// Evaluates both reminder engines on a shared tick.
pub struct SweepService {
    todos: Arc<TodoStore>,
    recurring: Arc<RecurringStore>,
    notifier: Arc<dyn Notifier>,
    watcher: Mutex<ReminderWatcher>,
    /// Set while a sweep is in progress; an overlapping tick is skipped,
    /// never queued.
    checking: AtomicBool,
    display_now: RwLock<DateTime<Utc>>,
}

impl SweepService {
    pub fn new(
        todos: Arc<TodoStore>,
        recurring: Arc<RecurringStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            todos,
            recurring,
            notifier,
            watcher: Mutex::new(ReminderWatcher::new()),
            checking: AtomicBool::new(false),
            display_now: RwLock::new(Utc::now()),
        }
    }

    /// Run one sweep: every reminder in both subsystems is evaluated
    /// against the same `now`, and each newly-due one produces exactly one
    /// notification.
    pub async fn tick(&self, now: DateTime<Utc>) {
        if self
            .checking
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Sweep already in progress, skipping tick");
            return;
        }

        let todos = self.todos.snapshot().await;
        let newly_due = self.watcher.lock().await.sweep(&todos, now);
        for todo in &newly_due {
            self.notifier.notify(REMINDER_TITLE, &todo.text).await;
        }

        let fired = self.recurring.fire_due(now).await;
        for reminder in &fired {
            self.notifier.notify(&reminder.title, &reminder.message).await;
        }

        if !newly_due.is_empty() || !fired.is_empty() {
            info!(
                "Sweep delivered {} one-shot and {} recurring notifications",
                newly_due.len(),
                fired.len()
            );
        }

        self.checking.store(false, Ordering::SeqCst);
    }

    /// Refresh the clock the upcoming view is rendered against.
    pub async fn refresh_display_clock(&self, now: DateTime<Utc>) {
        *self.display_now.write().await = now;
    }

    /// Incomplete todos with a reminder inside the next hour, soonest
    /// first, relative to the display clock.
    pub async fn upcoming(&self) -> Vec<Todo> {
        let now = *self.display_now.read().await;
        upcoming_reminders(&self.todos.snapshot().await, now)
    }

    /// Spawn the poll and clock loops, returning their owning handle.
    ///
    /// The first poll tick fires immediately. The loops run until the
    /// handle is stopped or dropped.
    pub fn start(self: Arc<Self>, poll_period: Duration, clock_period: Duration) -> SweepHandle {
        let service = self.clone();
        let poll_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_period);
            loop {
                interval.tick().await;
                service.tick(Utc::now()).await;
            }
        });

        let clock_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(clock_period);
            loop {
                interval.tick().await;
                self.refresh_display_clock(Utc::now()).await;
            }
        });

        SweepHandle {
            poll_task,
            clock_task,
        }
    }
}

/// Owning lifecycle for the sweep loops.
///
/// Stopping aborts the underlying tasks; dropping the handle does the same,
/// so a torn-down service can't leak timers.
pub struct SweepHandle {
    poll_task: JoinHandle<()>,
    clock_task: JoinHandle<()>,
}

impl SweepHandle {
    pub fn stop(&self) {
        self.poll_task.abort();
        self.clock_task.abort();
        debug!("Sweep loops stopped");
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
