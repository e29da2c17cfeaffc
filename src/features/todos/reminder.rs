//! One-shot reminder due-check engine.
//!
//! A reminder is due while `now` sits inside the trailing window behind its
//! timestamp. Nothing on the todo records that it fired; duplicate
//! suppression is the watcher's job, by diffing consecutive due sets. That
//! makes the window/diff pair load-bearing: the poll period must stay
//! shorter than the window or a due reminder can slip through unseen.
//!
//! Across a process restart the active set resets, so a reminder still
//! inside the window fires again and one already outside it is silently
//! missed. Known, accepted behavior.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use super::store::Todo;

/// Trailing lookback behind a reminder timestamp during which it still fires
pub const TRAILING_WINDOW_SECS: i64 = 60;

/// Horizon ahead of now for the upcoming-reminder display
pub const UPCOMING_HORIZON_SECS: i64 = 3600;

/// Notification title for one-shot reminder fires
pub const REMINDER_TITLE: &str = "⏰ Reminder";

/// Whether a todo's reminder qualifies for notification at `now`.
///
/// Fires iff the todo is not completed, has a reminder, the reminder time
/// has passed, and it passed less than [`TRAILING_WINDOW_SECS`] ago.
pub fn is_due(todo: &Todo, now: DateTime<Utc>) -> bool {
    let Some(at) = todo.reminder_at else {
        return false;
    };
    !todo.completed
        && at <= now
        && at > now - Duration::seconds(TRAILING_WINDOW_SECS)
}

/// Incomplete todos whose reminder falls within the next hour, soonest
/// first. Display only; never triggers notification.
pub fn upcoming_reminders(todos: &[Todo], now: DateTime<Utc>) -> Vec<Todo> {
    let horizon = now + Duration::seconds(UPCOMING_HORIZON_SECS);
    let mut upcoming: Vec<Todo> = todos
        .iter()
        .filter(|t| {
            !t.completed
                && t.reminder_at
                    .map(|at| at > now && at <= horizon)
                    .unwrap_or(false)
        })
        .cloned()
        .collect();
    upcoming.sort_by_key(|t| t.reminder_at);
    upcoming
}

/// Tracks the active due set across sweeps so each reminder notifies once.
///
/// The trailing window keeps a due reminder visible on consecutive polls;
/// the watcher only reports the ones newly entering the set.
#[derive(Default)]
pub struct ReminderWatcher {
    active: HashSet<String>,
}

impl ReminderWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate every todo against `now` and return the newly-due ones.
    ///
    /// The active set is replaced with the current due set, so a reminder
    /// that leaves the window and somehow re-enters would notify again.
    pub fn sweep(&mut self, todos: &[Todo], now: DateTime<Utc>) -> Vec<Todo> {
        let due: Vec<&Todo> = todos.iter().filter(|t| is_due(t, now)).collect();

        let newly_due: Vec<Todo> = due
            .iter()
            .filter(|t| !self.active.contains(&t.id))
            .map(|t| (*t).clone())
            .collect();

        self.active = due.iter().map(|t| t.id.clone()).collect();
        newly_due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn todo_with_reminder(id: &str, at: Option<DateTime<Utc>>) -> Todo {
        Todo {
            id: id.to_string(),
            text: format!("todo {id}"),
            completed: false,
            created_at: t0() - Duration::hours(1),
            reminder_at: at,
        }
    }

    #[test]
    fn test_due_inside_trailing_window() {
        let todo = todo_with_reminder("a", Some(t0()));

        assert!(is_due(&todo, t0()));
        assert!(is_due(&todo, t0() + Duration::seconds(30)));
        assert!(is_due(&todo, t0() + Duration::seconds(59)));
    }

    #[test]
    fn test_not_due_before_reminder_time() {
        let todo = todo_with_reminder("a", Some(t0()));
        assert!(!is_due(&todo, t0() - Duration::seconds(1)));
    }

    #[test]
    fn test_not_due_once_window_closes() {
        let todo = todo_with_reminder("a", Some(t0()));

        assert!(!is_due(&todo, t0() + Duration::seconds(60)));
        assert!(!is_due(&todo, t0() + Duration::minutes(5)));
    }

    #[test]
    fn test_completed_suppresses_firing() {
        let mut todo = todo_with_reminder("a", Some(t0()));
        todo.completed = true;

        assert!(!is_due(&todo, t0()));
    }

    #[test]
    fn test_no_reminder_never_due() {
        let todo = todo_with_reminder("a", None);
        assert!(!is_due(&todo, t0()));
    }

    #[test]
    fn test_completing_due_todo_suppresses_next_sweep() {
        let mut todo = todo_with_reminder("a", Some(t0()));
        let mut watcher = ReminderWatcher::new();

        assert_eq!(watcher.sweep(&[todo.clone()], t0()).len(), 1);

        // Completed mid-window with reminder_at unchanged
        todo.completed = true;
        let again = watcher.sweep(&[todo], t0() + Duration::seconds(10));
        assert!(again.is_empty());
    }

    #[test]
    fn test_watcher_notifies_once_within_window() {
        let todo = todo_with_reminder("a", Some(t0()));
        let mut watcher = ReminderWatcher::new();

        let first = watcher.sweep(std::slice::from_ref(&todo), t0());
        assert_eq!(first.len(), 1);

        // Still due ten seconds later, but already in the active set
        let second = watcher.sweep(std::slice::from_ref(&todo), t0() + Duration::seconds(10));
        assert!(second.is_empty());
    }

    #[test]
    fn test_watcher_drops_expired_reminders() {
        let todo = todo_with_reminder("a", Some(t0()));
        let mut watcher = ReminderWatcher::new();

        watcher.sweep(std::slice::from_ref(&todo), t0());
        let after_window = watcher.sweep(std::slice::from_ref(&todo), t0() + Duration::minutes(2));
        assert!(after_window.is_empty());
        assert!(watcher.active.is_empty());
    }

    #[test]
    fn test_watcher_handles_multiple_reminders() {
        let a = todo_with_reminder("a", Some(t0()));
        let b = todo_with_reminder("b", Some(t0() + Duration::seconds(30)));
        let mut watcher = ReminderWatcher::new();

        let first = watcher.sweep(&[a.clone(), b.clone()], t0());
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "a");

        let second = watcher.sweep(&[a, b], t0() + Duration::seconds(30));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, "b");
    }

    #[test]
    fn test_fresh_watcher_refires_inside_window() {
        // Restart semantics: a new watcher has no memory of prior fires
        let todo = todo_with_reminder("a", Some(t0()));

        let mut watcher = ReminderWatcher::new();
        assert_eq!(watcher.sweep(std::slice::from_ref(&todo), t0()).len(), 1);

        let mut restarted = ReminderWatcher::new();
        let refired = restarted.sweep(std::slice::from_ref(&todo), t0() + Duration::seconds(30));
        assert_eq!(refired.len(), 1);
    }

    #[test]
    fn test_upcoming_window_and_order() {
        let soon = todo_with_reminder("soon", Some(t0() + Duration::minutes(10)));
        let later = todo_with_reminder("later", Some(t0() + Duration::minutes(50)));
        let past = todo_with_reminder("past", Some(t0() - Duration::minutes(1)));
        let far = todo_with_reminder("far", Some(t0() + Duration::minutes(90)));
        let mut done = todo_with_reminder("done", Some(t0() + Duration::minutes(5)));
        done.completed = true;
        let none = todo_with_reminder("none", None);

        let upcoming = upcoming_reminders(&[later, far, past, done, none, soon], t0());
        let ids: Vec<&str> = upcoming.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["soon", "later"]);
    }

    #[test]
    fn test_upcoming_includes_exact_horizon() {
        let edge = todo_with_reminder("edge", Some(t0() + Duration::hours(1)));
        let upcoming = upcoming_reminders(std::slice::from_ref(&edge), t0());
        assert_eq!(upcoming.len(), 1);
    }
}
