//! Recurring-reminder timing rules.
//!
//! Pure time comparisons only; all state changes live in the store. These
//! run on every poll tick and every render, so they must stay cheap and
//! side-effect free.

use chrono::{DateTime, Duration, Utc};

use super::store::RecurringReminder;

/// Minutes elapsed since the reminder last fired.
///
/// A reminder that has never fired counts from the Unix epoch, which makes
/// it immediately eligible; creation seeds `last_triggered` precisely to
/// keep that from happening on a fresh reminder.
fn minutes_since_trigger(reminder: &RecurringReminder, now: DateTime<Utc>) -> f64 {
    let last = reminder.last_triggered.unwrap_or(DateTime::UNIX_EPOCH);
    (now - last).num_milliseconds() as f64 / 60_000.0
}

/// Whether the reminder should fire at `now`.
pub fn is_due(reminder: &RecurringReminder, now: DateTime<Utc>) -> bool {
    reminder.enabled && minutes_since_trigger(reminder, now) >= reminder.interval_minutes as f64
}

/// Human-readable time until the next fire.
///
/// Pure function of `(reminder, now)`; queried on every render and must not
/// mutate the reminder.
pub fn time_until_next(reminder: &RecurringReminder, now: DateTime<Utc>) -> String {
    if !reminder.enabled {
        return "Disabled".to_string();
    }
    let Some(last) = reminder.last_triggered else {
        return "Next: Soon".to_string();
    };

    let next = last + Duration::minutes(reminder.interval_minutes as i64);
    if next <= now {
        return "Due now".to_string();
    }

    match (next - now).num_minutes() {
        0 => "Less than a minute".to_string(),
        1 => "1 minute".to_string(),
        mins => format!("{mins} minutes"),
    }
}
