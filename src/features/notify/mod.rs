//! # Feature: Notification Surface
//!
//! Single-call contract the reminder engines deliver through. The engines
//! never batch or rate-limit; every fired reminder is one `notify` call.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use async_trait::async_trait;
use log::info;

/// Delivery seam for fired reminders.
///
/// Implementations decide what a notification looks like (log line, desktop
/// toast, message bus). The engines only promise one call per newly-due
/// one-shot reminder and one call per recurring fire.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, body: &str);
}

/// Default notifier that surfaces reminders on the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, body: &str) {
        info!("🔔 {title}: {body}");
    }
}
