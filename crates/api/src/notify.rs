//! Notification collaborator boundary.
//!
//! After a successful creation or status transition the handlers describe
//! what should be communicated; actual formatting and delivery (email, SMS)
//! belong to an external system behind [`Notifier`]. The default
//! implementation only logs, which keeps the booking flow fully functional
//! without a delivery backend.

use async_trait::async_trait;
use bookwise_core::models::notification::Notification;
use tracing::info;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification);
}

/// Logs each notification instead of delivering it.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) {
        info!(
            to = %notification.to,
            kind = ?notification.kind,
            subject = %notification.subject,
            "notification queued"
        );
    }
}
