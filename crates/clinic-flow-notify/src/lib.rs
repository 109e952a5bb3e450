//! Notification collaborator for ClinicFlow.
//!
//! The workflow tracker never sends notifications itself; calling UI code
//! invokes this crate after a successful transition. The boundary is the
//! [`Notifier`] trait; [`ToastCenter`] is the in-memory feed the screens
//! read their toasts from.

pub mod templates;

pub use templates::*;

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use clinic_flow_core::models::{StaffRole, VisitStatus};

/// Notification errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;

impl<T> From<std::sync::PoisonError<T>> for NotifyError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        NotifyError::Dispatch(format!("Lock poisoned: {}", e))
    }
}

/// A single notification for one role's feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Unique notification ID
    pub notification_id: String,
    /// Role whose feed this lands in
    pub recipient_role: StaffRole,
    /// Short title
    pub title: String,
    /// Message body
    pub body: String,
    /// Creation timestamp
    pub created_at: String,
    /// Read marker
    pub read: bool,
}

impl Notification {
    /// Build the stage-arrival notification for one transition.
    pub fn stage_change(patient_name: &str, new_status: VisitStatus) -> Self {
        let (title, body) = templates::stage_change_message(patient_name, new_status);
        Self {
            notification_id: uuid::Uuid::new_v4().to_string(),
            recipient_role: templates::recipient_role(new_status),
            title,
            body,
            created_at: chrono::Utc::now().to_rfc3339(),
            read: false,
        }
    }
}

/// Dispatch boundary the UI plugs its delivery into.
pub trait Notifier {
    /// Deliver one notification.
    fn dispatch(&self, notification: Notification) -> NotifyResult<()>;
}

/// In-memory toast feed.
#[derive(Debug, Default)]
pub struct ToastCenter {
    feed: Mutex<Vec<Notification>>,
}

impl ToastCenter {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications for one role, newest first.
    pub fn list(&self, role: StaffRole) -> NotifyResult<Vec<Notification>> {
        let feed = self.feed.lock()?;
        let mut items: Vec<Notification> = feed
            .iter()
            .filter(|n| n.recipient_role == role)
            .cloned()
            .collect();
        items.reverse();
        Ok(items)
    }

    /// Unread count for one role.
    pub fn unread_count(&self, role: StaffRole) -> NotifyResult<usize> {
        let feed = self.feed.lock()?;
        Ok(feed
            .iter()
            .filter(|n| n.recipient_role == role && !n.read)
            .count())
    }

    /// Mark everything in one role's feed as read.
    pub fn mark_all_read(&self, role: StaffRole) -> NotifyResult<()> {
        let mut feed = self.feed.lock()?;
        for notification in feed.iter_mut().filter(|n| n.recipient_role == role) {
            notification.read = true;
        }
        Ok(())
    }
}

impl Notifier for ToastCenter {
    fn dispatch(&self, notification: Notification) -> NotifyResult<()> {
        let mut feed = self.feed.lock()?;
        feed.push(notification);
        Ok(())
    }
}
