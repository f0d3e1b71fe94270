//! # Notification
//!
//! Subscriber notification collaborator and the report message it carries.

pub mod message;

pub use message::NotificationMessage;

use crate::error::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Topic-based notification service
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, topic: &str, subject: &str, body: &str) -> Result<()>;
}

/// Writes notifications to the structured log instead of delivering them
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn publish(&self, topic: &str, subject: &str, body: &str) -> Result<()> {
        info!(topic, subject, body, "Notification published");
        Ok(())
    }
}

/// A notification captured by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedNotification {
    pub topic: String,
    pub subject: String,
    pub body: String,
}

/// Keeps every published notification in memory. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    published: Arc<Mutex<Vec<PublishedNotification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<PublishedNotification> {
        self.published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, topic: &str, subject: &str, body: &str) -> Result<()> {
        self.published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(PublishedNotification {
                topic: topic.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        Ok(())
    }
}
