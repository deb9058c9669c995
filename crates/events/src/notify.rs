//! Notification side-channel to the external workflow engine.
//!
//! Specific event types (organization provisioning, user invitations) publish
//! a fire-and-forget, at-most-once signal for a long-running workflow engine
//! (DNS setup, invitation email). This core neither waits for nor depends on
//! that consumer's outcome.

use std::sync::{Mutex, mpsc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use orgspine_core::EventId;

use crate::record::DomainEvent;

/// Event types that publish a workflow signal after successful processing.
pub const NOTIFIED_EVENT_TYPES: &[&str] = &[
    "organization.created",
    "organization.deactivated",
    "user.created",
];

/// The signal published to the workflow engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub event_id: EventId,
    pub stream_id: Uuid,
    pub event_type: String,
}

impl Notification {
    pub fn for_event(event: &DomainEvent) -> Self {
        Self {
            event_id: event.id,
            stream_id: event.stream_id,
            event_type: event.event_type.clone(),
        }
    }
}

/// At-most-once, fire-and-forget publication.
///
/// Implementations swallow their own failures; the emitter never retries a
/// notification and never blocks on the consumer.
pub trait NotificationChannel: Send + Sync {
    fn publish(&self, notification: Notification);
}

impl<N> NotificationChannel for std::sync::Arc<N>
where
    N: NotificationChannel + ?Sized,
{
    fn publish(&self, notification: Notification) {
        (**self).publish(notification)
    }
}

/// Discards every signal. For tests and deployments without a workflow engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl NotificationChannel for NullNotifier {
    fn publish(&self, _notification: Notification) {}
}

/// In-memory channel-backed notifier for tests/dev.
#[derive(Debug)]
pub struct ChannelNotifier {
    sender: Mutex<mpsc::Sender<Notification>>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                sender: Mutex::new(tx),
            },
            rx,
        )
    }
}

impl NotificationChannel for ChannelNotifier {
    fn publish(&self, notification: Notification) {
        // Dead receivers are fine: at-most-once, best effort.
        if let Ok(sender) = self.sender.lock() {
            let _ = sender.send(notification);
        }
    }
}
