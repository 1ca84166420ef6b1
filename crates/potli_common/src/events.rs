// --- File: crates/potli_common/src/events.rs ---
//! In-process domain events.
//!
//! Handlers emit after the write succeeds; subscribers run on their own tasks
//! so email delivery never delays or fails a request.

use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data")]
pub enum DomainEvent {
    #[serde(rename = "customer.created")]
    CustomerCreated { id: String },
    #[serde(rename = "invite.created")]
    InviteCreated { id: String },
    #[serde(rename = "invite.accepted")]
    InviteAccepted { id: String },
    #[serde(rename = "auth.password_reset")]
    PasswordReset {
        /// The identifier the reset was requested for, usually an email.
        entity_id: String,
        token: String,
        actor_type: String,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::CustomerCreated { .. } => "customer.created",
            DomainEvent::InviteCreated { .. } => "invite.created",
            DomainEvent::InviteAccepted { .. } => "invite.accepted",
            DomainEvent::PasswordReset { .. } => "auth.password_reset",
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes `event`. Having no subscribers is not an error.
    pub fn emit(&self, event: DomainEvent) {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => debug!("Emitted {} to {} subscriber(s)", name, receivers),
            Err(_) => debug!("Emitted {} with no subscribers", name),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    /// Spawns a task feeding every event to `handler` until the bus is dropped.
    pub fn spawn_subscriber<F, Fut>(&self, name: &'static str, handler: F) -> JoinHandle<()>
    where
        F: Fn(DomainEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut receiver = self.subscribe();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => handler(event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Subscriber {} lagged, skipped {} event(s)", name, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            debug!("Subscriber {} stopped", name);
        })
    }
}
