//! Collaborators the wizard hands control to: submission and cancel.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

use super::model::{ActorType, FormData};

/// Receives the finished form exactly once per completed wizard.
pub trait SubmitHandler: Send + Sync {
    fn submit(&self, data: FormData);
}

impl<F> SubmitHandler for F
where
    F: Fn(FormData) + Send + Sync,
{
    fn submit(&self, data: FormData) {
        self(data)
    }
}

/// Called when the user backs out of the first step.
pub trait BackHandler: Send + Sync {
    fn back(&self);
}

impl<F> BackHandler for F
where
    F: Fn() + Send + Sync,
{
    fn back(&self) {
        self()
    }
}

/// A completed signup, as handed to asynchronous consumers.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub actor_type: ActorType,
    pub submitted_at: DateTime<Utc>,
    pub data: FormData,
}

/// Forwards submissions into an unbounded channel without waiting on the
/// consumer.
pub struct ChannelSubmitter {
    actor_type: ActorType,
    tx: UnboundedSender<Registration>,
}

impl ChannelSubmitter {
    /// Create a submitter and the receiving end for the consumer task.
    pub fn channel(actor_type: ActorType) -> (Self, UnboundedReceiver<Registration>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { actor_type, tx }, rx)
    }
}

impl SubmitHandler for ChannelSubmitter {
    fn submit(&self, data: FormData) {
        let registration = Registration {
            actor_type: self.actor_type,
            submitted_at: Utc::now(),
            data,
        };
        if self.tx.send(registration).is_err() {
            warn!(actor = %self.actor_type, "Registration consumer is gone, submission dropped");
        }
    }
}
