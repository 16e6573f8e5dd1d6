use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::models::grn::GrnNumber;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of erroring when the receiver is gone.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Dropping event: {}", e);
        }
    }
}

// Define the various events that can occur in the GRN workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    GrnSubmitted {
        number: GrnNumber,
        grand_total: Decimal,
    },
    GrnSubmissionFailed {
        reason: String,
    },
    GrnDeleted {
        number: GrnNumber,
    },
    GrnDraftReset,
}

/// Builds a connected sender/receiver pair with the given channel capacity.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

// Processes incoming events until the channel closes.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::GrnSubmitted {
                number,
                grand_total,
            } => {
                info!(%number, %grand_total, "GRN accepted");
            }
            Event::GrnSubmissionFailed { reason } => {
                error!(%reason, "GRN submission failed");
            }
            Event::GrnDeleted { number } => {
                info!(%number, "GRN deleted");
            }
            Event::GrnDraftReset => {
                info!("GRN draft reset to defaults");
            }
        }
    }
}
