use crate::BusMessage;

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Receives every message published on a subscribed channel,
/// including this process's own publishes.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: BusMessage);
}

/// Pushes received messages into an mpsc channel.
pub struct ForwardingHandler {
    sender: mpsc::Sender<BusMessage>,
}

impl ForwardingHandler {
    pub fn new(sender: mpsc::Sender<BusMessage>) -> Self {
        Self { sender }
    }

    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<BusMessage>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl MessageHandler for ForwardingHandler {
    async fn handle(&self, message: BusMessage) {
        if self.sender.send(message).await.is_err() {
            log::debug!("Forwarding handler receiver dropped");
        }
    }
}
