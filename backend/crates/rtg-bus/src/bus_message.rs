use crate::Channel;

use bytes::Bytes;

/// A message as received from the bus: channel plus the exact published bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub channel: Channel,
    pub payload: Bytes,
}

impl BusMessage {
    pub fn new(channel: Channel, payload: Bytes) -> Self {
        Self { channel, payload }
    }

    /// Payload as UTF-8 text, if it is.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}
