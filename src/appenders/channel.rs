//! Channel appender: hands trimmed lines to an in-process consumer

use super::{Appender, Line};
use crate::core::Result;
use crossbeam_channel::Sender;

/// Forwards each line to a bounded channel without ever blocking.
///
/// Delivery is best effort: when the consumer falls behind and the channel is
/// full (or the receiver is gone) the line is dropped and no error is raised.
pub struct ChannelWriter {
    sender: Sender<String>,
}

impl ChannelWriter {
    pub fn new(sender: Sender<String>) -> Self {
        Self { sender }
    }
}

impl Appender for ChannelWriter {
    fn append(&mut self, line: &Line<'_>) -> Result<usize> {
        let text = String::from_utf8_lossy(line.bytes);
        let message = text.trim();
        if message.is_empty() {
            return Ok(0);
        }

        // full or disconnected: drop
        let _ = self.sender.try_send(message.to_string());
        Ok(line.bytes.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "channel"
    }
}
