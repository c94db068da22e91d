//! Transport abstraction toward the remote compositor.
//!
//! The compositor lives in another process; commands travel over a one-way
//! asynchronous channel. The core only ever asks two things of it: whether
//! the channel is live, and to accept a command. Windows are told about
//! connection transitions by the host (see `ShellWindow::on_transport_connected`).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::core::commands::DisplayCommand;

/// Outbound command channel to the remote compositor.
///
/// Sends are fire-and-forget: a command handed to a disconnected transport
/// is dropped, never queued. Deferred replay on reconnect is the window's
/// job, not the transport's.
pub trait CommandSink: Send + Sync {
    /// Whether the channel to the compositor is currently live.
    fn is_connected(&self) -> bool;

    /// Hand a command to the channel.
    fn send(&self, command: DisplayCommand);
}

/// In-process transport that records every accepted command.
///
/// Used by tests and the demo binary in place of a real channel. Commands
/// sent while disconnected are counted and dropped, mirroring a dead
/// channel.
#[derive(Default)]
pub struct RecordingTransport {
    connected: AtomicBool,
    sent: Mutex<Vec<DisplayCommand>>,
    dropped: AtomicUsize,
}

impl RecordingTransport {
    pub fn new(connected: bool) -> Self {
        let transport = Self::default();
        transport.connected.store(connected, Ordering::SeqCst);
        transport
    }

    /// Flip the connection state. The caller is responsible for notifying
    /// windows of the transition.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Take all recorded commands, clearing the log.
    pub fn take_sent(&self) -> Vec<DisplayCommand> {
        std::mem::take(&mut self.sent.lock().unwrap())
    }

    /// Number of commands dropped while disconnected.
    pub fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl CommandSink for RecordingTransport {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn send(&self, command: DisplayCommand) {
        if !self.is_connected() {
            tracing::debug!("transport down, dropping {}", command.name());
            self.dropped.fetch_add(1, Ordering::SeqCst);
            return;
        }
        tracing::trace!("send {}", command.name());
        self.sent.lock().unwrap().push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_transport_records_when_connected() {
        let transport = RecordingTransport::new(true);
        transport.send(DisplayCommand::Create { handle: 1 });
        assert_eq!(transport.sent_count(), 1);
        assert_eq!(transport.dropped_count(), 0);
        assert_eq!(
            transport.take_sent(),
            vec![DisplayCommand::Create { handle: 1 }]
        );
        assert_eq!(transport.sent_count(), 0);
    }

    #[test]
    fn test_recording_transport_drops_when_disconnected() {
        let transport = RecordingTransport::new(false);
        transport.send(DisplayCommand::Create { handle: 1 });
        assert_eq!(transport.sent_count(), 0);
        assert_eq!(transport.dropped_count(), 1);
    }
}
