//! Stream transports
//!
//! A [`Frame`] is one SSE event. [`ChannelTransport`] feeds frames into an
//! unbounded channel whose receiving half ([`FrameReceiver`]) is turned into
//! the HTTP response body. Dropping the receiver (client went away) or
//! calling [`SessionTransport::shutdown`] resolves [`SessionTransport::closed`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// SSE event name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Heartbeat
    Ping,
    /// Legacy endpoint announcement
    Endpoint,
    /// JSON-RPC message push
    Message,
    /// Out-of-band error report
    Error,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Endpoint => "endpoint",
            Self::Message => "message",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event on a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Event id
    pub seq: u64,
    /// Event name
    pub kind: EventKind,
    /// Event data
    pub data: String,
}

/// Outbound half of a streaming connection
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Queue a frame; false once the stream is gone
    fn write(&self, frame: Frame) -> bool;

    /// Resolves when the client disconnects or the stream is shut down
    async fn closed(&self);

    /// End the stream
    fn shutdown(&self);

    fn is_closed(&self) -> bool;
}

/// Channel-backed transport used by the HTTP layer
#[derive(Debug)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Frame>,
    token: CancellationToken,
}

/// Receiving half handed to the response body
#[derive(Debug)]
pub struct FrameReceiver {
    rx: mpsc::UnboundedReceiver<Frame>,
    token: CancellationToken,
}

impl ChannelTransport {
    /// Create a connected transport / receiver pair
    pub fn pair() -> (Arc<Self>, FrameReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let transport = Arc::new(Self {
            tx,
            token: token.clone(),
        });
        (transport, FrameReceiver { rx, token })
    }
}

#[async_trait]
impl SessionTransport for ChannelTransport {
    fn write(&self, frame: Frame) -> bool {
        !self.token.is_cancelled() && self.tx.send(frame).is_ok()
    }

    async fn closed(&self) {
        tokio::select! {
            () = self.tx.closed() => {}
            () = self.token.cancelled() => {}
        }
    }

    fn shutdown(&self) {
        self.token.cancel();
    }

    fn is_closed(&self) -> bool {
        self.token.is_cancelled() || self.tx.is_closed()
    }
}

impl FrameReceiver {
    /// Next frame, or `None` once the stream has ended
    ///
    /// Frames queued before a shutdown are still delivered.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        tokio::select! {
            biased;
            frame = self.rx.recv() => frame,
            () = self.token.cancelled() => None,
        }
    }
}
