//! Transport layer: frames protocol messages as lines over a duplex stream.
//!
//! A transport knows nothing about JSON-RPC. It hands each non-blank inbound
//! line to a single registered handler and writes back whatever the handler
//! returns. Lines that are not valid UTF-8 reach the handler as a decode error
//! so it can answer them. Server-initiated messages travel through a [`Notifier`] and are
//! written after the reply to the message that triggered them.

mod stdio;

use std::future::Future;
use std::pin::Pin;
use std::str::Utf8Error;

use async_trait::async_trait;
use tokio::sync::mpsc;

pub use stdio::StdioTransport;

/// Future returned by a [`MessageHandler`]: the reply line, if any.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Option<String>> + Send>>;

/// One inbound line, trimmed, or the reason its bytes could not be decoded.
pub type InboundLine = Result<String, Utf8Error>;

/// Callback invoked once per inbound line.
pub type MessageHandler = Box<dyn FnMut(InboundLine) -> HandlerFuture + Send>;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Outbound channel closed")]
    Closed,
}

/// Handle for pushing unsolicited lines to a transport's output side.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<String>,
}

impl Notifier {
    /// Create a notifier and the receiving end the transport drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, line: String) -> Result<(), TransportError> {
        self.tx.send(line).map_err(|_| TransportError::Closed)
    }
}

/// A line-oriented duplex channel driving a message handler.
#[async_trait]
pub trait Transport: Send {
    /// Register the handler. Replaces any previously registered handler.
    fn on_message(&mut self, handler: MessageHandler);

    /// Handle for writing lines outside the request/response cycle.
    fn notifier(&self) -> Notifier;

    /// Run until the input side reaches end-of-stream.
    ///
    /// End-of-stream is a clean shutdown. Any I/O failure ends the loop and
    /// is returned; the transport is not resumable afterwards.
    async fn start(&mut self) -> Result<(), TransportError>;
}
