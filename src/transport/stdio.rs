use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, Stdin, Stdout,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use super::{MessageHandler, Notifier, Transport, TransportError};

/// Newline-delimited transport over an async reader/writer pair.
///
/// Every write is flushed immediately: clients read line by line and must see
/// complete JSON objects without delay.
pub struct StdioTransport<R, W> {
    reader: R,
    writer: BufWriter<W>,
    handler: Option<MessageHandler>,
    notifier: Notifier,
    outbound: mpsc::UnboundedReceiver<String>,
}

impl StdioTransport<BufReader<Stdin>, Stdout> {
    /// Create a transport over the process's stdin/stdout.
    pub fn new() -> Self {
        Self::from_handles(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl Default for StdioTransport<BufReader<Stdin>, Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Create a transport from custom reader/writer handles, e.g. in-memory
    /// buffers in tests.
    pub fn from_handles(reader: R, writer: W) -> Self {
        let (notifier, outbound) = Notifier::channel();
        Self {
            reader,
            writer: BufWriter::new(writer),
            handler: None,
            notifier,
            outbound,
        }
    }

    /// Consume the transport and return the underlying writer.
    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }

    async fn pump(&mut self) -> Result<(), TransportError> {
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let n = self.reader.read_until(b'\n', &mut raw).await?;
            if n == 0 {
                info!("input closed, stopping transport");
                return Ok(());
            }

            let line = match std::str::from_utf8(&raw) {
                Ok(text) => {
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    debug!(message = %text, "received line");
                    Ok(text.to_string())
                }
                Err(e) => {
                    warn!(error = %e, bytes = raw.len(), "received line that is not valid UTF-8");
                    Err(e)
                }
            };

            let reply = match self.handler.as_mut() {
                Some(handler) => handler(line).await,
                None => {
                    warn!("no message handler registered, dropping line");
                    None
                }
            };

            match reply {
                Some(reply) if !reply.is_empty() => self.write_line(&reply).await?,
                _ => trace!("no response for this message"),
            }

            self.drain_notifications().await?;
        }
    }

    async fn drain_notifications(&mut self) -> Result<(), TransportError> {
        while let Ok(line) = self.outbound.try_recv() {
            self.write_line(&line).await?;
        }
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        debug!(message = %line, "sending line");
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<R, W> Transport for StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    fn on_message(&mut self, handler: MessageHandler) {
        self.handler = Some(handler);
    }

    fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }

    async fn start(&mut self) -> Result<(), TransportError> {
        info!("starting stdio transport");
        let result = self.pump().await;
        if let Err(e) = &result {
            error!(error = %e, "stdio transport failed");
        }
        result
    }
}
