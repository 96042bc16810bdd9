use std::sync::atomic::{AtomicBool, Ordering};
use std::str::Utf8Error;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::handlers;
use crate::protocol::{encode, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
use crate::schema;
use crate::transport::{HandlerFuture, InboundLine, Notifier, Transport, TransportError};
use crate::tools::{Tool, ToolRegistry};

/// MCP server speaking newline-delimited JSON-RPC 2.0 over a [`Transport`].
///
/// Holds the tool registry and the single piece of session state: whether
/// `initialize` has completed.
pub struct McpServer {
    config: ServerConfig,
    tools: ToolRegistry,
    initialized: AtomicBool,
    notifier: Option<Notifier>,
}

impl McpServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            tools: ToolRegistry::new(),
            initialized: AtomicBool::new(false),
            notifier: None,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Register a tool. A tool with the same name is replaced.
    pub fn register_tool(&mut self, tool: Tool) {
        if let Err(e) = schema::check_schema(tool.input_schema()) {
            warn!(tool = %tool.name(), error = %e, "tool input schema does not compile");
        }
        let name = tool.name().to_string();
        if self.tools.register(tool).is_some() {
            warn!(tool = %name, "replaced previously registered tool");
        } else {
            info!(tool = %name, "registered tool");
        }
    }

    /// Route server-initiated messages through `notifier`. [`run`](Self::run)
    /// attaches the transport's notifier automatically.
    pub fn attach_notifier(&mut self, notifier: Notifier) {
        self.notifier = Some(notifier);
    }

    /// Wire this server into `transport` and block until the transport stops.
    pub async fn run<T: Transport>(mut self, transport: &mut T) -> Result<(), TransportError> {
        info!(
            name = %self.config.name,
            version = %self.config.version,
            tools = self.tools.len(),
            "starting MCP server"
        );

        self.attach_notifier(transport.notifier());
        let server = Arc::new(self);
        transport.on_message(Box::new(move |line: InboundLine| -> HandlerFuture {
            let server = Arc::clone(&server);
            Box::pin(async move {
                match line {
                    Ok(line) => server.handle_message(&line).await,
                    Err(e) => Some(server.reject_undecodable(&e)),
                }
            })
        }));

        transport.start().await
    }

    /// Process one inbound line and return the reply line, if any.
    ///
    /// Never fails: malformed input, unknown methods and tool failures all
    /// become JSON-RPC error responses. Notifications yield `None`.
    pub async fn handle_message(&self, raw: &str) -> Option<String> {
        debug!(message = %raw, "received message");

        if raw.len() > self.config.max_message_bytes {
            warn!(
                bytes = raw.len(),
                limit = self.config.max_message_bytes,
                "message too large"
            );
            let error = JsonRpcError::parse_error(format!(
                "Parse error: message of {} bytes exceeds limit of {} bytes",
                raw.len(),
                self.config.max_message_bytes
            ));
            return Some(encode(&JsonRpcResponse::error(RpcId::Null, error)));
        }

        let req = match JsonRpcRequest::parse(raw) {
            Ok(req) => req,
            Err(e) => {
                warn!(error = %e, "rejected message");
                return Some(encode(&e.into_response()));
            }
        };

        let Some(id) = req.id.clone() else {
            self.handle_notification(&req);
            return None;
        };

        if self.config.require_initialize
            && !self.is_initialized()
            && !matches!(req.method.as_str(), "initialize" | "ping")
        {
            return Some(encode(&JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request("Server not initialized"),
            )));
        }

        let response = handlers::dispatch(&req, &self.config, &self.tools).await?;

        if req.method == "initialize" && response.is_success() {
            self.initialized.store(true, Ordering::SeqCst);
            self.send_initialized_notification();
        }

        Some(encode(&response))
    }

    /// Reply to a line whose bytes are not valid UTF-8: `-32700` with a null id.
    pub fn reject_undecodable(&self, err: &Utf8Error) -> String {
        warn!(error = %err, "rejected message that is not valid UTF-8");
        let error = JsonRpcError::parse_error(format!("Parse error: invalid UTF-8: {err}"));
        encode(&JsonRpcResponse::error(RpcId::Null, error))
    }

    fn handle_notification(&self, req: &JsonRpcRequest) {
        if handlers::is_initialized_notification(&req.method) {
            info!("received initialized notification from client");
        } else {
            debug!(method = %req.method, "ignoring notification");
        }
    }

    fn send_initialized_notification(&self) {
        let Some(notifier) = &self.notifier else {
            debug!("no transport attached, initialized notification not sent");
            return;
        };
        info!("sending initialized notification");
        if let Err(e) = notifier.send(handlers::initialize::initialized_notification()) {
            warn!(error = %e, "failed to queue initialized notification");
        }
    }
}
