use serde_json::Value;
use tracing::info;

use crate::config::ServerConfig;
use crate::protocol::{
    encode, InitializeParams, InitializeResult, JsonRpcError, JsonRpcNotification,
    JsonRpcResponse, RpcId, ServerCapabilities, ServerInfo,
};

/// Handle `initialize`.
///
/// The client's requested protocol version is echoed verbatim; without one
/// the configured default is reported. Params that do not match the expected
/// shape are treated as absent.
pub fn handle(id: RpcId, params: Option<&Value>, config: &ServerConfig) -> JsonRpcResponse {
    let params: InitializeParams = params
        .and_then(|p| serde_json::from_value(p.clone()).ok())
        .unwrap_or_default();

    if let Some(client) = &params.client_info {
        info!(
            client_name = client.name.as_deref().unwrap_or("unknown"),
            client_version = client.version.as_deref().unwrap_or("unknown"),
            "client connected"
        );
    }

    let protocol_version = params
        .protocol_version
        .unwrap_or_else(|| config.protocol_version.clone());
    info!(protocol_version = %protocol_version, "initializing session");

    let result = InitializeResult {
        server_info: ServerInfo {
            name: config.name.clone(),
            version: config.version.clone(),
        },
        capabilities: ServerCapabilities::tools_only(),
        protocol_version,
    };

    match serde_json::to_value(&result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            JsonRpcError::internal_error(format!("Internal error: {e}")),
        ),
    }
}

/// Wire text of the `initialized` push notification.
pub fn initialized_notification() -> String {
    encode(&JsonRpcNotification::initialized())
}
