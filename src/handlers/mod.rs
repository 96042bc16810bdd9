pub mod initialize;
pub mod tools;

use crate::config::ServerConfig;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
use crate::tools::ToolRegistry;

/// Client-sent notification marking the end of the handshake. Both the bare
/// and the namespaced spelling are accepted.
pub fn is_initialized_notification(method: &str) -> bool {
    matches!(method, "initialized" | "notifications/initialized")
}

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for methods that never produce a response.
pub async fn dispatch(
    req: &JsonRpcRequest,
    config: &ServerConfig,
    tools: &ToolRegistry,
) -> Option<JsonRpcResponse> {
    let id = req.id.clone().unwrap_or(RpcId::Null);

    match req.method.as_str() {
        "initialize" => Some(initialize::handle(id, req.params.as_ref(), config)),

        method if is_initialized_notification(method) => None,

        "ping" => Some(JsonRpcResponse::success(id, serde_json::json!({}))),

        "tools/list" => Some(tools::list(id, tools)),

        "tools/call" => Some(tools::call(id, req.params.as_ref(), config, tools).await),

        _ => Some(JsonRpcResponse::error(
            id,
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}
