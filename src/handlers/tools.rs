use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::protocol::{
    JsonRpcError, JsonRpcResponse, RpcId, ToolCallParams, ToolListResult, ToolResult,
};
use crate::schema;
use crate::tools::{stringify, Arguments, Tool, ToolError, ToolRegistry};

/// Why a tool invocation produced no value.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("timed out after {} seconds", .0.as_secs_f64())]
    TimedOut(Duration),
    #[error("tool panicked: {0}")]
    Panicked(String),
    #[error("tool task was cancelled")]
    Cancelled,
}

/// Handle `tools/list`: every registered tool, in registry order.
pub fn list(id: RpcId, tools: &ToolRegistry) -> JsonRpcResponse {
    let result = ToolListResult {
        tools: tools.descriptors(),
    };
    to_success(id, &result)
}

/// Handle `tools/call`.
pub async fn call(
    id: RpcId,
    params: Option<&Value>,
    config: &ServerConfig,
    tools: &ToolRegistry,
) -> JsonRpcResponse {
    let params = ToolCallParams::from_params(params);
    let name = params.name.as_deref().unwrap_or("");

    let Some(tool) = tools.get(name) else {
        warn!(tool = %name, "call to unknown tool");
        return JsonRpcResponse::error(id, JsonRpcError::tool_not_found(name));
    };
    let arguments = match params.arguments {
        None => Arguments::new(),
        Some(Value::Object(arguments)) => arguments,
        Some(other) => {
            warn!(tool = %name, "tool arguments are not an object");
            return JsonRpcResponse::error(
                id,
                JsonRpcError::internal_error(format!(
                    "Tool execution error: arguments must be an object, got {other}"
                )),
            );
        }
    };

    if config.validate_arguments {
        if let Err(e) = schema::validate_arguments(tool.input_schema(), &arguments) {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("Invalid arguments for {name}: {e}")),
            );
        }
    }

    match invoke(tool, arguments, config.tool_timeout).await {
        Ok(value) => {
            debug!(tool = %name, "tool call succeeded");
            to_success(id, &ToolResult::text(stringify(&value)))
        }
        Err(e) => {
            warn!(tool = %name, error = %e, "tool call failed");
            JsonRpcResponse::error(
                id,
                JsonRpcError::internal_error(format!("Tool execution error: {e}")),
            )
        }
    }
}

/// Run a tool on the blocking pool so a panic or a stall cannot unwind into
/// or wedge the message loop beyond the configured timeout.
pub async fn invoke(
    tool: Arc<Tool>,
    arguments: Arguments,
    timeout: Option<Duration>,
) -> Result<Value, InvocationError> {
    let task = tokio::task::spawn_blocking(move || tool.execute(&arguments));

    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| InvocationError::TimedOut(limit))?,
        None => task.await,
    };

    match joined {
        Ok(outcome) => Ok(outcome?),
        Err(join_err) if join_err.is_panic() => Err(InvocationError::Panicked(panic_message(
            join_err.into_panic(),
        ))),
        Err(_) => Err(InvocationError::Cancelled),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn to_success<T: serde::Serialize>(id: RpcId, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            JsonRpcError::internal_error(format!("Internal error: {e}")),
        ),
    }
}
