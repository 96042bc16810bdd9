use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::response::{JsonRpcError, JsonRpcResponse};

/// The only protocol version accepted in the `jsonrpc` member.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 ID — a number, a string, or `null`.
///
/// Numbers keep their original representation so the response echoes
/// exactly what the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(serde_json::Number),
    Str(String),
    Null,
}

impl RpcId {
    /// Convert a raw `id` member. Returns `None` for objects, arrays and booleans.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Null => Some(Self::Null),
            _ => None,
        }
    }
}

impl From<i64> for RpcId {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for RpcId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

/// Envelope-level failure. Each variant maps onto a JSON-RPC error response.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid Request: Expected jsonrpc 2.0")]
    UnsupportedVersion { id: RpcId },
    #[error("Invalid Request: {reason}")]
    Malformed { id: RpcId, reason: &'static str },
}

impl EnvelopeError {
    /// The id to echo back; `null` when the message had no usable id.
    pub fn id(&self) -> RpcId {
        match self {
            Self::Parse(_) => RpcId::Null,
            Self::UnsupportedVersion { id } | Self::Malformed { id, .. } => id.clone(),
        }
    }

    pub fn into_response(self) -> JsonRpcResponse {
        let id = self.id();
        let message = self.to_string();
        let error = match self {
            Self::Parse(_) => JsonRpcError::parse_error(message),
            Self::UnsupportedVersion { .. } | Self::Malformed { .. } => {
                JsonRpcError::invalid_request(message)
            }
        };
        JsonRpcResponse::error(id, error)
    }
}

/// A validated JSON-RPC 2.0 request or notification.
///
/// `id` is `None` only when the member was absent, which makes the message a
/// notification. An explicit `"id": null` is a request with a null id.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub id: Option<RpcId>,
    pub method: String,
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: Option<RpcId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Parse and validate one line of input.
    ///
    /// Checks run in wire order: JSON syntax, then the `jsonrpc` member, then
    /// the remaining envelope structure.
    pub fn parse(line: &str) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_str(line)?;
        let Value::Object(mut object) = value else {
            return Err(EnvelopeError::Malformed {
                id: RpcId::Null,
                reason: "expected a JSON object",
            });
        };

        let raw_id = object.remove("id").map(|raw| RpcId::from_value(&raw));
        let echo_id = raw_id.clone().flatten().unwrap_or(RpcId::Null);

        match object.get("jsonrpc") {
            Some(Value::String(v)) if v == JSONRPC_VERSION => {}
            _ => return Err(EnvelopeError::UnsupportedVersion { id: echo_id }),
        }

        let id = match raw_id {
            None => None,
            Some(Some(id)) => Some(id),
            Some(None) => {
                return Err(EnvelopeError::Malformed {
                    id: RpcId::Null,
                    reason: "id must be a string, number, or null",
                })
            }
        };

        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            _ => {
                return Err(EnvelopeError::Malformed {
                    id: echo_id,
                    reason: "method must be a string",
                })
            }
        };

        let params = match object.remove("params") {
            None | Some(Value::Null) => None,
            Some(p @ (Value::Object(_) | Value::Array(_))) => Some(p),
            Some(_) => {
                return Err(EnvelopeError::Malformed {
                    id: echo_id,
                    reason: "params must be an object or array",
                })
            }
        };

        Ok(Self { id, method, params })
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// MCP `initialize` params. Parsed leniently; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Option<String>,
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information sent during `initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Parameters for `tools/call`, read leniently.
///
/// A missing or non-string `name` is kept as `None` and resolves to an unknown
/// tool. A `null` or absent `arguments` is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCallParams {
    pub name: Option<String>,
    pub arguments: Option<Value>,
}

impl ToolCallParams {
    pub fn from_params(params: Option<&Value>) -> Self {
        let Some(Value::Object(object)) = params else {
            return Self::default();
        };
        Self {
            name: object.get("name").and_then(Value::as_str).map(str::to_string),
            arguments: object.get("arguments").filter(|v| !v.is_null()).cloned(),
        }
    }
}
