pub mod request;
pub mod response;

pub use request::{
    ClientInfo, EnvelopeError, InitializeParams, JsonRpcRequest, RpcId, ToolCallParams,
    JSONRPC_VERSION,
};
pub use response::{
    encode, error_codes, InitializeResult, JsonRpcError, JsonRpcNotification, JsonRpcResponse,
    ServerCapabilities, ServerInfo, ToolDescriptor, ToolListResult, ToolResult,
    ToolResultContent,
};
