use std::time::Duration;

/// Protocol version reported when the client does not request one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Maximum bytes per inbound JSON-RPC message (1 MiB).
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    NotPositiveInteger { var: &'static str, value: String },
    #[error("{var} must be one of true/false/1/0, got {value:?}")]
    NotBoolean { var: &'static str, value: String },
}

/// Logging settings consumed by [`crate::logging::init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` takes precedence.
    pub filter: String,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            ansi: false,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
    pub max_message_bytes: usize,
    /// Upper bound on a single tool invocation. `None` waits indefinitely.
    pub tool_timeout: Option<Duration>,
    /// Reject requests other than `initialize` and `ping` until the
    /// handshake has completed.
    pub require_initialize: bool,
    /// Validate `tools/call` arguments against the tool's input schema.
    pub validate_arguments: bool,
    pub log: LogConfig,
}

impl ServerConfig {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            tool_timeout: None,
            require_initialize: false,
            validate_arguments: false,
            log: LogConfig::default(),
        }
    }

    /// Overlay settings from the process environment.
    ///
    /// - `MCP_MAX_MESSAGE_BYTES` — inbound line limit in bytes
    /// - `MCP_TOOL_TIMEOUT_SECS` — max seconds per tool call
    /// - `MCP_REQUIRE_INITIALIZE` — enforce the initialize handshake
    /// - `MCP_VALIDATE_ARGUMENTS` — validate tool arguments against their schema
    /// - `MCP_LOG` — log filter directive
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Same as [`with_env`](Self::with_env) over an arbitrary lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("MCP_MAX_MESSAGE_BYTES") {
            let bytes = parse_positive("MCP_MAX_MESSAGE_BYTES", value.clone())?;
            self.max_message_bytes = usize::try_from(bytes).map_err(|_| {
                ConfigError::NotPositiveInteger {
                    var: "MCP_MAX_MESSAGE_BYTES",
                    value,
                }
            })?;
        }
        if let Some(value) = lookup("MCP_TOOL_TIMEOUT_SECS") {
            let secs = parse_positive("MCP_TOOL_TIMEOUT_SECS", value)?;
            self.tool_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(value) = lookup("MCP_REQUIRE_INITIALIZE") {
            self.require_initialize = parse_bool("MCP_REQUIRE_INITIALIZE", value)?;
        }
        if let Some(value) = lookup("MCP_VALIDATE_ARGUMENTS") {
            self.validate_arguments = parse_bool("MCP_VALIDATE_ARGUMENTS", value)?;
        }
        if let Some(value) = lookup("MCP_LOG") {
            self.log.filter = value;
        }
        Ok(self)
    }
}

fn parse_positive(var: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::NotPositiveInteger { var, value }),
    }
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::NotBoolean { var, value }),
    }
}
