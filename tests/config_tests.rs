use std::collections::HashMap;
use std::time::Duration;

use mcp_tool_server::config::{
    ConfigError, ServerConfig, DEFAULT_MAX_MESSAGE_BYTES, DEFAULT_PROTOCOL_VERSION,
};

fn overlay(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ServerConfig::new("svc", "2.0.0").with_overrides(|key| vars.get(key).cloned())
}

#[test]
fn defaults_are_permissive() {
    let config = overlay(&[]).unwrap();

    assert_eq!(config.name, "svc");
    assert_eq!(config.version, "2.0.0");
    assert_eq!(config.protocol_version, DEFAULT_PROTOCOL_VERSION);
    assert_eq!(config.max_message_bytes, DEFAULT_MAX_MESSAGE_BYTES);
    assert_eq!(config.tool_timeout, None);
    assert!(!config.require_initialize);
    assert!(!config.validate_arguments);
    assert_eq!(config.log.filter, "info");
}

#[test]
fn overrides_are_applied() {
    let config = overlay(&[
        ("MCP_MAX_MESSAGE_BYTES", "4096"),
        ("MCP_TOOL_TIMEOUT_SECS", "15"),
        ("MCP_REQUIRE_INITIALIZE", "true"),
        ("MCP_VALIDATE_ARGUMENTS", "1"),
        ("MCP_LOG", "debug"),
    ])
    .unwrap();

    assert_eq!(config.max_message_bytes, 4096);
    assert_eq!(config.tool_timeout, Some(Duration::from_secs(15)));
    assert!(config.require_initialize);
    assert!(config.validate_arguments);
    assert_eq!(config.log.filter, "debug");
}

#[test]
fn malformed_numbers_are_rejected() {
    let err = overlay(&[("MCP_TOOL_TIMEOUT_SECS", "soon")]).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::NotPositiveInteger { var: "MCP_TOOL_TIMEOUT_SECS", .. }
    ));

    let err = overlay(&[("MCP_MAX_MESSAGE_BYTES", "0")]).unwrap_err();
    assert!(err.to_string().contains("MCP_MAX_MESSAGE_BYTES"));
}

#[test]
fn message_limit_must_fit_in_usize() {
    let huge = u64::MAX.to_string();
    let result = overlay(&[("MCP_MAX_MESSAGE_BYTES", huge.as_str())]);
    match usize::try_from(u64::MAX) {
        Ok(limit) => assert_eq!(result.unwrap().max_message_bytes, limit),
        Err(_) => assert!(matches!(
            result,
            Err(ConfigError::NotPositiveInteger { var: "MCP_MAX_MESSAGE_BYTES", .. })
        )),
    }
}

#[test]
fn malformed_booleans_are_rejected() {
    let err = overlay(&[("MCP_REQUIRE_INITIALIZE", "maybe")]).unwrap_err();
    assert!(matches!(err, ConfigError::NotBoolean { .. }));
}
