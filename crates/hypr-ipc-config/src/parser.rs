//! KDL configuration parser

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::model::*;

/// Parse a configuration file from the given path
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Parse configuration from a string
pub fn parse_config_str(content: &str) -> Result<Config, ConfigError> {
    let doc: kdl::KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
        // kdl carries its own miette version, so rebuild the span by hand
        let offset = e.span.offset();
        let len = e.span.len();
        let span = miette::SourceSpan::from((offset, len));
        ConfigError::ParseError {
            src: content.to_string(),
            span,
            source: e,
        }
    })?;

    let mut config = Config::default();

    for node in doc.nodes() {
        match node.name().value() {
            "log-level" => {
                let val = string_value(node, content)?;
                config.log_level = val
                    .parse()
                    .map_err(|message| ConfigError::Invalid { message })?;
            }
            "client" => {
                config.client = parse_client(node, content)?;
            }
            "sockets" => {
                config.sockets = parse_sockets(node, content)?;
            }
            name => {
                tracing::warn!("Unknown top-level node: {}", name);
            }
        }
    }

    Ok(config)
}

fn parse_client(node: &kdl::KdlNode, source: &str) -> Result<ClientConfig, ConfigError> {
    let mut client = ClientConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "validate" => {
                    client.validate = bool_value(child, source)?;
                }
                "timeout-ms" => {
                    client.timeout = Some(Duration::from_millis(u64_value(child, source)?));
                }
                "event-buffer" => {
                    let size = u64_value(child, source)?;
                    if size == 0 {
                        return Err(ConfigError::Invalid {
                            message: "event-buffer must be at least 1 byte".to_string(),
                        });
                    }
                    client.event_buffer = usize::try_from(size)
                        .map_err(|_| invalid_value(child, "a buffer size", source))?;
                }
                name => {
                    tracing::warn!("Unknown client config option: {}", name);
                }
            }
        }
    }

    Ok(client)
}

fn parse_sockets(node: &kdl::KdlNode, source: &str) -> Result<SocketConfig, ConfigError> {
    let mut sockets = SocketConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "instance" => {
                    sockets.instance = Some(string_value(child, source)?.to_string());
                }
                "runtime-dir" => {
                    sockets.runtime_dir = Some(path_value(child, source)?);
                }
                "request" => {
                    sockets.request = Some(path_value(child, source)?);
                }
                "event" => {
                    sockets.event = Some(path_value(child, source)?);
                }
                name => {
                    tracing::warn!("Unknown sockets config option: {}", name);
                }
            }
        }
    }

    Ok(sockets)
}

/// Build an `InvalidValue` error pointing at the node's first argument
fn invalid_value(node: &kdl::KdlNode, expected: &str, source: &str) -> ConfigError {
    let span = node
        .entries()
        .first()
        .map(|entry| entry.span())
        .unwrap_or_else(|| node.name().span());

    ConfigError::InvalidValue {
        key: node.name().value().to_string(),
        expected: expected.to_string(),
        src: source.to_string(),
        span: miette::SourceSpan::from((span.offset(), span.len())),
    }
}

fn string_value<'a>(node: &'a kdl::KdlNode, source: &str) -> Result<&'a str, ConfigError> {
    node.entries()
        .first()
        .and_then(|entry| entry.value().as_string())
        .ok_or_else(|| invalid_value(node, "a string", source))
}

fn bool_value(node: &kdl::KdlNode, source: &str) -> Result<bool, ConfigError> {
    node.entries()
        .first()
        .and_then(|entry| entry.value().as_bool())
        .ok_or_else(|| invalid_value(node, "a boolean", source))
}

fn u64_value(node: &kdl::KdlNode, source: &str) -> Result<u64, ConfigError> {
    node.entries()
        .first()
        .and_then(|entry| entry.value().as_i64())
        .and_then(|val| u64::try_from(val).ok())
        .ok_or_else(|| invalid_value(node, "a non-negative integer", source))
}

fn path_value(node: &kdl::KdlNode, source: &str) -> Result<PathBuf, ConfigError> {
    let val = string_value(node, source)?;
    Ok(shellexpand::tilde(val).into_owned().into())
}
