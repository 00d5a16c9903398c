//! Configuration data model

use std::path::PathBuf;
use std::time::Duration;

/// Default size of the event socket read buffer, in bytes
pub const DEFAULT_EVENT_BUFFER: usize = 8192;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub log_level: LogLevel,
    pub client: ClientConfig,
    pub sockets: SocketConfig,
}

/// Behaviour of the request and event clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Check request responses for the expected number of `ok` markers
    pub validate: bool,
    /// Upper bound for a single request exchange (connect, write, read)
    pub timeout: Option<Duration>,
    /// Bytes read from the event socket per receive call
    pub event_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            validate: true,
            timeout: None,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// Socket location overrides
///
/// Every field is optional. Unset fields fall back to the session
/// environment (`HYPRLAND_INSTANCE_SIGNATURE`, `XDG_RUNTIME_DIR`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocketConfig {
    /// Hyprland instance signature
    pub instance: Option<String>,
    /// Runtime directory containing the `hypr/` socket tree
    pub runtime_dir: Option<PathBuf>,
    /// Explicit path of the request socket (`.socket.sock`)
    pub request: Option<PathBuf>,
    /// Explicit path of the event socket (`.socket2.sock`)
    pub event: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing_is_case_insensitive() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_level_maps_to_tracing_level() {
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
    }

    #[test]
    fn test_client_defaults() {
        let client = ClientConfig::default();
        assert!(client.validate);
        assert_eq!(client.timeout, None);
        assert_eq!(client.event_buffer, DEFAULT_EVENT_BUFFER);
    }
}
