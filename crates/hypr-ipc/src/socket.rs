//! Hyprland socket discovery
//!
//! Hyprland creates one directory per running instance, named after its
//! instance signature, holding both IPC sockets:
//!
//! ```text
//! $XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock   (requests)
//! $XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock  (events)
//! ```
//!
//! Releases before 0.40 used `/tmp/hypr/` instead, which is still tried as a
//! fallback.

use std::env;
use std::path::{Path, PathBuf};

use hypr_ipc_config::SocketConfig;
use tracing::debug;

use crate::IpcError;

/// Environment variable holding the Hyprland instance signature
pub const INSTANCE_SIGNATURE_ENV: &str = "HYPRLAND_INSTANCE_SIGNATURE";

const RUNTIME_DIR_ENV: &str = "XDG_RUNTIME_DIR";

const LEGACY_SOCKET_DIR: &str = "/tmp/hypr";

/// Which of the two Hyprland sockets to locate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketKind {
    /// Request/response socket
    Request,
    /// Event stream socket
    Event,
}

impl SocketKind {
    /// File name of the socket inside the instance directory
    pub fn file_name(self) -> &'static str {
        match self {
            SocketKind::Request => ".socket.sock",
            SocketKind::Event => ".socket2.sock",
        }
    }
}

/// Discover a Hyprland socket path from the session environment
///
/// # Errors
///
/// Returns `IpcError::InstanceNotSet` if `$HYPRLAND_INSTANCE_SIGNATURE` is not set.
/// Returns `IpcError::SocketNotFound` if the socket exists in neither location.
pub fn get_socket_path(kind: SocketKind) -> Result<PathBuf, IpcError> {
    resolve_socket_path(kind, &SocketConfig::default())
}

/// Resolve a socket path, honouring configured overrides first
///
/// An explicit `request`/`event` path wins outright. Otherwise the instance
/// signature and runtime directory come from the config when set, and from
/// the environment when not.
pub fn resolve_socket_path(kind: SocketKind, config: &SocketConfig) -> Result<PathBuf, IpcError> {
    let explicit = match kind {
        SocketKind::Request => config.request.as_ref(),
        SocketKind::Event => config.event.as_ref(),
    };

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(IpcError::SocketNotFound { path: path.clone() });
        }
        return Ok(path.clone());
    }

    let signature = match &config.instance {
        Some(signature) => signature.clone(),
        None => env::var(INSTANCE_SIGNATURE_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(IpcError::InstanceNotSet)?,
    };

    let runtime_dir = config
        .runtime_dir
        .clone()
        .or_else(|| env::var_os(RUNTIME_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(format!("/run/user/{}", nix::unistd::getuid())));

    let primary = runtime_dir
        .join("hypr")
        .join(&signature)
        .join(kind.file_name());
    if primary.exists() {
        return Ok(primary);
    }

    let legacy = Path::new(LEGACY_SOCKET_DIR)
        .join(&signature)
        .join(kind.file_name());
    if legacy.exists() {
        debug!("Using legacy Hyprland socket location {}", legacy.display());
        return Ok(legacy);
    }

    Err(IpcError::SocketNotFound { path: primary })
}
