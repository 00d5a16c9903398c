//! Client for Hyprland's IPC sockets
//!
//! Hyprland exposes two Unix sockets per running instance:
//! - a request socket for commands (`dispatch`, `keyword`, ...) and queries
//!   (`j/monitors`, `j/clients`, ...)
//! - an event socket streaming `<type>>><payload>` records on state changes
//!
//! ## Architecture
//!
//! - `RequestClient`: batches commands into frames, sends them and checks
//!   the replies for success markers
//! - `EventClient`: frames the event stream and dispatches decoded events to
//!   an `EventHandler`, until its shutdown signal fires
//! - `get_socket_path` / `resolve_socket_path`: locate the sockets from the
//!   session environment or a `hypr_ipc_config::Config`
//! - `IpcError`: error type shared by both clients
//!
//! Neither client is meant for concurrent use from several tasks; give each
//! task its own instance.

mod client;
mod error;
mod event_types;
mod events;
mod handler;
mod socket;
pub mod types;

pub use client::{
    prepare_requests, RawRequest, RawResponse, RequestClient, MAX_COMMANDS_PER_BATCH,
    MAX_REQUEST_SIZE,
};
pub use error::IpcError;
pub use event_types::{
    ActiveLayout, ActiveWindow, CloseWindow, Event, EventType, FocusedMonitor, LayerNamespace,
    MonitorName, MoveWindow, MoveWorkspace, OpenWindow, ReceivedEvent, Screencast, SubMapName,
    WorkspaceName, EVENT_SEPARATOR,
};
pub use events::{parse_events, EventClient, EVENT_BUFFER_SIZE};
pub use handler::{dispatch_event, EventHandler, NoopEventHandler};
pub use socket::{get_socket_path, resolve_socket_path, SocketKind, INSTANCE_SIGNATURE_ENV};

pub use hypr_ipc_config as config;
