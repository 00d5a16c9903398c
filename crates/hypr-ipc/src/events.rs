//! Hyprland event socket client
//!
//! The event socket (`.socket2.sock`) is a one-way stream: Hyprland writes
//! newline terminated `<type>>><payload>` records and never reads anything
//! from the client.
//!
//! ## Framing
//!
//! Each `receive()` performs a single bounded read and frames whatever it
//! got. A read can end in the middle of a record; the truncated tail fails
//! framing (or decodes with fewer fields) and is dropped. Hyprland re-emits
//! the relevant state on later events, so nothing is carried over between
//! reads.
//!
//! ## Cancellation
//!
//! Every client holds a `watch::Receiver<bool>`. Once `true` is observed the
//! client stops: `subscribe()` checks it before each read, and a read that is
//! already waiting on the socket is abandoned as soon as the signal arrives.

use std::collections::{HashSet, VecDeque};
use std::convert::Infallible;
use std::path::{Path, PathBuf};

use futures::Stream;
use hypr_ipc_config::{Config, DEFAULT_EVENT_BUFFER};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::event_types::{EventType, ReceivedEvent, EVENT_SEPARATOR};
use crate::handler::{process_events, EventHandler};
use crate::socket::{get_socket_path, resolve_socket_path, SocketKind};
use crate::IpcError;

/// Default number of bytes read from the event socket per `receive()`
pub const EVENT_BUFFER_SIZE: usize = DEFAULT_EVENT_BUFFER;

/// Client for the Hyprland event socket
///
/// # Example
///
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
/// let mut events = EventClient::connect_from_env(shutdown_rx).await?;
///
/// let err = events
///     .subscribe(&mut MyHandler, &[EventType::Workspace, EventType::ActiveWindow])
///     .await
///     .unwrap_err();
/// ```
#[derive(Debug)]
pub struct EventClient {
    socket: UnixStream,
    socket_path: PathBuf,
    shutdown: watch::Receiver<bool>,
    buffer: Vec<u8>,
}

impl EventClient {
    /// Connect to the event socket at `socket_path`
    ///
    /// # Errors
    ///
    /// Returns `IpcError::ConnectionFailed` if the socket cannot be dialed.
    pub async fn connect(
        socket_path: impl Into<PathBuf>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, IpcError> {
        let socket_path = socket_path.into();

        let socket = UnixStream::connect(&socket_path)
            .await
            .map_err(|e| IpcError::ConnectionFailed {
                path: socket_path.clone(),
                source: e,
            })?;

        debug!("Connected to Hyprland event socket at {}", socket_path.display());

        Ok(Self {
            socket,
            socket_path,
            shutdown,
            buffer: vec![0; EVENT_BUFFER_SIZE],
        })
    }

    /// Discover the event socket from the environment and connect to it
    pub async fn connect_from_env(shutdown: watch::Receiver<bool>) -> Result<Self, IpcError> {
        let socket_path = get_socket_path(SocketKind::Event)?;
        Self::connect(socket_path, shutdown).await
    }

    /// Connect using socket overrides and buffer size from a loaded config
    pub async fn from_config(
        config: &Config,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, IpcError> {
        let socket_path = resolve_socket_path(SocketKind::Event, &config.sockets)?;
        let client = Self::connect(socket_path, shutdown).await?;
        Ok(client.with_buffer_size(config.client.event_buffer))
    }

    /// Change how many bytes a single `receive()` reads (minimum 1)
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer = vec![0; size.max(1)];
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Whether the shutdown signal has been raised
    pub fn is_cancelled(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Read one chunk from the socket and frame it into events
    ///
    /// # Errors
    ///
    /// Returns `IpcError::ReceiveFailed` if the read fails.
    /// Returns `IpcError::ConnectionClosed` if Hyprland closed the socket.
    /// Returns `IpcError::Cancelled` if the shutdown signal fires while waiting.
    pub async fn receive(&mut self) -> Result<Vec<ReceivedEvent>, IpcError> {
        let bytes_read = tokio::select! {
            biased;
            _ = wait_for_shutdown(&mut self.shutdown) => return Err(IpcError::Cancelled),
            read = self.socket.read(&mut self.buffer) => read.map_err(IpcError::ReceiveFailed)?,
        };

        if bytes_read == 0 {
            return Err(IpcError::ConnectionClosed);
        }

        let events = parse_events(&self.buffer[..bytes_read]);
        trace!(
            bytes = bytes_read,
            events = events.len(),
            "Received Hyprland event chunk"
        );

        Ok(events)
    }

    /// Dispatch events of the given types to `handler` until stopped
    ///
    /// Runs until the shutdown signal is raised (`IpcError::Cancelled`) or
    /// the socket fails. It never returns `Ok`.
    pub async fn subscribe<H>(
        &mut self,
        handler: &mut H,
        event_types: &[EventType],
    ) -> Result<Infallible, IpcError>
    where
        H: EventHandler + ?Sized,
    {
        let subscribed: HashSet<EventType> = event_types.iter().copied().collect();
        debug!(
            event_types = subscribed.len(),
            "Subscribing to Hyprland events"
        );

        loop {
            if self.is_cancelled() {
                debug!("Hyprland event subscription cancelled");
                return Err(IpcError::Cancelled);
            }

            match self.receive().await {
                Ok(events) => process_events(handler, events, &subscribed),
                Err(IpcError::Cancelled) => {
                    debug!("Hyprland event subscription cancelled");
                    return Err(IpcError::Cancelled);
                }
                Err(e) => {
                    warn!("Hyprland event stream error: {}", e);
                    return Err(e);
                }
            }
        }
    }

    /// Turn the client into a stream of framed events
    ///
    /// The stream yields events in arrival order, then the error that ended
    /// it (`Cancelled`, `ConnectionClosed`, ...), then finishes.
    pub fn into_stream(self) -> impl Stream<Item = Result<ReceivedEvent, IpcError>> {
        futures::stream::unfold(Some((self, VecDeque::<ReceivedEvent>::new())), |state| async move {
            let Some((mut client, mut pending)) = state else {
                return None;
            };

            loop {
                if let Some(event) = pending.pop_front() {
                    return Some((Ok(event), Some((client, pending))));
                }

                if client.is_cancelled() {
                    return Some((Err(IpcError::Cancelled), None));
                }

                match client.receive().await {
                    Ok(events) => pending.extend(events),
                    Err(e) => return Some((Err(e), None)),
                }
            }
        })
    }

    /// Shut the connection down
    pub async fn close(mut self) -> Result<(), IpcError> {
        self.socket
            .shutdown()
            .await
            .map_err(IpcError::CloseFailed)?;
        debug!("Closed Hyprland event socket at {}", self.socket_path.display());
        Ok(())
    }
}

/// Resolves once the shutdown flag is `true`
///
/// A dropped sender can never raise the flag, so in that case this stays
/// pending forever.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Frame a raw chunk from the event socket into events
///
/// Records are discarded, not reported, when they are empty, lack the `>>`
/// separator, have an empty type or payload, have a payload of just `,`,
/// or name an event type outside `EventType`.
pub fn parse_events(chunk: &[u8]) -> Vec<ReceivedEvent> {
    let text = String::from_utf8_lossy(chunk);
    text.split('\n').filter_map(parse_record).collect()
}

fn parse_record(record: &str) -> Option<ReceivedEvent> {
    if record.is_empty() {
        return None;
    }

    let (prefix, payload) = record.split_once(EVENT_SEPARATOR)?;
    // `type>>>>...` leaves nothing between the first two separators
    if prefix.is_empty()
        || payload.is_empty()
        || payload == ","
        || payload.starts_with(EVENT_SEPARATOR)
    {
        return None;
    }

    let Some(kind) = EventType::from_wire(prefix) else {
        trace!(event = prefix, "Ignoring unsupported Hyprland event");
        return None;
    };

    Some(ReceivedEvent::new(kind, payload))
}
