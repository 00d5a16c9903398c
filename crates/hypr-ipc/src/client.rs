//! Hyprland request socket client
//!
//! The request socket (`.socket.sock`) takes one textual frame per
//! connection, answers it, and closes the connection. A frame is either a
//! single command (`dispatch exec kitty`) or a batch of commands behind the
//! `[[BATCH]]` marker, each terminated by `;`.
//!
//! Hyprland drops batches with too many commands, so `prepare_requests`
//! splits long parameter lists into frames of at most
//! [`MAX_COMMANDS_PER_BATCH`] commands.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hypr_ipc_config::Config;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, trace, warn};

use crate::socket::{get_socket_path, resolve_socket_path, SocketKind};
use crate::types::{
    Bind, Client, CursorPos, Layers, Monitor, OptionValue, Version, Window, Workspace,
};
use crate::IpcError;

/// Most commands Hyprland accepts in one `[[BATCH]]` frame
pub const MAX_COMMANDS_PER_BATCH: usize = 30;

/// Largest frame Hyprland reads from the request socket
pub const MAX_REQUEST_SIZE: usize = 8192;

const BATCH_PREFIX: &str = "[[BATCH]]";

const SUCCESS_MARKER: &str = "ok";

/// Query prefix asking Hyprland for JSON output
const JSON_PREFIX: &str = "j/";

/// One frame written to the request socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest(Vec<u8>);

impl RawRequest {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for RawRequest {
    fn from(frame: String) -> Self {
        Self(frame.into_bytes())
    }
}

impl From<&str> for RawRequest {
    fn from(frame: &str) -> Self {
        Self(frame.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for RawRequest {
    fn from(frame: Vec<u8>) -> Self {
        Self(frame)
    }
}

impl fmt::Display for RawRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Bytes Hyprland answered with, verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse(Vec<u8>);

impl RawResponse {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    /// Append another response, as done for the frames of one batch
    pub fn extend(&mut self, other: RawResponse) {
        self.0.extend(other.0);
    }

    /// Deserialize a JSON reply
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, IpcError> {
        serde_json::from_slice(&self.0).map_err(IpcError::DeserializeFailed)
    }
}

impl From<Vec<u8>> for RawResponse {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for RawResponse {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl fmt::Display for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Build the frames needed to run `command` once per parameter
///
/// - no parameters: a single frame holding just `command`
/// - one parameter: a single `"<command> <param>"` frame
/// - more: `[[BATCH]]` frames of at most [`MAX_COMMANDS_PER_BATCH`]
///   `"<command> <param>;"` segments each
pub fn prepare_requests<S: AsRef<str>>(command: &str, params: &[S]) -> Vec<RawRequest> {
    frames(command, params)
        .into_iter()
        .map(|(request, _)| request)
        .collect()
}

/// Frames paired with the parameters each one carries
fn frames<'a, S: AsRef<str>>(command: &str, params: &'a [S]) -> Vec<(RawRequest, &'a [S])> {
    match params {
        [] => vec![(RawRequest::from(command), params)],
        [param] => vec![(
            RawRequest::from(format!("{} {}", command, param.as_ref())),
            params,
        )],
        _ => params
            .chunks(MAX_COMMANDS_PER_BATCH)
            .map(|group| {
                let mut frame = String::from(BATCH_PREFIX);
                for param in group {
                    frame.push_str(command);
                    frame.push(' ');
                    frame.push_str(param.as_ref());
                    frame.push(';');
                }
                (RawRequest::from(frame), group)
            })
            .collect(),
    }
}

/// Client for the Hyprland request socket
///
/// Holds only the socket address; every frame is sent on its own
/// connection because Hyprland hangs up after each reply.
///
/// # Example
///
/// ```ignore
/// let client = RequestClient::connect()?;
/// client.dispatch(&["exec kitty", "workspace 2"]).await?;
///
/// for workspace in client.workspaces().await? {
///     println!("{}: {} window(s)", workspace.name, workspace.windows);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequestClient {
    socket_path: PathBuf,
    validate: bool,
    timeout: Option<Duration>,
}

impl RequestClient {
    /// Create a client for the request socket at `socket_path`
    ///
    /// Nothing is dialed until the first request.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            validate: true,
            timeout: None,
        }
    }

    /// Discover the request socket from the environment
    ///
    /// # Errors
    ///
    /// Returns `IpcError::InstanceNotSet` if `$HYPRLAND_INSTANCE_SIGNATURE` is not set.
    /// Returns `IpcError::SocketNotFound` if the socket doesn't exist.
    pub fn connect() -> Result<Self, IpcError> {
        Ok(Self::new(get_socket_path(SocketKind::Request)?))
    }

    /// Build a client from a loaded config
    pub fn from_config(config: &Config) -> Result<Self, IpcError> {
        let socket_path = resolve_socket_path(SocketKind::Request, &config.sockets)?;
        let mut client = Self::new(socket_path);
        client.validate = config.client.validate;
        client.timeout = config.client.timeout;
        Ok(client)
    }

    /// Bound every request exchange by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Whether responses are checked for success markers
    pub fn validate(&self) -> bool {
        self.validate
    }

    /// Turn response validation on or off
    ///
    /// Validation scans every response, which callers sending large batches
    /// may want to skip. With it off, rejected commands go unreported.
    pub fn set_validate(&mut self, validate: bool) {
        self.validate = validate;
    }

    /// Send one frame and read the complete reply
    ///
    /// # Errors
    ///
    /// Returns `IpcError::EmptyRequest` or `IpcError::RequestTooLarge` before any I/O.
    /// Returns `IpcError::ConnectionFailed`, `SendFailed` or `ReceiveFailed` on transport errors.
    /// Returns `IpcError::Timeout` if a configured timeout expires.
    pub async fn request(&self, request: &RawRequest) -> Result<RawResponse, IpcError> {
        if request.is_empty() {
            return Err(IpcError::EmptyRequest);
        }
        if request.len() > MAX_REQUEST_SIZE {
            return Err(IpcError::RequestTooLarge {
                size: request.len(),
                max: MAX_REQUEST_SIZE,
            });
        }

        trace!(request = %request, "Sending Hyprland request");

        let response = match self.timeout {
            Some(after) => tokio::time::timeout(after, self.exchange(request))
                .await
                .map_err(|_| IpcError::Timeout { after })??,
            None => self.exchange(request).await?,
        };

        trace!(bytes = response.len(), "Received Hyprland response");
        Ok(response)
    }

    async fn exchange(&self, request: &RawRequest) -> Result<RawResponse, IpcError> {
        let mut socket = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| IpcError::ConnectionFailed {
                path: self.socket_path.clone(),
                source: e,
            })?;

        socket
            .write_all(request.as_bytes())
            .await
            .map_err(IpcError::SendFailed)?;
        socket.flush().await.map_err(IpcError::SendFailed)?;

        let mut response = Vec::new();
        socket
            .read_to_end(&mut response)
            .await
            .map_err(IpcError::ReceiveFailed)?;

        Ok(RawResponse(response))
    }

    /// Check that `response` acknowledges every one of `params`
    ///
    /// Counts `"ok"` markers in the trimmed response and fails when there are
    /// fewer than parameters. Extra markers are accepted. Always succeeds
    /// when validation is disabled.
    pub fn validate_response<S: AsRef<str>>(
        &self,
        params: &[S],
        response: &RawResponse,
    ) -> Result<(), IpcError> {
        if !self.validate {
            return Ok(());
        }

        let text = String::from_utf8_lossy(response.as_bytes());
        let found = text.trim().matches(SUCCESS_MARKER).count();

        if found < params.len() {
            return Err(IpcError::CommandRejected {
                expected: params.len(),
                found,
                response: text.into_owned(),
            });
        }

        Ok(())
    }

    /// Run `command` once per parameter, batching as needed
    ///
    /// Frames are sent and validated in order and the first failure is
    /// returned. Frames sent before a failure have already taken effect.
    pub async fn request_with_batching<S: AsRef<str>>(
        &self,
        command: &str,
        params: &[S],
    ) -> Result<RawResponse, IpcError> {
        let batches = frames(command, params);
        let total = batches.len();
        if total > 1 {
            debug!(command, params = params.len(), frames = total, "Splitting Hyprland batch");
        }

        let mut combined = RawResponse::default();
        for (index, (request, group)) in batches.iter().enumerate() {
            let response = self.request(request).await?;
            if let Err(e) = self.validate_response(group, &response) {
                warn!(
                    command,
                    frame = index + 1,
                    frames = total,
                    "Hyprland rejected batched command"
                );
                return Err(e);
            }
            combined.extend(response);
        }

        Ok(combined)
    }

    /// Run a `j/` query and deserialize the JSON reply
    async fn query<T: DeserializeOwned>(&self, query: &str) -> Result<T, IpcError> {
        let request = RawRequest::from(format!("{}{}", JSON_PREFIX, query));
        self.request(&request).await?.decode()
    }

    /// Run a parameterless command
    ///
    /// No parameters means no `ok` markers are required, so the reply is
    /// returned as is even with validation on.
    async fn command(&self, command: &str) -> Result<RawResponse, IpcError> {
        self.request_with_batching::<&str>(command, &[]).await
    }

    /// The focused window
    pub async fn active_window(&self) -> Result<Window, IpcError> {
        self.query("activewindow").await
    }

    /// The focused workspace
    pub async fn active_workspace(&self) -> Result<Workspace, IpcError> {
        self.query("activeworkspace").await
    }

    pub async fn binds(&self) -> Result<Vec<Bind>, IpcError> {
        self.query("binds").await
    }

    pub async fn clients(&self) -> Result<Vec<Client>, IpcError> {
        self.query("clients").await
    }

    pub async fn cursor_pos(&self) -> Result<CursorPos, IpcError> {
        self.query("cursorpos").await
    }

    /// Run dispatchers, e.g. `"exec kitty"` or `"workspace 2"`
    pub async fn dispatch<S: AsRef<str>>(&self, params: &[S]) -> Result<RawResponse, IpcError> {
        self.request_with_batching("dispatch", params).await
    }

    /// Read a config option such as `general:border_size`
    pub async fn get_option(&self, name: &str) -> Result<OptionValue, IpcError> {
        self.query(&format!("getoption {}", name)).await
    }

    /// Set config keywords, e.g. `"general:border_size 2"`
    pub async fn keyword<S: AsRef<str>>(&self, params: &[S]) -> Result<RawResponse, IpcError> {
        self.request_with_batching("keyword", params).await
    }

    /// Enter kill mode; the next clicked window is killed
    pub async fn kill(&self) -> Result<RawResponse, IpcError> {
        self.command("kill").await
    }

    pub async fn layers(&self) -> Result<Layers, IpcError> {
        self.query("layers").await
    }

    pub async fn monitors(&self) -> Result<Vec<Monitor>, IpcError> {
        self.query("monitors").await
    }

    /// Reload the compositor config
    pub async fn reload(&self) -> Result<RawResponse, IpcError> {
        self.command("reload").await
    }

    /// Change the cursor theme and size
    pub async fn set_cursor(&self, theme: &str, size: u32) -> Result<RawResponse, IpcError> {
        let param = format!("{} {}", theme, size);
        self.request_with_batching("setcursor", &[param]).await
    }

    /// The current splash text
    pub async fn splash(&self) -> Result<String, IpcError> {
        let response = self.request(&RawRequest::from("splash")).await?;
        Ok(response.to_string_lossy())
    }

    pub async fn version(&self) -> Result<Version, IpcError> {
        self.query("version").await
    }

    pub async fn workspaces(&self) -> Result<Vec<Workspace>, IpcError> {
        self.query("workspaces").await
    }
}
