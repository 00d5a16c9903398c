//! Event types for the Hyprland event socket
//!
//! Each line on the event socket is `<type>>><payload>`. The payload is a
//! comma separated field list whose layout depends on the type:
//!
//! ```text
//! workspace>>2
//! activewindow>>kitty,~/src/hypr-ipc
//! openwindow>>80e62df0,2,kitty,kitty
//! ```

use std::fmt;

use crate::IpcError;

/// Separator between the event type and its payload
pub const EVENT_SEPARATOR: &str = ">>";

/// Event categories emitted on the event socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    Workspace,
    FocusedMonitor,
    ActiveWindow,
    Fullscreen,
    MonitorRemoved,
    MonitorAdded,
    CreateWorkspace,
    DestroyWorkspace,
    MoveWorkspace,
    ActiveLayout,
    OpenWindow,
    CloseWindow,
    MoveWindow,
    OpenLayer,
    CloseLayer,
    SubMap,
    Screencast,
}

impl EventType {
    /// Every event type, in declaration order
    pub const ALL: [EventType; 17] = [
        EventType::Workspace,
        EventType::FocusedMonitor,
        EventType::ActiveWindow,
        EventType::Fullscreen,
        EventType::MonitorRemoved,
        EventType::MonitorAdded,
        EventType::CreateWorkspace,
        EventType::DestroyWorkspace,
        EventType::MoveWorkspace,
        EventType::ActiveLayout,
        EventType::OpenWindow,
        EventType::CloseWindow,
        EventType::MoveWindow,
        EventType::OpenLayer,
        EventType::CloseLayer,
        EventType::SubMap,
        EventType::Screencast,
    ];

    /// Every event type, for subscribing to the whole stream
    pub fn all() -> &'static [EventType] {
        &Self::ALL
    }

    /// Name of the event type on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Workspace => "workspace",
            EventType::FocusedMonitor => "focusedmon",
            EventType::ActiveWindow => "activewindow",
            EventType::Fullscreen => "fullscreen",
            EventType::MonitorRemoved => "monitorremoved",
            EventType::MonitorAdded => "monitoradded",
            EventType::CreateWorkspace => "createworkspace",
            EventType::DestroyWorkspace => "destroyworkspace",
            EventType::MoveWorkspace => "moveworkspace",
            EventType::ActiveLayout => "activelayout",
            EventType::OpenWindow => "openwindow",
            EventType::CloseWindow => "closewindow",
            EventType::MoveWindow => "movewindow",
            EventType::OpenLayer => "openlayer",
            EventType::CloseLayer => "closelayer",
            EventType::SubMap => "submap",
            EventType::Screencast => "screencast",
        }
    }

    /// Look up an event type by its wire name
    ///
    /// Returns `None` for names outside the supported set (`workspacev2`,
    /// `urgent`, ...); those records are ignored by the event client.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }

    /// Number of comma separated payload fields this type carries
    fn field_count(self) -> usize {
        match self {
            EventType::OpenWindow => 4,
            EventType::FocusedMonitor
            | EventType::ActiveWindow
            | EventType::MoveWorkspace
            | EventType::ActiveLayout
            | EventType::MoveWindow
            | EventType::Screencast => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One framed record read from the event socket
///
/// `data` is the raw payload; it is never empty and never a bare comma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedEvent {
    pub kind: EventType,
    pub data: String,
}

impl ReceivedEvent {
    pub fn new(kind: EventType, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }
}

pub type WorkspaceName = String;
pub type MonitorName = String;
pub type LayerNamespace = String;
pub type SubMapName = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusedMonitor {
    pub monitor_name: MonitorName,
    pub workspace_name: WorkspaceName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveWindow {
    /// Window class (e.g., "kitty", "firefox")
    pub class: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveWorkspace {
    pub workspace_name: WorkspaceName,
    pub monitor_name: MonitorName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLayout {
    /// Keyboard device name
    pub keyboard: String,
    /// Name of the newly active layout
    pub layout: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenWindow {
    /// Window address in hex, without the `0x` prefix
    pub address: String,
    pub workspace_name: WorkspaceName,
    pub class: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseWindow {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveWindow {
    pub address: String,
    pub workspace_name: WorkspaceName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screencast {
    /// Whether a screencast is now active
    pub sharing: bool,
    /// Owner of the screencast, as reported by Hyprland (`0` monitor, `1` window)
    pub owner: String,
}

/// A decoded event payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Workspace(WorkspaceName),
    FocusedMonitor(FocusedMonitor),
    ActiveWindow(ActiveWindow),
    Fullscreen(bool),
    MonitorRemoved(MonitorName),
    MonitorAdded(MonitorName),
    CreateWorkspace(WorkspaceName),
    DestroyWorkspace(WorkspaceName),
    MoveWorkspace(MoveWorkspace),
    ActiveLayout(ActiveLayout),
    OpenWindow(OpenWindow),
    CloseWindow(CloseWindow),
    MoveWindow(MoveWindow),
    OpenLayer(LayerNamespace),
    CloseLayer(LayerNamespace),
    SubMap(SubMapName),
    Screencast(Screencast),
}

impl Event {
    /// Decode the payload of a received record
    ///
    /// The payload is split into exactly as many fields as the type needs;
    /// the last field keeps any further commas, so window titles such as
    /// `"Inbox, 3 unread"` survive intact.
    ///
    /// # Errors
    ///
    /// Returns `IpcError::MalformedEvent` if the payload has too few fields.
    pub fn decode(received: &ReceivedEvent) -> Result<Self, IpcError> {
        let expected = received.kind.field_count();
        let fields: Vec<&str> = received.data.splitn(expected, ',').collect();

        if fields.len() < expected {
            return Err(IpcError::MalformedEvent {
                kind: received.kind,
                payload: received.data.clone(),
                expected,
            });
        }

        let field = |i: usize| fields[i].to_string();

        let event = match received.kind {
            EventType::Workspace => Event::Workspace(field(0)),
            EventType::FocusedMonitor => Event::FocusedMonitor(FocusedMonitor {
                monitor_name: field(0),
                workspace_name: field(1),
            }),
            EventType::ActiveWindow => Event::ActiveWindow(ActiveWindow {
                class: field(0),
                title: field(1),
            }),
            EventType::Fullscreen => Event::Fullscreen(fields[0] == "1"),
            EventType::MonitorRemoved => Event::MonitorRemoved(field(0)),
            EventType::MonitorAdded => Event::MonitorAdded(field(0)),
            EventType::CreateWorkspace => Event::CreateWorkspace(field(0)),
            EventType::DestroyWorkspace => Event::DestroyWorkspace(field(0)),
            EventType::MoveWorkspace => Event::MoveWorkspace(MoveWorkspace {
                workspace_name: field(0),
                monitor_name: field(1),
            }),
            EventType::ActiveLayout => Event::ActiveLayout(ActiveLayout {
                keyboard: field(0),
                layout: field(1),
            }),
            EventType::OpenWindow => Event::OpenWindow(OpenWindow {
                address: field(0),
                workspace_name: field(1),
                class: field(2),
                title: field(3),
            }),
            EventType::CloseWindow => Event::CloseWindow(CloseWindow { address: field(0) }),
            EventType::MoveWindow => Event::MoveWindow(MoveWindow {
                address: field(0),
                workspace_name: field(1),
            }),
            EventType::OpenLayer => Event::OpenLayer(field(0)),
            EventType::CloseLayer => Event::CloseLayer(field(0)),
            EventType::SubMap => Event::SubMap(field(0)),
            EventType::Screencast => Event::Screencast(Screencast {
                sharing: fields[0] == "1",
                owner: field(1),
            }),
        };

        Ok(event)
    }

    /// The event type this payload belongs to
    pub fn kind(&self) -> EventType {
        match self {
            Event::Workspace(_) => EventType::Workspace,
            Event::FocusedMonitor(_) => EventType::FocusedMonitor,
            Event::ActiveWindow(_) => EventType::ActiveWindow,
            Event::Fullscreen(_) => EventType::Fullscreen,
            Event::MonitorRemoved(_) => EventType::MonitorRemoved,
            Event::MonitorAdded(_) => EventType::MonitorAdded,
            Event::CreateWorkspace(_) => EventType::CreateWorkspace,
            Event::DestroyWorkspace(_) => EventType::DestroyWorkspace,
            Event::MoveWorkspace(_) => EventType::MoveWorkspace,
            Event::ActiveLayout(_) => EventType::ActiveLayout,
            Event::OpenWindow(_) => EventType::OpenWindow,
            Event::CloseWindow(_) => EventType::CloseWindow,
            Event::MoveWindow(_) => EventType::MoveWindow,
            Event::OpenLayer(_) => EventType::OpenLayer,
            Event::CloseLayer(_) => EventType::CloseLayer,
            Event::SubMap(_) => EventType::SubMap,
            Event::Screencast(_) => EventType::Screencast,
        }
    }
}
