//! Records returned by Hyprland's JSON queries
//!
//! These mirror the output of `hyprctl -j <query>`. Fields keep Hyprland's
//! key names through serde renames, and every record tolerates missing keys
//! so older and newer compositor releases still decode.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// Hyprland release these records were last checked against
pub const HYPRLAND_VERSION: &str = "0.41.2";

/// A key or mouse binding (`j/binds`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Bind {
    pub locked: bool,
    pub mouse: bool,
    pub release: bool,
    pub repeat: bool,
    pub non_consuming: bool,
    pub has_description: bool,
    pub modmask: i64,
    pub submap: String,
    pub key: String,
    pub keycode: i64,
    pub catch_all: bool,
    pub description: String,
    pub dispatcher: String,
    pub arg: String,
}

/// A mapped client window (`j/clients`, `j/activewindow`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Client {
    pub address: String,
    pub mapped: bool,
    pub hidden: bool,
    pub at: Vec<i64>,
    pub size: Vec<i64>,
    pub workspace: WorkspaceRef,
    pub floating: bool,
    pub pseudo: bool,
    pub monitor: i64,
    pub class: String,
    pub title: String,
    pub initial_class: String,
    pub initial_title: String,
    pub pid: i64,
    pub xwayland: bool,
    pub pinned: bool,
    pub fullscreen: bool,
    pub fullscreen_mode: i64,
    pub grouped: Vec<String>,
    pub tags: Vec<String>,
    pub swallowing: String,
    #[serde(rename = "focusHistoryID")]
    pub focus_history_id: i64,
}

/// The focused window has the same shape as any other client
pub type Window = Client;

/// Cursor position in global layout coordinates (`j/cursorpos`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CursorPos {
    pub x: i64,
    pub y: i64,
}

/// Layer surfaces per output name (`j/layers`)
pub type Layers = HashMap<String, Layer>;

/// Layer surfaces of one output, keyed by layer level
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Layer {
    pub levels: BTreeMap<i32, Vec<LayerField>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayerField {
    pub address: String,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
    pub namespace: String,
}

/// A connected output (`j/monitors`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Monitor {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub make: String,
    pub model: String,
    pub serial: String,
    pub width: i64,
    pub height: i64,
    pub refresh_rate: f64,
    pub x: i64,
    pub y: i64,
    pub active_workspace: WorkspaceRef,
    pub special_workspace: WorkspaceRef,
    pub reserved: Vec<i64>,
    pub scale: f64,
    pub transform: i64,
    pub focused: bool,
    pub dpms_status: bool,
    pub vrr: bool,
    pub actively_tearing: bool,
    pub current_format: String,
    pub available_modes: Vec<String>,
}

/// Value of a config option (`j/getoption <name>`)
///
/// Hyprland only fills the field matching the option's type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptionValue {
    pub option: String,
    pub int: i64,
    pub float: Option<f64>,
    #[serde(rename = "str")]
    pub string: Option<String>,
    pub set: bool,
}

/// Compositor build information (`j/version`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Version {
    pub branch: String,
    pub commit: String,
    pub dirty: bool,
    pub commit_message: String,
    pub commit_date: String,
    pub tag: String,
    pub commits: String,
    pub flags: Vec<String>,
}

/// A workspace (`j/workspaces`, `j/activeworkspace`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    pub monitor: String,
    #[serde(rename = "monitorID")]
    pub monitor_id: i64,
    pub windows: i64,
    #[serde(rename = "hasfullscreen")]
    pub has_fullscreen: bool,
    #[serde(rename = "lastwindow")]
    pub last_window: String,
    #[serde(rename = "lastwindowtitle")]
    pub last_window_title: String,
}

/// Workspace identity as embedded in clients and monitors
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkspaceRef {
    pub id: i64,
    pub name: String,
}
