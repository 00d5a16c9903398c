//! Configuration parsing for hypr-ipc
//!
//! This crate handles parsing KDL configuration files that describe how
//! hypr-ipc clients find the Hyprland sockets and how they talk to them
//! (response validation, request timeout, event read buffer).

mod error;
mod model;
mod parser;

pub use error::ConfigError;
pub use model::*;
pub use parser::{parse_config, parse_config_str};
