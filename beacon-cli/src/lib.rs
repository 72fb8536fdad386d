//! CLI interface for lldp-beacon
//!
//! This crate provides argument parsing, the reloadable announcement
//! settings and logging setup for the `lldp-beacon` binary.

pub mod args;
pub mod logging;
pub mod settings;

pub use args::{Cli, Commands};
pub use settings::{Overrides, Settings, SettingsFile};
