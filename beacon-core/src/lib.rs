//! lldp-beacon core library
//!
//! This crate provides the error type, the interface data model and the
//! announcement configuration shared by the lldp-beacon crates.

pub mod config;
pub mod error;
pub mod interface;
pub mod types;

// Re-export commonly used types
pub use config::AnnouncementConfig;
pub use error::{Error, Result};
pub use interface::{
    InterfaceCandidate, InterfaceType, Ipv4Properties, Ipv6Properties, OperationalStatus,
};
pub use types::MacAddr;
