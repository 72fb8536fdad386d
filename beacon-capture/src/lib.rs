//! Interface discovery and raw frame transmission for lldp-beacon
//!
//! This crate finds the links that should carry LLDP announcements and gives
//! the agent a transmit handle for each of them.
//!
//! ## Features
//!
//! - **Interface Enumeration**: OS interfaces filtered to up, non-loopback,
//!   non-tunnel links with an IP stack
//! - **Capture Devices**: libpcap devices matched to interfaces by name and
//!   opened in promiscuous mode for a single send
//! - **Test Seams**: `InterfaceSource` and `CaptureBackend` traits so the
//!   announcement cycle can run against in-memory doubles
//!
//! ## Example
//!
//! ```no_run
//! use beacon_capture::{enumerate, CaptureBackend, PcapBackend, SystemInterfaces};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let candidates = enumerate(&SystemInterfaces::new())?;
//! let devices = PcapBackend::new().devices()?;
//! println!("{} interfaces, {} devices", candidates.len(), devices.len());
//! # Ok(())
//! # }
//! ```

pub mod device;
pub mod interface;

// Re-export main types
pub use device::{match_device, CaptureBackend, CaptureDevice, PcapBackend, PcapDevice};
pub use interface::{enumerate, restrict_to, InterfaceSource, SystemInterfaces};
