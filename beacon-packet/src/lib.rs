//! Packet construction library for lldp-beacon
//!
//! Builds the Ethernet II frames that carry LLDP data units.
//!
//! # Quick Start
//!
//! ```rust
//! use beacon_packet::ethernet::{EtherType, EthernetFrame, MacAddress};
//!
//! let src = MacAddress([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
//! let lldpdu = vec![0x00, 0x00]; // End of LLDPDU
//!
//! let frame = EthernetFrame::new(MacAddress::LLDP_MULTICAST, src, EtherType::LLDP, lldpdu);
//! let bytes = frame.to_bytes();
//! assert_eq!(&bytes[12..14], &[0x88, 0xCC]);
//! ```

pub mod ethernet;

pub use ethernet::{EtherType, EthernetFrame, MacAddress};
