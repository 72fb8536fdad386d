//! Link Layer Discovery Protocol (LLDP) announcements - IEEE 802.1AB
//!
//! This crate builds the LLDP frames lldp-beacon transmits:
//! - Capability resolution and the System Capabilities bitmaps
//! - TLV encoding for the fixed set of TLVs the agent sends
//! - LLDPDU assembly for one interface
//! - Ethernet framing towards the nearest bridge group address
//!
//! ## Packet Structure
//!
//! LLDP frames have the following structure:
//! - Destination MAC: 01:80:C2:00:00:0E (nearest bridge multicast)
//! - Ethertype: 0x88CC
//! - TLVs: Type-Length-Value format
//!
//! TLVs are emitted in this order:
//! - Chassis ID (Type 1), MAC address subtype
//! - Port ID (Type 2), locally assigned subtype
//! - TTL (Type 3), 120 seconds
//! - Port Description (Type 4)
//! - System Name (Type 5)
//! - System Description (Type 6)
//! - System Capabilities (Type 7)
//! - Management Address (Type 8), zero or more
//! - End of LLDPDU (Type 0)

pub mod assembler;
pub mod capabilities;
pub mod frame;
pub mod readable;
pub mod tlv;

pub use assembler::{build_tlvs, LLDP_TTL_DEFAULT};
pub use capabilities::{Capability, LldpCapabilities};
pub use frame::{build_frame, LLDP_ETHERTYPE, LLDP_MULTICAST_MAC};
pub use readable::readable_size;
pub use tlv::{LldpTlv, LldpTlvType, Lldpdu};
