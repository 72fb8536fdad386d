//! Ethernet frame construction
//!
//! This module builds Ethernet II frames, the encapsulation LLDP uses on
//! every IEEE 802 link.

use bytes::{BufMut, BytesMut};

/// EtherType field of an Ethernet II header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtherType(pub u16);

impl EtherType {
    /// LLDP (0x88CC)
    pub const LLDP: EtherType = EtherType(0x88CC);

    /// Convert EtherType to u16 value
    pub fn to_u16(self) -> u16 {
        self.0
    }
}

/// MAC address (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// LLDP nearest bridge multicast address (01:80:C2:00:00:0E)
    pub const LLDP_MULTICAST: MacAddress = MacAddress([0x01, 0x80, 0xC2, 0x00, 0x00, 0x0E]);

    /// Get the MAC address as a byte array
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl From<beacon_core::MacAddr> for MacAddress {
    fn from(mac: beacon_core::MacAddr) -> Self {
        MacAddress(mac.octets())
    }
}

/// Ethernet II frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    /// Destination MAC address
    pub destination: MacAddress,
    /// Source MAC address
    pub source: MacAddress,
    /// EtherType
    pub ethertype: EtherType,
    /// Payload data
    pub payload: Vec<u8>,
}

impl EthernetFrame {
    /// Minimum Ethernet frame size (without FCS)
    pub const MIN_FRAME_SIZE: usize = 60;

    /// Maximum Ethernet frame size (without FCS)
    pub const MAX_FRAME_SIZE: usize = 1514;

    /// Ethernet header size (dst + src + type)
    pub const HEADER_SIZE: usize = 14;

    /// Maximum payload size (MTU)
    pub const MAX_PAYLOAD_SIZE: usize = Self::MAX_FRAME_SIZE - Self::HEADER_SIZE;

    /// Create a new Ethernet frame
    pub fn new(
        destination: MacAddress,
        source: MacAddress,
        ethertype: EtherType,
        payload: Vec<u8>,
    ) -> Self {
        EthernetFrame {
            destination,
            source,
            ethertype,
            payload,
        }
    }

    /// Convert the frame to bytes
    ///
    /// Frames shorter than the Ethernet minimum are zero-padded.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(self.len());

        buffer.put_slice(self.destination.as_bytes());
        buffer.put_slice(self.source.as_bytes());
        buffer.put_u16(self.ethertype.to_u16());
        buffer.put_slice(&self.payload);

        if buffer.len() < Self::MIN_FRAME_SIZE {
            buffer.resize(Self::MIN_FRAME_SIZE, 0);
        }

        buffer.to_vec()
    }

    /// Get the total frame size in bytes, padding included
    pub fn len(&self) -> usize {
        let raw_len = Self::HEADER_SIZE + self.payload.len();
        raw_len.max(Self::MIN_FRAME_SIZE)
    }

    /// Check if the frame is empty (never true, the header is always present)
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether the frame fits the 1514-octet Ethernet maximum
    pub fn fits_mtu(&self) -> bool {
        self.len() <= Self::MAX_FRAME_SIZE
    }
}
