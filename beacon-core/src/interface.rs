//! Network interface types

use crate::MacAddr;
use std::fmt;
use std::net::IpAddr;

/// Link type reported by the OS interface table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceType {
    Ethernet,
    Wireless80211,
    Loopback,
    Tunnel,
    Other,
}

/// Operational status of a link (RFC 2863 ifOperStatus)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationalStatus {
    Up,
    Down,
    Testing,
    Unknown,
    Dormant,
    NotPresent,
    LowerLayerDown,
}

impl OperationalStatus {
    /// Parse the kernel's `operstate` attribute
    pub fn from_operstate(state: &str) -> Self {
        match state.trim() {
            "up" => OperationalStatus::Up,
            "down" => OperationalStatus::Down,
            "testing" => OperationalStatus::Testing,
            "dormant" => OperationalStatus::Dormant,
            "notpresent" => OperationalStatus::NotPresent,
            "lowerlayerdown" => OperationalStatus::LowerLayerDown,
            _ => OperationalStatus::Unknown,
        }
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationalStatus::Up => "up",
            OperationalStatus::Down => "down",
            OperationalStatus::Testing => "testing",
            OperationalStatus::Unknown => "unknown",
            OperationalStatus::Dormant => "dormant",
            OperationalStatus::NotPresent => "notpresent",
            OperationalStatus::LowerLayerDown => "lowerlayerdown",
        };
        f.write_str(s)
    }
}

/// IPv4 properties of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ipv4Properties {
    /// Whether the kernel forwards IPv4 packets received on this link
    pub forwarding_enabled: bool,
}

/// IPv6 properties of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Properties {
    /// OS link index of the interface
    pub link_index: u32,
}

/// One row of the OS interface table, as seen at the start of a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceCandidate {
    /// Stable identifier, matched against capture device names
    pub id: String,
    /// Interface name (e.g., "eth0", "wlan0")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Hardware address
    pub mac_address: MacAddr,
    /// Link speed in bits per second, 0 when unknown
    pub speed_bps: u64,
    /// Interface has the IPv4 stack bound
    pub supports_ipv4: bool,
    /// Interface has the IPv6 stack bound
    pub supports_ipv6: bool,
    /// Resolved IPv4 properties, `None` when unavailable
    pub ipv4: Option<Ipv4Properties>,
    /// Resolved IPv6 properties, `None` when unavailable
    pub ipv6: Option<Ipv6Properties>,
    /// Unicast addresses in OS order
    pub unicast_addresses: Vec<IpAddr>,
    pub interface_type: InterfaceType,
    pub operational_status: OperationalStatus,
}

impl InterfaceCandidate {
    /// Create a candidate for an up Ethernet link with no IP stack
    pub fn new(id: impl Into<String>, mac_address: MacAddr) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            description: id.clone(),
            id,
            mac_address,
            speed_bps: 0,
            supports_ipv4: false,
            supports_ipv6: false,
            ipv4: None,
            ipv6: None,
            unicast_addresses: Vec::new(),
            interface_type: InterfaceType::Ethernet,
            operational_status: OperationalStatus::Up,
        }
    }

    /// Whether the interface should carry LLDP announcements
    ///
    /// Up, not loopback, not a tunnel, and bound to IPv4 or IPv6.
    pub fn is_eligible(&self) -> bool {
        self.operational_status == OperationalStatus::Up
            && !matches!(
                self.interface_type,
                InterfaceType::Loopback | InterfaceType::Tunnel
            )
            && (self.supports_ipv4 || self.supports_ipv6)
    }

    /// Link index used for management addresses, -1 when unresolved
    ///
    /// Only IPv6 properties carry the index; an IPv4-only interface stays
    /// unresolved.
    pub fn link_index(&self) -> i64 {
        self.ipv6.map(|p| i64::from(p.link_index)).unwrap_or(-1)
    }

    /// IPv4 forwarding, false when IPv4 properties are unavailable
    pub fn forwarding_enabled(&self) -> bool {
        self.ipv4.map(|p| p.forwarding_enabled).unwrap_or(false)
    }
}

impl fmt::Display for InterfaceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}), {}, {:?}",
            self.name, self.mac_address, self.operational_status, self.interface_type
        )
    }
}
