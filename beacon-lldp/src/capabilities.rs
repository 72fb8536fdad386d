//! System capabilities (IEEE 802.1AB-2016 Table 8-4)
//!
//! Resolves which capabilities an interface advertises and encodes them into
//! the two 16-bit bitmaps of the System Capabilities TLV.

use beacon_core::{Error, InterfaceCandidate, InterfaceType, Result};
use std::collections::BTreeSet;
use std::fmt;

/// A single system capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Other,
    Repeater,
    Bridge,
    WlanAccessPoint,
    Router,
    Telephone,
    DocsisCableDevice,
    StationOnly,
    CVlanComponent,
    SVlanComponent,
    TwoPortMacRelay,
}

impl Capability {
    /// Every capability defined by the standard
    pub const ALL: [Capability; 11] = [
        Capability::Other,
        Capability::Repeater,
        Capability::Bridge,
        Capability::WlanAccessPoint,
        Capability::Router,
        Capability::Telephone,
        Capability::DocsisCableDevice,
        Capability::StationOnly,
        Capability::CVlanComponent,
        Capability::SVlanComponent,
        Capability::TwoPortMacRelay,
    ];

    /// Bit position within the capability field, counted from the LSB
    pub fn bit(self) -> u32 {
        match self {
            Capability::Other => 0,
            Capability::Repeater => 1,
            Capability::Bridge => 2,
            Capability::WlanAccessPoint => 3,
            Capability::Router => 4,
            Capability::Telephone => 5,
            Capability::DocsisCableDevice => 6,
            Capability::StationOnly => 7,
            Capability::CVlanComponent => 8,
            Capability::SVlanComponent => 9,
            Capability::TwoPortMacRelay => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Capability::Other => "Other",
            Capability::Repeater => "Repeater",
            Capability::Bridge => "Bridge",
            Capability::WlanAccessPoint => "WLAN Access Point",
            Capability::Router => "Router",
            Capability::Telephone => "Telephone",
            Capability::DocsisCableDevice => "DOCSIS cable device",
            Capability::StationOnly => "Station Only",
            Capability::CVlanComponent => "C-VLAN Component",
            Capability::SVlanComponent => "S-VLAN Component",
            Capability::TwoPortMacRelay => "Two-port MAC Relay",
        }
    }

    /// Single-bit mask, or an error if the bit does not fit 16 bits
    pub fn mask(self) -> Result<u16> {
        1u16.checked_shl(self.bit())
            .ok_or(Error::CapabilityOutOfRange {
                capability: self.name(),
                bit: self.bit(),
            })
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// System Capabilities (bitmap)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct LldpCapabilities(pub u16);

impl LldpCapabilities {
    pub const OTHER: u16 = 0x0001;
    pub const REPEATER: u16 = 0x0002;
    pub const BRIDGE: u16 = 0x0004;
    pub const WLAN_ACCESS_POINT: u16 = 0x0008;
    pub const ROUTER: u16 = 0x0010;
    pub const TELEPHONE: u16 = 0x0020;
    pub const DOCSIS: u16 = 0x0040;
    pub const STATION_ONLY: u16 = 0x0080;
    pub const C_VLAN: u16 = 0x0100;
    pub const S_VLAN: u16 = 0x0200;
    pub const TPMR: u16 = 0x0400;

    /// Bitwise-OR of every capability in the set
    pub fn encode<'a, I>(capabilities: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Capability>,
    {
        capabilities
            .into_iter()
            .try_fold(0u16, |bits, cap| Ok(bits | cap.mask()?))
            .map(Self)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn contains(&self, capability: Capability) -> bool {
        capability
            .mask()
            .map(|mask| self.0 & mask != 0)
            .unwrap_or(false)
    }

    pub fn is_bridge(&self) -> bool {
        self.0 & Self::BRIDGE != 0
    }

    pub fn is_router(&self) -> bool {
        self.0 & Self::ROUTER != 0
    }
}

impl fmt::Display for LldpCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Capability::ALL
            .iter()
            .filter(|cap| self.contains(**cap))
            .map(|cap| cap.name())
            .collect();
        write!(f, "0x{:04x} [{}]", self.0, names.join(", "))
    }
}

/// Capabilities the system could offer on this interface
///
/// Bridge, Router and Station Only are reported for every interface, plus WLAN
/// Access Point on 802.11 links. This describes the host class, not what the
/// adapter can actually bridge.
pub fn available_capabilities(candidate: &InterfaceCandidate) -> BTreeSet<Capability> {
    let mut capabilities = BTreeSet::from([
        Capability::Bridge,
        Capability::Router,
        Capability::StationOnly,
    ]);

    if candidate.interface_type == InterfaceType::Wireless80211 {
        capabilities.insert(Capability::WlanAccessPoint);
    }

    capabilities
}

/// Capabilities currently enabled on this interface
///
/// Always Station Only, plus Router when IPv4 forwarding is on.
pub fn enabled_capabilities(candidate: &InterfaceCandidate) -> BTreeSet<Capability> {
    let mut capabilities = BTreeSet::from([Capability::StationOnly]);

    if candidate.forwarding_enabled() {
        capabilities.insert(Capability::Router);
    }

    capabilities
}

/// (available, enabled) bitmaps for the System Capabilities TLV
pub fn resolve(candidate: &InterfaceCandidate) -> Result<(LldpCapabilities, LldpCapabilities)> {
    let available = LldpCapabilities::encode(&available_capabilities(candidate))?;
    let enabled = LldpCapabilities::encode(&enabled_capabilities(candidate))?;
    Ok((available, enabled))
}
