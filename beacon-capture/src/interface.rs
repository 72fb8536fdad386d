//! Network interface enumeration
//!
//! The OS interface table comes from `pnet_datalink`; link attributes that
//! pnet does not expose (operational state, ARPHRD type, speed, per-family
//! stack configuration) come from sysfs and procfs.

use beacon_core::{
    Error, InterfaceCandidate, InterfaceType, Ipv4Properties, Ipv6Properties, MacAddr,
    OperationalStatus, Result,
};
use pnet_datalink::{self, NetworkInterface};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// ARPHRD values from `<linux/if_arp.h>`
mod arphrd {
    pub const ETHER: u16 = 1;
    pub const TUNNEL: u16 = 768;
    pub const TUNNEL6: u16 = 769;
    pub const LOOPBACK: u16 = 772;
    pub const SIT: u16 = 776;
    pub const IPGRE: u16 = 778;
    pub const IP6GRE: u16 = 823;
    pub const NONE: u16 = 65534;
}

/// Source of the OS interface table
pub trait InterfaceSource: Send + Sync {
    /// Every interface known to the OS, eligible or not
    fn interfaces(&self) -> Result<Vec<InterfaceCandidate>>;
}

/// Interfaces of the running host
#[derive(Debug, Clone)]
pub struct SystemInterfaces {
    sysfs_net: PathBuf,
    procfs_net: PathBuf,
}

impl Default for SystemInterfaces {
    fn default() -> Self {
        Self::with_roots("/sys/class/net", "/proc/sys/net")
    }
}

impl SystemInterfaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read link attributes below the given sysfs and procfs directories
    pub fn with_roots(sysfs_net: impl Into<PathBuf>, procfs_net: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_net: sysfs_net.into(),
            procfs_net: procfs_net.into(),
        }
    }

    fn link_attr(&self, name: &str, attr: &str) -> std::io::Result<String> {
        fs::read_to_string(self.sysfs_net.join(name).join(attr)).map(|s| s.trim().to_string())
    }

    fn family_conf(&self, family: &str, name: &str) -> PathBuf {
        self.procfs_net.join(family).join("conf").join(name)
    }

    fn operational_status(&self, iface: &NetworkInterface) -> OperationalStatus {
        match self.link_attr(&iface.name, "operstate") {
            Ok(state) => OperationalStatus::from_operstate(&state),
            Err(_) if iface.is_up() && iface.is_running() => OperationalStatus::Up,
            Err(_) => OperationalStatus::Down,
        }
    }

    fn interface_type(&self, iface: &NetworkInterface) -> InterfaceType {
        if iface.is_loopback() {
            return InterfaceType::Loopback;
        }
        if self.sysfs_net.join(&iface.name).join("wireless").exists() {
            return InterfaceType::Wireless80211;
        }

        let hw_type = self
            .link_attr(&iface.name, "type")
            .ok()
            .and_then(|t| t.parse::<u16>().ok());

        match hw_type {
            Some(arphrd::LOOPBACK) => InterfaceType::Loopback,
            Some(
                arphrd::TUNNEL
                | arphrd::TUNNEL6
                | arphrd::SIT
                | arphrd::IPGRE
                | arphrd::IP6GRE
                | arphrd::NONE,
            ) => InterfaceType::Tunnel,
            Some(arphrd::ETHER) => InterfaceType::Ethernet,
            Some(_) => InterfaceType::Other,
            // No sysfs: anything with a hardware address is treated as Ethernet
            None if iface.mac.is_some() => InterfaceType::Ethernet,
            None => InterfaceType::Other,
        }
    }

    fn speed_bps(&self, name: &str) -> u64 {
        // Virtual and down links report EINVAL or -1
        self.link_attr(name, "speed")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|mbps| *mbps > 0)
            .map(|mbps| (mbps as u64).saturating_mul(1_000_000))
            .unwrap_or(0)
    }

    fn supports_ipv4(&self, iface: &NetworkInterface) -> bool {
        self.family_conf("ipv4", &iface.name).exists() || iface.ips.iter().any(|ip| ip.is_ipv4())
    }

    fn supports_ipv6(&self, iface: &NetworkInterface) -> bool {
        let conf = self.family_conf("ipv6", &iface.name);
        if conf.exists() {
            let disabled = fs::read_to_string(conf.join("disable_ipv6"))
                .map(|v| v.trim() == "1")
                .unwrap_or(false);
            return !disabled;
        }
        iface.ips.iter().any(|ip| ip.is_ipv6())
    }

    fn ipv4_properties(&self, name: &str) -> Result<Ipv4Properties> {
        let forwarding = read_flag(&self.family_conf("ipv4", name).join("forwarding"))?;
        Ok(Ipv4Properties {
            forwarding_enabled: forwarding,
        })
    }

    fn ipv6_properties(&self, iface: &NetworkInterface) -> Result<Ipv6Properties> {
        if iface.index == 0 {
            return Err(Error::Enumeration(format!("no link index for {}", iface.name)));
        }
        Ok(Ipv6Properties {
            link_index: iface.index,
        })
    }

    /// Build a candidate from one row of the OS table
    ///
    /// Links without a hardware address (PPP, WireGuard, loopback) have no
    /// Chassis ID to announce and yield `None`. Failures reading per-family
    /// properties are logged and leave that family's properties empty.
    pub fn candidate_from(&self, iface: &NetworkInterface) -> Option<InterfaceCandidate> {
        let Some(mac_address) = iface
            .mac
            .map(|mac| MacAddr::new([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5]))
            .filter(|mac| !mac.is_zero())
        else {
            debug!(interface = %iface.name, "Skipping interface without a hardware address");
            return None;
        };

        let supports_ipv4 = self.supports_ipv4(iface);
        let supports_ipv6 = self.supports_ipv6(iface);

        let ipv6 = if supports_ipv6 {
            self.ipv6_properties(iface)
                .map_err(|e| {
                    warn!(interface = %iface.name, error = %e, "IPv6 properties unavailable")
                })
                .ok()
        } else {
            None
        };

        let ipv4 = if supports_ipv4 {
            self.ipv4_properties(&iface.name)
                .map_err(|e| {
                    warn!(interface = %iface.name, error = %e, "IPv4 properties unavailable")
                })
                .ok()
        } else {
            None
        };

        let description = if iface.description.is_empty() {
            iface.name.clone()
        } else {
            iface.description.clone()
        };

        Some(InterfaceCandidate {
            id: iface.name.clone(),
            name: iface.name.clone(),
            description,
            mac_address,
            speed_bps: self.speed_bps(&iface.name),
            supports_ipv4,
            supports_ipv6,
            ipv4,
            ipv6,
            unicast_addresses: iface.ips.iter().map(|network| network.ip()).collect(),
            interface_type: self.interface_type(iface),
            operational_status: self.operational_status(iface),
        })
    }
}

impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> Result<Vec<InterfaceCandidate>> {
        let interfaces = pnet_datalink::interfaces();
        Ok(interfaces
            .iter()
            .filter_map(|iface| self.candidate_from(iface))
            .collect())
    }
}

/// List interfaces that should carry LLDP announcements, in OS order
///
/// An empty list is not an error.
pub fn enumerate(source: &dyn InterfaceSource) -> Result<Vec<InterfaceCandidate>> {
    let candidates: Vec<InterfaceCandidate> = source
        .interfaces()?
        .into_iter()
        .filter(|candidate| {
            let eligible = candidate.is_eligible();
            if !eligible {
                debug!(
                    interface = %candidate.name,
                    status = %candidate.operational_status,
                    "Skipping ineligible interface"
                );
            }
            eligible
        })
        .collect();

    debug!(count = candidates.len(), "Enumerated eligible interfaces");
    Ok(candidates)
}

/// Restrict candidates to the given OS interface names, all when empty
pub fn restrict_to(
    candidates: Vec<InterfaceCandidate>,
    names: &[String],
) -> Vec<InterfaceCandidate> {
    if names.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|candidate| names.iter().any(|name| name == &candidate.name))
        .collect()
}

fn read_flag(path: &Path) -> Result<bool> {
    let value = fs::read_to_string(path)?;
    match value.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(Error::Enumeration(format!(
            "unexpected value '{}' in {}",
            other,
            path.display()
        ))),
    }
}
