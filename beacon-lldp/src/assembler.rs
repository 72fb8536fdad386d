//! Builds the LLDPDU announced on one interface

use crate::capabilities;
use crate::readable::readable_size;
use crate::tlv::{LldpTlv, Lldpdu};
use beacon_core::{AnnouncementConfig, InterfaceCandidate, Result};
use beacon_packet::EthernetFrame;
use tracing::{debug, warn};

/// TTL advertised to neighbors, four announcement intervals
pub const LLDP_TTL_DEFAULT: u16 = 120;

/// Largest LLDPDU carried by one untagged Ethernet frame
pub const MAX_LLDPDU_LEN: usize = EthernetFrame::MAX_PAYLOAD_SIZE;

const END_OF_LLDPDU_LEN: usize = 2;

/// Port Description text for an interface
pub fn port_description(candidate: &InterfaceCandidate) -> String {
    format!(
        "Name: {}, Index: {}, Desc: {}, Speed: {}",
        candidate.name,
        candidate.link_index(),
        candidate.description,
        readable_size(candidate.speed_bps)
    )
}

/// Assemble the TLV sequence for one interface
///
/// The order is fixed: Chassis ID, Port ID, TTL, Port Description, System
/// Name, System Description, System Capabilities, one Management Address per
/// unicast address (only when a link index is resolved), End of LLDPDU.
/// Trailing Management Addresses that would push the LLDPDU past
/// [`MAX_LLDPDU_LEN`] are left out.
pub fn build_tlvs(candidate: &InterfaceCandidate, config: &AnnouncementConfig) -> Result<Lldpdu> {
    let (available, enabled) = capabilities::resolve(candidate)?;

    let mut tlvs = vec![
        LldpTlv::chassis_id_mac(candidate.mac_address.octets()),
        LldpTlv::port_id_local(&candidate.id),
        LldpTlv::ttl(LLDP_TTL_DEFAULT),
        LldpTlv::port_description(&port_description(candidate)),
        LldpTlv::system_name(&config.system_name),
        LldpTlv::system_description(&config.system_description),
        LldpTlv::system_capabilities(available, enabled),
    ];

    if let Ok(index) = u32::try_from(candidate.link_index()) {
        let mut size = encoded_len(&tlvs)? + END_OF_LLDPDU_LEN;
        let mut dropped = 0usize;

        for (position, address) in candidate.unicast_addresses.iter().enumerate() {
            let tlv = LldpTlv::management_address(*address, index);
            let len = tlv.to_bytes()?.len();
            if size + len > MAX_LLDPDU_LEN {
                dropped = candidate.unicast_addresses.len() - position;
                break;
            }
            size += len;
            tlvs.push(tlv);
        }

        if dropped > 0 {
            warn!(
                interface = %candidate.name,
                dropped,
                "Management addresses omitted to fit the Ethernet MTU"
            );
        }
    }

    tlvs.push(LldpTlv::end_of_lldpdu());

    let lldpdu = Lldpdu::new(tlvs)?;
    debug!(interface = %candidate.name, "{}", lldpdu);
    Ok(lldpdu)
}

fn encoded_len(tlvs: &[LldpTlv]) -> Result<usize> {
    let mut total = 0;
    for tlv in tlvs {
        total += tlv.to_bytes()?.len();
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::LldpCapabilities;
    use crate::tlv::LldpTlvType;
    use beacon_core::{Ipv4Properties, Ipv6Properties, MacAddr};
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    fn config() -> AnnouncementConfig {
        AnnouncementConfig::new("host01", "Linux 6.8.0, 8 Processors")
    }

    fn eth0() -> InterfaceCandidate {
        let mut candidate =
            InterfaceCandidate::new("eth0", MacAddr::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]));
        candidate.description = "Intel I219-V".to_string();
        candidate.speed_bps = 1_000_000_000;
        candidate.supports_ipv4 = true;
        candidate.ipv4 = Some(Ipv4Properties {
            forwarding_enabled: false,
        });
        candidate.unicast_addresses = vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))];
        candidate
    }

    fn types(lldpdu: &Lldpdu) -> Vec<LldpTlvType> {
        lldpdu.tlvs().iter().map(|tlv| tlv.tlv_type()).collect()
    }

    #[test]
    fn test_fixed_order_with_management_addresses() {
        let mut candidate = eth0();
        candidate.supports_ipv6 = true;
        candidate.ipv6 = Some(Ipv6Properties { link_index: 2 });
        candidate
            .unicast_addresses
            .push(IpAddr::V6("fe80::1".parse::<Ipv6Addr>().unwrap()));

        let lldpdu = build_tlvs(&candidate, &config()).unwrap();
        assert_eq!(
            types(&lldpdu),
            vec![
                LldpTlvType::ChassisId,
                LldpTlvType::PortId,
                LldpTlvType::Ttl,
                LldpTlvType::PortDescription,
                LldpTlvType::SystemName,
                LldpTlvType::SystemDescription,
                LldpTlvType::SystemCapabilities,
                LldpTlvType::ManagementAddress,
                LldpTlvType::ManagementAddress,
                LldpTlvType::EndOfLldpdu,
            ]
        );

        match &lldpdu.tlvs()[7] {
            LldpTlv::ManagementAddress(mgmt) => {
                assert_eq!(mgmt.address, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)));
                assert_eq!(mgmt.interface_number, 2);
                assert!(mgmt.oid.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_ipv4_only_has_no_management_address() {
        let lldpdu = build_tlvs(&eth0(), &config()).unwrap();
        assert!(!types(&lldpdu).contains(&LldpTlvType::ManagementAddress));
        assert_eq!(lldpdu.len(), 8);
    }

    #[test]
    fn test_no_ip_properties() {
        let mut candidate = eth0();
        candidate.ipv4 = None;
        candidate.ipv6 = None;

        let lldpdu = build_tlvs(&candidate, &config()).unwrap();
        assert!(!types(&lldpdu).contains(&LldpTlvType::ManagementAddress));
        assert_eq!(lldpdu.tlvs().last(), Some(&LldpTlv::EndOfLldpdu));
    }

    #[test]
    fn test_identity_tlvs() {
        let lldpdu = build_tlvs(&eth0(), &config()).unwrap();
        let tlvs = lldpdu.tlvs();

        assert_eq!(tlvs[0], LldpTlv::chassis_id_mac([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]));
        assert_eq!(tlvs[1], LldpTlv::port_id_local("eth0"));
        assert_eq!(tlvs[2], LldpTlv::TimeToLive(120));
        assert_eq!(
            tlvs[3],
            LldpTlv::PortDescription(
                "Name: eth0, Index: -1, Desc: Intel I219-V, Speed: 1G".to_string()
            )
        );
        assert_eq!(lldpdu.system_name(), Some("host01"));
        assert_eq!(
            tlvs[5],
            LldpTlv::SystemDescription("Linux 6.8.0, 8 Processors".to_string())
        );
    }

    #[test]
    fn test_capabilities_tlv() {
        let lldpdu = build_tlvs(&eth0(), &config()).unwrap();
        assert_eq!(
            lldpdu.tlvs()[6],
            LldpTlv::SystemCapabilities {
                available: LldpCapabilities(
                    LldpCapabilities::BRIDGE
                        | LldpCapabilities::ROUTER
                        | LldpCapabilities::STATION_ONLY
                ),
                enabled: LldpCapabilities(LldpCapabilities::STATION_ONLY),
            }
        );
    }

    #[test]
    fn test_port_description_with_index() {
        let mut candidate = eth0();
        candidate.ipv6 = Some(Ipv6Properties { link_index: 4 });
        candidate.speed_bps = 0;
        assert_eq!(
            port_description(&candidate),
            "Name: eth0, Index: 4, Desc: Intel I219-V, Speed: 0b"
        );
    }

    #[test]
    fn test_management_addresses_trimmed_to_mtu() {
        let mut candidate = eth0();
        candidate.supports_ipv6 = true;
        candidate.ipv6 = Some(Ipv6Properties { link_index: 3 });
        candidate.unicast_addresses = (1..=70u16)
            .map(|n| IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, n)))
            .collect();

        let lldpdu = build_tlvs(&candidate, &config()).unwrap();
        let bytes = lldpdu.to_bytes().unwrap();
        assert!(bytes.len() <= MAX_LLDPDU_LEN);

        let kept: Vec<IpAddr> = lldpdu
            .tlvs()
            .iter()
            .filter_map(|tlv| match tlv {
                LldpTlv::ManagementAddress(mgmt) => Some(mgmt.address),
                _ => None,
            })
            .collect();
        assert!(!kept.is_empty());
        assert!(kept.len() < candidate.unicast_addresses.len());
        // the leading addresses survive, in order
        assert_eq!(kept[..], candidate.unicast_addresses[..kept.len()]);
        assert_eq!(lldpdu.tlvs().last(), Some(&LldpTlv::EndOfLldpdu));
    }
}
