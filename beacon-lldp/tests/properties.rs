//! Property tests for capability encoding, LLDPDU assembly and framing

use beacon_core::{
    AnnouncementConfig, InterfaceCandidate, InterfaceType, Ipv4Properties, Ipv6Properties, MacAddr,
};
use beacon_lldp::{build_frame, build_tlvs, Capability, LldpCapabilities, LldpTlv, LldpTlvType};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

const VOCABULARY: [Capability; 4] = [
    Capability::Bridge,
    Capability::Router,
    Capability::StationOnly,
    Capability::WlanAccessPoint,
];

#[test]
fn test_encode_injective_on_vocabulary() {
    let defined = LldpCapabilities::BRIDGE
        | LldpCapabilities::ROUTER
        | LldpCapabilities::STATION_ONLY
        | LldpCapabilities::WLAN_ACCESS_POINT;
    let mut seen: HashMap<u16, BTreeSet<Capability>> = HashMap::new();

    for subset in 0u8..16 {
        let set: BTreeSet<Capability> = VOCABULARY
            .iter()
            .enumerate()
            .filter(|(i, _)| subset & (1 << i) != 0)
            .map(|(_, cap)| *cap)
            .collect();

        let bits = LldpCapabilities::encode(&set).unwrap().bits();
        assert_eq!(bits & !defined, 0, "stray bit for {:?}", set);

        if let Some(previous) = seen.insert(bits, set.clone()) {
            panic!("{:?} and {:?} both encode to {:#06x}", previous, set, bits);
        }
    }

    assert_eq!(seen.len(), 16);
}

fn arb_interface_type() -> impl Strategy<Value = InterfaceType> {
    prop_oneof![
        Just(InterfaceType::Ethernet),
        Just(InterfaceType::Wireless80211),
        Just(InterfaceType::Other),
    ]
}

fn arb_address() -> impl Strategy<Value = IpAddr> {
    prop_oneof![
        any::<[u8; 4]>().prop_map(|o| IpAddr::V4(Ipv4Addr::from(o))),
        any::<[u8; 16]>().prop_map(|o| IpAddr::V6(Ipv6Addr::from(o))),
    ]
}

prop_compose! {
    fn arb_candidate()(
        id in "[a-z]{2,6}[0-9]{1,2}",
        mac in any::<[u8; 6]>(),
        speed in any::<u64>(),
        interface_type in arb_interface_type(),
        ipv4 in proptest::option::of(any::<bool>()),
        ipv6 in proptest::option::of(0u32..4096),
        addresses in proptest::collection::vec(arb_address(), 0..6),
    ) -> InterfaceCandidate {
        let mut candidate = InterfaceCandidate::new(id, MacAddr::new(mac));
        candidate.speed_bps = speed;
        candidate.interface_type = interface_type;
        candidate.supports_ipv4 = ipv4.is_some();
        candidate.supports_ipv6 = ipv6.is_some();
        candidate.ipv4 = ipv4.map(|forwarding_enabled| Ipv4Properties { forwarding_enabled });
        candidate.ipv6 = ipv6.map(|link_index| Ipv6Properties { link_index });
        candidate.unicast_addresses = addresses;
        candidate
    }
}

fn config() -> AnnouncementConfig {
    AnnouncementConfig::new("host01", "Linux 6.8.0, 4 Processors")
}

proptest! {
    #[test]
    fn prop_lldpdu_terminated(candidate in arb_candidate()) {
        let lldpdu = build_tlvs(&candidate, &config()).unwrap();
        prop_assert!(lldpdu.len() >= 2);
        prop_assert_eq!(lldpdu.tlvs().first().map(|t| t.tlv_type()), Some(LldpTlvType::ChassisId));
        prop_assert_eq!(lldpdu.tlvs().last(), Some(&LldpTlv::EndOfLldpdu));
    }

    #[test]
    fn prop_management_addresses_need_link_index(candidate in arb_candidate()) {
        let lldpdu = build_tlvs(&candidate, &config()).unwrap();
        let count = lldpdu
            .tlvs()
            .iter()
            .filter(|t| t.tlv_type() == LldpTlvType::ManagementAddress)
            .count();

        if candidate.ipv6.is_none() {
            prop_assert_eq!(count, 0);
        } else {
            prop_assert_eq!(count, candidate.unicast_addresses.len());
        }
    }

    #[test]
    fn prop_frame_deterministic(candidate in arb_candidate()) {
        let lldpdu = build_tlvs(&candidate, &config()).unwrap();
        let first = build_frame(&candidate, &lldpdu).unwrap().to_bytes();
        let second = build_frame(&candidate, &lldpdu).unwrap().to_bytes();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first[0..6], &[0x01, 0x80, 0xC2, 0x00, 0x00, 0x0E]);
        prop_assert_eq!(&first[6..12], candidate.mac_address.as_bytes());
        prop_assert_eq!(&first[12..14], &[0x88, 0xCC]);
    }

    #[test]
    fn prop_frame_fits_mtu(
        mut candidate in arb_candidate(),
        addresses in proptest::collection::vec(arb_address(), 0..120),
        description in "[ -~]{0,300}",
    ) {
        candidate.unicast_addresses = addresses;
        candidate.description = description;

        let lldpdu = build_tlvs(&candidate, &config()).unwrap();
        let frame = build_frame(&candidate, &lldpdu).unwrap();

        prop_assert!(frame.fits_mtu());
        prop_assert!(frame.to_bytes().len() <= 1514);
    }
}

#[test]
fn test_no_ip_support_means_no_management_address() {
    let mut candidate = InterfaceCandidate::new("eth0", MacAddr::new([2, 0, 0, 0, 0, 1]));
    candidate.unicast_addresses = vec![IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))];

    let lldpdu = build_tlvs(&candidate, &config()).unwrap();
    assert!(lldpdu
        .tlvs()
        .iter()
        .all(|t| t.tlv_type() != LldpTlvType::ManagementAddress));
}
