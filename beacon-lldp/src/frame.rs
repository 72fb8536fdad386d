//! Ethernet framing of an LLDPDU

use crate::tlv::Lldpdu;
use beacon_core::{InterfaceCandidate, Result};
use beacon_packet::{EtherType, EthernetFrame, MacAddress};

/// LLDP multicast MAC address (nearest bridge)
pub const LLDP_MULTICAST_MAC: [u8; 6] = [0x01, 0x80, 0xC2, 0x00, 0x00, 0x0E];

/// LLDP Ethertype
pub const LLDP_ETHERTYPE: u16 = 0x88CC;

/// Wrap the encoded TLVs in a frame from the interface to the LLDP multicast group
///
/// TLVs are encoded in the order given, without reordering or deduplication.
pub fn build_frame(candidate: &InterfaceCandidate, lldpdu: &Lldpdu) -> Result<EthernetFrame> {
    Ok(EthernetFrame::new(
        MacAddress(LLDP_MULTICAST_MAC),
        MacAddress::from(candidate.mac_address),
        EtherType::LLDP,
        lldpdu.to_bytes()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv::LldpTlv;
    use beacon_core::MacAddr;

    fn candidate() -> InterfaceCandidate {
        InterfaceCandidate::new("eth0", MacAddr::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]))
    }

    fn lldpdu() -> Lldpdu {
        Lldpdu::new(vec![
            LldpTlv::chassis_id_mac([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
            LldpTlv::port_id_local("eth0"),
            LldpTlv::ttl(120),
            LldpTlv::end_of_lldpdu(),
        ])
        .unwrap()
    }

    #[test]
    fn test_frame_header() {
        let frame = build_frame(&candidate(), &lldpdu()).unwrap();
        assert_eq!(frame.destination, MacAddress::LLDP_MULTICAST);
        assert_eq!(frame.source.0, [0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(frame.ethertype.to_u16(), LLDP_ETHERTYPE);
    }

    #[test]
    fn test_payload_is_concatenated_tlvs() {
        let pdu = lldpdu();
        let frame = build_frame(&candidate(), &pdu).unwrap();

        let mut expected = Vec::new();
        for tlv in pdu.tlvs() {
            expected.extend(tlv.to_bytes().unwrap());
        }
        assert_eq!(frame.payload, expected);

        let bytes = frame.to_bytes();
        assert_eq!(&bytes[14..14 + expected.len()], expected.as_slice());
    }

    #[test]
    fn test_deterministic() {
        let a = build_frame(&candidate(), &lldpdu()).unwrap().to_bytes();
        let b = build_frame(&candidate(), &lldpdu()).unwrap().to_bytes();
        assert_eq!(a, b);
    }
}
