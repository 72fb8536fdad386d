//! LLDP TLV structures and encoding

use crate::capabilities::LldpCapabilities;
use beacon_core::{Error, Result};
use bytes::{BufMut, BytesMut};
use std::fmt;
use std::net::IpAddr;

/// Maximum value length the 9-bit TLV length field can carry
pub const TLV_MAX_VALUE_LEN: usize = 511;

/// Maximum length of the text TLVs (port/system name/description)
pub const TLV_MAX_TEXT_LEN: usize = 255;

/// LLDP TLV Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LldpTlvType {
    EndOfLldpdu = 0,
    ChassisId = 1,
    PortId = 2,
    Ttl = 3,
    PortDescription = 4,
    SystemName = 5,
    SystemDescription = 6,
    SystemCapabilities = 7,
    ManagementAddress = 8,
}

impl LldpTlvType {
    pub fn name(self) -> &'static str {
        match self {
            LldpTlvType::EndOfLldpdu => "EndOfLldpdu",
            LldpTlvType::ChassisId => "ChassisId",
            LldpTlvType::PortId => "PortId",
            LldpTlvType::Ttl => "TimeToLive",
            LldpTlvType::PortDescription => "PortDescription",
            LldpTlvType::SystemName => "SystemName",
            LldpTlvType::SystemDescription => "SystemDescription",
            LldpTlvType::SystemCapabilities => "SystemCapabilities",
            LldpTlvType::ManagementAddress => "ManagementAddress",
        }
    }
}

/// Chassis ID Subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChassisIdSubtype {
    ChassisComponent = 1,
    InterfaceAlias = 2,
    PortComponent = 3,
    MacAddress = 4,
    NetworkAddress = 5,
    InterfaceName = 6,
    LocallyAssigned = 7,
}

/// Port ID Subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PortIdSubtype {
    InterfaceAlias = 1,
    PortComponent = 2,
    MacAddress = 3,
    NetworkAddress = 4,
    InterfaceName = 5,
    AgentCircuitId = 6,
    LocallyAssigned = 7,
}

/// Interface numbering subtypes of the Management Address TLV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InterfaceNumbering {
    Unknown = 1,
    IfIndex = 2,
    SystemPortNumber = 3,
}

/// Management address carried in a Management Address TLV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementAddress {
    pub address: IpAddr,
    pub interface_subtype: InterfaceNumbering,
    pub interface_number: u32,
    pub oid: Vec<u8>,
}

impl ManagementAddress {
    /// IANA address family number
    pub fn address_family(&self) -> u8 {
        match self.address {
            IpAddr::V4(_) => 1,
            IpAddr::V6(_) => 2,
        }
    }

    fn address_octets(&self) -> Vec<u8> {
        match self.address {
            IpAddr::V4(addr) => addr.octets().to_vec(),
            IpAddr::V6(addr) => addr.octets().to_vec(),
        }
    }

    fn encode_value(&self, buf: &mut BytesMut) {
        let octets = self.address_octets();
        // string length covers the family octet plus the address
        buf.put_u8((octets.len() + 1) as u8);
        buf.put_u8(self.address_family());
        buf.put_slice(&octets);
        buf.put_u8(self.interface_subtype as u8);
        buf.put_u32(self.interface_number);
        buf.put_u8(self.oid.len() as u8);
        buf.put_slice(&self.oid);
    }
}

/// LLDP TLV (Type-Length-Value)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LldpTlv {
    ChassisId {
        subtype: ChassisIdSubtype,
        id: Vec<u8>,
    },
    PortId {
        subtype: PortIdSubtype,
        id: Vec<u8>,
    },
    TimeToLive(u16),
    PortDescription(String),
    SystemName(String),
    SystemDescription(String),
    SystemCapabilities {
        available: LldpCapabilities,
        enabled: LldpCapabilities,
    },
    ManagementAddress(ManagementAddress),
    EndOfLldpdu,
}

impl LldpTlv {
    pub fn chassis_id_mac(mac: [u8; 6]) -> Self {
        LldpTlv::ChassisId {
            subtype: ChassisIdSubtype::MacAddress,
            id: mac.to_vec(),
        }
    }

    pub fn port_id_local(id: &str) -> Self {
        LldpTlv::PortId {
            subtype: PortIdSubtype::LocallyAssigned,
            id: id.as_bytes().to_vec(),
        }
    }

    pub fn ttl(seconds: u16) -> Self {
        LldpTlv::TimeToLive(seconds)
    }

    pub fn port_description(desc: &str) -> Self {
        LldpTlv::PortDescription(truncate_text(desc).to_string())
    }

    pub fn system_name(name: &str) -> Self {
        LldpTlv::SystemName(truncate_text(name).to_string())
    }

    pub fn system_description(desc: &str) -> Self {
        LldpTlv::SystemDescription(truncate_text(desc).to_string())
    }

    pub fn system_capabilities(available: LldpCapabilities, enabled: LldpCapabilities) -> Self {
        LldpTlv::SystemCapabilities { available, enabled }
    }

    pub fn management_address(address: IpAddr, interface_number: u32) -> Self {
        LldpTlv::ManagementAddress(ManagementAddress {
            address,
            interface_subtype: InterfaceNumbering::SystemPortNumber,
            interface_number,
            oid: Vec::new(),
        })
    }

    pub fn end_of_lldpdu() -> Self {
        LldpTlv::EndOfLldpdu
    }

    pub fn tlv_type(&self) -> LldpTlvType {
        match self {
            LldpTlv::ChassisId { .. } => LldpTlvType::ChassisId,
            LldpTlv::PortId { .. } => LldpTlvType::PortId,
            LldpTlv::TimeToLive(_) => LldpTlvType::Ttl,
            LldpTlv::PortDescription(_) => LldpTlvType::PortDescription,
            LldpTlv::SystemName(_) => LldpTlvType::SystemName,
            LldpTlv::SystemDescription(_) => LldpTlvType::SystemDescription,
            LldpTlv::SystemCapabilities { .. } => LldpTlvType::SystemCapabilities,
            LldpTlv::ManagementAddress(_) => LldpTlvType::ManagementAddress,
            LldpTlv::EndOfLldpdu => LldpTlvType::EndOfLldpdu,
        }
    }

    fn encode_value(&self, buf: &mut BytesMut) {
        match self {
            LldpTlv::ChassisId { subtype, id } => {
                buf.put_u8(*subtype as u8);
                buf.put_slice(id);
            }
            LldpTlv::PortId { subtype, id } => {
                buf.put_u8(*subtype as u8);
                buf.put_slice(id);
            }
            LldpTlv::TimeToLive(seconds) => buf.put_u16(*seconds),
            LldpTlv::PortDescription(text)
            | LldpTlv::SystemName(text)
            | LldpTlv::SystemDescription(text) => buf.put_slice(text.as_bytes()),
            LldpTlv::SystemCapabilities { available, enabled } => {
                buf.put_u16(available.bits());
                buf.put_u16(enabled.bits());
            }
            LldpTlv::ManagementAddress(mgmt) => mgmt.encode_value(buf),
            LldpTlv::EndOfLldpdu => {}
        }
    }

    /// Encode TLV to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut value = BytesMut::new();
        self.encode_value(&mut value);

        if value.len() > TLV_MAX_VALUE_LEN {
            return Err(Error::TlvTooLong {
                tlv: self.tlv_type().name(),
                len: value.len(),
                max: TLV_MAX_VALUE_LEN,
            });
        }

        let mut bytes = Vec::with_capacity(2 + value.len());

        // Type (7 bits) | Length (9 bits)
        let type_length = ((self.tlv_type() as u16) << 9) | (value.len() as u16 & 0x1FF);
        bytes.extend_from_slice(&type_length.to_be_bytes());
        bytes.extend_from_slice(&value);

        Ok(bytes)
    }
}

impl fmt::Display for LldpTlv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LldpTlv::ChassisId { subtype, id } => {
                write!(f, "ChassisId({:?}, {})", subtype, hex(id))
            }
            LldpTlv::PortId { subtype, id } => {
                write!(f, "PortId({:?}, {})", subtype, String::from_utf8_lossy(id))
            }
            LldpTlv::TimeToLive(seconds) => write!(f, "TimeToLive({}s)", seconds),
            LldpTlv::PortDescription(text) => write!(f, "PortDescription({:?})", text),
            LldpTlv::SystemName(text) => write!(f, "SystemName({:?})", text),
            LldpTlv::SystemDescription(text) => write!(f, "SystemDescription({:?})", text),
            LldpTlv::SystemCapabilities { available, enabled } => {
                write!(f, "SystemCapabilities({}, enabled {})", available, enabled)
            }
            LldpTlv::ManagementAddress(mgmt) => write!(
                f,
                "ManagementAddress({}, {:?} {})",
                mgmt.address, mgmt.interface_subtype, mgmt.interface_number
            ),
            LldpTlv::EndOfLldpdu => write!(f, "EndOfLldpdu"),
        }
    }
}

/// An ordered, validated TLV sequence
///
/// Never empty, and terminated by exactly one End of LLDPDU TLV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lldpdu {
    tlvs: Vec<LldpTlv>,
}

impl Lldpdu {
    pub fn new(tlvs: Vec<LldpTlv>) -> Result<Self> {
        match tlvs.last() {
            None => return Err(Error::assembly("Couldn't construct LLDP TLVs")),
            Some(LldpTlv::EndOfLldpdu) => {}
            Some(other) => {
                return Err(Error::assembly(format!(
                    "Last TLV must be EndOfLldpdu, found {}",
                    other.tlv_type().name()
                )))
            }
        }

        let terminators = tlvs
            .iter()
            .filter(|tlv| matches!(tlv, LldpTlv::EndOfLldpdu))
            .count();
        if terminators != 1 {
            return Err(Error::assembly(format!(
                "Expected one EndOfLldpdu, found {}",
                terminators
            )));
        }

        Ok(Self { tlvs })
    }

    pub fn tlvs(&self) -> &[LldpTlv] {
        &self.tlvs
    }

    pub fn len(&self) -> usize {
        self.tlvs.len()
    }

    /// Always false, a valid LLDPDU holds at least the terminator
    pub fn is_empty(&self) -> bool {
        self.tlvs.is_empty()
    }

    /// Encode the TLVs in order
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = BytesMut::new();
        for tlv in &self.tlvs {
            bytes.put_slice(&tlv.to_bytes()?);
        }
        Ok(bytes.to_vec())
    }

    pub fn system_name(&self) -> Option<&str> {
        self.tlvs.iter().find_map(|tlv| match tlv {
            LldpTlv::SystemName(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for Lldpdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LLDPDU ({} TLVs)", self.tlvs.len())?;
        for tlv in &self.tlvs {
            writeln!(f, "  {}", tlv)?;
        }
        Ok(())
    }
}

/// Cut text to the TLV maximum on a character boundary
fn truncate_text(text: &str) -> &str {
    if text.len() <= TLV_MAX_TEXT_LEN {
        return text;
    }
    let mut end = TLV_MAX_TEXT_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_tlv_encoding() {
        let bytes = LldpTlv::system_name("TestRouter").to_bytes().unwrap();

        // Type 5 (SystemName), length 10
        assert_eq!(bytes[0], 0x0A); // (5 << 1) = 10
        assert_eq!(bytes[1], 0x0A); // length 10
        assert_eq!(&bytes[2..], b"TestRouter");
    }

    #[test]
    fn test_chassis_id_mac() {
        let bytes = LldpTlv::chassis_id_mac([0x00, 0x11, 0x22, 0x33, 0x44, 0x55])
            .to_bytes()
            .unwrap();
        assert_eq!(
            bytes,
            vec![0x02, 0x07, 0x04, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55]
        );
    }

    #[test]
    fn test_port_id_locally_assigned() {
        let bytes = LldpTlv::port_id_local("eth0").to_bytes().unwrap();
        assert_eq!(bytes, vec![0x04, 0x05, 0x07, b'e', b't', b'h', b'0']);
    }

    #[test]
    fn test_ttl_and_end() {
        assert_eq!(LldpTlv::ttl(120).to_bytes().unwrap(), vec![0x06, 0x02, 0x00, 0x78]);
        assert_eq!(LldpTlv::end_of_lldpdu().to_bytes().unwrap(), vec![0x00, 0x00]);
    }

    #[test]
    fn test_system_capabilities() {
        let tlv = LldpTlv::system_capabilities(
            LldpCapabilities(LldpCapabilities::BRIDGE | LldpCapabilities::ROUTER),
            LldpCapabilities(LldpCapabilities::STATION_ONLY),
        );
        assert_eq!(
            tlv.to_bytes().unwrap(),
            vec![0x0E, 0x04, 0x00, 0x14, 0x00, 0x80]
        );
    }

    #[test]
    fn test_management_address_ipv4() {
        let tlv = LldpTlv::management_address(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10)), 3);
        assert_eq!(
            tlv.to_bytes().unwrap(),
            vec![
                0x10, 0x0C, // type 8, length 12
                0x05, 0x01, 192, 168, 1, 10, // addr len, IPv4, address
                0x03, 0x00, 0x00, 0x00, 0x03, // system port number 3
                0x00, // empty OID
            ]
        );
    }

    #[test]
    fn test_management_address_ipv6() {
        let tlv = LldpTlv::management_address(IpAddr::V6(Ipv6Addr::LOCALHOST), 2);
        let bytes = tlv.to_bytes().unwrap();
        assert_eq!(bytes[1], 24);
        assert_eq!(bytes[2], 17);
        assert_eq!(bytes[3], 2);
        assert_eq!(bytes.len(), 26);
    }

    #[test]
    fn test_text_truncated_on_char_boundary() {
        let long = "é".repeat(200); // 400 octets
        match LldpTlv::system_description(&long) {
            LldpTlv::SystemDescription(text) => {
                assert_eq!(text.len(), 254);
                assert!(text.chars().all(|c| c == 'é'));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_value_too_long() {
        let tlv = LldpTlv::PortId {
            subtype: PortIdSubtype::LocallyAssigned,
            id: vec![b'x'; 600],
        };
        assert!(matches!(tlv.to_bytes(), Err(Error::TlvTooLong { .. })));
    }

    #[test]
    fn test_lldpdu_requires_terminator() {
        assert!(matches!(Lldpdu::new(vec![]), Err(Error::Assembly(_))));
        assert!(matches!(
            Lldpdu::new(vec![LldpTlv::ttl(120)]),
            Err(Error::Assembly(_))
        ));
        assert!(matches!(
            Lldpdu::new(vec![LldpTlv::EndOfLldpdu, LldpTlv::EndOfLldpdu]),
            Err(Error::Assembly(_))
        ));

        let pdu = Lldpdu::new(vec![
            LldpTlv::chassis_id_mac([0; 6]),
            LldpTlv::end_of_lldpdu(),
        ])
        .unwrap();
        assert_eq!(pdu.len(), 2);
        assert_eq!(pdu.to_bytes().unwrap().len(), 9 + 2);
    }
}
