//! Example: Build and dump the LLDP frame for a sample interface
//!
//! Run with: cargo run --example print_lldpdu

use beacon_core::{AnnouncementConfig, InterfaceCandidate, Ipv4Properties, Ipv6Properties, MacAddr};
use beacon_lldp::{build_frame, build_tlvs};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut candidate = InterfaceCandidate::new("eth0", "52:54:00:12:34:56".parse::<MacAddr>()?);
    candidate.description = "Intel Corporation 82574L Gigabit".to_string();
    candidate.speed_bps = 1_000_000_000;
    candidate.supports_ipv4 = true;
    candidate.supports_ipv6 = true;
    candidate.ipv4 = Some(Ipv4Properties {
        forwarding_enabled: true,
    });
    candidate.ipv6 = Some(Ipv6Properties { link_index: 2 });
    candidate.unicast_addresses = vec!["192.0.2.10".parse()?, "fe80::5054:ff:fe12:3456".parse()?];

    let config = AnnouncementConfig::default();
    let lldpdu = build_tlvs(&candidate, &config)?;

    println!("=== LLDPDU ===\n");
    for tlv in lldpdu.tlvs() {
        println!("  {}", tlv);
    }

    let frame = build_frame(&candidate, &lldpdu)?;
    let bytes = frame.to_bytes();

    println!("\n=== Frame ({} bytes) ===\n", bytes.len());
    for line in bytes.chunks(16) {
        let hex: Vec<String> = line.iter().map(|b| format!("{:02x}", b)).collect();
        println!("  {}", hex.join(" "));
    }

    Ok(())
}
