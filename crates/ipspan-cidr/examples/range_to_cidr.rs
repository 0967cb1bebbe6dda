//! Range decomposition example
//!
//! Run with: cargo run -p ipspan-cidr --example range_to_cidr

use ipspan_cidr::{broadcast_addr, IpRange};
use std::net::Ipv4Addr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("ipspan - Range Decomposition Example\n");

    let first: Ipv4Addr = "192.168.0.100".parse()?;
    let last: Ipv4Addr = "192.168.0.199".parse()?;
    let range = IpRange::new(&first.octets(), &last.octets())?;

    println!("Range: {}", range);
    println!("─────────────────────────────");
    if let Some(size) = range.size() {
        println!("Addresses:     {}", size);
    }

    println!("\nCIDR blocks:");
    for (i, block) in range.blocks().enumerate() {
        println!("  {}: {}", i + 1, block);
    }

    println!("\nChecking containment:");
    for probe in ["192.168.0.99", "192.168.0.100", "192.168.0.199", "192.168.0.200"] {
        let addr: Ipv4Addr = probe.parse()?;
        println!("{:<15} in range? {}", probe, range.contains(&addr.octets())?);
    }

    let last = broadcast_addr(&[192, 168, 1, 7], &[255, 255, 255, 0])?;
    println!("\nBroadcast of 192.168.1.7/24: {:?}", last);

    Ok(())
}
