//! Command results and their output formats
//!
//! Every command produces a report that can be printed as a human-readable
//! table, JSON, or CSV.

use anyhow::Result;
use colored::Colorize;
use ipspan_cidr::{CidrBlock, IpRange};
use ipspan_core::{AddressFamily, Uint128};
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::OutputFormat;

/// A printable command result
pub trait Report: Serialize {
    fn title(&self) -> &'static str;

    /// Label / value pairs for the human view
    fn fields(&self) -> Vec<(&'static str, String)>;

    fn csv_header(&self) -> Vec<&'static str>;

    fn csv_rows(&self) -> Vec<Vec<String>>;
}

pub fn print_report<R: Report>(report: &R, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => print_human(report),
        OutputFormat::Json => print_json(report, true)?,
        OutputFormat::JsonCompact => print_json(report, false)?,
        OutputFormat::Csv => print_csv(report)?,
    }
    Ok(())
}

fn print_human<R: Report>(report: &R) {
    println!();
    println!("{}", report.title().bold().cyan());
    println!("{}", "─".repeat(50).dimmed());
    for (label, value) in report.fields() {
        println!("{:>15}: {}", label.bold(), value);
    }
    println!();
}

fn print_json<R: Report>(report: &R, pretty: bool) -> Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", serde_json::to_string(report)?);
    }
    Ok(())
}

fn print_csv<R: Report>(report: &R) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(report.csv_header())?;
    for row in report.csv_rows() {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render a 4- or 16-byte buffer in standard text form
pub fn format_addr(bytes: &[u8]) -> String {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        return Ipv4Addr::from(octets).to_string();
    }

    if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        return Ipv6Addr::from(octets).to_string();
    }

    format!("{:02x?}", bytes)
}

pub fn octets(addr: IpAddr) -> Vec<u8> {
    match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

fn size_text(size: Option<Uint128>) -> String {
    size.map_or_else(|| "2^128".to_string(), |s| s.to_string())
}

#[derive(Debug, Serialize)]
pub struct BlockRow {
    pub cidr: String,
    pub network: String,
    pub broadcast: String,
    pub prefix_len: u8,
    pub size: Option<Uint128>,
}

impl From<&CidrBlock> for BlockRow {
    fn from(block: &CidrBlock) -> Self {
        Self {
            cidr: block.to_string(),
            network: format_addr(&block.network_bytes()),
            broadcast: format_addr(&block.broadcast_bytes()),
            prefix_len: block.prefix_len(),
            size: block.size(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlocksReport {
    pub range: String,
    pub family: AddressFamily,
    pub addresses: Option<Uint128>,
    pub blocks: Vec<BlockRow>,
}

impl BlocksReport {
    pub fn new(range: &IpRange) -> Self {
        Self {
            range: range.to_string(),
            family: range.family(),
            addresses: range.size(),
            blocks: range.blocks().map(|b| BlockRow::from(&b)).collect(),
        }
    }
}

impl Report for BlocksReport {
    fn title(&self) -> &'static str {
        "Range Decomposition"
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Range", self.range.clone()),
            ("Family", self.family.to_string()),
            ("Addresses", size_text(self.addresses)),
            ("Blocks", self.blocks.len().to_string()),
        ];
        for row in &self.blocks {
            fields.push(("CIDR", row.cidr.green().to_string()));
        }
        fields
    }

    fn csv_header(&self) -> Vec<&'static str> {
        vec!["cidr", "network", "broadcast", "prefix_len", "size"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.blocks
            .iter()
            .map(|row| {
                vec![
                    row.cidr.clone(),
                    row.network.clone(),
                    row.broadcast.clone(),
                    row.prefix_len.to_string(),
                    size_text(row.size),
                ]
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct ContainsReport {
    pub range: String,
    pub address: String,
    pub contained: bool,
}

impl Report for ContainsReport {
    fn title(&self) -> &'static str {
        "Range Membership"
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let verdict = if self.contained {
            "yes".green().to_string()
        } else {
            "no".red().to_string()
        };

        vec![
            ("Range", self.range.clone()),
            ("Address", self.address.clone()),
            ("Contained", verdict),
        ]
    }

    fn csv_header(&self) -> Vec<&'static str> {
        vec!["range", "address", "contained"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.range.clone(),
            self.address.clone(),
            self.contained.to_string(),
        ]]
    }
}

#[derive(Debug, Serialize)]
pub struct DecimalReport {
    pub address: String,
    pub family: AddressFamily,
    pub decimal: String,
}

impl Report for DecimalReport {
    fn title(&self) -> &'static str {
        "Decimal Notation"
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Address", self.address.clone()),
            ("Family", self.family.to_string()),
            ("Decimal", self.decimal.green().to_string()),
        ]
    }

    fn csv_header(&self) -> Vec<&'static str> {
        vec!["address", "family", "decimal"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.address.clone(),
            self.family.to_string(),
            self.decimal.clone(),
        ]]
    }
}

#[derive(Debug, Serialize)]
pub struct SubnetReport {
    pub cidr: String,
    pub family: AddressFamily,
    pub network: String,
    pub broadcast: String,
    pub mask: String,
    pub size: Option<Uint128>,
}

impl SubnetReport {
    pub fn new(block: &CidrBlock) -> Self {
        Self {
            cidr: block.to_string(),
            family: block.family(),
            network: format_addr(&block.network_bytes()),
            broadcast: format_addr(&block.broadcast_bytes()),
            mask: format_addr(&block.mask_bytes()),
            size: block.size(),
        }
    }
}

impl Report for SubnetReport {
    fn title(&self) -> &'static str {
        "Subnet"
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("CIDR", self.cidr.clone()),
            ("Family", self.family.to_string()),
            ("Network", self.network.clone()),
            ("Broadcast", self.broadcast.green().to_string()),
            ("Mask", self.mask.clone()),
            ("Addresses", size_text(self.size)),
        ]
    }

    fn csv_header(&self) -> Vec<&'static str> {
        vec!["cidr", "network", "broadcast", "mask", "size"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.cidr.clone(),
            self.network.clone(),
            self.broadcast.clone(),
            self.mask.clone(),
            size_text(self.size),
        ]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_addr() {
        assert_eq!(format_addr(&[10, 0, 0, 1]), "10.0.0.1");

        let mut v6 = [0u8; 16];
        v6[15] = 1;
        assert_eq!(format_addr(&v6), "::1");
        assert_eq!(format_addr(&[1, 2]), "[01, 02]");
    }

    #[test]
    fn test_blocks_report() {
        let range = IpRange::new(&[192, 168, 0, 100], &[192, 168, 0, 199]).unwrap();
        let report = BlocksReport::new(&range);

        assert_eq!(report.blocks.len(), 5);
        assert_eq!(report.addresses, Some(Uint128::from(100u64)));
        assert_eq!(report.blocks[0].network, "192.168.0.100");
        assert_eq!(report.blocks[0].broadcast, "192.168.0.103");
        assert_eq!(report.csv_rows().len(), 5);
        assert_eq!(report.csv_rows()[4][0], "192.168.0.192/29");
    }

    #[test]
    fn test_blocks_report_json() {
        let range = IpRange::new(&[10, 0, 0, 0], &[10, 0, 0, 255]).unwrap();
        let json = serde_json::to_value(BlocksReport::new(&range)).unwrap();

        assert_eq!(json["family"], "ipv4");
        assert_eq!(json["addresses"], "256");
        assert_eq!(json["blocks"][0]["cidr"], "10.0.0.0/24");
        assert_eq!(json["blocks"][0]["size"], "256");
    }

    #[test]
    fn test_subnet_report() {
        let block = CidrBlock::from_bytes(&[192, 168, 1, 7], 24).unwrap();
        let report = SubnetReport::new(&block);

        assert_eq!(report.cidr, "192.168.1.0/24");
        assert_eq!(report.broadcast, "192.168.1.255");
        assert_eq!(report.mask, "255.255.255.0");
        assert_eq!(report.size, Some(Uint128::from(256u64)));
    }

    #[test]
    fn test_size_text_full_ipv6() {
        assert_eq!(size_text(None), "2^128");
        assert_eq!(size_text(Some(Uint128::ONE)), "1");
    }
}
