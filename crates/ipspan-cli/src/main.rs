use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ipspan_cidr::{CidrBlock, IpRange};
use ipspan_core::{codec, AddressFamily};
use std::net::IpAddr;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod report;

use report::{
    format_addr, octets, print_report, BlocksReport, ContainsReport, DecimalReport, SubnetReport,
};

/// Exact IPv4/IPv6 range arithmetic and range-to-CIDR decomposition
#[derive(Parser)]
#[command(name = "ipspan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(
        short,
        long,
        value_enum,
        default_value = "human",
        global = true,
        env = "IPSPAN_OUTPUT"
    )]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompose an address range into the minimal list of CIDR blocks
    Blocks(RangeArgs),
    /// Check whether an address falls within a range
    Contains(ContainsArgs),
    /// Print the decimal notation of an address
    ToDecimal(ToDecimalArgs),
    /// Print the address for a decimal value
    FromDecimal(FromDecimalArgs),
    /// Print network and broadcast addresses of a CIDR block
    Broadcast(BroadcastArgs),
}

#[derive(Parser)]
struct RangeArgs {
    /// First address of the range
    #[arg(value_name = "FIRST")]
    first: IpAddr,

    /// Last address of the range (inclusive)
    #[arg(value_name = "LAST")]
    last: IpAddr,
}

#[derive(Parser)]
struct ContainsArgs {
    #[command(flatten)]
    range: RangeArgs,

    /// Address to test
    #[arg(value_name = "ADDR")]
    addr: IpAddr,
}

#[derive(Parser)]
struct ToDecimalArgs {
    /// IPv4 or IPv6 address
    #[arg(value_name = "ADDR")]
    addr: IpAddr,
}

#[derive(Parser)]
struct FromDecimalArgs {
    /// Unsigned decimal value
    #[arg(value_name = "VALUE")]
    value: String,

    /// Address family of the result
    #[arg(short, long, value_enum, default_value = "v4")]
    family: FamilyArg,
}

#[derive(Parser)]
struct BroadcastArgs {
    /// CIDR block (e.g., 192.168.1.0/24)
    #[arg(value_name = "CIDR")]
    cidr: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable table output
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
    /// CSV output
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FamilyArg {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

impl From<FamilyArg> for AddressFamily {
    fn from(family: FamilyArg) -> Self {
        match family {
            FamilyArg::V4 => AddressFamily::Ipv4,
            FamilyArg::V6 => AddressFamily::Ipv6,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Blocks(args) => handle_blocks(args, cli.output)?,
        Commands::Contains(args) => handle_contains(args, cli.output)?,
        Commands::ToDecimal(args) => handle_to_decimal(args, cli.output)?,
        Commands::FromDecimal(args) => handle_from_decimal(args, cli.output)?,
        Commands::Broadcast(args) => handle_broadcast(args, cli.output)?,
    }

    Ok(())
}

/// Log to stderr, honouring RUST_LOG; `--verbose` defaults to debug
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_range(args: &RangeArgs) -> Result<IpRange> {
    debug!(first = %args.first, last = %args.last, "building range");
    IpRange::new(&octets(args.first), &octets(args.last))
        .with_context(|| format!("invalid range {} - {}", args.first, args.last))
}

fn handle_blocks(args: RangeArgs, format: OutputFormat) -> Result<()> {
    let range = build_range(&args)?;
    let report = BlocksReport::new(&range);
    debug!(blocks = report.blocks.len(), "decomposed range");

    print_report(&report, format)
}

fn handle_contains(args: ContainsArgs, format: OutputFormat) -> Result<()> {
    let range = build_range(&args.range)?;
    let contained = range.contains(&octets(args.addr))?;

    let report = ContainsReport {
        range: range.to_string(),
        address: args.addr.to_string(),
        contained,
    };
    print_report(&report, format)
}

fn handle_to_decimal(args: ToDecimalArgs, format: OutputFormat) -> Result<()> {
    let buf = octets(args.addr);
    let report = DecimalReport {
        address: args.addr.to_string(),
        family: AddressFamily::from_len(buf.len()),
        decimal: codec::decimal_string(&buf)?,
    };
    print_report(&report, format)
}

fn handle_from_decimal(args: FromDecimalArgs, format: OutputFormat) -> Result<()> {
    let family = AddressFamily::from(args.family);
    let buf = codec::parse_decimal(&args.value, family)
        .with_context(|| format!("cannot convert {} to an {} address", args.value, family))?;

    let report = DecimalReport {
        address: format_addr(&buf),
        family,
        decimal: codec::decimal_string(&buf)?,
    };
    print_report(&report, format)
}

fn handle_broadcast(args: BroadcastArgs, format: OutputFormat) -> Result<()> {
    let block = parse_cidr(&args.cidr)?;
    debug!(%block, "parsed CIDR block");

    print_report(&SubnetReport::new(&block), format)
}

fn parse_cidr(text: &str) -> Result<CidrBlock> {
    let (addr, prefix) = text
        .split_once('/')
        .ok_or_else(|| anyhow!("expected format: address/prefix"))?;

    let addr: IpAddr = addr
        .parse()
        .with_context(|| format!("invalid IP address: {}", addr))?;
    let prefix: u8 = prefix
        .parse()
        .with_context(|| format!("invalid prefix: {}", prefix))?;

    Ok(CidrBlock::from_bytes(&octets(addr), prefix)?)
}
