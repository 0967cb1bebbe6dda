//! Address ranges and CIDR blocks
//!
//! Provides utilities for working with IPv4 and IPv6 address ranges:
//! - Build a range from two address byte buffers
//! - Check if an address is in the range
//! - Decompose the range into the minimal list of CIDR blocks
//! - Network / broadcast calculations for a block or an address and mask
//!
//! All arithmetic goes through [`ipspan_core::Uint128`], so IPv4 and IPv6
//! share one code path; the family only decides the byte width on output.
//!
//! # Examples
//!
//! ```
//! use ipspan_cidr::IpRange;
//!
//! let range = IpRange::new(&[192, 168, 0, 100], &[192, 168, 0, 199]).unwrap();
//! assert!(range.contains(&[192, 168, 0, 150]).unwrap());
//!
//! let blocks: Vec<String> = range.to_cidr_blocks().iter().map(|b| b.to_string()).collect();
//! assert_eq!(
//!     blocks,
//!     [
//!         "192.168.0.100/30",
//!         "192.168.0.104/29",
//!         "192.168.0.112/28",
//!         "192.168.0.128/26",
//!         "192.168.0.192/29",
//!     ]
//! );
//! ```

use ipspan_core::{codec, AddressFamily, CoreError, Uint128};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use thiserror::Error;

mod block;
mod range;

pub use block::{broadcast_addr, network_addr, CidrBlock};
pub use range::{CidrBlocks, IpRange};

/// Range and CIDR errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The two bounds decode to different address families
    #[error("Address family mismatch: first is {first}, last is {last}")]
    FamilyMismatch {
        first: AddressFamily,
        last: AddressFamily,
    },

    /// First bound is not strictly below the last bound
    #[error("Invalid range: first address must be below last address")]
    InvalidOrder,

    /// Prefix length exceeds the family width
    #[error("Invalid prefix length: {prefix_len} (must be 0-{max})")]
    InvalidPrefixLength { prefix_len: u8, max: u32 },

    /// Address and mask buffers differ in length
    #[error("Mask length {mask} does not match address length {address}")]
    MaskLengthMismatch { address: usize, mask: usize },

    /// Numeric or codec error
    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, RangeError>;

/// Width of a concrete family in bits
fn family_bits(family: AddressFamily) -> Result<u32> {
    family
        .bits()
        .ok_or(RangeError::Core(CoreError::UnsupportedFamily))
}

/// All-ones in the low `host_bits` bits
fn host_mask(host_bits: u32) -> Uint128 {
    if host_bits >= Uint128::BITS {
        return Uint128::MAX;
    }

    (Uint128::ONE << host_bits) - Uint128::ONE
}

/// Re-encode a value held by a range or block
///
/// Ranges and blocks only ever carry `Ipv4` or `Ipv6`, so the fallback to the
/// full 16 bytes is never taken.
fn address_bytes(value: Uint128, family: AddressFamily) -> Vec<u8> {
    codec::encode(value, family).unwrap_or_else(|_| value.to_bytes().to_vec())
}

/// Standard-library address for display purposes
fn ip_addr(value: Uint128, family: AddressFamily) -> IpAddr {
    match family {
        AddressFamily::Ipv4 => IpAddr::V4(Ipv4Addr::from(value.lo() as u32)),
        _ => IpAddr::V6(Ipv6Addr::from(value.to_bytes())),
    }
}
