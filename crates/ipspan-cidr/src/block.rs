//! CIDR block representation and subnet arithmetic

use ipspan_core::{codec, AddressFamily, Uint128};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{address_bytes, family_bits, host_mask, ip_addr, RangeError, Result};

/// CIDR block: an aligned power-of-two run of addresses
///
/// The network address always has every bit below the prefix cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BlockRepr", into = "BlockRepr")]
pub struct CidrBlock {
    family: AddressFamily,
    network: Uint128,
    prefix_len: u8,
}

impl CidrBlock {
    /// Create a block from any address inside it and a prefix length
    ///
    /// Host bits of `addr` are masked off, so the result is always aligned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ipspan_cidr::CidrBlock;
    /// use ipspan_core::{AddressFamily, Uint128};
    ///
    /// let block = CidrBlock::new(Uint128::from(0xc0a8_0123u64), 24, AddressFamily::Ipv4).unwrap();
    /// assert_eq!(block.to_string(), "192.168.1.0/24");
    /// assert!(CidrBlock::new(Uint128::ZERO, 33, AddressFamily::Ipv4).is_err());
    /// ```
    pub fn new(addr: Uint128, prefix_len: u8, family: AddressFamily) -> Result<Self> {
        let bits = family_bits(family)?;
        if u32::from(prefix_len) > bits {
            return Err(RangeError::InvalidPrefixLength {
                prefix_len,
                max: bits,
            });
        }

        let mask = host_mask(bits) & !host_mask(bits - u32::from(prefix_len));

        Ok(Self {
            family,
            network: addr & mask,
            prefix_len,
        })
    }

    /// Create a block from a 4- or 16-byte address buffer and a prefix length
    pub fn from_bytes(addr: &[u8], prefix_len: u8) -> Result<Self> {
        let (value, family) = codec::decode(addr)?;
        Self::new(value, prefix_len, family)
    }

    /// Block whose base is already aligned to `prefix_len`
    pub(crate) fn aligned(network: Uint128, prefix_len: u8, family: AddressFamily) -> Self {
        Self {
            family,
            network,
            prefix_len,
        }
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Number of host bits below the prefix
    pub fn host_bits(&self) -> u32 {
        self.bits() - u32::from(self.prefix_len)
    }

    /// Network (first) address as a number
    pub fn network(&self) -> Uint128 {
        self.network
    }

    /// Broadcast (last) address as a number
    pub fn broadcast(&self) -> Uint128 {
        self.network | host_mask(self.host_bits())
    }

    /// Network mask within the family width
    pub fn mask(&self) -> Uint128 {
        host_mask(self.bits()) & !host_mask(self.host_bits())
    }

    /// Network address encoded at the family width
    pub fn network_bytes(&self) -> Vec<u8> {
        address_bytes(self.network, self.family)
    }

    /// Broadcast address encoded at the family width
    pub fn broadcast_bytes(&self) -> Vec<u8> {
        address_bytes(self.broadcast(), self.family)
    }

    /// Network mask encoded at the family width
    pub fn mask_bytes(&self) -> Vec<u8> {
        address_bytes(self.mask(), self.family)
    }

    /// Number of addresses in the block
    ///
    /// `None` only for an IPv6 `/0`, whose 2^128 addresses do not fit.
    pub fn size(&self) -> Option<Uint128> {
        Uint128::pow2(self.host_bits()).ok()
    }

    /// Check if a numeric address is in this block
    pub fn contains(&self, value: Uint128) -> bool {
        value.bit_len() <= self.bits() && (value & self.mask()) == self.network
    }

    fn bits(&self) -> u32 {
        match self.family {
            AddressFamily::Ipv4 => 32,
            _ => 128,
        }
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", ip_addr(self.network, self.family), self.prefix_len)
    }
}

#[derive(Serialize, Deserialize)]
struct BlockRepr {
    family: AddressFamily,
    network: Uint128,
    prefix_len: u8,
}

impl From<CidrBlock> for BlockRepr {
    fn from(block: CidrBlock) -> Self {
        Self {
            family: block.family,
            network: block.network,
            prefix_len: block.prefix_len,
        }
    }
}

impl TryFrom<BlockRepr> for CidrBlock {
    type Error = RangeError;

    fn try_from(repr: BlockRepr) -> Result<Self> {
        CidrBlock::new(repr.network, repr.prefix_len, repr.family)
    }
}

/// Network address of `addr` under `mask`
///
/// Both buffers must be the same length, 4 or 16 bytes.
pub fn network_addr(addr: &[u8], mask: &[u8]) -> Result<Vec<u8>> {
    let (addr, mask, family) = decode_pair(addr, mask)?;
    Ok(address_bytes(addr & mask, family))
}

/// Broadcast (last) address of `addr` under `mask`
///
/// ```
/// use ipspan_cidr::broadcast_addr;
///
/// let last = broadcast_addr(&[192, 168, 1, 7], &[255, 255, 255, 0]).unwrap();
/// assert_eq!(last, vec![192, 168, 1, 255]);
/// ```
pub fn broadcast_addr(addr: &[u8], mask: &[u8]) -> Result<Vec<u8>> {
    let (addr, mask, family) = decode_pair(addr, mask)?;
    Ok(address_bytes(addr | !mask, family))
}

fn decode_pair(addr: &[u8], mask: &[u8]) -> Result<(Uint128, Uint128, AddressFamily)> {
    if addr.len() != mask.len() {
        return Err(RangeError::MaskLengthMismatch {
            address: addr.len(),
            mask: mask.len(),
        });
    }

    let (addr, family) = codec::decode(addr)?;
    let (mask, _) = codec::decode(mask)?;
    Ok((addr, mask, family))
}
