//! Address ranges and range-to-CIDR decomposition

use ipspan_core::{codec, AddressFamily, CoreError, Uint128};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;
use tracing::{debug, trace};

use crate::{address_bytes, family_bits, host_mask, ip_addr, CidrBlock, RangeError, Result};

/// Inclusive address range `[first, last]` of a single family
///
/// Construction requires `first < last`; a single-address range is rejected.
/// Values are immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeRepr", into = "RangeRepr")]
pub struct IpRange {
    family: AddressFamily,
    first: Uint128,
    last: Uint128,
}

impl IpRange {
    /// Build a range from two address byte buffers
    ///
    /// # Errors
    ///
    /// * [`CoreError::UnsupportedLength`] if either buffer is not 4 or 16 bytes
    /// * [`RangeError::FamilyMismatch`] if the buffers differ in family
    /// * [`RangeError::InvalidOrder`] unless `first < last`
    ///
    /// # Examples
    ///
    /// ```
    /// use ipspan_cidr::{IpRange, RangeError};
    ///
    /// assert!(IpRange::new(&[10, 0, 0, 0], &[10, 0, 0, 255]).is_ok());
    /// assert_eq!(
    ///     IpRange::new(&[10, 0, 0, 9], &[10, 0, 0, 1]),
    ///     Err(RangeError::InvalidOrder)
    /// );
    /// ```
    pub fn new(first: &[u8], last: &[u8]) -> Result<Self> {
        let (first_value, first_family) = codec::decode(first)?;
        let (last_value, last_family) = codec::decode(last)?;

        if first_family != last_family {
            debug!(first = %first_family, last = %last_family, "rejected range: family mismatch");
            return Err(RangeError::FamilyMismatch {
                first: first_family,
                last: last_family,
            });
        }

        Self::from_values(first_family, first_value, last_value)
    }

    /// Build a range from numeric bounds
    ///
    /// Both bounds must fit the family width.
    pub fn from_values(family: AddressFamily, first: Uint128, last: Uint128) -> Result<Self> {
        let bits = family_bits(family)?;
        if first.bit_len() > bits || last.bit_len() > bits {
            return Err(RangeError::Core(CoreError::Overflow));
        }

        if first >= last {
            debug!(%first, %last, "rejected range: bounds out of order");
            return Err(RangeError::InvalidOrder);
        }

        Ok(Self {
            family,
            first,
            last,
        })
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    /// First address encoded at the family width
    pub fn first(&self) -> Vec<u8> {
        address_bytes(self.first, self.family)
    }

    /// Last address encoded at the family width
    pub fn last(&self) -> Vec<u8> {
        address_bytes(self.last, self.family)
    }

    pub fn first_value(&self) -> Uint128 {
        self.first
    }

    pub fn last_value(&self) -> Uint128 {
        self.last
    }

    /// Number of addresses in the range
    ///
    /// `None` only when the range spans all 2^128 IPv6 addresses.
    pub fn size(&self) -> Option<Uint128> {
        (self.last - self.first).checked_add(Uint128::ONE)
    }

    /// Check if an address buffer falls within the range (bounds inclusive)
    ///
    /// # Errors
    ///
    /// [`CoreError::UnsupportedLength`] unless `addr` is 4 or 16 bytes.
    pub fn contains(&self, addr: &[u8]) -> Result<bool> {
        let (value, _) = codec::decode(addr)?;
        Ok(self.contains_value(value))
    }

    /// Check if a numeric address falls within the range (bounds inclusive)
    pub fn contains_value(&self, value: Uint128) -> bool {
        self.first <= value && value <= self.last
    }

    /// Iterate over the minimal ascending list of CIDR blocks covering the range
    pub fn blocks(&self) -> CidrBlocks {
        CidrBlocks::new(*self)
    }

    /// Minimal ascending list of CIDR blocks whose union is exactly the range
    ///
    /// Each step takes the largest block aligned at the cursor that does not
    /// run past the last address.
    pub fn to_cidr_blocks(&self) -> Vec<CidrBlock> {
        self.blocks().collect()
    }

    fn bits(&self) -> u32 {
        match self.family {
            AddressFamily::Ipv4 => 32,
            _ => 128,
        }
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            ip_addr(self.first, self.family),
            ip_addr(self.last, self.family)
        )
    }
}

#[derive(Serialize, Deserialize)]
struct RangeRepr {
    family: AddressFamily,
    first: Uint128,
    last: Uint128,
}

impl From<IpRange> for RangeRepr {
    fn from(range: IpRange) -> Self {
        Self {
            family: range.family,
            first: range.first,
            last: range.last,
        }
    }
}

impl TryFrom<RangeRepr> for IpRange {
    type Error = RangeError;

    fn try_from(repr: RangeRepr) -> Result<Self> {
        IpRange::from_values(repr.family, repr.first, repr.last)
    }
}

/// Iterator over the CIDR blocks of an [`IpRange`], lowest first
pub struct CidrBlocks {
    family: AddressFamily,
    bits: u32,
    cursor: Uint128,
    last: Uint128,
    done: bool,
}

impl CidrBlocks {
    fn new(range: IpRange) -> Self {
        Self {
            family: range.family,
            bits: range.bits(),
            cursor: range.first,
            last: range.last,
            done: false,
        }
    }

    /// Whether the block of `2^k` addresses at the cursor ends at or before `last`
    fn fits(&self, k: u32) -> bool {
        self.cursor
            .checked_add(host_mask(k))
            .map_or(false, |end| end <= self.last)
    }
}

impl Iterator for CidrBlocks {
    type Item = CidrBlock;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Zero has 128 trailing zeros, so it is aligned to any block the family allows.
        let max_k = self.cursor.trailing_zeros().min(self.bits);
        let k = (0..=max_k).rev().find(|&k| self.fits(k)).unwrap_or(0);

        let block = CidrBlock::aligned(self.cursor, (self.bits - k) as u8, self.family);
        trace!(%block, "emitted CIDR block");

        let end = self.cursor + host_mask(k);
        // Stop on reaching `last` directly; end + 1 would wrap when last is the maximum.
        if end >= self.last {
            self.done = true;
        } else {
            self.cursor = end + Uint128::ONE;
        }

        Some(block)
    }
}

impl FusedIterator for CidrBlocks {}
