//! Address byte codec
//!
//! Maps [`Uint128`] values to and from big-endian address buffers of exactly
//! 4 bytes (IPv4) or 16 bytes (IPv6). IPv4 values live in the low 32 bits.
//!
//! # Examples
//!
//! ```
//! use ipspan_core::codec;
//! use ipspan_core::AddressFamily;
//!
//! let (value, family) = codec::decode(&[10, 0, 0, 1]).unwrap();
//! assert_eq!(family, AddressFamily::Ipv4);
//! assert_eq!(codec::encode(value, family).unwrap(), vec![10, 0, 0, 1]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CoreError, Result, Uint128};

/// Address family, derived solely from a buffer length
///
/// `Unknown` is a valid answer to "what family is this buffer?" but is
/// rejected wherever a concrete byte width is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    /// 4-byte addresses
    #[serde(rename = "ipv4")]
    Ipv4,
    /// 16-byte addresses
    #[serde(rename = "ipv6")]
    Ipv6,
    #[serde(rename = "unknown")]
    Unknown,
}

impl AddressFamily {
    /// Family for a buffer of `len` bytes
    pub const fn from_len(len: usize) -> Self {
        match len {
            4 => Self::Ipv4,
            16 => Self::Ipv6,
            _ => Self::Unknown,
        }
    }

    /// Address width in bytes, `None` for `Unknown`
    pub const fn byte_len(self) -> Option<usize> {
        match self {
            Self::Ipv4 => Some(4),
            Self::Ipv6 => Some(16),
            Self::Unknown => None,
        }
    }

    /// Address width in bits, `None` for `Unknown`
    pub const fn bits(self) -> Option<u32> {
        match self {
            Self::Ipv4 => Some(32),
            Self::Ipv6 => Some(128),
            Self::Unknown => None,
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4 => write!(f, "IPv4"),
            Self::Ipv6 => write!(f, "IPv6"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Decode an address buffer into its numeric value and family
///
/// # Errors
///
/// [`CoreError::UnsupportedLength`] unless `buf` is 4 or 16 bytes long.
pub fn decode(buf: &[u8]) -> Result<(Uint128, AddressFamily)> {
    let family = AddressFamily::from_len(buf.len());
    if !family.is_known() {
        return Err(CoreError::UnsupportedLength(buf.len()));
    }

    Ok((Uint128::from_bytes(buf)?, family))
}

/// Encode `value` as an address buffer of the family's width
///
/// IPv4 keeps only the low 32 bits of `value`.
///
/// # Errors
///
/// [`CoreError::UnsupportedFamily`] for [`AddressFamily::Unknown`].
pub fn encode(value: Uint128, family: AddressFamily) -> Result<Vec<u8>> {
    let width = family.byte_len().ok_or(CoreError::UnsupportedFamily)?;
    Ok(value.to_bytes()[16 - width..].to_vec())
}

/// Decimal notation of an address buffer
///
/// ```
/// use ipspan_core::codec;
///
/// assert_eq!(codec::decimal_string(&[192, 168, 0, 1]).unwrap(), "3232235521");
/// ```
pub fn decimal_string(buf: &[u8]) -> Result<String> {
    let (value, _) = decode(buf)?;
    Ok(value.to_decimal_string())
}

/// Address buffer of the given family holding the decimal value `s`
///
/// # Errors
///
/// * [`CoreError::UnsupportedFamily`] for [`AddressFamily::Unknown`]
/// * [`CoreError::InvalidFormat`] if `s` is not a decimal literal
/// * [`CoreError::Overflow`] if the value needs more bits than the family has
pub fn parse_decimal(s: &str, family: AddressFamily) -> Result<Vec<u8>> {
    let bits = family.bits().ok_or(CoreError::UnsupportedFamily)?;
    let value = Uint128::from_decimal_str(s)?;
    if value.bit_len() > bits {
        return Err(CoreError::Overflow);
    }

    encode(value, family)
}
