//! Core types for ipspan
//!
//! This crate provides the numeric foundation used throughout the ipspan workspace:
//! - [`Uint128`] - Fixed-width unsigned 128-bit integer built from two 64-bit halves
//! - [`AddressFamily`] - IPv4 / IPv6 tag derived from a buffer length
//! - [`codec`] - Conversion between [`Uint128`] values and address byte buffers
//! - [`CoreError`] - Error types
//!
//! ```
//! use ipspan_core::{codec, AddressFamily, Uint128};
//!
//! let (value, family) = codec::decode(&[192, 168, 0, 1]).unwrap();
//! assert_eq!(family, AddressFamily::Ipv4);
//! assert_eq!(value.to_string(), "3232235521");
//! ```

use thiserror::Error;

pub mod codec;
mod decimal;
mod uint128;

pub use codec::AddressFamily;
pub use uint128::Uint128;

/// Error types for numeric and codec operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// Decimal string is empty or contains a non-digit character
    #[error("Invalid decimal string: expected one or more ASCII digits")]
    InvalidFormat,

    /// Value does not fit the target width
    #[error("Numeric overflow: value exceeds the target width")]
    Overflow,

    /// Zero-length byte buffer
    #[error("Empty byte buffer")]
    EmptyInput,

    /// Buffer length is neither 4 nor 16 bytes
    #[error("Unsupported address length: {0} bytes (expected 4 or 16)")]
    UnsupportedLength(usize),

    /// Operation requires a concrete IPv4 or IPv6 family
    #[error("Unsupported address family: IPv4 or IPv6 required")]
    UnsupportedFamily,
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::UnsupportedLength(5);
        assert_eq!(
            format!("{}", err),
            "Unsupported address length: 5 bytes (expected 4 or 16)"
        );

        let err = CoreError::EmptyInput;
        assert_eq!(format!("{}", err), "Empty byte buffer");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(CoreError::Overflow, CoreError::Overflow);
        assert_ne!(CoreError::Overflow, CoreError::InvalidFormat);
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<Uint128> {
            Uint128::pow2(8)
        }

        assert_eq!(returns_result().unwrap(), Uint128::from(256u64));
    }
}
