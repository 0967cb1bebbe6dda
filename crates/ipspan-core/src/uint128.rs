//! Fixed-width unsigned 128-bit integer
//!
//! [`Uint128`] keeps its value as two 64-bit halves and propagates carries,
//! borrows and cross-half shifts by hand. Addition and subtraction wrap modulo
//! 2^128; conversions that cannot fit report [`CoreError::Overflow`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Not, Shl, Shr, Sub};
use std::str::FromStr;

use crate::decimal;
use crate::{CoreError, Result};

/// Unsigned 128-bit integer
///
/// The represented value is `hi * 2^64 + lo`. Values are plain `Copy` data;
/// every operation returns a new value.
///
/// # Examples
///
/// ```
/// use ipspan_core::Uint128;
///
/// let x = Uint128::new(0, u64::MAX);
/// assert_eq!(x + Uint128::ONE, Uint128::new(1, 0));
/// assert_eq!(Uint128::ZERO - Uint128::ONE, Uint128::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Uint128 {
    hi: u64,
    lo: u64,
}

impl Uint128 {
    pub const ZERO: Uint128 = Uint128 { hi: 0, lo: 0 };
    pub const ONE: Uint128 = Uint128 { hi: 0, lo: 1 };
    pub const MAX: Uint128 = Uint128 {
        hi: u64::MAX,
        lo: u64::MAX,
    };

    /// Width of the type in bits
    pub const BITS: u32 = 128;

    /// Create a value from its high and low 64-bit halves
    #[inline]
    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// High 64 bits
    #[inline]
    pub const fn hi(&self) -> u64 {
        self.hi
    }

    /// Low 64 bits
    #[inline]
    pub const fn lo(&self) -> u64 {
        self.lo
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.hi == 0 && self.lo == 0
    }

    #[inline]
    pub const fn is_even(&self) -> bool {
        self.lo & 1 == 0
    }

    #[inline]
    pub const fn is_odd(&self) -> bool {
        self.lo & 1 == 1
    }

    /// Interpret `buf` as a big-endian integer of 1 to 16 bytes
    ///
    /// Shorter buffers are zero-extended on the left.
    ///
    /// # Errors
    ///
    /// * [`CoreError::EmptyInput`] if `buf` is empty
    /// * [`CoreError::Overflow`] if `buf` is longer than 16 bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use ipspan_core::Uint128;
    ///
    /// let x = Uint128::from_bytes(&[0x01, 0x00]).unwrap();
    /// assert_eq!(x, Uint128::from(256u64));
    /// assert!(Uint128::from_bytes(&[]).is_err());
    /// ```
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.is_empty() {
            return Err(CoreError::EmptyInput);
        }

        if buf.len() > 16 {
            return Err(CoreError::Overflow);
        }

        let mut padded = [0u8; 16];
        padded[16 - buf.len()..].copy_from_slice(buf);

        Ok(Self::from_be_bytes(padded))
    }

    /// Build a value from exactly 16 big-endian bytes
    pub fn from_be_bytes(bytes: [u8; 16]) -> Self {
        let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);

        Self {
            hi: bytes[..8].iter().fold(0, fold),
            lo: bytes[8..].iter().fold(0, fold),
        }
    }

    /// Big-endian byte representation, always 16 bytes
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut buf = [0u8; 16];
        buf[..8].copy_from_slice(&self.hi.to_be_bytes());
        buf[8..].copy_from_slice(&self.lo.to_be_bytes());
        buf
    }

    /// Parse an unsigned base-10 literal
    ///
    /// Leading zeros are accepted. Overflow is detected digit by digit, so the
    /// input length is never a concern.
    ///
    /// # Errors
    ///
    /// * [`CoreError::InvalidFormat`] if `s` is empty or has a non-digit
    /// * [`CoreError::Overflow`] if the value exceeds `2^128 - 1`
    ///
    /// # Examples
    ///
    /// ```
    /// use ipspan_core::Uint128;
    ///
    /// let max = Uint128::from_decimal_str("340282366920938463463374607431768211455").unwrap();
    /// assert_eq!(max, Uint128::MAX);
    /// assert!(Uint128::from_decimal_str("340282366920938463463374607431768211456").is_err());
    /// ```
    pub fn from_decimal_str(s: &str) -> Result<Self> {
        match decimal::parse(s) {
            (value, None) => Ok(value),
            (_, Some(err)) => Err(err),
        }
    }

    /// Parse like [`Uint128::from_decimal_str`], keeping the partial value
    ///
    /// On overflow the returned value is [`Uint128::MAX`] alongside the error.
    /// On a format error it is [`Uint128::ZERO`]. The value carries no meaning
    /// once an error is reported.
    pub fn parse_decimal_saturating(s: &str) -> (Self, Option<CoreError>) {
        decimal::parse(s)
    }

    /// Canonical decimal digits with no leading zeros
    pub fn to_decimal_string(&self) -> String {
        decimal::format(*self)
    }

    /// Returns `2^n`
    ///
    /// # Errors
    ///
    /// [`CoreError::Overflow`] when `n >= 128`.
    pub fn pow2(n: u32) -> Result<Self> {
        if n >= Self::BITS {
            return Err(CoreError::Overflow);
        }

        Ok(Self::ONE.shift_left(n))
    }

    /// Sum with a flag reporting whether it wrapped past `2^128 - 1`
    pub const fn overflowing_add(self, rhs: Self) -> (Self, bool) {
        let lo = self.lo.wrapping_add(rhs.lo);
        // The low half wrapped iff it came out smaller than where it started.
        let carry = (lo < self.lo) as u64;
        let (hi, o1) = self.hi.overflowing_add(rhs.hi);
        let (hi, o2) = hi.overflowing_add(carry);

        (Self { hi, lo }, o1 || o2)
    }

    /// Difference with a flag reporting whether it wrapped below zero
    pub const fn overflowing_sub(self, rhs: Self) -> (Self, bool) {
        let lo = self.lo.wrapping_sub(rhs.lo);
        let borrow = (lo > self.lo) as u64;
        let (hi, o1) = self.hi.overflowing_sub(rhs.hi);
        let (hi, o2) = hi.overflowing_sub(borrow);

        (Self { hi, lo }, o1 || o2)
    }

    /// Sum modulo `2^128`
    #[inline]
    pub const fn wrapping_add(self, rhs: Self) -> Self {
        self.overflowing_add(rhs).0
    }

    /// Difference modulo `2^128`
    #[inline]
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        self.overflowing_sub(rhs).0
    }

    #[inline]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.overflowing_add(rhs) {
            (sum, false) => Some(sum),
            (_, true) => None,
        }
    }

    #[inline]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.overflowing_sub(rhs) {
            (diff, false) => Some(diff),
            (_, true) => None,
        }
    }

    #[inline]
    pub const fn bit_and(self, rhs: Self) -> Self {
        Self {
            hi: self.hi & rhs.hi,
            lo: self.lo & rhs.lo,
        }
    }

    #[inline]
    pub const fn bit_or(self, rhs: Self) -> Self {
        Self {
            hi: self.hi | rhs.hi,
            lo: self.lo | rhs.lo,
        }
    }

    #[inline]
    pub const fn bit_xor(self, rhs: Self) -> Self {
        Self {
            hi: self.hi ^ rhs.hi,
            lo: self.lo ^ rhs.lo,
        }
    }

    #[inline]
    pub const fn bit_not(self) -> Self {
        Self {
            hi: !self.hi,
            lo: !self.lo,
        }
    }

    /// Logical left shift; shifting by 128 or more yields zero
    pub const fn shift_left(self, n: u32) -> Self {
        if n >= 128 {
            return Self::ZERO;
        }

        if n >= 64 {
            return Self {
                hi: self.lo << (n - 64),
                lo: 0,
            };
        }

        // A u64 shifted by 64 overflows, so the carried bits need n > 0.
        if n == 0 {
            return self;
        }

        Self {
            hi: (self.hi << n) | (self.lo >> (64 - n)),
            lo: self.lo << n,
        }
    }

    /// Logical right shift; shifting by 128 or more yields zero
    pub const fn shift_right(self, n: u32) -> Self {
        if n >= 128 {
            return Self::ZERO;
        }

        if n >= 64 {
            return Self {
                hi: 0,
                lo: self.hi >> (n - 64),
            };
        }

        if n == 0 {
            return self;
        }

        Self {
            hi: self.hi >> n,
            lo: (self.lo >> n) | (self.hi << (64 - n)),
        }
    }

    /// Minimum number of bits needed to represent the value; 0 for zero
    pub const fn bit_len(&self) -> u32 {
        if self.hi == 0 {
            return u64::BITS - self.lo.leading_zeros();
        }

        64 + u64::BITS - self.hi.leading_zeros()
    }

    #[inline]
    pub const fn leading_zeros(&self) -> u32 {
        Self::BITS - self.bit_len()
    }

    /// Zero bits below the lowest set bit; 128 for zero
    pub const fn trailing_zeros(&self) -> u32 {
        if self.lo == 0 {
            return 64 + self.hi.trailing_zeros();
        }

        self.lo.trailing_zeros()
    }
}

impl Ord for Uint128 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hi.cmp(&other.hi).then(self.lo.cmp(&other.lo))
    }
}

impl PartialOrd for Uint128 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for Uint128 {
    fn from(value: u64) -> Self {
        Self { hi: 0, lo: value }
    }
}

impl From<u32> for Uint128 {
    fn from(value: u32) -> Self {
        Self::from(u64::from(value))
    }
}

impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        Self {
            hi: (value >> 64) as u64,
            lo: value as u64,
        }
    }
}

impl From<Uint128> for u128 {
    fn from(value: Uint128) -> Self {
        (u128::from(value.hi) << 64) | u128::from(value.lo)
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(true, "", &self.to_decimal_string())
    }
}

impl FromStr for Uint128 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_decimal_str(s)
    }
}

impl Serialize for Uint128 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for Uint128 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_decimal_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Wrapping addition, like [`Uint128::wrapping_add`]
impl Add for Uint128 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
}

/// Wrapping subtraction, like [`Uint128::wrapping_sub`]
impl Sub for Uint128 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }
}

impl BitAnd for Uint128 {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.bit_and(rhs)
    }
}

impl BitOr for Uint128 {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.bit_or(rhs)
    }
}

impl BitXor for Uint128 {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        self.bit_xor(rhs)
    }
}

impl Not for Uint128 {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        self.bit_not()
    }
}

impl Shl<u32> for Uint128 {
    type Output = Self;

    #[inline]
    fn shl(self, n: u32) -> Self {
        self.shift_left(n)
    }
}

impl Shr<u32> for Uint128 {
    type Output = Self;

    #[inline]
    fn shr(self, n: u32) -> Self {
        self.shift_right(n)
    }
}
