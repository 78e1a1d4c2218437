// SPDX-License-Identifier: Apache-2.0
// Copyright Flowgate Authors

//! IPv4 address type and manipulation.

use crate::parse::{DeParse, DeParseError, LengthError, Parse, ParseError};
use core::convert::Infallible;
use core::fmt::{Display, Formatter};
use core::num::NonZero;
use core::str::FromStr;

/// An IPv4 address.
///
/// `Ipv4Addr` is a transparent wrapper around the raw `u32` form of the
/// address, stored host-native and rendered as four big-endian octets
/// wherever bytes are exposed. The wrapper is immutable: every conversion
/// returns a new value, and equality and hashing are functions of the raw
/// value alone, so the type is directly usable as a map key.
///
/// Ordering follows the unsigned raw value, so `255.255.255.255` sorts
/// after every other address.
#[must_use]
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ipv4Addr(u32);

/// Errors which can occur when constructing an [`Ipv4Addr`] from a byte
/// slice of the wrong length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid byte slice length for ipv4 address: expected 4 bytes, got {actual}")]
#[must_use]
pub struct AddrLengthError {
    /// The length of the rejected slice.
    pub actual: usize,
}

/// Errors which can occur when parsing dotted-decimal text as an
/// [`Ipv4Addr`].
///
/// Each variant carries the rejected input so callers can report exactly
/// which string failed and why.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[must_use]
pub enum AddrParseError {
    /// The input does not have exactly four `.`-separated octet groups.
    #[error("ipv4 address not well formed: '{0}' must have exactly four dot-separated octets")]
    GroupCount(String),
    /// An octet group is empty (leading, trailing, or doubled dot).
    #[error("ipv4 address not well formed: '{0}' contains an empty octet")]
    EmptyGroup(String),
    /// An octet group contains a character other than an ASCII digit.
    #[error("ipv4 address not well formed: '{0}' contains a non-decimal octet")]
    NotDecimal(String),
    /// An octet group has a redundant leading zero.
    #[error("ipv4 address not well formed: '{0}' contains an octet with a leading zero")]
    LeadingZero(String),
    /// An octet group exceeds 255.
    #[error("ipv4 address not well formed: '{0}' contains an octet greater than 255")]
    OctetOutOfRange(String),
}

impl Ipv4Addr {
    /// The number of bytes an [`Ipv4Addr`] occupies on the wire.
    #[allow(unsafe_code)] // safe due to const eval
    pub const WIRE_LEN: NonZero<usize> = unsafe { NonZero::new_unchecked(4) };

    /// The unspecified address (`0.0.0.0`).
    pub const UNSPECIFIED: Ipv4Addr = Ipv4Addr(0);

    /// The broadcast address (`255.255.255.255`).
    pub const BROADCAST: Ipv4Addr = Ipv4Addr(u32::MAX);

    /// Create an [`Ipv4Addr`] from its raw `u32` form.
    ///
    /// Every bit pattern is a legal address; this constructor cannot fail.
    pub const fn new(raw: u32) -> Ipv4Addr {
        Ipv4Addr(raw)
    }

    /// Create an [`Ipv4Addr`] from four octets in network order.
    ///
    /// Octet 0 becomes the most significant byte of the raw value.
    pub const fn from_octets(octets: [u8; 4]) -> Ipv4Addr {
        Ipv4Addr(u32::from_be_bytes(octets))
    }

    /// Create an [`Ipv4Addr`] from a slice of exactly four octets in
    /// network order.
    ///
    /// # Errors
    ///
    /// Returns an [`AddrLengthError`] reporting the length found if
    /// `slice` is not exactly four bytes long.
    #[tracing::instrument(level = "trace")]
    pub fn from_octet_slice(slice: &[u8]) -> Result<Ipv4Addr, AddrLengthError> {
        match <[u8; 4]>::try_from(slice) {
            Ok(octets) => Ok(Ipv4Addr::from_octets(octets)),
            Err(_) => Err(AddrLengthError {
                actual: slice.len(),
            }),
        }
    }

    /// The raw `u32` form of the address.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The four octets of the address in network order.
    #[must_use]
    pub const fn octets(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl From<u32> for Ipv4Addr {
    fn from(raw: u32) -> Ipv4Addr {
        Ipv4Addr::new(raw)
    }
}

impl From<Ipv4Addr> for u32 {
    fn from(addr: Ipv4Addr) -> u32 {
        addr.as_u32()
    }
}

impl From<[u8; 4]> for Ipv4Addr {
    fn from(octets: [u8; 4]) -> Ipv4Addr {
        Ipv4Addr::from_octets(octets)
    }
}

impl From<Ipv4Addr> for [u8; 4] {
    fn from(addr: Ipv4Addr) -> [u8; 4] {
        addr.octets()
    }
}

impl TryFrom<&[u8]> for Ipv4Addr {
    type Error = AddrLengthError;

    fn try_from(slice: &[u8]) -> Result<Ipv4Addr, Self::Error> {
        Ipv4Addr::from_octet_slice(slice)
    }
}

impl Display for Ipv4Addr {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

impl FromStr for Ipv4Addr {
    type Err = AddrParseError;

    /// Parse strict dotted-decimal text: exactly four non-empty groups of
    /// ASCII digits in `0..=255`, no signs, no whitespace, no leading
    /// zeros. [`Display`] is the exact inverse for every accepted input.
    #[tracing::instrument(level = "trace")]
    fn from_str(s: &str) -> Result<Ipv4Addr, AddrParseError> {
        let mut groups = s.split('.');
        let mut raw: u32 = 0;
        for _ in 0..4 {
            let Some(group) = groups.next() else {
                return Err(AddrParseError::GroupCount(s.to_string()));
            };
            if group.is_empty() {
                return Err(AddrParseError::EmptyGroup(s.to_string()));
            }
            if group.bytes().any(|b| !b.is_ascii_digit()) {
                return Err(AddrParseError::NotDecimal(s.to_string()));
            }
            if group.len() > 1 && group.starts_with('0') {
                return Err(AddrParseError::LeadingZero(s.to_string()));
            }
            // more than three digits cannot be <= 255 and would overflow
            // the accumulator below
            if group.len() > 3 {
                return Err(AddrParseError::OctetOutOfRange(s.to_string()));
            }
            let mut octet: u32 = 0;
            for b in group.bytes() {
                octet = octet * 10 + u32::from(b - b'0');
            }
            if octet > 255 {
                return Err(AddrParseError::OctetOutOfRange(s.to_string()));
            }
            raw = (raw << 8) | octet;
        }
        if groups.next().is_some() {
            return Err(AddrParseError::GroupCount(s.to_string()));
        }
        Ok(Ipv4Addr(raw))
    }
}

impl Parse for Ipv4Addr {
    type Error = LengthError;

    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>> {
        let Some(bytes) = buf.get(..Ipv4Addr::WIRE_LEN.get()) else {
            return Err(ParseError::LengthError(LengthError {
                expected: Ipv4Addr::WIRE_LEN,
                actual: buf.len(),
            }));
        };
        let octets = <[u8; 4]>::try_from(bytes).unwrap_or_else(|_| unreachable!());
        Ok((Ipv4Addr::from_octets(octets), Ipv4Addr::WIRE_LEN))
    }
}

impl DeParse for Ipv4Addr {
    type Error = Infallible;

    fn size(&self) -> NonZero<usize> {
        Ipv4Addr::WIRE_LEN
    }

    fn write(&self, buf: &mut [u8]) -> Result<NonZero<usize>, DeParseError<Self::Error>> {
        if buf.len() < self.size().get() {
            return Err(DeParseError::LengthError(LengthError {
                expected: self.size(),
                actual: buf.len(),
            }));
        }
        buf[..self.size().get()].copy_from_slice(&self.octets());
        Ok(self.size())
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use super::Ipv4Addr;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Ipv4Addr {
        fn generate<D: Driver>(driver: &mut D) -> Option<Self> {
            Some(Ipv4Addr::new(driver.produce::<u32>()?))
        }
    }
}
