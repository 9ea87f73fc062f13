// crates/edge-image-validation/src/network.rs
// ============================================================================
// Module: Network Address Validator
// Description: IPv4/IPv6 address and CIDR classification.
// Purpose: Decide family and unicast-ness for cluster control-plane addresses.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Pure functions over address and CIDR strings. An address is unicast when it
//! is none of: unspecified, loopback, multicast, link-local, or the IPv4
//! limited broadcast address. IPv4-mapped IPv6 addresses are classified by
//! their embedded IPv4 address.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use thiserror::Error;

// ============================================================================
// SECTION: Address Family
// ============================================================================

/// IP address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// IPv4.
    V4,
    /// IPv6.
    V6,
}

impl AddressFamily {
    /// Returns the family of a parsed address.
    #[must_use]
    pub const fn of(address: IpAddr) -> Self {
        match address {
            IpAddr::V4(_) => Self::V4,
            IpAddr::V6(_) => Self::V6,
        }
    }

    /// Returns the display name of the family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V4 => "IPv4",
            Self::V6 => "IPv6",
        }
    }

    /// Returns the longest valid prefix length for the family.
    #[must_use]
    pub const fn max_prefix(self) -> u8 {
        match self {
            Self::V4 => 32,
            Self::V6 => 128,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Addresses
// ============================================================================

/// Parses an address and checks that it belongs to `family`.
///
/// # Errors
///
/// Returns [`AddressError::InvalidAddress`] when the value does not parse and
/// [`AddressError::FamilyMismatch`] when it parses to the other family.
pub fn validate_address(value: &str, family: AddressFamily) -> Result<IpAddr, AddressError> {
    let address: IpAddr =
        value.parse().map_err(|_| AddressError::InvalidAddress(value.to_string()))?;
    if AddressFamily::of(address) != family {
        return Err(AddressError::FamilyMismatch {
            value: value.to_string(),
            expected: family,
        });
    }
    Ok(address)
}

/// Returns true when the address may serve as a cluster API address.
#[must_use]
pub fn is_unicast(address: IpAddr) -> bool {
    match address.to_canonical() {
        IpAddr::V4(v4) => {
            !(v4.is_unspecified()
                || v4.is_loopback()
                || v4.is_multicast()
                || v4.is_link_local()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            !(v6.is_unspecified()
                || v6.is_loopback()
                || v6.is_multicast()
                || v6.is_unicast_link_local())
        }
    }
}

// ============================================================================
// SECTION: CIDR
// ============================================================================

/// Address block written as `address/prefix`.
///
/// # Invariants
/// - The prefix never exceeds [`AddressFamily::max_prefix`] for the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    /// Address part of the block.
    address: IpAddr,
    /// Prefix length in bits.
    prefix: u8,
}

impl Cidr {
    /// Returns the address part of the block.
    #[must_use]
    pub const fn address(&self) -> IpAddr {
        self.address
    }

    /// Returns the prefix length.
    #[must_use]
    pub const fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Returns the family of the block.
    #[must_use]
    pub const fn family(&self) -> AddressFamily {
        AddressFamily::of(self.address)
    }
}

impl FromStr for Cidr {
    type Err = AddressError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressError::InvalidCidr(value.to_string());
        let (address, prefix) = value.split_once('/').ok_or_else(invalid)?;
        let address: IpAddr = address.parse().map_err(|_| invalid())?;
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
        let max = AddressFamily::of(address).max_prefix();
        if prefix > max {
            return Err(AddressError::PrefixTooLong {
                value: value.to_string(),
                max,
            });
        }
        Ok(Self {
            address,
            prefix,
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Address and CIDR parsing errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The value is not an IP address.
    #[error("'{0}' is not a valid IP address")]
    InvalidAddress(String),
    /// The value is not `address/prefix`.
    #[error("'{0}' is not a valid CIDR block")]
    InvalidCidr(String),
    /// The prefix is longer than the family allows.
    #[error("prefix of '{value}' exceeds {max} bits")]
    PrefixTooLong {
        /// Rejected block.
        value: String,
        /// Longest valid prefix.
        max: u8,
    },
    /// The address belongs to the other family.
    #[error("'{value}' is not an {expected} address")]
    FamilyMismatch {
        /// Rejected address.
        value: String,
        /// Family the caller required.
        expected: AddressFamily,
    },
}

// ============================================================================
// SECTION: Tests
// ============================================================================
