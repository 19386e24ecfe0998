//! CIDR blocks and mask utilities.
//!
//! Provides [`Block`], a network address with a prefix length, along with
//! free functions for mask, network and broadcast calculations that work for
//! both address families.

use super::address::{ensure_version, Address, IpVersion};
use super::count::AddressCount;
use super::range::AddressRange;
use crate::error::{Result, SubnetError};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// What a constructor does with host bits set below the prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum HostBitsPolicy {
    /// Zero the host bits (`10.0.0.5/24` becomes `10.0.0.0/24`).
    #[default]
    Normalize,
    /// Reject the input with [`SubnetError::InvalidCidrSyntax`].
    Strict,
}

/// Validate a prefix length for the family.
pub fn check_prefix(version: IpVersion, prefix: u32) -> Result<u8> {
    if prefix > version.width() as u32 {
        Err(SubnetError::InvalidPrefix {
            prefix,
            version,
            max: version.width(),
        })
    } else {
        Ok(prefix as u8)
    }
}

/// Low `bits` bits set. `bits` may be 128.
pub fn low_bits(bits: u8) -> u128 {
    if bits >= 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}

/// Host part mask of a prefix (the wildcard bits).
pub fn host_mask(version: IpVersion, prefix: u8) -> u128 {
    low_bits(version.width().saturating_sub(prefix))
}

/// Network mask of a prefix as an integer.
///
/// # Examples
/// ```
/// use subnet_summary::models::{get_cidr_mask, IpVersion};
/// assert_eq!(get_cidr_mask(IpVersion::V4, 24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(version: IpVersion, prefix: u8) -> Result<u128> {
    let prefix = check_prefix(version, prefix as u32)?;
    Ok(version.max_value() & !host_mask(version, prefix))
}

/// Network address of `addr` at `prefix`.
pub fn cut_addr(addr: Address, prefix: u8) -> Result<Address> {
    let mask = get_cidr_mask(addr.version(), prefix)?;
    Ok(Address::from_raw(addr.version(), addr.value() & mask))
}

/// Broadcast (last) address of the block containing `addr` at `prefix`.
pub fn broadcast_addr(addr: Address, prefix: u8) -> Result<Address> {
    let prefix = check_prefix(addr.version(), prefix as u32)?;
    let wildcard = host_mask(addr.version(), prefix);
    Ok(Address::from_raw(addr.version(), addr.value() | wildcard))
}

/// Shortest prefix at which `addr` is a valid network address.
pub fn lo_mask(addr: Address) -> u8 {
    addr.width() - addr.trailing_zeros()
}

/// Netmask of a prefix as an address (`24` -> `255.255.255.0`).
pub fn prefix_to_netmask(version: IpVersion, prefix: u8) -> Result<Address> {
    Ok(Address::from_raw(version, get_cidr_mask(version, prefix)?))
}

/// Prefix length of a contiguous netmask (`255.255.254.0` -> `23`).
pub fn netmask_to_prefix(mask: Address) -> Result<u8> {
    let ones = match mask.version() {
        IpVersion::V4 => (mask.value() as u32).leading_ones() as u8,
        IpVersion::V6 => mask.value().leading_ones() as u8,
    };
    if get_cidr_mask(mask.version(), ones)? != mask.value() {
        return Err(SubnetError::InvalidMask {
            input: mask.to_string(),
        });
    }
    Ok(ones)
}

/// Usable hosts of a prefix: network and broadcast reserved for IPv4 up to
/// /30, both addresses of a /31 usable, a /32 or /128 is one host.
pub fn num_usable_hosts(version: IpVersion, prefix: u8) -> AddressCount {
    let total = AddressCount::power_of_two(version.width().saturating_sub(prefix));
    match version {
        IpVersion::V4 if prefix <= 30 => total.saturating_sub(2),
        _ => total,
    }
}

/// Split CIDR text into the address as written and its prefix length.
///
/// The suffix may be a prefix length or a netmask of the same family
/// (`10.0.0.0/255.255.255.0`). Host bits are left untouched.
pub fn parse_cidr_parts(text: &str) -> Result<(Address, u8)> {
    let trimmed = text.trim();
    let (addr_part, prefix_part) =
        trimmed
            .split_once('/')
            .ok_or_else(|| SubnetError::InvalidCidrSyntax {
                input: trimmed.to_string(),
                reason: "missing '/prefix'".to_string(),
            })?;
    let addr = Address::from_str(addr_part)?;
    let prefix_part = prefix_part.trim();

    if prefix_part.contains('.') || prefix_part.contains(':') {
        let mask = Address::from_str(prefix_part)?;
        ensure_version(addr.version(), mask.version())?;
        return Ok((addr, netmask_to_prefix(mask)?));
    }
    if prefix_part.is_empty() || !prefix_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SubnetError::InvalidCidrSyntax {
            input: trimmed.to_string(),
            reason: format!("bad prefix '{prefix_part}'"),
        });
    }
    // Anything too long for u32 is out of range anyway.
    let prefix: u32 = prefix_part.parse().unwrap_or(u32::MAX);
    Ok((addr, check_prefix(addr.version(), prefix)?))
}

/// A CIDR block. The base address never has host bits set.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Block {
    base: Address,
    prefix: u8,
}

impl Block {
    /// Build a block from an address and prefix length under `policy`.
    pub fn new(addr: Address, prefix: u8, policy: HostBitsPolicy) -> Result<Block> {
        let base = cut_addr(addr, prefix)?;
        if policy == HostBitsPolicy::Strict && base != addr {
            return Err(SubnetError::InvalidCidrSyntax {
                input: format!("{addr}/{prefix}"),
                reason: format!("host bits set, network is {base}/{prefix}"),
            });
        }
        Ok(Block { base, prefix })
    }

    /// Caller guarantees an aligned `base` and a valid prefix.
    pub(crate) fn from_raw(version: IpVersion, base: u128, prefix: u8) -> Block {
        Block {
            base: Address::from_raw(version, base),
            prefix,
        }
    }

    /// Parse `ip/len` (or `ip/netmask`) text.
    pub fn from_cidr_text(text: &str, policy: HostBitsPolicy) -> Result<Block> {
        let (addr, prefix) = parse_cidr_parts(text)?;
        Block::new(addr, prefix, policy).map_err(|e| match e {
            SubnetError::InvalidCidrSyntax { reason, .. } => SubnetError::InvalidCidrSyntax {
                input: text.trim().to_string(),
                reason,
            },
            e => e,
        })
    }

    /// Single-address block (/32 or /128).
    pub fn from_address(addr: Address) -> Block {
        Block {
            base: addr,
            prefix: addr.width(),
        }
    }

    pub fn version(&self) -> IpVersion {
        self.base.version()
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Host bits below the prefix.
    pub fn size_bits(&self) -> u8 {
        self.base.width() - self.prefix
    }

    pub fn network(&self) -> Address {
        self.base
    }

    /// Highest address of the block; the broadcast address for IPv4.
    pub fn broadcast(&self) -> Address {
        Address::from_raw(
            self.version(),
            self.base.value() | low_bits(self.size_bits()),
        )
    }

    /// Same as [`Block::broadcast`], named for IPv6 callers.
    pub fn last(&self) -> Address {
        self.broadcast()
    }

    pub fn netmask(&self) -> Address {
        Address::from_raw(
            self.version(),
            self.version().max_value() & !low_bits(self.size_bits()),
        )
    }

    pub fn wildcard(&self) -> Address {
        Address::from_raw(self.version(), low_bits(self.size_bits()))
    }

    pub fn host_count(&self) -> AddressCount {
        AddressCount::power_of_two(self.size_bits())
    }

    pub fn usable_host_count(&self) -> AddressCount {
        num_usable_hosts(self.version(), self.prefix)
    }

    fn reserves_network_and_broadcast(&self) -> bool {
        self.version() == IpVersion::V4 && self.prefix <= 30
    }

    pub fn first_usable(&self) -> Address {
        if self.reserves_network_and_broadcast() {
            Address::from_raw(self.version(), self.base.value() + 1)
        } else {
            self.base
        }
    }

    pub fn last_usable(&self) -> Address {
        let last = self.broadcast();
        if self.reserves_network_and_broadcast() {
            Address::from_raw(self.version(), last.value() - 1)
        } else {
            last
        }
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.version() == self.version() && addr >= self.base && addr <= self.broadcast()
    }

    pub fn contains_block(&self, other: &Block) -> bool {
        other.prefix >= self.prefix && self.contains(other.base)
    }

    /// CIDR blocks either nest or are disjoint.
    pub fn overlaps(&self, other: &Block) -> bool {
        self.contains_block(other) || other.contains_block(self)
    }

    pub fn to_range(&self) -> AddressRange {
        AddressRange::from_raw(self.version(), self.base.value(), self.broadcast().value())
    }

    /// The following block of the same size, `None` past the end of the space.
    pub fn next_block(&self) -> Option<Block> {
        self.broadcast().succ().map(|base| Block {
            base,
            prefix: self.prefix,
        })
    }

    /// The enclosing block at a shorter `prefix`.
    pub fn supernet(&self, prefix: u8) -> Result<Block> {
        if prefix > self.prefix {
            return Err(SubnetError::InvalidPrefix {
                prefix: prefix as u32,
                version: self.version(),
                max: self.prefix,
            });
        }
        Block::new(self.base, prefix, HostBitsPolicy::Normalize)
    }

    /// Every derived field, as a calculator would show it.
    pub fn info(&self) -> SubnetInfo {
        SubnetInfo {
            cidr: *self,
            version: self.version(),
            network: self.network(),
            broadcast: self.broadcast(),
            netmask: self.netmask(),
            wildcard: self.wildcard(),
            prefix: self.prefix,
            first_usable: self.first_usable(),
            last_usable: self.last_usable(),
            host_count: self.host_count(),
            usable_hosts: self.usable_host_count(),
        }
    }
}

impl FromStr for Block {
    type Err = SubnetError;

    fn from_str(s: &str) -> Result<Block> {
        Block::from_cidr_text(s, HostBitsPolicy::Normalize)
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Block, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Block::from_str(&s).map_err(de::Error::custom)
    }
}

/// Derived properties of one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetInfo {
    pub cidr: Block,
    pub version: IpVersion,
    pub network: Address,
    pub broadcast: Address,
    pub netmask: Address,
    pub wildcard: Address,
    pub prefix: u8,
    pub first_usable: Address,
    pub last_usable: Address,
    pub host_count: AddressCount,
    pub usable_hosts: AddressCount,
}
