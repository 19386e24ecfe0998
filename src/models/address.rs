//! IPv4 and IPv6 addresses as versioned wide integers.
//!
//! Provides [`Address`], a version tag plus a `u128` value, with parsing that
//! tolerates leading zeros, zone suffixes and embedded IPv4 tails, and
//! canonical rendering (dotted decimal for IPv4, RFC 5952 for IPv6).

use crate::error::{Result, SubnetError};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Number of bits in an IPv4 address.
pub const IPV4_BITS: u8 = 32;
/// Number of bits in an IPv6 address.
pub const IPV6_BITS: u8 = 128;

/// Address family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Address width in bits.
    pub const fn width(self) -> u8 {
        match self {
            IpVersion::V4 => IPV4_BITS,
            IpVersion::V6 => IPV6_BITS,
        }
    }

    /// Largest address value of the family.
    pub const fn max_value(self) -> u128 {
        match self {
            IpVersion::V4 => u32::MAX as u128,
            IpVersion::V6 => u128::MAX,
        }
    }
}

impl std::fmt::Display for IpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            IpVersion::V4 => write!(f, "IPv4"),
            IpVersion::V6 => write!(f, "IPv6"),
        }
    }
}

/// An IPv4 or IPv6 address. `value` always fits in the family width.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Address {
    version: IpVersion,
    value: u128,
}

impl Address {
    /// Build an address, `None` when `value` does not fit the family.
    pub fn new(version: IpVersion, value: u128) -> Option<Address> {
        (value <= version.max_value()).then_some(Address { version, value })
    }

    /// Caller guarantees `value <= version.max_value()`.
    pub(crate) const fn from_raw(version: IpVersion, value: u128) -> Address {
        Address { version, value }
    }

    pub const fn v4(value: u32) -> Address {
        Address {
            version: IpVersion::V4,
            value: value as u128,
        }
    }

    pub const fn v6(value: u128) -> Address {
        Address {
            version: IpVersion::V6,
            value,
        }
    }

    /// Parse address text, see [`FromStr`].
    pub fn parse(text: &str) -> Result<Address> {
        text.parse()
    }

    pub fn version(&self) -> IpVersion {
        self.version
    }

    pub fn value(&self) -> u128 {
        self.value
    }

    pub fn width(&self) -> u8 {
        self.version.width()
    }

    pub fn checked_add(self, n: u128) -> Option<Address> {
        self.value
            .checked_add(n)
            .and_then(|v| Address::new(self.version, v))
    }

    pub fn checked_sub(self, n: u128) -> Option<Address> {
        self.value
            .checked_sub(n)
            .map(|v| Address::from_raw(self.version, v))
    }

    /// Next address, `None` at the end of the address space.
    pub fn succ(self) -> Option<Address> {
        self.checked_add(1)
    }

    /// Previous address, `None` at zero.
    pub fn pred(self) -> Option<Address> {
        self.checked_sub(1)
    }

    /// Trailing zero bits, capped at the family width (zero has `width`).
    pub fn trailing_zeros(&self) -> u8 {
        (self.value.trailing_zeros() as u8).min(self.width())
    }

    /// Fail with [`SubnetError::VersionMismatch`] unless both share a family.
    pub fn ensure_same_version(&self, other: &Address) -> Result<()> {
        ensure_version(self.version, other.version)
    }

    /// The IPv4 address carried by an IPv4-mapped IPv6 address (`::ffff:a.b.c.d`).
    pub fn to_ipv4_mapped_v4(&self) -> Option<Address> {
        match self.version {
            IpVersion::V6 if self.value >> 32 == 0xffff => {
                Some(Address::v4(self.value as u32))
            }
            _ => None,
        }
    }

    /// Canonical text: dotted decimal or RFC 5952.
    pub fn to_canonical(&self) -> String {
        match self.version {
            IpVersion::V4 => Ipv4Addr::from(self.value as u32).to_string(),
            IpVersion::V6 => format_v6(self.value),
        }
    }

    pub fn to_ip_addr(&self) -> IpAddr {
        match self.version {
            IpVersion::V4 => IpAddr::V4(Ipv4Addr::from(self.value as u32)),
            IpVersion::V6 => IpAddr::V6(Ipv6Addr::from(self.value)),
        }
    }
}

pub(crate) fn ensure_version(left: IpVersion, right: IpVersion) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(SubnetError::VersionMismatch { left, right })
    }
}

impl FromStr for Address {
    type Err = SubnetError;

    /// Accepts `10.0.0.1`, `010.000.000.001`, `2001:db8::1`,
    /// `fe80::1%eth0` and `::ffff:192.0.2.1`.
    fn from_str(s: &str) -> Result<Address> {
        let text = s.trim();
        if text.is_empty() {
            return Err(invalid_address(s, ""));
        }
        if text.contains(':') {
            parse_v6(s, text).map(Address::v6)
        } else {
            parse_v4(s, text).map(Address::v4)
        }
    }
}

fn invalid_address(input: &str, token: &str) -> SubnetError {
    SubnetError::InvalidAddressSyntax {
        input: input.trim().to_string(),
        token: token.to_string(),
    }
}

fn parse_v4(input: &str, text: &str) -> Result<u32> {
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 4 {
        return Err(invalid_address(input, text));
    }
    let mut value: u32 = 0;
    for part in parts {
        // Leading zeros are decimal, never octal.
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid_address(input, part));
        }
        let octet: u32 = part.parse().map_err(|_| invalid_address(input, part))?;
        if octet > 255 {
            return Err(invalid_address(input, part));
        }
        value = (value << 8) | octet;
    }
    Ok(value)
}

fn parse_v6(input: &str, text: &str) -> Result<u128> {
    let addr = match text.split_once('%') {
        Some((addr, zone)) => {
            if zone.is_empty() || zone.chars().any(char::is_whitespace) {
                return Err(invalid_address(input, &format!("%{zone}")));
            }
            addr
        }
        None => text,
    };

    // Rewrite a dotted IPv4 tail into two hex groups so leading zeros work there too.
    let (hex_part, rewritten) = match addr.rfind(':') {
        Some(idx) if addr[idx + 1..].contains('.') => {
            let v4 = parse_v4(input, &addr[idx + 1..])?;
            let rewritten = format!("{}{:x}:{:x}", &addr[..=idx], v4 >> 16, v4 & 0xffff);
            (&addr[..idx], Some(rewritten))
        }
        _ => (addr, None),
    };

    Ipv6Addr::from_str(rewritten.as_deref().unwrap_or(addr))
        .map(u128::from)
        .map_err(|_| invalid_address(input, bad_v6_token(addr, hex_part)))
}

/// First group of `hex_part` that is not 1-4 hex digits, or the whole
/// address when the groups are fine but their arrangement is not.
fn bad_v6_token<'a>(addr: &'a str, hex_part: &'a str) -> &'a str {
    hex_part
        .split(':')
        .find(|g| !g.is_empty() && (g.len() > 4 || !g.chars().all(|c| c.is_ascii_hexdigit())))
        .unwrap_or(addr)
}

/// RFC 5952 text for an IPv6 value.
fn format_v6(value: u128) -> String {
    let groups: Vec<u16> = (0..8).map(|i| (value >> (112 - 16 * i)) as u16).collect();
    // ::ffff:0:0/96 keeps its dotted-quad tail (RFC 5952 section 5).
    let mapped = value >> 32 == 0xffff;
    let hex_groups = if mapped { &groups[..6] } else { &groups[..] };

    // Longest run of >= 2 zero groups, leftmost wins a tie.
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;
    while i < hex_groups.len() {
        if hex_groups[i] != 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < hex_groups.len() && hex_groups[i] == 0 {
            i += 1;
        }
        let len = i - start;
        if len >= 2 && best.map_or(true, |(_, best_len)| len > best_len) {
            best = Some((start, len));
        }
    }

    let join = |gs: &[u16]| {
        gs.iter()
            .map(|g| format!("{g:x}"))
            .collect::<Vec<String>>()
            .join(":")
    };
    let mut out = match best {
        Some((start, len)) => format!(
            "{}::{}",
            join(&hex_groups[..start]),
            join(&hex_groups[start + len..])
        ),
        None => join(hex_groups),
    };

    if mapped {
        if !out.ends_with(':') {
            out.push(':');
        }
        let v4 = Ipv4Addr::from(value as u32);
        let _ = write!(out, "{v4}");
    }
    out
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical())
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Address::v4(u32::from(ip))
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Self {
        Address::v6(u128::from(ip))
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(ip) => ip.into(),
            IpAddr::V6(ip) => ip.into(),
        }
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_canonical())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(de::Error::custom)
    }
}
