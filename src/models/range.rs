//! Inclusive address ranges.

use super::address::{ensure_version, Address, IpVersion};
use super::count::AddressCount;
use crate::error::{Result, SubnetError};
use serde::Serialize;
use std::str::FromStr;

/// Inclusive range `start..=end` of one family, `start <= end`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash, Serialize)]
pub struct AddressRange {
    start: Address,
    end: Address,
}

impl AddressRange {
    pub fn new(start: Address, end: Address) -> Result<AddressRange> {
        ensure_version(start.version(), end.version())?;
        if start > end {
            return Err(SubnetError::InvalidRangeSyntax {
                input: format!("{start}-{end}"),
                reason: "start is after end".to_string(),
            });
        }
        Ok(AddressRange { start, end })
    }

    /// Caller guarantees `start <= end <= version.max_value()`.
    pub(crate) fn from_raw(version: IpVersion, start: u128, end: u128) -> AddressRange {
        AddressRange {
            start: Address::from_raw(version, start),
            end: Address::from_raw(version, end),
        }
    }

    pub fn single(addr: Address) -> AddressRange {
        AddressRange {
            start: addr,
            end: addr,
        }
    }

    pub fn version(&self) -> IpVersion {
        self.start.version()
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn len(&self) -> AddressCount {
        AddressCount::span(self.start.value(), self.end.value())
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.version() == self.version() && addr >= self.start && addr <= self.end
    }

    pub fn contains_range(&self, other: &AddressRange) -> bool {
        other.version() == self.version() && other.start >= self.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &AddressRange) -> bool {
        self.intersection(other).is_some()
    }

    pub fn intersection(&self, other: &AddressRange) -> Option<AddressRange> {
        if other.version() != self.version() {
            return None;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(AddressRange { start, end })
    }

    /// Overlapping or directly adjacent, i.e. the union is one range.
    pub fn touches(&self, other: &AddressRange) -> bool {
        if other.version() != self.version() {
            return false;
        }
        let (lo, hi) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        lo.end.succ().map_or(true, |next| hi.start <= next)
    }
}

impl FromStr for AddressRange {
    type Err = SubnetError;

    /// Parses `start-end`, whitespace around the dash allowed.
    fn from_str(s: &str) -> Result<AddressRange> {
        let text = s.trim();
        let (start, end) = text
            .split_once('-')
            .ok_or_else(|| SubnetError::InvalidRangeSyntax {
                input: text.to_string(),
                reason: "expected 'start-end'".to_string(),
            })?;
        let start = Address::from_str(start)?;
        let end = Address::from_str(end)?;
        AddressRange::new(start, end).map_err(|e| match e {
            SubnetError::InvalidRangeSyntax { reason, .. } => SubnetError::InvalidRangeSyntax {
                input: text.to_string(),
                reason,
            },
            e => e,
        })
    }
}

impl std::fmt::Display for AddressRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
