//! Canonical range lists.
//!
//! A [`BlockSet`] is a sorted list of disjoint, non-adjacent ranges of one
//! family. Aggregation, supernetting and set algebra all normalize their
//! inputs into this form first.

use super::address::{ensure_version, IpVersion};
use super::count::AddressCount;
use super::item::InputItem;
use super::range::AddressRange;
use crate::error::Result;
use itertools::Itertools;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSet {
    version: IpVersion,
    ranges: Vec<AddressRange>,
}

impl BlockSet {
    pub fn empty(version: IpVersion) -> BlockSet {
        BlockSet {
            version,
            ranges: Vec::new(),
        }
    }

    /// Sort and coalesce arbitrary ranges of `version`.
    pub fn from_ranges<I>(version: IpVersion, ranges: I) -> Result<BlockSet>
    where
        I: IntoIterator<Item = AddressRange>,
    {
        let mut ranges: Vec<AddressRange> = ranges.into_iter().collect();
        for r in &ranges {
            ensure_version(version, r.version())?;
        }
        ranges.sort();
        let ranges = ranges
            .into_iter()
            .coalesce(|a, b| {
                if a.touches(&b) {
                    Ok(AddressRange::from_raw(
                        version,
                        a.start().value(),
                        a.end().max(b.end()).value(),
                    ))
                } else {
                    Err((a, b))
                }
            })
            .collect();
        Ok(BlockSet { version, ranges })
    }

    pub fn from_items(version: IpVersion, items: &[InputItem]) -> Result<BlockSet> {
        BlockSet::from_ranges(version, items.iter().map(InputItem::to_range))
    }

    pub fn version(&self) -> IpVersion {
        self.version
    }

    pub fn ranges(&self) -> &[AddressRange] {
        &self.ranges
    }

    pub fn into_ranges(self) -> Vec<AddressRange> {
        self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total addresses covered. Ranges are disjoint so this never exceeds 2^128.
    pub fn address_count(&self) -> AddressCount {
        self.ranges
            .iter()
            .try_fold(AddressCount::ZERO, |acc, r| acc.checked_add(r.len()))
            .unwrap_or(AddressCount::AllIpv6)
    }

    /// True iff `range` lies inside one merged range.
    pub fn contains_range(&self, range: &AddressRange) -> bool {
        if range.version() != self.version {
            return false;
        }
        let idx = self
            .ranges
            .partition_point(|r| r.start() <= range.start());
        idx > 0 && self.ranges[idx - 1].contains_range(range)
    }

    /// Portions of `self` not covered by `other`.
    pub fn difference(&self, other: &BlockSet) -> BlockSet {
        if other.version != self.version {
            return self.clone();
        }
        let version = self.version;
        let subtrahend = &other.ranges;
        let mut out = Vec::new();
        let mut j = 0;

        for a in &self.ranges {
            while j < subtrahend.len() && subtrahend[j].end() < a.start() {
                j += 1;
            }
            let mut k = j;
            let mut cursor = Some(a.start().value());
            while let Some(start) = cursor {
                match subtrahend.get(k) {
                    Some(b) if b.start() <= a.end() => {
                        if b.start().value() > start {
                            out.push(AddressRange::from_raw(version, start, b.start().value() - 1));
                        }
                        cursor = if b.end() >= a.end() {
                            None
                        } else {
                            Some(b.end().value() + 1)
                        };
                        k += 1;
                    }
                    _ => {
                        out.push(AddressRange::from_raw(version, start, a.end().value()));
                        cursor = None;
                    }
                }
            }
        }
        BlockSet {
            version,
            ranges: out,
        }
    }

    /// Addresses covered by both sets.
    pub fn intersection(&self, other: &BlockSet) -> BlockSet {
        let mut out = Vec::new();
        if other.version == self.version {
            let (mut i, mut j) = (0, 0);
            while i < self.ranges.len() && j < other.ranges.len() {
                let (a, b) = (&self.ranges[i], &other.ranges[j]);
                if let Some(shared) = a.intersection(b) {
                    out.push(shared);
                }
                if a.end() < b.end() {
                    i += 1;
                } else {
                    j += 1;
                }
            }
        }
        BlockSet {
            version: self.version,
            ranges: out,
        }
    }

    pub fn union(&self, other: &BlockSet) -> Result<BlockSet> {
        BlockSet::from_ranges(
            self.version,
            self.ranges.iter().chain(other.ranges.iter()).copied(),
        )
    }
}
