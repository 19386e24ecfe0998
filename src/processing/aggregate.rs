//! Aggregation of addresses, ranges and blocks into minimal CIDR lists.

use super::split::split_by_prefix;
use crate::error::{Result, SubnetError};
use crate::models::{
    check_prefix, low_bits, AddressRange, Block, BlockSet, InputItem, IpVersion, LineFailure,
};
use serde::Serialize;

/// Lazy decomposition of one range into its minimal CIDR cover.
///
/// Each step takes the largest block that is aligned at the cursor and does
/// not run past the end of the range.
#[derive(Debug, Clone)]
pub struct RangeBlocks {
    version: IpVersion,
    next: Option<u128>,
    end: u128,
}

impl Iterator for RangeBlocks {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let start = self.next?;
        let width = self.version.width();

        let align_bits = (start.trailing_zeros() as u8).min(width);
        // floor(log2(remaining)), where remaining = end - start + 1
        let span = self.end - start;
        let fit_bits = match span.checked_add(1) {
            Some(remaining) => (127 - remaining.leading_zeros()) as u8,
            None => 128,
        };
        let bits = align_bits.min(fit_bits);

        let last = start | low_bits(bits);
        self.next = if last >= self.end { None } else { Some(last + 1) };
        Some(Block::from_raw(self.version, start, width - bits))
    }
}

/// Minimal, aligned CIDR blocks exactly covering `range`, ascending.
pub fn range_to_blocks(range: AddressRange) -> RangeBlocks {
    RangeBlocks {
        version: range.version(),
        next: Some(range.start().value()),
        end: range.end().value(),
    }
}

/// Collect at most `max_items` blocks, failing instead of truncating.
pub fn collect_capped<I>(blocks: I, max_items: usize) -> Result<Vec<Block>>
where
    I: IntoIterator<Item = Block>,
{
    let mut out = Vec::new();
    for block in blocks {
        if out.len() == max_items {
            return Err(SubnetError::ResultTooLarge { limit: max_items });
        }
        out.push(block);
    }
    Ok(out)
}

/// Minimal CIDR cover of a list of ranges, in input order.
pub fn ranges_to_blocks(ranges: &[AddressRange], max_items: usize) -> Result<Vec<Block>> {
    collect_capped(ranges.iter().flat_map(|r| range_to_blocks(*r)), max_items)
}

/// What [`aggregate`] emits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub enum AggregateMode {
    /// Minimal CIDR cover.
    #[default]
    Cidr,
    /// Merged maximal ranges only.
    Ranges,
    /// Cover re-split to a uniform prefix length; longer blocks are flagged.
    TargetPrefix(u8),
}

/// Aggregation output. `ranges` is always filled; `blocks` for the CIDR
/// based modes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    pub mode: AggregateMode,
    pub ranges: Vec<AddressRange>,
    pub blocks: Vec<Block>,
    /// Cover blocks smaller than the target prefix, which /target cannot express.
    pub misaligned: Vec<Block>,
    pub failures: Vec<LineFailure>,
}

/// Aggregate items of either family. IPv4 output precedes IPv6 output.
pub fn aggregate(items: &[InputItem], mode: AggregateMode, max_items: usize) -> Result<Aggregation> {
    let mut result = Aggregation {
        mode,
        ..Default::default()
    };

    for version in [IpVersion::V4, IpVersion::V6] {
        let ranges = items
            .iter()
            .filter(|item| item.version() == version)
            .map(InputItem::to_range);
        let set = BlockSet::from_ranges(version, ranges)?;
        if set.is_empty() {
            continue;
        }
        log::trace!("aggregate {version}: {} merged ranges", set.ranges().len());
        result.ranges.extend_from_slice(set.ranges());

        match mode {
            AggregateMode::Ranges => {}
            AggregateMode::Cidr => {
                let remaining = max_items.saturating_sub(result.blocks.len());
                let cover = ranges_to_blocks(set.ranges(), remaining)
                    .map_err(|_| SubnetError::ResultTooLarge { limit: max_items })?;
                result.blocks.extend(cover);
            }
            AggregateMode::TargetPrefix(target) => {
                let target = check_prefix(version, target as u32)?;
                let cover = ranges_to_blocks(set.ranges(), max_items)?;
                for block in cover {
                    if block.prefix() > target {
                        result.misaligned.push(block);
                        continue;
                    }
                    let remaining = max_items.saturating_sub(result.blocks.len());
                    let children = split_by_prefix(block, target, remaining)
                        .map_err(|_| SubnetError::ResultTooLarge { limit: max_items })?;
                    result.blocks.extend(children);
                }
            }
        }
    }

    if mode == AggregateMode::Ranges && result.ranges.len() > max_items {
        return Err(SubnetError::ResultTooLarge { limit: max_items });
    }
    log::debug!(
        "aggregate: {} items -> {} ranges, {} blocks, {} misaligned",
        items.len(),
        result.ranges.len(),
        result.blocks.len(),
        result.misaligned.len()
    );
    Ok(result)
}

/// Aggregate a newline separated batch. Lines that do not parse are
/// reported in `failures` and the rest are still aggregated.
pub fn aggregate_lines(text: &str, mode: AggregateMode, max_items: usize) -> Result<Aggregation> {
    let parsed = crate::models::parse_lines(text);
    for failure in &parsed.failures {
        log::debug!("line {}: skipping '{}': {}", failure.line, failure.input, failure.error);
    }
    let mut result = aggregate(&parsed.items(), mode, max_items)?;
    result.failures = parsed.failures;
    Ok(result)
}
