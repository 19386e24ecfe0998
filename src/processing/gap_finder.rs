//! Gap finding inside a container block.
//!
//! Every hole between used blocks is filled with the biggest aligned
//! blocks that fit, in address order.

use crate::error::{Result, SubnetError};
use crate::models::{ensure_version, lo_mask, Address, Block, BlockSet};

/// Biggest block starting at `start_ip` that ends at or before `last`.
///
/// `start_prefix` caps the size from above, and so does the alignment of
/// `start_ip` (10.6.2.80 can be at most a /28).
fn find_biggest_block(start_ip: Address, start_prefix: u8, last: u128) -> Block {
    let version = start_ip.version();
    let mut next_prefix = start_prefix.max(lo_mask(start_ip));
    loop {
        let candidate = Block::from_raw(version, start_ip.value(), next_prefix);
        // a full-length prefix always fits, since start_ip <= last
        if candidate.broadcast().value() > last {
            next_prefix += 1;
        } else {
            return candidate;
        }
    }
}

/// Free blocks of `container` not covered by `used`, ascending.
///
/// Used blocks may overlap each other or stick out of the container; only
/// the part inside the container counts.
pub fn find_gaps(container: Block, used: &[Block], max_items: usize) -> Result<Vec<Block>> {
    let version = container.version();
    for block in used {
        ensure_version(version, block.version())?;
    }
    let used = BlockSet::from_ranges(version, used.iter().map(Block::to_range))?;
    let free = BlockSet::from_ranges(version, [container.to_range()])?.difference(&used);

    let mut gaps = Vec::new();
    for range in free.ranges() {
        let last = range.end().value();
        let mut next_ip = Some(range.start());
        while let Some(ip) = next_ip {
            if gaps.len() == max_items {
                return Err(SubnetError::ResultTooLarge { limit: max_items });
            }
            let gap = find_biggest_block(ip, container.prefix(), last);
            log::trace!("gap {gap}");
            gaps.push(gap);
            next_ip = gap.broadcast().succ().filter(|n| n.value() <= last);
        }
    }
    log::debug!("{container}: {} gaps", gaps.len());
    Ok(gaps)
}
