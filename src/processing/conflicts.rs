//! Overlapping block detection.
//!
//! Finds every pair of input blocks whose address spaces intersect, which
//! usually means two allocations conflict.

use crate::error::{Result, SubnetError};
use crate::models::{AddressRange, Block};
use serde::Serialize;

/// Two input blocks that overlap, by input position, with the shared range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapConflict {
    pub first_index: usize,
    pub first: Block,
    pub second_index: usize,
    pub second: Block,
    pub shared: AddressRange,
}

/// Find overlapping pairs among `blocks`.
///
/// Blocks are swept in address order, so only blocks still open at a start
/// are compared. Pairs come out sorted by the first block, then the second.
/// More than `max_items` pairs fails with `ResultTooLarge`.
pub fn overlapping_pairs(blocks: &[Block], max_items: usize) -> Result<Vec<OverlapConflict>> {
    let mut order: Vec<usize> = (0..blocks.len()).collect();
    order.sort_by_key(|&i| (blocks[i].version(), blocks[i].network(), blocks[i].prefix(), i));

    let mut conflicts = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    for &i in &order {
        let current = blocks[i];
        open.retain(|&j| {
            let b = blocks[j];
            b.version() == current.version() && b.broadcast() >= current.network()
        });
        for &j in &open {
            let earlier = blocks[j];
            if let Some(shared) = earlier.to_range().intersection(&current.to_range()) {
                if conflicts.len() == max_items {
                    return Err(SubnetError::ResultTooLarge { limit: max_items });
                }
                conflicts.push(OverlapConflict {
                    first_index: j,
                    first: earlier,
                    second_index: i,
                    second: current,
                    shared,
                });
            }
        }
        open.push(i);
    }

    conflicts.sort_by_key(|c| (c.first, c.second, c.first_index, c.second_index));
    Ok(conflicts)
}

/// Log overlapping block conflicts as warnings.
pub fn log_overlapping_blocks(conflicts: &[OverlapConflict]) {
    if conflicts.is_empty() {
        log::info!("No overlapping blocks found.");
        return;
    }

    log::warn!("Found {} overlapping block pair(s):", conflicts.len());
    for conflict in conflicts {
        log::warn!(
            "  {} (input {}) overlaps {} (input {}) on {}",
            conflict.first,
            conflict.first_index + 1,
            conflict.second,
            conflict.second_index + 1,
            conflict.shared
        );
    }
}
