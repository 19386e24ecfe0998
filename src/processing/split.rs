//! Splitting a block into equal child blocks.

use crate::error::{Result, SubnetError};
use crate::models::Block;
use serde::Serialize;

/// Result of [`split_by_count`]: the count asked for, the power of two
/// actually used, and the children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitOutcome {
    pub requested: u128,
    pub rounded: u128,
    pub blocks: Vec<Block>,
}

/// Split `block` into its /`target` children in ascending order.
///
/// `target == block.prefix()` returns the block itself. The child count is
/// checked against `max_items` before anything is allocated.
pub fn split_by_prefix(block: Block, target: u8, max_items: usize) -> Result<Vec<Block>> {
    let width = block.version().width();
    if target < block.prefix() || target > width {
        return Err(SubnetError::PrefixNotDescendant {
            prefix: block.prefix(),
            target,
            max: width,
        });
    }

    let depth = (target - block.prefix()) as u32;
    if depth >= usize::BITS || (1usize << depth) > max_items {
        return Err(SubnetError::ResultTooLarge { limit: max_items });
    }
    let count = 1usize << depth;
    if count == 1 {
        return Ok(vec![block]);
    }

    // depth > 0 here, so target > 0 and the step fits in u128.
    let step = 1u128 << (width - target);
    let base = block.network().value();
    Ok((0..count as u128)
        .map(|i| Block::from_raw(block.version(), base + i * step, target))
        .collect())
}

/// Split `block` into `n` equal parts, `n` rounded up to a power of two.
pub fn split_by_count(block: Block, n: u128, max_items: usize) -> Result<SplitOutcome> {
    if n == 0 {
        return Err(SubnetError::InvalidCount { count: n });
    }
    let width = block.version().width();
    let depth = match n.checked_next_power_of_two() {
        Some(rounded) => rounded.trailing_zeros(),
        None => 128,
    };
    let target = block.prefix() as u32 + depth;
    if target > width as u32 {
        return Err(SubnetError::PrefixNotDescendant {
            prefix: block.prefix(),
            target: target.min(u8::MAX as u32) as u8,
            max: width,
        });
    }
    let blocks = split_by_prefix(block, target as u8, max_items)?;
    Ok(SplitOutcome {
        requested: n,
        rounded: blocks.len() as u128,
        blocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(s: &str) -> Block {
        s.parse().unwrap()
    }

    fn texts(blocks: &[Block]) -> Vec<String> {
        blocks.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_split_22_into_24() {
        let children = split_by_prefix(block("192.168.0.0/22"), 24, 1024).unwrap();
        assert_eq!(
            texts(&children),
            vec![
                "192.168.0.0/24",
                "192.168.1.0/24",
                "192.168.2.0/24",
                "192.168.3.0/24"
            ]
        );
    }

    #[test]
    fn test_split_same_prefix_is_identity() {
        for b in ["10.0.0.0/8", "0.0.0.0/0", "::/0", "2001:db8::1/128"] {
            assert_eq!(split_by_prefix(block(b), block(b).prefix(), 1).unwrap(), vec![block(b)]);
        }
    }

    #[test]
    fn test_split_covers_parent_exactly() {
        let parent = block("10.20.0.0/16");
        for target in 16..=22 {
            let children = split_by_prefix(parent, target, 1 << 10).unwrap();
            assert_eq!(children.first().unwrap().network(), parent.network());
            assert_eq!(children.last().unwrap().broadcast(), parent.broadcast());
            for pair in children.windows(2) {
                assert_eq!(pair[0].broadcast().succ().unwrap(), pair[1].network());
            }
        }
    }

    #[test]
    fn test_split_rejects_shallower_or_too_deep() {
        assert!(matches!(
            split_by_prefix(block("10.0.0.0/16"), 15, 10),
            Err(SubnetError::PrefixNotDescendant { prefix: 16, target: 15, max: 32 })
        ));
        assert!(matches!(
            split_by_prefix(block("10.0.0.0/16"), 33, 10),
            Err(SubnetError::PrefixNotDescendant { .. })
        ));
    }

    #[test]
    fn test_split_cap() {
        assert_eq!(
            split_by_prefix(block("10.0.0.0/8"), 24, 65535),
            Err(SubnetError::ResultTooLarge { limit: 65535 })
        );
        assert_eq!(
            split_by_prefix(block("10.0.0.0/8"), 24, 65536).unwrap().len(),
            65536
        );
        assert_eq!(
            split_by_prefix(block("::/0"), 128, 1_000_000),
            Err(SubnetError::ResultTooLarge { limit: 1_000_000 })
        );
    }

    #[test]
    fn test_split_v6() {
        let children = split_by_prefix(block("2001:db8::/32"), 34, 8).unwrap();
        assert_eq!(
            texts(&children),
            vec![
                "2001:db8::/34",
                "2001:db8:4000::/34",
                "2001:db8:8000::/34",
                "2001:db8:c000::/34"
            ]
        );
    }

    #[test]
    fn test_split_by_count_rounds_up() {
        let outcome = split_by_count(block("10.0.0.0/24"), 5, 64).unwrap();
        assert_eq!(outcome.requested, 5);
        assert_eq!(outcome.rounded, 8);
        assert_eq!(outcome.blocks.len(), 8);
        assert_eq!(outcome.blocks[1].to_string(), "10.0.0.32/27");

        let outcome = split_by_count(block("10.0.0.0/24"), 1, 64).unwrap();
        assert_eq!(outcome.blocks, vec![block("10.0.0.0/24")]);
    }

    #[test]
    fn test_split_by_count_errors() {
        assert_eq!(
            split_by_count(block("10.0.0.0/24"), 0, 64),
            Err(SubnetError::InvalidCount { count: 0 })
        );
        assert!(matches!(
            split_by_count(block("10.0.0.0/24"), 512, 1024),
            Err(SubnetError::PrefixNotDescendant { target: 33, .. })
        ));
        assert_eq!(
            split_by_count(block("::/0"), u128::MAX, 4),
            Err(SubnetError::ResultTooLarge { limit: 4 })
        );
    }
}
