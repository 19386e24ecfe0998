//! Difference, intersection and containment between two item collections.

use super::aggregate::{range_to_blocks, ranges_to_blocks};
use crate::error::{Result, SubnetError};
use crate::models::{common_version, AddressRange, Block, BlockSet, InputItem, IpVersion};
use serde::Serialize;

/// Merged ranges and their minimal CIDR cover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetResult {
    pub ranges: Vec<AddressRange>,
    pub blocks: Vec<Block>,
}

impl SetResult {
    fn from_set(set: BlockSet, max_items: usize) -> Result<SetResult> {
        let blocks = ranges_to_blocks(set.ranges(), max_items)?;
        Ok(SetResult {
            ranges: set.into_ranges(),
            blocks,
        })
    }
}

/// Whether one block of the second operand sits inside the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Containment {
    pub block: Block,
    pub contained: bool,
}

/// Normalize both operands. `None` when both are empty.
fn operands(a: &[InputItem], b: &[InputItem]) -> Result<Option<(BlockSet, BlockSet)>> {
    let version: Option<IpVersion> = common_version(a.iter().chain(b))?;
    match version {
        None => Ok(None),
        Some(version) => Ok(Some((
            BlockSet::from_items(version, a)?,
            BlockSet::from_items(version, b)?,
        ))),
    }
}

/// Addresses of `a` not covered by `b`.
pub fn diff(a: &[InputItem], b: &[InputItem], max_items: usize) -> Result<SetResult> {
    let Some((a, b)) = operands(a, b)? else {
        return Ok(SetResult::default());
    };
    let rest = a.difference(&b);
    log::debug!("diff: {} ranges remain", rest.ranges().len());
    SetResult::from_set(rest, max_items)
}

/// Addresses covered by both `a` and `b`.
pub fn overlap(a: &[InputItem], b: &[InputItem], max_items: usize) -> Result<SetResult> {
    let Some((a, b)) = operands(a, b)? else {
        return Ok(SetResult::default());
    };
    let shared = a.intersection(&b);
    log::debug!("overlap: {} shared ranges", shared.ranges().len());
    SetResult::from_set(shared, max_items)
}

/// For each block of `b` (ranges and addresses broken into their minimal
/// blocks), whether it lies inside one merged range of `a`. More than
/// `max_items` checks fails with `ResultTooLarge`.
pub fn containment(a: &[InputItem], b: &[InputItem], max_items: usize) -> Result<Vec<Containment>> {
    let Some((set, _)) = operands(a, b)? else {
        return Ok(Vec::new());
    };
    let mut checks = Vec::new();
    for block in b.iter().flat_map(|item| range_to_blocks(item.to_range())) {
        if checks.len() == max_items {
            return Err(SubnetError::ResultTooLarge { limit: max_items });
        }
        checks.push(Containment {
            block,
            contained: set.contains_range(&block.to_range()),
        });
    }
    Ok(checks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_items;

    fn items(texts: &[&str]) -> Vec<InputItem> {
        parse_items(texts).unwrap()
    }

    fn texts(blocks: &[Block]) -> Vec<String> {
        blocks.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_diff_punches_hole() {
        let result = diff(&items(&["10.0.0.0/24"]), &items(&["10.0.0.64/26"]), 100).unwrap();
        assert_eq!(texts(&result.blocks), vec!["10.0.0.0/26", "10.0.0.128/25"]);
        assert_eq!(result.ranges.len(), 2);
    }

    #[test]
    fn test_diff_with_disjoint_and_covering() {
        let a = items(&["10.0.0.0/24"]);
        let result = diff(&a, &items(&["10.0.1.0/24"]), 100).unwrap();
        assert_eq!(texts(&result.blocks), vec!["10.0.0.0/24"]);
        let result = diff(&a, &items(&["10.0.0.0/16"]), 100).unwrap();
        assert!(result.blocks.is_empty() && result.ranges.is_empty());
    }

    #[test]
    fn test_overlap() {
        let a = items(&["10.0.0.0/24", "10.0.2.0/24"]);
        let b = items(&["10.0.0.128-10.0.2.3"]);
        let result = overlap(&a, &b, 100).unwrap();
        assert_eq!(texts(&result.blocks), vec!["10.0.0.128/25", "10.0.2.0/30"]);
    }

    #[test]
    fn test_diff_and_overlap_partition_a() {
        let a = items(&["10.0.0.0/22", "10.0.8.0-10.0.8.200"]);
        let b = items(&["10.0.1.7-10.0.3.3", "10.0.8.100/30", "10.0.9.0/24"]);
        let d = diff(&a, &b, 1000).unwrap();
        let o = overlap(&a, &b, 1000).unwrap();

        let set_a = BlockSet::from_items(IpVersion::V4, &a).unwrap();
        let d_set = BlockSet::from_ranges(IpVersion::V4, d.ranges.clone()).unwrap();
        let o_set = BlockSet::from_ranges(IpVersion::V4, o.ranges.clone()).unwrap();
        assert_eq!(d_set.union(&o_set).unwrap(), set_a);
        assert!(d_set.intersection(&o_set).is_empty());
    }

    #[test]
    fn test_containment() {
        let a = items(&["10.0.0.0/23", "10.0.2.0/24"]);
        let b = items(&["10.0.1.0/24", "10.0.1.0-10.0.2.255", "10.0.3.0/31"]);
        let got: Vec<(String, bool)> = containment(&a, &b, 10)
            .unwrap()
            .into_iter()
            .map(|c| (c.block.to_string(), c.contained))
            .collect();
        assert_eq!(
            got,
            vec![
                ("10.0.1.0/24".to_string(), true),
                ("10.0.1.0/24".to_string(), true),
                ("10.0.2.0/24".to_string(), true),
                ("10.0.3.0/31".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_empty_operands() {
        assert_eq!(diff(&[], &[], 10).unwrap(), SetResult::default());
        let result = diff(&items(&["10.0.0.0/30"]), &[], 10).unwrap();
        assert_eq!(texts(&result.blocks), vec!["10.0.0.0/30"]);
        assert!(overlap(&[], &items(&["10.0.0.0/30"]), 10).unwrap().blocks.is_empty());
    }

    #[test]
    fn test_set_ops_version_mismatch_and_cap() {
        let a = items(&["10.0.0.0/8"]);
        let b = items(&["2001:db8::/32"]);
        assert!(matches!(diff(&a, &b, 10), Err(SubnetError::VersionMismatch { .. })));
        assert!(matches!(containment(&a, &b, 10), Err(SubnetError::VersionMismatch { .. })));

        let a = items(&["10.0.0.1-10.0.0.10"]);
        assert_eq!(
            diff(&a, &[], 3),
            Err(SubnetError::ResultTooLarge { limit: 3 })
        );
        // .1/32 .2/31 .4/30 .8/31 .10/32
        let all = items(&["10.0.0.0/24"]);
        assert_eq!(
            containment(&all, &a, 4),
            Err(SubnetError::ResultTooLarge { limit: 4 })
        );
        assert_eq!(containment(&all, &a, 5).unwrap().len(), 5);
    }
}
