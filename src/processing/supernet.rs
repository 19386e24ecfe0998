//! Smallest enclosing block for a set of inputs.

use crate::error::{Result, SubnetError};
use crate::models::{common_version, AddressCount, Block, BlockSet, InputItem, IpVersion};
use serde::Serialize;

/// The enclosing block, how much of it the inputs cover, and how many
/// addresses it adds that were not in the input. Extra addresses are the
/// normal price of a single covering block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Supernet {
    pub block: Block,
    pub covered: AddressCount,
    pub extra: AddressCount,
}

/// Number of leading bits `a` and `b` share within `version`'s width.
pub fn common_prefix_len(version: IpVersion, a: u128, b: u128) -> u8 {
    let width = version.width();
    let differing = 128 - (a ^ b).leading_zeros() as u8;
    width - differing
}

/// Smallest block containing every item. All items must share a family.
pub fn find_supernet(items: &[InputItem]) -> Result<Supernet> {
    let version = common_version(items)?.ok_or(SubnetError::EmptyInput)?;
    let set = BlockSet::from_items(version, items)?;
    let (first, last) = match (set.ranges().first(), set.ranges().last()) {
        (Some(first), Some(last)) => (first.start(), last.end()),
        _ => return Err(SubnetError::EmptyInput),
    };

    let prefix = common_prefix_len(version, first.value(), last.value());
    let block = Block::new(first, prefix, Default::default())?;
    let covered = set.address_count();
    let extra = block
        .host_count()
        .checked_sub(covered)
        .unwrap_or(AddressCount::ZERO);
    log::debug!("supernet of {} items: {block} ({extra} extra addresses)", items.len());
    Ok(Supernet {
        block,
        covered,
        extra,
    })
}
