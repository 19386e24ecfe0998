//! Listing every address of a range or block, capped.

use crate::error::{Result, SubnetError};
use crate::models::{Address, AddressCount, AddressRange, Block};

/// Every address of `range`, ascending. Fails before allocating when the
/// range holds more than `max_items` addresses.
pub fn enumerate_range(range: AddressRange, max_items: usize) -> Result<Vec<Address>> {
    let fits = match range.len() {
        AddressCount::Finite(n) => n <= max_items as u128,
        AddressCount::AllIpv6 => false,
    };
    if !fits {
        return Err(SubnetError::ResultTooLarge { limit: max_items });
    }
    let version = range.version();
    Ok((range.start().value()..=range.end().value())
        .filter_map(|v| Address::new(version, v))
        .collect())
}

/// Every address of `block`, network and broadcast included.
pub fn enumerate_addresses(block: Block, max_items: usize) -> Result<Vec<Address>> {
    enumerate_range(block.to_range(), max_items)
}

/// Usable host addresses of `block`: network and broadcast are left out
/// for IPv4 blocks up to /30.
pub fn host_addresses(block: Block, max_items: usize) -> Result<Vec<Address>> {
    let hosts = AddressRange::new(block.first_usable(), block.last_usable())?;
    enumerate_range(hosts, max_items)
}
