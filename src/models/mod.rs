//! Domain models for the range engine.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`Address`] - IPv4/IPv6 address as a versioned wide integer
//! - [`Block`] - CIDR block with derived network properties
//! - [`AddressRange`] and [`BlockSet`] - inclusive ranges and their canonical list form
//! - [`InputItem`] - one address, range or block read from text

mod address;
mod block;
mod block_set;
mod count;
mod item;
mod range;

// Re-export public types
pub use address::{Address, IpVersion, IPV4_BITS, IPV6_BITS};
pub(crate) use address::ensure_version;
pub use block::{
    broadcast_addr, check_prefix, cut_addr, get_cidr_mask, host_mask, lo_mask, low_bits,
    netmask_to_prefix, num_usable_hosts, parse_cidr_parts, prefix_to_netmask, Block,
    HostBitsPolicy, SubnetInfo,
};
pub use block_set::BlockSet;
pub use count::AddressCount;
pub(crate) use item::{serialize_error, split_tokens};
pub use item::{common_version, parse_items, parse_lines, InputItem, LineFailure, ParsedLines};
pub use range::AddressRange;
