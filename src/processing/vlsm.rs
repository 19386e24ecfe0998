//! Variable length subnet allocation from a pool.
//!
//! Requirements are served largest first, each block aligned on its own
//! size. One requirement that does not fit never stops the others.

use super::aggregate::ranges_to_blocks;
use crate::error::{Result, SubnetError};
use crate::models::{
    low_bits, num_usable_hosts, serialize_error, AddressCount, AddressRange, Block, BlockSet,
    IpVersion,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A named host count to allocate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlsmRequest {
    pub name: String,
    pub hosts: u128,
}

impl VlsmRequest {
    pub fn new(name: &str, hosts: u128) -> VlsmRequest {
        VlsmRequest {
            name: name.to_string(),
            hosts,
        }
    }
}

impl FromStr for VlsmRequest {
    type Err = SubnetError;

    /// `name=hosts`, `name:hosts` or a bare host count.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, hosts) = match s.split_once(['=', ':']) {
            Some((name, hosts)) => (name.trim(), hosts.trim()),
            None => ("", s),
        };
        let hosts: u128 = hosts.parse().map_err(|_| SubnetError::InvalidRequestSyntax {
            input: s.to_string(),
            reason: format!("host count '{hosts}' is not a number"),
        })?;
        let name = if name.is_empty() {
            format!("{hosts}-hosts")
        } else {
            name.to_string()
        };
        Ok(VlsmRequest { name, hosts })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub name: String,
    pub requested_hosts: u128,
    pub block: Block,
    pub usable_hosts: AddressCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlsmFailure {
    pub name: String,
    pub requested_hosts: u128,
    #[serde(serialize_with = "serialize_error")]
    pub error: SubnetError,
}

/// Outcome of one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlsmPlan {
    pub pool: Block,
    /// In allocation order (largest requirement first).
    pub allocations: Vec<Allocation>,
    pub failures: Vec<VlsmFailure>,
    /// Addresses passed over to align a block.
    pub skipped: Vec<AddressRange>,
    /// Pool space left unallocated, as minimal CIDR blocks.
    pub free: Vec<Block>,
}

/// Longest prefix whose usable host count reaches `hosts`, if any.
pub fn prefix_for_hosts(version: IpVersion, hosts: u128) -> Option<u8> {
    let needed = AddressCount::Finite(hosts);
    (0..=version.width())
        .rev()
        .find(|&p| num_usable_hosts(version, p) >= needed)
}

/// Allocate `requests` from `pool`, largest first (stable on ties).
///
/// Allocations and the free list are each capped at `max_items`.
pub fn allocate(pool: Block, requests: &[VlsmRequest], max_items: usize) -> Result<VlsmPlan> {
    let version = pool.version();
    let pool_end = pool.broadcast().value();

    let mut order: Vec<&VlsmRequest> = requests.iter().collect();
    order.sort_by(|a, b| b.hosts.cmp(&a.hosts));

    let mut cursor = Some(pool.network().value());
    let mut allocations = Vec::new();
    let mut failures = Vec::new();
    let mut skipped = Vec::new();

    for request in order {
        match place(pool, request, cursor) {
            Ok((block, aligned_from)) => {
                if let Some(from) = aligned_from {
                    skipped.push(AddressRange::from_raw(
                        version,
                        from,
                        block.network().value() - 1,
                    ));
                }
                if allocations.len() == max_items {
                    return Err(SubnetError::ResultTooLarge { limit: max_items });
                }
                log::trace!("vlsm: {} -> {block}", request.name);
                let end = block.broadcast().value();
                cursor = if end >= pool_end { None } else { Some(end + 1) };
                allocations.push(Allocation {
                    name: request.name.clone(),
                    requested_hosts: request.hosts,
                    block,
                    usable_hosts: block.usable_host_count(),
                });
            }
            Err(error) => {
                log::debug!("vlsm: {} not allocated: {error}", request.name);
                failures.push(VlsmFailure {
                    name: request.name.clone(),
                    requested_hosts: request.hosts,
                    error,
                });
            }
        }
    }

    let used = allocations.iter().map(|a| a.block.to_range());
    let remainder = BlockSet::from_ranges(version, [pool.to_range()])?
        .difference(&BlockSet::from_ranges(version, used)?);
    let free = ranges_to_blocks(remainder.ranges(), max_items)?;

    Ok(VlsmPlan {
        pool,
        allocations,
        failures,
        skipped,
        free,
    })
}

/// Place one request at `cursor`. Returns the block and, when alignment
/// moved past the cursor, where the skipped addresses start.
fn place(pool: Block, request: &VlsmRequest, cursor: Option<u128>) -> Result<(Block, Option<u128>)> {
    let version = pool.version();
    if request.hosts == 0 {
        return Err(SubnetError::InvalidHostCount {
            name: request.name.clone(),
            hosts: request.hosts,
        });
    }
    let prefix = match prefix_for_hosts(version, request.hosts) {
        Some(prefix) => prefix,
        None => {
            return Err(SubnetError::InsufficientSpace {
                name: request.name.clone(),
                prefix: 0,
            })
        }
    };
    let insufficient = || SubnetError::InsufficientSpace {
        name: request.name.clone(),
        prefix,
    };
    if prefix < pool.prefix() {
        return Err(insufficient());
    }

    let cursor = cursor.ok_or_else(insufficient)?;
    let mask = low_bits(version.width() - prefix);
    // round the cursor up to the block size
    let aligned = cursor.checked_add(mask).ok_or_else(insufficient)? & !mask;
    let end = aligned.checked_add(mask).ok_or_else(insufficient)?;
    if end > pool.broadcast().value() {
        return Err(insufficient());
    }
    let skipped_from = (aligned > cursor).then_some(cursor);
    Ok((Block::from_raw(version, aligned, prefix), skipped_from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(s: &str) -> Block {
        s.parse().unwrap()
    }

    #[test]
    fn test_prefix_for_hosts() {
        assert_eq!(prefix_for_hosts(IpVersion::V4, 1), Some(32));
        assert_eq!(prefix_for_hosts(IpVersion::V4, 2), Some(31));
        assert_eq!(prefix_for_hosts(IpVersion::V4, 3), Some(29));
        assert_eq!(prefix_for_hosts(IpVersion::V4, 50), Some(26));
        assert_eq!(prefix_for_hosts(IpVersion::V4, 62), Some(26));
        assert_eq!(prefix_for_hosts(IpVersion::V4, 63), Some(25));
        assert_eq!(prefix_for_hosts(IpVersion::V4, 1 << 32), None);
        assert_eq!(prefix_for_hosts(IpVersion::V6, 256), Some(120));
        assert_eq!(prefix_for_hosts(IpVersion::V6, u128::MAX), Some(0));
    }

    #[test]
    fn test_parse_request() {
        assert_eq!("lan=50".parse::<VlsmRequest>().unwrap(), VlsmRequest::new("lan", 50));
        assert_eq!("dmz:10".parse::<VlsmRequest>().unwrap(), VlsmRequest::new("dmz", 10));
        assert_eq!("25".parse::<VlsmRequest>().unwrap(), VlsmRequest::new("25-hosts", 25));
        assert_eq!(
            "lan=lots".parse::<VlsmRequest>(),
            Err(SubnetError::InvalidRequestSyntax {
                input: "lan=lots".to_string(),
                reason: "host count 'lots' is not a number".to_string(),
            })
        );
    }

    #[test]
    fn test_vlsm_50_25_10() {
        let pool = block("192.168.1.0/24");
        let requests = vec![
            VlsmRequest::new("a", 50),
            VlsmRequest::new("b", 25),
            VlsmRequest::new("c", 10),
        ];
        let plan = allocate(pool, &requests, 100).unwrap();
        assert!(plan.failures.is_empty());
        let got: Vec<String> = plan.allocations.iter().map(|a| a.block.to_string()).collect();
        assert_eq!(got, vec!["192.168.1.0/26", "192.168.1.64/27", "192.168.1.96/28"]);
        for a in &plan.allocations {
            assert!(a.block.host_count() >= AddressCount::Finite(a.requested_hosts + 2));
            assert!(pool.contains_block(&a.block));
            assert_eq!(a.block.network().value() & low_bits(a.block.size_bits()), 0);
        }
        for (i, a) in plan.allocations.iter().enumerate() {
            for b in &plan.allocations[i + 1..] {
                assert!(!a.block.overlaps(&b.block));
            }
            for f in &plan.free {
                assert!(!a.block.overlaps(f));
            }
        }
        let free: Vec<String> = plan.free.iter().map(|b| b.to_string()).collect();
        assert_eq!(free, vec!["192.168.1.112/28", "192.168.1.128/25"]);
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_vlsm_sorts_largest_first_and_is_stable() {
        let requests = vec![
            VlsmRequest::new("small", 10),
            VlsmRequest::new("big", 100),
            VlsmRequest::new("tie1", 10),
        ];
        let plan = allocate(block("10.0.0.0/24"), &requests, 100).unwrap();
        let names: Vec<&str> = plan.allocations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["big", "small", "tie1"]);
    }

    #[test]
    fn test_vlsm_partial_failure() {
        let requests = vec![
            VlsmRequest::new("huge", 500),
            VlsmRequest::new("lan", 100),
            VlsmRequest::new("wan", 2),
            VlsmRequest::new("none", 0),
            VlsmRequest::new("lan2", 120),
        ];
        let plan = allocate(block("10.0.0.0/24"), &requests, 100).unwrap();
        let ok: Vec<String> = plan
            .allocations
            .iter()
            .map(|a| format!("{}={}", a.name, a.block))
            .collect();
        assert_eq!(ok, vec!["lan2=10.0.0.0/25", "lan=10.0.0.128/25"]);
        let failed: Vec<&str> = plan.failures.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(failed, vec!["huge", "wan", "none"]);
        assert!(matches!(
            plan.failures[0].error,
            SubnetError::InsufficientSpace { prefix: 23, .. }
        ));
        assert!(matches!(
            plan.failures[2].error,
            SubnetError::InvalidHostCount { hosts: 0, .. }
        ));
        assert!(plan.free.is_empty());
    }

    #[test]
    fn test_vlsm_fills_pool_with_31s() {
        let requests = vec![VlsmRequest::new("p2p", 2), VlsmRequest::new("uplink", 2)];
        let plan = allocate(block("10.0.0.0/30"), &requests, 100).unwrap();
        let got: Vec<String> = plan.allocations.iter().map(|a| a.block.to_string()).collect();
        assert_eq!(got, vec!["10.0.0.0/31", "10.0.0.2/31"]);
        assert!(plan.free.is_empty());
    }

    #[test]
    fn test_place_aligns_cursor() {
        let pool = block("10.0.0.0/24");
        let (first, skipped) = place(pool, &VlsmRequest::new("x", 2), Some(pool.network().value())).unwrap();
        assert_eq!(first.to_string(), "10.0.0.0/31");
        assert_eq!(skipped, None);

        let cursor = Some(first.broadcast().value() + 1);
        let (second, skipped) = place(pool, &VlsmRequest::new("y", 6), cursor).unwrap();
        assert_eq!(second.to_string(), "10.0.0.8/29");
        assert_eq!(skipped, Some(first.broadcast().value() + 1));

        let end = Some(pool.broadcast().value());
        assert!(matches!(
            place(pool, &VlsmRequest::new("z", 6), end),
            Err(SubnetError::InsufficientSpace { prefix: 29, .. })
        ));
        assert!(matches!(
            place(pool, &VlsmRequest::new("z", 1), None),
            Err(SubnetError::InsufficientSpace { prefix: 32, .. })
        ));
    }

    #[test]
    fn test_vlsm_caps_output() {
        let requests = vec![VlsmRequest::new("a", 1), VlsmRequest::new("b", 1)];
        assert_eq!(
            allocate(block("10.0.0.0/24"), &requests, 1),
            Err(SubnetError::ResultTooLarge { limit: 1 })
        );
        // Two /32s leave a free list of seven blocks.
        assert_eq!(
            allocate(block("10.0.0.0/24"), &requests, 6),
            Err(SubnetError::ResultTooLarge { limit: 6 })
        );
        assert_eq!(allocate(block("10.0.0.0/24"), &requests, 7).unwrap().free.len(), 7);
    }

    #[test]
    fn test_vlsm_ipv6_pool() {
        let requests = vec![VlsmRequest::new("a", 256), VlsmRequest::new("b", 1)];
        let plan = allocate(block("2001:db8::/120"), &requests, 100).unwrap();
        assert_eq!(plan.allocations[0].block.to_string(), "2001:db8::/120");
        assert_eq!(plan.failures.len(), 1);
    }
}
