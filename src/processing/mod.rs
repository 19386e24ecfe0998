//! Range engine operations.
//!
//! This module contains the calculations built on the models:
//! - [`split`] - Splitting a block into equal children
//! - [`aggregate`] - Merging inputs into minimal CIDR lists
//! - [`supernet`] - Smallest enclosing block
//! - [`vlsm`] - Variable length subnet allocation
//! - [`set_ops`] - Difference, intersection and containment
//! - [`gap_finder`] - Free blocks inside a container
//! - [`conflicts`] - Overlapping blocks in one list
//! - [`alignment`] - Boundary checks against a target prefix
//! - [`distance`] - Address distance
//! - [`enumerate`] - Capped address listing

mod aggregate;
mod alignment;
mod conflicts;
mod distance;
mod enumerate;
mod gap_finder;
mod set_ops;
mod split;
mod supernet;
mod vlsm;

// Re-export public functions
pub use aggregate::{
    aggregate, aggregate_lines, collect_capped, range_to_blocks, ranges_to_blocks, AggregateMode,
    Aggregation, RangeBlocks,
};
pub use alignment::{check_alignment, check_alignment_lines, AlignmentBatch, AlignmentReport};
pub use conflicts::{log_overlapping_blocks, overlapping_pairs, OverlapConflict};
pub use distance::distance;
pub use enumerate::{enumerate_addresses, enumerate_range, host_addresses};
pub use gap_finder::find_gaps;
pub use set_ops::{containment, diff, overlap, Containment, SetResult};
pub use split::{split_by_count, split_by_prefix, SplitOutcome};
pub use supernet::{common_prefix_len, find_supernet, Supernet};
pub use vlsm::{allocate, prefix_for_hosts, Allocation, VlsmFailure, VlsmPlan, VlsmRequest};
