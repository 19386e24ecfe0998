//! Distance between two addresses.

use crate::error::Result;
use crate::models::{Address, AddressCount};

/// `|b - a|`, plus one when `inclusive` and the addresses differ.
///
/// Inclusive distance across the whole IPv6 space is 2^128, so the result
/// is an [`AddressCount`].
pub fn distance(a: Address, b: Address, inclusive: bool) -> Result<AddressCount> {
    a.ensure_same_version(&b)?;
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    if low == high {
        return Ok(AddressCount::ZERO);
    }
    if inclusive {
        Ok(AddressCount::span(low.value(), high.value()))
    } else {
        Ok(AddressCount::Finite(high.value() - low.value()))
    }
}
