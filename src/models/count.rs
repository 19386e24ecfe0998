//! Exact address counts.
//!
//! A block or range can hold up to 2^128 addresses, one more than `u128`
//! can represent, so counts get their own type.

use serde::Serialize;

/// Number of addresses, exact over `0..=2^128`.
///
/// Variant order gives the right ordering: every `Finite` is below `AllIpv6`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressCount {
    Finite(u128),
    /// 2^128, the whole IPv6 space.
    AllIpv6,
}

const TWO_POW_128: &str = "340282366920938463463374607431768211456";

impl AddressCount {
    pub const ZERO: AddressCount = AddressCount::Finite(0);

    /// 2^exp for `exp <= 128`; larger exponents saturate at 2^128.
    pub fn power_of_two(exp: u8) -> AddressCount {
        if exp >= 128 {
            AddressCount::AllIpv6
        } else {
            AddressCount::Finite(1u128 << exp)
        }
    }

    /// Number of addresses in the inclusive span `start..=end`.
    pub fn span(start: u128, end: u128) -> AddressCount {
        match (end - start).checked_add(1) {
            Some(n) => AddressCount::Finite(n),
            None => AddressCount::AllIpv6,
        }
    }

    pub fn to_u128(self) -> Option<u128> {
        match self {
            AddressCount::Finite(n) => Some(n),
            AddressCount::AllIpv6 => None,
        }
    }

    pub fn is_zero(self) -> bool {
        self == AddressCount::ZERO
    }

    pub fn checked_add(self, other: AddressCount) -> Option<AddressCount> {
        match (self, other) {
            (AddressCount::Finite(a), AddressCount::Finite(b)) => match a.overflowing_add(b) {
                (sum, false) => Some(AddressCount::Finite(sum)),
                (0, true) => Some(AddressCount::AllIpv6),
                _ => None,
            },
            (AddressCount::AllIpv6, AddressCount::Finite(0))
            | (AddressCount::Finite(0), AddressCount::AllIpv6) => Some(AddressCount::AllIpv6),
            _ => None,
        }
    }

    pub fn checked_sub(self, other: AddressCount) -> Option<AddressCount> {
        match (self, other) {
            (AddressCount::Finite(a), AddressCount::Finite(b)) => {
                a.checked_sub(b).map(AddressCount::Finite)
            }
            (AddressCount::AllIpv6, AddressCount::AllIpv6) => Some(AddressCount::ZERO),
            (AddressCount::AllIpv6, AddressCount::Finite(0)) => Some(AddressCount::AllIpv6),
            // 2^128 - b == (u128::MAX - b) + 1
            (AddressCount::AllIpv6, AddressCount::Finite(b)) => {
                Some(AddressCount::Finite(u128::MAX - b + 1))
            }
            (AddressCount::Finite(_), AddressCount::AllIpv6) => None,
        }
    }

    pub fn saturating_sub(self, n: u128) -> AddressCount {
        self.checked_sub(AddressCount::Finite(n))
            .unwrap_or(AddressCount::ZERO)
    }
}

impl From<u128> for AddressCount {
    fn from(n: u128) -> Self {
        AddressCount::Finite(n)
    }
}

impl std::fmt::Display for AddressCount {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AddressCount::Finite(n) => write!(f, "{n}"),
            AddressCount::AllIpv6 => write!(f, "{TWO_POW_128}"),
        }
    }
}

// Counts go out as decimal strings; JSON numbers lose precision past 2^53.
impl Serialize for AddressCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_of_two() {
        assert_eq!(AddressCount::power_of_two(0), AddressCount::Finite(1));
        assert_eq!(AddressCount::power_of_two(8), AddressCount::Finite(256));
        assert_eq!(AddressCount::power_of_two(128), AddressCount::AllIpv6);
        assert_eq!(
            AddressCount::power_of_two(128).to_string(),
            "340282366920938463463374607431768211456"
        );
    }

    #[test]
    fn test_add_reaches_full_space() {
        let half = AddressCount::power_of_two(127);
        assert_eq!(half.checked_add(half), Some(AddressCount::AllIpv6));
        assert_eq!(
            AddressCount::AllIpv6.checked_add(AddressCount::Finite(1)),
            None
        );
        assert_eq!(
            AddressCount::Finite(2).checked_add(AddressCount::Finite(3)),
            Some(AddressCount::Finite(5))
        );
    }

    #[test]
    fn test_sub() {
        assert_eq!(
            AddressCount::AllIpv6.checked_sub(AddressCount::Finite(1)),
            Some(AddressCount::Finite(u128::MAX))
        );
        assert_eq!(AddressCount::Finite(1).saturating_sub(2), AddressCount::ZERO);
        assert_eq!(
            AddressCount::Finite(256).saturating_sub(2),
            AddressCount::Finite(254)
        );
    }

    #[test]
    fn test_span_and_order() {
        assert_eq!(AddressCount::span(0, u128::MAX), AddressCount::AllIpv6);
        assert_eq!(AddressCount::span(5, 5), AddressCount::Finite(1));
        assert!(AddressCount::Finite(u128::MAX) < AddressCount::AllIpv6);
    }
}
