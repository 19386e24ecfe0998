//! Boundary alignment checks against a target prefix length.

use crate::error::Result;
use crate::models::{
    check_prefix, low_bits, parse_cidr_parts, split_tokens, Address, LineFailure,
};
use serde::Serialize;

/// Alignment of one `address/prefix` entry, as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentReport {
    pub address: Address,
    pub prefix: u8,
    pub target_prefix: u8,
    pub aligned: bool,
    /// Nearest boundary at or below the address, when misaligned.
    pub lower: Option<Address>,
    /// Nearest boundary above the address; `None` past the end of the space.
    pub upper: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentBatch {
    pub reports: Vec<AlignmentReport>,
    pub failures: Vec<LineFailure>,
}

fn check_entry(address: Address, prefix: u8, target_prefix: u8) -> Result<AlignmentReport> {
    let target = check_prefix(address.version(), target_prefix as u32)?;
    let host_bits = low_bits(address.width() - target);
    let value = address.value();
    let aligned = value & host_bits == 0;
    let (lower, upper) = if aligned {
        (None, None)
    } else {
        let lower = value & !host_bits;
        let upper = lower
            .checked_add(host_bits)
            .and_then(|v| v.checked_add(1))
            .and_then(|v| Address::new(address.version(), v));
        (Address::new(address.version(), lower), upper)
    };
    Ok(AlignmentReport {
        address,
        prefix,
        target_prefix: target,
        aligned,
        lower,
        upper,
    })
}

/// Check every `(address, prefix)` entry against `target_prefix`.
///
/// Misalignment is reported, not an error; a target the family cannot
/// hold is.
pub fn check_alignment(entries: &[(Address, u8)], target_prefix: u8) -> Result<Vec<AlignmentReport>> {
    entries
        .iter()
        .map(|&(address, prefix)| check_entry(address, prefix, target_prefix))
        .collect()
}

/// Check a newline separated batch of `address/prefix` or bare addresses.
/// Host bits are kept as written.
pub fn check_alignment_lines(text: &str, target_prefix: u8) -> AlignmentBatch {
    let mut batch = AlignmentBatch::default();
    for (i, line) in text.lines().enumerate() {
        for token in split_tokens(line) {
            let entry = if token.contains('/') {
                parse_cidr_parts(&token)
            } else {
                token.parse::<Address>().map(|a| (a, a.width()))
            };
            match entry.and_then(|(address, prefix)| check_entry(address, prefix, target_prefix)) {
                Ok(report) => batch.reports.push(report),
                Err(error) => {
                    log::debug!("line {}: skipping '{token}': {error}", i + 1);
                    batch.failures.push(LineFailure {
                        line: i + 1,
                        input: token,
                        error,
                    });
                }
            }
        }
    }
    log::debug!(
        "alignment /{target_prefix}: {} checked, {} misaligned, {} failed",
        batch.reports.len(),
        batch.reports.iter().filter(|r| !r.aligned).count(),
        batch.failures.len()
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubnetError;

    fn entry(s: &str) -> (Address, u8) {
        parse_cidr_parts(s).unwrap()
    }

    #[test]
    fn test_aligned_and_misaligned() {
        let reports =
            check_alignment(&[entry("10.0.0.0/24"), entry("10.0.0.5/24"), entry("10.0.1.0/24")], 23)
                .unwrap();
        assert!(reports[0].aligned);
        assert_eq!(reports[0].lower, None);

        assert!(!reports[1].aligned);
        assert_eq!(reports[1].address.to_string(), "10.0.0.5");
        assert_eq!(reports[1].prefix, 24);
        assert_eq!(reports[1].lower.unwrap().to_string(), "10.0.0.0");
        assert_eq!(reports[1].upper.unwrap().to_string(), "10.0.2.0");

        assert!(!reports[2].aligned);
        assert_eq!(reports[2].lower.unwrap().to_string(), "10.0.0.0");
    }

    #[test]
    fn test_upper_past_end_of_space() {
        let reports = check_alignment(&[entry("255.255.255.255/32")], 24).unwrap();
        assert_eq!(reports[0].lower.unwrap().to_string(), "255.255.255.0");
        assert_eq!(reports[0].upper, None);

        let reports = check_alignment(&[entry("ffff::1/128")], 0).unwrap();
        assert_eq!(reports[0].lower.unwrap().to_string(), "::");
        assert_eq!(reports[0].upper, None);
    }

    #[test]
    fn test_aligned_in_both_families() {
        let reports = check_alignment(&[entry("10.0.0.7/32"), entry("2001:db8::/64")], 32).unwrap();
        assert!(reports[0].aligned);
        assert!(reports[1].aligned);
    }

    #[test]
    fn test_invalid_target() {
        assert!(matches!(
            check_alignment(&[entry("10.0.0.0/8")], 33),
            Err(SubnetError::InvalidPrefix { prefix: 33, .. })
        ));
        assert!(check_alignment(&[entry("2001:db8::/32")], 33).is_ok());
    }

    #[test]
    fn test_alignment_lines() {
        let batch = check_alignment_lines("10.0.0.0/24\n10.0.0.64\nbogus/24\n2001:db8::1/64\n", 26);
        assert_eq!(batch.reports.len(), 3);
        assert!(batch.reports[0].aligned);
        assert!(batch.reports[1].aligned);
        assert_eq!(batch.reports[1].prefix, 32);
        assert!(!batch.reports[2].aligned);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].line, 3);
    }
}
