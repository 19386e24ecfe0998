//! Error taxonomy for the range engine.
//!
//! Every fallible operation returns [`SubnetError`]. Parsing errors carry the
//! offending input so batch callers can report them per line.

use crate::models::IpVersion;
use thiserror::Error;

/// Errors returned by address parsing and range operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubnetError {
    #[error("invalid address '{input}': bad token '{token}'")]
    InvalidAddressSyntax { input: String, token: String },

    #[error("invalid prefix length {prefix} for {version} (allowed 0..={max})")]
    InvalidPrefix {
        prefix: u32,
        version: IpVersion,
        max: u8,
    },

    #[error("invalid CIDR '{input}': {reason}")]
    InvalidCidrSyntax { input: String, reason: String },

    #[error("invalid range '{input}': {reason}")]
    InvalidRangeSyntax { input: String, reason: String },

    #[error("invalid netmask '{input}': bits are not contiguous")]
    InvalidMask { input: String },

    #[error("prefix /{target} is not inside /{prefix} (max /{max})")]
    PrefixNotDescendant { prefix: u8, target: u8, max: u8 },

    #[error("cannot mix {left} and {right} in one operation")]
    VersionMismatch { left: IpVersion, right: IpVersion },

    #[error("not enough space for '{name}': needs a /{prefix}")]
    InsufficientSpace { name: String, prefix: u8 },

    #[error("invalid request '{input}': {reason}")]
    InvalidRequestSyntax { input: String, reason: String },

    #[error("invalid host count {hosts} for '{name}'")]
    InvalidHostCount { name: String, hosts: u128 },

    #[error("invalid count {count}")]
    InvalidCount { count: u128 },

    #[error("result exceeds the limit of {limit} items")]
    ResultTooLarge { limit: usize },

    #[error("no input items")]
    EmptyInput,
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SubnetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = SubnetError::InvalidPrefix {
            prefix: 33,
            version: IpVersion::V4,
            max: 32,
        };
        assert_eq!(
            e.to_string(),
            "invalid prefix length 33 for IPv4 (allowed 0..=32)"
        );
        let e = SubnetError::ResultTooLarge { limit: 16 };
        assert_eq!(e.to_string(), "result exceeds the limit of 16 items");
    }
}
