//! IPv4/IPv6 CIDR range engine.
//!
//! Parses addresses, ranges and blocks, and splits, aggregates, allocates
//! and compares them with exact 128-bit arithmetic.
//! - [`models`] - Addresses, blocks, ranges and their parsing
//! - [`processing`] - Operations over the models
//! - [`output`] - Text, CSV and JSON rendering
//! - [`cli`] and [`config`] - The `subnet-summary` command line tool

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use error::{Result, SubnetError};
