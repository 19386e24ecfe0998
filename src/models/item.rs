//! Input lines: addresses, `start-end` ranges and CIDR blocks.

use super::address::{ensure_version, Address, IpVersion};
use super::block::Block;
use super::range::AddressRange;
use crate::error::{Result, SubnetError};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::str::FromStr;

/// One parsed input token.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputItem {
    Address(Address),
    Range(AddressRange),
    Block(Block),
}

impl InputItem {
    pub fn version(&self) -> IpVersion {
        match self {
            InputItem::Address(a) => a.version(),
            InputItem::Range(r) => r.version(),
            InputItem::Block(b) => b.version(),
        }
    }

    pub fn to_range(&self) -> AddressRange {
        match self {
            InputItem::Address(a) => AddressRange::single(*a),
            InputItem::Range(r) => *r,
            InputItem::Block(b) => b.to_range(),
        }
    }
}

impl FromStr for InputItem {
    type Err = SubnetError;

    fn from_str(s: &str) -> Result<InputItem> {
        let text = s.trim();
        if text.contains('/') {
            text.parse().map(InputItem::Block)
        } else if text.contains('-') {
            text.parse().map(InputItem::Range)
        } else {
            text.parse().map(InputItem::Address)
        }
    }
}

impl std::fmt::Display for InputItem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            InputItem::Address(a) => write!(f, "{a}"),
            InputItem::Range(r) => write!(f, "{r}"),
            InputItem::Block(b) => write!(f, "{b}"),
        }
    }
}

impl From<Block> for InputItem {
    fn from(b: Block) -> Self {
        InputItem::Block(b)
    }
}

impl From<Address> for InputItem {
    fn from(a: Address) -> Self {
        InputItem::Address(a)
    }
}

impl From<AddressRange> for InputItem {
    fn from(r: AddressRange) -> Self {
        InputItem::Range(r)
    }
}

/// A batch entry that failed to parse or process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineFailure {
    /// 1-based line number, 0 when the entry did not come from text.
    pub line: usize,
    pub input: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: SubnetError,
}

pub(crate) fn serialize_error<S>(error: &SubnetError, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(error)
}

/// Items parsed from a batch, with their line numbers, plus the failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedLines {
    pub items: Vec<(usize, InputItem)>,
    pub failures: Vec<LineFailure>,
}

impl ParsedLines {
    pub fn items(&self) -> Vec<InputItem> {
        self.items.iter().map(|(_, item)| *item).collect()
    }
}

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"#.*$").expect("Invalid Regex?");
    static ref RANGE_DASH: Regex = Regex::new(r"\s*-\s*").expect("Invalid Regex?");
    static ref SEPARATOR: Regex = Regex::new(r"[\s,;]+").expect("Invalid Regex?");
}

/// Tokens of one line: comment stripped, `a - b` joined to `a-b`, split on
/// whitespace, commas and semicolons.
pub(crate) fn split_tokens(line: &str) -> Vec<String> {
    let line = COMMENT.replace(line, "");
    let line = RANGE_DASH.replace_all(&line, "-");
    SEPARATOR
        .split(line.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a newline separated batch. Every token is parsed on its own so one
/// bad entry never hides the rest.
pub fn parse_lines(text: &str) -> ParsedLines {
    let mut parsed = ParsedLines::default();
    for (i, line) in text.lines().enumerate() {
        for token in split_tokens(line) {
            match token.parse::<InputItem>() {
                Ok(item) => parsed.items.push((i + 1, item)),
                Err(error) => parsed.failures.push(LineFailure {
                    line: i + 1,
                    input: token,
                    error,
                }),
            }
        }
    }
    parsed
}

/// Parse every string, failing on the first bad one.
pub fn parse_items<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<InputItem>> {
    inputs.iter().map(|s| s.as_ref().parse()).collect()
}

/// The family shared by all items; `None` for no items.
pub fn common_version<'a, I>(items: I) -> Result<Option<IpVersion>>
where
    I: IntoIterator<Item = &'a InputItem>,
{
    let mut version = None;
    for item in items {
        match version {
            None => version = Some(item.version()),
            Some(v) => ensure_version(v, item.version())?,
        }
    }
    Ok(version)
}
