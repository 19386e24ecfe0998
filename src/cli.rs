//! Command line interface.
//!
//! Parses arguments with clap, reads batch input and dispatches to the
//! engine. `run` returns the rendered output so it can be tested.

use crate::config::Config;
use crate::models::{parse_items, Address, Block, HostBitsPolicy, InputItem};
use crate::output::{
    render, ConflictReport, ContainmentReport, DistanceReport, GapReport, HostList, OutputFormat,
};
use crate::processing::{
    aggregate_lines, allocate, check_alignment_lines, containment, diff, distance,
    enumerate_addresses, find_gaps, find_supernet, host_addresses, log_overlapping_blocks, overlap,
    overlapping_pairs, split_by_count, split_by_prefix, AggregateMode, SplitOutcome, VlsmRequest,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "subnet-summary", version)]
#[command(about = "IPv4/IPv6 subnet calculator: split, aggregate, allocate and compare CIDR blocks.")]
pub struct CommandLine {
    /// Output format [env: SUBNET_SUMMARY_FORMAT]
    #[arg(long, short = 'o', global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Most items any command may produce [env: SUBNET_SUMMARY_MAX_ITEMS]
    #[arg(long, global = true)]
    pub max_items: Option<usize>,

    /// log4rs configuration file [env: SUBNET_SUMMARY_LOG_CONFIG]
    #[arg(long, global = true)]
    pub log_config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Items from arguments, or else from a file, or else from stdin.
#[derive(Args, Debug, Clone, Default)]
pub struct BatchInput {
    /// Addresses, ranges (a-b) or CIDR blocks
    pub inputs: Vec<String>,

    /// Read newline separated items from a file ('-' for stdin)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

/// Two item lists for set operations.
#[derive(Args, Debug, Clone)]
pub struct TwoSets {
    /// First operand (A)
    #[arg(required = true)]
    pub left: Vec<String>,

    /// Second operand (B)
    #[arg(long = "other", short = 'b', num_args = 1.., required = true)]
    pub right: Vec<String>,
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ModeArg {
    #[default]
    Cidr,
    Ranges,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show network, broadcast, masks and host counts of a block
    #[command(alias = "i")]
    Info {
        block: String,
        /// Reject blocks with host bits set instead of clearing them
        #[arg(long)]
        strict: bool,
    },
    /// Split a block by prefix length or into N equal parts
    #[command(alias = "s")]
    Split {
        block: Block,
        /// New prefix length
        #[arg(long, short = 'p', required_unless_present = "count", conflicts_with = "count")]
        prefix: Option<u8>,
        /// Number of parts, rounded up to a power of two
        #[arg(long, short = 'n')]
        count: Option<u128>,
    },
    /// Merge addresses, ranges and blocks into a minimal CIDR list
    #[command(alias = "a")]
    Aggregate {
        #[command(flatten)]
        batch: BatchInput,
        #[arg(long, value_enum, default_value_t = ModeArg::Cidr)]
        mode: ModeArg,
        /// Re-split the result to this prefix length
        #[arg(long, conflicts_with = "mode")]
        target_prefix: Option<u8>,
    },
    /// Smallest block containing every input
    Supernet {
        #[command(flatten)]
        batch: BatchInput,
    },
    /// Allocate named host counts (name=hosts) from a pool, largest first
    Vlsm {
        pool: Block,
        #[arg(required = true)]
        requests: Vec<VlsmRequest>,
    },
    /// Addresses of A not in B
    Diff {
        #[command(flatten)]
        sets: TwoSets,
    },
    /// Addresses in both A and B
    Overlap {
        #[command(flatten)]
        sets: TwoSets,
    },
    /// Whether each block of B lies inside A
    Contains {
        #[command(flatten)]
        sets: TwoSets,
    },
    /// Free blocks of a container not covered by the used blocks
    Gaps {
        container: Block,
        #[command(flatten)]
        batch: BatchInput,
    },
    /// Check entries against a prefix boundary
    Align {
        /// Target prefix length
        #[arg(long, short = 'p')]
        target: u8,
        #[command(flatten)]
        batch: BatchInput,
    },
    /// Distance between two addresses
    Distance {
        from: Address,
        to: Address,
        /// Count both ends
        #[arg(long)]
        inclusive: bool,
    },
    /// Pairs of blocks that overlap each other
    Conflicts {
        #[command(flatten)]
        batch: BatchInput,
    },
    /// List the addresses of a block
    Hosts {
        block: Block,
        /// Include network and broadcast addresses
        #[arg(long)]
        all: bool,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl BatchInput {
    /// The batch as newline separated text.
    pub fn read_text(&self) -> Result<String, Box<dyn Error>> {
        if !self.inputs.is_empty() {
            return Ok(self.inputs.join("\n"));
        }
        let mut text = String::new();
        match &self.file {
            Some(path) if path.as_os_str() != "-" => {
                log::debug!("reading items from {}", path.display());
                text = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            }
            _ => {
                log::debug!("reading items from stdin");
                std::io::stdin().read_to_string(&mut text)?;
            }
        }
        Ok(text)
    }

    /// Every item of the batch; the first bad line fails the whole batch.
    pub fn read_items(&self) -> Result<Vec<InputItem>, Box<dyn Error>> {
        let parsed = crate::models::parse_lines(&self.read_text()?);
        if let Some(failure) = parsed.failures.first() {
            return Err(format!("line {}: {}", failure.line, failure.error).into());
        }
        Ok(parsed.items())
    }

    /// Items of the batch that are CIDR blocks, addresses as /32 or /128.
    pub fn read_blocks(&self) -> Result<Vec<Block>, Box<dyn Error>> {
        self.read_items()?
            .into_iter()
            .map(|item| -> Result<Block, Box<dyn Error>> {
                match item {
                    InputItem::Block(block) => Ok(block),
                    InputItem::Address(addr) => Ok(Block::from_address(addr)),
                    InputItem::Range(range) => {
                        Err(format!("expected a CIDR block, got range {range}").into())
                    }
                }
            })
            .collect()
    }
}

impl TwoSets {
    fn items(&self) -> Result<(Vec<InputItem>, Vec<InputItem>), Box<dyn Error>> {
        Ok((parse_items(&self.left)?, parse_items(&self.right)?))
    }
}

/// Run one command and render its result.
pub fn run(command: Commands, config: &Config) -> Result<String, Box<dyn Error>> {
    let format = config.format;
    let max_items = config.max_items;
    log::debug!("run {command:?} (max_items={max_items}, format={format:?})");

    let output = match command {
        Commands::Info { block, strict } => {
            let policy = if strict {
                HostBitsPolicy::Strict
            } else {
                HostBitsPolicy::Normalize
            };
            render(&Block::from_cidr_text(&block, policy)?.info(), format)?
        }
        Commands::Split {
            block,
            prefix,
            count,
        } => {
            let outcome = match (prefix, count) {
                (Some(prefix), _) => {
                    let blocks = split_by_prefix(block, prefix, max_items)?;
                    SplitOutcome {
                        requested: blocks.len() as u128,
                        rounded: blocks.len() as u128,
                        blocks,
                    }
                }
                (None, Some(count)) => split_by_count(block, count, max_items)?,
                (None, None) => return Err("split needs --prefix or --count".into()),
            };
            render(&outcome, format)?
        }
        Commands::Aggregate {
            batch,
            mode,
            target_prefix,
        } => {
            let mode = match (target_prefix, mode) {
                (Some(p), _) => AggregateMode::TargetPrefix(p),
                (None, ModeArg::Ranges) => AggregateMode::Ranges,
                (None, ModeArg::Cidr) => AggregateMode::Cidr,
            };
            let result = aggregate_lines(&batch.read_text()?, mode, max_items)?;
            for failure in &result.failures {
                log::warn!("line {}: skipped '{}': {}", failure.line, failure.input, failure.error);
            }
            render(&result, format)?
        }
        Commands::Supernet { batch } => render(&find_supernet(&batch.read_items()?)?, format)?,
        Commands::Vlsm { pool, requests } => {
            let plan = allocate(pool, &requests, max_items)?;
            for failure in &plan.failures {
                log::warn!("{}: {}", failure.name, failure.error);
            }
            render(&plan, format)?
        }
        Commands::Diff { sets } => {
            let (a, b) = sets.items()?;
            render(&diff(&a, &b, max_items)?, format)?
        }
        Commands::Overlap { sets } => {
            let (a, b) = sets.items()?;
            render(&overlap(&a, &b, max_items)?, format)?
        }
        Commands::Contains { sets } => {
            let (a, b) = sets.items()?;
            render(&ContainmentReport(containment(&a, &b, max_items)?), format)?
        }
        Commands::Gaps { container, batch } => {
            let used = if batch.inputs.is_empty() && batch.file.is_none() {
                Vec::new()
            } else {
                batch.read_blocks()?
            };
            let gaps = find_gaps(container, &used, max_items)?;
            render(&GapReport { container, gaps }, format)?
        }
        Commands::Align { target, batch } => {
            let result = check_alignment_lines(&batch.read_text()?, target);
            for failure in &result.failures {
                log::warn!("line {}: skipped '{}': {}", failure.line, failure.input, failure.error);
            }
            render(&result, format)?
        }
        Commands::Distance {
            from,
            to,
            inclusive,
        } => {
            let report = DistanceReport {
                from,
                to,
                inclusive,
                distance: distance(from, to, inclusive)?,
            };
            render(&report, format)?
        }
        Commands::Conflicts { batch } => {
            let conflicts = overlapping_pairs(&batch.read_blocks()?, max_items)?;
            log_overlapping_blocks(&conflicts);
            render(&ConflictReport(conflicts), format)?
        }
        Commands::Hosts { block, all } => {
            let addresses = if all {
                enumerate_addresses(block, max_items)?
            } else {
                host_addresses(block, max_items)?
            };
            render(&HostList { block, addresses }, format)?
        }
    };
    Ok(output)
}
