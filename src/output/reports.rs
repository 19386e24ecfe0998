//! Tabular views of engine results.

use super::Report;
use crate::models::{Address, AddressCount, Block, LineFailure, SubnetInfo};
use crate::processing::{
    AggregateMode, Aggregation, AlignmentBatch, Containment, OverlapConflict, SetResult,
    SplitOutcome, Supernet, VlsmPlan,
};
use serde::Serialize;

fn failure_notes(failures: &[LineFailure]) -> Vec<String> {
    failures
        .iter()
        .map(|f| format!("line {}: skipped '{}': {}", f.line, f.input, f.error))
        .collect()
}

fn block_row(block: &Block) -> Vec<String> {
    vec![
        block.to_string(),
        block.network().to_string(),
        block.broadcast().to_string(),
        block.host_count().to_string(),
    ]
}

const BLOCK_HEADER: [&str; 4] = ["block", "network", "last", "addresses"];

impl Report for SubnetInfo {
    fn title(&self) -> String {
        format!("{} {}", self.version, self.cidr)
    }

    fn header(&self) -> Vec<&'static str> {
        vec!["field", "value"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let fields = [
            ("network", self.network.to_string()),
            ("broadcast", self.broadcast.to_string()),
            ("netmask", self.netmask.to_string()),
            ("wildcard", self.wildcard.to_string()),
            ("prefix", self.prefix.to_string()),
            ("first_usable", self.first_usable.to_string()),
            ("last_usable", self.last_usable.to_string()),
            ("addresses", self.host_count.to_string()),
            ("usable_hosts", self.usable_hosts.to_string()),
        ];
        fields
            .into_iter()
            .map(|(k, v)| vec![k.to_string(), v])
            .collect()
    }
}

impl Report for SplitOutcome {
    fn title(&self) -> String {
        if self.requested == self.rounded {
            format!("{} subnets", self.rounded)
        } else {
            format!("{} subnets ({} requested)", self.rounded, self.requested)
        }
    }

    fn header(&self) -> Vec<&'static str> {
        BLOCK_HEADER.to_vec()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.blocks.iter().map(block_row).collect()
    }
}

impl Report for Aggregation {
    fn title(&self) -> String {
        match self.mode {
            AggregateMode::Ranges => format!("{} merged ranges", self.ranges.len()),
            AggregateMode::Cidr => format!("{} blocks", self.blocks.len()),
            AggregateMode::TargetPrefix(p) => format!("{} blocks at /{p}", self.blocks.len()),
        }
    }

    fn header(&self) -> Vec<&'static str> {
        match self.mode {
            AggregateMode::Ranges => vec!["start", "end", "addresses"],
            _ => BLOCK_HEADER.to_vec(),
        }
    }

    fn rows(&self) -> Vec<Vec<String>> {
        match self.mode {
            AggregateMode::Ranges => self
                .ranges
                .iter()
                .map(|r| vec![r.start().to_string(), r.end().to_string(), r.len().to_string()])
                .collect(),
            _ => self.blocks.iter().map(block_row).collect(),
        }
    }

    fn notes(&self) -> Vec<String> {
        let mut notes: Vec<String> = self
            .misaligned
            .iter()
            .map(|b| format!("{b} is smaller than the target prefix"))
            .collect();
        notes.extend(failure_notes(&self.failures));
        notes
    }
}

impl Report for Supernet {
    fn title(&self) -> String {
        format!("supernet {}", self.block)
    }

    fn header(&self) -> Vec<&'static str> {
        vec!["block", "covered", "extra"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.block.to_string(),
            self.covered.to_string(),
            self.extra.to_string(),
        ]]
    }
}

impl Report for VlsmPlan {
    fn title(&self) -> String {
        format!(
            "{} allocated from {}, {} failed",
            self.allocations.len(),
            self.pool,
            self.failures.len()
        )
    }

    fn header(&self) -> Vec<&'static str> {
        vec!["name", "hosts", "block", "usable", "first", "last"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = self
            .allocations
            .iter()
            .map(|a| {
                vec![
                    a.name.clone(),
                    a.requested_hosts.to_string(),
                    a.block.to_string(),
                    a.usable_hosts.to_string(),
                    a.block.first_usable().to_string(),
                    a.block.last_usable().to_string(),
                ]
            })
            .collect();
        rows.extend(self.free.iter().map(|b| {
            vec![
                "-free-".to_string(),
                String::new(),
                b.to_string(),
                b.usable_host_count().to_string(),
                b.first_usable().to_string(),
                b.last_usable().to_string(),
            ]
        }));
        rows
    }

    fn notes(&self) -> Vec<String> {
        let mut notes: Vec<String> = self
            .failures
            .iter()
            .map(|f| format!("{} ({} hosts): {}", f.name, f.requested_hosts, f.error))
            .collect();
        notes.extend(self.skipped.iter().map(|r| format!("skipped {r} for alignment")));
        notes
    }
}

impl Report for SetResult {
    fn title(&self) -> String {
        format!("{} blocks", self.blocks.len())
    }

    fn header(&self) -> Vec<&'static str> {
        BLOCK_HEADER.to_vec()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.blocks.iter().map(block_row).collect()
    }
}

/// Containment checks of the second operand against the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContainmentReport(pub Vec<Containment>);

impl Report for ContainmentReport {
    fn title(&self) -> String {
        let inside = self.0.iter().filter(|c| c.contained).count();
        format!("{inside} of {} blocks contained", self.0.len())
    }

    fn header(&self) -> Vec<&'static str> {
        vec!["block", "contained"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .iter()
            .map(|c| vec![c.block.to_string(), c.contained.to_string()])
            .collect()
    }
}

/// Free blocks of one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapReport {
    pub container: Block,
    pub gaps: Vec<Block>,
}

impl Report for GapReport {
    fn title(&self) -> String {
        format!("{} gaps in {}", self.gaps.len(), self.container)
    }

    fn header(&self) -> Vec<&'static str> {
        BLOCK_HEADER.to_vec()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.gaps.iter().map(block_row).collect()
    }
}

/// Overlapping pairs among one list of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConflictReport(pub Vec<OverlapConflict>);

impl Report for ConflictReport {
    fn title(&self) -> String {
        format!("{} overlapping pairs", self.0.len())
    }

    fn header(&self) -> Vec<&'static str> {
        vec!["first", "second", "shared_start", "shared_end"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .iter()
            .map(|c| {
                vec![
                    c.first.to_string(),
                    c.second.to_string(),
                    c.shared.start().to_string(),
                    c.shared.end().to_string(),
                ]
            })
            .collect()
    }
}

impl Report for AlignmentBatch {
    fn title(&self) -> String {
        let misaligned = self.reports.iter().filter(|r| !r.aligned).count();
        format!("{misaligned} of {} misaligned", self.reports.len())
    }

    fn header(&self) -> Vec<&'static str> {
        vec!["entry", "target", "aligned", "lower", "upper"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let show = |a: &Option<Address>| a.map(|a| a.to_string()).unwrap_or_default();
        self.reports
            .iter()
            .map(|r| {
                vec![
                    format!("{}/{}", r.address, r.prefix),
                    format!("/{}", r.target_prefix),
                    r.aligned.to_string(),
                    show(&r.lower),
                    show(&r.upper),
                ]
            })
            .collect()
    }

    fn notes(&self) -> Vec<String> {
        failure_notes(&self.failures)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistanceReport {
    pub from: Address,
    pub to: Address,
    pub inclusive: bool,
    pub distance: AddressCount,
}

impl Report for DistanceReport {
    fn title(&self) -> String {
        format!("distance {} -> {}", self.from, self.to)
    }

    fn header(&self) -> Vec<&'static str> {
        vec!["from", "to", "inclusive", "distance"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.from.to_string(),
            self.to.to_string(),
            self.inclusive.to_string(),
            self.distance.to_string(),
        ]]
    }
}

/// Addresses of one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostList {
    pub block: Block,
    pub addresses: Vec<Address>,
}

impl Report for HostList {
    fn title(&self) -> String {
        format!("{} addresses in {}", self.addresses.len(), self.block)
    }

    fn header(&self) -> Vec<&'static str> {
        vec!["address"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.addresses.iter().map(|a| vec![a.to_string()]).collect()
    }
}
