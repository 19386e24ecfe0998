//! Integration tests for subnet-summary
//!
//! These tests run batches from the test data files through the engine and
//! the command line dispatcher.

use subnet_summary::{
    cli::{run, CommandLine},
    config::Config,
    models::{parse_items, Block, InputItem},
    output::OutputFormat,
    processing::{
        aggregate_lines, allocate, check_alignment_lines, diff, find_gaps, overlap,
        overlapping_pairs, split_by_prefix, AggregateMode, VlsmRequest,
    },
    SubnetError,
};

use clap::Parser;

fn read(path: &str) -> String {
    std::fs::read_to_string(path).expect("Failed to read test data")
}

fn texts(blocks: &[Block]) -> Vec<String> {
    blocks.iter().map(|b| b.to_string()).collect()
}

#[test]
fn test_aggregate_batch_file() {
    let text = read("src/tests/test_data/aggregate_batch.txt");
    let result = aggregate_lines(&text, AggregateMode::Cidr, 1000).expect("Failed to aggregate");

    assert_eq!(
        texts(&result.blocks),
        vec!["10.0.0.1/32", "10.0.0.2/31", "192.168.0.0/22", "2001:db8::/32"]
    );
    assert_eq!(result.failures.len(), 1, "Expected one bad line");
    assert_eq!(result.failures[0].line, 7);
    assert_eq!(result.failures[0].input, "not-an-address");
}

#[test]
fn test_split_then_aggregate_round_trip() {
    let parent: Block = "172.16.0.0/20".parse().unwrap();
    let children = split_by_prefix(parent, 26, 1024).expect("Failed to split");
    assert_eq!(children.len(), 64);

    let items: Vec<InputItem> = children.into_iter().map(InputItem::Block).collect();
    let merged = subnet_summary::processing::aggregate(&items, AggregateMode::Cidr, 10).unwrap();
    assert_eq!(merged.blocks, vec![parent]);
}

#[test]
fn test_gaps_from_used_blocks_file() {
    let text = read("src/tests/test_data/used_blocks.txt");
    let used: Vec<Block> = subnet_summary::models::parse_lines(&text)
        .items()
        .into_iter()
        .map(|item| match item {
            InputItem::Block(b) => b,
            other => panic!("unexpected item {other}"),
        })
        .collect();
    assert_eq!(used.len(), 5);

    let gaps = find_gaps("10.20.0.0/16".parse().unwrap(), &used, 100).expect("Failed to find gaps");
    assert_eq!(
        texts(&gaps),
        vec![
            "10.20.1.192/26",
            "10.20.2.0/23",
            "10.20.16.0/20",
            "10.20.32.0/19",
            "10.20.64.0/18",
            "10.20.128.0/17"
        ]
    );
    assert!(overlapping_pairs(&gaps, 100).unwrap().is_empty());
    for gap in &gaps {
        assert!(!used.iter().any(|u| u.overlaps(gap)), "{gap} overlaps a used block");
    }
}

#[test]
fn test_vlsm_plan_leaves_no_overlap() {
    let pool: Block = "10.50.0.0/22".parse().unwrap();
    let requests: Vec<VlsmRequest> = ["web=200", "db=100", "mgmt=20", "p2p=2", "huge=2000"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let plan = allocate(pool, &requests, 100).unwrap();

    assert_eq!(plan.failures.len(), 1);
    assert_eq!(plan.failures[0].name, "huge");
    let mut all: Vec<Block> = plan.allocations.iter().map(|a| a.block).collect();
    all.extend(plan.free.iter().copied());
    assert!(overlapping_pairs(&all, 100).unwrap().is_empty());

    let merged = subnet_summary::processing::aggregate(
        &all.iter().map(|b| InputItem::Block(*b)).collect::<Vec<_>>(),
        AggregateMode::Cidr,
        10,
    )
    .unwrap();
    assert_eq!(merged.blocks, vec![pool], "allocations and free space tile the pool");
}

#[test]
fn test_diff_and_overlap_cover_a() {
    let a = parse_items(&["10.0.0.0/16"]).unwrap();
    let b = parse_items(&["10.0.128.0/17", "10.1.0.0/16", "10.0.3.7"]).unwrap();
    let d = diff(&a, &b, 100).unwrap();
    let o = overlap(&a, &b, 100).unwrap();
    assert_eq!(texts(&o.blocks), vec!["10.0.3.7/32", "10.0.128.0/17"]);
    assert_eq!(d.blocks.len(), 15);
    assert_eq!(d.blocks.first().unwrap().to_string(), "10.0.0.0/23");
    assert_eq!(d.blocks.last().unwrap().to_string(), "10.0.64.0/18");
}

#[test]
fn test_alignment_batch_file() {
    let text = read("src/tests/test_data/align_batch.txt");
    let batch = check_alignment_lines(&text, 22);
    let aligned: Vec<bool> = batch.reports.iter().map(|r| r.aligned).collect();
    assert_eq!(aligned, vec![true, false, true, false]);
    assert_eq!(batch.reports[1].upper.unwrap().to_string(), "10.0.4.0");
    assert_eq!(batch.reports[3].lower.unwrap().to_string(), "2001:c00::");
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].line, 5);
}

#[test]
fn test_cli_aggregate_from_file_json() {
    let cli = CommandLine::try_parse_from([
        "subnet-summary",
        "aggregate",
        "--file",
        "src/tests/test_data/aggregate_batch.txt",
        "--format",
        "json",
    ])
    .expect("Failed to parse arguments");
    let config = Config::default().with_overrides(cli.max_items, cli.format, None);
    assert_eq!(config.format, OutputFormat::Json);

    let out = run(cli.command, &config).expect("Failed to run aggregate");
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["blocks"][2], "192.168.0.0/22");
    assert_eq!(value["failures"][0]["line"], 7);
}

#[test]
fn test_cli_errors_surface() {
    let cli = CommandLine::try_parse_from(["subnet-summary", "info", "10.0.0.5/24", "--strict"]).unwrap();
    assert!(run(cli.command, &Config::default()).is_err());

    let cli = CommandLine::try_parse_from(["subnet-summary", "distance", "10.0.0.1", "::1"]).unwrap();
    let err = run(cli.command, &Config::default()).unwrap_err();
    assert_eq!(err.to_string(), "cannot mix IPv4 and IPv6 in one operation");

    assert_eq!(
        split_by_prefix("10.0.0.0/8".parse().unwrap(), 30, 1024),
        Err(SubnetError::ResultTooLarge { limit: 1024 })
    );
}
