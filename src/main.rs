use std::error::Error;
use subnet_summary::cli::{run, CommandLine};
use subnet_summary::config::{init_logging, Config};

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    let cli = CommandLine::parse_args();
    let config = Config::load()?.with_overrides(cli.max_items, cli.format, cli.log_config.clone());
    init_logging(&config.log_config)?;
    log::info!("#Start main()");

    let output = run(cli.command, &config)?;
    println!("{output}");
    Ok(())
}
