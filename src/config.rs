//! Runtime configuration for the command line tool.
//!
//! Values come from a `.env` file and the environment; command line flags
//! override them. The engine itself takes no configuration.

use crate::output::OutputFormat;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;

pub const DEFAULT_MAX_ITEMS: usize = 65_536;
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

pub const ENV_MAX_ITEMS: &str = "SUBNET_SUMMARY_MAX_ITEMS";
pub const ENV_FORMAT: &str = "SUBNET_SUMMARY_FORMAT";
pub const ENV_LOG_CONFIG: &str = "SUBNET_SUMMARY_LOG_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ceiling for every bulk result (split, aggregate, gaps, hosts).
    pub max_items: usize,
    pub format: OutputFormat,
    /// log4rs YAML file; a console logger is used when it does not exist.
    pub log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_items: DEFAULT_MAX_ITEMS,
            format: OutputFormat::Text,
            log_config: DEFAULT_LOG_CONFIG.to_string(),
        }
    }
}

impl Config {
    /// Load `.env` (if any) and read the environment.
    pub fn load() -> Result<Config, Box<dyn Error>> {
        dotenv::dotenv().ok();
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, so tests need not touch the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(value) = lookup(ENV_MAX_ITEMS) {
            config.max_items = value
                .trim()
                .replace('_', "")
                .parse()
                .map_err(|e| format!("{ENV_MAX_ITEMS}='{value}': {e}"))?;
        }
        if let Some(value) = lookup(ENV_FORMAT) {
            config.format = value
                .parse()
                .map_err(|e| format!("{ENV_FORMAT}: {e}"))?;
        }
        if let Some(value) = lookup(ENV_LOG_CONFIG) {
            config.log_config = value;
        }
        Ok(config)
    }

    /// Apply command line overrides.
    pub fn with_overrides(
        mut self,
        max_items: Option<usize>,
        format: Option<OutputFormat>,
        log_config: Option<String>,
    ) -> Config {
        if let Some(max_items) = max_items {
            self.max_items = max_items;
        }
        if let Some(format) = format {
            self.format = format;
        }
        if let Some(log_config) = log_config {
            self.log_config = log_config;
        }
        self
    }
}

/// Initialize log4rs from `path`, or log warnings to stderr when the file
/// is missing. Logs never go to stdout, which carries the results.
pub fn init_logging(path: &str) -> Result<(), Box<dyn Error>> {
    if Path::new(path).exists() {
        log4rs::init_file(path, Default::default())?;
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = log4rs::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    log::debug!("{path} not found, logging warnings to stderr");
    Ok(())
}
