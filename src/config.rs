//! Runtime configuration
//!
//! Every setting can come from a flag or an environment variable; flags win.

use crate::console::DEFAULT_MAX_INPUT_LEN;
use crate::exchange::{ExchangeLimits, DEFAULT_MAX_ACTIVE_CALLS};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_MAX_ENTRIES: usize = 20;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "phone-exchange", version, about = "Interactive telephone exchange")]
pub struct Config {
    /// Phone directory file
    #[arg(long, env = "PHONE_EXCHANGE_DIRECTORY", default_value = "phones.txt")]
    pub directory: PathBuf,

    /// Entries accepted from the directory file before the rest is skipped
    #[arg(long, env = "PHONE_EXCHANGE_MAX_ENTRIES", default_value_t = DEFAULT_MAX_ENTRIES)]
    pub max_entries: usize,

    /// Longest command line accepted before truncation
    #[arg(long = "max-input", env = "PHONE_EXCHANGE_MAX_INPUT", default_value_t = DEFAULT_MAX_INPUT_LEN)]
    pub max_input_len: usize,

    /// Simultaneous calls the exchange will carry
    #[arg(long = "max-calls", env = "PHONE_EXCHANGE_MAX_CALLS", default_value_t = DEFAULT_MAX_ACTIVE_CALLS)]
    pub max_active_calls: usize,

    #[arg(long, env = "PHONE_EXCHANGE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn limits(&self) -> ExchangeLimits {
        ExchangeLimits {
            max_active_calls: self.max_active_calls,
        }
    }
}
