//! CLI interface and argument parsing
//!
//! This module provides the `pii-presidio-info` command-line interface using
//! clap. Every subcommand shares the options in [`CommonArgs`].

pub mod commands;

use crate::config::ConfigSource;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Show information about the PII tasks available through Presidio
#[derive(Parser, Debug)]
#[command(name = "pii-presidio-info")]
#[command(version, about, long_about = None)]
#[command(author = "PIISA Contributors")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information for components
    Version(commands::version::VersionArgs),

    /// Information about recognizers available in Presidio
    PresidioRecognizers(commands::recognizers::RecognizersArgs),

    /// Information about entities defined in Presidio
    PresidioEntities(commands::entities::EntitiesArgs),

    /// Information about PII tasks defined via Presidio
    PiiEntities(commands::pii_entities::PiiEntitiesArgs),
}

impl Commands {
    /// Options shared by every subcommand
    pub fn common(&self) -> &CommonArgs {
        match self {
            Self::Version(args) => &args.common,
            Self::PresidioRecognizers(args) => &args.common,
            Self::PresidioEntities(args) => &args.common,
            Self::PiiEntities(args) => &args.common,
        }
    }
}

/// Configuration and runtime options
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Add plugin configuration file(s), merged in order over the defaults
    #[arg(long, num_args = 1..)]
    pub config: Vec<PathBuf>,

    /// Language(s) to select
    #[arg(long, num_args = 1..)]
    pub lang: Vec<String>,

    /// Debug mode
    #[arg(long)]
    pub debug: bool,

    /// Propagate errors out of the program instead of just printing them
    #[arg(long)]
    pub reraise: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PII_PRESIDIO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CommonArgs {
    /// The configuration override given on the command line
    pub fn config_source(&self) -> Option<ConfigSource> {
        match self.config.as_slice() {
            [] => None,
            [single] => Some(ConfigSource::Path(single.clone())),
            many => Some(ConfigSource::Paths(many.to_vec())),
        }
    }

    /// Log level to initialise logging with
    pub fn effective_log_level(&self) -> &str {
        match (&self.log_level, self.debug) {
            (Some(level), _) => level.as_str(),
            (None, true) => "info",
            (None, false) => "warn",
        }
    }
}
