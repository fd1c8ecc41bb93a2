//! Version command implementation

use crate::cli::CommonArgs;
use crate::defs;
use crate::engine::PresidioHttpFactory;
use clap::Args;
use std::io::Write;

/// Arguments for the version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl VersionArgs {
    /// Execute the version command
    pub fn execute(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let backend = PresidioHttpFactory::new();
        let rows = [
            ("PII Presidio plugin", defs::VERSION),
            ("Config format", defs::FMT_CONFIG),
            ("Presidio analyzer", backend.base_url()),
        ];

        writeln!(out, ". Installed package versions")?;
        for (name, value) in rows {
            writeln!(out, "{name:>20}: {value}")?;
        }
        Ok(())
    }
}
