//! Presidio entities command implementation

use super::{init_presidio, lang_label, load_config};
use crate::cli::CommonArgs;
use crate::engine::AnalyzerFactory;
use clap::Args;
use std::io::Write;

/// Arguments for the presidio-entities command
#[derive(Args, Debug)]
pub struct EntitiesArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl EntitiesArgs {
    /// Execute the presidio-entities command
    pub fn execute(&self, factory: &dyn AnalyzerFactory, out: &mut dyn Write) -> anyhow::Result<()> {
        let config = load_config(&self.common)?;
        let analyzer = init_presidio(&config, &self.common, factory)?;

        writeln!(
            out,
            ". Defined entities in Presidio (lang={})",
            lang_label(&self.common)
        )?;
        // BTreeSet iterates sorted
        for entity in analyzer.supported_entities()? {
            writeln!(out, "   {entity}")?;
        }
        Ok(())
    }
}
