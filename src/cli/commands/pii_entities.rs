//! PII entities command implementation
//!
//! Builds the Presidio task the same way the host framework would and lists
//! the PII entities it detects.

use super::{lang_label, load_config};
use crate::cli::CommonArgs;
use crate::defs;
use crate::engine::{AnalyzerFactory, EngineCache};
use crate::task::PresidioTaskCollector;
use clap::Args;
use std::io::Write;
use std::sync::Arc;

/// Arguments for the pii-entities command
#[derive(Args, Debug)]
pub struct PiiEntitiesArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl PiiEntitiesArgs {
    /// Execute the pii-entities command
    pub fn execute(
        &self,
        factory: Arc<dyn AnalyzerFactory>,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let config = load_config(&self.common)?;
        let collector = PresidioTaskCollector::new(
            config,
            &self.common.lang,
            self.common.debug,
            factory,
            Arc::new(EngineCache::new()),
        )?;

        writeln!(
            out,
            ". PII entities defined from Presidio (lang={})",
            lang_label(&self.common)
        )?;
        for descriptor in collector.gather_tasks(&self.common.lang) {
            let task = descriptor.build()?;
            for entity in task.pii_info() {
                let name = match &entity.info.subtype {
                    Some(subtype) => format!("{}, {}", entity.info.pii, subtype),
                    None => entity.info.pii.to_string(),
                };
                writeln!(
                    out,
                    "  {:40} {:5} {} ({})",
                    name,
                    entity.lang(),
                    defs::PII_NAME,
                    entity.label
                )?;
            }
        }
        Ok(())
    }
}
