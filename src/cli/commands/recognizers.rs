//! Presidio recognizers command implementation

use super::{init_presidio, lang_label, load_config};
use crate::cli::CommonArgs;
use crate::engine::{AnalyzerFactory, RecognizerInfo, RecognizerKind};
use clap::Args;
use std::io::Write;

/// Arguments for the presidio-recognizers command
#[derive(Args, Debug)]
pub struct RecognizersArgs {
    /// Also list the entities supported by each recognizer
    #[arg(long)]
    pub entities: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl RecognizersArgs {
    /// Execute the presidio-recognizers command
    pub fn execute(&self, factory: &dyn AnalyzerFactory, out: &mut dyn Write) -> anyhow::Result<()> {
        let config = load_config(&self.common)?;
        let analyzer = init_presidio(&config, &self.common, factory)?;

        let mut recognizers = analyzer.recognizers()?;
        recognizers.sort_by(|a, b| a.name.cmp(&b.name));

        writeln!(
            out,
            ". Recognizers available in Presidio (lang={})",
            lang_label(&self.common)
        )?;
        for rec in &recognizers {
            let rtype = recognizer_type(rec);
            let version = rec.version.as_deref().unwrap_or("-");
            if self.entities {
                writeln!(
                    out,
                    "{:<28} {:<8} {:<10} {:20}",
                    rec.name, version, rec.supported_language, rtype
                )?;
                writeln!(out, " entities: {}\n", rec.supported_entities.join(", "))?;
            } else {
                writeln!(
                    out,
                    "{:>28} {:<8} {:<10} {:20}",
                    rec.name, version, rec.supported_language, rtype
                )?;
            }
        }
        Ok(())
    }
}

fn recognizer_type(rec: &RecognizerInfo) -> String {
    let base = match rec.kind {
        Some(RecognizerKind::Remote) => "remote",
        Some(RecognizerKind::Pattern) => "pattern",
        Some(RecognizerKind::Local) | None => "local",
    };
    if rec.has_context {
        format!("{base},context")
    } else {
        base.to_string()
    }
}
