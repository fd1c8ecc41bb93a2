// pii-extract-plg-presidio - Presidio PII detection plugin
// Copyright (c) 2025 PIISA Contributors
// Licensed under the Apache License, Version 2.0

use clap::Parser;
use pii_extract_plg_presidio::cli::{Cli, Commands};
use pii_extract_plg_presidio::engine::{AnalyzerFactory, PresidioHttpFactory};
use pii_extract_plg_presidio::logging::init_logging;
use std::io::Write;
use std::process;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let common = cli.command.common();

    if let Err(e) = init_logging(common.effective_log_level(), common.log_json) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    let factory: Arc<dyn AnalyzerFactory> = Arc::new(PresidioHttpFactory::new());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match execute_command(&cli, factory, &mut out) {
        Ok(()) => Ok(()),
        Err(e) if common.reraise => Err(e),
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            let _ = out.flush();
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Execute the CLI command
fn execute_command(
    cli: &Cli,
    factory: Arc<dyn AnalyzerFactory>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Version(args) => args.execute(out),
        Commands::PresidioRecognizers(args) => args.execute(factory.as_ref(), out),
        Commands::PresidioEntities(args) => args.execute(factory.as_ref(), out),
        Commands::PiiEntities(args) => args.execute(factory, out),
    }
}
