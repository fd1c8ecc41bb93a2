//! CLI command implementations
//!
//! Commands write their report to the given writer, so they can be tested
//! against an in-memory buffer.

pub mod entities;
pub mod pii_entities;
pub mod recognizers;
pub mod version;

use super::CommonArgs;
use crate::config::{load_presidio_plugin_config, PluginConfig};
use crate::domain::Result;
use crate::engine::{presidio_analyzer, AnalyzerEngine, AnalyzerFactory, EngineCache};
use std::sync::Arc;

/// Load the configuration selected by the command line
fn load_config(common: &CommonArgs) -> Result<PluginConfig> {
    load_presidio_plugin_config(common.config_source().as_ref())
}

/// Build an analyzer engine for the selected languages
fn init_presidio(
    config: &PluginConfig,
    common: &CommonArgs,
    factory: &dyn AnalyzerFactory,
) -> Result<Arc<dyn AnalyzerEngine>> {
    presidio_analyzer(
        &config.engine,
        &common.lang,
        factory,
        &EngineCache::new(),
        common.debug,
    )
}

/// Language selection, as shown in report headers
fn lang_label(common: &CommonArgs) -> String {
    if common.lang.is_empty() {
        "all".to_string()
    } else {
        common.lang.join(",")
    }
}
