//! Engine factory
//!
//! Builds the analyzer engine for a task: reduces the model configuration to
//! the languages in use, then either reuses a cached engine with the same
//! effective configuration or asks the [`AnalyzerFactory`] for a new one.

use super::cache::{CacheKey, EngineCache};
use super::cachedir::resolve_cachedir;
use super::languages::{filter_languages, presidio_languages};
use super::{AnalyzerEngine, AnalyzerFactory, EngineSpec};
use crate::config::{EngineSettings, NlpConfig};
use crate::domain::{PluginError, Result};
use std::sync::Arc;

/// Creates (or reuses) an analyzer engine
///
/// The effective language set is the intersection of the model languages
/// with `languages` (all model languages when `languages` is empty). Only
/// models for those languages are kept. When `reuse_engine` is set, engines
/// are memoized in `cache`; otherwise a new engine is built on every call
/// and nothing is stored.
///
/// # Errors
///
/// Returns [`PluginError::Configuration`] for malformed model settings and
/// [`PluginError::EngineConstruction`] if the factory fails.
pub fn presidio_analyzer(
    settings: &EngineSettings,
    languages: &[String],
    factory: &dyn AnalyzerFactory,
    cache: &EngineCache,
    debug: bool,
) -> Result<Arc<dyn AnalyzerEngine>> {
    let langset = filter_languages(&presidio_languages(settings)?, languages);

    let models: Vec<_> = settings
        .nlp_config
        .models
        .iter()
        .filter(|m| {
            langset.is_empty() || m.lang_code.as_ref().is_some_and(|l| langset.contains(l))
        })
        .cloned()
        .collect();
    let nlp_config = NlpConfig {
        nlp_engine_name: settings.nlp_config.nlp_engine_name.clone(),
        models,
    };

    let model_names: Vec<String> = nlp_config.models.iter().map(|m| m.model_label()).collect();
    crate::plugin_log!(
        debug,
        nlp_engine = %nlp_config.nlp_engine_name,
        models = ?model_names,
        backend = factory.name(),
        "Presidio NLP engine"
    );

    let key = CacheKey::new(&langset, &nlp_config.nlp_engine_name, &nlp_config.models);
    let spec = EngineSpec {
        nlp_config,
        supported_languages: langset,
        params: settings.analyzer_params.clone(),
        cachedir: resolve_cachedir(settings.cachedir.as_ref())?,
    };

    let mut built = false;
    let mut build = || {
        built = true;
        crate::plugin_log!(debug, key = %key, "Creating Presidio analyzer engine");
        factory
            .create(&spec)
            .map_err(|e| PluginError::EngineConstruction(e.to_string()))
    };

    if !settings.reuse_engine {
        return build();
    }

    let engine = cache.get_or_build(&key, build)?;
    if !built {
        crate::plugin_log!(debug, key = %key, "Reusing Presidio analyzer engine");
    }
    Ok(engine)
}
