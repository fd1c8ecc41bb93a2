//! Plugin entry point
//!
//! [`PiiExtractPluginLoader`] is what the host framework instantiates to
//! discover the tasks this plugin provides.

use crate::config::{load_presidio_plugin_config, ConfigSource, PluginConfig};
use crate::defs;
use crate::domain::Result;
use crate::engine::{AnalyzerFactory, EngineCache, PresidioHttpFactory};
use crate::task::{PresidioTaskCollector, TaskDescriptor};
use std::fmt;
use std::sync::Arc;

/// Plugin loader for the Presidio tasks
///
/// # Example
///
/// ```no_run
/// use pii_extract_plg_presidio::PiiExtractPluginLoader;
///
/// # fn example() -> pii_extract_plg_presidio::domain::Result<()> {
/// let loader = PiiExtractPluginLoader::new(None, false, &[])?;
/// for descriptor in loader.get_plugin_tasks(&["en".to_string()]) {
///     let task = descriptor.build()?;
///     println!("{task}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct PiiExtractPluginLoader {
    config: PluginConfig,
    collector: PresidioTaskCollector,
    debug: bool,
    languages: Vec<String>,
}

impl PiiExtractPluginLoader {
    /// Capability id of the plugin
    pub const SOURCE: &'static str = defs::TASK_SOURCE;
    /// Plugin version
    pub const VERSION: &'static str = defs::VERSION;
    /// Plugin description
    pub const DESCRIPTION: &'static str = defs::TASK_DESCRIPTION;

    /// Create the loader with the bundled HTTP backend and a fresh engine cache
    ///
    /// # Arguments
    ///
    /// * `config` - configuration override (file(s) or inline value)
    /// * `debug` - raise lifecycle logging to `info`
    /// * `languages` - restrict the plugin to these languages (empty: all)
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration cannot be loaded
    pub fn new(config: Option<ConfigSource>, debug: bool, languages: &[String]) -> Result<Self> {
        let config = load_presidio_plugin_config(config.as_ref())?;
        Self::with_parts(
            config,
            debug,
            languages,
            Arc::new(PresidioHttpFactory::new()),
            Arc::new(EngineCache::new()),
        )
    }

    /// Create the loader from an already loaded configuration, with explicit
    /// engine factory and cache
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a model lacks its language code
    pub fn with_parts(
        config: PluginConfig,
        debug: bool,
        languages: &[String],
        factory: Arc<dyn AnalyzerFactory>,
        cache: Arc<EngineCache>,
    ) -> Result<Self> {
        let collector =
            PresidioTaskCollector::new(config.clone(), languages, debug, factory, cache)?;
        Ok(Self {
            config,
            collector,
            debug,
            languages: languages.to_vec(),
        })
    }

    /// Replace the engine factory
    ///
    /// # Errors
    ///
    /// Same as [`PiiExtractPluginLoader::with_parts`]
    pub fn with_factory(self, factory: Arc<dyn AnalyzerFactory>) -> Result<Self> {
        let cache = Arc::clone(self.collector_cache());
        Self::with_parts(self.config, self.debug, &self.languages, factory, cache)
    }

    /// Replace the engine cache
    ///
    /// # Errors
    ///
    /// Same as [`PiiExtractPluginLoader::with_parts`]
    pub fn with_cache(self, cache: Arc<EngineCache>) -> Result<Self> {
        let factory = Arc::clone(self.collector_factory());
        Self::with_parts(self.config, self.debug, &self.languages, factory, cache)
    }

    pub fn source(&self) -> &'static str {
        Self::SOURCE
    }

    pub fn version(&self) -> &'static str {
        Self::VERSION
    }

    pub fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn collector(&self) -> &PresidioTaskCollector {
        &self.collector
    }

    /// Task descriptors for the given languages (empty: all)
    pub fn get_plugin_tasks(&self, lang: &[String]) -> Vec<TaskDescriptor> {
        self.collector.gather_tasks(lang)
    }

    fn collector_cache(&self) -> &Arc<EngineCache> {
        self.collector.cache()
    }

    fn collector_factory(&self) -> &Arc<dyn AnalyzerFactory> {
        self.collector.factory()
    }
}

impl fmt::Display for PiiExtractPluginLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<PiiExtractPluginLoader: presidio {}>", defs::VERSION)
    }
}

impl fmt::Debug for PiiExtractPluginLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiiExtractPluginLoader")
            .field("collector", &self.collector)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
