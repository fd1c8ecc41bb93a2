//! Task collector
//!
//! Produces the task descriptors the host pipeline uses to build detection
//! tasks. The Presidio plugin always produces a single multi-entity task.

use super::mapping::{demultiplex, TaskEntity};
use super::task::PresidioTask;
use crate::config::{EngineSettings, LangSpec, PiiRecord, PluginConfig, RecordKey};
use crate::defs;
use crate::domain::Result;
use crate::engine::{filter_languages, presidio_languages, AnalyzerFactory, EngineCache};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Compute the list of mapping records a task will use
///
/// Records are processed in declaration order and keyed by (type, subtype):
/// a record without language removes its key, any other record replaces an
/// earlier one with the same key in place (or is appended). With a language
/// restriction, records with no language in `langset` are skipped and the
/// kept ones have their languages narrowed to `langset`.
pub fn pii_list(records: &[PiiRecord], langset: Option<&BTreeSet<String>>) -> Vec<PiiRecord> {
    let mut piimap: Vec<(RecordKey, PiiRecord)> = Vec::new();

    for record in records {
        let key = record.key();
        let Some(langs) = record.languages() else {
            piimap.retain(|(k, _)| *k != key);
            continue;
        };

        let mut record = record.clone();
        if let Some(langset) = langset {
            let kept: Vec<String> = langs.into_iter().filter(|l| langset.contains(l)).collect();
            record.lang = match kept.len() {
                0 => continue,
                1 => kept.into_iter().next().map(LangSpec::One),
                _ => Some(LangSpec::Many(kept)),
            };
        }

        match piimap.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = record,
            None => piimap.push((key, record)),
        }
    }

    piimap.into_iter().map(|(_, record)| record).collect()
}

/// Everything needed to build one [`PresidioTask`]
#[derive(Clone)]
pub struct TaskDescriptor {
    pub class: &'static str,
    pub source: &'static str,
    pub version: &'static str,
    pub doc: &'static str,
    /// Mapping records for the entities the task detects
    pub pii: Vec<PiiRecord>,
    /// Engine settings from the plugin configuration
    pub settings: EngineSettings,
    /// Languages the engine is built for
    pub model_lang: BTreeSet<String>,
    pub debug: bool,
    factory: Arc<dyn AnalyzerFactory>,
    cache: Arc<EngineCache>,
}

impl TaskDescriptor {
    /// Build the task
    ///
    /// # Errors
    ///
    /// See [`PresidioTask::new`]
    pub fn build(&self) -> Result<PresidioTask> {
        PresidioTask::new(
            &self.pii,
            &self.settings,
            &self.model_lang,
            self.factory.as_ref(),
            &self.cache,
            self.debug,
        )
    }

    /// The entities of the task, one per (language, engine label)
    pub fn piid(&self) -> Result<Vec<TaskEntity>> {
        demultiplex(&self.pii)
    }

    pub fn factory(&self) -> &Arc<dyn AnalyzerFactory> {
        &self.factory
    }

    pub fn cache(&self) -> &Arc<EngineCache> {
        &self.cache
    }
}

impl fmt::Debug for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDescriptor")
            .field("class", &self.class)
            .field("source", &self.source)
            .field("version", &self.version)
            .field("pii", &self.pii.len())
            .field("model_lang", &self.model_lang)
            .field("factory", &self.factory.name())
            .finish_non_exhaustive()
    }
}

/// Produces the Presidio task descriptor
pub struct PresidioTaskCollector {
    config: PluginConfig,
    model_lang: BTreeSet<String>,
    /// The collector was created for an explicit set of languages
    restricted: bool,
    debug: bool,
    factory: Arc<dyn AnalyzerFactory>,
    cache: Arc<EngineCache>,
}

impl PresidioTaskCollector {
    /// Create a collector
    ///
    /// `languages` restricts the collector to a subset of the languages
    /// available in the model configuration (empty: no restriction). A
    /// restriction with no model language in common leaves the collector
    /// without languages, and its tasks without entities.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a model lacks its language code
    pub fn new(
        config: PluginConfig,
        languages: &[String],
        debug: bool,
        factory: Arc<dyn AnalyzerFactory>,
        cache: Arc<EngineCache>,
    ) -> Result<Self> {
        let model_lang = filter_languages(&presidio_languages(&config.engine)?, languages);
        crate::plugin_log!(debug, lang = ?model_lang, "Presidio task collector: init");
        Ok(Self {
            config,
            model_lang,
            restricted: !languages.is_empty(),
            debug,
            factory,
            cache,
        })
    }

    pub fn model_lang(&self) -> &BTreeSet<String> {
        &self.model_lang
    }

    pub fn factory(&self) -> &Arc<dyn AnalyzerFactory> {
        &self.factory
    }

    pub fn cache(&self) -> &Arc<EngineCache> {
        &self.cache
    }

    /// Return the task descriptors (a single one)
    ///
    /// `lang` restricts the task to a subset of the collector languages
    /// (empty: no restriction). A restriction with no language in common
    /// with the collector gives a task with no entities.
    pub fn gather_tasks(&self, lang: &[String]) -> Vec<TaskDescriptor> {
        let task_lang: Option<BTreeSet<String>> =
            match (self.model_lang.is_empty(), self.restricted, lang.is_empty()) {
                (true, true, _) => Some(BTreeSet::new()),
                (true, false, true) => None,
                (true, false, false) => Some(lang.iter().cloned().collect()),
                (false, _, _) => Some(filter_languages(&self.model_lang, lang)),
            };
        crate::plugin_log!(self.debug, lang = ?task_lang, "Presidio gather tasks");

        let pii = pii_list(&self.config.pii_list, task_lang.as_ref());
        vec![TaskDescriptor {
            class: defs::TASK_CLASS,
            source: defs::TASK_SOURCE,
            version: defs::VERSION,
            doc: defs::TASK_DESCRIPTION,
            pii,
            settings: self.config.engine.clone(),
            model_lang: self.model_lang.clone(),
            debug: self.debug,
            factory: Arc::clone(&self.factory),
            cache: Arc::clone(&self.cache),
        }]
    }
}

impl fmt::Debug for PresidioTaskCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresidioTaskCollector")
            .field("model_lang", &self.model_lang)
            .field("records", &self.config.pii_list.len())
            .field("factory", &self.factory.name())
            .finish_non_exhaustive()
    }
}
