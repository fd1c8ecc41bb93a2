//! Presidio detection task
//!
//! A [`PresidioTask`] wraps one analyzer engine and maps its findings into
//! host [`PiiEntity`] values. It handles every language and entity given in
//! its descriptor.

use super::mapping::{demultiplex, entity_map, mapping_count, EntityMap, TaskEntity};
use crate::config::{EngineSettings, PiiRecord};
use crate::defs;
use crate::domain::{DocumentChunk, PiiEntity, PluginError, ProcessInfo, Result};
use crate::engine::{presidio_analyzer, AnalyzerEngine, AnalyzerFactory, EngineCache};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A PII detection task, as driven by the host pipeline
pub trait PiiTask: Send + Sync {
    /// Detect PII entities in a document chunk
    ///
    /// Entities are returned in ascending start offset.
    fn find(&self, chunk: &DocumentChunk) -> Result<Vec<PiiEntity>>;
}

/// PII detector wrapping a Presidio analyzer engine
pub struct PresidioTask {
    entries: Vec<TaskEntity>,
    ent_map: EntityMap,
    lang: Option<String>,
    analyzer: Arc<dyn AnalyzerEngine>,
    debug: bool,
}

impl PresidioTask {
    /// Build a task
    ///
    /// # Arguments
    ///
    /// * `pii` - mapping records for the entities to detect
    /// * `settings` - engine settings from the plugin configuration
    /// * `model_lang` - languages to build the engine for
    /// * `factory` / `cache` - where engines come from
    /// * `debug` - raise lifecycle logging to `info`
    ///
    /// # Errors
    ///
    /// Fails on a malformed record, if the engine cannot be built, or if any
    /// mapped label has no recognizer in the engine.
    pub fn new(
        pii: &[PiiRecord],
        settings: &EngineSettings,
        model_lang: &BTreeSet<String>,
        factory: &dyn AnalyzerFactory,
        cache: &EngineCache,
        debug: bool,
    ) -> Result<Self> {
        let entries = demultiplex(pii)?;
        let ent_map = entity_map(entries.iter().cloned());

        let lang = if ent_map.len() == 1 {
            ent_map.keys().next().cloned()
        } else {
            None
        };
        crate::plugin_log!(
            debug,
            version = defs::VERSION,
            lang = ?lang,
            tasks = pii.len(),
            "PresidioTask"
        );

        let languages: Vec<String> = model_lang.iter().cloned().collect();
        let analyzer = presidio_analyzer(settings, &languages, factory, cache, debug)?;

        let supported = analyzer
            .supported_entities()
            .map_err(|e| PluginError::EngineConstruction(e.to_string()))?;
        let missing: BTreeSet<&String> = ent_map
            .values()
            .flat_map(|labels| labels.keys())
            .filter(|label| !supported.contains(*label))
            .collect();
        if !missing.is_empty() {
            return Err(PluginError::RecognizerMismatch {
                missing: missing.into_iter().cloned().collect(),
            });
        }

        Ok(Self {
            entries,
            ent_map,
            lang,
            analyzer,
            debug,
        })
    }

    /// Number of (language, label) mappings handled by the task
    pub fn len(&self) -> usize {
        mapping_count(&self.ent_map)
    }

    pub fn is_empty(&self) -> bool {
        self.ent_map.is_empty()
    }

    /// Language used for chunks that don't declare one
    pub fn default_lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Entities detected by the task, with the engine label for each
    pub fn pii_info(&self) -> &[TaskEntity] {
        &self.entries
    }

    /// The underlying engine
    pub fn analyzer(&self) -> &Arc<dyn AnalyzerEngine> {
        &self.analyzer
    }

    fn resolve_lang<'a>(&'a self, chunk: &'a DocumentChunk) -> Result<&'a str> {
        let lang = chunk
            .lang()
            .or(self.lang.as_deref())
            .ok_or(PluginError::NoLanguage)?;
        if !self.ent_map.contains_key(lang) {
            return Err(PluginError::NoTasksForLang(lang.to_string()));
        }
        Ok(lang)
    }
}

impl PiiTask for PresidioTask {
    fn find(&self, chunk: &DocumentChunk) -> Result<Vec<PiiEntity>> {
        let lang = self.resolve_lang(chunk)?;
        let Some(entity_map) = self.ent_map.get(lang) else {
            return Err(PluginError::NoTasksForLang(lang.to_string()));
        };
        let entities: Vec<String> = entity_map.keys().cloned().collect();

        let mut results = self
            .analyzer
            .analyze(&chunk.data, lang, &entities)
            .map_err(|e| PluginError::Detection {
                kind: e.kind().to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(chunk = %chunk.id, lang, hits = results.len(), "Presidio results");

        results.sort_by_key(|r| r.start);

        // Byte position of every char boundary, so offsets index by character
        let bounds: Vec<usize> = chunk
            .data
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(chunk.data.len()))
            .collect();

        let mut found = Vec::with_capacity(results.len());
        for r in results {
            let Some(info) = entity_map.get(&r.entity_type) else {
                tracing::warn!(
                    chunk = %chunk.id,
                    entity_type = %r.entity_type,
                    "Ignoring Presidio result with unrequested entity type"
                );
                continue;
            };
            let (Some(&from), Some(&to)) = (bounds.get(r.start), bounds.get(r.end)) else {
                return Err(invalid_offsets(r.start, r.end, bounds.len() - 1));
            };
            if from > to {
                return Err(invalid_offsets(r.start, r.end, bounds.len() - 1));
            }

            found.push(PiiEntity::new(
                info.clone(),
                chunk.data[from..to].to_string(),
                chunk.id.clone(),
                r.start,
                ProcessInfo::detection(r.score),
            ));
        }

        if self.debug {
            tracing::info!(chunk = %chunk.id, entities = found.len(), "PresidioTask find");
        }
        Ok(found)
    }
}

fn invalid_offsets(start: usize, end: usize, len: usize) -> PluginError {
    PluginError::Detection {
        kind: "InvalidOffset".to_string(),
        message: format!("result span {start}..{end} outside chunk of {len} chars"),
    }
}

impl fmt::Display for PresidioTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<PresidioTask #{}>", self.len())
    }
}

impl fmt::Debug for PresidioTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresidioTask")
            .field("lang", &self.lang)
            .field("ent_map", &self.ent_map)
            .finish_non_exhaustive()
    }
}
