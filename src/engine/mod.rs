//! Analyzer engine contract and lifecycle
//!
//! The wrapped detection engine is an external collaborator. This module
//! defines the contract the plugin needs from it ([`AnalyzerEngine`],
//! [`AnalyzerFactory`]) and the machinery that decides when to build a new
//! engine and when to reuse one.
//!
//! # Architecture
//!
//! - **Language filter** ([`languages`]): languages declared by the model
//!   configuration, intersected with a requested subset
//! - **Engine cache** ([`cache`]): at most one engine per effective configuration
//! - **Engine factory** ([`factory`]): reduces the model list and builds
//!   (or reuses) an engine
//! - **HTTP backend** ([`http`]): a factory driving a Presidio analyzer service

pub mod cache;
pub mod cachedir;
pub mod factory;
pub mod http;
pub mod languages;

use crate::config::NlpConfig;
use crate::domain::EngineError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

pub use cache::{CacheKey, EngineCache};
pub use factory::presidio_analyzer;
pub use http::{PresidioHttpAnalyzer, PresidioHttpFactory};
pub use languages::{filter_languages, presidio_languages};

/// One finding reported by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizerResult {
    /// Start offset in the analyzed text (characters)
    pub start: usize,
    /// End offset in the analyzed text (characters, exclusive)
    pub end: usize,
    /// Engine entity label
    pub entity_type: String,
    /// Confidence score
    pub score: f64,
}

impl RecognizerResult {
    pub fn new(start: usize, end: usize, entity_type: impl Into<String>, score: f64) -> Self {
        Self {
            start,
            end,
            entity_type: entity_type.into(),
            score,
        }
    }
}

/// How a recognizer is implemented inside the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerKind {
    /// Runs in-process with the NLP models
    Local,
    /// Regular expression based
    Pattern,
    /// Delegates to a remote service
    Remote,
}

/// Description of a recognizer available in the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizerInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub supported_language: String,
    #[serde(default)]
    pub kind: Option<RecognizerKind>,
    /// Uses context words to boost its score
    #[serde(default)]
    pub has_context: bool,
    #[serde(default)]
    pub supported_entities: Vec<String>,
}

impl RecognizerInfo {
    /// Recognizer known only by name
    pub fn named(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            supported_language: language.into(),
            kind: None,
            has_context: false,
            supported_entities: Vec::new(),
        }
    }
}

/// Everything an [`AnalyzerFactory`] needs to build an engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSpec {
    /// NLP configuration, reduced to the models actually needed
    pub nlp_config: NlpConfig,
    /// Languages the engine must support (empty: engine default)
    pub supported_languages: BTreeSet<String>,
    /// Extra construction parameters, verbatim from the configuration
    pub params: Map<String, Value>,
    /// Local model cache directory, if any
    pub cachedir: Option<PathBuf>,
}

impl EngineSpec {
    /// Languages covered by the engine: the supported set, or the model
    /// languages when it is unrestricted
    pub fn effective_languages(&self) -> BTreeSet<String> {
        if !self.supported_languages.is_empty() {
            return self.supported_languages.clone();
        }
        self.nlp_config
            .models
            .iter()
            .filter_map(|m| m.lang_code.clone())
            .collect()
    }
}

/// A constructed analyzer engine
pub trait AnalyzerEngine: Send + Sync {
    /// Entity labels the engine can detect, over all its languages
    fn supported_entities(&self) -> Result<BTreeSet<String>, EngineError>;

    /// Analyze a text, restricted to the given entity labels
    fn analyze(
        &self,
        text: &str,
        language: &str,
        entities: &[String],
    ) -> Result<Vec<RecognizerResult>, EngineError>;

    /// Recognizers loaded in the engine
    fn recognizers(&self) -> Result<Vec<RecognizerInfo>, EngineError> {
        Ok(Vec::new())
    }
}

/// Builds analyzer engines
pub trait AnalyzerFactory: Send + Sync {
    /// Name of the backend, for logging
    fn name(&self) -> &str;

    /// Build a new engine
    fn create(&self, spec: &EngineSpec) -> Result<Arc<dyn AnalyzerEngine>, EngineError>;
}
