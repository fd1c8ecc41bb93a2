//! Configuration schema types
//!
//! This module defines the structure of the plugin configuration: the engine
//! settings handed to each task and the list of entity mapping records.

use crate::domain::PiiEnum;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Main plugin configuration
///
/// This is the normalized result of merging the packaged default
/// configuration with any caller overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Engine construction settings
    #[serde(flatten)]
    pub engine: EngineSettings,

    /// Entity mapping records, in declaration (merge) order
    pub pii_list: Vec<PiiRecord>,
}

impl PluginConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error message if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.engine.validate()
    }
}

/// Settings used to build an analyzer engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// NLP engine configuration (backend name and language models)
    #[serde(default)]
    pub nlp_config: NlpConfig,

    /// Reuse engines built with an identical effective configuration
    #[serde(default = "default_reuse_engine")]
    pub reuse_engine: bool,

    /// Extra parameters passed verbatim to analyzer construction
    #[serde(default)]
    pub analyzer_params: Map<String, Value>,

    /// Model cache directory setting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cachedir: Option<CacheDirSetting>,
}

fn default_reuse_engine() -> bool {
    true
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            nlp_config: NlpConfig::default(),
            reuse_engine: default_reuse_engine(),
            analyzer_params: Map::new(),
            cachedir: None,
        }
    }
}

impl EngineSettings {
    fn validate(&self) -> Result<(), String> {
        if self.nlp_config.nlp_engine_name.trim().is_empty() {
            return Err("nlp_config.nlp_engine_name cannot be empty".to_string());
        }
        for (idx, model) in self.nlp_config.models.iter().enumerate() {
            if model.model_name.is_null() {
                return Err(format!("nlp_config.models[{idx}]: missing 'model_name'"));
            }
        }
        Ok(())
    }
}

/// NLP engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NlpConfig {
    /// Name of the NLP backend (spacy, stanza, transformers)
    #[serde(default = "default_nlp_engine_name")]
    pub nlp_engine_name: String,

    /// Language models to load
    #[serde(default)]
    pub models: Vec<ModelSpec>,
}

fn default_nlp_engine_name() -> String {
    "spacy".to_string()
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            nlp_engine_name: default_nlp_engine_name(),
            models: Vec::new(),
        }
    }
}

/// One language model in the NLP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Language code the model handles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_code: Option<String>,

    /// Model name; a string, or a map for multi-part pipelines
    #[serde(default)]
    pub model_name: Value,

    /// Backend-specific model options
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelSpec {
    /// Create a model spec from a language code and model name
    pub fn new(lang_code: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            lang_code: Some(lang_code.into()),
            model_name: Value::String(model_name.into()),
            extra: Map::new(),
        }
    }

    /// Model name as a flat string (compact JSON for structured names)
    pub fn model_label(&self) -> String {
        match &self.model_name {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Model cache directory setting
///
/// `false` disables it, `true` (or absence) falls back to the environment,
/// and a string is taken as an explicit path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheDirSetting {
    /// Enable/disable flag
    Enabled(bool),
    /// Explicit directory
    Path(PathBuf),
}

/// Language field of a mapping record: a single code or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LangSpec {
    /// A single language code
    One(String),
    /// A list of language codes
    Many(Vec<String>),
}

impl LangSpec {
    /// Language codes, in declaration order and without duplicates
    pub fn codes(&self) -> Vec<String> {
        match self {
            Self::One(code) => vec![code.clone()],
            Self::Many(codes) => {
                let mut out: Vec<String> = Vec::with_capacity(codes.len());
                for code in codes {
                    if !out.contains(code) {
                        out.push(code.clone());
                    }
                }
                out
            }
        }
    }
}

/// Extra (plugin-specific) fields of a mapping record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordExtra {
    /// Wrapped-engine entity label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presidio: Option<String>,

    /// Anything else
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Entity mapping record: one wrapped-engine label mapped to a host PII type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiRecord {
    /// Host PII type
    #[serde(rename = "type", deserialize_with = "deserialize_pii_enum")]
    pub pii_type: PiiEnum,

    /// Optional subtype
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    /// Applicable language(s); absent or null retracts the record key
    #[serde(default)]
    pub lang: Option<LangSpec>,

    /// Optional country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Plugin-specific fields, holding the wrapped-engine label
    #[serde(default)]
    pub extra: RecordExtra,
}

impl PiiRecord {
    /// Create a record mapping `label` to `pii_type` for the given languages
    pub fn new(pii_type: PiiEnum, langs: &[&str], label: impl Into<String>) -> Self {
        let lang = match langs {
            [single] => LangSpec::One(single.to_string()),
            many => LangSpec::Many(many.iter().map(|l| l.to_string()).collect()),
        };
        Self {
            pii_type,
            subtype: None,
            lang: Some(lang),
            country: None,
            extra: RecordExtra {
                presidio: Some(label.into()),
                other: Map::new(),
            },
        }
    }

    /// Create a retraction record for a (type, subtype) key
    pub fn retraction(pii_type: PiiEnum, subtype: Option<&str>) -> Self {
        Self {
            pii_type,
            subtype: subtype.map(str::to_string),
            lang: None,
            country: None,
            extra: RecordExtra::default(),
        }
    }

    /// Set the subtype
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Set the country
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Identity key of the record: `type/subtype`
    pub fn key(&self) -> RecordKey {
        RecordKey {
            pii_type: self.pii_type,
            subtype: self.subtype.clone(),
        }
    }

    /// Language codes of the record, `None` for a retraction
    pub fn languages(&self) -> Option<Vec<String>> {
        self.lang.as_ref().map(LangSpec::codes)
    }

    /// Wrapped-engine label
    pub fn label(&self) -> Option<&str> {
        self.extra.presidio.as_deref()
    }
}

/// (type, subtype) key shared by records that override each other
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub pii_type: PiiEnum,
    pub subtype: Option<String>,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subtype {
            Some(subtype) => write!(f, "{}/{}", self.pii_type, subtype),
            None => write!(f, "{}/None", self.pii_type),
        }
    }
}

fn deserialize_pii_enum<'de, D>(deserializer: D) -> Result<PiiEnum, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}
