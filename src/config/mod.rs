//! Configuration management for the Presidio plugin.
//!
//! The plugin ships with a packaged default configuration
//! (`resources/plugin-config.json`) and accepts overrides from files or
//! in-memory JSON values.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pii_extract_plg_presidio::config::{load_presidio_plugin_config, ConfigSource};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Packaged defaults only
//! let config = load_presidio_plugin_config(None)?;
//!
//! // Defaults plus an override file
//! let config = load_presidio_plugin_config(Some(&ConfigSource::from("presidio.json")))?;
//! println!("NLP engine: {}", config.engine.nlp_config.nlp_engine_name);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - `nlp_config` - NLP backend name and the language models to load
//! - `reuse_engine` - reuse analyzer engines across tasks (default `true`)
//! - `analyzer_params` - extra parameters passed verbatim to the analyzer
//! - `cachedir` - model cache directory (`false` disables it)
//! - `pii_list` - entity mapping records
//!
//! # Example Configuration
//!
//! ```json
//! {
//!   "format": "pii-extract-plg-presidio:main:v1",
//!   "nlp_config": {
//!     "nlp_engine_name": "spacy",
//!     "models": [{"lang_code": "en", "model_name": "en_core_web_lg"}]
//!   },
//!   "pii_list": [
//!     {"type": "PERSON", "lang": "en", "extra": {"presidio": "PERSON"}},
//!     {"type": "LOCATION", "lang": null}
//!   ]
//! }
//! ```
//!
//! A record with a null (or absent) `lang` retracts every earlier record with
//! the same type and subtype.

pub mod loader;
pub mod schema;

pub use loader::{load_presidio_plugin_config, ConfigSource};
pub use schema::{
    CacheDirSetting, EngineSettings, LangSpec, ModelSpec, NlpConfig, PiiRecord, PluginConfig,
    RecordExtra, RecordKey,
};
