//! Domain models and types for the plugin.
//!
//! The domain layer holds the host framework's data model as seen by this
//! plugin:
//! - **PII types and entities** ([`PiiEnum`], [`PiiEntityInfo`], [`PiiEntity`])
//! - **Document chunks** ([`DocumentChunk`])
//! - **Error types** ([`PluginError`], [`EngineError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PluginError>`]:
//!
//! ```rust
//! use pii_extract_plg_presidio::domain::{PiiEnum, PluginError, Result};
//!
//! fn parse(name: &str) -> Result<PiiEnum> {
//!     name.parse()
//!         .map_err(|e| PluginError::Configuration(format!("{e}")))
//! }
//! # assert!(parse("PERSON").is_ok());
//! ```

pub mod chunk;
pub mod errors;
pub mod pii;
pub mod result;

pub use chunk::{ChunkContext, DocumentChunk};
pub use errors::{EngineError, PluginError};
pub use pii::{PiiEntity, PiiEntityInfo, PiiEnum, ProcessInfo, UnknownPiiType};
pub use result::Result;
