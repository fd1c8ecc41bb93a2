//! Domain error types
//!
//! This module defines the error hierarchy for the plugin. Errors raised by
//! the wrapped analysis engine are kept apart in [`EngineError`] so the task
//! layer can wrap them without exposing HTTP client types.

use thiserror::Error;

/// Main plugin error type
///
/// Every fallible operation in the crate returns this type. Configuration and
/// engine construction errors are fatal for the whole task; language and
/// detection errors only affect the chunk being processed.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The analyzer engine (or its NLP backend) could not be built
    #[error("cannot create Presidio Analyzer engine: {0}")]
    EngineConstruction(String),

    /// The entity mapping references labels the engine does not support
    #[error("recognizer for {} not found in Presidio", format_labels(.missing))]
    RecognizerMismatch { missing: Vec<String> },

    /// Neither the chunk nor the task define a language
    #[error("Presidio task exception: no language defined in task or document chunk")]
    NoLanguage,

    /// The resolved language has no entity mapping in this task
    #[error("Presidio task exception: no tasks for lang: {0}")]
    NoTasksForLang(String),

    /// The engine failed while analyzing a chunk
    #[error("Presidio exception: {kind}: {message}")]
    Detection { kind: String, message: String },
}

impl PluginError {
    /// True for the per-chunk language resolution failures
    pub fn is_language_resolution(&self) -> bool {
        matches!(self, Self::NoLanguage | Self::NoTasksForLang(_))
    }

    /// True for errors that invalidate the whole task (as opposed to one chunk)
    pub fn is_fatal_for_task(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::EngineConstruction(_) | Self::RecognizerMismatch { .. }
        )
    }
}

fn format_labels(labels: &[String]) -> String {
    let quoted: Vec<String> = labels.iter().map(|l| format!("'{l}'")).collect();
    format!("{{{}}}", quoted.join(", "))
}

/// Errors reported by an analyzer engine implementation
///
/// These don't expose third-party client types; the task layer turns them
/// into [`PluginError::Detection`] using [`EngineError::kind`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed to reach the engine
    #[error("Failed to connect to analyzer: {0}")]
    ConnectionFailed(String),

    /// The engine answered with a non-success status
    #[error("Analyzer error: {status} - {message}")]
    Status { status: u16, message: String },

    /// The engine answered with something we can't decode
    #[error("Invalid response from analyzer: {0}")]
    InvalidResponse(String),

    /// The requested language is not supported by the engine
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Invalid construction parameters
    #[error("Invalid analyzer parameter: {0}")]
    InvalidParameter(String),

    /// Anything else raised by an engine implementation
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    /// Short name of the error variant, used when wrapping detection failures
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "ConnectionFailed",
            Self::Status { .. } => "Status",
            Self::InvalidResponse(_) => "InvalidResponse",
            Self::UnsupportedLanguage(_) => "UnsupportedLanguage",
            Self::InvalidParameter(_) => "InvalidParameter",
            Self::Other(_) => "Other",
        }
    }
}

impl From<toml::de::Error> for PluginError {
    fn from(err: toml::de::Error) -> Self {
        PluginError::Configuration(format!("TOML parse error: {err}"))
    }
}
