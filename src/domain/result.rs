//! Result type alias for the plugin

use super::errors::PluginError;

/// Result type alias for plugin operations
///
/// # Examples
///
/// ```
/// use pii_extract_plg_presidio::domain::result::Result;
/// use pii_extract_plg_presidio::domain::errors::PluginError;
///
/// fn failing_function() -> Result<()> {
///     Err(PluginError::NoLanguage)
/// }
/// ```
pub type Result<T> = std::result::Result<T, PluginError>;
