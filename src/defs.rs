//! Constants shared across the plugin

/// Name (format id) of the plugin configuration section
pub const FMT_CONFIG: &str = "pii-extract-plg-presidio:main:v1";

/// List of entity mapping records
pub const CFG_MAP: &str = "pii_list";

/// Capability id the plugin registers under
pub const TASK_SOURCE: &str = "piisa:pii-extract-plg-presidio";
/// Human-readable description of the plugin tasks
pub const TASK_DESCRIPTION: &str = "Presidio-based PII tasks for some languages and countries";
/// Task class reported in task descriptors
pub const TASK_CLASS: &str = "PiiTask";

/// Name of the detection method, as shown in entity listings
pub const PII_NAME: &str = "Presidio wrapper";

/// Plugin version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable pointing to the model cache directory
pub const ENV_CACHEDIR: &str = "PIISA_CACHEDIR";
/// Environment variable pointing to a Presidio analyzer service
pub const ENV_ANALYZER_URL: &str = "PRESIDIO_ANALYZER_URL";
/// Default Presidio analyzer service endpoint
pub const DEFAULT_ANALYZER_URL: &str = "http://localhost:5002";
