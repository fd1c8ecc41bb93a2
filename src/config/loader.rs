//! Configuration loader
//!
//! Loads the packaged default configuration and merges caller overrides on
//! top of it. Overrides are files (JSON or TOML, with `${VAR}` environment
//! substitution) or in-memory JSON values.

use super::schema::PluginConfig;
use crate::defs;
use crate::domain::errors::PluginError;
use crate::domain::result::Result;
use regex::Regex;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Packaged default configuration
const DEFAULT_CONFIG: &str = include_str!("../../resources/plugin-config.json");

/// Where a configuration override comes from
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A single configuration file
    Path(PathBuf),
    /// Several configuration files, merged in order
    Paths(Vec<PathBuf>),
    /// An in-memory configuration
    Inline(Value),
}

impl From<&str> for ConfigSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<PathBuf>> for ConfigSource {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self::Paths(paths)
    }
}

impl From<Value> for ConfigSource {
    fn from(value: Value) -> Self {
        Self::Inline(value)
    }
}

/// Loads the plugin configuration
///
/// This function:
/// 1. Parses the packaged default configuration
/// 2. Merges the override source(s) on top, in declaration order
/// 3. Checks the entity mapping block is present
/// 4. Normalizes each record's `type` into [`crate::domain::PiiEnum`]
/// 5. Validates the result
///
/// When merging, objects are merged key by key, `pii_list` arrays are
/// concatenated (so a later retraction record applies to earlier records)
/// and any other value is replaced.
///
/// # Errors
///
/// Returns a [`PluginError::Configuration`] if a file cannot be read or
/// parsed, if a section has a foreign format, if `pii_list` is missing, or
/// if a record has an unknown PII type.
///
/// # Examples
///
/// ```no_run
/// use pii_extract_plg_presidio::config::{load_presidio_plugin_config, ConfigSource};
///
/// let config = load_presidio_plugin_config(Some(&ConfigSource::from("my-config.json")))
///     .expect("Failed to load config");
/// println!("{} mapping records", config.pii_list.len());
/// ```
pub fn load_presidio_plugin_config(source: Option<&ConfigSource>) -> Result<PluginConfig> {
    let default: Value = serde_json::from_str(DEFAULT_CONFIG).map_err(|e| {
        PluginError::Configuration(format!("invalid packaged configuration: {e}"))
    })?;
    let mut data = select_section(default, "<packaged default>")?;

    let overrides = match source {
        None => Vec::new(),
        Some(ConfigSource::Inline(value)) => {
            vec![select_section(value.clone(), "<inline>")?]
        }
        Some(ConfigSource::Path(path)) => vec![read_config_file(path)?],
        Some(ConfigSource::Paths(paths)) => paths
            .iter()
            .map(|p| read_config_file(p))
            .collect::<Result<Vec<_>>>()?,
    };
    for section in overrides {
        merge_section(&mut data, section);
    }

    if data.get(defs::CFG_MAP).map_or(true, Value::is_null) {
        return Err(PluginError::Configuration(format!(
            "cannot get config field {} from config",
            defs::CFG_MAP
        )));
    }

    let config: PluginConfig = serde_json::from_value(Value::Object(data))
        .map_err(|e| PluginError::Configuration(format!("invalid Presidio config: {e}")))?;

    config.validate().map_err(|e| {
        PluginError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    tracing::debug!(
        records = config.pii_list.len(),
        models = config.engine.nlp_config.models.len(),
        reuse_engine = config.engine.reuse_engine,
        "Presidio plugin configuration loaded"
    );
    Ok(config)
}

/// Reads one configuration file and returns its plugin section
fn read_config_file(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Err(PluginError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PluginError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    let contents = substitute_env_vars(&contents)?;

    let is_toml = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let value: Value = if is_toml {
        toml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents).map_err(|e| {
            PluginError::Configuration(format!(
                "Failed to parse JSON in {}: {}",
                path.display(),
                e
            ))
        })?
    };

    tracing::debug!(path = %path.display(), "Read configuration override");
    select_section(value, &path.display().to_string())
}

/// Picks the plugin section out of a configuration value
///
/// A value may hold the section under the format id key (multi-plugin
/// files), carry a `format` field naming it, or be a bare section.
fn select_section(value: Value, origin: &str) -> Result<Map<String, Value>> {
    let Value::Object(mut map) = value else {
        return Err(PluginError::Configuration(format!(
            "configuration in {origin} is not an object"
        )));
    };

    if let Some(section) = map.remove(defs::FMT_CONFIG) {
        return select_section(section, origin);
    }

    match map.remove("format") {
        None => Ok(map),
        Some(Value::String(format)) if format == defs::FMT_CONFIG => Ok(map),
        Some(other) => Err(PluginError::Configuration(format!(
            "invalid config format in {origin}: expected '{}', got {}",
            defs::FMT_CONFIG,
            other
        ))),
    }
}

/// Merges an override section into the base section
fn merge_section(base: &mut Map<String, Value>, over: Map<String, Value>) {
    for (key, value) in over {
        if key == defs::CFG_MAP {
            if let (Some(Value::Array(existing)), Value::Array(extra)) = (base.get_mut(&key), &value)
            {
                existing.extend(extra.iter().cloned());
                continue;
            }
        }
        match base.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

fn merge_value(base: &mut Value, over: Value) {
    match (base, over) {
        (Value::Object(base_map), Value::Object(over_map)) => {
            for (key, value) in over_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, over) => *base = over,
    }
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PluginError::Configuration(format!("invalid placeholder pattern: {e}")))?;
    let mut missing_vars: Vec<String> = Vec::new();

    let result = re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        match std::env::var(var_name) {
            Ok(value) => value,
            Err(_) => {
                if !missing_vars.iter().any(|v| v == var_name) {
                    missing_vars.push(var_name.to_string());
                }
                caps[0].to_string()
            }
        }
    });

    if !missing_vars.is_empty() {
        return Err(PluginError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PiiEnum;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_default_config() {
        let config = load_presidio_plugin_config(None).unwrap();
        assert_eq!(config.pii_list.len(), 7);
        assert_eq!(config.engine.nlp_config.nlp_engine_name, "spacy");
        assert_eq!(config.engine.nlp_config.models.len(), 3);
        assert!(config.engine.reuse_engine);
        assert_eq!(config.pii_list[1].pii_type, PiiEnum::Norp);
    }

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PRESIDIO_TEST_SUBST_VAR", "test_value");
        let input = "{\"url\": \"${PRESIDIO_TEST_SUBST_VAR}\"}";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "{\"url\": \"test_value\"}");
        std::env::remove_var("PRESIDIO_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PRESIDIO_TEST_MISSING_VAR");
        let input = "{\"url\": \"${PRESIDIO_TEST_MISSING_VAR}\"}";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("PRESIDIO_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_select_section_nested_under_format_key() {
        let value = json!({
            "pii-extract-plg-presidio:main:v1": {"reuse_engine": false}
        });
        let section = select_section(value, "test").unwrap();
        assert_eq!(section.get("reuse_engine"), Some(&json!(false)));
    }

    #[test]
    fn test_select_section_foreign_format() {
        let value = json!({"format": "pii-extract-base:plugin-loader:v1"});
        let err = select_section(value, "test").unwrap_err();
        assert!(matches!(err, PluginError::Configuration(_)));
    }

    #[test]
    fn test_merge_concatenates_pii_list_and_replaces_models() {
        let mut base = select_section(
            json!({
                "nlp_config": {"nlp_engine_name": "spacy",
                               "models": [{"lang_code": "en", "model_name": "a"}]},
                "pii_list": [{"type": "PERSON", "lang": "en", "extra": {"presidio": "PERSON"}}]
            }),
            "base",
        )
        .unwrap();
        let over = select_section(
            json!({
                "nlp_config": {"models": [{"lang_code": "fr", "model_name": "b"}]},
                "pii_list": [{"type": "PERSON", "lang": null}]
            }),
            "over",
        )
        .unwrap();
        merge_section(&mut base, over);

        assert_eq!(base["pii_list"].as_array().unwrap().len(), 2);
        assert_eq!(base["nlp_config"]["nlp_engine_name"], json!("spacy"));
        assert_eq!(
            base["nlp_config"]["models"],
            json!([{"lang_code": "fr", "model_name": "b"}])
        );
    }

    #[test]
    fn test_load_inline_override() {
        let source = ConfigSource::Inline(json!({
            "reuse_engine": false,
            "analyzer_params": {"default_score_threshold": 0.5}
        }));
        let config = load_presidio_plugin_config(Some(&source)).unwrap();
        assert!(!config.engine.reuse_engine);
        assert_eq!(
            config.engine.analyzer_params.get("default_score_threshold"),
            Some(&json!(0.5))
        );
        assert_eq!(config.pii_list.len(), 7);
    }

    #[test]
    fn test_load_missing_pii_list() {
        let source = ConfigSource::Inline(json!({"pii_list": null}));
        let err = load_presidio_plugin_config(Some(&source)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: cannot get config field pii_list from config"
        );
    }

    #[test]
    fn test_load_unknown_pii_type() {
        let source = ConfigSource::Inline(json!({
            "pii_list": [{"type": "SHOE_SIZE", "lang": "en", "extra": {"presidio": "X"}}]
        }));
        let err = load_presidio_plugin_config(Some(&source)).unwrap_err();
        assert!(matches!(err, PluginError::Configuration(_)));
        assert!(err.to_string().contains("SHOE_SIZE"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let source = ConfigSource::from("nonexistent-presidio-config.json");
        let err = load_presidio_plugin_config(Some(&source)).unwrap_err();
        assert!(matches!(err, PluginError::Configuration(_)));
        assert!(err.to_string().contains("nonexistent-presidio-config.json"));
    }

    #[test]
    fn test_load_toml_override() {
        let toml_content = r#"
format = "pii-extract-plg-presidio:main:v1"
reuse_engine = false

[[pii_list]]
type = "EMAIL_ADDRESS"
lang = "en"
extra = { presidio = "EMAIL_ADDRESS" }
"#;
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config =
            load_presidio_plugin_config(Some(&ConfigSource::from(temp_file.path().to_path_buf())))
                .unwrap();
        assert!(!config.engine.reuse_engine);
        assert_eq!(config.pii_list.len(), 8);
        assert_eq!(config.pii_list[7].pii_type, PiiEnum::EmailAddress);
    }

    #[test]
    fn test_load_json_file_with_invalid_content() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{ not json").unwrap();
        temp_file.flush().unwrap();

        let err =
            load_presidio_plugin_config(Some(&ConfigSource::from(temp_file.path().to_path_buf())))
                .unwrap_err();
        assert!(matches!(err, PluginError::Configuration(_)));
    }
}
