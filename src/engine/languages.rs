//! Language filter

use crate::config::EngineSettings;
use crate::domain::{PluginError, Result};
use std::collections::BTreeSet;

/// Returns the set of languages declared by the configured NLP models
///
/// # Errors
///
/// Returns a [`PluginError::Configuration`] if a model lacks `lang_code`
pub fn presidio_languages(settings: &EngineSettings) -> Result<BTreeSet<String>> {
    settings
        .nlp_config
        .models
        .iter()
        .map(|m| {
            m.lang_code.clone().ok_or_else(|| {
                PluginError::Configuration(
                    "missing 'lang_code' in Presidio plugin model config".to_string(),
                )
            })
        })
        .collect()
}

/// Intersects the declared languages with a requested subset
///
/// An empty request means no restriction.
pub fn filter_languages(declared: &BTreeSet<String>, requested: &[String]) -> BTreeSet<String> {
    if requested.is_empty() {
        return declared.clone();
    }
    declared
        .iter()
        .filter(|lang| requested.contains(lang))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSpec;

    fn set(langs: &[&str]) -> BTreeSet<String> {
        langs.iter().map(|l| l.to_string()).collect()
    }

    fn vec(langs: &[&str]) -> Vec<String> {
        langs.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_no_request_returns_declared() {
        let declared = set(&["en", "es", "it"]);
        assert_eq!(filter_languages(&declared, &[]), declared);
    }

    #[test]
    fn test_request_intersects() {
        let declared = set(&["en", "es", "it"]);
        assert_eq!(filter_languages(&declared, &vec(&["es", "fr"])), set(&["es"]));
    }

    #[test]
    fn test_disjoint_request_is_empty() {
        let declared = set(&["en", "es"]);
        assert!(filter_languages(&declared, &vec(&["de"])).is_empty());
    }

    #[test]
    fn test_presidio_languages() {
        let mut settings = EngineSettings::default();
        settings.nlp_config.models = vec![
            ModelSpec::new("en", "en_core_web_lg"),
            ModelSpec::new("es", "es_core_news_md"),
            ModelSpec::new("en", "en_core_web_trf"),
        ];
        assert_eq!(presidio_languages(&settings).unwrap(), set(&["en", "es"]));
    }

    #[test]
    fn test_presidio_languages_missing_lang_code() {
        let mut settings = EngineSettings::default();
        let mut model = ModelSpec::new("en", "en_core_web_lg");
        model.lang_code = None;
        settings.nlp_config.models = vec![model];
        let err = presidio_languages(&settings).unwrap_err();
        assert!(err.to_string().contains("missing 'lang_code'"));
    }
}
