//! Entity mapping
//!
//! Turns the (already filtered) mapping records into the per-language map
//! `language -> engine label -> host entity info` used by a task.

use crate::config::PiiRecord;
use crate::domain::{PiiEntityInfo, PluginError, Result};
use std::collections::BTreeMap;

/// Engine label -> host entity info, for one language
pub type LabelMap = BTreeMap<String, PiiEntityInfo>;

/// Language -> [`LabelMap`]
pub type EntityMap = BTreeMap<String, LabelMap>;

/// One (language, engine label) mapping
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEntity {
    /// Engine entity label
    pub label: String,
    /// Host entity info; its `lang` is always set
    pub info: PiiEntityInfo,
}

impl TaskEntity {
    pub fn lang(&self) -> &str {
        self.info.lang.as_deref().unwrap_or_default()
    }
}

/// Expand mapping records into one entry per (language, label), in
/// declaration order (record first, then its languages)
///
/// A record without a language removes every entry contributed so far by
/// records with the same (type, subtype) key, in every language. A later
/// record mapping the same (language, label) replaces the earlier entry in
/// place.
///
/// # Errors
///
/// Returns a [`PluginError::Configuration`] if a record lacks its engine label
pub fn demultiplex(records: &[PiiRecord]) -> Result<Vec<TaskEntity>> {
    let mut entries: Vec<TaskEntity> = Vec::new();

    for record in records {
        let Some(langs) = record.languages() else {
            entries.retain(|e| !(e.info.pii == record.pii_type && e.info.subtype == record.subtype));
            continue;
        };

        let label = record.label().ok_or_else(|| {
            PluginError::Configuration(format!(
                "invalid Presidio config: missing field 'presidio' in: {record:?}"
            ))
        })?;

        for lang in langs {
            let entry = TaskEntity {
                label: label.to_string(),
                info: PiiEntityInfo::new(
                    record.pii_type,
                    Some(lang),
                    record.country.clone(),
                    record.subtype.clone(),
                ),
            };
            match entries
                .iter_mut()
                .find(|e| e.label == entry.label && e.info.lang == entry.info.lang)
            {
                Some(existing) => *existing = entry,
                None => entries.push(entry),
            }
        }
    }

    Ok(entries)
}

/// Build the entity map from mapping records
///
/// # Errors
///
/// Same as [`demultiplex`]
pub fn build_entity_map(records: &[PiiRecord]) -> Result<EntityMap> {
    Ok(entity_map(demultiplex(records)?))
}

/// Group demultiplexed entries by language
pub fn entity_map(entries: impl IntoIterator<Item = TaskEntity>) -> EntityMap {
    let mut map = EntityMap::new();
    for entry in entries {
        let lang = entry.lang().to_string();
        map.entry(lang).or_default().insert(entry.label, entry.info);
    }
    map
}

/// Total number of (language, label) mappings
pub fn mapping_count(map: &EntityMap) -> usize {
    map.values().map(BTreeMap::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PiiEnum;

    #[test]
    fn test_multilanguage_record_maps_each_language() {
        let records = vec![PiiRecord::new(PiiEnum::Person, &["en", "es"], "PERSON")];
        let map = build_entity_map(&records).unwrap();

        assert_eq!(mapping_count(&map), 2);
        let info = &map["es"]["PERSON"];
        assert_eq!(info.pii, PiiEnum::Person);
        assert_eq!(info.lang.as_deref(), Some("es"));
    }

    #[test]
    fn test_subtype_and_country_carried() {
        let records = vec![PiiRecord::new(PiiEnum::GovId, &["en"], "US_PASSPORT")
            .with_subtype("US passport")
            .with_country("us")];
        let map = build_entity_map(&records).unwrap();

        let info = &map["en"]["US_PASSPORT"];
        assert_eq!(info.subtype.as_deref(), Some("US passport"));
        assert_eq!(info.country.as_deref(), Some("us"));
    }

    #[test]
    fn test_retraction_removes_key_in_all_languages() {
        let records = vec![
            PiiRecord::new(PiiEnum::Location, &["en", "es"], "LOCATION"),
            PiiRecord::new(PiiEnum::Person, &["en"], "PERSON"),
            PiiRecord::retraction(PiiEnum::Location, None),
        ];
        let map = build_entity_map(&records).unwrap();

        assert_eq!(mapping_count(&map), 1);
        assert!(map["en"].contains_key("PERSON"));
        assert!(!map.contains_key("es"));
    }

    #[test]
    fn test_retraction_matches_subtype() {
        let records = vec![
            PiiRecord::new(PiiEnum::GovId, &["it"], "IT_FISCAL_CODE").with_subtype("Italian fiscal code"),
            PiiRecord::new(PiiEnum::GovId, &["it"], "IT_IDENTITY_CARD")
                .with_subtype("Italian identity card"),
            PiiRecord::retraction(PiiEnum::GovId, Some("Italian fiscal code")),
        ];
        let map = build_entity_map(&records).unwrap();

        assert_eq!(map["it"].keys().collect::<Vec<_>>(), vec!["IT_IDENTITY_CARD"]);
    }

    #[test]
    fn test_record_after_retraction_is_kept() {
        let records = vec![
            PiiRecord::new(PiiEnum::Person, &["en"], "PERSON"),
            PiiRecord::retraction(PiiEnum::Person, None),
            PiiRecord::new(PiiEnum::Person, &["es"], "PERSON"),
        ];
        let map = build_entity_map(&records).unwrap();

        assert!(!map.contains_key("en"));
        assert!(map["es"].contains_key("PERSON"));
    }

    #[test]
    fn test_demultiplex_order_is_record_then_language() {
        let records = vec![
            PiiRecord::new(PiiEnum::Person, &["en", "es"], "PERSON"),
            PiiRecord::new(PiiEnum::Norp, &["en", "es"], "NRP"),
        ];
        let entries = demultiplex(&records).unwrap();

        let got: Vec<(&str, &str)> = entries.iter().map(|e| (e.label.as_str(), e.lang())).collect();
        assert_eq!(
            got,
            vec![("PERSON", "en"), ("PERSON", "es"), ("NRP", "en"), ("NRP", "es")]
        );
    }

    #[test]
    fn test_same_label_replaced_in_place() {
        let records = vec![
            PiiRecord::new(PiiEnum::Location, &["en"], "LOCATION"),
            PiiRecord::new(PiiEnum::Person, &["en"], "PERSON"),
            PiiRecord::new(PiiEnum::StreetAddress, &["en"], "LOCATION"),
        ];
        let entries = demultiplex(&records).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "LOCATION");
        assert_eq!(entries[0].info.pii, PiiEnum::StreetAddress);
    }

    #[test]
    fn test_missing_label_is_configuration_error() {
        let mut record = PiiRecord::new(PiiEnum::Person, &["en"], "PERSON");
        record.extra.presidio = None;

        let err = build_entity_map(&[record]).unwrap_err();
        assert!(matches!(err, PluginError::Configuration(_)));
        assert!(err
            .to_string()
            .contains("invalid Presidio config: missing field 'presidio' in:"));
    }
}
