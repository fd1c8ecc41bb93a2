//! Integration tests for PII detection through the Presidio task

mod common;

use common::{langs, MockFactory};
use pii_extract_plg_presidio::config::{load_presidio_plugin_config, ConfigSource};
use pii_extract_plg_presidio::domain::{DocumentChunk, PiiEnum, PluginError};
use pii_extract_plg_presidio::engine::{EngineCache, RecognizerResult};
use pii_extract_plg_presidio::task::{PiiTask, PresidioTask, PresidioTaskCollector};
use serde_json::json;
use std::sync::Arc;

const TURING: &str = "The English mathematician Alan Turing is considered the father of AI";

fn turing_hits() -> Vec<RecognizerResult> {
    vec![
        RecognizerResult::new(26, 37, "PERSON", 0.85),
        RecognizerResult::new(4, 11, "NRP", 0.85),
    ]
}

fn build_task(
    factory: MockFactory,
    source: Option<ConfigSource>,
    lang: &[&str],
) -> (Arc<MockFactory>, pii_extract_plg_presidio::domain::Result<PresidioTask>) {
    let factory = Arc::new(factory);
    let collector = PresidioTaskCollector::new(
        load_presidio_plugin_config(source.as_ref()).unwrap(),
        &[],
        false,
        factory.clone(),
        Arc::new(EngineCache::new()),
    )
    .unwrap();
    let task = collector.gather_tasks(&langs(lang))[0].build();
    (factory, task)
}

#[test]
fn test_detect_english_chunk() {
    let (factory, task) = build_task(MockFactory::new().with_hits(turing_hits()), None, &["en"]);
    let task = task.unwrap();

    let chunk = DocumentChunk::new("1", TURING).with_lang("en");
    let found = task.find(&chunk).unwrap();

    assert_eq!(found.len(), 2);

    assert_eq!(found[0].info.pii, PiiEnum::Norp);
    assert_eq!(found[0].value, "English");
    assert_eq!(found[0].start, 4);
    assert_eq!(found[0].end(), 11);

    assert_eq!(found[1].info.pii, PiiEnum::Person);
    assert_eq!(found[1].value, "Alan Turing");
    assert_eq!(found[1].start, 26);
    assert_eq!(found[1].end(), 37);

    for entity in &found {
        assert_eq!(entity.chunk_id, "1");
        assert_eq!(entity.info.lang.as_deref(), Some("en"));
        assert_eq!(entity.process.stage, "detection");
        assert_eq!(entity.process.score, 0.85);
    }

    let calls = factory.analyze_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].language, "en");
    assert_eq!(calls[0].text, TURING);
    let mut requested = calls[0].entities.clone();
    requested.sort();
    assert_eq!(
        requested,
        vec!["LOCATION", "NRP", "PERSON", "US_DRIVER_LICENSE", "US_PASSPORT"]
    );
}

#[test]
fn test_entity_dict_form() {
    let (_, task) = build_task(MockFactory::new().with_hits(turing_hits()), None, &["en"]);
    let found = task
        .unwrap()
        .find(&DocumentChunk::new("1", TURING).with_lang("en"))
        .unwrap();

    assert_eq!(
        found[1].as_dict(),
        json!({
            "type": "PERSON",
            "lang": "en",
            "chunkid": "1",
            "process": {"stage": "detection", "score": 0.85},
            "value": "Alan Turing",
            "start": 26,
            "end": 37
        })
    );
}

#[test]
fn test_default_language_used_for_chunk_without_lang() {
    let (factory, task) = build_task(MockFactory::new().with_hits(turing_hits()), None, &["en"]);
    let task = task.unwrap();
    assert_eq!(task.default_lang(), Some("en"));

    let found = task.find(&DocumentChunk::new("7", TURING)).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(factory.analyze_calls()[0].language, "en");
}

#[test]
fn test_chunk_without_language_on_multilanguage_task() {
    let (_, task) = build_task(MockFactory::new(), None, &["en", "es"]);
    let task = task.unwrap();
    assert_eq!(task.default_lang(), None);

    let err = task.find(&DocumentChunk::new("1", TURING)).unwrap_err();
    assert!(matches!(err, PluginError::NoLanguage));
    assert!(err.is_language_resolution());
    assert_eq!(
        err.to_string(),
        "Presidio task exception: no language defined in task or document chunk"
    );
}

#[test]
fn test_chunk_language_without_mapping() {
    let (_, task) = build_task(MockFactory::new(), None, &["en"]);
    let task = task.unwrap();

    let err = task
        .find(&DocumentChunk::new("1", "Bonjour").with_lang("fr"))
        .unwrap_err();
    assert!(err.is_language_resolution());
    assert_eq!(err.to_string(), "Presidio task exception: no tasks for lang: fr");
}

#[test]
fn test_task_stays_usable_after_chunk_failure() {
    let (_, task) = build_task(MockFactory::new().with_hits(turing_hits()), None, &["en", "es"]);
    let task = task.unwrap();

    assert!(task.find(&DocumentChunk::new("1", TURING)).is_err());
    let found = task
        .find(&DocumentChunk::new("2", TURING).with_lang("en"))
        .unwrap();
    assert_eq!(found.len(), 2);
}

#[test]
fn test_results_sorted_by_offset() {
    let hits = vec![
        RecognizerResult::new(32, 36, "LOCATION", 0.6),
        RecognizerResult::new(0, 4, "PERSON", 0.9),
        RecognizerResult::new(18, 24, "LOCATION", 0.7),
    ];
    let (_, task) = build_task(MockFactory::new().with_hits(hits), None, &["en"]);
    let text = "John travelled to Madrid and to Rome";

    let found = task
        .unwrap()
        .find(&DocumentChunk::new("1", text).with_lang("en"))
        .unwrap();

    let values: Vec<(usize, &str)> = found.iter().map(|e| (e.start, e.value.as_str())).collect();
    assert_eq!(values, vec![(0, "John"), (18, "Madrid"), (32, "Rome")]);
}

#[test]
fn test_missing_recognizer() {
    let source = ConfigSource::Inline(json!({
        "pii_list": [
            {"type": "OTHER", "lang": "en", "extra": {"presidio": "FOO"}}
        ]
    }));
    let (_, task) = build_task(MockFactory::new(), Some(source), &["en"]);

    let err = task.unwrap_err();
    assert!(matches!(err, PluginError::RecognizerMismatch { ref missing } if missing == &["FOO"]));
    assert!(err.to_string().contains("FOO"));
    assert_eq!(err.to_string(), "recognizer for {'FOO'} not found in Presidio");
}

#[test]
fn test_engine_failure_during_analysis() {
    let (_, task) = build_task(
        MockFactory::new().failing_analyze("bad language"),
        None,
        &["en"],
    );

    let err = task
        .unwrap()
        .find(&DocumentChunk::new("1", TURING).with_lang("en"))
        .unwrap_err();
    assert!(matches!(err, PluginError::Detection { .. }));
    assert!(!err.is_fatal_for_task());
    assert_eq!(
        err.to_string(),
        "Presidio exception: InvalidParameter: Invalid analyzer parameter: bad language"
    );
}

#[test]
fn test_subtype_and_country_in_results() {
    let hits = vec![RecognizerResult::new(12, 21, "US_PASSPORT", 0.4)];
    let (_, task) = build_task(MockFactory::new().with_hits(hits), None, &["en"]);

    let found = task
        .unwrap()
        .find(&DocumentChunk::new("p", "Passport no 912803456").with_lang("en"))
        .unwrap();

    assert_eq!(found[0].info.pii, PiiEnum::GovId);
    assert_eq!(found[0].info.subtype.as_deref(), Some("US passport"));
    assert_eq!(found[0].info.country.as_deref(), Some("us"));
    assert_eq!(found[0].value, "912803456");
}
