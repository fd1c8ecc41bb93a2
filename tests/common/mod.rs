//! Shared test helpers: an in-memory analyzer engine and its factory

#![allow(dead_code)]

use pii_extract_plg_presidio::domain::EngineError;
use pii_extract_plg_presidio::engine::{
    AnalyzerEngine, AnalyzerFactory, EngineSpec, RecognizerInfo, RecognizerResult,
};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Labels supported by the packaged default configuration
pub const DEFAULT_LABELS: &[&str] = &[
    "PERSON",
    "NRP",
    "LOCATION",
    "US_PASSPORT",
    "US_DRIVER_LICENSE",
    "IT_FISCAL_CODE",
    "IT_IDENTITY_CARD",
];

/// One recorded `analyze` call
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeCall {
    pub text: String,
    pub language: String,
    pub entities: Vec<String>,
}

pub struct MockEngine {
    supported: BTreeSet<String>,
    hits: Vec<RecognizerResult>,
    analyze_error: Option<String>,
    calls: Arc<Mutex<Vec<AnalyzeCall>>>,
}

impl AnalyzerEngine for MockEngine {
    fn supported_entities(&self) -> Result<BTreeSet<String>, EngineError> {
        Ok(self.supported.clone())
    }

    fn analyze(
        &self,
        text: &str,
        language: &str,
        entities: &[String],
    ) -> Result<Vec<RecognizerResult>, EngineError> {
        self.calls.lock().unwrap().push(AnalyzeCall {
            text: text.to_string(),
            language: language.to_string(),
            entities: entities.to_vec(),
        });
        match &self.analyze_error {
            Some(message) => Err(EngineError::InvalidParameter(message.clone())),
            None => Ok(self.hits.clone()),
        }
    }

    fn recognizers(&self) -> Result<Vec<RecognizerInfo>, EngineError> {
        Ok(vec![
            RecognizerInfo::named("SpacyRecognizer", "en"),
            RecognizerInfo::named("CreditCardRecognizer", "en"),
        ])
    }
}

/// Factory producing [`MockEngine`]s and counting constructions
pub struct MockFactory {
    pub created: AtomicUsize,
    pub specs: Mutex<Vec<EngineSpec>>,
    pub calls: Arc<Mutex<Vec<AnalyzeCall>>>,
    supported: BTreeSet<String>,
    hits: Vec<RecognizerResult>,
    analyze_error: Option<String>,
    create_error: Option<String>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::with_labels(DEFAULT_LABELS)
    }

    pub fn with_labels(labels: &[&str]) -> Self {
        Self {
            created: AtomicUsize::new(0),
            specs: Mutex::new(Vec::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
            supported: labels.iter().map(|l| l.to_string()).collect(),
            hits: Vec::new(),
            analyze_error: None,
            create_error: None,
        }
    }

    pub fn with_hits(mut self, hits: Vec<RecognizerResult>) -> Self {
        self.hits = hits;
        self
    }

    pub fn failing_analyze(mut self, message: &str) -> Self {
        self.analyze_error = Some(message.to_string());
        self
    }

    pub fn failing_create(mut self, message: &str) -> Self {
        self.create_error = Some(message.to_string());
        self
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn analyze_calls(&self) -> Vec<AnalyzeCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl AnalyzerFactory for MockFactory {
    fn name(&self) -> &str {
        "mock"
    }

    fn create(&self, spec: &EngineSpec) -> Result<Arc<dyn AnalyzerEngine>, EngineError> {
        if let Some(message) = &self.create_error {
            return Err(EngineError::Other(message.clone()));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        self.specs.lock().unwrap().push(spec.clone());
        Ok(Arc::new(MockEngine {
            supported: self.supported.clone(),
            hits: self.hits.clone(),
            analyze_error: self.analyze_error.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}

pub fn langs(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}
