//! Presidio analyzer REST backend
//!
//! Drives a running Presidio analyzer service (`presidio-analyzer` docker
//! image or equivalent). NLP models are loaded by the service itself, so the
//! model configuration only determines which languages the engine accepts.

use super::{AnalyzerEngine, AnalyzerFactory, EngineSpec, RecognizerInfo, RecognizerResult};
use crate::defs;
use crate::domain::EngineError;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Parameter selecting the service endpoint
const PARAM_URL: &str = "url";
/// Parameter selecting the request timeout, in seconds
const PARAM_TIMEOUT: &str = "timeout_secs";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Factory building [`PresidioHttpAnalyzer`] engines
///
/// The endpoint is taken from the `url` analyzer parameter, then from the
/// `PRESIDIO_ANALYZER_URL` environment variable, then from the factory
/// default.
#[derive(Debug, Clone)]
pub struct PresidioHttpFactory {
    base_url: String,
    timeout: Duration,
}

impl Default for PresidioHttpFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PresidioHttpFactory {
    pub fn new() -> Self {
        let base_url = std::env::var(defs::ENV_ANALYZER_URL)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| defs::DEFAULT_ANALYZER_URL.to_string());
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl AnalyzerFactory for PresidioHttpFactory {
    fn name(&self) -> &str {
        "presidio-http"
    }

    fn create(&self, spec: &EngineSpec) -> Result<Arc<dyn AnalyzerEngine>, EngineError> {
        let mut params = spec.params.clone();

        let base_url = match params.remove(PARAM_URL) {
            None => self.base_url.clone(),
            Some(Value::String(url)) => url,
            Some(other) => {
                return Err(EngineError::InvalidParameter(format!(
                    "'{PARAM_URL}' must be a string, got {other}"
                )))
            }
        };
        let timeout = match params.remove(PARAM_TIMEOUT) {
            None => self.timeout,
            Some(value) => value.as_u64().map(Duration::from_secs).ok_or_else(|| {
                EngineError::InvalidParameter(format!(
                    "'{PARAM_TIMEOUT}' must be a positive integer, got {value}"
                ))
            })?,
        };

        let analyzer = PresidioHttpAnalyzer::connect(
            base_url,
            timeout,
            spec.effective_languages(),
            params,
        )?;
        Ok(Arc::new(analyzer))
    }
}

/// Analyzer engine backed by a Presidio analyzer service
#[derive(Debug)]
pub struct PresidioHttpAnalyzer {
    base_url: String,
    client: Client,
    languages: BTreeSet<String>,
    /// Extra fields merged into every analyze request
    request_params: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecognizerEntry {
    Name(String),
    Full(RecognizerInfo),
}

impl PresidioHttpAnalyzer {
    /// Connect to a service and check it is alive
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the HTTP client cannot be built or the
    /// service health check fails
    pub fn connect(
        base_url: impl Into<String>,
        timeout: Duration,
        languages: BTreeSet<String>,
        request_params: Map<String, Value>,
    ) -> Result<Self, EngineError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EngineError::Other(format!("Failed to build HTTP client: {e}")))?;

        let analyzer = Self {
            base_url,
            client,
            languages,
            request_params,
        };
        analyzer.health()?;
        tracing::debug!(
            url = %analyzer.base_url,
            languages = ?analyzer.languages,
            "Connected to Presidio analyzer"
        );
        Ok(analyzer)
    }

    pub fn languages(&self) -> &BTreeSet<String> {
        &self.languages
    }

    fn health(&self) -> Result<(), EngineError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| EngineError::ConnectionFailed(format!("{url}: {e}")))?;
        check_status(response).map(|_| ())
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        language: &str,
    ) -> Result<T, EngineError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(&[("language", language)])
            .send()
            .map_err(|e| EngineError::ConnectionFailed(format!("{url}: {e}")))?;
        check_status(response)?
            .json()
            .map_err(|e| EngineError::InvalidResponse(format!("{path}: {e}")))
    }

    fn check_language(&self, language: &str) -> Result<(), EngineError> {
        if self.languages.is_empty() || self.languages.contains(language) {
            Ok(())
        } else {
            Err(EngineError::UnsupportedLanguage(language.to_string()))
        }
    }
}

impl AnalyzerEngine for PresidioHttpAnalyzer {
    fn supported_entities(&self) -> Result<BTreeSet<String>, EngineError> {
        let mut entities = BTreeSet::new();
        for lang in &self.languages {
            let found: Vec<String> = self.get_json("supportedentities", lang)?;
            entities.extend(found);
        }
        Ok(entities)
    }

    fn analyze(
        &self,
        text: &str,
        language: &str,
        entities: &[String],
    ) -> Result<Vec<RecognizerResult>, EngineError> {
        self.check_language(language)?;

        let mut body = self.request_params.clone();
        body.insert("text".into(), Value::from(text));
        body.insert("language".into(), Value::from(language));
        body.insert("entities".into(), Value::from(entities.to_vec()));

        let url = format!("{}/analyze", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| EngineError::ConnectionFailed(format!("{url}: {e}")))?;

        check_status(response)?
            .json()
            .map_err(|e| EngineError::InvalidResponse(format!("analyze: {e}")))
    }

    fn recognizers(&self) -> Result<Vec<RecognizerInfo>, EngineError> {
        let mut out = Vec::new();
        for lang in &self.languages {
            let entries: Vec<RecognizerEntry> = self.get_json("recognizers", lang)?;
            out.extend(entries.into_iter().map(|entry| match entry {
                RecognizerEntry::Name(name) => RecognizerInfo::named(name, lang.as_str()),
                RecognizerEntry::Full(mut info) => {
                    if info.supported_language.is_empty() {
                        info.supported_language = lang.clone();
                    }
                    info
                }
            }));
        }
        Ok(out)
    }
}

fn check_status(response: Response) -> Result<Response, EngineError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.text() {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(status = status.as_u16(), error = %e, "Failed to read analyzer error body");
            format!("<unreadable response body: {e}>")
        }
    };
    Err(EngineError::Status {
        status: status.as_u16(),
        message,
    })
}
