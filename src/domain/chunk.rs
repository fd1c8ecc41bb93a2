//! Document chunks, the unit of text handed to a task by the host pipeline

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Context attached to a chunk by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkContext {
    /// Language of the chunk text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Any other context fields (document metadata, section info, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A unit of document text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Chunk identifier, propagated to every entity found in it
    pub id: String,
    /// Chunk text
    pub data: String,
    /// Optional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ChunkContext>,
}

impl DocumentChunk {
    /// Create a chunk without context
    pub fn new(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            context: None,
        }
    }

    /// Set the chunk language
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.context.get_or_insert_with(ChunkContext::default).lang = Some(lang.into());
        self
    }

    /// Language declared in the chunk context, if any
    pub fn lang(&self) -> Option<&str> {
        self.context.as_ref().and_then(|c| c.lang.as_deref())
    }
}
