use crate::utils::error::{RelayError, Result};
use serde::{Deserialize, Serialize};

/// One fragment of calendar markup tagged with the language it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub language: String,
    pub content: String,
}

impl ContentItem {
    pub fn new(language: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            content: content.into(),
        }
    }

    /// Reads a webhook body as an ordered list of items.
    pub fn parse_batch(payload: &serde_json::Value) -> Result<Vec<Self>> {
        Vec::<Self>::deserialize(payload).map_err(RelayError::InvalidPayload)
    }

    pub fn language(&self) -> Option<Language> {
        Language::from_tag(&self.language)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    French,
    English,
}

impl Language {
    /// Tags are matched exactly; `"fr"` or `" FR"` are not French.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "FR" => Some(Language::French),
            "EN" => Some(Language::English),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitDocuments {
    pub french: String,
    pub english: String,
}

/// Result of the remote half of a request. The caller is acknowledged either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied,
    Failed { reason: String },
}

impl SyncOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOutcome::Applied => "applied",
            SyncOutcome::Failed { .. } => "failed",
        }
    }
}
