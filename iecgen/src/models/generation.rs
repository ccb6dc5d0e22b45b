//! Generation model representing one completed prompt-to-code cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generation pairs a prompt with the code produced for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    /// Unique identifier (`UUIDv7`, time-ordered).
    pub id: String,
    /// Prompt the code was generated from.
    pub prompt: String,
    /// Generated code artifact.
    pub code: String,
    /// When the generation was recorded.
    pub timestamp: DateTime<Utc>,
}

impl Generation {
    /// Create a new generation stamped with a fresh id and the current time.
    pub fn new(prompt: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            prompt: prompt.into(),
            code: code.into(),
            timestamp: Utc::now(),
        }
    }
}
