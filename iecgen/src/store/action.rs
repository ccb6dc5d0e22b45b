//! Messages into and out of the session store.

use crate::models::{History, Theme, ValidationReport};
use crate::services::{ServiceError, SimulationReport};

/// Identifies one collaborator request so its result can be logged against it.
pub type RequestId = u64;

/// Input to the store: a user action or a collaborator completion.
#[derive(Debug)]
pub enum Action {
    /// Replace the prompt verbatim.
    SetPrompt(String),
    /// Replace the prompt with a built-in example.
    UseExample(usize),
    RequestGeneration,
    RequestValidation,
    RequestSimulation,
    /// Restore prompt and code from a history entry.
    LoadFromHistory(String),
    ToggleTheme,
    /// Empty the history and persist the empty list.
    ClearHistory,

    GenerationFinished {
        request: RequestId,
        /// Prompt as it was when the request was issued.
        prompt: String,
        outcome: Result<String, ServiceError>,
    },
    ValidationFinished {
        request: RequestId,
        outcome: Result<ValidationReport, ServiceError>,
    },
    SimulationFinished {
        request: RequestId,
        outcome: Result<SimulationReport, ServiceError>,
    },
}

impl Action {
    /// Whether this action answers an earlier collaborator request.
    pub const fn is_completion(&self) -> bool {
        matches!(
            self,
            Self::GenerationFinished { .. }
                | Self::ValidationFinished { .. }
                | Self::SimulationFinished { .. }
        )
    }
}

/// User-facing message produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    SimulationPassed(String),
    SimulationFailed(String),
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SimulationPassed(message) | Self::SimulationFailed(message) => {
                write!(f, "{message}")
            }
        }
    }
}

/// Work the store asks its caller to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Generate { request: RequestId, prompt: String },
    Validate { request: RequestId, code: String },
    Simulate { request: RequestId, code: String },
    /// Overwrite the persisted history with this full list.
    PersistHistory(History),
    PersistTheme(Theme),
    Notify(Notification),
}
