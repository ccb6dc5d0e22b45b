//! External collaborators: generation, validation and simulation services.
//!
//! The core only knows the request/response contract. Two backends ship:
//! an offline mock and a JSON-over-HTTP client.

mod http;
mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ValidationReport;

pub use http::HttpServices;
pub use mock::MockServices;

/// Failure reported by, or while talking to, a collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("collaborator task aborted: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Pass/fail result of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub passed: bool,
    #[serde(default)]
    pub message: String,
}

/// Turns a natural-language prompt into control code.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Checks a code artifact.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, code: &str) -> Result<ValidationReport, ServiceError>;
}

/// Executes a code artifact against a simulated target.
#[async_trait]
pub trait Simulator: Send + Sync {
    async fn simulate(&self, code: &str) -> Result<SimulationReport, ServiceError>;
}

/// The three collaborators the session driver dispatches to.
#[derive(Clone)]
pub struct Services {
    pub generator: Arc<dyn Generator>,
    pub validator: Arc<dyn Validator>,
    pub simulator: Arc<dyn Simulator>,
}

impl Services {
    /// Use one backend for all three collaborators.
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: Generator + Validator + Simulator + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            generator: backend.clone(),
            validator: backend.clone(),
            simulator: backend,
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
