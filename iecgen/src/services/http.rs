//! JSON-over-HTTP client for remote collaborator services.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{Generator, ServiceError, SimulationReport, Simulator, Validator};
use crate::models::ValidationReport;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    code: String,
}

#[derive(Debug, Serialize)]
struct CodeRequest<'a> {
    code: &'a str,
}

/// Client for a service exposing `/generate`, `/validate` and `/simulate`.
#[derive(Debug, Clone)]
pub struct HttpServices {
    client: reqwest::Client,
    base_url: String,
}

impl HttpServices {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(%url, "calling collaborator");

        let resp = self.client.post(&url).json(body).send().await?;
        if !resp.status().is_success() {
            return Err(ServiceError::Status(resp.status().as_u16()));
        }

        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Generator for HttpServices {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let response: GenerateResponse = self.post("generate", &GenerateRequest { prompt }).await?;
        if response.code.trim().is_empty() {
            return Err(ServiceError::Rejected("empty code artifact".to_string()));
        }
        Ok(response.code)
    }
}

#[async_trait]
impl Validator for HttpServices {
    async fn validate(&self, code: &str) -> Result<ValidationReport, ServiceError> {
        self.post("validate", &CodeRequest { code }).await
    }
}

#[async_trait]
impl Simulator for HttpServices {
    async fn simulate(&self, code: &str) -> Result<SimulationReport, ServiceError> {
        self.post("simulate", &CodeRequest { code }).await
    }
}
