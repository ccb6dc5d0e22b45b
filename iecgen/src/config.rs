//! Runtime configuration resolved from command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::services::{HttpServices, MockServices, Services};
use crate::storage::{FileStore, KvSessionRepository};

const APP_DIR: &str = "iecgen";

/// Which collaborator backend to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Offline stand-ins with an optional artificial delay.
    Mock { delay: Duration },
    /// Remote service at `url`.
    Http { url: String, timeout: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the persisted store file.
    pub data_dir: PathBuf,
    pub backend: Backend,
}

impl Config {
    /// Resolve configuration from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => Self::default_data_dir()?,
        };

        let backend = match &cli.service_url {
            Some(url) => Backend::Http {
                url: url.clone(),
                timeout: Duration::from_secs(cli.timeout_secs),
            },
            None => Backend::Mock {
                delay: Duration::from_millis(cli.mock_delay_ms),
            },
        };

        Ok(Self { data_dir, backend })
    }

    /// Platform data directory, e.g. `~/.local/share/iecgen`.
    pub fn default_data_dir() -> Result<PathBuf> {
        let base = dirs::data_dir().context("Could not determine the user data directory")?;
        Ok(base.join(APP_DIR))
    }

    /// Open the file-backed session repository.
    pub fn repository(&self) -> Result<KvSessionRepository<FileStore>> {
        let store = FileStore::in_dir(&self.data_dir)
            .with_context(|| format!("Failed to open store in {}", self.data_dir.display()))?;
        Ok(KvSessionRepository::new(store))
    }

    /// Build the collaborator services for the configured backend.
    pub fn services(&self) -> Result<Services> {
        match &self.backend {
            Backend::Mock { delay } => Ok(Services::from_backend(MockServices::with_delay(*delay))),
            Backend::Http { url, timeout } => {
                let http = HttpServices::new(url, *timeout)
                    .with_context(|| format!("Failed to create client for {url}"))?;
                Ok(Services::from_backend(http))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_to_mock_backend() {
        let cli = Cli::parse_from(["iecgen", "--data-dir", "/tmp/iecgen-test", "history"]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/iecgen-test"));
        assert_eq!(config.backend, Backend::Mock { delay: Duration::ZERO });
    }

    #[test]
    fn test_service_url_selects_http() {
        let cli = Cli::parse_from([
            "iecgen",
            "--data-dir",
            "/tmp/iecgen-test",
            "--service-url",
            "http://localhost:8000",
            "--timeout-secs",
            "5",
            "history",
        ]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(
            config.backend,
            Backend::Http {
                url: "http://localhost:8000".to_string(),
                timeout: Duration::from_secs(5),
            }
        );
        assert!(config.services().is_ok());
    }
}
