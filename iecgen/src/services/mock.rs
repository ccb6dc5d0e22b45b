//! Offline stand-ins for the collaborator services.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use super::{Generator, ServiceError, SimulationReport, Simulator, Validator};
use crate::models::ValidationReport;

static NON_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("valid identifier pattern"));

/// Maximum length of the prompt-derived part of a function block name.
const BLOCK_NAME_LEN: usize = 20;

const SIMULATION_PASSED: &str =
    "Simulation completed successfully! Check console for detailed results.";

/// Mock backend rendering a Structured Text template.
#[derive(Debug, Clone, Default)]
pub struct MockServices {
    delay: Duration,
}

impl MockServices {
    pub const fn new() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    /// Add an artificial delay before every response.
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Derive a function block identifier from a prompt.
fn block_name(prompt: &str) -> String {
    let lowered = prompt.to_lowercase();
    let sanitized = NON_IDENTIFIER.replace_all(&lowered, "_");
    let short: String = sanitized.chars().take(BLOCK_NAME_LEN).collect();
    format!("FB_{short}")
}

fn render_function_block(prompt: &str) -> String {
    let name = block_name(prompt);
    format!(
        r#"FUNCTION_BLOCK {name}
VAR_INPUT
    bStart : BOOL := FALSE;
    bStop : BOOL := FALSE;
    bReset : BOOL := FALSE;
END_VAR

VAR_OUTPUT
    bRunning : BOOL := FALSE;
    bError : BOOL := FALSE;
    nStatus : INT := 0;
END_VAR

VAR
    tTimer : TON;
    nStep : INT := 0;
    bInit : BOOL := TRUE;
END_VAR

// Generated code based on prompt: "{prompt}"
IF bInit THEN
    bInit := FALSE;
    nStep := 0;
    bRunning := FALSE;
    bError := FALSE;
    nStatus := 0;
END_IF

CASE nStep OF
    0: // Idle state
        IF bStart AND NOT bStop THEN
            nStep := 10;
            bRunning := TRUE;
            nStatus := 1;
        END_IF

    10: // Running state
        IF bStop OR bError THEN
            nStep := 20;
        END_IF

    20: // Stopping state
        bRunning := FALSE;
        nStatus := 0;
        nStep := 0;
END_CASE

// Reset functionality
IF bReset THEN
    bError := FALSE;
    nStatus := 0;
    nStep := 0;
    bRunning := FALSE;
END_IF

END_FUNCTION_BLOCK"#
    )
}

#[async_trait]
impl Generator for MockServices {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.pause().await;
        Ok(render_function_block(prompt))
    }
}

#[async_trait]
impl Validator for MockServices {
    async fn validate(&self, code: &str) -> Result<ValidationReport, ServiceError> {
        self.pause().await;
        if !code.contains("FUNCTION_BLOCK") {
            return Ok(ValidationReport::invalid("missing FUNCTION_BLOCK declaration"));
        }
        if code.contains("ERROR") {
            return Ok(ValidationReport::invalid("code contains an ERROR marker"));
        }
        Ok(ValidationReport::valid())
    }
}

#[async_trait]
impl Simulator for MockServices {
    async fn simulate(&self, _code: &str) -> Result<SimulationReport, ServiceError> {
        self.pause().await;
        Ok(SimulationReport {
            passed: true,
            message: SIMULATION_PASSED.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_name_sanitizes_and_truncates() {
        assert_eq!(block_name("PID loop"), "FB_pid_loop");
        assert_eq!(
            block_name("Create a timer function block"),
            "FB_create_a_timer_funct"
        );
    }

    #[tokio::test]
    async fn test_generated_code_validates() {
        let mock = MockServices::new();
        let code = mock.generate("Write a PID controller").await.unwrap();
        assert!(code.starts_with("FUNCTION_BLOCK FB_write_a_pid_controll"));
        assert!(code.contains(r#"prompt: "Write a PID controller""#));

        let report = mock.validate(&code).await.unwrap();
        assert!(report.valid);
    }

    #[tokio::test]
    async fn test_validator_rejects() {
        let mock = MockServices::new();
        assert!(!mock.validate("PROGRAM Main").await.unwrap().valid);

        let report = mock
            .validate("FUNCTION_BLOCK FB_x\n// ERROR\nEND_FUNCTION_BLOCK")
            .await
            .unwrap();
        assert!(!report.valid);
        assert!(report.errors.is_some());
    }

    #[tokio::test]
    async fn test_simulator_passes() {
        let report = MockServices::new().simulate("anything").await.unwrap();
        assert!(report.passed);
        assert_eq!(report.message, SIMULATION_PASSED);
    }
}
