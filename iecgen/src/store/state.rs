//! Transition function of the session store.

use tracing::{debug, warn};

use super::action::{Action, Effect, Notification, RequestId};
use crate::models::{Generation, History, Session, Theme, ValidationReport, ValidationStatus};
use crate::prompts;
use crate::services::{ServiceError, SimulationReport};

/// Code shown in place of an artifact when generation fails.
pub const GENERATION_FAILED_PLACEHOLDER: &str =
    "// Error: Failed to generate code. Please try again.";

const SIMULATION_FAILED: &str = "Simulation failed. Please check your code syntax.";

/// Single owner of the session and its history.
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Session,
    history: History,
    next_request: RequestId,
}

impl SessionStore {
    /// Create a store from persisted theme and history.
    pub fn hydrate(theme: Theme, history: History) -> Self {
        Self {
            session: Session::with_theme(theme),
            history,
            next_request: 0,
        }
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Apply one action and return the effects it produced.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::SetPrompt(text) => {
                self.session.prompt = text;
                Vec::new()
            }
            Action::UseExample(index) => {
                if let Some(example) = prompts::example(index) {
                    self.session.prompt = example.to_string();
                }
                Vec::new()
            }
            Action::RequestGeneration => self.request_generation(),
            Action::RequestValidation => self.request_validation(),
            Action::RequestSimulation => self.request_simulation(),
            Action::LoadFromHistory(id) => {
                self.load_from_history(&id);
                Vec::new()
            }
            Action::ToggleTheme => {
                self.session.theme = self.session.theme.toggled();
                vec![Effect::PersistTheme(self.session.theme)]
            }
            Action::ClearHistory => {
                // Written even when empty so unreadable stored data is replaced.
                self.history.clear();
                vec![Effect::PersistHistory(self.history.clone())]
            }
            Action::GenerationFinished {
                request,
                prompt,
                outcome,
            } => self.finish_generation(request, prompt, outcome),
            Action::ValidationFinished { request, outcome } => {
                self.finish_validation(request, outcome);
                Vec::new()
            }
            Action::SimulationFinished { request, outcome } => {
                self.finish_simulation(request, outcome)
            }
        }
    }

    fn next_request(&mut self) -> RequestId {
        self.next_request += 1;
        self.next_request
    }

    fn request_generation(&mut self) -> Vec<Effect> {
        let prompt = self.session.prompt.trim();
        if prompt.is_empty() {
            return Vec::new();
        }
        let prompt = prompt.to_string();

        let request = self.next_request();
        self.session.activity.generating += 1;
        self.session.generation_error = None;
        self.session.validation_status = ValidationStatus::Idle;
        self.session.validation_report = None;
        debug!(request, "generation requested");

        vec![Effect::Generate { request, prompt }]
    }

    fn finish_generation(
        &mut self,
        request: RequestId,
        prompt: String,
        outcome: Result<String, ServiceError>,
    ) -> Vec<Effect> {
        self.session.activity.generating = self.session.activity.generating.saturating_sub(1);

        match outcome {
            Ok(code) => {
                let generation = Generation::new(prompt, code.clone());
                debug!(request, id = %generation.id, "generation recorded");
                self.session.generated_code = code;
                self.session.generation_error = None;
                self.history.push_front(generation);
                vec![Effect::PersistHistory(self.history.clone())]
            }
            Err(err) => {
                warn!(request, error = %err, "generation failed");
                self.session.generated_code = GENERATION_FAILED_PLACEHOLDER.to_string();
                self.session.generation_error = Some(err.to_string());
                Vec::new()
            }
        }
    }

    fn request_validation(&mut self) -> Vec<Effect> {
        if self.session.generated_code.trim().is_empty() {
            return Vec::new();
        }

        let request = self.next_request();
        self.session.activity.validating += 1;
        debug!(request, "validation requested");

        vec![Effect::Validate {
            request,
            code: self.session.generated_code.clone(),
        }]
    }

    fn finish_validation(
        &mut self,
        request: RequestId,
        outcome: Result<ValidationReport, ServiceError>,
    ) {
        self.session.activity.validating = self.session.activity.validating.saturating_sub(1);

        match outcome {
            Ok(report) => {
                self.session.validation_status = if report.valid {
                    ValidationStatus::Valid
                } else {
                    ValidationStatus::Invalid
                };
                self.session.validation_report = Some(report);
            }
            Err(err) => {
                warn!(request, error = %err, "validation failed");
                self.session.validation_status = ValidationStatus::Invalid;
                self.session.validation_report = Some(ValidationReport::invalid(err.to_string()));
            }
        }
        debug!(request, status = %self.session.validation_status, "validation applied");
    }

    fn request_simulation(&mut self) -> Vec<Effect> {
        if self.session.generated_code.trim().is_empty() {
            return Vec::new();
        }

        let request = self.next_request();
        self.session.activity.simulating += 1;
        debug!(request, "simulation requested");

        vec![Effect::Simulate {
            request,
            code: self.session.generated_code.clone(),
        }]
    }

    fn finish_simulation(
        &mut self,
        request: RequestId,
        outcome: Result<SimulationReport, ServiceError>,
    ) -> Vec<Effect> {
        self.session.activity.simulating = self.session.activity.simulating.saturating_sub(1);

        let notification = match outcome {
            Ok(report) if report.passed => Notification::SimulationPassed(report.message),
            Ok(report) => {
                let message = if report.message.is_empty() {
                    SIMULATION_FAILED.to_string()
                } else {
                    report.message
                };
                Notification::SimulationFailed(message)
            }
            Err(err) => {
                warn!(request, error = %err, "simulation failed");
                Notification::SimulationFailed(SIMULATION_FAILED.to_string())
            }
        };

        vec![Effect::Notify(notification)]
    }

    fn load_from_history(&mut self, id: &str) {
        let Some(generation) = self.history.find(id) else {
            debug!(id, "history entry not found");
            return;
        };

        self.session.prompt.clone_from(&generation.prompt);
        self.session.generated_code.clone_from(&generation.code);
        self.session.validation_status = ValidationStatus::Idle;
        self.session.validation_report = None;
    }
}
