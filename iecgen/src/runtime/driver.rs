//! Session driver.
//!
//! Owns the store, the repository and the collaborator services. Persistence
//! effects run inline; collaborator calls run as spawned tasks whose results
//! come back over a channel and are applied in arrival order.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::services::{ServiceError, Services};
use crate::storage::SessionRepository;
use crate::store::{Action, Effect, Notification, SessionStore};

/// Capacity of the completion channel.
const COMPLETION_BUFFER: usize = 32;

pub struct SessionDriver<R> {
    store: SessionStore,
    repository: R,
    services: Services,
    completion_tx: mpsc::Sender<Action>,
    completion_rx: mpsc::Receiver<Action>,
    in_flight: usize,
    notifications: Vec<Notification>,
}

impl<R: SessionRepository> SessionDriver<R> {
    /// Hydrate a store from `repository` and wire it to `services`.
    pub fn new(repository: R, services: Services) -> Self {
        let persisted = repository.load();
        debug!(
            theme = %persisted.theme,
            entries = persisted.history.len(),
            "session hydrated"
        );

        let (completion_tx, completion_rx) = mpsc::channel(COMPLETION_BUFFER);
        Self {
            store: SessionStore::hydrate(persisted.theme, persisted.history),
            repository,
            services,
            completion_tx,
            completion_rx,
            in_flight: 0,
            notifications: Vec::new(),
        }
    }

    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    #[allow(dead_code)]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Number of collaborator requests still awaiting a result.
    #[allow(dead_code)]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply an action and start whatever work it requires.
    ///
    /// Returns without waiting for collaborators; see [`Self::settle`].
    pub fn dispatch(&mut self, action: Action) {
        if action.is_completion() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        for effect in self.store.dispatch(action) {
            self.perform(effect);
        }
    }

    /// Apply completions until no request is outstanding.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            let Some(action) = self.completion_rx.recv().await else {
                break;
            };
            self.dispatch(action);
        }
    }

    /// Dispatch an action and wait for all work it started.
    pub async fn run(&mut self, action: Action) {
        self.dispatch(action);
        self.settle().await;
    }

    /// Drain notifications produced so far.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::PersistHistory(history) => {
                if let Err(e) = self.repository.save_history(&history) {
                    warn!(error = %e, "failed to save history");
                }
            }
            Effect::PersistTheme(theme) => {
                if let Err(e) = self.repository.save_theme(theme) {
                    warn!(error = %e, "failed to save theme");
                }
            }
            Effect::Notify(notification) => {
                info!(%notification, "notification");
                self.notifications.push(notification);
            }
            Effect::Generate { request, prompt } => {
                let generator = self.services.generator.clone();
                let recorded = prompt.clone();
                self.spawn(
                    async move {
                        let outcome = generator.generate(&prompt).await;
                        Action::GenerationFinished {
                            request,
                            prompt,
                            outcome,
                        }
                    },
                    move |err| Action::GenerationFinished {
                        request,
                        prompt: recorded,
                        outcome: Err(err),
                    },
                );
            }
            Effect::Validate { request, code } => {
                let validator = self.services.validator.clone();
                self.spawn(
                    async move {
                        let outcome = validator.validate(&code).await;
                        Action::ValidationFinished { request, outcome }
                    },
                    move |err| Action::ValidationFinished {
                        request,
                        outcome: Err(err),
                    },
                );
            }
            Effect::Simulate { request, code } => {
                let simulator = self.services.simulator.clone();
                self.spawn(
                    async move {
                        let outcome = simulator.simulate(&code).await;
                        Action::SimulationFinished { request, outcome }
                    },
                    move |err| Action::SimulationFinished {
                        request,
                        outcome: Err(err),
                    },
                );
            }
        }
    }

    /// Run `call` on its own task. If it panics or is cancelled, `aborted`
    /// builds the completion instead, so every request is answered.
    fn spawn<F, A>(&mut self, call: F, aborted: A)
    where
        F: std::future::Future<Output = Action> + Send + 'static,
        A: FnOnce(ServiceError) -> Action + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let action = match tokio::spawn(call).await {
                Ok(action) => action,
                Err(e) => {
                    warn!(error = %e, "collaborator task aborted");
                    aborted(ServiceError::Aborted(e.to_string()))
                }
            };
            let _ = tx.send(action).await;
        });
    }
}
