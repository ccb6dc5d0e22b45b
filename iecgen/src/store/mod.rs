//! Session state store.
//!
//! All reads and mutations of the session and its history go through
//! [`SessionStore::dispatch`], a pure transition that returns the effects
//! the caller must carry out.

mod action;
mod state;

pub use action::{Action, Effect, Notification};
pub use state::{SessionStore, GENERATION_FAILED_PLACEHOLDER};
