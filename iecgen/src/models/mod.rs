//! Data models for the generation session.

mod generation;
mod history;
mod session;

pub use generation::Generation;
pub use history::{History, HISTORY_LIMIT};
pub use session::{Activity, Session, Theme, ValidationReport, ValidationStatus};
