pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod launcher;
pub mod orchestrator;
pub mod redact;
pub mod retention;

pub use error::{BackupError, Result};
