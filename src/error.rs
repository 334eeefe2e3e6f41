//! Error types
//!
//! `ApiError` covers talking to the backend; `WizardError` is what the
//! controller reports back to a frontend. Every `WizardError` is recoverable:
//! the user can retry the same step.

use std::path::Path;
use thiserror::Error;

/// Failures while talking to the course-advisor backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Error taxonomy surfaced by the wizard controller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WizardError {
    /// Rejected locally before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// The request never produced a usable response.
    #[error("{0}")]
    Transport(String),

    /// The backend answered with `success: false`.
    #[error("{0}")]
    Backend(String),
}

impl WizardError {
    /// Build a transport error with the user-facing prefix for the action.
    pub fn transport(prefix: &str, err: &ApiError) -> Self {
        Self::Transport(format!("{}{}", prefix, err))
    }

    /// A local file that could not be read. Nothing was sent.
    pub fn unreadable_file(path: &Path, err: &std::io::Error) -> Self {
        Self::Validation(format!("Failed to read {}: {}", path.display(), err))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, WizardError>;
