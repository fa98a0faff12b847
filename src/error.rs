//! Error taxonomy for a single submission.
//!
//! None of these are fatal to the process; each is scoped to one attempt.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a prompt.")]
    EmptyPrompt,

    #[error("Please sign in to generate content.")]
    NotSignedIn,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// Empty prompt or missing identity. Recovered locally.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No provider credential configured.
    #[error("Content generation is unavailable: {0}")]
    ProviderUnavailable(String),

    /// Remote failure or empty output.
    #[error("Content generation failed: {0}")]
    ProviderRequest(String),

    /// History write failed. Generated content stays visible.
    #[error("Could not save to history: {0}")]
    Save(String),

    /// History read failed.
    #[error("Could not load history: {0}")]
    Load(String),
}

/// Errors reported by a generative-content capability.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider response could not be decoded: {0}")]
    Decode(String),

    #[error("provider returned no text")]
    EmptyOutput,
}

/// Errors reported by a history store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("record not found: {0}")]
    NotFound(String),
}
