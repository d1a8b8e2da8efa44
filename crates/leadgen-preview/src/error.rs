use std::path::PathBuf;

use leadgen_client::ClientError;
use leadgen_core::BusinessId;
use thiserror::Error;

use crate::state::InvalidTransition;

/// Which remote call an acquisition failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionStage {
    List,
    Generate,
    Regenerate,
}

impl AcquisitionStage {
    /// Shown when the server gave no message of its own.
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            AcquisitionStage::List => "Failed to load templates. Please try again.",
            AcquisitionStage::Generate => "Failed to generate templates. Please try again.",
            AcquisitionStage::Regenerate => "Failed to regenerate templates. Please try again.",
        }
    }
}

impl std::fmt::Display for AcquisitionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquisitionStage::List => write!(f, "list"),
            AcquisitionStage::Generate => write!(f, "generate"),
            AcquisitionStage::Regenerate => write!(f, "regenerate"),
        }
    }
}

/// A list, generate, or regenerate call failed. Always retryable.
///
/// `message` is the server's text verbatim when it sent one.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AcquisitionError {
    pub stage: AcquisitionStage,
    pub message: String,
    #[source]
    pub source: ClientError,
}

impl AcquisitionError {
    #[must_use]
    pub fn new(stage: AcquisitionStage, source: ClientError) -> Self {
        let message = source
            .server_message()
            .map_or_else(|| stage.fallback_message().to_string(), str::to_owned);
        Self {
            stage,
            message,
            source,
        }
    }
}

/// Errors from driving a mounted preview. Remote failures are not here: they
/// land in the `Error` state instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a request for this preview is already in flight")]
    Busy,

    #[error("the preview has been closed")]
    Closed,

    #[error("{action} is not offered from the {entry} preview in its current state")]
    NotAllowed {
        action: &'static str,
        entry: &'static str,
    },

    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

/// Errors from the business detail view.
#[derive(Debug, Error)]
pub enum DetailError {
    /// Fatal for the view: render a dead end with navigation back.
    #[error("business {business_id} not found")]
    NotFound { business_id: BusinessId },

    #[error("business {business_id} could not be loaded: {source}")]
    Unavailable {
        business_id: BusinessId,
        #[source]
        source: ClientError,
    },

    #[error("{message}")]
    EvaluationFailed {
        message: String,
        #[source]
        source: ClientError,
    },

    #[error("an evaluation is already running for this business")]
    Busy,
}

/// Writing export artifacts to disk failed.
#[derive(Debug, Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct ExportError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
