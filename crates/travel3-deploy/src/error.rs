//! Deployment error types.

use travel3::{MetadataError, SourceError};
use travel3_dfx::DfxError;

use crate::report::DeployReport;

/// Errors that end a deployment run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("place source error: {0}")]
    Source(#[from] SourceError),

    #[error("{step} failed: {source}")]
    Dfx {
        step: &'static str,
        source: DfxError,
    },

    /// A place failed under the abort policy, or with an error no later
    /// call can recover from.
    #[error("batch aborted at place #{index}: {source}")]
    Aborted {
        index: usize,
        source: ItemError,
        report: Box<DeployReport>,
    },

    /// Ctrl-C. `report` is set once minting has started.
    #[error("interrupted")]
    Interrupted { report: Option<Box<DeployReport>> },
}

impl DeployError {
    pub(crate) fn step(step: &'static str) -> impl FnOnce(DfxError) -> Self {
        move |source| DeployError::Dfx { step, source }
    }

    /// Report of the places processed before the run ended, if any.
    pub fn report(&self) -> Option<&DeployReport> {
        match self {
            DeployError::Aborted { report, .. } => Some(report.as_ref()),
            DeployError::Interrupted { report } => report.as_deref(),
            _ => None,
        }
    }
}

/// Failure of one place's calls.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("invalid place: {0}")]
    Metadata(#[from] MetadataError),

    #[error("{method} failed: {source}")]
    Call {
        method: &'static str,
        source: DfxError,
    },

    #[error("{method} rejected by canister: {reason}")]
    Rejected {
        method: &'static str,
        reason: String,
    },
}

impl ItemError {
    /// Failures no later call can recover from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ItemError::Call { source, .. } if source.is_fatal())
    }
}
