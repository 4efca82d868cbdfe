//! dfx runner error types.

/// Errors from invoking `dfx`.
#[derive(Debug, thiserror::Error)]
pub enum DfxError {
    #[error("dfx binary not found at `{0}`")]
    NotFound(String),

    #[error("`{command}` exited with {code:?}: {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("`dfx identity get-principal` returned an empty principal")]
    EmptyPrincipal,

    #[error("`{text}` is not a valid principal: {reason}")]
    InvalidPrincipal { text: String, reason: String },

    #[error("replica error: {0}")]
    Replica(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DfxError {
    /// Errors after which no further `dfx` invocation can succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DfxError::NotFound(_) | DfxError::EmptyPrincipal | DfxError::InvalidPrincipal { .. }
        )
    }
}
