use crate::state::WorkflowState;

/// Failure reported by a backend collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    /// Non-success response; `message` is what the server said.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    #[error("You need to be signed in as an intern to do this.")]
    Unauthenticated,
    #[error("{0}")]
    NetworkOrServer(String),
    #[error("Cannot {operation} while the case is {state}.")]
    InvalidState {
        operation: &'static str,
        state: WorkflowState,
    },
}

impl From<ApiError> for WorkflowError {
    fn from(err: ApiError) -> Self {
        WorkflowError::NetworkOrServer(err.to_string())
    }
}
