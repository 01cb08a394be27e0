use thiserror::Error;

/// Misuse of the tool registry lifecycle. These are caller bugs, not tool
/// failures, so they surface as hard errors instead of error results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Tool \"{0}\" is already registered")]
    AlreadyRegistered(String),
    #[error("Registry is already initialized by \"{0}\"")]
    AlreadyInitialized(String),
    #[error("Registry is not initialized")]
    NotInitialized,
    #[error("Registry is closed")]
    Closed,
}

/// A tool rejected its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Missing required parameter \"{0}\"")]
    MissingParameter(String),
    #[error("Parameter \"{name}\" is not a valid {expected}")]
    InvalidParameter { name: String, expected: &'static str },
}
