//! Boxing error types.

/// Errors that can occur while boxing a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoxError {
    /// The allocator could not satisfy the request.
    #[error("allocation of {requested} bytes failed")]
    AllocationFailure { requested: usize },
}

/// Result type alias for boxing operations.
pub type Result<T> = std::result::Result<T, BoxError>;
