//! Error types for the fcstack core.

/// Core error type for fcstack operations.
///
/// Validation failures are raised before any I/O and name the offending
/// field. Collaborator failures (link generation, credential resolution,
/// default-endpoint reads) travel through the transparent [`anyhow`]
/// variant so their original message reaches the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum FcStackError {
    /// A required request parameter was empty or absent.
    #[error("the required parameter {field} was not found")]
    MissingParameter {
        /// Name of the missing parameter, as the caller spelled it.
        field: &'static str,
    },

    /// A configuration source exists but could not be understood.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failure from an external collaborator, propagated unchanged.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for fcstack operations.
pub type FcStackResult<T> = Result<T, FcStackError>;
