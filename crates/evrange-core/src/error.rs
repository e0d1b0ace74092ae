use thiserror::Error;

/// Errors raised while validating domain values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// A coordinate, range, buffer, direction count, or numeric input is out
    /// of its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
