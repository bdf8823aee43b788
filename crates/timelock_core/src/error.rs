use thiserror::Error;

/// Failure reported by a [`NotificationGateway`](crate::notifications::NotificationGateway).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The platform refused the request (quota, invalid trigger, revoked permission).
    #[error("notification rejected: {reason}")]
    Rejected { reason: String },

    /// The notification centre could not be reached.
    #[error("notification centre unavailable: {0}")]
    Unavailable(String),

    /// Anything the platform did not classify.
    #[error("{0}")]
    Other(String),
}

/// Errors raised while reading scheduler configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },
}

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;
