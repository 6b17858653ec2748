//! Custom error types for rescount.

use thiserror::Error;

/// Errors that can occur while enumerating resources.
#[derive(Error, Debug)]
pub enum CountError {
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("Kubernetes API error: {0}")]
    Kubernetes(String),

    #[error("cluster {cluster} is unreachable: {reason}")]
    ClusterUnreachable { cluster: String, reason: String },

    #[error("no AWS region could be resolved")]
    NoRegion,
}

impl CountError {
    /// Create an AWS SDK error from any error type.
    pub fn aws<E: std::fmt::Display>(err: E) -> Self {
        CountError::AwsSdk(err.to_string())
    }

    /// Create a Kubernetes API error from any error type.
    pub fn kube<E: std::fmt::Display>(err: E) -> Self {
        CountError::Kubernetes(err.to_string())
    }
}
