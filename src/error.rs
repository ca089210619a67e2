//! Error types for geocluster.

use thiserror::Error;

/// Coarse classification used by adapters to map errors onto host conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
}

/// Errors returned by index construction, queries and the session registry.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Malformed geometry, option of the wrong type, malformed bbox or
    /// inconsistent configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The id does not decode to a record that supports the requested operation.
    #[error("no cluster with id {0}")]
    ClusterNotFound(u64),

    /// No session is registered under this name.
    #[error("no cluster session named '{0}'")]
    SessionNotFound(String),

    /// JSON marshalling failure at the adapter boundary.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClusterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClusterError::InvalidInput(_) | ClusterError::Serialization(_) => {
                ErrorKind::InvalidInput
            }
            ClusterError::ClusterNotFound(_) | ClusterError::SessionNotFound(_) => {
                ErrorKind::NotFound
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, ClusterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ClusterError::InvalidInput("x".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert!(ClusterError::ClusterNotFound(7).is_not_found());
        assert!(ClusterError::SessionNotFound("a".into()).is_not_found());
    }

    #[test]
    fn test_display() {
        let e = ClusterError::SessionNotFound("cafes".into());
        assert_eq!(e.to_string(), "no cluster session named 'cafes'");
        assert_eq!(
            ClusterError::ClusterNotFound(33).to_string(),
            "no cluster with id 33"
        );
    }

    #[test]
    fn test_from_serde() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: ClusterError = err.into();
        assert_eq!(e.kind(), ErrorKind::InvalidInput);
    }
}
