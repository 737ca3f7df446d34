/// Errors surfaced by the engine gateway
///
/// The dashboard converts every variant into a status-line or detail-pane
/// message; batch commands print it and exit non-zero.

use bollard::errors::Error as BollardError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Daemon unreachable, or API version negotiation failed
    #[error("cannot reach container engine: {message}")]
    Connection { message: String },

    /// Daemon reached but the request was rejected
    #[error("{operation}: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },

    /// Resource sampling failed; callers degrade instead of reporting
    #[error("stats unavailable: {message}")]
    StatsUnavailable { message: String },
}

impl EngineError {
    pub fn connection(message: impl Into<String>) -> Self {
        EngineError::Connection {
            message: message.into(),
        }
    }

    pub fn api(operation: &'static str, message: impl Into<String>) -> Self {
        EngineError::Api {
            operation,
            message: message.into(),
        }
    }

    /// Classify a client error raised while performing `operation`
    pub fn from_bollard(operation: &'static str, err: BollardError) -> Self {
        match err {
            // The daemon's own message is surfaced verbatim
            BollardError::DockerResponseServerError { message, .. } => {
                EngineError::api(operation, message)
            }
            BollardError::IOError { .. }
            | BollardError::HyperResponseError { .. }
            | BollardError::HyperLegacyError { .. }
            | BollardError::RequestTimeoutError => EngineError::connection(err.to_string()),
            other => EngineError::api(operation, other.to_string()),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, EngineError::Connection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_keeps_daemon_message() {
        let err = EngineError::from_bollard(
            "stop container",
            BollardError::DockerResponseServerError {
                status_code: 404,
                message: "No such container: deadbeef".to_string(),
            },
        );
        assert_eq!(err, EngineError::api("stop container", "No such container: deadbeef"));
        assert_eq!(err.to_string(), "stop container: No such container: deadbeef");
        assert!(!err.is_connection());
    }

    #[test]
    fn test_request_timeout_is_connection_error() {
        let err = EngineError::from_bollard("list containers", BollardError::RequestTimeoutError);
        assert!(err.is_connection());
        assert!(err.to_string().starts_with("cannot reach container engine"));
    }

    #[test]
    fn test_io_error_is_connection_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = EngineError::from_bollard("list images", BollardError::IOError { err: io });
        assert!(err.is_connection());
    }
}
