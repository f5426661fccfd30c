/// Failure of a single forecast call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Host unreachable, timeout, connection reset, unreadable body.
    #[error("{0}")]
    Transport(String),
    /// The API answered with a non-2xx status.
    #[error("WeatherAPI request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    /// The body does not match the forecast schema.
    #[error("Failed to parse WeatherAPI forecast JSON: {0}")]
    Decode(String),
}

impl FetchError {
    /// Network-level failures, including HTTP error statuses.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Status { .. })
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Failure reported by the platform position service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("Location service unavailable")]
    ServiceUnavailable,
}
