use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Action was not accepted by the server")]
    Rejected,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ClientError {
    /// The server could not be reached or answered with an HTTP error.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_count_as_transport() {
        let err = ClientError::Status {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert!(err.is_transport());
        assert!(!ClientError::Decode("missing field `_id`".to_string()).is_transport());
        assert!(!ClientError::Rejected.is_transport());
    }
}
