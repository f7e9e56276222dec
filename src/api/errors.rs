use thiserror::Error;

/// Failures reported by the workflow API transport and mutation gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {message}")]
    Network { message: String },
    #[error("Request '{operation}' timed out")]
    Timeout { operation: String },
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response from workflow API: {message}")]
    Decode { message: String },
    #[error("Invalid API configuration: {message}")]
    InvalidConfig { message: String },
}

impl ApiError {
    /// The part of the error meant for display next to a failed action.
    ///
    /// For HTTP failures this is the raw response body the server sent back,
    /// falling back to the status line when the body is empty.
    pub fn payload(&self) -> String {
        match self {
            ApiError::Status { status, body } if body.trim().is_empty() => {
                format!("HTTP {status}")
            }
            ApiError::Status { body, .. } => body.clone(),
            ApiError::Network { message }
            | ApiError::Decode { message }
            | ApiError::InvalidConfig { message } => message.clone(),
            ApiError::Timeout { operation } => format!("'{operation}' timed out"),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Transport-level failures only. Non-2xx responses are turned into `Status`
/// by the client, which keeps the response body.
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                operation: err
                    .url()
                    .map(|url| url.path().to_string())
                    .unwrap_or_else(|| "request".to_string()),
            }
        } else if err.is_decode() {
            ApiError::Decode {
                message: err.to_string(),
            }
        } else {
            ApiError::Network {
                message: err.to_string(),
            }
        }
    }
}
