use thiserror::Error;

/// Errors returned by the dashboard API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered 404 for the requested resource.
    #[error("not found: {context}")]
    NotFound { context: String },

    /// Any other non-2xx answer. `message` is the server's own explanation
    /// when the body carried one.
    #[error("API error {status} for {context}: {}", message.as_deref().unwrap_or("no details"))]
    Api {
        status: u16,
        context: String,
        message: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ClientError {
    /// The message the server supplied for this failure, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}
