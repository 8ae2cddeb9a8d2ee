//! Backend client error types.

/// Errors from talking to the BusConnect backend (or its fixture stand-in).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected our credentials
    #[error("unauthorized by backend")]
    Unauthorized,

    /// Requested record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Backend returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the JSON we expected
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Configured base URL cannot address backend endpoints
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Fixture data could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),
}

impl ApiError {
    /// Whether the error means the record is absent rather than unreachable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ApiError::NotFound("journey j-9".into());
        assert_eq!(err.to_string(), "not found: journey j-9");
        assert!(err.is_not_found());

        let err = ApiError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");
        assert!(!err.is_not_found());

        let err = ApiError::Json {
            message: "expected string".into(),
            body: Some("{}".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("expected string"));
    }
}
