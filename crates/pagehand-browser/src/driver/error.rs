//! Driver error types.

use thiserror::Error;

/// Errors raised by a browser driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Failed to connect to the browser.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Browser not running with remote debugging.
    #[error("Browser not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    BrowserNotAvailable(String),

    /// No browser executable could be found or started.
    #[error("Launch failed: {0}")]
    LaunchFailed(String),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Navigation failed.
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript execution error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// Timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Session closed.
    #[error("Session closed")]
    SessionClosed,

    /// Invalid response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DriverError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout(_))
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for DriverError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        DriverError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for DriverError {
    fn from(e: reqwest::Error) -> Self {
        DriverError::Http(e.to_string())
    }
}

impl From<url::ParseError> for DriverError {
    fn from(e: url::ParseError) -> Self {
        DriverError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

impl From<tokio::time::error::Elapsed> for DriverError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        DriverError::Timeout("operation deadline elapsed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = DriverError::Protocol {
            code: -32000,
            message: "No node with given id".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("No node with given id"));
        assert!(display.contains("-32000"));
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let err = DriverError::from(url::Url::parse("not a url").unwrap_err());
        assert!(matches!(err, DriverError::ConnectionFailed(_)));
    }

    #[test]
    fn test_is_timeout() {
        assert!(DriverError::Timeout("x".into()).is_timeout());
        assert!(!DriverError::SessionClosed.is_timeout());
    }
}
