// crates/trench-server/src/error.rs
// Standardized error types for Trench

use thiserror::Error;

/// Main error type for the Trench library
#[derive(Error, Debug)]
pub enum TrenchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("simulator API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("simulator rejected credentials ({status})")]
    Unauthorized { status: u16 },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

}

/// Convenience type alias for Result using TrenchError
pub type Result<T> = std::result::Result<T, TrenchError>;

impl TrenchError {
    /// Upstream HTTP status, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            TrenchError::Api { status, .. } | TrenchError::Unauthorized { status } => Some(*status),
            TrenchError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<url::ParseError> for TrenchError {
    fn from(err: url::ParseError) -> Self {
        TrenchError::Config(format!("invalid URL: {}", err))
    }
}

impl From<TrenchError> for String {
    fn from(err: TrenchError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_error() {
        let err = TrenchError::InvalidInput("azimuth out of range".to_string());
        assert!(err.to_string().contains("invalid input"));
        assert!(err.to_string().contains("azimuth"));
    }

    #[test]
    fn test_api_error_carries_status() {
        let err = TrenchError::Api {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("maintenance"));
    }

    #[test]
    fn test_unauthorized_status() {
        let err = TrenchError::Unauthorized { status: 401 };
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("credentials"));
    }

    #[test]
    fn test_status_absent_for_local_errors() {
        assert_eq!(TrenchError::InvalidInput("x".into()).status(), None);
        assert_eq!(TrenchError::Config("x".into()).status(), None);
    }

    #[test]
    fn test_into_string() {
        let err = TrenchError::Unauthorized { status: 403 };
        let s: String = err.into();
        assert!(s.contains("403"));
    }

    #[test]
    fn test_from_url_error() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: TrenchError = parse_err.into();
        assert!(matches!(err, TrenchError::Config(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: TrenchError = json_err.into();
        assert!(matches!(err, TrenchError::Json(_)));
        assert!(err.to_string().contains("JSON"));
    }
}
