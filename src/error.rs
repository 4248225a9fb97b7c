//! Error types for the complaint triage service

use thiserror::Error;

/// Result type alias for triage operations
pub type Result<T> = std::result::Result<T, TriageError>;

#[derive(Error, Debug)]
pub enum TriageError {

    // =============================
    // Service Errors
    // =============================

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Password hashing error: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TriageError {
    /// Wrap a sqlx failure with the operation that produced it
    pub fn database(context: &str, err: sqlx::Error) -> Self {
        TriageError::DatabaseError(format!("{}: {}", context, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_missing_file() -> Result<Vec<u8>> {
        Ok(std::fs::read("/definitely/not/here.csv")?)
    }

    fn decode_bad_json() -> Result<serde_json::Value> {
        Ok(serde_json::from_str("{not json")?)
    }

    #[test]
    fn test_io_and_json_failures_convert() {
        assert!(matches!(read_missing_file(), Err(TriageError::IoError(_))));
        assert!(matches!(decode_bad_json(), Err(TriageError::SerializationError(_))));
    }
}
