use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload decoded but failed validation (duplicate ids, bad stats, ...).
    #[error("Malformed match data: {0}")]
    Malformed(String),

    /// Transport or backend failure while fetching match data, or a fetch
    /// task that ended without a result.
    #[error("Fetch error: {0}")]
    Fetch(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_its_cause() {
        let err = AppError::Fetch("connection refused".to_string());
        assert_eq!(err.to_string(), "Fetch error: connection refused");
    }
}
