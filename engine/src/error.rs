use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Period label format error: {0}")]
    FormatError(String),

    #[error("Range error: {0}")]
    RangeError(String),

    #[error("Data quality error: {0}")]
    DataQualityError(String),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    // Loader internals build their messages with anyhow.
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// Short stable name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::ConfigError(_) => "config",
            EngineError::FormatError(_) => "format",
            EngineError::RangeError(_) => "range",
            EngineError::DataQualityError(_) => "data_quality",
            EngineError::DatasetNotFound(_) => "dataset_not_found",
            EngineError::CsvSystemError { .. } => "csv",
            EngineError::IoError { .. } => "io",
            EngineError::JsonError { .. } => "json",
            EngineError::CsvDataFormatError(_) => "csv_data_format",
            EngineError::AnyhowError(_) => "internal",
        }
    }

    /// Errors caused by the caller's request rather than by the dataset or environment.
    pub fn is_request_error(&self) -> bool {
        matches!(self, EngineError::FormatError(_) | EngineError::RangeError(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_and_messages() {
        let err = EngineError::RangeError("asked for 9 periods, 5 available".into());
        assert_eq!(err.kind(), "range");
        assert!(err.is_request_error());
        assert_eq!(err.to_string(), "Range error: asked for 9 periods, 5 available");

        let err = EngineError::DataQualityError("duplicate".into());
        assert!(!err.is_request_error());
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EngineError = io.into();
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("I/O error"));
    }
}
