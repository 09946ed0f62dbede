//! Error types for the logging engine

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation} '{path}': {source}")]
    IoOperation {
        operation: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No destination is open for a folder
    #[error("no destination open for folder '{folder}'")]
    DestinationMissing { folder: String },

    /// File rotation error
    #[error("rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        path: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a rotation error
    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", "/var/log/app/info.log", io_err);
        assert!(matches!(err, LoggerError::IoOperation { .. }));

        let err = LoggerError::rotation("/var/log/app/info.log", "disk full");
        assert!(matches!(err, LoggerError::Rotation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::rotation("/var/log/app/info.log", "disk full");
        assert_eq!(
            err.to_string(),
            "rotation failed for '/var/log/app/info.log': disk full"
        );

        let err = LoggerError::DestinationMissing {
            folder: "warn".to_string(),
        };
        assert_eq!(err.to_string(), "no destination open for folder 'warn'");
    }
}
