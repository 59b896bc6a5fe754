//! Error types for the vlog system

pub type Result<T> = std::result::Result<T, VlogError>;

#[derive(Debug, thiserror::Error)]
pub enum VlogError {
    /// Malformed level rule or unusable cell name
    #[error("Invalid vlog configuration '{input}': {message}")]
    Config { input: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Log file could not be created when the sink was constructed
    #[error("Failed to open log file '{path}': {source}")]
    FileOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Log file could not be created during rotation
    #[error("File rotation failed for '{path}': {source}")]
    FileRotation {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration document could not be parsed
    #[error("Failed to parse vlog settings: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Environment value could not be interpreted
    #[error("Invalid value for {key}: '{value}'")]
    InvalidEnv { key: String, value: String },
}

impl VlogError {
    /// Create a configuration error for the given input
    pub fn config(input: impl Into<String>, message: impl Into<String>) -> Self {
        VlogError::Config {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        VlogError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn file_open(path: impl Into<String>, source: std::io::Error) -> Self {
        VlogError::FileOpen {
            path: path.into(),
            source,
        }
    }

    pub fn file_rotation(path: impl Into<String>, source: std::io::Error) -> Self {
        VlogError::FileRotation {
            path: path.into(),
            source,
        }
    }

    /// A fatal error leaves its sink without a destination for further lines.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, VlogError::FileRotation { .. })
    }
}
