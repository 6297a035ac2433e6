use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// The unified error type for procminer
#[derive(Error, Debug)]
pub enum ProcMinerError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Input error: {message}")]
    Input {
        code: u16,
        message: String,
        line: Option<usize>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Validation error: {message}")]
    Validation {
        code: u16,
        message: String,
        case_id: Option<String>,
        field: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Statistics error: {message}")]
    Statistics {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Execution error: {message}")]
    Execution {
        code: u16,
        message: String,
        partition: Option<usize>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] {message}")]
    Other {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ProcMinerError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::config_with_code(ErrorCode::CONFIG_GENERIC, message)
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create an input error with specific code and optional 1-based line number
    pub fn input_with_code(code: u16, message: impl Into<String>, line: Option<usize>) -> Self {
        Self::Input {
            code,
            message: message.into(),
            line,
            source: None,
        }
    }

    /// Create a validation error with default code
    pub fn validation(message: impl Into<String>) -> Self {
        Self::validation_with_code(ErrorCode::VALIDATION_GENERIC, message, None)
    }

    /// Create a validation error with specific code and field
    pub fn validation_with_code(
        code: u16,
        message: impl Into<String>,
        field: Option<String>,
    ) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            case_id: None,
            field,
            source: None,
        }
    }

    /// An event whose end timestamp precedes its start timestamp
    pub fn invalid_timestamp_ordering(case_id: impl Into<String>) -> Self {
        let case_id = case_id.into();
        Self::Validation {
            code: ErrorCode::VALIDATION_TIMESTAMP_ORDERING,
            message: format!("event of case '{}' ends before it starts", case_id),
            case_id: Some(case_id),
            field: Some("end".to_string()),
            source: None,
        }
    }

    /// A NaN or infinite value was fed to a statistics accumulator
    pub fn non_finite_observation(value: f64) -> Self {
        Self::Statistics {
            code: ErrorCode::STATS_NON_FINITE_OBSERVATION,
            message: format!("cannot observe non-finite value {}", value),
            source: None,
        }
    }

    /// Create an execution error with specific code
    pub fn execution_with_code(
        code: u16,
        message: impl Into<String>,
        partition: Option<usize>,
    ) -> Self {
        Self::Execution {
            code,
            message: message.into(),
            partition,
            source: None,
        }
    }

    /// Create a generic other error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            code: ErrorCode::OTHER_GENERIC,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Input { source: src, .. }
            | Self::Validation { source: src, .. }
            | Self::Statistics { source: src, .. }
            | Self::Execution { source: src, .. }
            | Self::Other { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::Input { message, .. }
            | Self::Validation { message, .. }
            | Self::Statistics { message, .. }
            | Self::Execution { message, .. }
            | Self::Other { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Attach the configuration file that produced this error
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        if let Self::Config { path: ref mut p, .. } = self {
            *p = Some(path.into());
        }
        self
    }

    /// Attach the case the offending event belongs to
    pub fn with_case_id(mut self, id: impl Into<String>) -> Self {
        if let Self::Validation {
            case_id: ref mut c, ..
        } = self
        {
            *c = Some(id.into());
        }
        self
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Input { .. } => 3,
            Self::Validation { .. } => 4,
            Self::Statistics { .. } => 5,
            Self::Execution { .. } => 6,
            Self::Other { .. } => 1,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Input { code, .. }
            | Self::Validation { code, .. }
            | Self::Statistics { code, .. }
            | Self::Execution { code, .. }
            | Self::Other { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, path, .. } => {
                if let Some(p) = path {
                    format!("Configuration problem in {}: {}", p.display(), message)
                } else {
                    format!("Configuration problem: {}", message)
                }
            }
            Self::Input { message, line, .. } => {
                if let Some(l) = line {
                    format!("Input error at line {}: {}", l, message)
                } else {
                    format!("Input error: {}", message)
                }
            }
            Self::Validation { message, field, .. } => {
                if let Some(f) = field {
                    format!("Validation error for '{}': {}", f, message)
                } else {
                    format!("Validation error: {}", message)
                }
            }
            Self::Statistics { message, .. } => format!("Statistics error: {}", message),
            Self::Execution {
                message, partition, ..
            } => {
                if let Some(p) = partition {
                    format!("Partition {} failed: {}", p, message)
                } else {
                    format!("Execution error: {}", message)
                }
            }
            Self::Other { message, .. } => message.clone(),
        }
    }
}

/// Type alias for Results using ProcMinerError
pub type Result<T> = std::result::Result<T, ProcMinerError>;

/// Type alias for application Results (using anyhow for flexibility)
pub type AppResult<T> = anyhow::Result<T>;

impl From<std::io::Error> for ProcMinerError {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::INPUT_NOT_FOUND,
            _ => ErrorCode::INPUT_IO_ERROR,
        };
        ProcMinerError::input_with_code(code, "I/O operation failed", None).with_source(err)
    }
}

impl From<serde_json::Error> for ProcMinerError {
    fn from(err: serde_json::Error) -> Self {
        let line = (err.line() > 0).then_some(err.line());
        ProcMinerError::input_with_code(
            ErrorCode::INPUT_MALFORMED_RECORD,
            "Invalid JSON event record",
            line,
        )
        .with_source(err)
    }
}

impl From<toml::de::Error> for ProcMinerError {
    fn from(err: toml::de::Error) -> Self {
        ProcMinerError::config_with_code(ErrorCode::CONFIG_INVALID_TOML, "Invalid TOML syntax")
            .with_source(err)
    }
}
