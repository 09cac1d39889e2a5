//! Error taxonomy for the heatmap pipeline and its callers.
//!
//! Every failure maps to one [`ErrorCode`]. At the boundary a failure is
//! reduced to an [`ErrorReport`]: a short message plus its code, nothing more.

use serde::Serialize;
use thiserror::Error;

use crate::providers::Provider;

pub type Result<T> = std::result::Result<T, HeatmapError>;

/// Largest upload accepted by callers, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidFileType,
    InvalidModel,
    InvalidFile,
    ProcessingError,
    UploadError,
    UnexpectedError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFileType => "INVALID_FILE_TYPE",
            ErrorCode::InvalidModel => "INVALID_MODEL",
            ErrorCode::InvalidFile => "INVALID_FILE",
            ErrorCode::ProcessingError => "PROCESSING_ERROR",
            ErrorCode::UploadError => "UPLOAD_ERROR",
            ErrorCode::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error("Please upload a valid JSON file")]
    InvalidFileType { file_name: String },

    #[error("File size should be less than 10MB")]
    FileTooLarge { size: u64 },

    #[error("Unsupported model type")]
    UnsupportedModel(Provider),

    #[error("Invalid conversation data format")]
    InvalidRecordFormat { field: &'static str },

    #[error("Error processing conversation data")]
    Processing {
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Error reading file")]
    Upload(#[source] std::io::Error),

    #[error("Color scheme with id \"{0}\" not found")]
    UnknownColorScheme(String),

    /// A timestamp field was present but could not be turned into an instant.
    #[error("invalid timestamp in `{field}`: {reason}")]
    InvalidTimestamp { field: &'static str, reason: String },
}

impl HeatmapError {
    pub fn processing<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HeatmapError::Processing {
            source: Some(Box::new(source)),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            HeatmapError::InvalidFileType { .. } | HeatmapError::FileTooLarge { .. } => {
                ErrorCode::InvalidFileType
            }
            HeatmapError::UnsupportedModel(_) => ErrorCode::InvalidModel,
            HeatmapError::InvalidRecordFormat { .. } => ErrorCode::InvalidFile,
            HeatmapError::Processing { .. } | HeatmapError::InvalidTimestamp { .. } => {
                ErrorCode::ProcessingError
            }
            HeatmapError::Upload(_) => ErrorCode::UploadError,
            HeatmapError::UnknownColorScheme(_) => ErrorCode::UnexpectedError,
        }
    }

    /// Whether the error already carries a user-facing kind. Anything else
    /// is an internal failure that must be replaced before it reaches a user.
    pub fn is_structured(&self) -> bool {
        !matches!(self, HeatmapError::InvalidTimestamp { .. })
    }

    pub fn report(&self) -> ErrorReport {
        let message = if self.is_structured() {
            self.to_string()
        } else {
            HeatmapError::Processing { source: None }.to_string()
        };
        ErrorReport {
            message,
            code: self.code(),
        }
    }
}

/// What a user sees when something goes wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub message: String,
    pub code: ErrorCode,
}

impl ErrorReport {
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        match err.downcast_ref::<HeatmapError>() {
            Some(heatmap_err) => heatmap_err.report(),
            None => ErrorReport {
                message: err.to_string(),
                code: ErrorCode::UnexpectedError,
            },
        }
    }
}

impl From<&HeatmapError> for ErrorReport {
    fn from(err: &HeatmapError) -> Self {
        err.report()
    }
}
