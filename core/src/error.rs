use std::path::PathBuf;
use thiserror::Error;

/// Result type for sdmscan operations
pub type Result<T> = std::result::Result<T, SdmError>;

/// Error types for sdmscan operations
#[derive(Error, Debug)]
pub enum SdmError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Header file could not be opened or parsed
    #[error("Failed to read header {}: {message}", .path.display())]
    HeaderRead { path: PathBuf, message: String },

    /// Tag not found in DICOM file
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    /// Invalid tag value
    #[error("Invalid tag value: {0}")]
    InvalidValue(String),

    /// Header file sits too shallow to reach the data-file ancestor directory
    #[error("Cannot resolve data file for {}: fewer than {levels} ancestor directories", .path.display())]
    PathResolution { path: PathBuf, levels: usize },

    /// Calibration header with a calibration type that maps to no category
    #[error("Unknown calibration type: {0}")]
    UnknownCalibrationType(String),

    /// Generic extraction error
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV report error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl SdmError {
    /// Wraps any displayable failure as a header read error for `path`
    pub fn header_read(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        SdmError::HeaderRead {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for SdmError {
    fn from(e: dicom_object::ReadError) -> Self {
        SdmError::DicomError(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for SdmError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        SdmError::InvalidValue(format!("{}", e))
    }
}
