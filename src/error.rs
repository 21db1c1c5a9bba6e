use std::fmt;
use std::path::PathBuf;

/// Error types for dataset detection and SAPOS query derivation
#[derive(Debug)]
pub enum SaposError {
    /// Input path is missing or not a directory
    NotADirectory(PathBuf),
    /// Neither a Wingtra JSON nor a DJI MRK file was found
    NoDatasetDetected(PathBuf),
    /// Files the dataset needs are absent (JPGs next to the MRK, EXIF tag)
    MissingCompanionFiles(String),
    /// A record did not have the expected shape
    MalformedRecord(String),
    /// Configuration could not be loaded or is inconsistent
    Config(String),
    /// I/O errors
    Io(std::io::Error),
}

impl SaposError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        SaposError::MalformedRecord(msg.into())
    }

    pub(crate) fn missing(msg: impl Into<String>) -> Self {
        SaposError::MissingCompanionFiles(msg.into())
    }
}

impl fmt::Display for SaposError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaposError::NotADirectory(path) => {
                write!(f, "{} is not a directory", path.display())
            }
            SaposError::NoDatasetDetected(path) => write!(
                f,
                "No Wingtra JSON or DJI MRK found in {}",
                path.display()
            ),
            SaposError::MissingCompanionFiles(msg) => write!(f, "Missing files: {}", msg),
            SaposError::MalformedRecord(msg) => write!(f, "Malformed record: {}", msg),
            SaposError::Config(msg) => write!(f, "Configuration error: {}", msg),
            SaposError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for SaposError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaposError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaposError {
    fn from(err: std::io::Error) -> Self {
        SaposError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, SaposError>;
