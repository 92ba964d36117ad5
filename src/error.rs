use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format not recognized")]
    UnrecognizedFormat,

    #[error("unsupported version {0}")]
    UnsupportedVersion(i32),

    #[error("unrecognized data")]
    UnrecognizedData,
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
