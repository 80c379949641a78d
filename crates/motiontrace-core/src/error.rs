use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the sampling, thresholding and kinematics operations.
///
/// Every variant is a precondition the caller can act on; nothing here is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong file type, malformed region tuple, unparsable row, bad parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    /// Destination directory holds files and overwriting was not requested.
    #[error("files already exist in {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("unable to read any frames from {}", .0.display())]
    EmptyStream(PathBuf),

    #[error("unable to write frame to {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// Too few samples or non-increasing timestamps.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("video decode failed: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_region<S: Into<String>>(msg: S) -> Self {
        Self::InvalidRegion(msg.into())
    }

    pub fn degenerate<S: Into<String>>(msg: S) -> Self {
        Self::DegenerateInput(msg.into())
    }

    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }
}
