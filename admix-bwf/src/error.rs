//! Error types for BWF container operations.

use std::io;

use thiserror::Error;

use crate::chunks::FourCc;

/// Result type alias for BWF operations.
pub type Result<T> = std::result::Result<T, BwfError>;

/// Errors that can occur while reading a BWF container or writing the
/// spliced per-object WAV files.
#[derive(Error, Debug)]
pub enum BwfError {
    /// IO error during read/write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Missing `RIFF` or `WAVE` magic.
    #[error("Bad container: {0}")]
    BadContainer(&'static str),

    /// A required chunk is absent.
    #[error("Could not find `{0}` chunk")]
    MissingChunk(FourCc),

    /// Impossible `fmt ` values or an unsupported bit depth.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The `data` chunk ended before the implied end of a frame.
    #[error("Reached end of stream before the implied end of the `data` chunk")]
    TruncatedData,

    /// ADM parsing or validation failed.
    #[error("ADM error: {0}")]
    Adm(#[from] admix_adm::AdmError),
}
