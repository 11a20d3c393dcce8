//! Error types for the admix library.

use thiserror::Error;

/// Result type alias using the umbrella [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Umbrella error for a conversion run.
#[derive(Error, Debug)]
pub enum Error {
    /// Container reading or WAV writing failed.
    #[error("Container error: {0}")]
    Bwf(#[from] admix_bwf::BwfError),

    /// ADM parsing or validation failed.
    #[error("ADM error: {0}")]
    Adm(#[from] admix_adm::AdmError),

    /// IAMF configuration building failed.
    #[error("IAMF configuration error: {0}")]
    Iamf(#[from] admix_iamf::IamfError),

    /// I/O error outside the container layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
