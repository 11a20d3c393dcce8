//! Error types for IAMF configuration building.

use thiserror::Error;

/// Result type alias for IAMF configuration operations.
pub type Result<T> = std::result::Result<T, IamfError>;

/// Errors that can occur while building an IAMF configuration.
#[derive(Error, Debug)]
pub enum IamfError {
    /// Frame geometry cannot be computed from a zero operand.
    #[error(
        "Cannot compute samples per frame from frame_duration_ms {frame_duration_ms} \
         and sample_rate {sample_rate}"
    )]
    InvalidFrameGeometry {
        /// Requested maximum frame duration in milliseconds.
        frame_duration_ms: u32,
        /// Input sample rate in Hz.
        sample_rate: u32,
    },

    /// A loudness value cannot be represented in Q7.8.
    #[error("Value {0} cannot be represented in Q7.8 format")]
    LoudnessOutOfRange(f32),

    /// An `audioPackFormatID` has no corresponding IAMF input layout. The
    /// validator filters unsupported layouts, so reaching this is an
    /// internal logic error.
    #[error("Unknown audioPackFormatID `{0}`")]
    UnknownLayout(String),

    /// An audio object carries no `audioPackFormatIDRef` to derive a layout
    /// from.
    #[error("audioObject `{0}` has no audioPackFormatIDRef")]
    MissingPackFormat(String),
}
