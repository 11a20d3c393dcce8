//! # Admix
//!
//! Convert ADM Broadcast Wave files into the inputs of an IAMF encoder.
//!
//! Given a `.wav` stream carrying an `axml` chunk of Audio Definition
//! Model XML plus interleaved multichannel PCM, admix produces:
//!
//! - one PCM `.wav` file per surviving ADM `audioObject`, de-interleaved
//!   by object, and
//! - a structured configuration record describing the IAMF sequence
//!   header, codec config, audio elements, mix presentations and
//!   per-frame metadata.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::fs::File;
//!
//! use admix::{convert, ConvertOptions};
//!
//! fn main() -> admix::Result<()> {
//!     let options = ConvertOptions::new()
//!         .file_prefix("mix")
//!         .frame_duration_ms(10)
//!         .importance_threshold(0)
//!         .output_dir("out");
//!
//!     let mut input = File::open("input.wav")?;
//!     let config = convert(&options, &mut input)?;
//!     println!("{} audio elements", config.audio_elements.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into three domain crates plus this facade:
//! - `admix-bwf`: RIFF/BW64 chunk indexing, format decoding, WAV splicing
//! - `admix-adm`: streaming XML to ADM building and validation
//! - `admix-iamf`: programme resolution and the IAMF configuration model
//!
//! This crate re-exports the commonly used types and provides the
//! [`convert`] entry point composing all three.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod convert;
mod error;
mod options;

pub use convert::convert;
pub use error::{Error, Result};
pub use options::ConvertOptions;

// Re-export container types.
pub use admix_bwf::{
    chunk_ids, splice_wav_files, Bw64Reader, BwfError, ChunkIndex, ChunkInfo, FormatInfo, FourCc,
    WavWriter,
};

// Re-export ADM types.
pub use admix_adm::{
    parse_adm, Adm, AdmError, AudioContent, AudioObject, AudioProgramme, LoudnessMetadata,
};

// Re-export IAMF configuration types.
pub use admix_iamf::{
    samples_per_frame, ConfigBuilder, IamfConfig, IamfError, InputLayout, ProfileVersion,
};
