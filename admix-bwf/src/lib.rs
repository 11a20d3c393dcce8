//! # Admix BWF
//!
//! Broadcast Wave (BW64) container support for the admix converter.
//!
//! A BWF file is a RIFF/WAVE container carrying interleaved PCM in its
//! `data` chunk and ADM XML in its `axml` chunk. This crate provides:
//!
//! - **Chunk indexing**: a single-pass enumeration of every top-level
//!   chunk, honoring RIFF word padding
//! - **Format decoding**: the typed `fmt ` record with derived frame
//!   geometry
//! - **Reader facade**: container validation, format decoding and ADM
//!   parsing composed behind [`Bw64Reader`]
//! - **WAV writing**: a back-patching writer with an abort path that never
//!   leaves a valid-looking partial file
//! - **Splicing**: interleaved-to-per-object de-interleaving driven by the
//!   ADM object/track map
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::path::Path;
//!
//! use admix_bwf::{splice_wav_files, Bw64Reader};
//!
//! let mut input = File::open("input.wav").unwrap();
//! let reader = Bw64Reader::from_stream(10, &mut input).unwrap();
//! splice_wav_files(Path::new("out"), "prefix", &reader, &mut input).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunks;
pub mod error;
pub mod fmt;
pub mod reader;
pub mod splicer;
pub mod writer;

pub use chunks::{chunk_ids, index_chunks, ChunkIndex, ChunkInfo, FourCc};
pub use error::{BwfError, Result};
pub use fmt::FormatInfo;
pub use reader::Bw64Reader;
pub use splicer::{splice_wav_files, FLUSH_THRESHOLD};
pub use writer::WavWriter;
