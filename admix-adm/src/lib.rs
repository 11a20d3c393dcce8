//! # Admix ADM
//!
//! Audio Definition Model (ITU-R BS.2076) support for the admix converter.
//!
//! This crate consumes the `axml` payload of a Broadcast Wave file and
//! produces a validated in-memory ADM graph:
//!
//! - **Element model**: programmes, contents, objects and per-programme
//!   loudness metadata
//! - **Streaming builder**: an event-driven XML parser that accumulates the
//!   graph without materializing a document tree
//! - **Validation**: `audioPackFormatID` layout filtering against the IAMF
//!   supported layouts and importance-threshold filtering
//! - **Track mapping**: the ordered object-to-input-channel assignment used
//!   when splicing per-object WAV files
//!
//! ## Example
//!
//! ```rust
//! use admix_adm::parse_adm;
//!
//! let xml = br#"<audioObject audioObjectID="AO_1001" importance="9">
//!     <audioPackFormatIDRef>AP_00010002</audioPackFormatIDRef>
//!     <audioTrackUIDRef>ATU_00000001</audioTrackUIDRef>
//!     <audioTrackUIDRef>ATU_00000002</audioTrackUIDRef>
//! </audioObject>"#;
//!
//! let adm = parse_adm(xml, 0).unwrap();
//! assert_eq!(adm.objects.len(), 1);
//! assert_eq!(adm.objects[0].track_uid_refs.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod elements;
pub mod error;
pub mod parser;
pub mod track_map;
pub mod validate;

pub use elements::{Adm, AudioContent, AudioObject, AudioProgramme, LoudnessMetadata};
pub use error::{AdmError, Result};
pub use parser::parse_adm;
pub use track_map::{object_track_map, TrackMapEntry};
