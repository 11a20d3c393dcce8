//! # Admix IAMF
//!
//! IAMF descriptor configuration for the admix converter.
//!
//! Resolves a validated ADM graph into the structured configuration record
//! a downstream IAMF encoder consumes:
//!
//! - **Programme resolution**: programmes × contents × objects ×
//!   complementary groups expand into mix presentation instances, capped at
//!   two audio elements per mix
//! - **Input layouts**: `audioPackFormatID` driven substream counts,
//!   channel labels, sound systems and the channel-/scene-based split
//! - **Loudness codec**: Q7.8 fixed point encoding and the presence-driven
//!   info-type bit mask
//! - **Configuration model**: IA sequence header, LPCM codec config, audio
//!   elements, mix presentations and audio frame metadata
//!
//! ## Example
//!
//! ```rust
//! use admix_iamf::{ConfigBuilder, ProfileVersion};
//!
//! let adm = admix_adm::parse_adm(
//!     br#"<audioObject audioObjectID="AO_1001">
//!         <audioPackFormatIDRef>AP_00010002</audioPackFormatIDRef>
//!     </audioObject>"#,
//!     0,
//! )
//! .unwrap();
//!
//! let builder = ConfigBuilder::new(&adm, 48000, 16);
//! let config = builder.build(ProfileVersion::Base, "out", 10).unwrap();
//! assert_eq!(config.audio_elements.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod config;
pub mod error;
pub mod layout;
pub mod loudness;
pub mod resolver;

pub use builder::{samples_per_frame, ConfigBuilder};
pub use config::{
    AudioElement, AudioFrame, CodecConfig, IaSequenceHeader, IamfConfig, MixPresentation,
    ProfileVersion,
};
pub use error::{IamfError, Result};
pub use layout::{ChannelLabel, InputLayout};
pub use loudness::{loudness_info, q7_8_from_f32};
pub use resolver::{resolve_programmes, ProgrammeResolution, MAX_AUDIO_ELEMENTS_PER_MIX};
