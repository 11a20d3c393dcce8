//! IAMF input layouts.
//!
//! An ADM `audioPackFormatID` (`AP_yyyyxxxx`) selects the input layout of
//! the corresponding IAMF audio element. The layout drives everything the
//! descriptors need: substream counts, channel labels, the sound system
//! used for loudness layouts and the channel- versus scene-based split.

use crate::config::{
    AudioElementType, ExpandedLoudspeakerLayout, LoudspeakerLayout, SoundSystem,
};
use crate::error::{IamfError, Result};

/// Channel layout of an IAMF input, derived from an ADM pack format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputLayout {
    /// Single channel.
    Mono,
    /// Two channel stereo.
    Stereo,
    /// 5.1 surround.
    Surround51,
    /// 5.1.2 surround with two height channels.
    Surround512,
    /// 5.1.4 surround with four height channels.
    Surround514,
    /// 7.1 surround.
    Surround71,
    /// 7.1.4 surround with four height channels.
    Surround714,
    /// Binaural two channel.
    Binaural,
    /// Standalone low-frequency effects channel.
    Lfe,
    /// First-order ambisonics (4 channels).
    AmbisonicsOrder1,
    /// Second-order ambisonics (9 channels).
    AmbisonicsOrder2,
    /// Third-order ambisonics (16 channels).
    AmbisonicsOrder3,
}

/// Channel label within an audio frame's ordered channel list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelLabel {
    /// Mono.
    Mono,
    /// Stereo/binaural left.
    L2,
    /// Stereo/binaural right.
    R2,
    /// Centre.
    Centre,
    /// Low-frequency effects.
    Lfe,
    /// 5.1 front left.
    L5,
    /// 5.1 front right.
    R5,
    /// 5.1 surround left.
    Ls5,
    /// 5.1 surround right.
    Rs5,
    /// Top front left (two height channels).
    Ltf2,
    /// Top front right (two height channels).
    Rtf2,
    /// Top front left (four height channels).
    Ltf4,
    /// Top front right (four height channels).
    Rtf4,
    /// Top back left (four height channels).
    Ltb4,
    /// Top back right (four height channels).
    Rtb4,
    /// 7.1 front left.
    L7,
    /// 7.1 front right.
    R7,
    /// 7.1 side surround left.
    Lss7,
    /// 7.1 side surround right.
    Rss7,
    /// 7.1 rear surround left.
    Lrs7,
    /// 7.1 rear surround right.
    Rrs7,
    /// Ambisonics channel `A{n}` in ACN order.
    Ambisonics(u8),
}

impl std::fmt::Display for ChannelLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ChannelLabel::*;
        match self {
            Mono => write!(f, "M"),
            L2 => write!(f, "L2"),
            R2 => write!(f, "R2"),
            Centre => write!(f, "C"),
            Lfe => write!(f, "LFE"),
            L5 => write!(f, "L5"),
            R5 => write!(f, "R5"),
            Ls5 => write!(f, "Ls5"),
            Rs5 => write!(f, "Rs5"),
            Ltf2 => write!(f, "Ltf2"),
            Rtf2 => write!(f, "Rtf2"),
            Ltf4 => write!(f, "Ltf4"),
            Rtf4 => write!(f, "Rtf4"),
            Ltb4 => write!(f, "Ltb4"),
            Rtb4 => write!(f, "Rtb4"),
            L7 => write!(f, "L7"),
            R7 => write!(f, "R7"),
            Lss7 => write!(f, "Lss7"),
            Rss7 => write!(f, "Rss7"),
            Lrs7 => write!(f, "Lrs7"),
            Rrs7 => write!(f, "Rrs7"),
            Ambisonics(index) => write!(f, "A{index}"),
        }
    }
}

impl InputLayout {
    /// Derives the input layout from an `AP_yyyyxxxx` pack format id.
    ///
    /// The validator has already filtered unsupported layouts, so an
    /// unmapped id here is an internal logic error.
    pub fn from_pack_format_id(pack_format_id: &str) -> Result<InputLayout> {
        let unknown = || IamfError::UnknownLayout(pack_format_id.to_string());
        let digits = pack_format_id.strip_prefix("AP_").ok_or_else(unknown)?;
        if digits.len() != 8 {
            return Err(unknown());
        }
        let type_definition = &digits[0..4];
        let layout = u32::from_str_radix(&digits[4..8], 16).map_err(|_| unknown())?;

        use InputLayout::*;
        match (type_definition, layout) {
            ("0001", 0x0001) => Ok(Mono),
            ("0001", 0x0002) => Ok(Stereo),
            ("0001", 0x0003) => Ok(Surround51),
            ("0001", 0x0004) => Ok(Surround512),
            ("0001", 0x0005) => Ok(Surround514),
            ("0001", 0x000f) => Ok(Surround71),
            ("0001", 0x0017) => Ok(Surround714),
            ("0001", 0x1fff) => Ok(Lfe),
            ("0004", 0x0001) => Ok(AmbisonicsOrder1),
            ("0004", 0x0002) => Ok(AmbisonicsOrder2),
            ("0004", 0x0003) => Ok(AmbisonicsOrder3),
            ("0005", 0x0001) => Ok(Binaural),
            _ => Err(unknown()),
        }
    }

    /// Number of coded substreams for this layout.
    pub const fn num_substreams(self) -> u32 {
        use InputLayout::*;
        match self {
            Mono | Stereo | Binaural | Lfe => 1,
            Surround51 => 4,
            Surround512 => 5,
            Surround514 => 6,
            Surround71 => 5,
            Surround714 => 7,
            AmbisonicsOrder1 => 4,
            AmbisonicsOrder2 => 9,
            AmbisonicsOrder3 => 16,
        }
    }

    /// Number of coupled (stereo pair) substreams. Meaningful for
    /// channel-based layouts only.
    pub const fn coupled_substream_count(self) -> u32 {
        use InputLayout::*;
        match self {
            Mono | Lfe => 0,
            Stereo | Binaural => 1,
            Surround51 => 2,
            Surround512 | Surround71 => 3,
            Surround514 => 4,
            Surround714 => 5,
            AmbisonicsOrder1 | AmbisonicsOrder2 | AmbisonicsOrder3 => 0,
        }
    }

    /// Whether elements for this layout are channel based or scene based.
    pub const fn element_type(self) -> AudioElementType {
        use InputLayout::*;
        match self {
            AmbisonicsOrder1 | AmbisonicsOrder2 | AmbisonicsOrder3 => AudioElementType::SceneBased,
            _ => AudioElementType::ChannelBased,
        }
    }

    /// The loudspeaker layout constant for channel-based elements; `None`
    /// for scene-based layouts.
    pub const fn loudspeaker_layout(self) -> Option<LoudspeakerLayout> {
        use InputLayout::*;
        match self {
            Mono => Some(LoudspeakerLayout::Mono),
            Stereo => Some(LoudspeakerLayout::Stereo),
            Surround51 => Some(LoudspeakerLayout::Surround51),
            Surround512 => Some(LoudspeakerLayout::Surround512),
            Surround514 => Some(LoudspeakerLayout::Surround514),
            Surround71 => Some(LoudspeakerLayout::Surround71),
            Surround714 => Some(LoudspeakerLayout::Surround714),
            Binaural => Some(LoudspeakerLayout::Binaural),
            Lfe => Some(LoudspeakerLayout::Expanded),
            AmbisonicsOrder1 | AmbisonicsOrder2 | AmbisonicsOrder3 => None,
        }
    }

    /// Expanded layout sub-field, set only for layouts represented through
    /// `LoudspeakerLayout::Expanded`.
    pub const fn expanded_loudspeaker_layout(self) -> Option<ExpandedLoudspeakerLayout> {
        match self {
            InputLayout::Lfe => Some(ExpandedLoudspeakerLayout::Lfe),
            _ => None,
        }
    }

    /// Reference sound system for loudness layouts; `None` for binaural,
    /// LFE and scene-based layouts.
    pub const fn sound_system(self) -> Option<SoundSystem> {
        use InputLayout::*;
        match self {
            Mono => Some(SoundSystem::Mono12_0_1_0),
            Stereo => Some(SoundSystem::A0_2_0),
            Surround51 => Some(SoundSystem::B0_5_0),
            Surround512 => Some(SoundSystem::C2_5_0),
            Surround514 => Some(SoundSystem::D4_5_0),
            Surround71 => Some(SoundSystem::I0_7_0),
            Surround714 => Some(SoundSystem::J4_7_0),
            Binaural | Lfe | AmbisonicsOrder1 | AmbisonicsOrder2 | AmbisonicsOrder3 => None,
        }
    }

    /// Layouts that append their own loudness layout to a sub mix, beyond
    /// the mandatory stereo layout. Scene-based layouts contribute none and
    /// stereo is already covered by the mandatory layout.
    pub const fn has_dedicated_loudness_layout(self) -> bool {
        use InputLayout::*;
        matches!(
            self,
            Mono | Surround51 | Surround512 | Surround514 | Surround71 | Surround714 | Binaural
        )
    }

    /// Ordered channel labels for audio frame metadata.
    pub fn channel_labels(self) -> Vec<ChannelLabel> {
        use ChannelLabel::*;
        match self {
            InputLayout::Mono => vec![Mono],
            InputLayout::Stereo | InputLayout::Binaural => vec![L2, R2],
            InputLayout::Surround51 => vec![L5, R5, Centre, Lfe, Ls5, Rs5],
            InputLayout::Surround512 => {
                vec![L5, R5, Centre, Lfe, Ls5, Rs5, Ltf2, Rtf2]
            }
            InputLayout::Surround514 => {
                vec![L5, R5, Centre, Lfe, Ls5, Rs5, Ltf4, Rtf4, Ltb4, Rtb4]
            }
            InputLayout::Surround71 => {
                vec![L7, R7, Centre, Lfe, Lss7, Rss7, Lrs7, Rrs7]
            }
            InputLayout::Surround714 => {
                vec![L7, R7, Centre, Lfe, Lss7, Rss7, Lrs7, Rrs7, Ltf4, Rtf4, Ltb4, Rtb4]
            }
            InputLayout::Lfe => vec![Lfe],
            InputLayout::AmbisonicsOrder1 => ambisonics_labels(1),
            InputLayout::AmbisonicsOrder2 => ambisonics_labels(2),
            InputLayout::AmbisonicsOrder3 => ambisonics_labels(3),
        }
    }
}

/// Labels `A0..A((order + 1)^2 - 1)` for an ambisonics layout.
fn ambisonics_labels(order: u8) -> Vec<ChannelLabel> {
    let count = (u16::from(order) + 1) * (u16::from(order) + 1);
    (0..count as u8).map(ChannelLabel::Ambisonics).collect()
}
