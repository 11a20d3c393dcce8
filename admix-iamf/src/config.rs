//! The IAMF configuration record.
//!
//! A structured, in-memory form of the descriptor metadata a downstream
//! IAMF encoder consumes: the IA sequence header, one codec config, one
//! audio element per unique ADM object, one mix presentation per resolved
//! programme instance, and per-element audio frame metadata. Serialization
//! of the record is the consumer's concern; the only bit-exact commitment
//! here is the Q7.8 encoding of loudness fields.

use crate::layout::ChannelLabel;

/// The four byte `iamf` code carried by the IA sequence header.
pub const IA_CODE: u32 = 0x6961_6d66;

/// IAMF profile targeted by the sequence header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProfileVersion {
    /// Simple profile (version 0).
    Simple,
    /// Base profile (version 1).
    #[default]
    Base,
    /// Base-enhanced profile (version 2).
    BaseEnhanced,
}

impl ProfileVersion {
    /// The `primary_profile` byte.
    pub const fn primary_profile(self) -> u8 {
        match self {
            ProfileVersion::Simple => 0,
            ProfileVersion::Base => 1,
            ProfileVersion::BaseEnhanced => 2,
        }
    }

    /// The `additional_profile` byte.
    pub const fn additional_profile(self) -> u8 {
        self.primary_profile()
    }
}

/// IA sequence header descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IaSequenceHeader {
    /// Always the `iamf` four byte code.
    pub ia_code: u32,
    /// Primary profile version byte.
    pub primary_profile: u8,
    /// Additional profile version byte.
    pub additional_profile: u8,
}

impl IaSequenceHeader {
    /// Builds the sequence header for a profile.
    pub fn new(profile_version: ProfileVersion) -> Self {
        IaSequenceHeader {
            ia_code: IA_CODE,
            primary_profile: profile_version.primary_profile(),
            additional_profile: profile_version.additional_profile(),
        }
    }
}

/// Codec identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodecId {
    /// Linear PCM pass-through.
    Lpcm,
}

/// Sample format flags for LPCM decoder configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleFormatFlags {
    /// Little-endian samples.
    LittleEndian,
}

/// LPCM decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LpcmDecoderConfig {
    /// Endianness of the coded samples.
    pub sample_format_flags: SampleFormatFlags,
    /// Bits per sample.
    pub sample_size: u8,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

/// Codec configuration descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecConfig {
    /// Identifier referenced by audio elements.
    pub codec_config_id: u32,
    /// Codec in use.
    pub codec_id: CodecId,
    /// Samples per coded frame.
    pub num_samples_per_frame: u32,
    /// Let the encoder derive the audio roll distance.
    pub automatically_override_audio_roll_distance: bool,
    /// Let the encoder derive the codec delay.
    pub automatically_override_codec_delay: bool,
    /// LPCM decoder configuration.
    pub decoder_config_lpcm: LpcmDecoderConfig,
}

impl CodecConfig {
    /// Builds the LPCM codec config.
    pub fn lpcm(
        codec_config_id: u32,
        num_samples_per_frame: u32,
        sample_size: u8,
        sample_rate: u32,
    ) -> Self {
        CodecConfig {
            codec_config_id,
            codec_id: CodecId::Lpcm,
            num_samples_per_frame,
            automatically_override_audio_roll_distance: true,
            automatically_override_codec_delay: true,
            decoder_config_lpcm: LpcmDecoderConfig {
                sample_format_flags: SampleFormatFlags::LittleEndian,
                sample_size,
                sample_rate,
            },
        }
    }
}

/// Channel- versus scene-based element split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AudioElementType {
    /// Loudspeaker-fed element.
    ChannelBased,
    /// Ambisonics element.
    SceneBased,
}

/// Loudspeaker layout constant for a channel audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoudspeakerLayout {
    /// Mono.
    Mono,
    /// Stereo.
    Stereo,
    /// 5.1.
    Surround51,
    /// 5.1.2.
    Surround512,
    /// 5.1.4.
    Surround514,
    /// 7.1.
    Surround71,
    /// 7.1.4.
    Surround714,
    /// Binaural.
    Binaural,
    /// Expanded layout; see [`ExpandedLoudspeakerLayout`].
    Expanded,
}

/// Expanded loudspeaker layout sub-field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpandedLoudspeakerLayout {
    /// Standalone LFE channel.
    Lfe,
}

/// One layer of a scalable channel layout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelAudioLayerConfig {
    /// Loudspeaker layout constant.
    pub loudspeaker_layout: LoudspeakerLayout,
    /// Output gain presence; always false for single-layer elements.
    pub output_gain_is_present_flag: bool,
    /// Recon gain presence; always false for single-layer elements.
    pub recon_gain_is_present_flag: bool,
    /// Substreams in this layer.
    pub substream_count: u32,
    /// Coupled substreams in this layer.
    pub coupled_substream_count: u32,
    /// Expanded layout sub-field, set when `loudspeaker_layout` is
    /// [`LoudspeakerLayout::Expanded`].
    pub expanded_loudspeaker_layout: Option<ExpandedLoudspeakerLayout>,
}

/// Scalable channel layout config for channel-based elements.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalableChannelLayoutConfig {
    /// Number of layers; always one.
    pub num_layers: u32,
    /// Per-layer configuration.
    pub channel_audio_layer_configs: Vec<ChannelAudioLayerConfig>,
}

/// Ambisonics coding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AmbisonicsMode {
    /// Mono-coded ambisonics; each substream carries one ACN channel.
    Mono,
}

/// Ambisonics config for scene-based elements.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmbisonicsConfig {
    /// Coding mode; LPCM input is always mono coded.
    pub ambisonics_mode: AmbisonicsMode,
    /// Output channel count.
    pub output_channel_count: u32,
    /// Substream count.
    pub substream_count: u32,
    /// Identity channel mapping over the substreams.
    pub channel_mapping: Vec<u32>,
}

/// Audio element descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioElement {
    /// Element identifier, unique and dense starting at 0.
    pub audio_element_id: u32,
    /// Channel- or scene-based.
    pub audio_element_type: AudioElementType,
    /// Referenced codec config.
    pub codec_config_id: u32,
    /// Number of substreams.
    pub num_substreams: u32,
    /// Substream identifiers, unique across all elements.
    pub audio_substream_ids: Vec<u32>,
    /// Number of element parameters; always zero.
    pub num_parameters: u32,
    /// Present for channel-based elements.
    pub scalable_channel_layout_config: Option<ScalableChannelLayoutConfig>,
    /// Present for scene-based elements.
    pub ambisonics_config: Option<AmbisonicsConfig>,
}

/// Per-element audio frame metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioFrame {
    /// Name of the spliced per-object WAV file feeding this element.
    pub wav_filename: String,
    /// Referenced audio element.
    pub audio_element_id: u32,
    /// Samples to trim from the start; always zero.
    pub samples_to_trim_at_start: u32,
    /// Samples to trim from the end; always zero.
    pub samples_to_trim_at_end: u32,
    /// Ordered channel labels.
    pub channel_labels: Vec<ChannelLabel>,
    /// Channel ids `0..channel_labels.len()`.
    pub channel_ids: Vec<u32>,
}

/// Loudness info-type bits, derived from the presence of the optional ADM
/// loudness values rather than their magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoudnessInfoType {
    /// A true peak value is carried.
    TruePeak,
    /// An anchored loudness record is carried.
    AnchoredLoudness,
}

/// Anchor type for anchored loudness; ADM only encodes dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnchorType {
    /// Dialogue anchor.
    Dialogue,
}

/// One anchored loudness element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorElement {
    /// Anchor type.
    pub anchor_element: AnchorType,
    /// Anchored loudness in Q7.8.
    pub anchored_loudness: i16,
}

/// Anchored loudness record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchoredLoudness {
    /// Number of anchor elements; always one.
    pub num_anchored_loudness: u32,
    /// Anchor elements.
    pub anchor_elements: Vec<AnchorElement>,
}

/// Loudness information for one loudness layout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoudnessInfo {
    /// Info-type bit mask entries.
    pub info_type_bit_masks: Vec<LoudnessInfoType>,
    /// Integrated loudness in Q7.8.
    pub integrated_loudness: i16,
    /// Digital peak in Q7.8; ADM does not carry it, so always Q7.8 zero.
    pub digital_peak: i16,
    /// True peak in Q7.8, present iff the ADM carried `maxTruePeak`.
    pub true_peak: Option<i16>,
    /// Anchored loudness, present iff the ADM carried `dialogueLoudness`.
    pub anchored_loudness: Option<AnchoredLoudness>,
}

/// ITU-R BS.2051 sound systems referenced by loudness layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoundSystem {
    /// Sound system A (0+2+0), stereo.
    A0_2_0,
    /// Sound system B (0+5+0), 5.1.
    B0_5_0,
    /// Sound system C (2+5+0), 5.1.2.
    C2_5_0,
    /// Sound system D (4+5+0), 5.1.4.
    D4_5_0,
    /// Sound system I (0+7+0), 7.1.
    I0_7_0,
    /// Sound system J (4+7+0), 7.1.4.
    J4_7_0,
    /// Sound system 12 (0+1+0), mono.
    Mono12_0_1_0,
}

/// Loudness layout of a sub mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// Loudspeaker layout following the sound system convention.
    SsConvention {
        /// Referenced sound system.
        sound_system: SoundSystem,
    },
    /// Binaural layout.
    Binaural {
        /// Reserved bits, always zero.
        reserved: u32,
    },
}

/// A loudness layout paired with its loudness information.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixLayout {
    /// The loudness layout.
    pub loudness_layout: Layout,
    /// Loudness measured against that layout.
    pub loudness: LoudnessInfo,
}

/// Parameter definition shared by the mix gain parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamDefinition {
    /// Parameter identifier; always zero.
    pub parameter_id: u32,
    /// Parameter rate; the input sample rate.
    pub parameter_rate: u32,
    /// Parameter definition mode; always one.
    pub param_definition_mode: u32,
}

/// A mix gain with its parameter definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixGainParam {
    /// Parameter definition.
    pub param_definition: ParamDefinition,
    /// Default mix gain in Q7.8.
    pub default_mix_gain: i16,
}

/// Headphones rendering mode of a sub mix element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeadphonesRenderingMode {
    /// Render to stereo.
    Stereo,
    /// Render binaurally.
    Binaural,
}

/// Rendering configuration of a sub mix element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderingConfig {
    /// Headphones rendering mode.
    pub headphones_rendering_mode: HeadphonesRenderingMode,
}

/// One audio element reference inside a sub mix.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubMixAudioElement {
    /// Referenced audio element.
    pub audio_element_id: u32,
    /// Localized element annotations; the ADM object label.
    pub localized_element_annotations: Vec<String>,
    /// Rendering configuration.
    pub rendering_config: RenderingConfig,
    /// Element mix gain; the ADM object gain in Q7.8.
    pub element_mix_gain: MixGainParam,
}

/// One sub mix of a mix presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubMix {
    /// Number of audio elements; mirrors `audio_elements.len()`.
    pub num_audio_elements: u32,
    /// Audio element references.
    pub audio_elements: Vec<SubMixAudioElement>,
    /// Output mix gain, zero by default.
    pub output_mix_gain: MixGainParam,
    /// Number of loudness layouts; mirrors `layouts.len()`.
    pub num_layouts: u32,
    /// Loudness layouts; the first is always the stereo layout.
    pub layouts: Vec<MixLayout>,
}

/// Mix presentation descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixPresentation {
    /// Identifier; the resolved programme instance index.
    pub mix_presentation_id: u32,
    /// Number of annotation labels.
    pub count_label: u32,
    /// Annotation languages.
    pub annotations_language: Vec<String>,
    /// Localized presentation annotations.
    pub localized_presentation_annotations: Vec<String>,
    /// Number of sub mixes; always one.
    pub num_sub_mixes: u32,
    /// The sub mixes.
    pub sub_mixes: Vec<SubMix>,
}

/// The complete configuration record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IamfConfig {
    /// IA sequence header.
    pub ia_sequence_header: IaSequenceHeader,
    /// Codec configs; exactly one LPCM config.
    pub codec_configs: Vec<CodecConfig>,
    /// One audio element per unique object reached by a programme.
    pub audio_elements: Vec<AudioElement>,
    /// One mix presentation per resolved programme instance.
    pub mix_presentations: Vec<MixPresentation>,
    /// One audio frame entry per audio element.
    pub audio_frames: Vec<AudioFrame>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_header() {
        let header = IaSequenceHeader::new(ProfileVersion::Base);
        assert_eq!(header.ia_code, IA_CODE);
        assert_eq!(header.primary_profile, 1);
        assert_eq!(header.additional_profile, 1);

        let simple = IaSequenceHeader::new(ProfileVersion::Simple);
        assert_eq!(simple.primary_profile, 0);
    }

    #[test]
    fn test_lpcm_codec_config() {
        let config = CodecConfig::lpcm(0, 480, 16, 48000);
        assert_eq!(config.codec_id, CodecId::Lpcm);
        assert_eq!(config.num_samples_per_frame, 480);
        assert!(config.automatically_override_audio_roll_distance);
        assert!(config.automatically_override_codec_delay);
        assert_eq!(
            config.decoder_config_lpcm.sample_format_flags,
            SampleFormatFlags::LittleEndian
        );
        assert_eq!(config.decoder_config_lpcm.sample_size, 16);
        assert_eq!(config.decoder_config_lpcm.sample_rate, 48000);
    }
}
