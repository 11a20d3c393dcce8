//! IAMF configuration builder.
//!
//! Orchestrates programme resolution, layout lookup and loudness encoding
//! into the final [`IamfConfig`]. Substream ids are drawn from a counter
//! local to one build, monotonically increasing and unique across all
//! audio elements. Audio elements and audio frames are emitted in element
//! id order; each frame's WAV file name comes from the owning object's
//! position in the filtered ADM, matching the file names the splicer
//! produces.

use admix_adm::{Adm, AudioObject, LoudnessMetadata};

use crate::config::{
    AmbisonicsConfig, AmbisonicsMode, AudioElement, AudioFrame, ChannelAudioLayerConfig,
    CodecConfig, HeadphonesRenderingMode, IaSequenceHeader, IamfConfig, Layout, MixGainParam,
    MixLayout, MixPresentation, ParamDefinition, ProfileVersion, RenderingConfig,
    ScalableChannelLayoutConfig, SoundSystem, SubMix, SubMixAudioElement,
};
use crate::error::{IamfError, Result};
use crate::layout::InputLayout;
use crate::loudness::{loudness_info, q7_8_from_f32};
use crate::resolver::{resolve_programmes, ResolvedMix};

/// Identifier of the single codec config.
const CODEC_CONFIG_ID: u32 = 0;

/// Annotation language attached to every mix presentation.
const ANNOTATION_LANGUAGE: &str = "en-us";

/// Localized annotation attached to every mix presentation.
const MIX_PRESENTATION_ANNOTATION: &str = "test_mix_pres";

/// Maximum loudness layouts per sub mix, counting the mandatory stereo
/// layout.
const MAX_LOUDNESS_LAYOUTS: u32 = 4;

/// Computes the number of samples per frame for a frame duration of at
/// most `max_frame_duration_ms`.
///
/// Rounds toward zero so the realized frame duration never exceeds the
/// request.
pub fn samples_per_frame(max_frame_duration_ms: u32, samples_per_sec: u32) -> Result<u32> {
    if max_frame_duration_ms == 0 || samples_per_sec == 0 {
        return Err(IamfError::InvalidFrameGeometry {
            frame_duration_ms: max_frame_duration_ms,
            sample_rate: samples_per_sec,
        });
    }
    Ok((u64::from(max_frame_duration_ms) * u64::from(samples_per_sec) / 1000) as u32)
}

/// Builds an [`IamfConfig`] from a filtered ADM and the input format.
#[derive(Debug)]
pub struct ConfigBuilder<'a> {
    adm: &'a Adm,
    sample_rate: u32,
    bits_per_sample: u16,
}

impl<'a> ConfigBuilder<'a> {
    /// Creates a builder over a filtered ADM.
    pub fn new(adm: &'a Adm, sample_rate: u32, bits_per_sample: u16) -> Self {
        ConfigBuilder {
            adm,
            sample_rate,
            bits_per_sample,
        }
    }

    /// Builds the configuration record.
    pub fn build(
        &self,
        profile_version: ProfileVersion,
        file_prefix: &str,
        max_frame_duration_ms: u32,
    ) -> Result<IamfConfig> {
        let num_samples_per_frame = samples_per_frame(max_frame_duration_ms, self.sample_rate)?;
        let resolution = resolve_programmes(self.adm);

        let mut config = IamfConfig {
            ia_sequence_header: IaSequenceHeader::new(profile_version),
            codec_configs: vec![CodecConfig::lpcm(
                CODEC_CONFIG_ID,
                num_samples_per_frame,
                self.bits_per_sample as u8,
                self.sample_rate,
            )],
            audio_elements: Vec::with_capacity(resolution.element_objects.len()),
            mix_presentations: Vec::with_capacity(resolution.mixes.len()),
            audio_frames: Vec::with_capacity(resolution.element_objects.len()),
        };

        let mut substream_id_counter = 0u32;
        for (element_id, &object_index) in resolution.element_objects.iter().enumerate() {
            let object = &self.adm.objects[object_index];
            let layout = input_layout_for(object)?;
            config.audio_elements.push(build_audio_element(
                element_id as u32,
                layout,
                &mut substream_id_counter,
            ));
            config.audio_frames.push(build_audio_frame(
                file_prefix,
                object_index,
                element_id as u32,
                layout,
            ));
        }

        for mix in &resolution.mixes {
            config
                .mix_presentations
                .push(self.build_mix_presentation(mix)?);
        }

        Ok(config)
    }

    fn build_mix_presentation(&self, mix: &ResolvedMix) -> Result<MixPresentation> {
        let loudness_metadata = match mix.programme_index {
            Some(programme_index) => self.adm.programmes[programme_index].loudness,
            None => LoudnessMetadata::default(),
        };

        let mut sub_mix = SubMix {
            num_audio_elements: mix.members.len() as u32,
            audio_elements: Vec::with_capacity(mix.members.len()),
            output_mix_gain: MixGainParam {
                param_definition: self.param_definition(),
                default_mix_gain: 0,
            },
            num_layouts: 0,
            layouts: Vec::new(),
        };

        for member in &mix.members {
            let object = &self.adm.objects[member.object_index];
            let layout = input_layout_for(object)?;
            sub_mix.audio_elements.push(SubMixAudioElement {
                audio_element_id: member.audio_element_id,
                localized_element_annotations: vec![object.label.clone()],
                rendering_config: RenderingConfig {
                    headphones_rendering_mode: if layout == InputLayout::Binaural {
                        HeadphonesRenderingMode::Binaural
                    } else {
                        HeadphonesRenderingMode::Stereo
                    },
                },
                element_mix_gain: MixGainParam {
                    param_definition: self.param_definition(),
                    default_mix_gain: q7_8_from_f32(object.gain)?,
                },
            });
        }

        // A stereo loudness layout is always required, first.
        sub_mix.layouts.push(MixLayout {
            loudness_layout: Layout::SsConvention {
                sound_system: SoundSystem::A0_2_0,
            },
            loudness: loudness_info(&loudness_metadata)?,
        });
        let mut num_layouts = 1u32;

        for member in &mix.members {
            if num_layouts >= MAX_LOUDNESS_LAYOUTS {
                break;
            }
            let layout = input_layout_for(&self.adm.objects[member.object_index])?;
            if !layout.has_dedicated_loudness_layout() {
                continue;
            }
            num_layouts += 1;
            let loudness_layout = match layout.sound_system() {
                Some(sound_system) => Layout::SsConvention { sound_system },
                None => Layout::Binaural { reserved: 0 },
            };
            sub_mix.layouts.push(MixLayout {
                loudness_layout,
                loudness: loudness_info(&loudness_metadata)?,
            });
        }
        sub_mix.num_layouts = num_layouts;

        Ok(MixPresentation {
            mix_presentation_id: mix.mix_presentation_id,
            count_label: 1,
            annotations_language: vec![ANNOTATION_LANGUAGE.to_string()],
            localized_presentation_annotations: vec![MIX_PRESENTATION_ANNOTATION.to_string()],
            num_sub_mixes: 1,
            sub_mixes: vec![sub_mix],
        })
    }

    fn param_definition(&self) -> ParamDefinition {
        ParamDefinition {
            parameter_id: 0,
            parameter_rate: self.sample_rate,
            param_definition_mode: 1,
        }
    }
}

/// Input layout of an object, from its first pack format ref.
fn input_layout_for(object: &AudioObject) -> Result<InputLayout> {
    let pack_format_id = object
        .pack_format_refs
        .first()
        .ok_or_else(|| IamfError::MissingPackFormat(object.id.clone()))?;
    InputLayout::from_pack_format_id(pack_format_id)
}

/// Builds one audio element, drawing substream ids from the shared
/// counter.
fn build_audio_element(
    audio_element_id: u32,
    layout: InputLayout,
    substream_id_counter: &mut u32,
) -> AudioElement {
    let num_substreams = layout.num_substreams();
    let audio_substream_ids: Vec<u32> =
        (*substream_id_counter..*substream_id_counter + num_substreams).collect();
    *substream_id_counter += num_substreams;

    let mut element = AudioElement {
        audio_element_id,
        audio_element_type: layout.element_type(),
        codec_config_id: CODEC_CONFIG_ID,
        num_substreams,
        audio_substream_ids,
        num_parameters: 0,
        scalable_channel_layout_config: None,
        ambisonics_config: None,
    };

    match layout.loudspeaker_layout() {
        Some(loudspeaker_layout) => {
            element.scalable_channel_layout_config = Some(ScalableChannelLayoutConfig {
                num_layers: 1,
                channel_audio_layer_configs: vec![ChannelAudioLayerConfig {
                    loudspeaker_layout,
                    output_gain_is_present_flag: false,
                    recon_gain_is_present_flag: false,
                    substream_count: num_substreams,
                    coupled_substream_count: layout.coupled_substream_count(),
                    expanded_loudspeaker_layout: layout.expanded_loudspeaker_layout(),
                }],
            });
        }
        None => {
            // Scene based: mono-coded ambisonics with a trivial identity
            // channel mapping.
            element.ambisonics_config = Some(AmbisonicsConfig {
                ambisonics_mode: AmbisonicsMode::Mono,
                output_channel_count: num_substreams,
                substream_count: num_substreams,
                channel_mapping: (0..num_substreams).collect(),
            });
        }
    }

    element
}

/// Builds the audio frame metadata for one element. The 1-based WAV suffix
/// is the object's position in the filtered ADM, matching the splicer's
/// output file names.
fn build_audio_frame(
    file_prefix: &str,
    object_index: usize,
    audio_element_id: u32,
    layout: InputLayout,
) -> AudioFrame {
    let channel_labels = layout.channel_labels();
    let channel_ids = (0..channel_labels.len() as u32).collect();
    AudioFrame {
        wav_filename: format!("{}_converted{}.wav", file_prefix, object_index + 1),
        audio_element_id,
        samples_to_trim_at_start: 0,
        samples_to_trim_at_end: 0,
        channel_labels,
        channel_ids,
    }
}
