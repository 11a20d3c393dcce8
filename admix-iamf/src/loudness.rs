//! Q7.8 loudness codec.
//!
//! IAMF carries loudness as signed 16-bit fixed point with 8 fractional
//! bits. Values are scaled by 256, rounded to nearest and clamped into the
//! i16 range; scaled values outside `[-32768.5, 32767.5]` cannot be
//! represented and fail. The info-type bit mask is derived from which
//! optional ADM loudness values are present.

use admix_adm::LoudnessMetadata;

use crate::config::{
    AnchorElement, AnchorType, AnchoredLoudness, LoudnessInfo, LoudnessInfoType,
};
use crate::error::{IamfError, Result};

/// Q7.8 zero, used for fields ADM does not carry.
pub const Q7_8_ZERO: i16 = 0;

/// Encodes a float into Q7.8 fixed point.
pub fn q7_8_from_f32(value: f32) -> Result<i16> {
    let scaled = f64::from(value) * 256.0;
    if scaled.is_nan() || scaled < -32768.5 || scaled > 32767.5 {
        return Err(IamfError::LoudnessOutOfRange(value));
    }
    Ok(scaled.round().clamp(-32768.0, 32767.0) as i16)
}

/// Builds the loudness information for one loudness layout.
///
/// The digital peak is always Q7.8 zero because ADM does not carry the
/// value. `TRUE_PEAK` is set iff `max_true_peak` is present and
/// `ANCHORED_LOUDNESS` iff `dialogue` is present, the latter with exactly
/// one `DIALOGUE` anchor.
pub fn loudness_info(metadata: &LoudnessMetadata) -> Result<LoudnessInfo> {
    let mut info = LoudnessInfo {
        info_type_bit_masks: Vec::new(),
        integrated_loudness: q7_8_from_f32(metadata.integrated)?,
        digital_peak: Q7_8_ZERO,
        true_peak: None,
        anchored_loudness: None,
    };

    if let Some(true_peak) = metadata.max_true_peak {
        info.info_type_bit_masks.push(LoudnessInfoType::TruePeak);
        info.true_peak = Some(q7_8_from_f32(true_peak)?);
    }

    if let Some(dialogue) = metadata.dialogue {
        info.info_type_bit_masks
            .push(LoudnessInfoType::AnchoredLoudness);
        info.anchored_loudness = Some(AnchoredLoudness {
            num_anchored_loudness: 1,
            anchor_elements: vec![AnchorElement {
                anchor_element: AnchorType::Dialogue,
                anchored_loudness: q7_8_from_f32(dialogue)?,
            }],
        });
    }

    Ok(info)
}
