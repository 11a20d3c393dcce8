//! ADM validation.
//!
//! Two filters run against parsed audio objects. The layout filter checks
//! each `audioPackFormatIDRef` (`AP_yyyyxxxx`) against the layouts IAMF can
//! represent and marks objects with unsupported layouts as invalid. The
//! importance filter removes objects below the caller's importance
//! threshold. Neither filter aborts the parse; rejected objects are dropped
//! with a warning.

use std::collections::HashSet;

use crate::elements::Adm;

/// `typeDefinition` digits for DirectSpeakers layouts.
const TYPE_DEFINITION_DIRECT_SPEAKERS: &str = "0001";
/// `typeDefinition` digits for higher-order ambisonics layouts.
const TYPE_DEFINITION_HOA: &str = "0004";
/// `typeDefinition` digits for binaural layouts.
const TYPE_DEFINITION_BINAURAL: &str = "0005";

/// Layout descriptors above this value are user defined rather than part of
/// the common definitions (Recommendation ITU-R BS.2094).
const MAX_COMMON_DEFINITION_LAYOUT: u32 = 0x0fff;

/// Splits an `AP_yyyyxxxx` pack format id into its `yyyy` type definition
/// and `xxxx` layout descriptor.
pub(crate) fn split_pack_format_id(pack_format_id: &str) -> Option<(&str, &str)> {
    let digits = pack_format_id.strip_prefix("AP_")?;
    if digits.len() != 8 {
        return None;
    }
    Some((&digits[0..4], &digits[4..8]))
}

/// Returns true when the pack format id names a layout IAMF can represent.
pub fn is_supported_pack_format(pack_format_id: &str) -> bool {
    let Some((type_definition, layout_digits)) = split_pack_format_id(pack_format_id) else {
        return false;
    };
    let Ok(layout) = u32::from_str_radix(layout_digits, 16) else {
        return false;
    };
    if layout > MAX_COMMON_DEFINITION_LAYOUT {
        return false;
    }

    match type_definition {
        // Mono, Stereo, 5.1, 5.1.2, 5.1.4, 7.1 and 7.1.4.
        TYPE_DEFINITION_DIRECT_SPEAKERS => {
            matches!(layout, 0x0001..=0x0005 | 0x000f | 0x0017)
        }
        // First, second and third order ambisonics.
        TYPE_DEFINITION_HOA => matches!(layout, 0x0001..=0x0003),
        TYPE_DEFINITION_BINAURAL => layout == 0x0001,
        // Everything else, including typeDefinition Objects (0003).
        _ => false,
    }
}

/// Removes audio objects that were marked invalid by the layout filter or
/// whose importance falls below `importance_threshold`.
pub fn apply_filters(adm: &mut Adm, invalid_objects: &HashSet<String>, importance_threshold: i32) {
    adm.objects.retain(|object| {
        if object.importance < importance_threshold {
            log::warn!(
                "Dropping audioObject `{}`: importance {} is below threshold {}",
                object.id,
                object.importance,
                importance_threshold
            );
            return false;
        }
        !invalid_objects.contains(&object.id)
    });
}
