//! Object to input-channel mapping.
//!
//! Input PCM is interleaved across every track of every object. Channels
//! are assigned by scanning objects in declaration order and consuming one
//! consecutive input channel per `audioTrackUIDRef`. Positions within each
//! entry give the original interleaved source channel.

use crate::elements::AudioObject;
use crate::error::{AdmError, Result};

/// One object's slice of the interleaved input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMapEntry {
    /// `audioObjectID` of the owning object.
    pub object_id: String,
    /// Input channel indices assigned to this object, in interleave order.
    pub channels: Vec<usize>,
}

/// Computes the ordered object to channel-range map for a filtered object
/// list.
///
/// An object with no `audioTrackUIDRef` children carries a single implicit
/// track, so a minimal ADM declaring one bare object maps a mono input
/// straight through.
pub fn object_track_map(objects: &[AudioObject]) -> Result<Vec<TrackMapEntry>> {
    if objects.is_empty() {
        return Err(AdmError::NoObjects);
    }

    let mut track_cursor = 0usize;
    Ok(objects
        .iter()
        .map(|object| {
            let track_count = object.track_uid_refs.len().max(1);
            let channels = (track_cursor..track_cursor + track_count).collect();
            track_cursor += track_count;
            TrackMapEntry {
                object_id: object.id.clone(),
                channels,
            }
        })
        .collect())
}
