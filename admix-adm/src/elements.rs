//! ADM element model.
//!
//! In-memory representation of the Audio Definition Model subset needed to
//! author IAMF metadata. Programmes reference contents, contents reference
//! objects, and objects may additionally reference other objects as
//! complementary (alternative) renderings. The graph is not required to be
//! connected: objects unreachable from any programme are retained.

/// Default `audioObjectLabel` when the ADM does not carry one.
pub const DEFAULT_OBJECT_LABEL: &str = "test_sub_mix_0_audio_element_0";

/// Default importance for an `audioObject` without an explicit attribute.
/// The maximum importance, so such objects are never filtered by importance
/// alone.
pub const DEFAULT_IMPORTANCE: i32 = 10;

/// Complete ADM graph, with elements kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Adm {
    /// Audio programmes in declaration order.
    pub programmes: Vec<AudioProgramme>,
    /// Audio contents in declaration order.
    pub contents: Vec<AudioContent>,
    /// Audio objects in declaration order.
    pub objects: Vec<AudioObject>,
}

impl Adm {
    /// Look up a content by its `audioContentID`.
    pub fn content_by_id(&self, id: &str) -> Option<&AudioContent> {
        self.contents.iter().find(|content| content.id == id)
    }

    /// Look up an object by its `audioObjectID`.
    pub fn object_by_id(&self, id: &str) -> Option<&AudioObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    /// Declaration-order position of an object.
    pub fn object_position(&self, id: &str) -> Option<usize> {
        self.objects.iter().position(|object| object.id == id)
    }
}

/// Loudness metadata attached to an audio programme.
///
/// `integrated` is always present in the downstream bitstream and defaults
/// to 0.0 when the ADM omits it. The remaining values are optional and
/// their mere presence drives the IAMF loudness info-type bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoudnessMetadata {
    /// Integrated loudness in LKFS.
    pub integrated: f32,
    /// Maximum true peak, if the ADM carries one.
    pub max_true_peak: Option<f32>,
    /// Dialogue (anchored) loudness, if the ADM carries one.
    pub dialogue: Option<f32>,
}

/// An `audioProgramme` element.
#[derive(Debug, Clone, Default)]
pub struct AudioProgramme {
    /// `audioProgrammeID` attribute.
    pub id: String,
    /// `audioProgrammeName` attribute.
    pub name: String,
    /// `audioProgrammeLabel` attribute.
    pub label: String,
    /// `audioContentIDRef` children, in declaration order.
    pub content_refs: Vec<String>,
    /// Loudness metadata children.
    pub loudness: LoudnessMetadata,
    /// `audioPackFormatIDRef` children describing the reference layout.
    pub reference_layout: Vec<String>,
}

/// An `audioContent` element.
#[derive(Debug, Clone, Default)]
pub struct AudioContent {
    /// `audioContentID` attribute.
    pub id: String,
    /// `audioContentName` attribute.
    pub name: String,
    /// `audioObjectIDRef` children, in declaration order.
    pub object_refs: Vec<String>,
}

/// An `audioObject` element.
#[derive(Debug, Clone)]
pub struct AudioObject {
    /// `audioObjectID` attribute.
    pub id: String,
    /// `audioObjectName` attribute.
    pub name: String,
    /// `audioObjectLabel` child element.
    pub label: String,
    /// `importance` attribute, 0..=10.
    pub importance: i32,
    /// `gain` child element, in dB.
    pub gain: f32,
    /// `audioPackFormatIDRef` children, in declaration order.
    pub pack_format_refs: Vec<String>,
    /// `audioComplementaryObjectIDRef` children, in declaration order.
    pub complementary_object_refs: Vec<String>,
    /// `audioTrackUIDRef` children, in declaration order.
    pub track_uid_refs: Vec<String>,
}

impl Default for AudioObject {
    fn default() -> Self {
        AudioObject {
            id: String::new(),
            name: String::new(),
            label: DEFAULT_OBJECT_LABEL.to_string(),
            importance: DEFAULT_IMPORTANCE,
            gain: 0.0,
            pack_format_refs: Vec::new(),
            complementary_object_refs: Vec::new(),
            track_uid_refs: Vec::new(),
        }
    }
}
