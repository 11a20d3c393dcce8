//! Streaming XML to ADM builder.
//!
//! The `axml` payload can be large, so the builder consumes pull-parser
//! events rather than materializing a document tree. A single handler
//! carries the parse state: the current structural parent
//! (`audioProgramme`, `audioContent` or `audioObject`) and, per parent, the
//! leaf element whose character data should populate the next field.
//!
//! Scalar conversion failures are sticky: the first failure is recorded and
//! the parse continues so the underlying parser is never abandoned in an
//! inconsistent state. The recorded error surfaces after end-of-document.

use std::collections::HashSet;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::elements::{Adm, AudioContent, AudioObject, AudioProgramme};
use crate::error::{AdmError, Result};
use crate::validate;

/// Structural element currently being populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Parent {
    #[default]
    None,
    Programme,
    Content,
    Object,
}

/// Leaf element whose text populates an `audioProgramme` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ProgrammeTag {
    #[default]
    None,
    ContentIdRef,
    IntegratedLoudness,
    MaxTruePeak,
    DialogueLoudness,
    PackFormatIdRef,
}

/// Leaf element whose text populates an `audioContent` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ContentTag {
    #[default]
    None,
    ObjectIdRef,
}

/// Leaf element whose text populates an `audioObject` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ObjectTag {
    #[default]
    None,
    PackFormatIdRef,
    TrackUidRef,
    ComplementaryObjectIdRef,
    Gain,
    Label,
}

/// Accumulated parse state.
#[derive(Debug, Default)]
struct Handler {
    adm: Adm,
    /// Objects rejected by the layout filter, by `audioObjectID`.
    invalid_objects: HashSet<String>,
    parent: Parent,
    programme_tag: ProgrammeTag,
    content_tag: ContentTag,
    object_tag: ObjectTag,
    /// First scalar conversion failure, surfaced after end-of-document.
    sticky_error: Option<AdmError>,
}

impl Handler {
    fn record_sticky(&mut self, field: &'static str, position: u64) {
        if self.sticky_error.is_none() {
            self.sticky_error = Some(AdmError::xml_parse(
                position,
                format!("failed to parse `{field}`"),
            ));
        }
    }

    fn parse_f32(&mut self, field: &'static str, text: &str, position: u64) -> Option<f32> {
        match text.parse::<f32>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.record_sticky(field, position);
                None
            }
        }
    }

    fn on_start(&mut self, element: &BytesStart<'_>, position: u64) -> Result<()> {
        match element.name().as_ref() {
            b"audioProgramme" => {
                self.parent = Parent::Programme;
                let mut programme = AudioProgramme::default();
                for attribute in element.attributes() {
                    let attribute = attribute.map_err(|err| xml_error(position, &err))?;
                    let value = attribute
                        .unescape_value()
                        .map_err(|err| xml_error(position, &err))?;
                    match attribute.key.as_ref() {
                        b"audioProgrammeID" => programme.id = value.into_owned(),
                        b"audioProgrammeName" => programme.name = value.into_owned(),
                        b"audioProgrammeLabel" => programme.label = value.into_owned(),
                        _ => {}
                    }
                }
                self.adm.programmes.push(programme);
            }
            b"audioContent" => {
                self.parent = Parent::Content;
                let mut content = AudioContent::default();
                for attribute in element.attributes() {
                    let attribute = attribute.map_err(|err| xml_error(position, &err))?;
                    let value = attribute
                        .unescape_value()
                        .map_err(|err| xml_error(position, &err))?;
                    match attribute.key.as_ref() {
                        b"audioContentID" => content.id = value.into_owned(),
                        b"audioContentName" => content.name = value.into_owned(),
                        _ => {}
                    }
                }
                self.adm.contents.push(content);
            }
            b"audioObject" => {
                self.parent = Parent::Object;
                let mut object = AudioObject::default();
                for attribute in element.attributes() {
                    let attribute = attribute.map_err(|err| xml_error(position, &err))?;
                    let value = attribute
                        .unescape_value()
                        .map_err(|err| xml_error(position, &err))?;
                    match attribute.key.as_ref() {
                        b"audioObjectID" => object.id = value.into_owned(),
                        b"audioObjectName" => object.name = value.into_owned(),
                        b"importance" => match value.trim().parse::<i32>() {
                            Ok(importance) => object.importance = importance,
                            Err(_) => self.record_sticky("importance", position),
                        },
                        _ => {}
                    }
                }
                self.adm.objects.push(object);
            }
            other => self.set_leaf_tag(other),
        }
        Ok(())
    }

    /// Self-closing elements only matter when they declare a structural
    /// parent; a self-closing leaf carries no text to capture.
    fn on_empty(&mut self, element: &BytesStart<'_>, position: u64) -> Result<()> {
        if matches!(
            element.name().as_ref(),
            b"audioProgramme" | b"audioContent" | b"audioObject"
        ) {
            self.on_start(element, position)?;
        }
        Ok(())
    }

    fn set_leaf_tag(&mut self, name: &[u8]) {
        match name {
            b"audioContentIDRef" => self.programme_tag = ProgrammeTag::ContentIdRef,
            b"integratedLoudness" => self.programme_tag = ProgrammeTag::IntegratedLoudness,
            b"maxTruePeak" => self.programme_tag = ProgrammeTag::MaxTruePeak,
            b"dialogueLoudness" => self.programme_tag = ProgrammeTag::DialogueLoudness,
            b"audioObjectIDRef" => self.content_tag = ContentTag::ObjectIdRef,
            // `audioPackFormatIDRef` appears under both programmes (the
            // reference layout) and objects (the object's layout).
            b"audioPackFormatIDRef" => {
                if self.parent == Parent::Programme {
                    self.programme_tag = ProgrammeTag::PackFormatIdRef;
                } else {
                    self.object_tag = ObjectTag::PackFormatIdRef;
                }
            }
            b"audioTrackUIDRef" => self.object_tag = ObjectTag::TrackUidRef,
            b"audioComplementaryObjectIDRef" => {
                self.object_tag = ObjectTag::ComplementaryObjectIdRef;
            }
            b"gain" => self.object_tag = ObjectTag::Gain,
            b"audioObjectLabel" => self.object_tag = ObjectTag::Label,
            _ => {}
        }
    }

    fn on_text(&mut self, text: &str, position: u64) {
        match self.parent {
            Parent::Programme => self.on_programme_text(text, position),
            Parent::Content => self.on_content_text(text),
            Parent::Object => self.on_object_text(text, position),
            Parent::None => {}
        }
    }

    fn on_programme_text(&mut self, text: &str, position: u64) {
        let tag = std::mem::take(&mut self.programme_tag);
        let value = match tag {
            ProgrammeTag::IntegratedLoudness => self.parse_f32("integratedLoudness", text, position),
            ProgrammeTag::MaxTruePeak => self.parse_f32("maxTruePeak", text, position),
            ProgrammeTag::DialogueLoudness => self.parse_f32("dialogueLoudness", text, position),
            _ => None,
        };
        let Some(programme) = self.adm.programmes.last_mut() else {
            return;
        };
        match tag {
            ProgrammeTag::ContentIdRef => programme.content_refs.push(text.to_owned()),
            ProgrammeTag::IntegratedLoudness => {
                if let Some(value) = value {
                    programme.loudness.integrated = value;
                }
            }
            ProgrammeTag::MaxTruePeak => programme.loudness.max_true_peak = value,
            ProgrammeTag::DialogueLoudness => programme.loudness.dialogue = value,
            ProgrammeTag::PackFormatIdRef => programme.reference_layout.push(text.to_owned()),
            ProgrammeTag::None => {}
        }
    }

    fn on_content_text(&mut self, text: &str) {
        let tag = std::mem::take(&mut self.content_tag);
        let Some(content) = self.adm.contents.last_mut() else {
            return;
        };
        match tag {
            ContentTag::ObjectIdRef => content.object_refs.push(text.to_owned()),
            ContentTag::None => {}
        }
    }

    fn on_object_text(&mut self, text: &str, position: u64) {
        let tag = std::mem::take(&mut self.object_tag);
        let gain = match tag {
            ObjectTag::Gain => self.parse_f32("gain", text, position),
            _ => None,
        };
        // The layout filter runs as each pack format ref is seen. Rejected
        // objects are recorded and removed after the parse; they do not
        // abort it.
        let supported_layout = match tag {
            ObjectTag::PackFormatIdRef => validate::is_supported_pack_format(text),
            _ => true,
        };
        let Some(object) = self.adm.objects.last_mut() else {
            return;
        };
        match tag {
            ObjectTag::PackFormatIdRef => {
                if !supported_layout {
                    log::warn!(
                        "Ignoring audioObject `{}`: unsupported audioPackFormatID `{}`",
                        object.id,
                        text
                    );
                    self.invalid_objects.insert(object.id.clone());
                }
                object.pack_format_refs.push(text.to_owned());
            }
            ObjectTag::TrackUidRef => object.track_uid_refs.push(text.to_owned()),
            ObjectTag::ComplementaryObjectIdRef => {
                object.complementary_object_refs.push(text.to_owned());
            }
            ObjectTag::Gain => {
                if let Some(gain) = gain {
                    object.gain = gain;
                }
            }
            ObjectTag::Label => object.label = text.to_owned(),
            ObjectTag::None => {}
        }
    }
}

fn xml_error(position: u64, err: &dyn std::fmt::Display) -> AdmError {
    AdmError::xml_parse(position, err.to_string())
}

/// Parses an `axml` payload into a validated ADM graph.
///
/// `importance_threshold` must already be clamped to `0..=10` by the
/// caller. Objects below the threshold or with unsupported layouts are
/// removed from the returned graph.
pub fn parse_adm(xml: &[u8], importance_threshold: i32) -> Result<Adm> {
    let mut reader = Reader::from_reader(xml);
    let mut buffer = Vec::new();
    let mut handler = Handler::default();

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event_into(&mut buffer) {
            Ok(Event::Start(ref element)) => handler.on_start(element, position)?,
            Ok(Event::Empty(ref element)) => handler.on_empty(element, position)?,
            Ok(Event::Text(ref text)) => {
                let text = text.unescape().map_err(|err| xml_error(position, &err))?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    handler.on_text(trimmed, position);
                }
            }
            Ok(Event::CData(data)) => {
                let bytes = data.into_inner();
                let text = String::from_utf8_lossy(&bytes);
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    handler.on_text(trimmed, position);
                }
            }
            Ok(Event::End(_)) => {}
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(xml_error(position, &err)),
        }
        buffer.clear();
    }

    if let Some(err) = handler.sticky_error.take() {
        return Err(err);
    }

    let mut adm = handler.adm;
    validate::apply_filters(&mut adm, &handler.invalid_objects, importance_threshold);
    Ok(adm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::DEFAULT_OBJECT_LABEL;

    const NO_THRESHOLD: i32 = 0;

    #[test]
    fn test_invalid_xml() {
        assert!(parse_adm(b"<open_tag> </mismatching_close_tag>", NO_THRESHOLD).is_err());
    }

    #[test]
    fn test_loads_audio_programme() {
        let adm = parse_adm(
            br#"
            <audioProgramme audioProgrammeID="APR_1001" audioProgrammeName="main" audioProgrammeLabel="label">
                <audioContentIDRef>ACO_1001</audioContentIDRef>
                <audioPackFormatIDRef>AP_00010001</audioPackFormatIDRef>
            </audioProgramme>
            "#,
            NO_THRESHOLD,
        )
        .unwrap();

        let programme = &adm.programmes[0];
        assert_eq!(programme.id, "APR_1001");
        assert_eq!(programme.name, "main");
        assert_eq!(programme.label, "label");
        assert_eq!(programme.content_refs, ["ACO_1001"]);
        assert_eq!(programme.reference_layout, ["AP_00010001"]);
    }

    #[test]
    fn test_loads_audio_content() {
        let adm = parse_adm(
            br#"
            <audioContent audioContentID="ACO_1001" audioContentName="bed">
                <audioObjectIDRef>AO_1001</audioObjectIDRef>
            </audioContent>
            "#,
            NO_THRESHOLD,
        )
        .unwrap();

        let content = &adm.contents[0];
        assert_eq!(content.id, "ACO_1001");
        assert_eq!(content.name, "bed");
        assert_eq!(content.object_refs, ["AO_1001"]);
    }

    #[test]
    fn test_loads_audio_object() {
        let adm = parse_adm(
            br#"
            <audioObject audioObjectID="AO_1001" audioObjectName="bed" importance="9">
                <audioPackFormatIDRef>AP_00010001</audioPackFormatIDRef>
                <audioTrackUIDRef>ATU_00000001</audioTrackUIDRef>
                <audioObjectLabel>english bed</audioObjectLabel>
                <audioComplementaryObjectIDRef>AO_1002</audioComplementaryObjectIDRef>
                <gain>2.5</gain>
            </audioObject>
            "#,
            NO_THRESHOLD,
        )
        .unwrap();

        let object = &adm.objects[0];
        assert_eq!(object.id, "AO_1001");
        assert_eq!(object.name, "bed");
        assert_eq!(object.label, "english bed");
        assert_eq!(object.importance, 9);
        assert_eq!(object.gain, 2.5);
        assert_eq!(object.pack_format_refs, ["AP_00010001"]);
        assert_eq!(object.complementary_object_refs, ["AO_1002"]);
        assert_eq!(object.track_uid_refs, ["ATU_00000001"]);
    }

    #[test]
    fn test_importance_defaults_to_ten() {
        let adm = parse_adm(b"<audioObject></audioObject>", 10).unwrap();
        assert_eq!(adm.objects.len(), 1);
        assert_eq!(adm.objects[0].importance, 10);
        assert_eq!(adm.objects[0].label, DEFAULT_OBJECT_LABEL);
    }

    #[test]
    fn test_importance_filtering() {
        let xml = br#"
        <topLevelElement>
            <audioObject importance="9"/>
            <audioObject importance="7"/>
            <audioObject importance="4"/>
            <audioObject importance="1"/>
        </topLevelElement>
        "#;

        assert_eq!(parse_adm(xml, 10).unwrap().objects.len(), 0);
        assert_eq!(parse_adm(xml, 9).unwrap().objects.len(), 1);
        assert_eq!(parse_adm(xml, 7).unwrap().objects.len(), 2);
        assert_eq!(parse_adm(xml, 3).unwrap().objects.len(), 3);
    }

    #[test]
    fn test_layout_filtering_keeps_declaration_order() {
        let adm = parse_adm(
            br#"
            <topLevelElement>
                <audioObject audioObjectID="Mono">
                    <audioPackFormatIDRef>AP_00010001</audioPackFormatIDRef>
                </audioObject>
                <audioObject audioObjectID="Stereo">
                    <audioPackFormatIDRef>AP_00010002</audioPackFormatIDRef>
                </audioObject>
                <audioObject audioObjectID="5.1">
                    <audioPackFormatIDRef>AP_00010003</audioPackFormatIDRef>
                </audioObject>
                <audioObject audioObjectID="5.1.2">
                    <audioPackFormatIDRef>AP_00010004</audioPackFormatIDRef>
                </audioObject>
                <audioObject audioObjectID="5.1.4">
                    <audioPackFormatIDRef>AP_00010005</audioPackFormatIDRef>
                </audioObject>
                <audioObject audioObjectID="7.1">
                    <audioPackFormatIDRef>AP_0001000f</audioPackFormatIDRef>
                </audioObject>
                <audioObject audioObjectID="7.1.4">
                    <audioPackFormatIDRef>AP_00010017</audioPackFormatIDRef>
                </audioObject>
                <audioObject audioObjectID="Unsupported">
                    <audioPackFormatIDRef>AP_00010006</audioPackFormatIDRef>
                </audioObject>
            </topLevelElement>
            "#,
            NO_THRESHOLD,
        )
        .unwrap();

        let surviving: Vec<&str> = adm.objects.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(
            surviving,
            ["Mono", "Stereo", "5.1", "5.1.2", "5.1.4", "7.1", "7.1.4"]
        );
    }

    #[test]
    fn test_ambisonics_and_binaural_layouts_survive() {
        let adm = parse_adm(
            br#"
            <topLevelElement>
                <audioObject audioObjectID="FOA">
                    <audioPackFormatIDRef>AP_00040001</audioPackFormatIDRef>
                </audioObject>
                <audioObject audioObjectID="SOA">
                    <audioPackFormatIDRef>AP_00040002</audioPackFormatIDRef>
                </audioObject>
                <audioObject audioObjectID="TOA">
                    <audioPackFormatIDRef>AP_00040003</audioPackFormatIDRef>
                </audioObject>
                <audioObject audioObjectID="Binaural">
                    <audioPackFormatIDRef>AP_00050001</audioPackFormatIDRef>
                </audioObject>
            </topLevelElement>
            "#,
            NO_THRESHOLD,
        )
        .unwrap();

        assert_eq!(adm.objects.len(), 4);
    }

    #[test]
    fn test_sticky_error_when_importance_is_non_integer() {
        assert!(parse_adm(br#"<audioObject importance="1.1"/>"#, NO_THRESHOLD).is_err());
    }

    #[test]
    fn test_sticky_error_when_gain_is_non_float() {
        assert!(parse_adm(
            br#"<audioObject><gain>1-1</gain></audioObject>"#,
            NO_THRESHOLD
        )
        .is_err());
    }

    #[test]
    fn test_sticky_error_does_not_abort_accumulation() {
        // The parse runs to completion; the first conversion error is
        // reported only at the end.
        let err = parse_adm(
            br#"
            <topLevelElement>
                <audioObject audioObjectID="bad" importance="oops"/>
                <audioObject audioObjectID="good"/>
            </topLevelElement>
            "#,
            NO_THRESHOLD,
        )
        .unwrap_err();
        assert!(err.to_string().contains("importance"));
    }

    #[test]
    fn test_explicit_loudness_values() {
        let adm = parse_adm(
            br#"
            <audioProgramme>
                <integratedLoudness>1.1</integratedLoudness>
                <maxTruePeak>2.2</maxTruePeak>
                <dialogueLoudness>3.3</dialogueLoudness>
            </audioProgramme>
            "#,
            NO_THRESHOLD,
        )
        .unwrap();

        let loudness = &adm.programmes[0].loudness;
        assert_eq!(loudness.integrated, 1.1);
        assert_eq!(loudness.max_true_peak, Some(2.2));
        assert_eq!(loudness.dialogue, Some(3.3));
    }

    #[test]
    fn test_default_loudness_values() {
        let adm = parse_adm(b"<audioProgramme></audioProgramme>", NO_THRESHOLD).unwrap();

        let loudness = &adm.programmes[0].loudness;
        assert_eq!(loudness.integrated, 0.0);
        assert!(loudness.max_true_peak.is_none());
        assert!(loudness.dialogue.is_none());
    }

    #[test]
    fn test_sticky_error_when_loudness_is_non_float() {
        assert!(parse_adm(
            br#"<audioProgramme><integratedLoudness>1.1q</integratedLoudness></audioProgramme>"#,
            NO_THRESHOLD
        )
        .is_err());
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let adm = parse_adm(
            br#"
            <topLevel>
                <unrelated>text</unrelated>
                <audioObject audioObjectID="AO_1001"/>
            </topLevel>
            "#,
            NO_THRESHOLD,
        )
        .unwrap();
        assert_eq!(adm.objects.len(), 1);
    }
}
