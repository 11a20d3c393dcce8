//! Programme resolution.
//!
//! Expands the ADM programme/content/object graph into concrete mix
//! presentation instances. Objects reached through a programme's contents
//! form groups: an object carrying complementary refs forms a choice group
//! of itself plus every complementary object (all of which are consumed
//! for the remainder of that programme's scan), while a solo object forms
//! a trivial group of one. The Cartesian product of choices over the
//! groups yields one mix presentation per combination.
//!
//! A programme whose group count exceeds [`MAX_AUDIO_ELEMENTS_PER_MIX`] is
//! skipped with a warning; the per-programme working state is rebuilt for
//! the next programme, so a skip never bleeds into later programmes.

use std::collections::HashSet;

use admix_adm::Adm;

/// Maximum audio elements a single mix presentation may reference.
pub const MAX_AUDIO_ELEMENTS_PER_MIX: usize = 2;

/// One member of a resolved mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixMember {
    /// Declaration-order index of the object in the filtered ADM.
    pub object_index: usize,
    /// Audio element id assigned to the object.
    pub audio_element_id: u32,
}

/// One resolved mix presentation instance.
#[derive(Debug, Clone)]
pub struct ResolvedMix {
    /// Sequential identifier starting at 0.
    pub mix_presentation_id: u32,
    /// The objects of this mix, in group order.
    pub members: Vec<MixMember>,
    /// Declaration-order index of the owning programme; `None` for the
    /// programme-less fallback mix.
    pub programme_index: Option<usize>,
}

/// Result of programme resolution.
#[derive(Debug, Clone, Default)]
pub struct ProgrammeResolution {
    /// Object index per audio element id, in first-encounter order. The
    /// element ids are exactly `0..element_objects.len()`.
    pub element_objects: Vec<usize>,
    /// Resolved mixes in mix presentation id order.
    pub mixes: Vec<ResolvedMix>,
}

impl ProgrammeResolution {
    /// Audio element id assigned to an object, if the object was reached.
    pub fn element_id(&self, object_index: usize) -> Option<u32> {
        self.element_objects
            .iter()
            .position(|&index| index == object_index)
            .map(|id| id as u32)
    }
}

/// A choice group: either a trivial single object or an object plus its
/// complementary alternatives.
#[derive(Debug, Clone)]
struct ChoiceGroup {
    /// Object indices of the choices, base object first.
    choices: Vec<usize>,
}

/// Collects the choice groups reachable through one programme's contents.
fn collect_groups(adm: &Adm, programme_index: usize) -> Vec<ChoiceGroup> {
    let programme = &adm.programmes[programme_index];
    let mut groups: Vec<ChoiceGroup> = Vec::new();
    let mut consumed: HashSet<usize> = HashSet::new();

    for content_id in &programme.content_refs {
        let Some(content) = adm.content_by_id(content_id) else {
            log::warn!(
                "audioProgramme `{}` references unknown audioContent `{}`",
                programme.id,
                content_id
            );
            continue;
        };
        for object_id in &content.object_refs {
            let Some(object_index) = adm.object_position(object_id) else {
                // Filtered out or never declared; resolution binds known
                // objects only.
                continue;
            };
            if consumed.contains(&object_index) {
                continue;
            }

            let mut choices = vec![object_index];
            for complementary_id in &adm.objects[object_index].complementary_object_refs {
                let Some(complementary_index) = adm.object_position(complementary_id) else {
                    continue;
                };
                choices.push(complementary_index);
                consumed.insert(complementary_index);
            }
            groups.push(ChoiceGroup { choices });
        }
    }

    groups
}

/// Cartesian product of choices over the groups. Rows keep the group
/// declaration order; the first group's choice varies fastest across rows.
fn expand_groups(groups: &[ChoiceGroup]) -> Vec<Vec<usize>> {
    let mut combinations: Vec<Vec<usize>> = vec![Vec::new()];
    for group in groups {
        let mut expanded = Vec::with_capacity(combinations.len() * group.choices.len());
        for &choice in &group.choices {
            for combination in &combinations {
                let mut row = Vec::with_capacity(combination.len() + 1);
                row.extend_from_slice(combination);
                row.push(choice);
                expanded.push(row);
            }
        }
        combinations = expanded;
    }
    combinations
}

/// Resolves the programmes of a filtered ADM into mix presentation
/// instances and the object to audio-element assignment.
///
/// When the ADM declares no programmes at all, a single mix containing the
/// first object is emitted, with one audio element for it.
pub fn resolve_programmes(adm: &Adm) -> ProgrammeResolution {
    let mut resolution = ProgrammeResolution::default();

    for programme_index in 0..adm.programmes.len() {
        let groups = collect_groups(adm, programme_index);
        if groups.is_empty() {
            continue;
        }
        if groups.len() > MAX_AUDIO_ELEMENTS_PER_MIX {
            log::warn!(
                "Skipping audioProgramme `{}`: {} audio object groups exceed the \
                 {MAX_AUDIO_ELEMENTS_PER_MIX} audio elements allowed per mix",
                adm.programmes[programme_index].id,
                groups.len()
            );
            continue;
        }

        for combination in expand_groups(&groups) {
            let members = combination
                .into_iter()
                .map(|object_index| {
                    let audio_element_id = match resolution.element_id(object_index) {
                        Some(id) => id,
                        None => {
                            resolution.element_objects.push(object_index);
                            (resolution.element_objects.len() - 1) as u32
                        }
                    };
                    MixMember {
                        object_index,
                        audio_element_id,
                    }
                })
                .collect();
            resolution.mixes.push(ResolvedMix {
                mix_presentation_id: resolution.mixes.len() as u32,
                members,
                programme_index: Some(programme_index),
            });
        }
    }

    if adm.programmes.is_empty() && !adm.objects.is_empty() {
        resolution.element_objects.push(0);
        resolution.mixes.push(ResolvedMix {
            mix_presentation_id: 0,
            members: vec![MixMember {
                object_index: 0,
                audio_element_id: 0,
            }],
            programme_index: None,
        });
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use admix_adm::{AudioContent, AudioObject, AudioProgramme};

    fn programme(id: &str, content_refs: &[&str]) -> AudioProgramme {
        AudioProgramme {
            id: id.into(),
            content_refs: content_refs.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn content(id: &str, object_refs: &[&str]) -> AudioContent {
        AudioContent {
            id: id.into(),
            object_refs: object_refs.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn object(id: &str) -> AudioObject {
        AudioObject {
            id: id.into(),
            ..Default::default()
        }
    }

    fn object_with_complementary(id: &str, complementary: &[&str]) -> AudioObject {
        AudioObject {
            id: id.into(),
            complementary_object_refs: complementary.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_programme_single_object() {
        let adm = Adm {
            programmes: vec![programme("P1", &["C1"])],
            contents: vec![content("C1", &["O1"])],
            objects: vec![object("O1")],
        };

        let resolution = resolve_programmes(&adm);
        assert_eq!(resolution.element_objects, [0]);
        assert_eq!(resolution.mixes.len(), 1);
        assert_eq!(resolution.mixes[0].mix_presentation_id, 0);
        assert_eq!(resolution.mixes[0].members.len(), 1);
        assert_eq!(resolution.mixes[0].programme_index, Some(0));
    }

    #[test]
    fn test_complementary_group_expands_to_two_mixes() {
        // One programme, one content, object S (stereo) whose complementary
        // list contains object T. Two mixes result, each with one element.
        let adm = Adm {
            programmes: vec![programme("P1", &["C1"])],
            contents: vec![content("C1", &["S"])],
            objects: vec![object_with_complementary("S", &["T"]), object("T")],
        };

        let resolution = resolve_programmes(&adm);
        assert_eq!(resolution.mixes.len(), 2);
        assert_eq!(resolution.element_objects, [0, 1]);

        assert_eq!(resolution.mixes[0].members.len(), 1);
        assert_eq!(resolution.mixes[0].members[0].object_index, 0);
        assert_eq!(resolution.mixes[0].members[0].audio_element_id, 0);

        assert_eq!(resolution.mixes[1].members.len(), 1);
        assert_eq!(resolution.mixes[1].members[0].object_index, 1);
        assert_eq!(resolution.mixes[1].members[0].audio_element_id, 1);
    }

    #[test]
    fn test_two_groups_with_complementary_product() {
        // Bed plus a choice of two dialogue objects: two mixes of two
        // elements each, sharing the bed's element id.
        let adm = Adm {
            programmes: vec![programme("P1", &["C1"])],
            contents: vec![content("C1", &["bed", "dialog_en"])],
            objects: vec![
                object("bed"),
                object_with_complementary("dialog_en", &["dialog_fr"]),
                object("dialog_fr"),
            ],
        };

        let resolution = resolve_programmes(&adm);
        assert_eq!(resolution.mixes.len(), 2);
        assert_eq!(resolution.element_objects, [0, 1, 2]);

        let first: Vec<usize> = resolution.mixes[0]
            .members
            .iter()
            .map(|m| m.object_index)
            .collect();
        let second: Vec<usize> = resolution.mixes[1]
            .members
            .iter()
            .map(|m| m.object_index)
            .collect();
        assert_eq!(first, [0, 1]);
        assert_eq!(second, [0, 2]);
    }

    #[test]
    fn test_complementary_objects_not_revisited_as_siblings() {
        // dialog_fr appears both as a complementary object and as a later
        // sibling in the same content; the sibling occurrence is consumed.
        let adm = Adm {
            programmes: vec![programme("P1", &["C1"])],
            contents: vec![content("C1", &["dialog_en", "dialog_fr"])],
            objects: vec![
                object_with_complementary("dialog_en", &["dialog_fr"]),
                object("dialog_fr"),
            ],
        };

        let resolution = resolve_programmes(&adm);
        assert_eq!(resolution.mixes.len(), 2);
        for mix in &resolution.mixes {
            assert_eq!(mix.members.len(), 1);
        }
    }

    #[test]
    fn test_programme_over_cap_is_skipped_without_leaking() {
        // The first programme expands to three groups and is skipped. The
        // second programme must still resolve cleanly.
        let adm = Adm {
            programmes: vec![programme("big", &["C1"]), programme("small", &["C2"])],
            contents: vec![
                content("C1", &["a", "b", "c"]),
                content("C2", &["a"]),
            ],
            objects: vec![object("a"), object("b"), object("c")],
        };

        let resolution = resolve_programmes(&adm);
        assert_eq!(resolution.mixes.len(), 1);
        assert_eq!(resolution.mixes[0].programme_index, Some(1));
        assert_eq!(resolution.element_objects, [0]);
    }

    #[test]
    fn test_no_programmes_uses_first_object_only() {
        let adm = Adm {
            objects: vec![object("first"), object("second")],
            ..Default::default()
        };

        let resolution = resolve_programmes(&adm);
        assert_eq!(resolution.element_objects, [0]);
        assert_eq!(resolution.mixes.len(), 1);
        assert_eq!(resolution.mixes[0].programme_index, None);
        assert_eq!(resolution.mixes[0].members[0].object_index, 0);
    }

    #[test]
    fn test_no_programmes_no_objects() {
        let resolution = resolve_programmes(&Adm::default());
        assert!(resolution.mixes.is_empty());
        assert!(resolution.element_objects.is_empty());
    }

    #[test]
    fn test_object_shared_across_programmes_reuses_element_id() {
        let adm = Adm {
            programmes: vec![programme("P1", &["C1"]), programme("P2", &["C2"])],
            contents: vec![content("C1", &["shared"]), content("C2", &["shared"])],
            objects: vec![object("shared")],
        };

        let resolution = resolve_programmes(&adm);
        assert_eq!(resolution.mixes.len(), 2);
        assert_eq!(resolution.element_objects, [0]);
        assert_eq!(resolution.mixes[1].members[0].audio_element_id, 0);
    }

    #[test]
    fn test_dangling_refs_are_skipped() {
        let adm = Adm {
            programmes: vec![programme("P1", &["C1", "missing_content"])],
            contents: vec![content("C1", &["O1", "missing_object"])],
            objects: vec![object("O1")],
        };

        let resolution = resolve_programmes(&adm);
        assert_eq!(resolution.mixes.len(), 1);
        assert_eq!(resolution.mixes[0].members.len(), 1);
    }
}
