// Identifiers - Containment paths that locate arranger objects in the project
//
// An identifier never stores an address. It names the owning track, the lane
// or automation track inside it, and the index of the object there, so it
// stays valid while objects are destroyed and recreated by undo/redo.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable key of a track; survives track reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackKey(pub Uuid);

impl TrackKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.to_string();
        write!(f, "{}", &s[..8])
    }
}

/// Kind of content a region holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    Midi,
    Audio,
    Automation,
    Chord,
}

impl RegionKind {
    /// Regions living in track lanes (as opposed to automation/chord tracks)
    pub fn is_lane_region(&self) -> bool {
        matches!(self, RegionKind::Midi | RegionKind::Audio)
    }
}

/// Location of a region.
///
/// Field order matters: the derived ordering groups regions by container and
/// then by index, which is what structural replays sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionIdentifier {
    pub track: TrackKey,
    pub kind: RegionKind,
    /// Lane index for MIDI/audio regions
    pub lane_pos: usize,
    /// Automation track index for automation regions
    pub at_idx: usize,
    /// Index inside the owning lane/automation track/chord track
    pub idx: usize,
}

impl RegionIdentifier {
    pub fn lane(kind: RegionKind, track: TrackKey, lane_pos: usize, idx: usize) -> Self {
        Self {
            track,
            kind,
            lane_pos,
            at_idx: 0,
            idx,
        }
    }

    pub fn automation(track: TrackKey, at_idx: usize, idx: usize) -> Self {
        Self {
            track,
            kind: RegionKind::Automation,
            lane_pos: 0,
            at_idx,
            idx,
        }
    }

    pub fn chord(track: TrackKey, idx: usize) -> Self {
        Self {
            track,
            kind: RegionKind::Chord,
            lane_pos: 0,
            at_idx: 0,
            idx,
        }
    }

    pub fn container(&self) -> ContainerKey {
        match self.kind {
            RegionKind::Midi | RegionKind::Audio => ContainerKey::Lane {
                track: self.track,
                lane_pos: self.lane_pos,
            },
            RegionKind::Automation => ContainerKey::AutomationTrack {
                track: self.track,
                at_idx: self.at_idx,
            },
            RegionKind::Chord => ContainerKey::ChordTrack { track: self.track },
        }
    }

    /// Same region location ignoring the index
    pub fn same_container(&self, other: &RegionIdentifier) -> bool {
        self.container() == other.container()
    }
}

impl fmt::Display for RegionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} region {} (track {}, lane {}, at {})",
            self.kind, self.idx, self.track, self.lane_pos, self.at_idx
        )
    }
}

/// Location of an object owned by a region (MIDI note, automation point, chord)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChildIdentifier {
    pub region: RegionIdentifier,
    pub index: usize,
}

impl ChildIdentifier {
    pub fn new(region: RegionIdentifier, index: usize) -> Self {
        Self { region, index }
    }
}

/// Identifier of any arranger object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectId {
    Region(RegionIdentifier),
    MidiNote(ChildIdentifier),
    AutomationPoint(ChildIdentifier),
    ChordObject(ChildIdentifier),
    ScaleObject { index: usize },
    Marker { index: usize },
}

impl ObjectId {
    /// Container the object lives in
    pub fn container(&self) -> ContainerKey {
        match self {
            ObjectId::Region(r) => r.container(),
            ObjectId::MidiNote(c) | ObjectId::AutomationPoint(c) | ObjectId::ChordObject(c) => {
                ContainerKey::Region(c.region)
            }
            ObjectId::ScaleObject { .. } => ContainerKey::Scales,
            ObjectId::Marker { .. } => ContainerKey::Markers,
        }
    }

    /// Index inside the container
    pub fn index(&self) -> usize {
        match self {
            ObjectId::Region(r) => r.idx,
            ObjectId::MidiNote(c) | ObjectId::AutomationPoint(c) | ObjectId::ChordObject(c) => {
                c.index
            }
            ObjectId::ScaleObject { index } | ObjectId::Marker { index } => *index,
        }
    }

    /// Copy of this identifier pointing at another index in the same container
    pub fn with_index(&self, index: usize) -> ObjectId {
        let mut id = *self;
        match &mut id {
            ObjectId::Region(r) => r.idx = index,
            ObjectId::MidiNote(c) | ObjectId::AutomationPoint(c) | ObjectId::ChordObject(c) => {
                c.index = index
            }
            ObjectId::ScaleObject { index: i } | ObjectId::Marker { index: i } => *i = index,
        }
        id
    }

    /// Region that owns this object, for region children
    pub fn owner_region(&self) -> Option<RegionIdentifier> {
        match self {
            ObjectId::MidiNote(c) | ObjectId::AutomationPoint(c) | ObjectId::ChordObject(c) => {
                Some(c.region)
            }
            _ => None,
        }
    }

    pub fn as_region(&self) -> Option<&RegionIdentifier> {
        match self {
            ObjectId::Region(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_region(&self) -> bool {
        matches!(self, ObjectId::Region(_))
    }

    pub fn is_automation_point(&self) -> bool {
        matches!(self, ObjectId::AutomationPoint(_))
    }

    /// Rewrites the owning region of a child identifier
    pub(crate) fn set_owner_region(&mut self, region: RegionIdentifier) {
        if let ObjectId::MidiNote(c) | ObjectId::AutomationPoint(c) | ObjectId::ChordObject(c) =
            self
        {
            c.region = region;
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectId::Region(r) => write!(f, "{}", r),
            ObjectId::MidiNote(c) => write!(f, "note {} in {}", c.index, c.region),
            ObjectId::AutomationPoint(c) => write!(f, "point {} in {}", c.index, c.region),
            ObjectId::ChordObject(c) => write!(f, "chord {} in {}", c.index, c.region),
            ObjectId::ScaleObject { index } => write!(f, "scale {}", index),
            ObjectId::Marker { index } => write!(f, "marker {}", index),
        }
    }
}

/// Key of a list of sibling objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContainerKey {
    Lane { track: TrackKey, lane_pos: usize },
    AutomationTrack { track: TrackKey, at_idx: usize },
    ChordTrack { track: TrackKey },
    Region(RegionIdentifier),
    Scales,
    Markers,
}

/// Adjusts identifiers after an object was removed from a container:
/// every sibling behind it moves one slot down.
pub fn shift_after_removal(id: &mut ObjectId, removed: &ObjectId) {
    if id.container() == removed.container() && id.index() > removed.index() {
        *id = id.with_index(id.index() - 1);
    } else if let Some(owner) = id.owner_region() {
        let owner_id = ObjectId::Region(owner);
        if owner_id.container() == removed.container() && owner.idx > removed.index() {
            id.set_owner_region(RegionIdentifier {
                idx: owner.idx - 1,
                ..owner
            });
        }
    }
}

/// Adjusts identifiers after an object was inserted into a container:
/// every sibling at or behind the insertion slot moves one slot up.
pub fn shift_after_insert(id: &mut ObjectId, inserted: &ObjectId) {
    if id.container() == inserted.container() && id.index() >= inserted.index() {
        *id = id.with_index(id.index() + 1);
    } else if let Some(owner) = id.owner_region() {
        let owner_id = ObjectId::Region(owner);
        if owner_id.container() == inserted.container() && owner.idx >= inserted.index() {
            id.set_owner_region(RegionIdentifier {
                idx: owner.idx + 1,
                ..owner
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_groups_by_container() {
        let track = TrackKey::new();
        let a = ObjectId::Region(RegionIdentifier::lane(RegionKind::Midi, track, 0, 3));
        let b = ObjectId::Region(RegionIdentifier::lane(RegionKind::Midi, track, 0, 1));
        let c = ObjectId::Region(RegionIdentifier::lane(RegionKind::Midi, track, 1, 0));

        let mut ids = vec![c, a, b];
        ids.sort();
        assert_eq!(ids, vec![b, a, c]);
    }

    #[test]
    fn test_child_container_is_owner_region() {
        let region = RegionIdentifier::automation(TrackKey::new(), 2, 0);
        let id = ObjectId::AutomationPoint(ChildIdentifier::new(region, 5));
        assert_eq!(id.container(), ContainerKey::Region(region));
        assert_eq!(id.index(), 5);
        assert_eq!(id.with_index(1).index(), 1);
        assert_eq!(id.owner_region(), Some(region));
    }

    #[test]
    fn test_shift_siblings() {
        let track = TrackKey::new();
        let removed = ObjectId::Region(RegionIdentifier::lane(RegionKind::Midi, track, 0, 1));
        let mut later = ObjectId::Region(RegionIdentifier::lane(RegionKind::Midi, track, 0, 4));
        let mut other_lane =
            ObjectId::Region(RegionIdentifier::lane(RegionKind::Midi, track, 1, 4));

        shift_after_removal(&mut later, &removed);
        shift_after_removal(&mut other_lane, &removed);
        assert_eq!(later.index(), 3);
        assert_eq!(other_lane.index(), 4);

        shift_after_insert(&mut later, &removed);
        assert_eq!(later.index(), 4);
    }

    #[test]
    fn test_shift_children_of_shifted_region() {
        let track = TrackKey::new();
        let removed = ObjectId::Region(RegionIdentifier::lane(RegionKind::Midi, track, 0, 0));
        let owner = RegionIdentifier::lane(RegionKind::Midi, track, 0, 2);
        let mut note = ObjectId::MidiNote(ChildIdentifier::new(owner, 7));

        shift_after_removal(&mut note, &removed);
        assert_eq!(note.owner_region().map(|r| r.idx), Some(1));
        assert_eq!(note.index(), 7);
    }

    #[test]
    fn test_identifier_serializes() {
        let id = ObjectId::Marker { index: 2 };
        let json = serde_json::to_string(&id).unwrap();
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
