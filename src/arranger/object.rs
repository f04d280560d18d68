// Arranger objects - Everything the user can select and edit in an arranger
//
// ArrangerObject is a closed sum type. Owned values live in snapshots and in
// the project; ObjectMut is the borrowed view handed out by the project when
// an identifier is resolved, and carries every in-place edit.

use crate::arranger::identifier::{ChildIdentifier, ObjectId};
use crate::arranger::region::Region;
use crate::sequencer::timeline::Position;
use serde::{Deserialize, Serialize};

/// Fields shared by every object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectBase {
    /// Start position (timeline for regions/markers/scales, region-local for children)
    pub pos: Position,
    pub selected: bool,
    /// Free-standing clone that is not part of the project graph
    pub non_project: bool,
}

impl ObjectBase {
    pub fn at(pos: Position) -> Self {
        Self {
            pos,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurveAlgorithm {
    Exponent,
    #[default]
    SuperEllipse,
    Vital,
    Pulse,
    Logarithmic,
}

/// Shape of a fade or of the segment after an automation point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveOptions {
    pub algorithm: CurveAlgorithm,
    /// -1.0..=1.0, 0.0 is linear
    pub curviness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiNote {
    pub id: ChildIdentifier,
    pub base: ObjectBase,
    pub end_pos: Position,
    pub pitch: u8,
    pub velocity: u8,
    pub muted: bool,
}

impl MidiNote {
    pub const MAX_PITCH: u8 = 127;

    pub fn new(id: ChildIdentifier, start: Position, end: Position, pitch: u8, velocity: u8) -> Self {
        Self {
            id,
            base: ObjectBase::at(start),
            end_pos: end,
            pitch: pitch.min(Self::MAX_PITCH),
            velocity: velocity.min(127),
            muted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationPoint {
    pub id: ChildIdentifier,
    pub base: ObjectBase,
    /// Value normalized to the port range, 0.0..=1.0
    pub normalized_val: f32,
    pub curve: CurveOptions,
}

impl AutomationPoint {
    pub fn new(id: ChildIdentifier, pos: Position, normalized_val: f32) -> Self {
        let normalized_val = normalized_val.clamp(0.0, 1.0);
        Self {
            id,
            base: ObjectBase::at(pos),
            normalized_val,
            curve: CurveOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordObject {
    pub id: ChildIdentifier,
    pub base: ObjectBase,
    /// Index into the chord editor's chord list
    pub chord_index: usize,
    pub muted: bool,
}

impl ChordObject {
    pub fn new(id: ChildIdentifier, pos: Position, chord_index: usize) -> Self {
        Self {
            id,
            base: ObjectBase::at(pos),
            chord_index,
            muted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScaleKind {
    #[default]
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MusicalScale {
    /// 0 = C .. 11 = B
    pub root: u8,
    pub kind: ScaleKind,
}

/// Scale change on the chord track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleObject {
    pub index: usize,
    pub base: ObjectBase,
    pub scale: MusicalScale,
}

impl ScaleObject {
    pub fn new(pos: Position, scale: MusicalScale) -> Self {
        Self {
            index: 0,
            base: ObjectBase::at(pos),
            scale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Song start; cannot be deleted
    Start,
    /// Song end; cannot be deleted
    End,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub index: usize,
    pub base: ObjectBase,
    pub name: String,
    pub kind: MarkerKind,
}

impl Marker {
    pub fn new(name: impl Into<String>, pos: Position, kind: MarkerKind) -> Self {
        Self {
            index: 0,
            base: ObjectBase::at(pos),
            name: name.into(),
            kind,
        }
    }
}

/// Which edge of an object is dragged and how the content follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeType {
    /// Move the start; content stays in place on the timeline
    L,
    /// Move the end; loop end follows
    R,
    /// Move the start; content scrolls inside the loop
    LLoop,
    /// Move the end; loop points stay and content repeats
    RLoop,
    /// Move the fade-in point
    LFade,
    /// Move the fade-out point
    RFade,
    /// Move the start and scale the content
    LStretch,
    /// Move the end and scale the content
    RStretch,
}

impl ResizeType {
    pub fn is_left(&self) -> bool {
        matches!(
            self,
            ResizeType::L | ResizeType::LLoop | ResizeType::LFade | ResizeType::LStretch
        )
    }

    pub fn is_loop(&self) -> bool {
        matches!(self, ResizeType::LLoop | ResizeType::RLoop)
    }

    pub fn is_fade(&self) -> bool {
        matches!(self, ResizeType::LFade | ResizeType::RFade)
    }

    pub fn is_stretch(&self) -> bool {
        matches!(self, ResizeType::LStretch | ResizeType::RStretch)
    }
}

/// Field sets copied by an edit action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditType {
    Name,
    Position,
    Fades,
    /// Values such as pitch, velocity, automation value, chord, color, gain
    Primitive,
    EditorFunction,
    Scale,
    Mute,
}

/// Boolean properties queried over a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectProperty {
    HasLength,
    HasLooped,
    CanLoop,
    CanFade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrangerObject {
    Region(Region),
    MidiNote(MidiNote),
    AutomationPoint(AutomationPoint),
    ChordObject(ChordObject),
    ScaleObject(ScaleObject),
    Marker(Marker),
}

impl ArrangerObject {
    pub fn id(&self) -> ObjectId {
        match self {
            ArrangerObject::Region(r) => ObjectId::Region(r.id),
            ArrangerObject::MidiNote(n) => ObjectId::MidiNote(n.id),
            ArrangerObject::AutomationPoint(ap) => ObjectId::AutomationPoint(ap.id),
            ArrangerObject::ChordObject(c) => ObjectId::ChordObject(c.id),
            ArrangerObject::ScaleObject(s) => ObjectId::ScaleObject { index: s.index },
            ArrangerObject::Marker(m) => ObjectId::Marker { index: m.index },
        }
    }

    pub fn base(&self) -> &ObjectBase {
        match self {
            ArrangerObject::Region(r) => &r.base,
            ArrangerObject::MidiNote(n) => &n.base,
            ArrangerObject::AutomationPoint(ap) => &ap.base,
            ArrangerObject::ChordObject(c) => &c.base,
            ArrangerObject::ScaleObject(s) => &s.base,
            ArrangerObject::Marker(m) => &m.base,
        }
    }

    pub fn pos(&self) -> Position {
        self.base().pos
    }

    pub fn end_pos(&self) -> Option<Position> {
        match self {
            ArrangerObject::Region(r) => Some(r.end_pos),
            ArrangerObject::MidiNote(n) => Some(n.end_pos),
            _ => None,
        }
    }

    pub fn length_ticks(&self) -> Option<f64> {
        self.end_pos().map(|end| end.ticks - self.pos().ticks)
    }

    pub fn is_selected(&self) -> bool {
        self.base().selected
    }

    pub fn is_non_project(&self) -> bool {
        self.base().non_project
    }

    pub fn has_length(&self) -> bool {
        self.end_pos().is_some()
    }

    pub fn can_loop(&self) -> bool {
        matches!(self, ArrangerObject::Region(_))
    }

    pub fn can_fade(&self) -> bool {
        matches!(self, ArrangerObject::Region(_))
    }

    pub fn is_looped(&self) -> bool {
        match self {
            ArrangerObject::Region(r) => r.is_looped(),
            _ => false,
        }
    }

    pub fn has_property(&self, property: ObjectProperty) -> bool {
        match property {
            ObjectProperty::HasLength => self.has_length(),
            ObjectProperty::HasLooped => self.is_looped(),
            ObjectProperty::CanLoop => self.can_loop(),
            ObjectProperty::CanFade => self.can_fade(),
        }
    }

    /// Start and end markers must always exist
    pub fn is_deletable(&self) -> bool {
        !matches!(
            self,
            ArrangerObject::Marker(Marker {
                kind: MarkerKind::Start | MarkerKind::End,
                ..
            })
        )
    }

    pub fn is_clonable(&self) -> bool {
        self.is_deletable()
    }

    pub fn is_renamable(&self) -> bool {
        self.is_deletable() && self.name().is_some()
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ArrangerObject::Region(r) => Some(&r.name),
            ArrangerObject::Marker(m) => Some(&m.name),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ArrangerObject::Region(_) => "region",
            ArrangerObject::MidiNote(_) => "MIDI note",
            ArrangerObject::AutomationPoint(_) => "automation point",
            ArrangerObject::ChordObject(_) => "chord object",
            ArrangerObject::ScaleObject(_) => "scale object",
            ArrangerObject::Marker(_) => "marker",
        }
    }

    pub fn as_region(&self) -> Option<&Region> {
        match self {
            ArrangerObject::Region(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_region_mut(&mut self) -> Option<&mut Region> {
        match self {
            ArrangerObject::Region(r) => Some(r),
            _ => None,
        }
    }

    /// Clone suitable for storing in a snapshot
    pub fn snapshot(&self) -> ArrangerObject {
        let mut clone = self.clone();
        clone.as_mut().base_mut().non_project = true;
        clone
    }

    /// Object start position equal to `other`'s within tolerance, end included
    pub fn same_bounds(&self, other: &ArrangerObject) -> bool {
        let ends_match = match (self.end_pos(), other.end_pos()) {
            (Some(a), Some(b)) => a.approx_eq(&b),
            (None, None) => true,
            _ => false,
        };
        self.pos().approx_eq(&other.pos()) && ends_match
    }

    /// Whether `pos` lies strictly inside the object
    pub fn can_split_at(&self, pos: Position) -> bool {
        match self.end_pos() {
            Some(end) => pos.ticks > self.pos().ticks && pos.ticks < end.ticks,
            None => false,
        }
    }

    /// Splits the object at `pos` (same coordinate space as the object's own
    /// position). The first fragment keeps the identifier; the second one
    /// points at the next slot.
    pub fn split(&self, pos: Position) -> Option<(ArrangerObject, ArrangerObject)> {
        if !self.can_split_at(pos) {
            return None;
        }
        match self {
            ArrangerObject::Region(r) => {
                let (r1, r2) = r.split(pos);
                Some((ArrangerObject::Region(r1), ArrangerObject::Region(r2)))
            }
            ArrangerObject::MidiNote(n) => {
                let mut n1 = n.clone();
                let mut n2 = n.clone();
                n1.end_pos = pos;
                n2.base.pos = pos;
                n2.id.index += 1;
                Some((ArrangerObject::MidiNote(n1), ArrangerObject::MidiNote(n2)))
            }
            _ => None,
        }
    }

    pub fn as_mut(&mut self) -> ObjectMut<'_> {
        match self {
            ArrangerObject::Region(r) => ObjectMut::Region(r),
            ArrangerObject::MidiNote(n) => ObjectMut::MidiNote(n),
            ArrangerObject::AutomationPoint(ap) => ObjectMut::AutomationPoint(ap),
            ArrangerObject::ChordObject(c) => ObjectMut::ChordObject(c),
            ArrangerObject::ScaleObject(s) => ObjectMut::ScaleObject(s),
            ArrangerObject::Marker(m) => ObjectMut::Marker(m),
        }
    }
}

/// Mutable view of an object, either live in the project or in a snapshot
#[derive(Debug)]
pub enum ObjectMut<'a> {
    Region(&'a mut Region),
    MidiNote(&'a mut MidiNote),
    AutomationPoint(&'a mut AutomationPoint),
    ChordObject(&'a mut ChordObject),
    ScaleObject(&'a mut ScaleObject),
    Marker(&'a mut Marker),
}

impl ObjectMut<'_> {
    pub fn id(&self) -> ObjectId {
        match self {
            ObjectMut::Region(r) => ObjectId::Region(r.id),
            ObjectMut::MidiNote(n) => ObjectId::MidiNote(n.id),
            ObjectMut::AutomationPoint(ap) => ObjectId::AutomationPoint(ap.id),
            ObjectMut::ChordObject(c) => ObjectId::ChordObject(c.id),
            ObjectMut::ScaleObject(s) => ObjectId::ScaleObject { index: s.index },
            ObjectMut::Marker(m) => ObjectId::Marker { index: m.index },
        }
    }

    pub fn base_mut(&mut self) -> &mut ObjectBase {
        match self {
            ObjectMut::Region(r) => &mut r.base,
            ObjectMut::MidiNote(n) => &mut n.base,
            ObjectMut::AutomationPoint(ap) => &mut ap.base,
            ObjectMut::ChordObject(c) => &mut c.base,
            ObjectMut::ScaleObject(s) => &mut s.base,
            ObjectMut::Marker(m) => &mut m.base,
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.base_mut().selected = selected;
    }

    /// Points the object at a new location. Regions also re-point their
    /// children. Returns false if the identifier is for another object type.
    pub fn set_id(&mut self, id: ObjectId) -> bool {
        match (self, id) {
            (ObjectMut::Region(r), ObjectId::Region(rid)) => r.set_id(rid),
            (ObjectMut::MidiNote(n), ObjectId::MidiNote(c)) => n.id = c,
            (ObjectMut::AutomationPoint(ap), ObjectId::AutomationPoint(c)) => ap.id = c,
            (ObjectMut::ChordObject(co), ObjectId::ChordObject(c)) => co.id = c,
            (ObjectMut::ScaleObject(s), ObjectId::ScaleObject { index }) => s.index = index,
            (ObjectMut::Marker(m), ObjectId::Marker { index }) => m.index = index,
            _ => return false,
        }
        true
    }

    pub fn move_by_ticks(&mut self, ticks: f64) {
        self.base_mut().pos.add_ticks(ticks);
        match self {
            ObjectMut::Region(r) => r.end_pos.add_ticks(ticks),
            ObjectMut::MidiNote(n) => n.end_pos.add_ticks(ticks),
            _ => {}
        }
    }

    /// Returns false if the object has no pitch
    pub fn shift_pitch(&mut self, delta: i32) -> bool {
        match self {
            ObjectMut::MidiNote(n) => {
                n.pitch = (n.pitch as i32 + delta).clamp(0, MidiNote::MAX_PITCH as i32) as u8;
                true
            }
            _ => false,
        }
    }

    pub fn shift_chord(&mut self, delta: i32) -> bool {
        match self {
            ObjectMut::ChordObject(c) => {
                c.chord_index = (c.chord_index as i64 + delta as i64).max(0) as usize;
                true
            }
            _ => false,
        }
    }

    pub fn shift_normalized(&mut self, delta: f32) -> bool {
        match self {
            ObjectMut::AutomationPoint(ap) => {
                ap.normalized_val += delta;
                true
            }
            _ => false,
        }
    }

    /// Copies every field a move changes: start, end, pitch, chord and
    /// automation value. Identifiers are left alone.
    pub fn copy_move_state(&mut self, src: &ArrangerObject) {
        self.base_mut().pos = src.pos();
        match (self, src) {
            (ObjectMut::Region(dst), ArrangerObject::Region(src)) => dst.end_pos = src.end_pos,
            (ObjectMut::MidiNote(dst), ArrangerObject::MidiNote(src)) => {
                dst.end_pos = src.end_pos;
                dst.pitch = src.pitch;
            }
            (ObjectMut::AutomationPoint(dst), ArrangerObject::AutomationPoint(src)) => {
                dst.normalized_val = src.normalized_val;
            }
            (ObjectMut::ChordObject(dst), ArrangerObject::ChordObject(src)) => {
                dst.chord_index = src.chord_index;
            }
            _ => {}
        }
    }

    /// Applies a resize of `ticks` on the edge given by `resize_type`
    pub fn resize(&mut self, resize_type: ResizeType, ticks: f64) {
        match self {
            ObjectMut::Region(r) => r.resize(resize_type, ticks),
            ObjectMut::MidiNote(n) => {
                if resize_type.is_left() {
                    n.base.pos.add_ticks(ticks);
                } else {
                    n.end_pos.add_ticks(ticks);
                }
            }
            _ => {}
        }
    }

    /// Copies the field set named by `edit` from `src`
    pub fn apply_edit(&mut self, src: &ArrangerObject, edit: EditType) {
        match edit {
            EditType::Name => self.copy_name(src),
            EditType::Position => self.copy_positions(src),
            EditType::Fades => {
                if let (ObjectMut::Region(dst), ArrangerObject::Region(src)) = (self, src) {
                    dst.fade_in_pos = src.fade_in_pos;
                    dst.fade_out_pos = src.fade_out_pos;
                    dst.fade_in_opts = src.fade_in_opts;
                    dst.fade_out_opts = src.fade_out_opts;
                }
            }
            EditType::Primitive => self.copy_primitive(src),
            EditType::EditorFunction => {
                self.copy_positions(src);
                self.copy_primitive(src);
                if let (ObjectMut::Region(dst), ArrangerObject::Region(src)) = (self, src) {
                    dst.content = src.content.clone();
                    dst.reindex_children();
                }
            }
            EditType::Scale => {
                if let (ObjectMut::ScaleObject(dst), ArrangerObject::ScaleObject(src)) = (self, src)
                {
                    dst.scale = src.scale;
                }
            }
            EditType::Mute => match (self, src) {
                (ObjectMut::Region(dst), ArrangerObject::Region(src)) => dst.muted = src.muted,
                (ObjectMut::MidiNote(dst), ArrangerObject::MidiNote(src)) => dst.muted = src.muted,
                (ObjectMut::ChordObject(dst), ArrangerObject::ChordObject(src)) => {
                    dst.muted = src.muted
                }
                _ => {}
            },
        }
    }

    fn copy_name(&mut self, src: &ArrangerObject) {
        match (self, src) {
            (ObjectMut::Region(dst), ArrangerObject::Region(src)) => dst.name = src.name.clone(),
            (ObjectMut::Marker(dst), ArrangerObject::Marker(src)) => dst.name = src.name.clone(),
            _ => {}
        }
    }

    fn copy_positions(&mut self, src: &ArrangerObject) {
        self.base_mut().pos = src.pos();
        match (self, src) {
            (ObjectMut::Region(dst), ArrangerObject::Region(src)) => {
                dst.end_pos = src.end_pos;
                dst.clip_start_pos = src.clip_start_pos;
                dst.loop_start_pos = src.loop_start_pos;
                dst.loop_end_pos = src.loop_end_pos;
                dst.fade_in_pos = src.fade_in_pos;
                dst.fade_out_pos = src.fade_out_pos;
            }
            (ObjectMut::MidiNote(dst), ArrangerObject::MidiNote(src)) => {
                dst.end_pos = src.end_pos;
            }
            _ => {}
        }
    }

    fn copy_primitive(&mut self, src: &ArrangerObject) {
        match (self, src) {
            (ObjectMut::Region(dst), ArrangerObject::Region(src)) => {
                dst.color = src.color;
                dst.gain = src.gain;
                dst.muted = src.muted;
            }
            (ObjectMut::MidiNote(dst), ArrangerObject::MidiNote(src)) => {
                dst.pitch = src.pitch;
                dst.velocity = src.velocity;
                dst.muted = src.muted;
            }
            (ObjectMut::AutomationPoint(dst), ArrangerObject::AutomationPoint(src)) => {
                dst.normalized_val = src.normalized_val;
                dst.curve = src.curve;
            }
            (ObjectMut::ChordObject(dst), ArrangerObject::ChordObject(src)) => {
                dst.chord_index = src.chord_index;
                dst.muted = src.muted;
            }
            (ObjectMut::Marker(dst), ArrangerObject::Marker(src)) => dst.kind = src.kind,
            _ => {}
        }
    }

    /// Owned copy of the current state
    pub fn to_object(&self) -> ArrangerObject {
        match self {
            ObjectMut::Region(r) => ArrangerObject::Region((**r).clone()),
            ObjectMut::MidiNote(n) => ArrangerObject::MidiNote((**n).clone()),
            ObjectMut::AutomationPoint(ap) => ArrangerObject::AutomationPoint((**ap).clone()),
            ObjectMut::ChordObject(c) => ArrangerObject::ChordObject((**c).clone()),
            ObjectMut::ScaleObject(s) => ArrangerObject::ScaleObject((**s).clone()),
            ObjectMut::Marker(m) => ArrangerObject::Marker((**m).clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arranger::identifier::{RegionIdentifier, RegionKind, TrackKey};

    fn note(pitch: u8) -> ArrangerObject {
        let region = RegionIdentifier::lane(RegionKind::Midi, TrackKey::new(), 0, 0);
        ArrangerObject::MidiNote(MidiNote::new(
            ChildIdentifier::new(region, 0),
            Position::from_ticks(0.0),
            Position::from_ticks(480.0),
            pitch,
            100,
        ))
    }

    #[test]
    fn test_move_by_ticks_moves_both_edges() {
        let mut obj = note(60);
        obj.as_mut().move_by_ticks(1920.0);
        assert_eq!(obj.pos().ticks, 1920.0);
        assert_eq!(obj.end_pos().map(|p| p.ticks), Some(2400.0));
        obj.as_mut().move_by_ticks(-1920.0);
        assert_eq!(obj.pos().ticks, 0.0);
    }

    #[test]
    fn test_shift_pitch_only_applies_to_notes() {
        let mut obj = note(60);
        assert!(obj.as_mut().shift_pitch(12));
        assert!(matches!(&obj, ArrangerObject::MidiNote(n) if n.pitch == 72));

        let mut marker = ArrangerObject::Marker(Marker::new("verse", Position::zero(), MarkerKind::Custom));
        assert!(!marker.as_mut().shift_pitch(12));
    }

    #[test]
    fn test_start_end_markers_are_protected() {
        let start = ArrangerObject::Marker(Marker::new("start", Position::zero(), MarkerKind::Start));
        let custom = ArrangerObject::Marker(Marker::new("verse", Position::zero(), MarkerKind::Custom));

        assert!(!start.is_deletable());
        assert!(!start.is_clonable());
        assert!(!start.is_renamable());
        assert!(custom.is_renamable());
        assert!(!note(60).is_renamable());
    }

    #[test]
    fn test_snapshot_is_non_project() {
        let obj = note(60);
        assert!(!obj.is_non_project());
        assert!(obj.snapshot().is_non_project());
    }

    #[test]
    fn test_split_note() {
        let obj = note(60);
        assert!(!obj.can_split_at(Position::from_ticks(480.0)));
        let (a, b) = obj.split(Position::from_ticks(120.0)).unwrap();
        assert_eq!(a.end_pos().unwrap().ticks, 120.0);
        assert_eq!(b.pos().ticks, 120.0);
        assert_eq!(b.id().index(), 1);
    }

    #[test]
    fn test_apply_edit_copies_only_the_field_set() {
        let mut live = note(60);
        let mut edited = note(64);
        edited.as_mut().move_by_ticks(960.0);

        live.as_mut().apply_edit(&edited, EditType::Primitive);
        assert!(matches!(&live, ArrangerObject::MidiNote(n) if n.pitch == 64));
        assert_eq!(live.pos().ticks, 0.0);

        live.as_mut().apply_edit(&edited, EditType::Position);
        assert_eq!(live.pos().ticks, 960.0);
    }

    #[test]
    fn test_set_id_rejects_other_kinds() {
        let mut obj = note(60);
        assert!(!obj.as_mut().set_id(ObjectId::Marker { index: 0 }));
    }
}
