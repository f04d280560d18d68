// Region - Container object on the timeline
//
// Children (notes, automation points, chord objects) store positions local to
// the region start. Clip start and loop points are local as well; a region
// plays its content from the clip start and wraps from loop end back to loop
// start until the region ends.

use crate::arranger::identifier::{ChildIdentifier, RegionIdentifier, RegionKind};
use crate::arranger::object::{
    ArrangerObject, AutomationPoint, ChordObject, CurveOptions, MidiNote, ObjectBase, ResizeType,
};
use crate::audio::pool::ClipId;
use crate::sequencer::timeline::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id of a link group; regions in the same group share their content
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkGroupId(pub usize);

impl fmt::Display for LinkGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link group #{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegionContent {
    Midi(Vec<MidiNote>),
    Audio { clip: ClipId },
    Automation(Vec<AutomationPoint>),
    Chord(Vec<ChordObject>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionIdentifier,
    pub base: ObjectBase,
    pub end_pos: Position,
    pub name: String,
    pub clip_start_pos: Position,
    pub loop_start_pos: Position,
    pub loop_end_pos: Position,
    pub fade_in_pos: Position,
    pub fade_out_pos: Position,
    pub fade_in_opts: CurveOptions,
    pub fade_out_opts: CurveOptions,
    pub muted: bool,
    /// Packed 0xRRGGBB
    pub color: u32,
    pub gain: f32,
    pub link_group: Option<LinkGroupId>,
    pub content: RegionContent,
}

const DEFAULT_COLOR: u32 = 0x4a90d9;

impl Region {
    /// Creates an empty MIDI, automation or chord region.
    /// Audio regions need a clip, see [`Region::new_audio`].
    pub fn new(id: RegionIdentifier, start: Position, end: Position, name: impl Into<String>) -> Self {
        let content = match id.kind {
            RegionKind::Midi => RegionContent::Midi(Vec::new()),
            RegionKind::Automation => RegionContent::Automation(Vec::new()),
            RegionKind::Chord => RegionContent::Chord(Vec::new()),
            RegionKind::Audio => RegionContent::Audio { clip: ClipId(0) },
        };
        Self::with_content(id, start, end, name, content)
    }

    pub fn new_audio(
        id: RegionIdentifier,
        start: Position,
        end: Position,
        name: impl Into<String>,
        clip: ClipId,
    ) -> Self {
        let id = RegionIdentifier {
            kind: RegionKind::Audio,
            ..id
        };
        Self::with_content(id, start, end, name, RegionContent::Audio { clip })
    }

    fn with_content(
        id: RegionIdentifier,
        start: Position,
        end: Position,
        name: impl Into<String>,
        content: RegionContent,
    ) -> Self {
        let length = end.ticks - start.ticks;
        Self {
            id,
            base: ObjectBase::at(start),
            end_pos: end,
            name: name.into(),
            clip_start_pos: Position::zero(),
            loop_start_pos: Position::zero(),
            loop_end_pos: Position::from_ticks(length),
            fade_in_pos: Position::zero(),
            fade_out_pos: Position::from_ticks(length),
            fade_in_opts: CurveOptions::default(),
            fade_out_opts: CurveOptions::default(),
            muted: false,
            color: DEFAULT_COLOR,
            gain: 1.0,
            link_group: None,
            content,
        }
    }

    pub fn length_ticks(&self) -> f64 {
        self.end_pos.ticks - self.base.pos.ticks
    }

    /// Whether content repeats or starts somewhere else than at its beginning
    pub fn is_looped(&self) -> bool {
        self.loop_start_pos.ticks > Position::EPSILON
            || self.clip_start_pos.ticks > Position::EPSILON
            || self.loop_end_pos.ticks + Position::EPSILON < self.length_ticks()
    }

    pub fn clip(&self) -> Option<ClipId> {
        match self.content {
            RegionContent::Audio { clip } => Some(clip),
            _ => None,
        }
    }

    /// Moves the region to a new location and re-points its children
    pub fn set_id(&mut self, id: RegionIdentifier) {
        self.id = id;
        self.reindex_children();
    }

    /// Rewrites child identifiers from their position in the content list
    pub fn reindex_children(&mut self) {
        let region = self.id;
        match &mut self.content {
            RegionContent::Midi(notes) => {
                for (i, n) in notes.iter_mut().enumerate() {
                    n.id = ChildIdentifier::new(region, i);
                }
            }
            RegionContent::Automation(points) => {
                for (i, ap) in points.iter_mut().enumerate() {
                    ap.id = ChildIdentifier::new(region, i);
                }
            }
            RegionContent::Chord(chords) => {
                for (i, c) in chords.iter_mut().enumerate() {
                    c.id = ChildIdentifier::new(region, i);
                }
            }
            RegionContent::Audio { .. } => {}
        }
    }

    pub fn num_children(&self) -> usize {
        match &self.content {
            RegionContent::Midi(notes) => notes.len(),
            RegionContent::Automation(points) => points.len(),
            RegionContent::Chord(chords) => chords.len(),
            RegionContent::Audio { .. } => 0,
        }
    }

    /// Owned copies of the children, in index order
    pub fn children(&self) -> Vec<ArrangerObject> {
        match &self.content {
            RegionContent::Midi(notes) => notes.iter().cloned().map(ArrangerObject::MidiNote).collect(),
            RegionContent::Automation(points) => points
                .iter()
                .cloned()
                .map(ArrangerObject::AutomationPoint)
                .collect(),
            RegionContent::Chord(chords) => {
                chords.iter().cloned().map(ArrangerObject::ChordObject).collect()
            }
            RegionContent::Audio { .. } => Vec::new(),
        }
    }

    pub fn notes(&self) -> &[MidiNote] {
        match &self.content {
            RegionContent::Midi(notes) => notes,
            _ => &[],
        }
    }

    pub fn points(&self) -> &[AutomationPoint] {
        match &self.content {
            RegionContent::Automation(points) => points,
            _ => &[],
        }
    }

    pub fn chords(&self) -> &[ChordObject] {
        match &self.content {
            RegionContent::Chord(chords) => chords,
            _ => &[],
        }
    }

    /// Appends a child; returns false if it does not fit the region kind
    pub fn push_child(&mut self, child: ArrangerObject) -> bool {
        match (&mut self.content, child) {
            (RegionContent::Midi(notes), ArrangerObject::MidiNote(n)) => notes.push(n),
            (RegionContent::Automation(points), ArrangerObject::AutomationPoint(ap)) => {
                points.push(ap)
            }
            (RegionContent::Chord(chords), ArrangerObject::ChordObject(c)) => chords.push(c),
            _ => return false,
        }
        self.reindex_children();
        true
    }

    pub fn clear_children(&mut self) {
        match &mut self.content {
            RegionContent::Midi(notes) => notes.clear(),
            RegionContent::Automation(points) => points.clear(),
            RegionContent::Chord(chords) => chords.clear(),
            RegionContent::Audio { .. } => {}
        }
    }

    /// Copies interior content from another region, keeping own identity
    pub fn copy_content_from(&mut self, other: &Region) {
        if matches!(self.content, RegionContent::Audio { .. }) {
            return;
        }
        self.content = other.content.clone();
        self.reindex_children();
    }

    pub fn add_ticks_to_children(&mut self, ticks: f64) {
        match &mut self.content {
            RegionContent::Midi(notes) => {
                for n in notes {
                    n.base.pos.add_ticks(ticks);
                    n.end_pos.add_ticks(ticks);
                }
            }
            RegionContent::Automation(points) => {
                for ap in points {
                    ap.base.pos.add_ticks(ticks);
                }
            }
            RegionContent::Chord(chords) => {
                for c in chords {
                    c.base.pos.add_ticks(ticks);
                }
            }
            RegionContent::Audio { .. } => {}
        }
    }

    fn scale_children(&mut self, ratio: f64) {
        let scale = |p: &mut Position| p.ticks *= ratio;
        match &mut self.content {
            RegionContent::Midi(notes) => {
                for n in notes {
                    scale(&mut n.base.pos);
                    scale(&mut n.end_pos);
                }
            }
            RegionContent::Automation(points) => {
                for ap in points {
                    scale(&mut ap.base.pos);
                }
            }
            RegionContent::Chord(chords) => {
                for c in chords {
                    scale(&mut c.base.pos);
                }
            }
            RegionContent::Audio { .. } => {}
        }
        scale(&mut self.clip_start_pos);
        scale(&mut self.loop_start_pos);
        scale(&mut self.loop_end_pos);
        scale(&mut self.fade_in_pos);
        scale(&mut self.fade_out_pos);
    }

    /// Keeps `ticks` inside the loop range
    fn wrap_in_loop(&self, ticks: f64) -> f64 {
        let loop_len = self.loop_end_pos.ticks - self.loop_start_pos.ticks;
        if loop_len <= 0.0 {
            return ticks;
        }
        self.loop_start_pos.ticks + (ticks - self.loop_start_pos.ticks).rem_euclid(loop_len)
    }

    pub fn resize(&mut self, resize_type: ResizeType, ticks: f64) {
        let old_length = self.length_ticks();
        match resize_type {
            ResizeType::L => {
                self.base.pos.add_ticks(ticks);
                self.loop_end_pos.add_ticks(-ticks);
                self.fade_out_pos.add_ticks(-ticks);
                self.add_ticks_to_children(-ticks);
            }
            ResizeType::LLoop => {
                self.base.pos.add_ticks(ticks);
                self.clip_start_pos.ticks = self.wrap_in_loop(self.clip_start_pos.ticks + ticks);
                self.fade_out_pos.add_ticks(-ticks);
            }
            ResizeType::LFade => self.fade_in_pos.add_ticks(ticks),
            ResizeType::LStretch | ResizeType::RStretch => {
                if resize_type == ResizeType::LStretch {
                    self.base.pos.add_ticks(ticks);
                } else {
                    self.end_pos.add_ticks(ticks);
                }
                if old_length > 0.0 {
                    self.scale_children(self.length_ticks() / old_length);
                }
            }
            ResizeType::R => {
                self.end_pos.add_ticks(ticks);
                self.loop_end_pos.add_ticks(ticks);
                self.fade_out_pos.add_ticks(ticks);
            }
            ResizeType::RLoop => {
                self.end_pos.add_ticks(ticks);
                self.fade_out_pos.add_ticks(ticks);
            }
            ResizeType::RFade => self.fade_out_pos.add_ticks(ticks),
        }
    }

    /// Splits at a timeline position strictly inside the region.
    ///
    /// Unlooped MIDI/automation/chord content is cut between the fragments.
    /// Looped and audio content is shared: the second fragment starts playing
    /// from the matching offset via its clip start.
    pub fn split(&self, pos: Position) -> (Region, Region) {
        let offset = pos.ticks - self.base.pos.ticks;
        let looped = self.is_looped() || self.clip().is_some();

        let mut r1 = self.clone();
        r1.end_pos = pos;
        r1.fade_out_pos = Position::from_ticks(offset);
        r1.link_group = None;

        let mut r2 = self.clone();
        r2.base.pos = pos;
        r2.id.idx += 1;
        r2.fade_in_pos = Position::zero();
        r2.fade_out_pos = Position::from_ticks(r2.length_ticks());
        r2.link_group = None;

        if looped {
            r2.clip_start_pos.ticks = self.wrap_in_loop(self.clip_start_pos.ticks + offset);
        } else {
            r1.loop_end_pos = Position::from_ticks(offset);
            r1.truncate_children(offset);

            r2.add_ticks_to_children(-offset);
            r2.drop_children_before_start();
            r2.loop_end_pos = Position::from_ticks(r2.length_ticks());
        }
        r2.reindex_children();
        (r1, r2)
    }

    fn truncate_children(&mut self, length: f64) {
        match &mut self.content {
            RegionContent::Midi(notes) => {
                notes.retain(|n| n.base.pos.ticks < length);
                for n in notes.iter_mut() {
                    if n.end_pos.ticks > length {
                        n.end_pos.ticks = length;
                    }
                }
            }
            RegionContent::Automation(points) => points.retain(|ap| ap.base.pos.ticks < length),
            RegionContent::Chord(chords) => chords.retain(|c| c.base.pos.ticks < length),
            RegionContent::Audio { .. } => {}
        }
        self.reindex_children();
    }

    fn drop_children_before_start(&mut self) {
        match &mut self.content {
            RegionContent::Midi(notes) => notes.retain(|n| n.base.pos.ticks >= 0.0),
            RegionContent::Automation(points) => points.retain(|ap| ap.base.pos.ticks >= 0.0),
            RegionContent::Chord(chords) => chords.retain(|c| c.base.pos.ticks >= 0.0),
            RegionContent::Audio { .. } => {}
        }
    }

    /// Stable-sorts automation points by position and reindexes them.
    ///
    /// Returns the new index of every old index, or None for other regions.
    pub fn sort_automation_points(&mut self) -> Option<Vec<usize>> {
        let RegionContent::Automation(points) = &mut self.content else {
            return None;
        };
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| {
            points[a]
                .base
                .pos
                .ticks
                .partial_cmp(&points[b].base.pos.ticks)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut new_index = vec![0; points.len()];
        for (new, &old) in order.iter().enumerate() {
            new_index[old] = new;
        }

        let mut sorted = Vec::with_capacity(points.len());
        for &old in &order {
            sorted.push(points[old].clone());
        }
        *points = sorted;
        self.reindex_children();
        Some(new_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arranger::identifier::TrackKey;

    fn midi_region(start: f64, end: f64) -> Region {
        let id = RegionIdentifier::lane(RegionKind::Midi, TrackKey::new(), 0, 0);
        let mut region = Region::new(id, Position::from_ticks(start), Position::from_ticks(end), "clip");
        for (i, p) in [0.0, 480.0, 960.0, 1440.0].iter().enumerate() {
            let note = MidiNote::new(
                ChildIdentifier::new(id, i),
                Position::from_ticks(*p),
                Position::from_ticks(p + 240.0),
                60 + i as u8,
                90,
            );
            region.push_child(ArrangerObject::MidiNote(note));
        }
        region
    }

    #[test]
    fn test_new_region_is_not_looped() {
        let region = midi_region(0.0, 1920.0);
        assert!(!region.is_looped());
        assert_eq!(region.loop_end_pos.ticks, 1920.0);
        assert_eq!(region.num_children(), 4);
    }

    #[test]
    fn test_left_resize_keeps_content_in_place() {
        let mut region = midi_region(0.0, 1920.0);
        region.resize(ResizeType::L, 480.0);
        assert_eq!(region.base.pos.ticks, 480.0);
        assert_eq!(region.notes()[1].base.pos.ticks, 0.0);
        assert!(!region.is_looped());

        region.resize(ResizeType::L, -480.0);
        assert_eq!(region, midi_region(0.0, 1920.0).with_id(region.id));
    }

    #[test]
    fn test_right_loop_resize_loops_content() {
        let mut region = midi_region(0.0, 1920.0);
        region.resize(ResizeType::RLoop, 1920.0);
        assert!(region.is_looped());
        assert_eq!(region.loop_end_pos.ticks, 1920.0);
        assert_eq!(region.end_pos.ticks, 3840.0);
    }

    #[test]
    fn test_stretch_scales_children() {
        let mut region = midi_region(0.0, 1920.0);
        region.resize(ResizeType::RStretch, 1920.0);
        assert_eq!(region.notes()[1].base.pos.ticks, 960.0);
        assert_eq!(region.notes()[1].end_pos.ticks, 1440.0);
        assert_eq!(region.loop_end_pos.ticks, 3840.0);
    }

    #[test]
    fn test_split_cuts_content() {
        let region = midi_region(1920.0, 3840.0);
        let (r1, r2) = region.split(Position::from_ticks(2880.0));

        assert_eq!(r1.end_pos.ticks, 2880.0);
        assert_eq!(r1.notes().len(), 2);
        assert_eq!(r2.base.pos.ticks, 2880.0);
        assert_eq!(r2.notes().len(), 2);
        assert_eq!(r2.notes()[0].base.pos.ticks, 0.0);
        assert_eq!(r2.notes()[0].id.region, r2.id);
        assert_eq!(r2.id.idx, region.id.idx + 1);
        assert!(!r1.is_looped());
        assert!(!r2.is_looped());
    }

    #[test]
    fn test_split_looped_region_shares_content() {
        let mut region = midi_region(0.0, 1920.0);
        region.resize(ResizeType::RLoop, 1920.0);
        let (_, r2) = region.split(Position::from_ticks(2400.0));
        assert_eq!(r2.notes().len(), 4);
        assert_eq!(r2.clip_start_pos.ticks, 480.0);
    }

    #[test]
    fn test_sort_automation_points() {
        let id = RegionIdentifier::automation(TrackKey::new(), 0, 0);
        let mut region = Region::new(id, Position::zero(), Position::from_ticks(1920.0), "auto");
        for (i, p) in [960.0, 0.0, 480.0].iter().enumerate() {
            region.push_child(ArrangerObject::AutomationPoint(AutomationPoint::new(
                ChildIdentifier::new(id, i),
                Position::from_ticks(*p),
                0.5,
            )));
        }
        let new_index = region.sort_automation_points().unwrap();
        assert_eq!(new_index, vec![2, 0, 1]);
        assert_eq!(region.points()[0].base.pos.ticks, 0.0);
        assert_eq!(region.points()[2].id.index, 2);
    }

    impl Region {
        fn with_id(mut self, id: RegionIdentifier) -> Self {
            self.set_id(id);
            self
        }
    }
}
