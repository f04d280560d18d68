// Arranger selections - Ordered, typed groups of object clones
//
// A selection is either what the user currently has selected or a snapshot
// recorded by an action. Every member is a non-project clone; the live object
// is always reached again through its identifier.

use crate::arranger::identifier::{ObjectId, RegionIdentifier};
use crate::arranger::object::{ArrangerObject, ObjectProperty};
use crate::arranger::region::{Region, RegionContent};
use crate::audio::pool::{AudioClip, AudioPool, ClipId, PoolError};
use crate::project::{Project, ProjectError};
use crate::sequencer::timeline::Position;
use crate::sequencer::transport::Transport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Editor a selection belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionsKind {
    Timeline,
    Midi,
    Chord,
    Automation,
    Audio,
}

impl SelectionsKind {
    /// Whether objects of this type can be part of a selection of this kind
    pub fn accepts(&self, obj: &ArrangerObject) -> bool {
        match self {
            SelectionsKind::Timeline => matches!(
                obj,
                ArrangerObject::Region(_) | ArrangerObject::Marker(_) | ArrangerObject::ScaleObject(_)
            ),
            SelectionsKind::Midi => matches!(obj, ArrangerObject::MidiNote(_)),
            SelectionsKind::Chord => matches!(obj, ArrangerObject::ChordObject(_)),
            SelectionsKind::Automation => matches!(obj, ArrangerObject::AutomationPoint(_)),
            SelectionsKind::Audio => false,
        }
    }
}

impl fmt::Display for SelectionsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectionsKind::Timeline => "timeline",
            SelectionsKind::Midi => "MIDI",
            SelectionsKind::Chord => "chord",
            SelectionsKind::Automation => "automation",
            SelectionsKind::Audio => "audio",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SelectionsError {
    #[error("A {object} cannot be part of {kind} selections")]
    WrongDomain {
        kind: SelectionsKind,
        object: &'static str,
    },

    #[error("Selections cannot be merged")]
    NotMergeable,

    #[error("Audio selections need an audio range")]
    MissingAudioRange,

    #[error("Invalid clipboard data: {0}")]
    Clipboard(String),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Frame range of an audio region's clip, with the frames it held when
/// captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSelection {
    pub region: RegionIdentifier,
    /// First clip frame of the range
    pub start_frame: usize,
    /// One past the last clip frame of the range
    pub end_frame: usize,
    /// Captured frames, one buffer per channel
    pub frames: Vec<Vec<f32>>,
}

impl AudioSelection {
    /// Captures the clip frames under the timeline range `start..end` of an
    /// audio region.
    pub fn capture(
        project: &Project,
        region_id: RegionIdentifier,
        start: Position,
        end: Position,
    ) -> Result<Self, ProjectError> {
        let region = project.region(&region_id)?;
        let clip = region
            .clip()
            .ok_or(ProjectError::NotAnAudioRegion(region_id))?;
        let transport = &project.transport;
        let to_clip_frame = |p: Position| {
            let local = p.ticks - region.base.pos.ticks + region.clip_start_pos.ticks;
            transport.ticks_to_frames(local).max(0) as usize
        };
        let start_frame = to_clip_frame(start);
        let end_frame = to_clip_frame(end).max(start_frame);
        let frames = project.pool.read_frames(clip, start_frame..end_frame)?;
        Ok(Self {
            region: region_id,
            start_frame,
            end_frame,
            frames,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrangerSelections {
    kind: SelectionsKind,
    objects: Vec<ArrangerObject>,
    audio: Option<AudioSelection>,
}

impl ArrangerSelections {
    pub fn new(kind: SelectionsKind) -> Self {
        Self {
            kind,
            objects: Vec::new(),
            audio: None,
        }
    }

    pub fn from_objects<I>(kind: SelectionsKind, objects: I) -> Result<Self, SelectionsError>
    where
        I: IntoIterator<Item = ArrangerObject>,
    {
        let mut sel = Self::new(kind);
        for obj in objects {
            sel.add_object(obj)?;
        }
        Ok(sel)
    }

    pub fn from_audio(audio: AudioSelection) -> Self {
        Self {
            kind: SelectionsKind::Audio,
            objects: Vec::new(),
            audio: Some(audio),
        }
    }

    /// Snapshot of the objects currently selected in the project
    pub fn from_selected(project: &Project, kind: SelectionsKind) -> Self {
        let mut sel = Self::new(kind);
        sel.objects = project
            .all_objects()
            .into_iter()
            .filter(|o| o.is_selected() && kind.accepts(o))
            .map(|o| o.snapshot())
            .collect();
        sel
    }

    /// Adds a clone of `obj`, flagged as non-project
    pub fn add_object(&mut self, obj: ArrangerObject) -> Result<(), SelectionsError> {
        if !self.kind.accepts(&obj) {
            return Err(SelectionsError::WrongDomain {
                kind: self.kind,
                object: obj.type_name(),
            });
        }
        self.objects.push(obj.snapshot());
        Ok(())
    }

    pub fn kind(&self) -> SelectionsKind {
        self.kind
    }

    pub fn objects(&self) -> &[ArrangerObject] {
        &self.objects
    }

    pub(crate) fn objects_mut(&mut self) -> &mut [ArrangerObject] {
        &mut self.objects
    }

    pub fn audio(&self) -> Option<&AudioSelection> {
        self.audio.as_ref()
    }

    pub(crate) fn audio_mut(&mut self) -> Option<&mut AudioSelection> {
        self.audio.as_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.audio.is_none()
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id()).collect()
    }

    /// Sorts members by identifier. Removals must run descending so that
    /// earlier removals never shift the slots of later ones; insertions run
    /// ascending for the same reason.
    pub fn sort_by_indices(&mut self, descending: bool) {
        self.objects.sort_by_key(|o| o.id());
        if descending {
            self.objects.reverse();
        }
    }

    pub fn contains_undeletable_object(&self) -> bool {
        self.objects.iter().any(|o| !o.is_deletable())
    }

    pub fn contains_unclonable_object(&self) -> bool {
        self.objects.iter().any(|o| !o.is_clonable())
    }

    pub fn contains_unrenamable_object(&self) -> bool {
        self.objects.iter().any(|o| !o.is_renamable())
    }

    pub fn contains_object_with_property(&self, property: ObjectProperty, value: bool) -> bool {
        self.objects.iter().any(|o| o.has_property(property) == value)
    }

    pub fn all_regions(&self) -> bool {
        !self.objects.is_empty() && self.objects.iter().all(|o| o.as_region().is_some())
    }

    /// Latest end (or start, for objects without length) among the members
    pub fn last_end(&self) -> Option<Position> {
        self.objects
            .iter()
            .map(|o| o.end_pos().unwrap_or_else(|| o.pos()))
            .max_by(|a, b| a.ticks.partial_cmp(&b.ticks).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Two or more unlooped regions of one kind on one lane
    pub fn can_be_merged(&self) -> bool {
        let regions: Vec<&Region> = self.objects.iter().filter_map(|o| o.as_region()).collect();
        if regions.len() < 2 || regions.len() != self.objects.len() {
            return false;
        }
        let first = regions[0];
        regions.iter().all(|r| {
            r.id.same_container(&first.id) && r.id.kind == first.id.kind && !r.is_looped()
        })
    }

    /// Collapses the members into one region spanning all of them.
    ///
    /// The merged region takes the lowest member slot and the first member's
    /// name and properties; children are rebased onto the new start. Audio
    /// regions get a new clip in `pool` holding the sum of the members'
    /// frames.
    pub fn merge(
        &self,
        pool: &mut AudioPool,
        transport: &Transport,
    ) -> Result<ArrangerObject, SelectionsError> {
        if !self.can_be_merged() {
            return Err(SelectionsError::NotMergeable);
        }
        let mut regions: Vec<&Region> = self.objects.iter().filter_map(|o| o.as_region()).collect();
        regions.sort_by(|a, b| {
            a.base
                .pos
                .ticks
                .partial_cmp(&b.base.pos.ticks)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let first = regions[0];
        let start = first.base.pos;
        let end = regions
            .iter()
            .map(|r| r.end_pos)
            .fold(first.end_pos, |acc, p| if p.ticks > acc.ticks { p } else { acc });
        let min_idx = regions.iter().map(|r| r.id.idx).min().unwrap_or(first.id.idx);

        let mut merged = first.clone();
        merged.id.idx = min_idx;
        merged.end_pos = end;
        merged.clip_start_pos = Position::zero();
        merged.loop_start_pos = Position::zero();
        merged.loop_end_pos = Position::from_ticks(end.ticks - start.ticks);
        merged.fade_in_pos = Position::zero();
        merged.fade_out_pos = merged.loop_end_pos;
        merged.link_group = None;
        merged.clear_children();

        for r in &regions {
            let diff = r.base.pos.ticks - start.ticks;
            let length = r.length_ticks();
            for mut child in r.children() {
                if child.pos().ticks >= length {
                    continue;
                }
                if let ArrangerObject::MidiNote(n) = &mut child {
                    n.end_pos.ticks = n.end_pos.ticks.min(length);
                }
                child.as_mut().move_by_ticks(diff);
                merged.push_child(child);
            }
        }
        if merged.clip().is_some() {
            let clip = mix_clips(&regions, end.ticks - start.ticks, pool, transport)?;
            merged.content = RegionContent::Audio { clip };
        }
        merged.base.non_project = true;
        log::debug!(
            "merged {} regions into {} ({} children)",
            regions.len(),
            merged.id,
            merged.num_children()
        );
        Ok(ArrangerObject::Region(merged))
    }

    /// Serializes the selection for the clipboard
    pub fn to_json(&self) -> Result<String, SelectionsError> {
        serde_json::to_string(self).map_err(|e| SelectionsError::Clipboard(e.to_string()))
    }

    /// Restores a selection copied with [`ArrangerSelections::to_json`]
    pub fn from_json(json: &str) -> Result<Self, SelectionsError> {
        let sel: Self =
            serde_json::from_str(json).map_err(|e| SelectionsError::Clipboard(e.to_string()))?;
        if let Some(obj) = sel.objects.iter().find(|o| !sel.kind.accepts(o)) {
            return Err(SelectionsError::WrongDomain {
                kind: sel.kind,
                object: obj.type_name(),
            });
        }
        if sel.kind == SelectionsKind::Audio && sel.audio.is_none() {
            return Err(SelectionsError::MissingAudioRange);
        }
        Ok(sel)
    }
}

/// Adds the frames each audio region plays into one new clip, placed at the
/// region's offset from the earliest one. `regions` is sorted by start.
fn mix_clips(
    regions: &[&Region],
    length_ticks: f64,
    pool: &mut AudioPool,
    transport: &Transport,
) -> Result<ClipId, SelectionsError> {
    let first = regions[0];
    let first_clip = pool.get(first.clip().ok_or(SelectionsError::NotMergeable)?)?;
    let name = first_clip.name.clone();
    let sample_rate = first_clip.sample_rate;
    let num_frames = (transport.frames_per_tick() * length_ticks).ceil() as usize;
    let mut channels = vec![vec![0.0f32; num_frames]; first_clip.num_channels()];

    let start_frame = transport.ticks_to_frames(first.base.pos.ticks);
    for r in regions {
        let clip = pool.get(r.clip().ok_or(SelectionsError::NotMergeable)?)?;
        let offset = (transport.ticks_to_frames(r.base.pos.ticks) - start_frame).max(0) as usize;
        let clip_offset = transport.ticks_to_frames(r.clip_start_pos.ticks).max(0) as usize;
        let len = transport.ticks_to_frames(r.length_ticks()).max(0) as usize;
        for (dst, src) in channels.iter_mut().zip(&clip.channels) {
            let (Some(dst), Some(src)) = (dst.get_mut(offset..), src.get(clip_offset..)) else {
                continue;
            };
            for (d, s) in dst.iter_mut().zip(src.iter().take(len)) {
                *d += s;
            }
        }
    }
    Ok(pool.add_clip(AudioClip::new(name, sample_rate, channels)))
}
