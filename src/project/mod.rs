// Project graph - Tracks, link groups, transport and audio pool
//
// Every access from an action goes through an identifier and is resolved
// fresh against the current tracklist. Sibling lists are re-indexed on every
// insert and remove so that an identifier always equals the current slot.

pub mod link_group;
pub mod track;

pub use link_group::{LinkGroupError, RegionLinkGroupManager};
pub use track::{AutomationTrack, PortIdentifier, Track, TrackKind, TrackLane, Tracklist};

use crate::arranger::identifier::{ContainerKey, ObjectId, RegionIdentifier, TrackKey};
use crate::arranger::object::{
    ArrangerObject, AutomationPoint, ChordObject, Marker, MarkerKind, MidiNote, ObjectMut,
    ScaleObject,
};
use crate::arranger::region::{LinkGroupId, Region, RegionContent};
use crate::arranger::selections::SelectionsKind;
use crate::audio::pool::{AudioPool, PoolError};
use crate::sequencer::timeline::Position;
use crate::sequencer::transport::Transport;

/// Errors raised while resolving or restructuring the project graph
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProjectError {
    #[error("Track not found: {0}")]
    TrackNotFound(TrackKey),

    #[error("Container not found: {0:?}")]
    ContainerNotFound(ContainerKey),

    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("Identifier {id} resolves to {found}")]
    IndexMismatch { id: ObjectId, found: ObjectId },

    #[error("Slot of {id} is past the end of its container ({len} objects)")]
    SlotOutOfRange { id: ObjectId, len: usize },

    #[error("A {object} cannot be placed in {container:?}")]
    WrongContainer {
        object: &'static str,
        container: ContainerKey,
    },

    #[error("{0} is not an audio region")]
    NotAnAudioRegion(RegionIdentifier),

    #[error("No automation track for port {0:?}")]
    PortNotFound(PortIdentifier),

    #[error("No visible track {delta} tracks away from {track}")]
    NoTargetTrack { track: TrackKey, delta: i32 },

    #[error(transparent)]
    LinkGroup(#[from] LinkGroupError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Logs and aborts on a desynchronized project graph.
///
/// Actions validate their selections when they are built; once do/undo
/// runs, a failed lookup means the graph and the history disagree.
pub fn invariant_violation(context: &str, err: &ProjectError) -> ! {
    log::error!("{}: {}", context, err);
    panic!("{}: {}", context, err);
}

/// Where [`Project::insert_object`] puts an object in its container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// At the slot recorded in the object's identifier
    AtIndex,
    /// After the last sibling
    Append,
    /// Before the first sibling that starts later
    Sorted,
}

/// Mutable view of one sibling list
enum Siblings<'a> {
    Regions(&'a mut Vec<Region>),
    Notes(&'a mut Vec<MidiNote>),
    Points(&'a mut Vec<AutomationPoint>),
    Chords(&'a mut Vec<ChordObject>),
    Scales(&'a mut Vec<ScaleObject>),
    Markers(&'a mut Vec<Marker>),
}

impl<'a> Siblings<'a> {
    fn len(&self) -> usize {
        match self {
            Siblings::Regions(v) => v.len(),
            Siblings::Notes(v) => v.len(),
            Siblings::Points(v) => v.len(),
            Siblings::Chords(v) => v.len(),
            Siblings::Scales(v) => v.len(),
            Siblings::Markers(v) => v.len(),
        }
    }

    fn id_at(&self, idx: usize) -> Option<ObjectId> {
        match self {
            Siblings::Regions(v) => v.get(idx).map(|r| ObjectId::Region(r.id)),
            Siblings::Notes(v) => v.get(idx).map(|n| ObjectId::MidiNote(n.id)),
            Siblings::Points(v) => v.get(idx).map(|ap| ObjectId::AutomationPoint(ap.id)),
            Siblings::Chords(v) => v.get(idx).map(|c| ObjectId::ChordObject(c.id)),
            Siblings::Scales(v) => v.get(idx).map(|s| ObjectId::ScaleObject { index: s.index }),
            Siblings::Markers(v) => v.get(idx).map(|m| ObjectId::Marker { index: m.index }),
        }
    }

    fn pos_at(&self, idx: usize) -> Option<Position> {
        match self {
            Siblings::Regions(v) => v.get(idx).map(|r| r.base.pos),
            Siblings::Notes(v) => v.get(idx).map(|n| n.base.pos),
            Siblings::Points(v) => v.get(idx).map(|ap| ap.base.pos),
            Siblings::Chords(v) => v.get(idx).map(|c| c.base.pos),
            Siblings::Scales(v) => v.get(idx).map(|s| s.base.pos),
            Siblings::Markers(v) => v.get(idx).map(|m| m.base.pos),
        }
    }

    /// Slot before the first sibling starting after `pos`
    fn sorted_slot(&self, pos: Position) -> usize {
        let len = self.len();
        (0..len)
            .find(|&i| self.pos_at(i).is_some_and(|p| p.ticks > pos.ticks))
            .unwrap_or(len)
    }

    /// Hands the object back if it does not belong in this list
    fn insert(&mut self, idx: usize, obj: ArrangerObject) -> Result<(), ArrangerObject> {
        match (self, obj) {
            (Siblings::Regions(v), ArrangerObject::Region(r)) => v.insert(idx, r),
            (Siblings::Notes(v), ArrangerObject::MidiNote(n)) => v.insert(idx, n),
            (Siblings::Points(v), ArrangerObject::AutomationPoint(ap)) => v.insert(idx, ap),
            (Siblings::Chords(v), ArrangerObject::ChordObject(c)) => v.insert(idx, c),
            (Siblings::Scales(v), ArrangerObject::ScaleObject(s)) => v.insert(idx, s),
            (Siblings::Markers(v), ArrangerObject::Marker(m)) => v.insert(idx, m),
            (_, obj) => return Err(obj),
        }
        Ok(())
    }

    fn remove(&mut self, idx: usize) -> ArrangerObject {
        match self {
            Siblings::Regions(v) => ArrangerObject::Region(v.remove(idx)),
            Siblings::Notes(v) => ArrangerObject::MidiNote(v.remove(idx)),
            Siblings::Points(v) => ArrangerObject::AutomationPoint(v.remove(idx)),
            Siblings::Chords(v) => ArrangerObject::ChordObject(v.remove(idx)),
            Siblings::Scales(v) => ArrangerObject::ScaleObject(v.remove(idx)),
            Siblings::Markers(v) => ArrangerObject::Marker(v.remove(idx)),
        }
    }

    /// Rewrites every identifier from the sibling's slot
    fn reindex(&mut self) {
        match self {
            Siblings::Regions(v) => {
                for (i, r) in v.iter_mut().enumerate() {
                    r.set_id(RegionIdentifier { idx: i, ..r.id });
                }
            }
            Siblings::Notes(v) => {
                for (i, n) in v.iter_mut().enumerate() {
                    n.id.index = i;
                }
            }
            Siblings::Points(v) => {
                for (i, ap) in v.iter_mut().enumerate() {
                    ap.id.index = i;
                }
            }
            Siblings::Chords(v) => {
                for (i, c) in v.iter_mut().enumerate() {
                    c.id.index = i;
                }
            }
            Siblings::Scales(v) => {
                for (i, s) in v.iter_mut().enumerate() {
                    s.index = i;
                }
            }
            Siblings::Markers(v) => {
                for (i, m) in v.iter_mut().enumerate() {
                    m.index = i;
                }
            }
        }
    }

    fn into_get_mut(self, idx: usize) -> Option<ObjectMut<'a>> {
        match self {
            Siblings::Regions(v) => v.get_mut(idx).map(ObjectMut::Region),
            Siblings::Notes(v) => v.get_mut(idx).map(ObjectMut::MidiNote),
            Siblings::Points(v) => v.get_mut(idx).map(ObjectMut::AutomationPoint),
            Siblings::Chords(v) => v.get_mut(idx).map(ObjectMut::ChordObject),
            Siblings::Scales(v) => v.get_mut(idx).map(ObjectMut::ScaleObject),
            Siblings::Markers(v) => v.get_mut(idx).map(ObjectMut::Marker),
        }
    }
}

/// The live object graph edited by arranger actions
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub tracklist: Tracklist,
    pub link_groups: RegionLinkGroupManager,
    pub transport: Transport,
    pub pool: AudioPool,
}

impl Project {
    /// Creates a project with a chord track and a marker track holding the
    /// start and end markers.
    pub fn new(transport: Transport) -> Self {
        let mut tracklist = Tracklist::default();
        tracklist.add_track(Track::new("Chords", TrackKind::Chord));

        let mut markers = Track::new("Markers", TrackKind::Marker);
        let end = Position::from_bars(transport.total_bars() + 1, &transport.time_signature);
        markers.markers.push(Marker::new("start", Position::zero(), MarkerKind::Start));
        let mut end_marker = Marker::new("end", end, MarkerKind::End);
        end_marker.index = 1;
        markers.markers.push(end_marker);
        tracklist.add_track(markers);

        Self {
            tracklist,
            link_groups: RegionLinkGroupManager::new(),
            transport,
            pool: AudioPool::new(),
        }
    }

    pub fn add_track(&mut self, name: impl Into<String>, kind: TrackKind) -> TrackKey {
        self.tracklist.add_track(Track::new(name, kind))
    }

    fn track_mut(&mut self, key: &TrackKey) -> Result<&mut Track, ProjectError> {
        self.tracklist
            .track_mut(key)
            .ok_or(ProjectError::TrackNotFound(*key))
    }

    fn regions(&self, key: &ContainerKey) -> Result<&Vec<Region>, ProjectError> {
        let missing = || ProjectError::ContainerNotFound(*key);
        let track_of = |track: &TrackKey| {
            self.tracklist
                .track(track)
                .ok_or(ProjectError::TrackNotFound(*track))
        };
        match key {
            ContainerKey::Lane { track, lane_pos } => track_of(track)?
                .lanes
                .get(*lane_pos)
                .map(|l| &l.regions)
                .ok_or_else(missing),
            ContainerKey::AutomationTrack { track, at_idx } => track_of(track)?
                .automation_tracks
                .get(*at_idx)
                .map(|at| &at.regions)
                .ok_or_else(missing),
            ContainerKey::ChordTrack { track } => {
                let t = track_of(track)?;
                if t.kind == TrackKind::Chord {
                    Ok(&t.chord_regions)
                } else {
                    Err(missing())
                }
            }
            _ => Err(missing()),
        }
    }

    fn regions_mut(&mut self, key: &ContainerKey) -> Result<&mut Vec<Region>, ProjectError> {
        let missing = || ProjectError::ContainerNotFound(*key);
        match key {
            ContainerKey::Lane { track, lane_pos } => self
                .track_mut(track)?
                .lanes
                .get_mut(*lane_pos)
                .map(|l| &mut l.regions)
                .ok_or_else(missing),
            ContainerKey::AutomationTrack { track, at_idx } => self
                .track_mut(track)?
                .automation_tracks
                .get_mut(*at_idx)
                .map(|at| &mut at.regions)
                .ok_or_else(missing),
            ContainerKey::ChordTrack { track } => {
                let t = self.track_mut(track)?;
                if t.kind == TrackKind::Chord {
                    Ok(&mut t.chord_regions)
                } else {
                    Err(missing())
                }
            }
            _ => Err(missing()),
        }
    }

    pub fn region(&self, rid: &RegionIdentifier) -> Result<&Region, ProjectError> {
        match self.regions(&rid.container())?.get(rid.idx) {
            Some(r) if r.id == *rid => Ok(r),
            Some(r) => Err(ProjectError::IndexMismatch {
                id: ObjectId::Region(*rid),
                found: ObjectId::Region(r.id),
            }),
            None => Err(ProjectError::ObjectNotFound(ObjectId::Region(*rid))),
        }
    }

    pub fn region_mut(&mut self, rid: &RegionIdentifier) -> Result<&mut Region, ProjectError> {
        match self.regions_mut(&rid.container())?.get_mut(rid.idx) {
            Some(r) if r.id == *rid => Ok(r),
            Some(r) => Err(ProjectError::IndexMismatch {
                id: ObjectId::Region(*rid),
                found: ObjectId::Region(r.id),
            }),
            None => Err(ProjectError::ObjectNotFound(ObjectId::Region(*rid))),
        }
    }

    fn siblings_mut(&mut self, key: &ContainerKey) -> Result<Siblings<'_>, ProjectError> {
        let missing = || ProjectError::ContainerNotFound(*key);
        match key {
            ContainerKey::Lane { .. }
            | ContainerKey::AutomationTrack { .. }
            | ContainerKey::ChordTrack { .. } => self.regions_mut(key).map(Siblings::Regions),
            ContainerKey::Region(rid) => match &mut self.region_mut(rid)?.content {
                RegionContent::Midi(notes) => Ok(Siblings::Notes(notes)),
                RegionContent::Automation(points) => Ok(Siblings::Points(points)),
                RegionContent::Chord(chords) => Ok(Siblings::Chords(chords)),
                RegionContent::Audio { .. } => Err(missing()),
            },
            ContainerKey::Scales => self
                .tracklist
                .chord_track_mut()
                .map(|t| Siblings::Scales(&mut t.scales))
                .ok_or_else(missing),
            ContainerKey::Markers => self
                .tracklist
                .marker_track_mut()
                .map(|t| Siblings::Markers(&mut t.markers))
                .ok_or_else(missing),
        }
    }

    /// Owned copy of the live object
    pub fn find(&self, id: &ObjectId) -> Result<ArrangerObject, ProjectError> {
        let found = match id {
            ObjectId::Region(rid) => return self.region(rid).cloned().map(ArrangerObject::Region),
            ObjectId::MidiNote(c) => self
                .region(&c.region)?
                .notes()
                .get(c.index)
                .cloned()
                .map(ArrangerObject::MidiNote),
            ObjectId::AutomationPoint(c) => self
                .region(&c.region)?
                .points()
                .get(c.index)
                .cloned()
                .map(ArrangerObject::AutomationPoint),
            ObjectId::ChordObject(c) => self
                .region(&c.region)?
                .chords()
                .get(c.index)
                .cloned()
                .map(ArrangerObject::ChordObject),
            ObjectId::ScaleObject { index } => self
                .tracklist
                .chord_track()
                .and_then(|t| t.scales.get(*index))
                .cloned()
                .map(ArrangerObject::ScaleObject),
            ObjectId::Marker { index } => self
                .tracklist
                .marker_track()
                .and_then(|t| t.markers.get(*index))
                .cloned()
                .map(ArrangerObject::Marker),
        };
        let obj = found.ok_or(ProjectError::ObjectNotFound(*id))?;
        if obj.id() != *id {
            return Err(ProjectError::IndexMismatch {
                id: *id,
                found: obj.id(),
            });
        }
        Ok(obj)
    }

    /// Resolves an identifier to the live object
    pub fn find_mut(&mut self, id: &ObjectId) -> Result<ObjectMut<'_>, ProjectError> {
        let obj = self
            .siblings_mut(&id.container())?
            .into_get_mut(id.index())
            .ok_or(ProjectError::ObjectNotFound(*id))?;
        if obj.id() != *id {
            return Err(ProjectError::IndexMismatch {
                id: *id,
                found: obj.id(),
            });
        }
        Ok(obj)
    }

    /// Copies of every object in the project, regions followed by their
    /// children.
    pub fn all_objects(&self) -> Vec<ArrangerObject> {
        let mut objects = Vec::new();
        for track in &self.tracklist.tracks {
            for region in track.regions() {
                objects.push(ArrangerObject::Region(region.clone()));
                objects.extend(region.children());
            }
            objects.extend(track.scales.iter().cloned().map(ArrangerObject::ScaleObject));
            objects.extend(track.markers.iter().cloned().map(ArrangerObject::Marker));
        }
        objects
    }

    /// Lane regions need their lane to exist and a track whose lanes hold
    /// that kind of region.
    fn prepare_lane(&mut self, rid: &RegionIdentifier) -> Result<(), ProjectError> {
        if !rid.kind.is_lane_region() {
            return Ok(());
        }
        let track = self.track_mut(&rid.track)?;
        if track.kind.lane_region_kind() != Some(rid.kind) {
            return Err(ProjectError::WrongContainer {
                object: "region",
                container: rid.container(),
            });
        }
        track.create_missing_lanes(rid.lane_pos);
        if rid.lane_pos > 0 {
            track.lanes_visible = true;
        }
        Ok(())
    }

    /// Links a fresh copy of `obj` into the graph and returns its identifier.
    ///
    /// The non-project flag is cleared. Regions recorded in a link group
    /// rejoin it, recreating the group if it was dissolved meanwhile.
    pub fn insert_object(
        &mut self,
        mut obj: ArrangerObject,
        mode: InsertMode,
    ) -> Result<ObjectId, ProjectError> {
        obj.as_mut().base_mut().non_project = false;
        let id = obj.id();
        let key = id.container();
        let group = obj.as_region().and_then(|r| r.link_group);
        if let Some(rid) = id.as_region() {
            self.prepare_lane(rid)?;
        }

        let pos = obj.pos();
        let type_name = obj.type_name();
        let mut siblings = self.siblings_mut(&key)?;
        let len = siblings.len();
        let idx = match mode {
            InsertMode::AtIndex if id.index() > len => {
                return Err(ProjectError::SlotOutOfRange { id, len });
            }
            InsertMode::AtIndex => id.index(),
            InsertMode::Append => len,
            InsertMode::Sorted => siblings.sorted_slot(pos),
        };
        if siblings.insert(idx, obj).is_err() {
            return Err(ProjectError::WrongContainer {
                object: type_name,
                container: key,
            });
        }
        siblings.reindex();

        if let Some(group) = group {
            self.link_groups.ensure_group(group);
        }
        let new_id = id.with_index(idx);
        log::trace!("inserted {} as {}", type_name, new_id);
        Ok(new_id)
    }

    /// Unlinks the object from the graph and returns it.
    ///
    /// A link group left without members is dissolved, and trailing empty
    /// lanes are dropped.
    pub fn remove_object(&mut self, id: &ObjectId) -> Result<ArrangerObject, ProjectError> {
        let mut siblings = self.siblings_mut(&id.container())?;
        match siblings.id_at(id.index()) {
            Some(found) if found == *id => {}
            Some(found) => return Err(ProjectError::IndexMismatch { id: *id, found }),
            None => return Err(ProjectError::ObjectNotFound(*id)),
        }
        let obj = siblings.remove(id.index());
        siblings.reindex();

        if let Some(region) = obj.as_region() {
            if let Some(group) = region.link_group {
                self.drop_group_if_empty(group);
            }
            if region.id.kind.is_lane_region() {
                if let Some(track) = self.tracklist.track_mut(&region.id.track) {
                    track.remove_empty_last_lanes();
                }
            }
        }
        log::trace!("removed {}", id);
        Ok(obj)
    }

    /// Swaps the live object with `obj`, which must carry the same identifier
    pub fn replace_object(&mut self, obj: ArrangerObject) -> Result<(), ProjectError> {
        let id = obj.id();
        self.remove_object(&id)?;
        self.insert_object(obj, InsertMode::AtIndex)?;
        Ok(())
    }

    /// Moves objects to other containers.
    ///
    /// All sources are detached first (highest slot first), then every object
    /// is re-attached under its destination identifier (lowest first).
    /// Returns the resulting identifiers in input order.
    pub fn relocate(
        &mut self,
        moves: &[(ObjectId, ObjectId, InsertMode)],
    ) -> Result<Vec<ObjectId>, ProjectError> {
        let mut order: Vec<usize> = (0..moves.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(moves[i].0));

        let mut detached: Vec<Option<ArrangerObject>> = vec![None; moves.len()];
        for &i in &order {
            detached[i] = Some(self.remove_object(&moves[i].0)?);
        }

        order.sort_by_key(|&i| moves[i].1);
        let mut new_ids = moves.iter().map(|m| m.1).collect::<Vec<_>>();
        for &i in &order {
            let (src, dest, mode) = moves[i];
            let mut obj = detached[i]
                .take()
                .ok_or(ProjectError::ObjectNotFound(src))?;
            if !obj.as_mut().set_id(dest) {
                return Err(ProjectError::WrongContainer {
                    object: obj.type_name(),
                    container: dest.container(),
                });
            }
            new_ids[i] = self.insert_object(obj, mode)?;
        }
        log::debug!("relocated {} objects", moves.len());
        Ok(new_ids)
    }

    pub fn set_selected(&mut self, id: &ObjectId, selected: bool) -> Result<(), ProjectError> {
        self.find_mut(id)?.set_selected(selected);
        Ok(())
    }

    /// Deselects every object of the given editor
    pub fn clear_selection(&mut self, kind: SelectionsKind) {
        let selected: Vec<ObjectId> = self
            .all_objects()
            .iter()
            .filter(|o| o.is_selected() && kind.accepts(o))
            .map(|o| o.id())
            .collect();
        for id in selected {
            if let Ok(mut obj) = self.find_mut(&id) {
                obj.set_selected(false);
            }
        }
    }

    /// Re-sorts an automation region's points by position. Returns the new
    /// slot of every old slot.
    pub fn sort_automation_points(
        &mut self,
        rid: &RegionIdentifier,
    ) -> Result<Vec<usize>, ProjectError> {
        self.region_mut(rid)?
            .sort_automation_points()
            .ok_or(ProjectError::WrongContainer {
                object: "automation point",
                container: ContainerKey::Region(*rid),
            })
    }

    fn drop_group_if_empty(&mut self, group: LinkGroupId) {
        if self.tracklist.regions_in_group(group).next().is_none() {
            self.link_groups.remove_group(group);
        }
    }

    /// Returns the region's link group, creating one if it has none. The flag
    /// tells whether a group was created.
    pub fn create_link_group_if_none(
        &mut self,
        rid: &RegionIdentifier,
    ) -> Result<(LinkGroupId, bool), ProjectError> {
        if let Some(group) = self.region(rid)?.link_group {
            return Ok((group, false));
        }
        let group = self.link_groups.add_group();
        self.region_mut(rid)?.link_group = Some(group);
        Ok((group, true))
    }

    pub fn link_region(
        &mut self,
        rid: &RegionIdentifier,
        group: LinkGroupId,
    ) -> Result<(), ProjectError> {
        self.region_mut(rid)?.link_group = Some(group);
        self.link_groups.ensure_group(group);
        Ok(())
    }

    /// Takes the region out of its link group; the group is dissolved once
    /// empty.
    pub fn unlink_region(
        &mut self,
        rid: &RegionIdentifier,
    ) -> Result<Option<LinkGroupId>, ProjectError> {
        let group = self.region_mut(rid)?.link_group.take();
        if let Some(group) = group {
            self.drop_group_if_empty(group);
        }
        Ok(group)
    }

    /// Mirrors the region's content into every other member of its link
    /// group. Returns the number of regions updated.
    pub fn update_link_group(&mut self, rid: &RegionIdentifier) -> Result<usize, ProjectError> {
        let src = self.region(rid)?.clone();
        let Some(group) = src.link_group else {
            return Ok(0);
        };
        let mut updated = 0;
        for region in self.tracklist.regions_mut() {
            if region.link_group == Some(group) && region.id != src.id {
                region.copy_content_from(&src);
                updated += 1;
            }
        }
        log::trace!("propagated {} to {} linked regions", src.id, updated);
        Ok(updated)
    }

    /// Checks that every identifier equals the slot of its object
    pub fn verify_indices(&self) -> Result<(), ProjectError> {
        fn check(expected: ObjectId, found: ObjectId) -> Result<(), ProjectError> {
            if expected == found {
                Ok(())
            } else {
                Err(ProjectError::IndexMismatch {
                    id: expected,
                    found,
                })
            }
        }
        fn check_region(expected: RegionIdentifier, region: &Region) -> Result<(), ProjectError> {
            check(ObjectId::Region(expected), ObjectId::Region(region.id))?;
            for (i, child) in region.children().iter().enumerate() {
                let mut child_id = child.id().with_index(i);
                child_id.set_owner_region(region.id);
                check(child_id, child.id())?;
            }
            Ok(())
        }

        for track in &self.tracklist.tracks {
            for (lane_pos, lane) in track.lanes.iter().enumerate() {
                for (idx, r) in lane.regions.iter().enumerate() {
                    check_region(RegionIdentifier::lane(r.id.kind, track.key, lane_pos, idx), r)?;
                }
            }
            for (at_idx, at) in track.automation_tracks.iter().enumerate() {
                for (idx, r) in at.regions.iter().enumerate() {
                    check_region(RegionIdentifier::automation(track.key, at_idx, idx), r)?;
                }
            }
            for (idx, r) in track.chord_regions.iter().enumerate() {
                check_region(RegionIdentifier::chord(track.key, idx), r)?;
            }
            for (index, s) in track.scales.iter().enumerate() {
                check(ObjectId::ScaleObject { index }, ObjectId::ScaleObject { index: s.index })?;
            }
            for (index, m) in track.markers.iter().enumerate() {
                check(ObjectId::Marker { index }, ObjectId::Marker { index: m.index })?;
            }
        }
        Ok(())
    }

    /// Index and link-group consistency
    pub fn verify(&self) -> Result<(), ProjectError> {
        self.verify_indices()?;
        self.link_groups.validate(&self.tracklist)?;
        Ok(())
    }
}
