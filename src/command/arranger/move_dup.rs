// Move, duplicate and link
//
// A move shifts the live objects and their snapshots together, so `sel`
// always describes the objects as they currently are. Duplicates are appended
// to their destination container (automation points are inserted in position
// order) and remembered in `sel_after`; redo puts them back at exactly those
// slots.

use super::{
    ActionError, ActionKind, ArrangerSelectionsAction, Deltas, require_objects,
    resort_automation_points, reshift, restore_objects, shift_ids_after_insert,
    shift_ids_after_removal, shift_objects,
};
use crate::arranger::identifier::{ObjectId, RegionIdentifier, RegionKind, shift_after_insert};
use crate::arranger::object::{ArrangerObject, MidiNote};
use crate::arranger::region::RegionContent;
use crate::arranger::selections::ArrangerSelections;
use crate::command::state::DawState;
use crate::messaging::event::EventKind;
use crate::project::{InsertMode, PortIdentifier, Project, ProjectError};

impl ArrangerSelectionsAction {
    /// Moves objects by `deltas`. `target_port` moves automation regions onto
    /// the automation track of another port.
    ///
    /// With `already_moved` the live objects are already at their
    /// destination (the gesture moved them) and `sel` describes them there.
    pub fn new_move(
        project: &Project,
        sel: ArrangerSelections,
        already_moved: bool,
        deltas: Deltas,
        target_port: Option<PortIdentifier>,
    ) -> Result<Self, ActionError> {
        validate_move(project, &sel, &deltas, target_port, already_moved)?;
        let mut action = Self::with_kind(ActionKind::Move, sel);
        action.deltas = deltas;
        action.target_port = target_port;
        action.already_applied = already_moved;
        action.record_move_origin();
        Ok(action)
    }

    /// Copies objects, placing the copies `deltas` away from the originals.
    ///
    /// With `already_moved` the gesture dragged the originals themselves;
    /// the first do moves them back before creating the copies.
    pub fn new_duplicate(
        project: &Project,
        sel: ArrangerSelections,
        already_moved: bool,
        deltas: Deltas,
        target_port: Option<PortIdentifier>,
    ) -> Result<Self, ActionError> {
        Self::new_copy(ActionKind::Duplicate, project, sel, already_moved, deltas, target_port)
    }

    /// Like a duplicate, but originals and copies end up in one link group
    /// so that content edits stay mirrored between them.
    pub fn new_link(
        project: &Project,
        sel: ArrangerSelections,
        already_moved: bool,
        deltas: Deltas,
        target_port: Option<PortIdentifier>,
    ) -> Result<Self, ActionError> {
        if !sel.is_empty() && !sel.all_regions() {
            return Err(ActionError::WrongObjectKind { expected: "regions" });
        }
        Self::new_copy(ActionKind::Link, project, sel, already_moved, deltas, target_port)
    }

    fn new_copy(
        kind: ActionKind,
        project: &Project,
        sel: ArrangerSelections,
        already_moved: bool,
        deltas: Deltas,
        target_port: Option<PortIdentifier>,
    ) -> Result<Self, ActionError> {
        validate_move(project, &sel, &deltas, target_port, already_moved)?;
        if sel.contains_unclonable_object() {
            return Err(ActionError::Unclonable);
        }
        let mut action = Self::with_kind(kind, sel);
        action.deltas = deltas;
        action.target_port = target_port;
        action.already_applied = already_moved;
        action.record_move_origin();
        Ok(action)
    }

    /// Remembers the moved fields as they were before the gesture. Objects
    /// the gesture already moved are shifted back once, here.
    fn record_move_origin(&mut self) {
        let mut origin = self.sel.objects().to_vec();
        if self.already_applied {
            let back = self.deltas.signed(false);
            for obj in &mut origin {
                back.apply_to(&mut obj.as_mut());
            }
        }
        self.move_origin = origin;
    }

    pub(super) fn do_or_undo_move(
        &mut self,
        state: &mut DawState,
        do_it: bool,
    ) -> Result<EventKind, ProjectError> {
        let project = &mut state.project;
        if !self.skips_first_do(do_it) {
            let deltas = self.deltas.signed(do_it);
            if do_it {
                shift_objects(project, &mut self.sel, &deltas)?;
            } else {
                restore_objects(project, &mut self.sel, &self.move_origin)?;
            }
            if self.relocates() {
                let port = if do_it { self.target_port } else { None };
                self.relocate_regions(project, &deltas, port)?;
            }
        }
        resort_automation_points(project, &mut self.sel, None)?;
        Ok(EventKind::SelectionsMoved)
    }

    /// Moves the regions in `sel` to other lanes, tracks or automation
    /// tracks. A region goes back to where the previous opposite step took
    /// it from if that is known, otherwise it is appended to the container
    /// the deltas lead to.
    fn relocate_regions(
        &mut self,
        project: &mut Project,
        deltas: &Deltas,
        port: Option<PortIdentifier>,
    ) -> Result<(), ProjectError> {
        let mut moves = Vec::with_capacity(self.sel.len());
        for (i, obj) in self.sel.objects().iter().enumerate() {
            let src = obj.id();
            let dest = match (self.return_ids.get(i), src.as_region()) {
                (Some(&back), _) => (back, InsertMode::AtIndex),
                (None, Some(rid)) => (
                    ObjectId::Region(moved_region_id(project, rid, deltas, port)?),
                    InsertMode::Append,
                ),
                (None, None) => {
                    return Err(ProjectError::WrongContainer {
                        object: obj.type_name(),
                        container: src.container(),
                    });
                }
            };
            moves.push((src, dest.0, dest.1));
        }

        let new_ids = project.relocate(&moves)?;
        self.return_ids = moves.iter().map(|m| m.0).collect();
        for (obj, id) in self.sel.objects_mut().iter_mut().zip(new_ids) {
            obj.as_mut().set_id(id);
        }
        Ok(())
    }

    pub(super) fn do_or_undo_duplicate(
        &mut self,
        state: &mut DawState,
        do_it: bool,
    ) -> Result<EventKind, ProjectError> {
        let project = &mut state.project;
        if !do_it {
            self.remove_copies(project)?;
            return Ok(EventKind::SelectionsRemoved);
        }

        if self.is_first_run() {
            if self.already_applied {
                self.move_originals_back(project)?;
            }
            self.create_copies(project)?;
        } else {
            self.restore_copies(project)?;
        }
        for id in self.sel.ids() {
            project.set_selected(&id, false)?;
        }
        Ok(EventKind::SelectionsCreated)
    }

    fn move_originals_back(&mut self, project: &mut Project) -> Result<(), ProjectError> {
        let back = self.deltas.signed(false);
        restore_objects(project, &mut self.sel, &self.move_origin)?;
        if self.relocates() {
            self.relocate_regions(project, &back, None)?;
            self.return_ids.clear();
        }
        resort_automation_points(project, &mut self.sel, None)
    }

    fn create_copies(&mut self, project: &mut Project) -> Result<(), ProjectError> {
        let link = self.kind == ActionKind::Link;
        let mut order: Vec<usize> = (0..self.sel.len()).collect();
        order.sort_by_key(|&i| self.sel.objects()[i].id());

        let mut copies: Vec<Option<ArrangerObject>> = vec![None; self.sel.len()];
        self.created_groups = vec![false; self.sel.len()];

        for i in order {
            let original_id = self.sel.objects()[i].id();
            let mut copy = self.sel.objects()[i].clone();
            self.deltas.apply_to(&mut copy.as_mut());
            if let (Some(rid), true) = (original_id.as_region(), self.relocates()) {
                let dest = moved_region_id(project, rid, &self.deltas, self.target_port)?;
                copy.as_mut().set_id(ObjectId::Region(dest));
            }

            if let Some(region) = copy.as_region_mut() {
                region.link_group = None;
                if let (RegionContent::Audio { clip }, false) = (&mut region.content, link) {
                    *clip = project.pool.duplicate_clip(*clip)?;
                }
            }
            if let (Some(rid), true) = (original_id.as_region(), link) {
                let (group, created) = project.create_link_group_if_none(rid)?;
                self.created_groups[i] = created;
                for obj in [&mut copy, &mut self.sel.objects_mut()[i]] {
                    if let Some(region) = obj.as_region_mut() {
                        region.link_group = Some(group);
                    }
                }
            }

            copy.as_mut().set_selected(true);
            let mode = if copy.id().is_automation_point() {
                InsertMode::Sorted
            } else {
                InsertMode::Append
            };
            let new_id = project.insert_object(copy.clone(), mode)?;

            shift_ids_after_insert(&mut self.sel, &new_id);
            for earlier in copies.iter_mut().flatten() {
                reshift(earlier, |id| shift_after_insert(id, &new_id));
            }
            copy.as_mut().set_id(new_id);
            copy.as_mut().base_mut().non_project = true;
            copies[i] = Some(copy);
        }

        let mut after = self.sel.clone();
        for (slot, copy) in after.objects_mut().iter_mut().zip(copies.into_iter().flatten()) {
            *slot = copy;
        }
        self.sel_after = after;
        log::debug!("created {} copies", self.sel_after.len());
        Ok(())
    }

    fn restore_copies(&mut self, project: &mut Project) -> Result<(), ProjectError> {
        let mut copies: Vec<&ArrangerObject> = self.sel_after.objects().iter().collect();
        copies.sort_by_key(|o| o.id());
        for copy in copies {
            let new_id = project.insert_object(copy.clone(), InsertMode::AtIndex)?;
            shift_ids_after_insert(&mut self.sel, &new_id);
        }

        for (obj, &created) in self.sel.objects().iter().zip(&self.created_groups) {
            let group = obj.as_region().and_then(|r| r.link_group);
            if let (Some(rid), Some(group), true) = (obj.id().as_region(), group, created) {
                project.link_region(rid, group)?;
            }
        }
        Ok(())
    }

    /// Originals stay where they are and stay deselected
    fn remove_copies(&mut self, project: &mut Project) -> Result<(), ProjectError> {
        let mut copies = self.sel_after.clone();
        copies.sort_by_indices(true);
        for id in copies.ids() {
            project.remove_object(&id)?;
            shift_ids_after_removal(&mut self.sel, &id);
        }

        for (obj, &created) in self.sel.objects().iter().zip(&self.created_groups) {
            if let (Some(rid), true) = (obj.id().as_region(), created) {
                project.unlink_region(rid)?;
            }
        }
        Ok(())
    }
}

/// Where a region ends up when moved by `deltas`, or onto the automation
/// track of `port`. The slot is left as is; callers append.
fn moved_region_id(
    project: &Project,
    rid: &RegionIdentifier,
    deltas: &Deltas,
    port: Option<PortIdentifier>,
) -> Result<RegionIdentifier, ProjectError> {
    if let Some(port) = port {
        let (track, at_idx) = project
            .tracklist
            .automation_track_for_port(&port)
            .ok_or(ProjectError::PortNotFound(port))?;
        return Ok(RegionIdentifier { track, at_idx, ..*rid });
    }
    let track = project
        .tracklist
        .visible_track_after_delta(&rid.track, deltas.tracks)
        .ok_or(ProjectError::NoTargetTrack {
            track: rid.track,
            delta: deltas.tracks,
        })?;
    let lane_pos = (rid.lane_pos as i64 + deltas.lanes as i64).max(0) as usize;
    Ok(RegionIdentifier {
        track,
        lane_pos,
        ..*rid
    })
}

/// Rejects deltas that cannot apply to every object of the selection.
///
/// With `already_moved` the objects in `sel` already carry the deltas, so
/// the range checks look at the values they had before the gesture.
fn validate_move(
    project: &Project,
    sel: &ArrangerSelections,
    deltas: &Deltas,
    target_port: Option<PortIdentifier>,
    already_moved: bool,
) -> Result<(), ActionError> {
    require_objects(sel)?;
    let applied = |delta: i64| if already_moved { delta } else { 0 };

    if deltas.is_structural() {
        if target_port.is_some() {
            return Err(ActionError::InvalidDelta(
                "a target port cannot be combined with track or lane deltas".into(),
            ));
        }
        for obj in sel.objects() {
            let region = obj
                .as_region()
                .filter(|r| r.id.kind.is_lane_region())
                .ok_or(ActionError::WrongObjectKind { expected: "lane regions" })?;

            let lane = region.id.lane_pos as i64 - applied(deltas.lanes as i64);
            if lane < 0 || lane + (deltas.lanes as i64) < 0 {
                return Err(ActionError::InvalidDelta(format!(
                    "lane delta {} leaves the lanes",
                    deltas.lanes
                )));
            }

            let tracklist = &project.tracklist;
            let origin = if already_moved {
                tracklist.visible_track_after_delta(&region.id.track, -deltas.tracks)
            } else {
                Some(region.id.track)
            };
            let dest = origin
                .and_then(|t| tracklist.visible_track_after_delta(&t, deltas.tracks))
                .ok_or_else(|| {
                    ActionError::InvalidDelta(format!(
                        "no visible track {} tracks away",
                        deltas.tracks
                    ))
                })?;
            let holds = tracklist.track(&dest).and_then(|t| t.kind.lane_region_kind());
            if holds != Some(region.id.kind) {
                return Err(ActionError::InvalidDelta(format!(
                    "target track cannot hold {:?} regions",
                    region.id.kind
                )));
            }
        }
    }

    if let Some(port) = target_port {
        if already_moved {
            return Err(ActionError::InvalidDelta(
                "moves to another automation track cannot be pre-applied".into(),
            ));
        }
        let all_automation = sel.objects().iter().all(|o| {
            o.as_region()
                .is_some_and(|r| r.id.kind == RegionKind::Automation)
        });
        if !all_automation {
            return Err(ActionError::WrongObjectKind {
                expected: "automation regions",
            });
        }
        project
            .tracklist
            .automation_track_for_port(&port)
            .ok_or(ProjectError::PortNotFound(port))?;
    }

    if deltas.pitch != 0 {
        for obj in sel.objects() {
            let ArrangerObject::MidiNote(note) = obj else {
                return Err(ActionError::WrongObjectKind { expected: "MIDI notes" });
            };
            let before = note.pitch as i64 - applied(deltas.pitch as i64);
            let range = 0..=MidiNote::MAX_PITCH as i64;
            if !range.contains(&before) || !range.contains(&(before + deltas.pitch as i64)) {
                return Err(ActionError::InvalidDelta(format!(
                    "pitch delta {} leaves the MIDI range",
                    deltas.pitch
                )));
            }
        }
    }

    if deltas.chords != 0 {
        for obj in sel.objects() {
            let ArrangerObject::ChordObject(chord) = obj else {
                return Err(ActionError::WrongObjectKind { expected: "chord objects" });
            };
            let before = chord.chord_index as i64 - applied(deltas.chords as i64);
            if before < 0 || before + (deltas.chords as i64) < 0 {
                return Err(ActionError::InvalidDelta(format!(
                    "chord delta {} leaves the chord descriptors",
                    deltas.chords
                )));
            }
        }
    }

    if deltas.normalized_amount != 0.0
        && !sel
            .objects()
            .iter()
            .all(|o| matches!(o, ArrangerObject::AutomationPoint(_)))
    {
        return Err(ActionError::WrongObjectKind {
            expected: "automation points",
        });
    }
    Ok(())
}
