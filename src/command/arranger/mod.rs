// Arranger selections action - One undoable edit of a group of arranger objects
//
// The action owns snapshot clones of the objects it edits (`sel`, plus
// `sel_after` for edits that replace objects) and reaches the live objects
// again through their identifiers on every step. Each variant lives in its
// own file; this module holds the shared dispatcher.

mod create_delete;
mod edit;
mod fill;
mod move_dup;
mod quantize;
mod record;
mod resize;
mod split_merge;

use crate::arranger::identifier::{ObjectId, RegionIdentifier, RegionKind, shift_after_insert, shift_after_removal};
use crate::arranger::object::{ArrangerObject, EditType, ObjectMut, ResizeType};
use crate::arranger::selections::{ArrangerSelections, SelectionsError, SelectionsKind};
use crate::command::state::DawState;
use crate::command::trait_def::{CommandResult, UndoableCommand};
use crate::messaging::event::EventKind;
use crate::project::{InsertMode, PortIdentifier, Project, ProjectError, invariant_violation};
use crate::sequencer::quantize::QuantizeOptions;
use crate::sequencer::timeline::Position;
use serde::{Deserialize, Serialize};

/// Errors raised while building an action from a selection
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ActionError {
    #[error("Nothing selected")]
    EmptySelection,

    #[error("Selection contains an object that cannot be deleted")]
    Undeletable,

    #[error("Selection contains an object that cannot be cloned")]
    Unclonable,

    #[error("Selection contains an object that cannot be renamed")]
    Unrenamable,

    #[error("Selection contains an object without length")]
    Unresizable,

    #[error("{resize:?} resize is not possible on {reason}")]
    IncompatibleResize {
        resize: ResizeType,
        reason: &'static str,
    },

    #[error("Invalid delta: {0}")]
    InvalidDelta(String),

    #[error("Cannot split at {0}")]
    InvalidSplitPosition(Position),

    #[error("Selections cannot be merged")]
    NotMergeable,

    #[error("The state after the edit is required")]
    MissingAfterSelections,

    #[error("Before and after selections do not match")]
    SelectionMismatch,

    #[error("Expected {expected}")]
    WrongObjectKind { expected: &'static str },

    #[error("Invalid quantize options")]
    InvalidQuantize,

    #[error(transparent)]
    Selections(#[from] SelectionsError),

    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// What the action does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    Create,
    Delete,
    Move,
    Duplicate,
    Link,
    Record,
    Edit(EditType),
    AutomationFill,
    Split { pos: Position },
    Merge,
    Resize(ResizeType),
    Quantize(QuantizeOptions),
}

/// Whether the action has gone through at least one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitState {
    NotCommitted,
    Committed,
}

/// Amounts a move or duplicate shifts its objects by
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Deltas {
    pub ticks: f64,
    /// Visible tracks (regions only)
    pub tracks: i32,
    /// Lanes (lane regions only)
    pub lanes: i32,
    /// Semitones (MIDI notes only)
    pub pitch: i32,
    /// Chord descriptor slots (chord objects only)
    pub chords: i32,
    /// Normalized value (automation points only)
    pub normalized_amount: f64,
}

impl Deltas {
    pub fn ticks(ticks: f64) -> Self {
        Self {
            ticks,
            ..Self::default()
        }
    }

    /// True if objects change container
    pub fn is_structural(&self) -> bool {
        self.tracks != 0 || self.lanes != 0
    }

    fn inverted(&self) -> Self {
        Self {
            ticks: -self.ticks,
            tracks: -self.tracks,
            lanes: -self.lanes,
            pitch: -self.pitch,
            chords: -self.chords,
            normalized_amount: -self.normalized_amount,
        }
    }

    fn signed(&self, forward: bool) -> Self {
        if forward { *self } else { self.inverted() }
    }

    /// Applies every in-place delta; track and lane deltas are handled by
    /// relocating the object.
    fn apply_to(&self, obj: &mut ObjectMut<'_>) {
        if self.ticks != 0.0 {
            obj.move_by_ticks(self.ticks);
        }
        if self.pitch != 0 {
            obj.shift_pitch(self.pitch);
        }
        if self.chords != 0 {
            obj.shift_chord(self.chords);
        }
        if self.normalized_amount != 0.0 {
            obj.shift_normalized(self.normalized_amount as f32);
        }
    }
}

/// Undoable edit of arranger selections
///
/// Built through one of the `new_*` constructors, which validate the
/// selection and reject edits that cannot be applied. Executing and undoing
/// after that can only fail if the project graph and the history went out of
/// sync, which aborts.
#[derive(Debug, Clone)]
pub struct ArrangerSelectionsAction {
    kind: ActionKind,
    /// Objects as they are before the edit (for moves: as they are now)
    sel: ArrangerSelections,
    /// Objects as they are after the edit, for edits that replace objects.
    /// Empty for the other kinds.
    sel_after: ArrangerSelections,
    deltas: Deltas,
    /// Automation track that moved automation regions go to
    target_port: Option<PortIdentifier>,
    /// The gesture already applied the edit to the live objects
    already_applied: bool,
    /// Where relocated regions came from; the next opposite step puts them
    /// back there.
    return_ids: Vec<ObjectId>,
    /// Per original: linking created its link group
    created_groups: Vec<bool>,
    /// Moved fields of `sel` before the edit, in `sel` order. Undoing a
    /// move copies them back instead of applying the inverse deltas.
    move_origin: Vec<ArrangerObject>,
    commit: CommitState,
}

impl ArrangerSelectionsAction {
    fn with_kind(kind: ActionKind, sel: ArrangerSelections) -> Self {
        let sel_after = ArrangerSelections::new(sel.kind());
        Self {
            kind,
            sel,
            sel_after,
            deltas: Deltas::default(),
            target_port: None,
            already_applied: false,
            return_ids: Vec::new(),
            created_groups: Vec::new(),
            move_origin: Vec::new(),
            commit: CommitState::NotCommitted,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn selections(&self) -> &ArrangerSelections {
        &self.sel
    }

    /// State after the edit, for kinds that record one
    pub fn after_selections(&self) -> Option<&ArrangerSelections> {
        (!self.sel_after.is_empty()).then_some(&self.sel_after)
    }

    pub fn deltas(&self) -> &Deltas {
        &self.deltas
    }

    pub fn commit_state(&self) -> CommitState {
        self.commit
    }

    fn is_first_run(&self) -> bool {
        self.commit == CommitState::NotCommitted
    }

    /// First do of an edit the gesture already applied
    fn skips_first_do(&self, do_it: bool) -> bool {
        do_it && self.is_first_run() && self.already_applied
    }

    fn relocates(&self) -> bool {
        self.deltas.is_structural() || self.target_port.is_some()
    }

    fn touches_automation(&self) -> bool {
        self.sel.kind() == SelectionsKind::Automation
            || self
                .sel
                .objects()
                .iter()
                .any(|o| o.as_region().is_some_and(|r| r.id.kind == RegionKind::Automation))
    }

    /// `Some(soft)` if the processing graph has to be recalculated
    fn graph_update(&self) -> Option<bool> {
        let structural = match self.kind {
            ActionKind::Move => self.relocates(),
            ActionKind::Create
            | ActionKind::Delete
            | ActionKind::Duplicate
            | ActionKind::Link
            | ActionKind::Record
            | ActionKind::Split { .. }
            | ActionKind::Merge => self.sel.kind() == SelectionsKind::Timeline,
            _ => false,
        };
        if structural {
            Some(false)
        } else if self.touches_automation() {
            Some(true)
        } else {
            None
        }
    }

    fn dispatch(&mut self, state: &mut DawState, do_it: bool) -> Result<EventKind, ProjectError> {
        match self.kind {
            ActionKind::Create => self.do_or_undo_create_delete(state, do_it, true),
            ActionKind::Delete => self.do_or_undo_create_delete(state, do_it, false),
            ActionKind::Move => self.do_or_undo_move(state, do_it),
            ActionKind::Duplicate | ActionKind::Link => self.do_or_undo_duplicate(state, do_it),
            ActionKind::Record => self.do_or_undo_record(state, do_it),
            ActionKind::Edit(edit) => self.do_or_undo_edit(state, do_it, edit),
            ActionKind::AutomationFill => self.do_or_undo_fill(state, do_it),
            ActionKind::Split { .. } | ActionKind::Merge => self.do_or_undo_split_merge(state, do_it),
            ActionKind::Resize(_) => self.do_or_undo_resize(state, do_it),
            ActionKind::Quantize(_) => self.do_or_undo_quantize(state, do_it),
        }
    }

    /// Runs one step in either direction, then brings the rest of the
    /// engine up to date: linked regions, the graph check, the router and
    /// the UI.
    fn do_or_undo(&mut self, state: &mut DawState, do_it: bool) {
        let result = self.dispatch(state, do_it).and_then(|event| {
            self.update_linked_owners(&mut state.project)?;
            state.project.verify()?;
            Ok(event)
        });
        let event = match result {
            Ok(event) => event,
            Err(e) => invariant_violation(
                &format!("{} ({})", self.description(), if do_it { "do" } else { "undo" }),
                &e,
            ),
        };

        if let Some(soft) = self.graph_update() {
            state.recalc_graph(soft);
        }
        let kind = self.sel.kind();
        state.events.push(event, kind);
        state.events.push(EventKind::ActionFinished, kind);
        self.commit = CommitState::Committed;
    }

    /// Linked regions mirror content edits made to their children
    fn update_linked_owners(&self, project: &mut Project) -> Result<(), ProjectError> {
        let mut owners: Vec<RegionIdentifier> = self
            .sel
            .objects()
            .iter()
            .chain(self.sel_after.objects())
            .filter_map(|o| o.id().owner_region())
            .collect();
        owners.sort();
        owners.dedup();
        for rid in owners {
            project.update_link_group(&rid)?;
        }
        Ok(())
    }
}

impl UndoableCommand for ArrangerSelectionsAction {
    fn execute(&mut self, state: &mut DawState) -> CommandResult<()> {
        self.do_or_undo(state, true);
        Ok(())
    }

    fn undo(&mut self, state: &mut DawState) -> CommandResult<()> {
        self.do_or_undo(state, false);
        Ok(())
    }

    fn description(&self) -> String {
        let verb = match self.kind {
            ActionKind::Create => "Create",
            ActionKind::Delete => "Delete",
            ActionKind::Move => "Move",
            ActionKind::Duplicate => "Duplicate",
            ActionKind::Link => "Link",
            ActionKind::Record => "Record",
            ActionKind::Edit(_) => "Edit",
            ActionKind::AutomationFill => return "Fill automation region".to_string(),
            ActionKind::Split { .. } => "Split",
            ActionKind::Merge => "Merge",
            ActionKind::Resize(_) => "Resize",
            ActionKind::Quantize(_) => "Quantize",
        };
        match self.sel.kind() {
            SelectionsKind::Timeline => format!("{} arranger selections", verb),
            kind => format!("{} {} selections", verb, kind),
        }
    }

    fn needs_pause(&self) -> bool {
        !matches!(self.kind, ActionKind::Edit(EditType::Name))
    }

    fn transport_ends(&self, performed: bool) -> Vec<Position> {
        if !performed || self.sel.kind() != SelectionsKind::Timeline {
            return Vec::new();
        }
        let sel = match self.kind {
            ActionKind::Create | ActionKind::Move => &self.sel,
            ActionKind::Duplicate
            | ActionKind::Link
            | ActionKind::Record
            | ActionKind::Resize(_)
            | ActionKind::Quantize(_)
            | ActionKind::Merge => &self.sel_after,
            _ => return Vec::new(),
        };
        sel.last_end().into_iter().collect()
    }
}

fn require_objects(sel: &ArrangerSelections) -> Result<(), ActionError> {
    if sel.is_empty() {
        Err(ActionError::EmptySelection)
    } else {
        Ok(())
    }
}

/// Before and after snapshots must describe the same objects
fn require_same_objects(
    before: &ArrangerSelections,
    after: &ArrangerSelections,
) -> Result<(), ActionError> {
    if before.kind() != after.kind() || before.ids() != after.ids() {
        return Err(ActionError::SelectionMismatch);
    }
    Ok(())
}

/// Re-inserts snapshot objects at their recorded slots, lowest first
fn insert_all(project: &mut Project, sel: &ArrangerSelections) -> Result<(), ProjectError> {
    let mut sorted = sel.clone();
    sorted.sort_by_indices(false);
    for obj in sorted.objects() {
        project.insert_object(obj.clone(), InsertMode::AtIndex)?;
    }
    Ok(())
}

/// Removes the live objects of `sel`, highest slot first
fn remove_all(project: &mut Project, sel: &ArrangerSelections) -> Result<(), ProjectError> {
    let mut sorted = sel.clone();
    sorted.sort_by_indices(true);
    for id in sorted.ids() {
        project.remove_object(&id)?;
    }
    Ok(())
}

/// Points a snapshot object at the identifier `shift` computes for it
fn reshift(obj: &mut ArrangerObject, shift: impl Fn(&mut ObjectId)) {
    let old = obj.id();
    let mut id = old;
    shift(&mut id);
    if id != old {
        obj.as_mut().set_id(id);
    }
}

fn shift_ids_after_insert(sel: &mut ArrangerSelections, inserted: &ObjectId) {
    for obj in sel.objects_mut() {
        reshift(obj, |id| shift_after_insert(id, inserted));
    }
}

fn shift_ids_after_removal(sel: &mut ArrangerSelections, removed: &ObjectId) {
    for obj in sel.objects_mut() {
        reshift(obj, |id| shift_after_removal(id, removed));
    }
}

/// Applies `deltas` to the live objects and to their snapshots
fn shift_objects(
    project: &mut Project,
    sel: &mut ArrangerSelections,
    deltas: &Deltas,
) -> Result<(), ProjectError> {
    for obj in sel.objects_mut() {
        deltas.apply_to(&mut project.find_mut(&obj.id())?);
        deltas.apply_to(&mut obj.as_mut());
    }
    Ok(())
}

/// Puts the moved fields of every object in `sel` back to `origin`, live
/// objects and snapshots alike.
fn restore_objects(
    project: &mut Project,
    sel: &mut ArrangerSelections,
    origin: &[ArrangerObject],
) -> Result<(), ProjectError> {
    for (obj, src) in sel.objects_mut().iter_mut().zip(origin) {
        project.find_mut(&obj.id())?.copy_move_state(src);
        obj.as_mut().copy_move_state(src);
    }
    Ok(())
}

/// Restores position order in every automation region the selection
/// touches and points the snapshots at the new slots.
fn resort_automation_points(
    project: &mut Project,
    sel: &mut ArrangerSelections,
    mut after: Option<&mut ArrangerSelections>,
) -> Result<(), ProjectError> {
    if sel.kind() != SelectionsKind::Automation {
        return Ok(());
    }
    let mut regions: Vec<RegionIdentifier> =
        sel.ids().iter().filter_map(|id| id.owner_region()).collect();
    regions.sort();
    regions.dedup();

    for rid in regions {
        let new_index = project.sort_automation_points(&rid)?;
        remap_points(sel, &rid, &new_index);
        if let Some(after) = after.as_deref_mut() {
            remap_points(after, &rid, &new_index);
        }
    }
    Ok(())
}

fn remap_points(sel: &mut ArrangerSelections, rid: &RegionIdentifier, new_index: &[usize]) {
    for obj in sel.objects_mut() {
        let id = obj.id();
        if id.owner_region().as_ref() != Some(rid) {
            continue;
        }
        if let Some(&idx) = new_index.get(id.index()) {
            obj.as_mut().set_id(id.with_index(idx));
        }
    }
}
