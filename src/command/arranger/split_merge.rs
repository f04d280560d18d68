// Split and merge
//
// Both replace a set of objects wholesale: the originals stay in `sel`, the
// replacements are computed once when the action is built and kept in
// `sel_after` with the slots they will occupy.

use super::{ActionError, ActionKind, ArrangerSelectionsAction, insert_all, remove_all, require_objects};
use crate::arranger::selections::ArrangerSelections;
use crate::command::state::DawState;
use crate::messaging::event::EventKind;
use crate::project::{Project, ProjectError};
use crate::sequencer::timeline::Position;

impl ArrangerSelectionsAction {
    /// Splits every object at `pos`, given in the objects' own time base
    /// (timeline for regions, region-local for notes).
    pub fn new_split(sel: ArrangerSelections, pos: Position) -> Result<Self, ActionError> {
        require_objects(&sel)?;
        if !sel.objects().iter().all(|o| o.can_split_at(pos)) {
            return Err(ActionError::InvalidSplitPosition(pos));
        }

        let mut after = ArrangerSelections::new(sel.kind());
        for obj in sel.objects() {
            let id = obj.id();
            let (mut first, mut second) = obj
                .split(pos)
                .ok_or(ActionError::InvalidSplitPosition(pos))?;
            // Every split before this one in the same container pushes it
            // one slot further
            let earlier = sel
                .objects()
                .iter()
                .filter(|o| {
                    let other = o.id();
                    other.container() == id.container() && other.index() < id.index()
                })
                .count();
            let idx = id.index() + earlier;
            first.as_mut().set_id(id.with_index(idx));
            second.as_mut().set_id(id.with_index(idx + 1));
            after.add_object(first)?;
            after.add_object(second)?;
        }

        let mut action = Self::with_kind(ActionKind::Split { pos }, sel);
        action.sel_after = after;
        Ok(action)
    }

    /// Merges two or more regions of one lane into a single region
    /// Audio regions are mixed into a new clip of the project pool.
    pub fn new_merge(project: &mut Project, sel: ArrangerSelections) -> Result<Self, ActionError> {
        require_objects(&sel)?;
        if !sel.can_be_merged() {
            return Err(ActionError::NotMergeable);
        }
        let merged = sel.merge(&mut project.pool, &project.transport)?;
        let after = ArrangerSelections::from_objects(sel.kind(), [merged])?;

        let mut action = Self::with_kind(ActionKind::Merge, sel);
        action.sel_after = after;
        Ok(action)
    }

    pub(super) fn do_or_undo_split_merge(
        &mut self,
        state: &mut DawState,
        do_it: bool,
    ) -> Result<EventKind, ProjectError> {
        let (remove, insert) = if do_it {
            (&self.sel, &self.sel_after)
        } else {
            (&self.sel_after, &self.sel)
        };
        remove_all(&mut state.project, remove)?;
        insert_all(&mut state.project, insert)?;
        Ok(EventKind::RedrawEverything)
    }
}
