// Record - Replace objects with what a recording pass left behind

use super::{ActionError, ActionKind, ArrangerSelectionsAction, insert_all, remove_all};
use crate::arranger::selections::ArrangerSelections;
use crate::command::state::DawState;
use crate::messaging::event::EventKind;
use crate::project::ProjectError;

impl ArrangerSelectionsAction {
    /// `before` holds the objects the recording overwrote (possibly none),
    /// `after` the objects it produced. With `already_recorded` the project
    /// already contains `after`.
    pub fn new_record(
        before: ArrangerSelections,
        after: ArrangerSelections,
        already_recorded: bool,
    ) -> Result<Self, ActionError> {
        if before.kind() != after.kind() {
            return Err(ActionError::SelectionMismatch);
        }
        if before.is_empty() && after.is_empty() {
            return Err(ActionError::EmptySelection);
        }
        let mut action = Self::with_kind(ActionKind::Record, before);
        action.sel_after = after;
        action.already_applied = already_recorded;
        Ok(action)
    }

    pub(super) fn do_or_undo_record(
        &mut self,
        state: &mut DawState,
        do_it: bool,
    ) -> Result<EventKind, ProjectError> {
        if self.skips_first_do(do_it) {
            return Ok(EventKind::SelectionsCreated);
        }
        let (remove, insert) = if do_it {
            (&self.sel, &self.sel_after)
        } else {
            (&self.sel_after, &self.sel)
        };
        remove_all(&mut state.project, remove)?;
        insert_all(&mut state.project, insert)?;
        Ok(EventKind::SelectionsCreated)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::arranger::selections::SelectionsKind;
    use crate::command::trait_def::UndoableCommand;

    #[test]
    fn test_record_over_existing_region() {
        let mut fx = Fixture::new();
        let old = fx.add_midi_region(0.0, 1920.0);
        let before = fx.select(SelectionsKind::Timeline, &[old]);

        // The recording pass replaced the region with a longer take
        fx.project().remove_object(&old).unwrap();
        let take = fx.add_midi_region(0.0, 3840.0);
        let after = fx.select(SelectionsKind::Timeline, &[take]);

        let mut action = ArrangerSelectionsAction::new_record(before, after, true).unwrap();
        action.execute(&mut fx.state).unwrap();
        assert_eq!(fx.project().find(&take).unwrap().end_pos().unwrap().ticks, 3840.0);

        action.undo(&mut fx.state).unwrap();
        assert_eq!(fx.project().find(&old).unwrap().end_pos().unwrap().ticks, 1920.0);

        action.execute(&mut fx.state).unwrap();
        assert_eq!(fx.project().find(&take).unwrap().end_pos().unwrap().ticks, 3840.0);
        assert_eq!(action.description(), "Record arranger selections");
    }

    #[test]
    fn test_record_into_empty_space() {
        let mut fx = Fixture::new();
        let region = fx.add_midi_region(0.0, 960.0);
        let after = fx.select(SelectionsKind::Timeline, &[region]);

        let mut action = ArrangerSelectionsAction::new_record(
            ArrangerSelections::new(SelectionsKind::Timeline),
            after,
            true,
        )
        .unwrap();
        action.execute(&mut fx.state).unwrap();
        action.undo(&mut fx.state).unwrap();
        assert!(fx.project().find(&region).is_err());
    }

    #[test]
    fn test_record_kinds_must_match() {
        assert_eq!(
            ArrangerSelectionsAction::new_record(
                ArrangerSelections::new(SelectionsKind::Timeline),
                ArrangerSelections::new(SelectionsKind::Midi),
                false,
            )
            .unwrap_err(),
            ActionError::SelectionMismatch
        );
        assert_eq!(
            ArrangerSelectionsAction::new_record(
                ArrangerSelections::new(SelectionsKind::Midi),
                ArrangerSelections::new(SelectionsKind::Midi),
                false,
            )
            .unwrap_err(),
            ActionError::EmptySelection
        );
    }
}
