// Create and delete

use super::{
    ActionError, ActionKind, ArrangerSelectionsAction, insert_all, remove_all, require_objects,
};
use crate::arranger::selections::{ArrangerSelections, SelectionsKind};
use crate::command::state::DawState;
use crate::config::Settings;
use crate::messaging::event::EventKind;
use crate::project::ProjectError;

impl ArrangerSelectionsAction {
    /// Records objects the user just created. They are already in the
    /// project, so the first do only checks that they are there.
    pub fn new_create(sel: ArrangerSelections) -> Result<Self, ActionError> {
        require_objects(&sel)?;
        let mut action = Self::with_kind(ActionKind::Create, sel);
        action.already_applied = true;
        Ok(action)
    }

    pub fn new_delete(sel: ArrangerSelections) -> Result<Self, ActionError> {
        require_objects(&sel)?;
        if sel.contains_undeletable_object() {
            return Err(ActionError::Undeletable);
        }
        Ok(Self::with_kind(ActionKind::Delete, sel))
    }

    pub(super) fn do_or_undo_create_delete(
        &mut self,
        state: &mut DawState,
        do_it: bool,
        create: bool,
    ) -> Result<EventKind, ProjectError> {
        if do_it != create {
            remove_all(&mut state.project, &self.sel)?;
            return Ok(EventKind::SelectionsRemoved);
        }

        if self.skips_first_do(do_it) {
            for id in self.sel.ids() {
                state.project.find(&id)?;
            }
            self.remember_object_length(&mut state.settings);
        } else {
            insert_all(&mut state.project, &self.sel)?;
        }
        Ok(EventKind::SelectionsCreated)
    }

    /// The next object drawn in the same editor gets the length of the one
    /// just created.
    fn remember_object_length(&self, settings: &mut Settings) {
        let [obj] = self.sel.objects() else {
            return;
        };
        let Some(length) = obj.length_ticks() else {
            return;
        };
        if self.sel.kind() == SelectionsKind::Timeline {
            settings.timeline_last_object_length = length;
        } else {
            settings.editor_last_object_length = length;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::arranger::identifier::ObjectId;
    use crate::arranger::object::ArrangerObject;
    use crate::command::trait_def::UndoableCommand;
    use crate::messaging::event::ArrangerEvent;

    #[test]
    fn test_create_undo_redo() {
        let mut fx = Fixture::new();
        let region = fx.add_midi_region(0.0, 1920.0);
        let sel = fx.select(SelectionsKind::Timeline, &[region]);

        let mut action = ArrangerSelectionsAction::new_create(sel).unwrap();
        action.execute(&mut fx.state).unwrap();
        assert!(fx.project().find(&region).is_ok());
        assert_eq!(fx.state.settings.timeline_last_object_length, 1920.0);

        action.undo(&mut fx.state).unwrap();
        assert!(fx.project().find(&region).is_err());

        action.execute(&mut fx.state).unwrap();
        assert_eq!(fx.project().find(&region).unwrap().pos().ticks, 0.0);
        assert_eq!(fx.router.hard_recalcs(), 3);
    }

    #[test]
    fn test_create_events() {
        let mut fx = Fixture::new();
        let region = fx.add_midi_region(0.0, 960.0);
        let sel = fx.select(SelectionsKind::Timeline, &[region]);

        let mut action = ArrangerSelectionsAction::new_create(sel).unwrap();
        action.execute(&mut fx.state).unwrap();
        assert_eq!(
            fx.drain_events(),
            vec![
                ArrangerEvent::new(EventKind::SelectionsCreated, SelectionsKind::Timeline),
                ArrangerEvent::new(EventKind::ActionFinished, SelectionsKind::Timeline),
            ]
        );
    }

    #[test]
    fn test_delete_restores_slots() {
        let mut fx = Fixture::new();
        let a = fx.add_midi_region(0.0, 960.0);
        let b = fx.add_midi_region(960.0, 1920.0);
        let c = fx.add_midi_region(1920.0, 2880.0);
        let sel = fx.select(SelectionsKind::Timeline, &[a, c]);

        let mut action = ArrangerSelectionsAction::new_delete(sel).unwrap();
        action.execute(&mut fx.state).unwrap();
        // b slid down into slot 0
        assert_eq!(fx.project().find(&a).unwrap().pos().ticks, 960.0);
        assert!(fx.project().find(&b).is_err());

        action.undo(&mut fx.state).unwrap();
        assert_eq!(fx.project().find(&a).unwrap().pos().ticks, 0.0);
        assert_eq!(fx.project().find(&b).unwrap().pos().ticks, 960.0);
        assert_eq!(fx.project().find(&c).unwrap().pos().ticks, 1920.0);
    }

    #[test]
    fn test_delete_unordered_selection() {
        let mut fx = Fixture::new();
        let a = fx.add_midi_region(0.0, 960.0);
        let b = fx.add_midi_region(960.0, 1920.0);
        let c = fx.add_midi_region(1920.0, 2880.0);
        // Highest slot first; reinsertion still has to go lowest first
        let sel = fx.select(SelectionsKind::Timeline, &[c, a]);

        let mut action = ArrangerSelectionsAction::new_delete(sel).unwrap();
        action.execute(&mut fx.state).unwrap();
        assert_eq!(fx.project().find(&a).unwrap().pos().ticks, 960.0);

        action.undo(&mut fx.state).unwrap();
        assert_eq!(fx.project().find(&a).unwrap().pos().ticks, 0.0);
        assert_eq!(fx.project().find(&b).unwrap().pos().ticks, 960.0);
        assert_eq!(fx.project().find(&c).unwrap().pos().ticks, 1920.0);
        fx.project().verify().unwrap();
    }

    #[test]
    fn test_delete_notes() {
        let mut fx = Fixture::new();
        let region = fx.add_midi_region(0.0, 3840.0);
        let n0 = fx.add_note(region, 0.0, 480.0, 60);
        let n1 = fx.add_note(region, 480.0, 960.0, 62);
        let sel = fx.select(SelectionsKind::Midi, &[n0]);

        let mut action = ArrangerSelectionsAction::new_delete(sel).unwrap();
        action.execute(&mut fx.state).unwrap();
        assert_eq!(fx.project().region(region.as_region().unwrap()).unwrap().notes().len(), 1);
        assert_eq!(action.description(), "Delete MIDI selections");

        action.undo(&mut fx.state).unwrap();
        match fx.project().find(&n1).unwrap() {
            ArrangerObject::MidiNote(n) => assert_eq!(n.pitch, 62),
            other => panic!("unexpected {:?}", other),
        }
        // MIDI edits never touch the routing graph
        assert_eq!(fx.router.hard_recalcs(), 0);
    }

    #[test]
    fn test_start_marker_cannot_be_deleted() {
        let mut fx = Fixture::new();
        let sel = fx.select(SelectionsKind::Timeline, &[ObjectId::Marker { index: 0 }]);
        assert_eq!(
            ArrangerSelectionsAction::new_delete(sel).unwrap_err(),
            ActionError::Undeletable
        );
    }

    #[test]
    fn test_empty_selection_rejected() {
        assert_eq!(
            ArrangerSelectionsAction::new_delete(ArrangerSelections::new(SelectionsKind::Midi))
                .unwrap_err(),
            ActionError::EmptySelection
        );
    }
}
