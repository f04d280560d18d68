// Resize - Drag an edge of objects with length

use super::{
    ActionError, ActionKind, ArrangerSelectionsAction, require_objects, require_same_objects,
};
use crate::arranger::object::ResizeType;
use crate::arranger::selections::ArrangerSelections;
use crate::command::state::DawState;
use crate::messaging::event::EventKind;
use crate::project::ProjectError;

impl ArrangerSelectionsAction {
    /// Resizes `sel` by `ticks` on the edge named by `resize_type`.
    ///
    /// `after` is the state the gesture left the objects in. It is required
    /// with `already_resized`; otherwise it is computed from `sel` when
    /// missing.
    pub fn new_resize(
        sel: ArrangerSelections,
        after: Option<ArrangerSelections>,
        resize_type: ResizeType,
        ticks: f64,
        already_resized: bool,
    ) -> Result<Self, ActionError> {
        require_objects(&sel)?;
        let objects = sel.objects();
        if objects.iter().any(|o| !o.has_length()) {
            return Err(ActionError::Unresizable);
        }
        let incompatible = |reason| ActionError::IncompatibleResize {
            resize: resize_type,
            reason,
        };
        if resize_type.is_loop() && !objects.iter().all(|o| o.can_loop()) {
            return Err(incompatible("objects that cannot loop"));
        }
        if resize_type.is_fade() && !objects.iter().all(|o| o.can_fade()) {
            return Err(incompatible("objects without fades"));
        }
        if (resize_type.is_stretch() || matches!(resize_type, ResizeType::L | ResizeType::R))
            && objects.iter().any(|o| o.is_looped())
        {
            return Err(incompatible("looped objects"));
        }

        let after = match after {
            Some(after) => {
                require_same_objects(&sel, &after)?;
                after
            }
            None if already_resized => return Err(ActionError::MissingAfterSelections),
            None => {
                let mut after = sel.clone();
                for obj in after.objects_mut() {
                    obj.as_mut().resize(resize_type, ticks);
                }
                after
            }
        };

        let mut action = Self::with_kind(ActionKind::Resize(resize_type), sel);
        action.sel_after = after;
        action.deltas.ticks = ticks;
        action.already_applied = already_resized;
        Ok(action)
    }

    pub(super) fn do_or_undo_resize(
        &mut self,
        state: &mut DawState,
        do_it: bool,
    ) -> Result<EventKind, ProjectError> {
        if self.skips_first_do(do_it) {
            return Ok(EventKind::SelectionsChanged);
        }
        let project = &mut state.project;
        let src = if do_it { &self.sel_after } else { &self.sel };
        for obj in src.objects() {
            project.replace_object(obj.clone())?;
            if let Some(rid) = obj.id().as_region() {
                project.update_link_group(rid)?;
            }
        }
        Ok(EventKind::SelectionsChanged)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::arranger::identifier::ObjectId;
    use crate::arranger::region::Region;
    use crate::arranger::selections::SelectionsKind;
    use crate::command::trait_def::UndoableCommand;

    fn region_with_notes(fx: &mut Fixture) -> ObjectId {
        let region = fx.add_midi_region(0.0, 1920.0);
        for start in [0.0, 480.0, 960.0, 1440.0] {
            fx.add_note(region, start, start + 240.0, 60);
        }
        region
    }

    #[test]
    fn test_every_resize_type_round_trips() {
        let cases: [(ResizeType, f64, fn(&Region) -> f64, f64); 8] = [
            (ResizeType::L, 480.0, |r| r.base.pos.ticks, 480.0),
            (ResizeType::R, 960.0, |r| r.end_pos.ticks, 2880.0),
            (ResizeType::LLoop, 480.0, |r| r.clip_start_pos.ticks, 480.0),
            (ResizeType::RLoop, 1920.0, |r| r.end_pos.ticks, 3840.0),
            (ResizeType::LFade, 240.0, |r| r.fade_in_pos.ticks, 240.0),
            (ResizeType::RFade, -240.0, |r| r.fade_out_pos.ticks, 1680.0),
            (ResizeType::LStretch, 960.0, |r| r.notes()[1].base.pos.ticks, 240.0),
            (ResizeType::RStretch, 1920.0, |r| r.notes()[1].base.pos.ticks, 960.0),
        ];

        for (resize_type, ticks, field, expected) in cases {
            let mut fx = Fixture::new();
            let region = region_with_notes(&mut fx);
            let original = fx.project().find(&region).unwrap();
            let sel = fx.select(SelectionsKind::Timeline, &[region]);

            let mut action =
                ArrangerSelectionsAction::new_resize(sel, None, resize_type, ticks, false).unwrap();
            action.execute(&mut fx.state).unwrap();
            let resized = fx.project().find(&region).unwrap();
            assert_eq!(field(resized.as_region().unwrap()), expected, "{:?}", resize_type);

            action.undo(&mut fx.state).unwrap();
            assert_eq!(fx.project().find(&region).unwrap(), original, "{:?}", resize_type);
        }
    }

    #[test]
    fn test_resize_note() {
        let mut fx = Fixture::new();
        let region = fx.add_midi_region(0.0, 1920.0);
        let note = fx.add_note(region, 0.0, 480.0, 60);
        let sel = fx.select(SelectionsKind::Midi, &[note]);

        let mut action =
            ArrangerSelectionsAction::new_resize(sel, None, ResizeType::R, 480.0, false).unwrap();
        action.execute(&mut fx.state).unwrap();
        assert_eq!(fx.project().find(&note).unwrap().end_pos().unwrap().ticks, 960.0);
        action.undo(&mut fx.state).unwrap();
        assert_eq!(fx.project().find(&note).unwrap().end_pos().unwrap().ticks, 480.0);
    }

    #[test]
    fn test_resize_grows_song_through_manager() {
        use crate::command::manager::CommandManager;

        let mut fx = Fixture::new();
        let ts = fx.project().transport.time_signature;
        let end = crate::sequencer::timeline::Position::from_bars(127, &ts).ticks;
        let region = fx.add_midi_region(0.0, end);
        let sel = fx.select(SelectionsKind::Timeline, &[region]);

        let action =
            ArrangerSelectionsAction::new_resize(sel, None, ResizeType::R, 3840.0, false).unwrap();
        let mut manager = CommandManager::new();
        manager.execute(Box::new(action), &mut fx.state).unwrap();
        // The region now ends at the start of bar 129
        assert_eq!(fx.project().transport.total_bars(), 133);
    }

    #[test]
    fn test_left_resize_of_linked_region_updates_group() {
        let mut fx = Fixture::new();
        let a = region_with_notes(&mut fx);
        let b = fx.add_midi_region(1920.0, 3840.0);
        let (ra, rb) = (*a.as_region().unwrap(), *b.as_region().unwrap());
        let (group, _) = fx.project().create_link_group_if_none(&ra).unwrap();
        fx.project().link_region(&rb, group).unwrap();
        fx.project().update_link_group(&ra).unwrap();
        let sel = fx.select(SelectionsKind::Timeline, &[a]);

        let mut action =
            ArrangerSelectionsAction::new_resize(sel, None, ResizeType::L, 480.0, false).unwrap();
        action.execute(&mut fx.state).unwrap();
        assert_eq!(fx.project().region(&rb).unwrap().notes()[1].base.pos.ticks, 0.0);

        action.undo(&mut fx.state).unwrap();
        assert_eq!(fx.project().region(&rb).unwrap().notes()[1].base.pos.ticks, 480.0);
        assert_eq!(fx.project().link_groups.len(), 1);
    }

    #[test]
    fn test_already_resized_needs_after() {
        let mut fx = Fixture::new();
        let region = fx.add_midi_region(0.0, 1920.0);
        let sel = fx.select(SelectionsKind::Timeline, &[region]);
        assert_eq!(
            ArrangerSelectionsAction::new_resize(sel, None, ResizeType::R, 10.0, true).unwrap_err(),
            ActionError::MissingAfterSelections
        );
    }

    #[test]
    fn test_incompatible_resizes() {
        let mut fx = Fixture::new();
        let region = fx.add_midi_region(0.0, 1920.0);
        let note = fx.add_note(region, 0.0, 480.0, 60);

        let notes = fx.select(SelectionsKind::Midi, &[note]);
        assert!(matches!(
            ArrangerSelectionsAction::new_resize(notes.clone(), None, ResizeType::RLoop, 10.0, false),
            Err(ActionError::IncompatibleResize { resize: ResizeType::RLoop, .. })
        ));
        assert!(matches!(
            ArrangerSelectionsAction::new_resize(notes, None, ResizeType::LFade, 10.0, false),
            Err(ActionError::IncompatibleResize { .. })
        ));

        let markers = fx.select(SelectionsKind::Timeline, &[ObjectId::Marker { index: 0 }]);
        assert_eq!(
            ArrangerSelectionsAction::new_resize(markers, None, ResizeType::R, 10.0, false)
                .unwrap_err(),
            ActionError::Unresizable
        );

        fx.project().find_mut(&region).unwrap().resize(ResizeType::RLoop, 960.0);
        let looped = fx.select(SelectionsKind::Timeline, &[region]);
        assert!(matches!(
            ArrangerSelectionsAction::new_resize(looped, None, ResizeType::RStretch, 10.0, false),
            Err(ActionError::IncompatibleResize { .. })
        ));
    }
}
