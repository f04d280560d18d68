// Quantize - Snap object edges to the grid

use super::{
    ActionError, ActionKind, ArrangerSelectionsAction, require_objects, resort_automation_points,
};
use crate::arranger::object::{EditType, ResizeType};
use crate::arranger::selections::ArrangerSelections;
use crate::command::state::DawState;
use crate::messaging::event::EventKind;
use crate::project::ProjectError;
use crate::sequencer::quantize::QuantizeOptions;

impl ArrangerSelectionsAction {
    /// The quantized positions are computed here, once; do and undo only
    /// copy positions.
    pub fn new_quantize(sel: ArrangerSelections, opts: QuantizeOptions) -> Result<Self, ActionError> {
        if !opts.is_valid() {
            return Err(ActionError::InvalidQuantize);
        }
        require_objects(&sel)?;

        let mut after = sel.clone();
        for obj in after.objects_mut() {
            if opts.adjust_start {
                let mut start = obj.pos();
                let delta = opts.quantize_position(&mut start);
                obj.as_mut().move_by_ticks(delta);
            }
            if let (true, Some(old_end)) = (opts.adjust_end, obj.end_pos()) {
                let mut end = old_end;
                opts.quantize_position(&mut end);
                // Never collapse an object
                if end.ticks > obj.pos().ticks {
                    obj.as_mut().resize(ResizeType::R, end.ticks - old_end.ticks);
                }
            }
        }

        let mut action = Self::with_kind(ActionKind::Quantize(opts), sel);
        action.sel_after = after;
        Ok(action)
    }

    pub(super) fn do_or_undo_quantize(
        &mut self,
        state: &mut DawState,
        do_it: bool,
    ) -> Result<EventKind, ProjectError> {
        let project = &mut state.project;
        let src = if do_it { &self.sel_after } else { &self.sel };
        for obj in src.objects() {
            project.find_mut(&obj.id())?.apply_edit(obj, EditType::Position);
        }
        resort_automation_points(project, &mut self.sel, Some(&mut self.sel_after))?;
        Ok(EventKind::SelectionsQuantized)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::arranger::selections::SelectionsKind;
    use crate::command::trait_def::UndoableCommand;

    #[test]
    fn test_quantize_note_starts() {
        let mut fx = Fixture::new();
        let region = fx.add_midi_region(0.0, 3840.0);
        let a = fx.add_note(region, 500.0, 740.0, 60);
        let b = fx.add_note(region, 800.0, 900.0, 62);
        let sel = fx.select(SelectionsKind::Midi, &[a, b]);

        let mut action = ArrangerSelectionsAction::new_quantize(sel, QuantizeOptions::default()).unwrap();
        action.execute(&mut fx.state).unwrap();
        let a_now = fx.project().find(&a).unwrap();
        assert_eq!(a_now.pos().ticks, 480.0);
        assert_eq!(a_now.end_pos().unwrap().ticks, 720.0);
        assert_eq!(fx.project().find(&b).unwrap().pos().ticks, 960.0);
        assert_eq!(action.description(), "Quantize MIDI selections");

        action.undo(&mut fx.state).unwrap();
        assert_eq!(fx.project().find(&a).unwrap().pos().ticks, 500.0);
        assert_eq!(fx.project().find(&b).unwrap().pos().ticks, 800.0);
    }

    #[test]
    fn test_quantize_ends_keeps_length_positive() {
        let mut fx = Fixture::new();
        let region = fx.add_midi_region(0.0, 3840.0);
        let long = fx.add_note(region, 0.0, 500.0, 60);
        let short = fx.add_note(region, 0.0, 100.0, 62);
        let opts = QuantizeOptions {
            adjust_start: false,
            adjust_end: true,
            ..QuantizeOptions::default()
        };
        let sel = fx.select(SelectionsKind::Midi, &[long, short]);

        let mut action = ArrangerSelectionsAction::new_quantize(sel, opts).unwrap();
        action.execute(&mut fx.state).unwrap();
        assert_eq!(fx.project().find(&long).unwrap().end_pos().unwrap().ticks, 480.0);
        assert_eq!(fx.project().find(&short).unwrap().end_pos().unwrap().ticks, 100.0);
    }

    #[test]
    fn test_quantize_region_end_keeps_it_unlooped() {
        let mut fx = Fixture::new();
        let region = fx.add_midi_region(100.0, 1000.0);
        let opts = QuantizeOptions {
            adjust_end: true,
            ..QuantizeOptions::default()
        };
        let sel = fx.select(SelectionsKind::Timeline, &[region]);

        let mut action = ArrangerSelectionsAction::new_quantize(sel, opts).unwrap();
        action.execute(&mut fx.state).unwrap();
        let quantized = fx.project().find(&region).unwrap();
        assert_eq!(quantized.pos().ticks, 0.0);
        assert_eq!(quantized.end_pos().unwrap().ticks, 960.0);
        assert!(!quantized.is_looped());
    }

    #[test]
    fn test_quantize_automation_points() {
        let mut fx = Fixture::new();
        let region = fx.add_automation_region(0.0, 3840.0);
        let p0 = fx.add_point(region, 10.0, 0.1);
        let p1 = fx.add_point(region, 1000.0, 0.9);
        let sel = fx.select(SelectionsKind::Automation, &[p0, p1]);

        let mut action = ArrangerSelectionsAction::new_quantize(sel, QuantizeOptions::default()).unwrap();
        action.execute(&mut fx.state).unwrap();
        let points = fx.project().region(region.as_region().unwrap()).unwrap().points().to_vec();
        assert_eq!(points[0].base.pos.ticks, 0.0);
        assert_eq!(points[1].base.pos.ticks, 960.0);
        assert_eq!(fx.router.soft_recalcs(), 1);
    }

    #[test]
    fn test_invalid_options() {
        let mut fx = Fixture::new();
        let region = fx.add_midi_region(0.0, 960.0);
        let sel = fx.select(SelectionsKind::Timeline, &[region]);
        assert_eq!(
            ArrangerSelectionsAction::new_quantize(sel, QuantizeOptions::new(0.0)).unwrap_err(),
            ActionError::InvalidQuantize
        );
    }
}
