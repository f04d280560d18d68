// Automation fill - Replace an automation region after drawing into it

use super::{ActionError, ActionKind, ArrangerSelectionsAction};
use crate::arranger::identifier::RegionKind;
use crate::arranger::object::ArrangerObject;
use crate::arranger::selections::{ArrangerSelections, SelectionsKind};
use crate::command::state::DawState;
use crate::messaging::event::EventKind;
use crate::project::ProjectError;

fn is_automation_region(obj: &ArrangerObject) -> bool {
    obj.as_region()
        .is_some_and(|r| r.id.kind == RegionKind::Automation)
}

impl ArrangerSelectionsAction {
    /// `before` and `after` are the same automation region before and after
    /// the drawing gesture. With `already_changed` the live region already
    /// holds the drawn points.
    pub fn new_automation_fill(
        before: ArrangerObject,
        after: ArrangerObject,
        already_changed: bool,
    ) -> Result<Self, ActionError> {
        if !is_automation_region(&before) || !is_automation_region(&after) {
            return Err(ActionError::WrongObjectKind {
                expected: "automation region",
            });
        }
        if before.id() != after.id() {
            return Err(ActionError::SelectionMismatch);
        }

        let sel = ArrangerSelections::from_objects(SelectionsKind::Timeline, [before])?;
        let mut action = Self::with_kind(ActionKind::AutomationFill, sel);
        action.sel_after = ArrangerSelections::from_objects(SelectionsKind::Timeline, [after])?;
        action.already_applied = already_changed;
        Ok(action)
    }

    pub(super) fn do_or_undo_fill(
        &mut self,
        state: &mut DawState,
        do_it: bool,
    ) -> Result<EventKind, ProjectError> {
        if self.skips_first_do(do_it) {
            return Ok(EventKind::RedrawEverything);
        }
        let project = &mut state.project;
        let src = if do_it { &self.sel_after } else { &self.sel };
        for obj in src.objects() {
            let Some(rid) = obj.id().as_region().copied() else {
                continue;
            };
            // Link membership belongs to the live region, not the snapshot
            let mut replacement = obj.clone();
            if let Some(region) = replacement.as_region_mut() {
                region.link_group = project.region(&rid)?.link_group;
            }
            project.replace_object(replacement)?;
            project.update_link_group(&rid)?;
        }
        Ok(EventKind::RedrawEverything)
    }
}
