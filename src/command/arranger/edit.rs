// Edit - Copy one field set between before and after snapshots
//
// The live objects are never replaced, only the fields named by the edit type
// are copied onto them. Audio edits write the captured frames back into the
// region's clip.

use super::{
    ActionError, ActionKind, ArrangerSelectionsAction, require_objects, require_same_objects,
    resort_automation_points,
};
use crate::arranger::functions::{AudioFunction, AutomationFunction, MidiFunction};
use crate::arranger::object::EditType;
use crate::arranger::selections::{ArrangerSelections, AudioSelection, SelectionsError, SelectionsKind};
use crate::command::state::DawState;
use crate::messaging::event::EventKind;
use crate::project::{Project, ProjectError};

impl ArrangerSelectionsAction {
    /// Edit from `before` to `after`. With `already_edited` the live objects
    /// already look like `after`.
    pub fn new_edit(
        before: ArrangerSelections,
        after: Option<ArrangerSelections>,
        edit_type: EditType,
        already_edited: bool,
    ) -> Result<Self, ActionError> {
        let after = after.ok_or(ActionError::MissingAfterSelections)?;
        require_objects(&before)?;
        require_same_objects(&before, &after)?;
        if edit_type == EditType::Name && before.contains_unrenamable_object() {
            return Err(ActionError::Unrenamable);
        }
        if before.kind() == SelectionsKind::Audio {
            let same_range = match (before.audio(), after.audio()) {
                (Some(a), Some(b)) => {
                    a.region == b.region && a.start_frame == b.start_frame && a.end_frame == b.end_frame
                }
                _ => false,
            };
            if !same_range {
                return Err(ActionError::SelectionMismatch);
            }
        }

        let mut action = Self::with_kind(ActionKind::Edit(edit_type), before);
        action.sel_after = after;
        action.already_applied = already_edited;
        Ok(action)
    }

    pub fn new_edit_midi_function(
        sel: ArrangerSelections,
        function: MidiFunction,
    ) -> Result<Self, ActionError> {
        if sel.kind() != SelectionsKind::Midi {
            return Err(ActionError::WrongObjectKind { expected: "MIDI notes" });
        }
        let mut after = sel.clone();
        function.apply(&mut after)?;
        Self::new_edit(sel, Some(after), EditType::EditorFunction, false)
    }

    pub fn new_edit_automation_function(
        sel: ArrangerSelections,
        function: AutomationFunction,
    ) -> Result<Self, ActionError> {
        if sel.kind() != SelectionsKind::Automation {
            return Err(ActionError::WrongObjectKind {
                expected: "automation points",
            });
        }
        let mut after = sel.clone();
        function.apply(&mut after)?;
        Self::new_edit(sel, Some(after), EditType::EditorFunction, false)
    }

    pub fn new_edit_audio_function(
        sel: ArrangerSelections,
        function: AudioFunction,
    ) -> Result<Self, ActionError> {
        if sel.kind() != SelectionsKind::Audio {
            return Err(ActionError::WrongObjectKind { expected: "audio range" });
        }
        let mut after = sel.clone();
        let audio = after.audio_mut().ok_or(SelectionsError::MissingAudioRange)?;
        function.apply(&mut audio.frames);
        log::debug!("{:?} on {} frames of {}", function, audio.end_frame - audio.start_frame, audio.region);
        Self::new_edit(sel, Some(after), EditType::EditorFunction, false)
    }

    pub(super) fn do_or_undo_edit(
        &mut self,
        state: &mut DawState,
        do_it: bool,
        edit: EditType,
    ) -> Result<EventKind, ProjectError> {
        let project = &mut state.project;
        if !self.skips_first_do(do_it) {
            let src = if do_it { &self.sel_after } else { &self.sel };
            for obj in src.objects() {
                project.find_mut(&obj.id())?.apply_edit(obj, edit);
                if let (EditType::EditorFunction, Some(rid)) = (edit, obj.id().as_region()) {
                    project.update_link_group(rid)?;
                }
            }
            if let Some(audio) = src.audio() {
                write_audio(project, audio)?;
            }
        }
        resort_automation_points(project, &mut self.sel, Some(&mut self.sel_after))?;
        Ok(EventKind::SelectionsChanged)
    }
}

fn write_audio(project: &mut Project, audio: &AudioSelection) -> Result<(), ProjectError> {
    let clip = project
        .region(&audio.region)?
        .clip()
        .ok_or(ProjectError::NotAnAudioRegion(audio.region))?;
    project.pool.write_frames(clip, audio.start_frame, &audio.frames)?;
    Ok(())
}
