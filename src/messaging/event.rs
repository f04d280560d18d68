// Arranger events - What an action step changed, for the UI to redraw

use crate::arranger::selections::SelectionsKind;

/// Kind of change reported after an action step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Objects were added to the project
    SelectionsCreated,
    /// Objects were removed from the project
    SelectionsRemoved,
    /// Objects changed position, track or lane
    SelectionsMoved,
    SelectionsQuantized,
    /// Object properties changed in place
    SelectionsChanged,
    /// Objects were replaced wholesale; every arranger must redraw
    RedrawEverything,
    /// Sent once at the end of every do/undo step
    ActionFinished,
}

/// Notification pushed to the UI thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrangerEvent {
    pub kind: EventKind,
    pub selections: SelectionsKind,
}

impl ArrangerEvent {
    pub fn new(kind: EventKind, selections: SelectionsKind) -> Self {
        Self { kind, selections }
    }
}
