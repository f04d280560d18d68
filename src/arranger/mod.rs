// Arranger module - Editable objects and the selections that group them
//
// identifier: containment-path keys (never addresses)
// object:     closed sum type over every editable entity
// region:     regions and their local content
// selections: ordered clone lists used as before/after snapshots
// functions:  MIDI/automation/audio editor functions

pub mod functions;
pub mod identifier;
pub mod object;
pub mod region;
pub mod selections;

pub use functions::{AudioFunction, AutomationFunction, MidiFunction};
pub use identifier::{ChildIdentifier, ContainerKey, ObjectId, RegionIdentifier, RegionKind, TrackKey};
pub use object::{
    ArrangerObject, AutomationPoint, ChordObject, EditType, Marker, MarkerKind, MidiNote,
    ObjectMut, ResizeType, ScaleObject,
};
pub use region::{LinkGroupId, Region, RegionContent};
pub use selections::{ArrangerSelections, AudioSelection, SelectionsError, SelectionsKind};
