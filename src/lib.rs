// MyMusic arranger - Library exports for tests and benchmarks
//
// Undoable editing of arranger objects (regions, notes, automation points,
// chords, scales, markers) on top of a slot-indexed project graph.

pub mod arranger;
pub mod audio;
pub mod command;
pub mod config;
pub mod messaging;
pub mod project;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use arranger::{
    ArrangerObject, ArrangerSelections, EditType, ObjectId, RegionIdentifier, ResizeType,
    SelectionsKind,
};
pub use audio::{GraphRecalc, ProcessGate, Router};
pub use command::{
    ActionError, ArrangerSelectionsAction, CommandManager, DawState, Deltas, UndoableCommand,
};
pub use config::{EngineConfig, Settings};
pub use messaging::{ArrangerEvent, EventKind, EventQueue};
pub use project::{Project, ProjectError};
pub use sequencer::{Position, QuantizeOptions, TimeSignature, Transport};
