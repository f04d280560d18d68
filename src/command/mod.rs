// Command Pattern for Undo/Redo functionality
//
// Every edit of the project graph goes through UndoableCommand so that the
// CommandManager can replay it in both directions.
//
// Architecture:
// - UndoableCommand trait: execute(), undo(), description() plus the hooks the
//   manager runs around every step (audio pause, song length)
// - CommandManager: undo/redo stacks
// - ArrangerSelectionsAction: the one concrete command, editing groups of
//   arranger objects
// - DawState: everything a command may touch

pub mod arranger;
pub mod manager;
pub mod state;
pub mod trait_def;

pub use arranger::{ActionError, ActionKind, ArrangerSelectionsAction, CommitState, Deltas};
pub use manager::CommandManager;
pub use state::DawState;
pub use trait_def::{CommandError, CommandResult, UndoableCommand};
