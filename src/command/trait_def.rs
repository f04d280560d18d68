// UndoableCommand trait definition

use crate::command::state::DawState;
use crate::sequencer::timeline::Position;

/// Result type for command operations
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors that can occur while running a command through the history
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Undo failed: {0}")]
    UndoFailed(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Trait for commands that support undo/redo
///
/// Every edit of the project graph goes through this trait so that it can be
/// replayed in both directions. `execute` is called once when the edit is
/// made and again for every redo; `undo` must restore the graph to the state
/// it had before the matching `execute`.
///
/// # Thread Safety
/// Commands must be Send as the history may be handed to another thread.
pub trait UndoableCommand: Send {
    /// Execute (or redo) the command
    fn execute(&mut self, state: &mut DawState) -> CommandResult<()>;

    /// Undo the command
    fn undo(&mut self, state: &mut DawState) -> CommandResult<()>;

    /// Get a human-readable description of the command
    ///
    /// Used for UI display (e.g., "Undo: Move arranger selections")
    fn description(&self) -> String;

    /// Whether the audio thread has to be kept out of the graph while the
    /// command runs.
    fn needs_pause(&self) -> bool {
        false
    }

    /// Object end positions the song length must cover after the command was
    /// executed (`performed`) or undone. Empty means the length is unaffected.
    fn transport_ends(&self, _performed: bool) -> Vec<Position> {
        Vec::new()
    }
}
