// CommandManager - Manages undo/redo stacks

use crate::command::state::DawState;
use crate::command::trait_def::{CommandError, CommandResult, UndoableCommand};
use crate::config::EngineConfig;
use std::collections::VecDeque;

/// Default maximum number of commands to keep in history
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Manages command execution and undo/redo functionality
///
/// The CommandManager maintains two stacks:
/// - Undo stack: Commands that have been executed and can be undone
/// - Redo stack: Commands that have been undone and can be redone
///
/// Every run of a command (execute, undo or redo) goes through the same
/// steps:
/// 1. Pause the audio thread if the command restructures the graph
/// 2. Run the command
/// 3. Grow the song length to cover the command's objects
///
/// # Memory Management
/// The manager limits the number of commands in the undo stack to prevent
/// unbounded memory growth. When the limit is reached, the oldest command
/// is removed.
pub struct CommandManager {
    /// Stack of commands that can be undone (most recent at the back)
    undo_stack: VecDeque<Box<dyn UndoableCommand>>,

    /// Stack of commands that can be redone (most recent at the back)
    redo_stack: VecDeque<Box<dyn UndoableCommand>>,

    /// Maximum number of commands to keep in history
    max_history: usize,
}

impl CommandManager {
    /// Create a new CommandManager with default settings
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }

    /// Create a new CommandManager with a custom history limit
    pub fn with_capacity(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_history),
            redo_stack: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_capacity(config.undo_history)
    }

    /// Execute a command and add it to the undo stack
    ///
    /// The redo stack is cleared (new timeline) and the oldest command is
    /// dropped once the history limit is exceeded.
    ///
    /// # Errors
    /// Returns an error if the command execution fails; the command is then
    /// discarded.
    pub fn execute(
        &mut self,
        mut command: Box<dyn UndoableCommand>,
        state: &mut DawState,
    ) -> CommandResult<()> {
        Self::run(command.as_mut(), state, true)?;

        self.undo_stack.push_back(command);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
        }

        Ok(())
    }

    /// Undo the last command
    ///
    /// Pops the last command from the undo stack, undoes it, and pushes it to the redo stack.
    /// Returns the description of the undone command.
    pub fn undo(&mut self, state: &mut DawState) -> CommandResult<String> {
        let mut command = self.undo_stack.pop_back().ok_or(CommandError::NothingToUndo)?;
        let description = command.description();

        if let Err(e) = Self::run(command.as_mut(), state, false) {
            // Keep the command where it was so the history stays consistent
            self.undo_stack.push_back(command);
            return Err(e);
        }

        self.redo_stack.push_back(command);
        Ok(description)
    }

    /// Redo the last undone command
    ///
    /// Pops the last command from the redo stack, executes it again, and pushes it to the undo stack.
    pub fn redo(&mut self, state: &mut DawState) -> CommandResult<String> {
        let mut command = self.redo_stack.pop_back().ok_or(CommandError::NothingToRedo)?;
        let description = command.description();

        if let Err(e) = Self::run(command.as_mut(), state, true) {
            self.redo_stack.push_back(command);
            return Err(e);
        }

        self.undo_stack.push_back(command);
        Ok(description)
    }

    fn run(
        command: &mut dyn UndoableCommand,
        state: &mut DawState,
        perform: bool,
    ) -> CommandResult<()> {
        let gate = state.gate.clone();
        let _paused = command.needs_pause().then(|| gate.pause());

        if perform {
            command.execute(state)?;
        } else {
            command.undo(state)?;
        }

        let ends = command.transport_ends(perform);
        if !ends.is_empty() {
            state.project.transport.recalculate_total_bars(ends);
        }

        log::debug!(
            "{} {}",
            if perform { "performed" } else { "undid" },
            command.description()
        );
        Ok(())
    }

    /// Check if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get a description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|cmd| cmd.description())
    }

    /// Get a description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.back().map(|cmd| cmd.description())
    }

    /// Clear all command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get the number of commands in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of commands in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}
