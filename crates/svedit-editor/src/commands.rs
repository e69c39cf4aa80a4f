//! Undo/Redo command stack.
//!
//! Every reversible mutation is described by a `Command` value holding the
//! node it targets and the state to write. [`Session::apply`] writes the
//! state and hands back the inverse command, captured from the state it
//! overwrote. The stack only ever stores inverses: undo applies one and
//! parks *its* inverse on the redo stack, and vice versa.

use crate::session::Session;
use kurbo::Point;
use svedit_core::geometry::Geometry;
use svedit_core::id::NodeId;
use svedit_core::model::NodeKind;

/// A reversible edit, expressed as the state it writes.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Move the node so its identity-transform frame starts at `origin`.
    Translate { id: NodeId, origin: Point },

    /// Replace the whole geometry (rotation, direction changes).
    Transform { id: NodeId, geometry: Geometry },

    /// Replace geometry and content together (pinch, width edits). The
    /// content carries the rescaled path or the text being resized.
    Resize {
        id: NodeId,
        geometry: Geometry,
        kind: Box<NodeKind>,
    },

    /// Replace content and opacity, plus the geometry the content was
    /// laid out to.
    Restyle {
        id: NodeId,
        kind: Box<NodeKind>,
        opacity: f32,
        geometry: Geometry,
    },

    /// Detach from the paint order and hide.
    Remove { id: NodeId },

    /// Re-attach at `index` with `geometry` and make visible again.
    Restore {
        id: NodeId,
        index: usize,
        geometry: Geometry,
    },
}

impl Command {
    pub fn node(&self) -> NodeId {
        match self {
            Command::Translate { id, .. }
            | Command::Transform { id, .. }
            | Command::Resize { id, .. }
            | Command::Restyle { id, .. }
            | Command::Remove { id }
            | Command::Restore { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    command: Command,
    description: String,
}

/// The linear undo history of one editing session.
#[derive(Debug, Default)]
pub struct CommandStack {
    undo_stack: Vec<Entry>,
    redo_stack: Vec<Entry>,
    /// Maximum undo depth; `None` is unbounded.
    max_depth: Option<usize>,
}

impl CommandStack {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Record the inverse of a mutation that has already happened.
    pub fn register(&mut self, inverse: Command, description: &str) {
        log::trace!("register {description} on {}", inverse.node());
        self.undo_stack.push(Entry {
            command: inverse,
            description: description.to_string(),
        });
        if let Some(max) = self.max_depth
            && self.undo_stack.len() > max
        {
            let excess = self.undo_stack.len() - max;
            self.undo_stack.drain(..excess);
        }

        // Clear redo stack on new action
        self.redo_stack.clear();
    }

    /// Apply `command` through the session and register its inverse.
    /// Returns `false` (registering nothing) when the command's node is
    /// not in the scene.
    pub fn execute(&mut self, session: &mut Session, command: Command, description: &str) -> bool {
        match session.apply(command) {
            Some(inverse) => {
                self.register(inverse, description);
                true
            }
            None => false,
        }
    }

    /// Undo the most recent step. Steps whose node has left the scene are
    /// dropped and the next one is tried.
    pub fn undo(&mut self, session: &mut Session) -> Option<String> {
        while let Some(entry) = self.undo_stack.pop() {
            let node = entry.command.node();
            match session.apply(entry.command) {
                Some(inverse) => {
                    log::debug!("undo {} on {node}", entry.description);
                    self.redo_stack.push(Entry {
                        command: inverse,
                        description: entry.description.clone(),
                    });
                    return Some(entry.description);
                }
                None => log::debug!("undo {}: {node} is gone, dropping", entry.description),
            }
        }
        None
    }

    /// Redo the most recently undone step.
    pub fn redo(&mut self, session: &mut Session) -> Option<String> {
        while let Some(entry) = self.redo_stack.pop() {
            let node = entry.command.node();
            match session.apply(entry.command) {
                Some(inverse) => {
                    log::debug!("redo {} on {node}", entry.description);
                    self.undo_stack.push(Entry {
                        command: inverse,
                        description: entry.description.clone(),
                    });
                    return Some(entry.description);
                }
                None => log::debug!("redo {}: {node} is gone, dropping", entry.description),
            }
        }
        None
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Description of the step `undo` would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.description.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
