//! Outbound notifications for the host UI.

use svedit_core::id::NodeId;

/// Queued by the session; the host drains them after each editor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// The selected node changed (`None` = deselected).
    SelectionChanged(Option<NodeId>),
    /// Size or handle positions may need refreshing.
    GeometryChanged(Option<NodeId>),
    /// Something mutated; repaint and refresh undo/redo UI state.
    StatusChanged,
    /// A text node was double-tapped.
    TextEditRequested(NodeId),
}
