//! Click-driven edge filtering.
//!
//! The full edge set is snapshotted once per completed layout and never
//! changed afterwards; every filter is recomputed from that snapshot.

use std::sync::Arc;

use crate::layout::{NodeKind, PositionedNode, StyledEdge};
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Unselected,
    Selected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeClick {
    pub node_id: String,
    pub kind: NodeKind,
}

impl NodeClick {
    pub fn new(node_id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            node_id: node_id.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Selection {
    original: Arc<[StyledEdge]>,
    state: SelectionState,
    visible: Vec<StyledEdge>,
}

impl Selection {
    pub fn new(edges: Vec<StyledEdge>) -> Self {
        let original: Arc<[StyledEdge]> = edges.into();
        Self {
            visible: original.to_vec(),
            original,
            state: SelectionState::Unselected,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> Option<&str> {
        match &self.state {
            SelectionState::Selected(id) => Some(id.as_str()),
            SelectionState::Unselected => None,
        }
    }

    pub fn visible_edges(&self) -> &[StyledEdge] {
        &self.visible
    }

    pub fn original_edges(&self) -> &[StyledEdge] {
        &self.original
    }

    /// Applies a click. Returns `false` when the click caused no transition
    /// (group containers are ignored).
    pub fn click(&mut self, click: &NodeClick) -> bool {
        if click.kind.is_group() {
            return false;
        }
        if self.selected() == Some(click.node_id.as_str()) {
            self.show_all();
            return true;
        }
        self.visible = self
            .original
            .iter()
            .filter(|edge| edge.touches(&click.node_id))
            .cloned()
            .collect();
        self.state = SelectionState::Selected(click.node_id.clone());
        true
    }

    pub fn show_all(&mut self) {
        self.state = SelectionState::Unselected;
        self.visible = self.original.to_vec();
    }
}

/// Copies of `nodes` with the selected node highlighted. Groups are never
/// highlighted and never selectable.
pub fn highlight_selected(nodes: &[PositionedNode], selected: Option<&str>, theme: &Theme) -> Vec<PositionedNode> {
    nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            if node.kind.is_group() {
                node.selectable = false;
                return node;
            }
            if selected == Some(node.id.as_str()) {
                node.style.border = Some(theme.selected_border.clone());
                node.style.box_shadow = Some(theme.selected_shadow.clone());
            } else {
                node.style.border.get_or_insert_with(|| theme.node_border.clone());
                node.style.box_shadow = None;
            }
            node
        })
        .collect()
}
