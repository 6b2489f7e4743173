use std::collections::HashMap;

use crate::model::Protocol;

/// Default footprint of a graph node, matching the hierarchical layout leaf size.
pub const DEFAULT_NODE_SIZE: Size = Size {
    width: 180.0,
    height: 60.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Derived from a connection record; originates traffic.
    Endpoint,
    /// Derived from an asset referenced by outbound traffic.
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub role: NodeRole,
    pub label: String,
    /// Region of the owning VPC, endpoints only.
    pub region: Option<String>,
    pub size_hint: Size,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub protocol: Protocol,
    pub port: String,
    pub label: String,
}

impl GraphEdge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Canonical node/edge graph. Nodes keep insertion order and are unique by id.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    index: HashMap<String, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the node on first sight. Returns `false` when the id was already
    /// present; the existing node (and its label) is kept.
    pub fn ensure_node(&mut self, id: &str, role: NodeRole, label: Option<String>) -> bool {
        if self.index.contains_key(id) {
            return false;
        }
        self.index.insert(id.to_string(), self.nodes.len());
        self.nodes.push(GraphNode {
            id: id.to_string(),
            role,
            label: label.unwrap_or_else(|| id.to_string()),
            region: None,
            size_hint: DEFAULT_NODE_SIZE,
        });
        true
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|idx| &self.nodes[*idx])
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        match self.index.get(id) {
            Some(idx) => self.nodes.get_mut(*idx),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn push_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
    }

    pub fn nodes_with_role(&self, role: NodeRole) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |node| node.role == role)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
