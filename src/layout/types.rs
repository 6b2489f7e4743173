use crate::ir::{GraphEdge, GraphNode, NodeRole};
use crate::model::Protocol;
use crate::theme::{Theme, region_color};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Region container.
    Group,
    Endpoint,
    Target,
}

impl NodeKind {
    pub fn from_role(role: NodeRole) -> Self {
        match role {
            NodeRole::Endpoint => NodeKind::Endpoint,
            NodeRole::Target => NodeKind::Target,
        }
    }

    /// Node type name understood by the rendering surface.
    pub fn type_name(self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Endpoint => "pc",
            NodeKind::Target => "server",
        }
    }

    pub fn is_group(self) -> bool {
        matches!(self, NodeKind::Group)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStyle {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub background: Option<String>,
    pub border: Option<String>,
    pub border_radius: Option<f32>,
    pub padding: Option<f32>,
    pub font_size: Option<f32>,
    pub box_shadow: Option<String>,
    pub z_index: Option<i32>,
}

impl NodeStyle {
    pub fn for_graph_node(node: &GraphNode, theme: &Theme) -> Self {
        Self {
            background: node.region.as_deref().map(|r| region_color(r).to_string()),
            border_radius: Some(theme.node_border_radius),
            padding: Some(theme.node_padding),
            font_size: Some(theme.font_size),
            ..Self::default()
        }
    }

    pub fn for_group(width: f32, height: f32, theme: &Theme) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            border: Some(theme.group_border.clone()),
            border_radius: Some(theme.group_border_radius),
            padding: Some(theme.group_padding),
            z_index: Some(0),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub kind: NodeKind,
    /// Relative to the parent group when `parent_group_id` is set.
    pub position: Position,
    pub style: NodeStyle,
    pub label: String,
    pub draggable: bool,
    pub selectable: bool,
    pub parent_group_id: Option<String>,
    /// Child movement is confined to the parent group.
    pub extent_parent: bool,
    pub source_handle: Option<HandleSide>,
    pub target_handle: Option<HandleSide>,
}

impl PositionedNode {
    pub fn from_graph_node(node: &GraphNode, position: Position, theme: &Theme) -> Self {
        Self {
            id: node.id.clone(),
            kind: NodeKind::from_role(node.role),
            position,
            style: NodeStyle::for_graph_node(node, theme),
            label: node.label.clone(),
            draggable: true,
            selectable: true,
            parent_group_id: None,
            extent_parent: false,
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn group(id: String, label: String, position: Position, width: f32, height: f32, theme: &Theme) -> Self {
        Self {
            id,
            kind: NodeKind::Group,
            position,
            style: NodeStyle::for_group(width, height, theme),
            label,
            draggable: false,
            selectable: false,
            parent_group_id: None,
            extent_parent: false,
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn width_or(&self, fallback: f32) -> f32 {
        self.style.width.unwrap_or(fallback)
    }

    pub fn height_or(&self, fallback: f32) -> f32 {
        self.style.height.unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    ArrowClosed,
}

impl MarkerKind {
    pub fn type_name(self) -> &'static str {
        match self {
            MarkerKind::ArrowClosed => "arrowclosed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub protocol: Protocol,
    pub port: String,
    pub label: String,
    pub animated: bool,
    pub style: EdgeStyle,
    pub marker_end: Option<Marker>,
}

impl StyledEdge {
    /// Edge with the builder's default stroke and no marker.
    pub fn from_graph_edge(edge: &GraphEdge, theme: &Theme) -> Self {
        Self {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            protocol: edge.protocol,
            port: edge.port.clone(),
            label: edge.label.clone(),
            animated: true,
            style: EdgeStyle {
                stroke: theme.edge_stroke.clone(),
                stroke_width: theme.edge_stroke_width,
            },
            marker_end: None,
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<StyledEdge>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &PositionedNode> {
        self.nodes.iter().filter(|node| node.kind.is_group())
    }

    pub fn non_group_nodes(&self) -> impl Iterator<Item = &PositionedNode> {
        self.nodes.iter().filter(|node| !node.kind.is_group())
    }

    /// Position in layout coordinates, resolving the parent group offset.
    pub fn absolute_position(&self, id: &str) -> Option<Position> {
        let node = self.node(id)?;
        let Some(parent_id) = node.parent_group_id.as_deref() else {
            return Some(node.position);
        };
        let parent = self.node(parent_id)?;
        Some(Position {
            x: parent.position.x + node.position.x,
            y: parent.position.y + node.position.y,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
