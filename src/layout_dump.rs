use crate::layout::{HandleSide, Layout, PositionedNode, StyledEdge};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Node/edge document in the shape the rendering surface consumes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub position: PositionDump,
    pub style: StyleDump,
    pub data: DataDump,
    pub draggable: bool,
    pub selectable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_position: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_position: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct PositionDump {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDump {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct DataDump {
    pub label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub animated: bool,
    pub label: String,
    pub style: EdgeStyleDump,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<MarkerDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyleDump {
    pub stroke: String,
    pub stroke_width: f32,
}

#[derive(Debug, Serialize)]
pub struct MarkerDump {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn handle_name(side: HandleSide) -> &'static str {
    match side {
        HandleSide::Left => "left",
        HandleSide::Right => "right",
    }
}

impl NodeDump {
    fn from_node(node: &PositionedNode) -> Self {
        let style = &node.style;
        let is_group = node.kind.is_group();
        NodeDump {
            id: node.id.clone(),
            kind: node.kind.type_name(),
            position: PositionDump {
                x: node.position.x,
                y: node.position.y,
            },
            style: StyleDump {
                width: style.width,
                height: style.height,
                min_width: if is_group { style.width } else { None },
                min_height: if is_group { style.height } else { None },
                background: style.background.clone(),
                border: style.border.clone(),
                border_radius: style.border_radius,
                padding: style.padding,
                font_size: style.font_size,
                box_shadow: style.box_shadow.clone(),
                z_index: style.z_index,
            },
            data: DataDump {
                label: node.label.clone(),
            },
            draggable: node.draggable,
            selectable: node.selectable,
            parent_node: node.parent_group_id.clone(),
            extent: node.extent_parent.then_some("parent"),
            source_position: node.source_handle.map(handle_name),
            target_position: node.target_handle.map(handle_name),
        }
    }
}

impl EdgeDump {
    fn from_edge(edge: &StyledEdge) -> Self {
        EdgeDump {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            animated: edge.animated,
            label: edge.label.clone(),
            style: EdgeStyleDump {
                stroke: edge.style.stroke.clone(),
                stroke_width: edge.style.stroke_width,
            },
            marker_end: edge.marker_end.as_ref().map(|marker| MarkerDump {
                kind: marker.kind.type_name(),
                color: marker.color.clone(),
            }),
        }
    }
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        Self::from_parts(&layout.nodes, &layout.edges, None)
    }

    /// Dump with an explicit visible edge set, e.g. after a selection filter.
    pub fn from_parts(nodes: &[PositionedNode], edges: &[StyledEdge], selected: Option<&str>) -> Self {
        LayoutDump {
            nodes: nodes.iter().map(NodeDump::from_node).collect(),
            edges: edges.iter().map(EdgeDump::from_edge).collect(),
            selected: selected.map(str::to_string),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Writes the dump to `path`, or to stdout when no path is given.
pub fn write_layout_dump(path: Option<&Path>, dump: &LayoutDump) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, dump)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, dump)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{NodeKind, Position};
    use crate::theme::Theme;

    #[test]
    fn group_and_child_use_surface_field_names() {
        let theme = Theme::default();
        let group = PositionedNode::group(
            "region-us-east-1".into(),
            "us-east-1".into(),
            Position { x: 10.0, y: 20.0 },
            920.0,
            180.0,
            &theme,
        );
        let mut child = group.clone();
        child.id = "ep1".into();
        child.kind = NodeKind::Endpoint;
        child.parent_group_id = Some("region-us-east-1".into());
        child.extent_parent = true;

        let dump = LayoutDump::from_parts(&[group, child], &[], Some("ep1"));
        let value: serde_json::Value = serde_json::from_str(&dump.to_json().unwrap()).unwrap();
        assert_eq!(value["nodes"][0]["type"], "group");
        assert_eq!(value["nodes"][0]["style"]["minWidth"], 920.0);
        assert_eq!(value["nodes"][0]["draggable"], false);
        assert!(value["nodes"][0].get("parentNode").is_none());
        assert_eq!(value["nodes"][1]["type"], "pc");
        assert_eq!(value["nodes"][1]["parentNode"], "region-us-east-1");
        assert_eq!(value["nodes"][1]["extent"], "parent");
        assert_eq!(value["selected"], "ep1");
    }
}
