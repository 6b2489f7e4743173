use std::collections::{HashMap, HashSet};

use super::types::{HandleSide, Layout, Marker, MarkerKind, Position, PositionedNode, StyledEdge};
pub use crate::config::GroupBy;
use crate::config::GridConfig;
use crate::ir::{Graph, GraphNode};
use crate::model::NetworkModel;
use crate::theme::Theme;

/// Flat fallback layout: endpoints grouped by region or account, each group a
/// `columns`-wide grid, groups stacked top to bottom with one empty row of
/// `spacing` between them. No containers and no solver.
pub fn grid_layout(graph: &Graph, model: &NetworkModel, grid: &GridConfig, theme: &Theme) -> Layout {
    let vpc_map = model.vpc_map();
    let columns = grid.columns.max(1);
    let spacing = grid.spacing;

    let mut groups: Vec<Vec<&GraphNode>> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for conn in &model.vpc_connections {
        let Some(node) = graph.node(conn.node_id()) else {
            continue;
        };
        let Some(vpc) = vpc_map.get(conn.vpc_id.as_str()) else {
            continue;
        };
        if !seen.insert(node.id.as_str()) {
            continue;
        }
        let key = match grid.group_by {
            GroupBy::Region => vpc.region.as_str(),
            GroupBy::Account => vpc.account_id.as_str(),
        };
        let idx = *group_index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[idx].push(node);
    }

    let mut nodes = Vec::new();
    let mut y_offset = 0.0;
    for group in &groups {
        for (index, node) in group.iter().enumerate() {
            let col = index % columns;
            let row = index / columns;
            let position = Position {
                x: col as f32 * spacing,
                y: y_offset + row as f32 * spacing,
            };
            let mut positioned = PositionedNode::from_graph_node(node, position, theme);
            positioned.source_handle = Some(HandleSide::Right);
            positioned.target_handle = Some(HandleSide::Left);
            nodes.push(positioned);
        }
        y_offset += group.len().div_ceil(columns) as f32 * spacing + spacing;
    }

    let edges = graph
        .edges
        .iter()
        .map(|edge| {
            let mut styled = StyledEdge::from_graph_edge(edge, theme);
            styled.marker_end = Some(Marker {
                kind: MarkerKind::ArrowClosed,
                color: None,
            });
            styled
        })
        .collect();

    Layout { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_graph;
    use crate::model::{Asset, PortAssets, Protocol, Vpc, VpcConnection};

    fn model() -> NetworkModel {
        let vpcs = vec![
            Vpc {
                vpc_id: "v1".into(),
                name: "a".into(),
                region: "us-east-1".into(),
                account_id: "111".into(),
            },
            Vpc {
                vpc_id: "v2".into(),
                name: "b".into(),
                region: "us-west-1".into(),
                account_id: "111".into(),
            },
        ];
        let mut vpc_connections = Vec::new();
        for i in 0..7 {
            let mut conn = VpcConnection {
                vpc_id: if i < 6 { "v1" } else { "v2" }.into(),
                network_interface_id: format!("eni-{i}"),
                resource_name: Some(format!("ep{i}")),
                ..Default::default()
            };
            conn.baseline.private_outbound.ports.get_mut(Protocol::Tcp).insert(
                "443".into(),
                PortAssets {
                    assets: vec![Asset {
                        address_ip: "10.0.0.1".into(),
                        resource_name: None,
                        resource_type: None,
                    }],
                },
            );
            vpc_connections.push(conn);
        }
        NetworkModel {
            vpcs,
            vpc_connections,
        }
    }

    #[test]
    fn stacks_region_groups_vertically() {
        let model = model();
        let graph = build_graph(&model);
        let layout = grid_layout(&graph, &model, &GridConfig::default(), &Theme::default());

        assert_eq!(layout.nodes.len(), 7);
        assert!(layout.groups().next().is_none());
        assert_eq!(layout.node("ep4").unwrap().position, Position { x: 1200.0, y: 0.0 });
        assert_eq!(layout.node("ep5").unwrap().position, Position { x: 0.0, y: 300.0 });
        // Six nodes take two rows, then one spacing gap.
        assert_eq!(layout.node("ep6").unwrap().position, Position { x: 0.0, y: 900.0 });
        assert_eq!(layout.node("ep0").unwrap().source_handle, Some(HandleSide::Right));
    }

    #[test]
    fn account_grouping_merges_regions() {
        let model = model();
        let graph = build_graph(&model);
        let grid = GridConfig {
            group_by: GroupBy::Account,
            ..GridConfig::default()
        };
        let layout = grid_layout(&graph, &model, &grid, &Theme::default());
        assert_eq!(layout.node("ep6").unwrap().position, Position { x: 300.0, y: 300.0 });
    }

    #[test]
    fn edges_get_closed_arrow_without_recolor() {
        let model = model();
        let graph = build_graph(&model);
        let theme = Theme::default();
        let layout = grid_layout(&graph, &model, &GridConfig::default(), &theme);
        assert_eq!(layout.edges.len(), 7);
        for edge in &layout.edges {
            assert_eq!(edge.style.stroke, theme.edge_stroke);
            assert_eq!(
                edge.marker_end,
                Some(Marker {
                    kind: MarkerKind::ArrowClosed,
                    color: None
                })
            );
        }
    }
}
