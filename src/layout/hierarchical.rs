use std::collections::{HashMap, HashSet};

use super::error::LayoutError;
use super::solver::{
    Algorithm, FlowDirection, LayoutOptions, LayoutSolver, SolverEdge, SolverGraph, SolverGroup,
    SolverLeaf,
};
use super::types::{Layout, Marker, MarkerKind, Position, PositionedNode, StyledEdge};
use crate::config::{Config, HierarchicalConfig};
use crate::ir::{Graph, GraphNode, NodeRole};
use crate::model::{NetworkModel, UNKNOWN_REGION};
use crate::theme::{Theme, color_for};

const ROOT_ID: &str = "root";
const GROUP_ID_PREFIX: &str = "region-";

/// Endpoints registered under one region, in registration order.
struct RegionGroup<'a> {
    region: String,
    members: Vec<&'a GraphNode>,
}

/// Region-grouped layout. Endpoints are clustered by the region of their VPC,
/// the clusters are placed by `solver`, and each cluster packs its endpoints in
/// a staggered grid. Targets reached by an edge go in a column to the right.
///
/// Input is never modified; every output record is freshly built.
pub fn hierarchical_layout(
    graph: &Graph,
    model: &NetworkModel,
    config: &Config,
    solver: &dyn LayoutSolver,
) -> Result<Layout, LayoutError> {
    if graph.is_empty() {
        return Ok(Layout::default());
    }

    let hcfg = &config.layout.hierarchical;
    let theme = &config.theme;

    let connection_nodes: HashMap<&str, &GraphNode> = graph
        .nodes_with_role(NodeRole::Endpoint)
        .map(|node| (node.id.as_str(), node))
        .collect();
    let target_nodes: Vec<&GraphNode> = graph.nodes_with_role(NodeRole::Target).collect();

    let groups = group_endpoints_by_region(model, &connection_nodes);
    let description = build_description(&groups, graph, hcfg);

    tracing::debug!(
        regions = description.children.len(),
        edges = description.edges.len(),
        "submitting region layout"
    );
    let solved = solver.solve(description)?;

    let mut nodes: Vec<PositionedNode> = Vec::new();
    let mut containers: Vec<(usize, f32, f32)> = Vec::new();
    for group in &groups {
        let solved_group = solved.group(&group.region);
        let solver_width = solved_group.and_then(|g| g.width).unwrap_or(0.0);
        let solver_height = solved_group.and_then(|g| g.height).unwrap_or(0.0);
        let (width, height) = hcfg.container_size(group.members.len(), solver_width, solver_height);
        let position = Position {
            x: solved_group.and_then(|g| g.x).unwrap_or(0.0),
            y: solved_group.and_then(|g| g.y).unwrap_or(0.0),
        };
        let group_id = format!("{GROUP_ID_PREFIX}{}", group.region);
        containers.push((nodes.len(), width, height));
        nodes.push(PositionedNode::group(
            group_id.clone(),
            group.region.clone(),
            position,
            width,
            height,
            theme,
        ));

        let columns = hcfg.columns.max(1);
        for (index, member) in group.members.iter().enumerate() {
            let col = index % columns;
            let row = index / columns;
            let position = Position {
                x: col as f32 * hcfg.cell_width + hcfg.origin_x,
                y: row as f32 * hcfg.cell_height + hcfg.origin_y + hcfg.stagger_for(col),
            };
            let mut child = PositionedNode::from_graph_node(member, position, theme);
            child.parent_group_id = Some(group_id.clone());
            child.extent_parent = true;
            nodes.push(child);
        }
    }

    separate_region_containers(&mut nodes, &containers, hcfg.region_spacing);

    let max_right = nodes
        .iter()
        .filter(|node| node.parent_group_id.is_none())
        .map(|node| node.position.x + node.width_or(hcfg.leaf_width))
        .fold(0.0_f32, f32::max);
    place_side_column(&mut nodes, &target_nodes, graph, max_right, hcfg, theme);

    let edges = graph
        .edges
        .iter()
        .map(|edge| restyle_edge(StyledEdge::from_graph_edge(edge, theme), theme))
        .collect();

    Ok(Layout { nodes, edges })
}

fn group_endpoints_by_region<'a>(
    model: &NetworkModel,
    connection_nodes: &HashMap<&str, &'a GraphNode>,
) -> Vec<RegionGroup<'a>> {
    let vpc_map = model.vpc_map();
    let mut groups: Vec<RegionGroup<'a>> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut registered: HashSet<&str> = HashSet::new();

    for conn in &model.vpc_connections {
        let node_id = conn.node_id();
        let Some(vpc) = vpc_map.get(conn.vpc_id.as_str()) else {
            tracing::debug!(connection = node_id, vpc = %conn.vpc_id, "unresolved vpc, not grouped");
            continue;
        };
        let Some(node) = connection_nodes.get(node_id) else {
            continue;
        };
        if !conn.baseline.has_traffic() {
            continue;
        }
        // A node id is laid out once, under the first region it maps to.
        if !registered.insert(node.id.as_str()) {
            continue;
        }

        let region = if vpc.region.is_empty() {
            UNKNOWN_REGION
        } else {
            vpc.region.as_str()
        };
        let idx = *group_index.entry(region.to_string()).or_insert_with(|| {
            groups.push(RegionGroup {
                region: region.to_string(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[idx].members.push(*node);
    }

    groups
}

fn build_description(groups: &[RegionGroup<'_>], graph: &Graph, hcfg: &HierarchicalConfig) -> SolverGraph {
    let group_options = LayoutOptions {
        algorithm: Algorithm::Tree,
        direction: FlowDirection::Right,
        padding: Some(hcfg.region_padding),
        node_spacing: hcfg.node_spacing,
    };

    let mut leaves: HashSet<&str> = HashSet::new();
    let children: Vec<SolverGroup> = groups
        .iter()
        .map(|group| SolverGroup {
            id: group.region.clone(),
            options: group_options,
            children: group
                .members
                .iter()
                .map(|node| {
                    leaves.insert(node.id.as_str());
                    SolverLeaf::new(node.id.clone(), hcfg.leaf_width, hcfg.leaf_height)
                })
                .collect(),
            x: None,
            y: None,
            width: None,
            height: None,
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .filter(|edge| leaves.contains(edge.source.as_str()) && leaves.contains(edge.target.as_str()))
        .map(|edge| SolverEdge {
            id: edge.id.clone(),
            sources: vec![edge.source.clone()],
            targets: vec![edge.target.clone()],
        })
        .collect();

    SolverGraph {
        id: ROOT_ID.to_string(),
        options: LayoutOptions {
            algorithm: Algorithm::Layered,
            direction: FlowDirection::Right,
            padding: None,
            node_spacing: hcfg.region_spacing,
        },
        children,
        edges,
    }
}

/// Containers are grown past the solver's size, so they can collide. Walk
/// them top to bottom and push each one down below any earlier container it
/// overlaps horizontally.
fn separate_region_containers(nodes: &mut [PositionedNode], containers: &[(usize, f32, f32)], gap: f32) {
    let mut order: Vec<(usize, f32, f32)> = containers.to_vec();
    order.sort_by(|a, b| {
        let ay = nodes[a.0].position.y;
        let by = nodes[b.0].position.y;
        ay.total_cmp(&by)
    });

    let overlaps = |a_min: f32, a_max: f32, b_min: f32, b_max: f32| a_min < b_max && b_min < a_max;
    let mut placed: Vec<(f32, f32, f32, f32)> = Vec::new();
    for (idx, width, height) in order {
        let min_x = nodes[idx].position.x;
        let max_x = min_x + width;
        let mut min_y = nodes[idx].position.y;

        let mut moved = true;
        while moved {
            moved = false;
            for &(px1, py1, px2, py2) in &placed {
                if overlaps(min_x, max_x, px1, px2) && overlaps(min_y, min_y + height, py1, py2) {
                    min_y = py2 + gap;
                    moved = true;
                }
            }
        }

        if min_y != nodes[idx].position.y {
            tracing::debug!(group = %nodes[idx].id, to = min_y, "shifted overlapping region");
            nodes[idx].position.y = min_y;
        }
        placed.push((min_x, min_y, max_x, min_y + height));
    }
}

fn place_side_column(
    nodes: &mut Vec<PositionedNode>,
    targets: &[&GraphNode],
    graph: &Graph,
    max_right: f32,
    hcfg: &HierarchicalConfig,
    theme: &Theme,
) {
    let linked: HashSet<&str> = graph
        .edges
        .iter()
        .flat_map(|edge| [edge.source.as_str(), edge.target.as_str()])
        .collect();
    let mut placed: HashSet<String> = nodes.iter().map(|node| node.id.clone()).collect();

    let x = max_right + hcfg.side_column_gap;
    let mut y = 0.0;
    for target in targets {
        if !linked.contains(target.id.as_str()) || placed.contains(&target.id) {
            continue;
        }
        placed.insert(target.id.clone());
        nodes.push(PositionedNode::from_graph_node(target, Position { x, y }, theme));
        y += hcfg.side_column_step;
    }
}

fn restyle_edge(mut edge: StyledEdge, theme: &Theme) -> StyledEdge {
    let color = color_for(&edge.target);
    edge.style.stroke = color.clone();
    edge.style.stroke_width = theme.layout_edge_stroke_width;
    edge.marker_end = Some(Marker {
        kind: MarkerKind::ArrowClosed,
        color: Some(color),
    });
    edge
}
