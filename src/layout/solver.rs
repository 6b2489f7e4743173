//! Contract with the external hierarchical layout engine.
//!
//! The adapter describes a two-level graph (root → region groups → leaves)
//! and receives the same structure back with coordinates filled in. Any
//! engine implementing [`LayoutSolver`] can be plugged in; [`DagreSolver`]
//! runs the description through dagre.

use std::collections::{HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};

use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};

use super::error::{SolverError, panic_message};
use crate::config::Padding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Tree-style placement of siblings.
    Tree,
    /// Layered (Sugiyama-style) flow.
    Layered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub algorithm: Algorithm,
    pub direction: FlowDirection,
    pub padding: Option<Padding>,
    pub node_spacing: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverLeaf {
    pub id: String,
    pub width: f32,
    pub height: f32,
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl SolverLeaf {
    pub fn new(id: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            x: None,
            y: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverGroup {
    pub id: String,
    pub options: LayoutOptions,
    pub children: Vec<SolverLeaf>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverEdge {
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverGraph {
    pub id: String,
    pub options: LayoutOptions,
    pub children: Vec<SolverGroup>,
    pub edges: Vec<SolverEdge>,
}

impl SolverGraph {
    pub fn group(&self, id: &str) -> Option<&SolverGroup> {
        self.children.iter().find(|group| group.id == id)
    }
}

pub trait LayoutSolver {
    /// Lays out the whole description in one call. No partial results: either
    /// every group comes back annotated or the attempt fails.
    fn solve(&self, graph: SolverGraph) -> Result<SolverGraph, SolverError>;
}

/// Dagre-backed solver.
///
/// Regions are not handed to dagre as compound clusters. Each region's leaves
/// are laid out on their own first, then the regions are laid out as plain
/// nodes sized to fit those leaves. Leaf coordinates come back relative to
/// their region's top-left corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagreSolver;

/// A node handed to one dagre pass: id, width, height.
type DagreInput<'a> = (&'a str, f32, f32);

fn dagre_rankdir(direction: FlowDirection) -> &'static str {
    match direction {
        FlowDirection::Right => "lr",
    }
}

/// Runs one non-compound dagre pass and returns top-left corners keyed by id.
fn run_dagre(
    nodes: &[DagreInput<'_>],
    edges: &[(String, String)],
    direction: FlowDirection,
    node_spacing: f32,
    rank_spacing: f32,
) -> Result<HashMap<String, (f32, f32)>, SolverError> {
    if nodes.is_empty() {
        return Ok(HashMap::new());
    }

    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some(dagre_rankdir(direction).to_string());
    graph_config.nodesep = Some(node_spacing);
    graph_config.ranksep = Some(rank_spacing);
    graph_config.marginx = Some(0.0);
    graph_config.marginy = Some(0.0);
    dagre_graph.set_graph(graph_config);

    for (id, width, height) in nodes {
        let mut node = DagreNode::default();
        node.width = *width;
        node.height = *height;
        dagre_graph.set_node(id.to_string(), Some(node));
    }
    for (from, to) in edges {
        let _ = dagre_graph.set_edge(from, to, Some(DagreEdge::default()), None);
    }

    catch_unwind(AssertUnwindSafe(|| dagre_layout::run_layout(&mut dagre_graph)))
        .map_err(|payload| SolverError::Panicked(panic_message(payload.as_ref())))?;

    let mut positions = HashMap::with_capacity(nodes.len());
    for (id, width, height) in nodes {
        let key = id.to_string();
        let Some(node) = dagre_graph.node(&key) else {
            return Err(SolverError::Rejected(format!("node {id} missing from dagre output")));
        };
        positions.insert(key, (node.x - width / 2.0, node.y - height / 2.0));
    }
    Ok(positions)
}

/// Shifts positions so the bounding box starts at the origin and returns its size.
fn normalize(positions: &mut HashMap<String, (f32, f32)>, nodes: &[DagreInput<'_>]) -> (f32, f32) {
    if positions.is_empty() {
        return (0.0, 0.0);
    }
    let mut min = (f32::MAX, f32::MAX);
    let mut max = (f32::MIN, f32::MIN);
    for &(id, width, height) in nodes {
        let Some(&(x, y)) = positions.get(id) else {
            continue;
        };
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x + width), max.1.max(y + height));
    }
    for (x, y) in positions.values_mut() {
        *x -= min.0;
        *y -= min.1;
    }
    (max.0 - min.0, max.1 - min.1)
}

impl LayoutSolver for DagreSolver {
    fn solve(&self, mut graph: SolverGraph) -> Result<SolverGraph, SolverError> {
        if graph.children.is_empty() {
            return Ok(graph);
        }

        let mut owner: HashMap<String, usize> = HashMap::new();
        for (idx, group) in graph.children.iter().enumerate() {
            for leaf in &group.children {
                if owner.insert(leaf.id.clone(), idx).is_some() {
                    return Err(SolverError::Rejected(format!(
                        "leaf {} registered in more than one group",
                        leaf.id
                    )));
                }
            }
        }

        let mut inner_edges: Vec<Vec<(String, String)>> = vec![Vec::new(); graph.children.len()];
        let mut outer_edges: Vec<(String, String)> = Vec::new();
        let mut leaf_pairs: HashSet<(&str, &str)> = HashSet::new();
        let mut group_pairs: HashSet<(usize, usize)> = HashSet::new();
        for edge in &graph.edges {
            for from in &edge.sources {
                for to in &edge.targets {
                    let (Some(&src), Some(&dst)) = (owner.get(from), owner.get(to)) else {
                        return Err(SolverError::Rejected(format!(
                            "edge {} references an unknown node",
                            edge.id
                        )));
                    };
                    if src != dst {
                        if group_pairs.insert((src, dst)) {
                            outer_edges.push((graph.children[src].id.clone(), graph.children[dst].id.clone()));
                        }
                    } else if from != to && leaf_pairs.insert((from.as_str(), to.as_str())) {
                        inner_edges[src].push((from.clone(), to.clone()));
                    }
                }
            }
        }

        // Pass one: leaves inside each group.
        for (group, edges) in graph.children.iter_mut().zip(&inner_edges) {
            let padding = group.options.padding.unwrap_or_default();
            let (positions, (inner_width, inner_height)) = {
                let inputs: Vec<DagreInput<'_>> = group
                    .children
                    .iter()
                    .map(|leaf| (leaf.id.as_str(), leaf.width, leaf.height))
                    .collect();
                let mut positions = run_dagre(
                    &inputs,
                    edges,
                    group.options.direction,
                    group.options.node_spacing,
                    group.options.node_spacing,
                )?;
                let extent = normalize(&mut positions, &inputs);
                (positions, extent)
            };

            for leaf in &mut group.children {
                if let Some(&(x, y)) = positions.get(&leaf.id) {
                    leaf.x = Some(x + padding.left);
                    leaf.y = Some(y + padding.top);
                }
            }
            group.width = Some(inner_width + padding.left + padding.right);
            group.height = Some(inner_height + padding.top + padding.bottom);
        }

        // Pass two: groups as plain nodes.
        let positions = {
            let inputs: Vec<DagreInput<'_>> = graph
                .children
                .iter()
                .map(|group| {
                    (
                        group.id.as_str(),
                        group.width.unwrap_or(0.0),
                        group.height.unwrap_or(0.0),
                    )
                })
                .collect();
            let mut positions = run_dagre(
                &inputs,
                &outer_edges,
                graph.options.direction,
                graph.options.node_spacing,
                graph.options.node_spacing,
            )?;
            normalize(&mut positions, &inputs);
            positions
        };

        for group in &mut graph.children {
            if let Some(&(x, y)) = positions.get(&group.id) {
                group.x = Some(x);
                group.y = Some(y);
            }
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(algorithm: Algorithm, spacing: f32) -> LayoutOptions {
        LayoutOptions {
            algorithm,
            direction: FlowDirection::Right,
            padding: None,
            node_spacing: spacing,
        }
    }

    fn group(id: &str, leaves: &[&str]) -> SolverGroup {
        SolverGroup {
            id: id.to_string(),
            options: options(Algorithm::Tree, 40.0),
            children: leaves.iter().map(|id| SolverLeaf::new(*id, 180.0, 60.0)).collect(),
            x: None,
            y: None,
            width: None,
            height: None,
        }
    }

    #[test]
    fn empty_description_is_returned_untouched() {
        let graph = SolverGraph {
            id: "root".into(),
            options: options(Algorithm::Layered, 80.0),
            children: Vec::new(),
            edges: Vec::new(),
        };
        let solved = DagreSolver.solve(graph.clone()).unwrap();
        assert_eq!(solved, graph);
    }

    #[test]
    fn duplicate_leaf_is_rejected() {
        let graph = SolverGraph {
            id: "root".into(),
            options: options(Algorithm::Layered, 80.0),
            children: vec![group("a", &["n1"]), group("b", &["n1"])],
            edges: Vec::new(),
        };
        assert!(matches!(
            DagreSolver.solve(graph),
            Err(SolverError::Rejected(_))
        ));
    }

    #[test]
    fn assigns_coordinates_to_groups_and_leaves() {
        let graph = SolverGraph {
            id: "root".into(),
            options: options(Algorithm::Layered, 80.0),
            children: vec![group("us-east-1", &["a", "b"]), group("eu-central-1", &["c"])],
            edges: vec![SolverEdge {
                id: "e-0".into(),
                sources: vec!["a".into()],
                targets: vec!["b".into()],
            }],
        };
        let solved = DagreSolver.solve(graph).unwrap();
        for group in &solved.children {
            assert!(group.x.is_some() && group.y.is_some());
            for leaf in &group.children {
                assert!(leaf.x.is_some() && leaf.y.is_some());
            }
        }
        assert_eq!(solved.group("us-east-1").unwrap().children.len(), 2);
    }

    #[test]
    fn groups_do_not_overlap_and_contain_their_leaves() {
        let mut padded = group("us-east-1", &["a", "b", "c"]);
        padded.options.padding = Some(Padding {
            top: 40.0,
            left: 20.0,
            bottom: 20.0,
            right: 20.0,
        });
        let graph = SolverGraph {
            id: "root".into(),
            options: options(Algorithm::Layered, 80.0),
            children: vec![padded, group("eu-central-1", &["d"]), group("ap-south-1", &["e", "f"])],
            edges: vec![
                SolverEdge {
                    id: "e-0".into(),
                    sources: vec!["a".into()],
                    targets: vec!["d".into()],
                },
                SolverEdge {
                    id: "e-1".into(),
                    sources: vec!["a".into()],
                    targets: vec!["d".into()],
                },
            ],
        };
        let solved = DagreSolver.solve(graph).unwrap();

        let rects: Vec<(f32, f32, f32, f32)> = solved
            .children
            .iter()
            .map(|g| {
                let (x, y) = (g.x.unwrap(), g.y.unwrap());
                (x, y, x + g.width.unwrap(), y + g.height.unwrap())
            })
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let overlap = a.0 < b.2 && b.0 < a.2 && a.1 < b.3 && b.1 < a.3;
                assert!(!overlap, "{a:?} overlaps {b:?}");
            }
        }

        for group in &solved.children {
            let (width, height) = (group.width.unwrap(), group.height.unwrap());
            for leaf in &group.children {
                let (x, y) = (leaf.x.unwrap(), leaf.y.unwrap());
                assert!(x >= 0.0 && y >= 0.0);
                assert!(x + leaf.width <= width + 0.01);
                assert!(y + leaf.height <= height + 0.01);
            }
        }
        let east = solved.group("us-east-1").unwrap();
        assert!(east.children.iter().all(|leaf| leaf.x.unwrap() >= 20.0 && leaf.y.unwrap() >= 40.0));
    }

    #[test]
    fn edge_to_unknown_leaf_is_rejected() {
        let graph = SolverGraph {
            id: "root".into(),
            options: options(Algorithm::Layered, 80.0),
            children: vec![group("a", &["n1"])],
            edges: vec![SolverEdge {
                id: "e-0".into(),
                sources: vec!["n1".into()],
                targets: vec!["ghost".into()],
            }],
        };
        assert!(matches!(
            DagreSolver.solve(graph),
            Err(SolverError::Rejected(_))
        ));
    }
}
