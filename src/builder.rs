use crate::ir::{Graph, GraphEdge, NodeRole};
use crate::model::{NetworkModel, Protocol, UNKNOWN_REGION};

/// Turns the network document into the canonical node/edge graph.
///
/// Connections are visited in document order. A connection with no port map
/// in either direction is skipped entirely. Only outbound traffic produces
/// edges: one per (protocol, port, asset), from the connection endpoint to the
/// asset target. Inbound traffic only counts towards "has traffic".
pub fn build_graph(model: &NetworkModel) -> Graph {
    let vpc_map = model.vpc_map();
    let mut graph = Graph::new();
    let mut skipped = 0usize;

    for conn in &model.vpc_connections {
        if !conn.baseline.has_traffic() {
            skipped += 1;
            tracing::debug!(connection = conn.node_id(), "skipping connection without traffic");
            continue;
        }

        let source_id = conn.node_id();
        let region = vpc_map
            .get(conn.vpc_id.as_str())
            .map(|vpc| vpc.region.as_str())
            .filter(|region| !region.is_empty())
            .unwrap_or(UNKNOWN_REGION);

        if graph.ensure_node(source_id, NodeRole::Endpoint, None) {
            if let Some(node) = graph.node_mut(source_id) {
                node.region = Some(region.to_string());
            }
        }

        let outbound = &conn.baseline.private_outbound.ports;
        for protocol in Protocol::ALL {
            for (port, entry) in outbound.ports_in_order(protocol) {
                for asset in &entry.assets {
                    let target_id = asset.node_id();
                    graph.ensure_node(target_id, NodeRole::Target, None);
                    let id = format!("e-{}", graph.edges.len());
                    graph.push_edge(GraphEdge {
                        id,
                        source: source_id.to_string(),
                        target: target_id.to_string(),
                        protocol,
                        port: port.to_string(),
                        label: format!("{protocol} {port}"),
                    });
                }
            }
        }
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        skipped,
        "built network graph"
    );
    graph
}
