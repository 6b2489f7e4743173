mod error;
pub mod grid;
pub mod hierarchical;
pub mod session;
pub mod solver;
pub(crate) mod types;
pub use error::{LayoutError, SolverError};
pub use grid::{GroupBy, grid_layout};
pub use hierarchical::hierarchical_layout;
pub use session::{Completion, LayoutSession, LayoutTicket};
pub use solver::{DagreSolver, LayoutSolver};
pub use types::*;

use crate::config::Config;
use crate::ir::Graph;
use crate::model::NetworkModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutStrategy {
    /// Region containers placed by the hierarchical solver.
    #[default]
    Hierarchical,
    /// Flat grid, grouped as configured in `LayoutConfig::grid`.
    Grid,
}

pub fn compute_layout(
    graph: &Graph,
    model: &NetworkModel,
    config: &Config,
    strategy: LayoutStrategy,
    solver: &dyn LayoutSolver,
) -> Result<Layout, LayoutError> {
    match strategy {
        LayoutStrategy::Hierarchical => hierarchical_layout(graph, model, config, solver),
        LayoutStrategy::Grid => Ok(grid_layout(graph, model, &config.layout.grid, &config.theme)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_graph;
    use crate::model::parse_network;

    const NETWORK: &str = r#"{
        "vpcs": [
            {"vpcId": "v1", "name": "prod", "region": "us-east-1", "accountId": "111"},
            {"vpcId": "v2", "name": "edge", "region": "eu-central-1", "accountId": "222"}
        ],
        "vpcConnections": [
            {"vpcId": "v1", "networkInterfaceId": "eni-1", "resourceName": "ep1",
             "baseline": {"PRIVATE_OUTBOUND": {"ports": {"TCP": {"443": {"assets": [{"addressIP": "10.0.0.5", "resourceName": "db1"}]}}}}}},
            {"vpcId": "v2", "networkInterfaceId": "eni-2", "resourceName": "ep2",
             "baseline": {"PRIVATE_INBOUND": {"ports": {"UDP": {"53": {"assets": []}}}}}}
        ]
    }"#;

    #[test]
    fn strategies_share_edges() {
        let model = parse_network(NETWORK).unwrap();
        let graph = build_graph(&model);
        let config = Config::default();
        let grid = compute_layout(&graph, &model, &config, LayoutStrategy::Grid, &DagreSolver).unwrap();
        let tree =
            compute_layout(&graph, &model, &config, LayoutStrategy::Hierarchical, &DagreSolver).unwrap();
        assert_eq!(grid.edges.len(), 1);
        assert_eq!(tree.edges.len(), 1);
        assert_eq!(tree.groups().count(), 2);
        assert_eq!(tree.non_group_nodes().count(), graph.nodes.len());
    }
}
