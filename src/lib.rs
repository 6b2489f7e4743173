#[cfg(feature = "cli")]
pub mod cli;
pub mod builder;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod selection;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;

pub use builder::build_graph;
pub use config::{Config, LayoutConfig, load_config};
pub use layout::{Layout, LayoutError, LayoutStrategy, compute_layout};
pub use model::{NetworkModel, parse_network};
pub use theme::{Theme, color_for};

/// Builds the graph and lays it out with the dagre-backed solver.
pub fn layout_network(
    model: &NetworkModel,
    config: &Config,
    strategy: LayoutStrategy,
) -> Result<Layout, LayoutError> {
    let graph = build_graph(model);
    compute_layout(&graph, model, config, strategy, &layout::DagreSolver)
}
