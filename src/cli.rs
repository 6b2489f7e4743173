use crate::builder::build_graph;
use crate::config::{GroupBy, load_config};
use crate::layout::{DagreSolver, LayoutSession, LayoutStrategy, compute_layout};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::model::parse_network;
use crate::selection::{NodeClick, highlight_selected};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "vpcgraph", version, about = "Lay out VPC connection baselines as a node/edge graph")]
pub struct Args {
    /// Network JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the layout JSON. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout strategy
    #[arg(short = 'l', long = "layout", value_enum, default_value = "hierarchical")]
    pub layout: LayoutArg,

    /// Grouping key for the grid layout
    #[arg(long = "group-by", value_enum)]
    pub group_by: Option<GroupByArg>,

    /// Config JSON file (layout constants and theme)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Select a node before writing, keeping only its edges
    #[arg(long = "select")]
    pub select: Option<String>,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LayoutArg {
    Hierarchical,
    Grid,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum GroupByArg {
    Region,
    Account,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(group_by) = args.group_by {
        config.layout.grid.group_by = match group_by {
            GroupByArg::Region => GroupBy::Region,
            GroupByArg::Account => GroupBy::Account,
        };
    }
    let strategy = match args.layout {
        LayoutArg::Hierarchical => LayoutStrategy::Hierarchical,
        LayoutArg::Grid => LayoutStrategy::Grid,
    };

    let input = read_input(args.input.as_deref())?;
    let model = parse_network(&input)?;
    let graph = build_graph(&model);

    let mut session = LayoutSession::new();
    let ticket = session.begin();
    let result = compute_layout(&graph, &model, &config, strategy, &DagreSolver);
    session.complete(ticket, result)?;

    let Some(layout) = session.layout().cloned() else {
        return Err(anyhow::anyhow!("layout did not complete"));
    };
    tracing::info!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        "layout complete"
    );

    if let Some(node_id) = args.select.as_deref() {
        let Some(node) = layout.node(node_id) else {
            return Err(anyhow::anyhow!("node not found in layout: {node_id}"));
        };
        session.click(&NodeClick::new(node_id, node.kind));
    }

    let (selected, edges) = match session.selection() {
        Some(selection) => (selection.selected(), selection.visible_edges()),
        None => (None, layout.edges.as_slice()),
    };
    let nodes = highlight_selected(&layout.nodes, selected, &config.theme);
    let dump = LayoutDump::from_parts(&nodes, edges, selected);
    write_layout_dump(args.output.as_deref(), &dump)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
