use std::error::Error;

use automaton::{
    automaton::advance,
    graph::{degrees, Graph, DEFAULT_EDGE_PROBABILITY, DEFAULT_NODE_COUNT},
    renderer::Renderer,
};
use clap::Parser;
use log::info;

/// Generate a sparse random graph, propagate node activity one step and draw it.
#[derive(Parser, Debug)]
#[command(name = "graph-automaton")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of nodes. A perfect square gives a regular grid.
    #[arg(short, long, default_value_t = DEFAULT_NODE_COUNT)]
    nodes: usize,

    /// Probability that any two nodes are connected.
    #[arg(short, long, default_value_t = DEFAULT_EDGE_PROBABILITY)]
    probability: f64,

    /// Seed for reproducible graphs.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Nodes to activate initially. Defaults to the center node.
    #[arg(short, long = "active")]
    active: Vec<usize>,

    /// Apply one activation step before drawing.
    #[arg(long)]
    step: bool,

    /// Print a summary instead of opening a window.
    #[arg(long)]
    headless: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut builder = Graph::builder()
        .node_count(cli.nodes)
        .edge_probability(cli.probability);
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    let mut graph = builder.build()?;

    seed_activity(&mut graph, &cli.active)?;

    info!(
        "graph with {} nodes and {} edges, {} active",
        graph.node_count(),
        graph.edge_count(),
        graph.active_nodes().len()
    );

    if cli.step {
        advance(&mut graph)?;
        info!("after one step {} nodes are active", graph.active_nodes().len());
    }

    if cli.headless {
        print!("{}", summary(&graph));
        return Ok(());
    }

    Renderer::new(graph).create_window()?;
    Ok(())
}

/// Activates `active`, or the center node when no node was given.
fn seed_activity(graph: &mut Graph, active: &[usize]) -> automaton::Result<()> {
    if active.is_empty() {
        return graph.activate(graph.center_node());
    }
    for node in active {
        graph.activate(*node)?;
    }
    Ok(())
}

fn summary(graph: &Graph) -> String {
    let max_degree = degrees(graph.edges()).into_values().max().unwrap_or(0);
    format!(
        "Nodes: {}\nEdges: {}\nMax degree: {}\nActive: {:?}\n",
        graph.node_count(),
        graph.edge_count(),
        max_degree,
        graph.active_nodes()
    )
}
