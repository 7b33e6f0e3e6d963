//! Bonfire Visualizer command line
//!
//! Runs the graph, layout and session crates without a browser.
//!
//! # Usage
//!
//! ```bash
//! # Degree-ranked nodes, optionally restricted to some groups
//! bonfire-viz weights --filter actor,tag
//!
//! # Neighbors of one node
//! bonfire-viz neighbors tag:governance
//!
//! # Positions for one view
//! bonfire-viz --seed 7 layout force --select actor:1
//!
//! # Viewer + remote against an in-process session
//! bonfire-viz simulate --cycle-ms 1000 --steps 3
//! ```
//!
//! JSON goes to stdout; logs go to stderr (`RUST_LOG` overrides the level).

use anyhow::Result;
use bonfire_graph::NodeGroup;
use bonfire_protocol::ViewMode;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

mod commands;
mod config;

use commands::{LayoutRequest, SimulateOptions};
use config::VizConfig;

#[derive(Parser)]
#[command(name = "bonfire-viz")]
#[command(version)]
#[command(about = "Layouts and session sync for the Bonfire knowledge graph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (falls back to BONFIRE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Graph JSON file instead of the built-in sample
    #[arg(long, global = true)]
    graph: Option<PathBuf>,

    /// Seed for layouts with a random element
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Nodes with their degree, heaviest first
    Weights {
        /// Keep only these groups (comma separated)
        #[arg(long, value_delimiter = ',')]
        filter: Vec<NodeGroup>,
    },

    /// Neighbors of a node, in edge order
    Neighbors { node_id: String },

    /// Compute one view's layout
    Layout {
        /// list, cloud, d3cloud, animated, tree, force, bubble, heatmap or pie
        view: ViewMode,

        /// Selected node id
        #[arg(long)]
        select: Option<String>,

        #[arg(long, value_delimiter = ',')]
        filter: Vec<NodeGroup>,

        /// Square canvas side
        #[arg(long)]
        canvas: Option<f64>,
    },

    /// Drive a viewer and a scripted remote through one session
    Simulate {
        #[arg(long, default_value = "demo")]
        session: String,

        /// Auto-play step in milliseconds
        #[arg(long, default_value_t = 1000)]
        cycle_ms: u64,

        /// Auto-play steps before the remote takes over
        #[arg(long, default_value_t = 3)]
        steps: u32,
    },
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let mut config = VizConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.graph {
        config.graph.path = Some(path);
    }
    if let Some(seed) = cli.seed {
        config.layout.seed = Some(seed);
    }

    let graph = commands::load_graph(&config)?;
    match cli.command {
        Commands::Weights { filter } => print_json(&commands::weights(&graph, &filter)),
        Commands::Neighbors { node_id } => {
            print_json(&commands::neighbor_report(&graph, &node_id)?)
        }
        Commands::Layout {
            view,
            select,
            filter,
            canvas,
        } => {
            let request = LayoutRequest {
                view,
                selected: select,
                filter,
                canvas: canvas.or(config.layout.canvas),
                seed: config.layout.seed,
            };
            print_json(&commands::layout(&graph, &request))
        }
        Commands::Simulate {
            session,
            cycle_ms,
            steps,
        } => {
            let options = SimulateOptions {
                session_id: session,
                cycle_ms,
                steps,
            };
            let report = commands::simulate(graph, &config, &options).await?;
            print_json(&report)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
