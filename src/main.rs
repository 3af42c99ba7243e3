mod app;
mod graph;
mod util;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use eframe::egui::vec2;
use log::info;

use app::{ForceConfig, PhysicsConfig, PlacementConfig, SimulationConfig};
use graph::{GraphSource, RootPolicy};

/// Interactive force-directed viewer for dependency graphs.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON array of node records. `-` reads stdin; omit it to open a built-in demo graph.
    input: Option<PathBuf>,

    /// Node radius in world units.
    #[arg(long, default_value_t = PhysicsConfig::default().body_radius)]
    radius: f32,

    /// Spring rest length between linked nodes.
    #[arg(long, default_value_t = PhysicsConfig::default().rest_length)]
    rest_length: f32,

    /// Spring stiffness in [0, 1].
    #[arg(long, default_value_t = PhysicsConfig::default().stiffness)]
    stiffness: f32,

    #[arg(long, default_value_t = ForceConfig::default().repulsion_strength)]
    repulsion: f32,

    /// Fraction of velocity removed each frame.
    #[arg(long, default_value_t = ForceConfig::default().damping)]
    damping: f32,

    #[arg(long, default_value_t = ForceConfig::default().gravity)]
    gravity: f32,

    /// How the root node is chosen.
    #[arg(long, value_enum, default_value_t = RootPolicy::Metadata)]
    root_policy: RootPolicy,

    /// Let the first node move freely instead of pinning it below the view.
    #[arg(long)]
    no_anchor_first: bool,

    /// Let the root node move freely instead of pinning it above the view.
    #[arg(long)]
    no_anchor_root: bool,

    /// Allow nodes to overlap.
    #[arg(long)]
    no_collisions: bool,

    /// Start with the simulation paused.
    #[arg(long)]
    paused: bool,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 800.0)]
    height: f32,
}

impl Args {
    fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            physics: PhysicsConfig {
                body_radius: self.radius,
                rest_length: self.rest_length,
                stiffness: self.stiffness,
                resolve_collisions: !self.no_collisions,
                ..PhysicsConfig::default()
            },
            forces: ForceConfig {
                repulsion_strength: self.repulsion,
                damping: self.damping,
                gravity: self.gravity,
                ..ForceConfig::default()
            },
            placement: PlacementConfig {
                root_policy: self.root_policy,
                anchor_first_node: !self.no_anchor_first,
                anchor_root: !self.no_anchor_root,
                viewport: vec2(self.width, self.height),
                ..PlacementConfig::default()
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.simulation_config();
    let start_paused = args.paused;
    let source = GraphSource::from_arg(args.input.clone())?;
    info!("opening graph from {source}");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "depgraph-view",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::DependencyViewerApp::new(
                cc,
                source,
                config,
                start_paused,
            )))
        }),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
