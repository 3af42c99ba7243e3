use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2};

use crate::graph::{Graph, GraphSource, load_graph};

mod camera;
mod config;
mod graph;
mod physics;
mod picking;
mod render;
mod run_loop;
mod simulation;
mod ui;

pub use config::{ForceConfig, PhysicsConfig, PlacementConfig, SimulationConfig};

use run_loop::RunLoop;
use simulation::Simulation;
use ui::FrameStats;

pub struct DependencyViewerApp {
    source: GraphSource,
    config: SimulationConfig,
    start_paused: bool,
    state: AppState,
    reload_rx: Option<Receiver<Result<Graph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Graph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    simulation: Simulation,
    run_loop: RunLoop,
    source_name: String,
    initial_forces: ForceConfig,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    last_pointer: Option<Pos2>,
    canvas_size: Vec2,
    show_fps_bar: bool,
    frame_stats: FrameStats,
}

struct SearchMatchCache {
    query: String,
    matches: Arc<HashSet<usize>>,
}

impl DependencyViewerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: GraphSource,
        config: SimulationConfig,
        start_paused: bool,
    ) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            config,
            start_paused,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: GraphSource) -> Receiver<Result<Graph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_graph(&source).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: GraphSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready(&self, graph: Graph) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(
            graph,
            &self.config,
            self.start_paused,
            self.source.to_string(),
        )))
    }
}

impl eframe::App for DependencyViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(result);
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading dependency graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load dependency graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.state = Self::start_load(self.source.clone());
                    return;
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = transition {
            if let AppState::Ready(model) = &self.state {
                model.run_loop.token().cancel();
            }
            self.reload_rx = None;
            self.state = match result {
                Ok(graph) => self.ready(graph),
                Err(error) => AppState::Error(error),
            };
            ctx.request_repaint();
        }
    }
}
