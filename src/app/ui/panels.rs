use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::graph::Graph;

use super::super::config::SimulationConfig;
use super::super::run_loop::{LoopState, RunLoop};
use super::super::simulation::Simulation;
use super::super::ViewModel;
use super::fps::FrameStats;

impl ViewModel {
    pub(in crate::app) fn new(
        graph: Graph,
        config: &SimulationConfig,
        start_paused: bool,
        source_name: String,
    ) -> Self {
        Self {
            simulation: Simulation::new(graph, config),
            run_loop: RunLoop::new(start_paused),
            source_name,
            initial_forces: config.forces,
            search: String::new(),
            search_match_cache: None,
            last_pointer: None,
            canvas_size: Vec2::ZERO,
            show_fps_bar: true,
            frame_stats: FrameStats::default(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_frame_stats(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("depgraph-view");
                    ui.separator();
                    ui.label(format!("source: {}", self.source_name));
                    let graph = self.simulation.graph();
                    ui.label(format!("nodes: {}", graph.node_count()));
                    ui.label(format!("edges: {}", graph.edge_count()));
                    let report = self.simulation.report();
                    if report.unresolved_edges > 0 {
                        ui.label(format!("dropped edges: {}", report.unresolved_edges))
                            .on_hover_text("Edges whose endpoint has no node were not simulated.");
                    }

                    let pause_label = match self.run_loop.state() {
                        LoopState::Running => "Pause",
                        LoopState::Paused | LoopState::Stopped => "Resume",
                    };
                    let pause_button = ui.add_enabled(
                        self.run_loop.state() != LoopState::Stopped,
                        egui::Button::new(pause_label),
                    );
                    if pause_button.clicked() {
                        self.run_loop.toggle_pause();
                    }
                    if ui.button("Reset view").clicked() {
                        self.simulation.reset_view();
                    }
                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("tick {}", self.run_loop.frames()));
                        ui.label(self.zoom_text());
                        if let Some(fps_text) = self.frame_stats_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(self.simulation.palette().background))
            .show(ctx, |ui| self.draw_graph(ui));
    }
}
