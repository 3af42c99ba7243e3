use eframe::egui::{self, Color32, Sense, Ui, vec2};

use super::super::ViewModel;
use super::super::simulation::SHAKE_STRENGTH;

const LISTED_MATCHES: usize = 8;

fn legend_entry(ui: &mut Ui, color: Color32, label: &str, hover: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
        ui.painter().circle_filled(rect.center(), 6.0, color);
        ui.label(label).on_hover_text(hover);
    });
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (id or operation)")
            .on_hover_text("Fuzzy-highlight matching nodes without changing the layout.");
        ui.text_edit_singleline(&mut self.search);
        self.draw_search_matches(ui);

        ui.separator();

        let initial_forces = self.initial_forces;
        let forces = self.simulation.forces_mut();
        ui.add(
            egui::Slider::new(&mut forces.repulsion_strength, 0.0..=5.0)
                .text("Repulsion")
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text("How strongly every pair of nodes pushes apart.");
        ui.add(
            egui::Slider::new(&mut forces.softening_offset, 1.0..=200.0)
                .text("Softening")
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text("Distance offset that keeps close-range repulsion finite.");
        ui.add(
            egui::Slider::new(&mut forces.damping, 0.0..=0.5)
                .text("Damping")
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text("Fraction of velocity removed every frame.");
        ui.add(
            egui::Slider::new(&mut forces.gravity, -0.0005..=0.0005)
                .text("Gravity")
                .max_decimals(5),
        )
        .on_hover_text("Constant downward force on every free node.");
        if ui.button("Restore defaults").clicked() {
            *forces = initial_forces;
        }
        if ui
            .button("Shake layout")
            .on_hover_text("Push every free node along its own direction.")
            .clicked()
        {
            self.simulation.shake(SHAKE_STRENGTH);
        }

        ui.separator();

        ui.checkbox(&mut self.show_fps_bar, "FPS Display")
            .on_hover_text("Show a live FPS readout in the header.");

        ui.separator();
        ui.label("Legend");
        let palette = *self.simulation.palette();
        legend_entry(
            ui,
            palette.anchor,
            "Anchor",
            "The first node, pinned below the view.",
        );
        legend_entry(
            ui,
            palette.root,
            "Root",
            "The node marked as root.",
        );
        legend_entry(ui, palette.ordinary, "Node", "Every other node.");

        ui.add_space(8.0);
        ui.label("Drag to pan, scroll to zoom, hover a node for its metadata.");
    }

    fn draw_search_matches(&mut self, ui: &mut Ui) {
        if self.search.trim().is_empty() {
            return;
        }

        let matches = self.cached_search_matches();
        ui.label(format!("{} matching nodes", matches.len()));

        let mut listed = matches.iter().copied().collect::<Vec<_>>();
        listed.sort_unstable();

        let mut focus = None;
        for body in listed.into_iter().take(LISTED_MATCHES) {
            let graph = self.simulation.graph();
            let Some(node) = self
                .simulation
                .physics()
                .bodies()
                .get(body)
                .and_then(|bound| graph.nodes.get(bound.node_index))
            else {
                continue;
            };
            let row = ui
                .button(format!("{}  {}", node.id, node.hover_text()))
                .on_hover_text("Center the view on this node.");
            if row.clicked() {
                focus = Some(node.id.clone());
            }
        }

        if let Some(node_id) = focus {
            let center = (self.canvas_size * 0.5).to_pos2();
            self.simulation.focus_node(&node_id, center);
        }
    }
}
