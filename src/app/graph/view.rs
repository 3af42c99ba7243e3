use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Sense, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::physics::PhysicsEngine;
use super::super::render::PainterSurface;
use super::super::run_loop::FrameOutcome;
use super::super::simulation::Simulation;
use super::super::{SearchMatchCache, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Body indices whose node id or hover text fuzzy-matches `query`.
fn matching_bodies<E: PhysicsEngine>(simulation: &Simulation<E>, query: &str) -> HashSet<usize> {
    let matcher = SkimMatcherV2::default();
    let graph = simulation.graph();
    simulation
        .physics()
        .bodies()
        .iter()
        .enumerate()
        .filter_map(|(index, body)| {
            let node = graph.nodes.get(body.node_index)?;
            let matched = fuzzy_match_score(&matcher, &node.id, query).is_some()
                || node
                    .metadata
                    .as_deref()
                    .is_some_and(|metadata| fuzzy_match_score(&matcher, metadata, query).is_some());
            matched.then_some(index)
        })
        .collect()
}

impl ViewModel {
    pub(in crate::app) fn cached_search_matches(&mut self) -> Arc<HashSet<usize>> {
        let search_query = self.search.trim();
        if search_query.is_empty() {
            return Arc::default();
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == search_query
        {
            return Arc::clone(&cached.matches);
        }

        let matches = Arc::new(matching_bodies(&self.simulation, search_query));
        self.search_match_cache = Some(SearchMatchCache {
            query: search_query.to_owned(),
            matches: Arc::clone(&matches),
        });

        matches
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.canvas_size = rect.size();

        for event in self.collect_view_events(ui, rect, &response) {
            self.simulation.handle_event(event);
        }

        let highlighted = self.cached_search_matches();
        let painter = ui.painter_at(rect);
        let mut surface = PainterSurface::new(&painter, rect);
        let outcome = self
            .run_loop
            .frame(&mut self.simulation, &mut surface, &highlighted);

        if outcome == FrameOutcome::Advanced || response.dragged() {
            ui.ctx().request_repaint();
        }

        if self.simulation.tooltip().is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::SimulationConfig;
    use crate::graph::parse_graph;

    fn simulation() -> Simulation {
        let graph = parse_graph(
            r#"[
                {"id": "conv1", "children": ["relu1"], "metadata": {"label": "convolution"}},
                {"id": "relu1", "children": ["pool1"], "metadata": {"label": "threshold"}},
                {"id": "pool1", "children": [], "metadata": {"label": "root"}}
            ]"#,
        )
        .expect("valid graph");
        Simulation::new(graph, &SimulationConfig::default())
    }

    #[test]
    fn search_matches_ids_and_metadata() {
        let simulation = simulation();

        assert_eq!(matching_bodies(&simulation, "relu"), HashSet::from([1]));
        assert_eq!(matching_bodies(&simulation, "CONVOL"), HashSet::from([0]));
        assert!(matching_bodies(&simulation, "zzzz").is_empty());
    }
}
