mod surface;

use std::collections::HashSet;
use std::f32::consts::FRAC_PI_6;

use eframe::egui::{Color32, Pos2, Stroke, pos2};

use crate::graph::NodeRole;

use super::camera::Camera;
use super::physics::{PhysicsAdapter, PhysicsEngine};
use super::picking::Tooltip;
pub(in crate::app) use surface::{PainterSurface, Surface};
#[cfg(test)]
pub(in crate::app) use surface::{DrawCall, RecordingSurface};

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct Palette {
    pub(in crate::app) background: Color32,
    pub(in crate::app) anchor: Color32,
    pub(in crate::app) root: Color32,
    pub(in crate::app) ordinary: Color32,
    pub(in crate::app) outline: Stroke,
    pub(in crate::app) edge: Stroke,
    pub(in crate::app) highlight: Stroke,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(19, 23, 29),
            anchor: Color32::from_rgb(214, 64, 64),
            root: Color32::from_rgb(72, 178, 96),
            ordinary: Color32::from_rgb(66, 118, 222),
            outline: Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            edge: Stroke::new(1.0, Color32::from_gray(170)),
            highlight: Stroke::new(2.0, Color32::from_rgb(103, 196, 255)),
        }
    }
}

/// Draws bodies and directed edges in world space under the camera transform.
pub(in crate::app) struct Renderer {
    pub(in crate::app) palette: Palette,
    pub(in crate::app) arrow_length: f32,
    pub(in crate::app) arrow_spread: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            arrow_length: 15.0,
            arrow_spread: FRAC_PI_6,
        }
    }
}

impl Renderer {
    pub(in crate::app) fn node_color(&self, role: NodeRole) -> Color32 {
        match role {
            NodeRole::Anchor => self.palette.anchor,
            NodeRole::Root => self.palette.root,
            NodeRole::Ordinary => self.palette.ordinary,
        }
    }

    /// `highlighted` holds body indices that get an extra ring.
    pub(in crate::app) fn draw<E: PhysicsEngine, S: Surface>(
        &self,
        surface: &mut S,
        physics: &PhysicsAdapter<E>,
        camera: &Camera,
        highlighted: &HashSet<usize>,
    ) {
        surface.clear(self.palette.background);
        surface.save();
        surface.translate(camera.pan);
        surface.scale(camera.scale);

        // Lines run from the dependency back to its dependent.
        for &(source, target) in physics.links() {
            let (Some(source_pos), Some(target_pos)) =
                (physics.position(source), physics.position(target))
            else {
                continue;
            };
            let (start, end) = (target_pos.to_pos2(), source_pos.to_pos2());
            surface.line(start, end, self.palette.edge);
            for wing in self.arrowhead(start, end) {
                surface.line(end, wing, self.palette.edge);
            }
        }

        let radius = physics.radius();
        for (index, body) in physics.bodies().iter().enumerate() {
            let Some(position) = physics.position(index) else {
                continue;
            };
            let center = position.to_pos2();
            if highlighted.contains(&index) {
                surface.fill_circle(
                    center,
                    radius + 4.0,
                    Color32::TRANSPARENT,
                    self.palette.highlight,
                );
            }
            surface.fill_circle(
                center,
                radius,
                self.node_color(body.role),
                self.palette.outline,
            );
        }

        surface.restore();
    }

    /// The two wing tips of an arrow pointing at `end`.
    pub(in crate::app) fn arrowhead(&self, start: Pos2, end: Pos2) -> [Pos2; 2] {
        let angle = (end.y - start.y).atan2(end.x - start.x);
        let wing = |offset: f32| {
            pos2(
                end.x - self.arrow_length * (angle + offset).cos(),
                end.y - self.arrow_length * (angle + offset).sin(),
            )
        };
        [wing(-self.arrow_spread), wing(self.arrow_spread)]
    }

    /// Drawn in screen space, after the graph transform has been restored.
    pub(in crate::app) fn draw_tooltip<S: Surface>(&self, surface: &mut S, tooltip: &Tooltip) {
        surface.label(tooltip.anchor, &tooltip.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::{PhysicsConfig, PlacementConfig};
    use crate::app::physics::SpringWorld;
    use crate::graph::{RootPolicy, parse_graph};
    use eframe::egui::vec2;

    fn adapter(raw: &str) -> PhysicsAdapter {
        let graph = parse_graph(raw).unwrap();
        let physics = PhysicsConfig::default();
        PhysicsAdapter::bind(
            SpringWorld::new(physics.density, physics.resolve_collisions),
            &graph,
            &physics,
            &PlacementConfig {
                root_policy: RootPolicy::Metadata,
                anchor_first_node: true,
                ..PlacementConfig::default()
            },
        )
    }

    #[test]
    fn dangling_edges_draw_nothing() {
        let physics = adapter(
            r#"[
                {"id":"a","children":["b","ghost"]},
                {"id":"b","children":["c"]},
                {"id":"c","operation":"root"}
            ]"#,
        );
        let mut surface = RecordingSurface::default();
        Renderer::default().draw(&mut surface, &physics, &Camera::default(), &HashSet::new());

        // Two resolved edges, each a shaft and two arrow wings.
        assert_eq!(surface.line_count(), 6);
        assert_eq!(surface.circles().len(), 3);
    }

    #[test]
    fn transform_wraps_all_graph_drawing() {
        let physics = adapter(r#"[{"id":"a","children":["b"]},{"id":"b"}]"#);
        let camera = Camera {
            pan: vec2(12.0, -7.0),
            scale: 1.5,
        };
        let mut surface = RecordingSurface::default();
        Renderer::default().draw(&mut surface, &physics, &camera, &HashSet::new());

        assert_eq!(
            &surface.calls[..4],
            &[
                DrawCall::Clear,
                DrawCall::Save,
                DrawCall::Translate(vec2(12.0, -7.0)),
                DrawCall::Scale(1.5),
            ]
        );
        assert_eq!(surface.calls.last(), Some(&DrawCall::Restore));
    }

    #[test]
    fn edge_runs_from_target_to_source() {
        let physics = adapter(r#"[{"id":"a","children":["b"]},{"id":"b"}]"#);
        let source = physics.position_of("a").unwrap().to_pos2();
        let target = physics.position_of("b").unwrap().to_pos2();

        let mut surface = RecordingSurface::default();
        Renderer::default().draw(&mut surface, &physics, &Camera::default(), &HashSet::new());

        assert!(surface.calls.contains(&DrawCall::Line {
            from: target,
            to: source,
        }));
    }

    #[test]
    fn role_colors() {
        let physics = adapter(
            r#"[{"id":"pin","children":["x"]},{"id":"x"},{"id":"base","operation":"root"}]"#,
        );
        let renderer = Renderer::default();
        let mut surface = RecordingSurface::default();
        renderer.draw(&mut surface, &physics, &Camera::default(), &HashSet::new());

        let fills = surface
            .circles()
            .into_iter()
            .map(|(_, fill)| fill)
            .collect::<Vec<_>>();
        assert_eq!(
            fills,
            [
                renderer.palette.anchor,
                renderer.palette.ordinary,
                renderer.palette.root,
            ]
        );
    }

    #[test]
    fn highlighted_bodies_get_a_ring() {
        let physics = adapter(r#"[{"id":"a"},{"id":"b"}]"#);
        let mut surface = RecordingSurface::default();
        Renderer::default().draw(&mut surface, &physics, &Camera::default(), &HashSet::from([1]));
        assert_eq!(surface.circles().len(), 3);
    }

    #[test]
    fn arrowhead_wings_sit_thirty_degrees_off_the_shaft() {
        let renderer = Renderer::default();
        let [first, second] = renderer.arrowhead(pos2(0.0, 0.0), pos2(100.0, 0.0));
        let back = 15.0 * FRAC_PI_6.cos();

        assert!((first.x - (100.0 - back)).abs() < 1e-3);
        assert!((first.y - 7.5).abs() < 1e-3);
        assert!((second.x - (100.0 - back)).abs() < 1e-3);
        assert!((second.y + 7.5).abs() < 1e-3);
    }
}
