use std::collections::HashSet;

use eframe::egui::{Pos2, Vec2, vec2};
use log::info;

use crate::graph::Graph;
use crate::util::stable_pair;

use super::camera::{Camera, wheel_zoom_factor};
use super::config::{ForceConfig, SimulationConfig};
use super::physics::{BindingReport, ForceModel, PhysicsAdapter, PhysicsEngine, SpringWorld};
use super::picking::{HoverState, TOOLTIP_OFFSET, Tooltip, pick_body};
use super::render::{Palette, Renderer, Surface};

/// Input delivered between frames. Events only ever touch the camera and hover state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum ViewEvent {
    PointerMove { position: Pos2 },
    /// `delta_y > 0` scrolls down and zooms out.
    Wheel { delta_y: f32, position: Pos2 },
    Drag { delta: Vec2 },
    PointerLeave,
}

/// Push applied per free node by the "Shake layout" control.
pub(in crate::app) const SHAKE_STRENGTH: f32 = 0.005;

/// One viewing session: the static graph, its bodies, the force layer and the camera.
pub(in crate::app) struct Simulation<E: PhysicsEngine = SpringWorld> {
    graph: Graph,
    physics: PhysicsAdapter<E>,
    forces: ForceModel,
    camera: Camera,
    renderer: Renderer,
    hover: HoverState,
    time_step_ms: f32,
}

impl Simulation {
    pub(in crate::app) fn new(graph: Graph, config: &SimulationConfig) -> Self {
        let engine = SpringWorld::new(config.physics.density, config.physics.resolve_collisions);
        Self::with_engine(graph, config, engine)
    }
}

impl<E: PhysicsEngine> Simulation<E> {
    pub(in crate::app) fn with_engine(graph: Graph, config: &SimulationConfig, engine: E) -> Self {
        let physics = PhysicsAdapter::bind(engine, &graph, &config.physics, &config.placement);
        let report = physics.report();
        info!(
            "bound {} bodies and {} springs ({} edges dropped, {} duplicate ids)",
            report.bodies, report.constraints, report.unresolved_edges, report.duplicate_ids
        );

        Self {
            graph,
            physics,
            forces: ForceModel::new(config.forces),
            camera: Camera::default(),
            renderer: Renderer::default(),
            hover: HoverState::default(),
            time_step_ms: config.physics.time_step_ms,
        }
    }

    /// Integrates the forces queued last frame, then queues this frame's forces.
    pub(in crate::app) fn advance(&mut self) {
        self.physics.step(self.time_step_ms);
        self.forces.apply(&mut self.physics);
    }

    pub(in crate::app) fn render<S: Surface>(&self, surface: &mut S, highlighted: &HashSet<usize>) {
        self.renderer
            .draw(surface, &self.physics, &self.camera, highlighted);
        if let Some(tooltip) = self.tooltip() {
            self.renderer.draw_tooltip(surface, &tooltip);
        }
    }

    pub(in crate::app) fn handle_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::PointerMove { position } => {
                self.hover = HoverState {
                    body: pick_body(&self.physics, &self.camera, position).map(|hit| hit.body),
                    pointer: Some(position),
                };
            }
            ViewEvent::Wheel { delta_y, position } => {
                self.camera.zoom_at(position, wheel_zoom_factor(delta_y));
            }
            ViewEvent::Drag { delta } => self.camera.pan_by(delta),
            ViewEvent::PointerLeave => self.hover = HoverState::default(),
        }
    }

    pub(in crate::app) fn tooltip(&self) -> Option<Tooltip> {
        let body = self.physics.bodies().get(self.hover.body?)?;
        let node = self.graph.nodes.get(body.node_index)?;
        Some(Tooltip {
            text: node.hover_text().to_owned(),
            anchor: self.hover.pointer? + TOOLTIP_OFFSET,
        })
    }

    pub(in crate::app) fn graph(&self) -> &Graph {
        &self.graph
    }

    pub(in crate::app) fn physics(&self) -> &PhysicsAdapter<E> {
        &self.physics
    }

    pub(in crate::app) fn report(&self) -> BindingReport {
        self.physics.report()
    }

    pub(in crate::app) fn camera(&self) -> &Camera {
        &self.camera
    }

    pub(in crate::app) fn palette(&self) -> &Palette {
        &self.renderer.palette
    }

    pub(in crate::app) fn forces_mut(&mut self) -> &mut ForceConfig {
        &mut self.forces.config
    }

    pub(in crate::app) fn reset_view(&mut self) {
        self.camera.reset();
        self.hover = HoverState::default();
    }

    /// Pans so the node sits under `screen`. Returns false when the id has no body.
    pub(in crate::app) fn focus_node(&mut self, node_id: &str, screen: Pos2) -> bool {
        let Some(world) = self.physics.position_of(node_id) else {
            return false;
        };
        self.camera.center_on(world, screen);
        true
    }

    /// Queues a push on every free body along its node's stable direction, applied by the
    /// next step. Returns how many bodies were pushed.
    pub(in crate::app) fn shake(&mut self, strength: f32) -> usize {
        let mut pushed = 0;
        for body in 0..self.physics.bodies().len() {
            let node_index = self.physics.bodies()[body].node_index;
            let Some(node) = self.graph.nodes.get(node_index) else {
                continue;
            };
            let (jx, jy) = stable_pair(&node.id);
            if self.physics.apply_impulse(&node.id, vec2(jx, jy) * strength) {
                pushed += 1;
            }
        }
        pushed
    }
}
