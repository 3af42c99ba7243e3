mod engine;
mod forces;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use log::warn;

use crate::graph::{Graph, Node, NodeRole};
use crate::util::stable_pair;

use super::config::{PhysicsConfig, PlacementConfig};
use engine::BodyHandle;
pub(in crate::app) use engine::{PhysicsEngine, SpringWorld};
pub(in crate::app) use forces::ForceModel;

/// Unit vector from `b` towards `a`, or a deterministic golden-angle direction when the
/// two points coincide.
pub(in crate::app) fn separation_direction(delta: Vec2, distance: f32, a: usize, b: usize) -> Vec2 {
    if distance > 0.0001 {
        delta / distance
    } else {
        let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214 + 0.37) * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    }
}

#[derive(Clone, Debug)]
pub(in crate::app) struct BoundBody {
    pub(in crate::app) node_index: usize,
    pub(in crate::app) role: NodeRole,
    pub(in crate::app) is_anchored: bool,
    handle: BodyHandle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct BindingReport {
    pub(in crate::app) bodies: usize,
    pub(in crate::app) constraints: usize,
    pub(in crate::app) unresolved_edges: usize,
    pub(in crate::app) duplicate_ids: usize,
}

/// One body per node and one spring per resolvable edge inside a physics engine.
pub(in crate::app) struct PhysicsAdapter<E: PhysicsEngine = SpringWorld> {
    engine: E,
    bodies: Vec<BoundBody>,
    index_by_id: HashMap<String, usize>,
    links: Vec<(usize, usize)>,
    radius: f32,
    report: BindingReport,
}

fn seed_position(node: &Node, role: NodeRole, placement: &PlacementConfig) -> Vec2 {
    let center = placement.viewport * 0.5;
    match role {
        NodeRole::Anchor => vec2(center.x, center.y * 3.0),
        NodeRole::Root => vec2(center.x, -center.y),
        NodeRole::Ordinary => {
            let (jx, jy) = stable_pair(&node.id);
            let spread = center * placement.seed_spread;
            vec2(center.x + jx * spread.x, center.y + jy * spread.y)
        }
    }
}

impl<E: PhysicsEngine> PhysicsAdapter<E> {
    pub(in crate::app) fn bind(
        mut engine: E,
        graph: &Graph,
        physics: &PhysicsConfig,
        placement: &PlacementConfig,
    ) -> Self {
        let roles = graph.roles(placement.root_policy, placement.anchor_first_node);
        let mut bodies = Vec::with_capacity(graph.node_count());
        let mut index_by_id = HashMap::with_capacity(graph.node_count());
        let mut report = BindingReport::default();

        for (node_index, (node, role)) in graph.nodes.iter().zip(roles).enumerate() {
            if index_by_id.contains_key(&node.id) {
                warn!("duplicate node id {}; keeping the first body", node.id);
                report.duplicate_ids += 1;
                continue;
            }

            let is_anchored = match role {
                NodeRole::Anchor => true,
                NodeRole::Root => placement.anchor_root,
                NodeRole::Ordinary => false,
            };
            let handle = engine.add_circle(
                seed_position(node, role, placement),
                physics.body_radius,
                is_anchored,
            );
            index_by_id.insert(node.id.clone(), bodies.len());
            bodies.push(BoundBody {
                node_index,
                role,
                is_anchored,
                handle,
            });
        }

        let mut links = Vec::with_capacity(graph.edge_count());
        for edge in &graph.edges {
            let (Some(&source), Some(&target)) = (
                index_by_id.get(&edge.source_id),
                index_by_id.get(&edge.target_id),
            ) else {
                warn!(
                    "dropping edge {} -> {}: endpoint is not in the graph",
                    edge.source_id, edge.target_id
                );
                report.unresolved_edges += 1;
                continue;
            };

            engine.add_spring(
                bodies[source].handle,
                bodies[target].handle,
                physics.rest_length,
                physics.stiffness,
            );
            links.push((source, target));
        }

        report.bodies = bodies.len();
        report.constraints = engine.constraint_count();

        Self {
            engine,
            bodies,
            index_by_id,
            links,
            radius: physics.body_radius,
            report,
        }
    }

    pub(in crate::app) fn step(&mut self, dt_ms: f32) {
        self.engine.step(dt_ms);
    }

    pub(in crate::app) fn position_of(&self, node_id: &str) -> Option<Vec2> {
        self.body_index(node_id).and_then(|body| self.position(body))
    }

    /// Queues `force` on the node's body for the next step. Returns false for unknown
    /// ids and anchored bodies.
    pub(in crate::app) fn apply_impulse(&mut self, node_id: &str, force: Vec2) -> bool {
        match self.body_index(node_id) {
            Some(body) if !self.bodies[body].is_anchored => {
                self.apply_force(body, force);
                true
            }
            _ => false,
        }
    }

    pub(in crate::app) fn body_index(&self, node_id: &str) -> Option<usize> {
        self.index_by_id.get(node_id).copied()
    }

    pub(in crate::app) fn bodies(&self) -> &[BoundBody] {
        &self.bodies
    }

    /// Resolved edges as `(source body, target body)`.
    pub(in crate::app) fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    pub(in crate::app) fn radius(&self) -> f32 {
        self.radius
    }

    pub(in crate::app) fn report(&self) -> BindingReport {
        self.report
    }

    pub(in crate::app) fn position(&self, body: usize) -> Option<Vec2> {
        self.bodies
            .get(body)
            .and_then(|bound| self.engine.position(bound.handle))
    }

    pub(in crate::app) fn velocity(&self, body: usize) -> Option<Vec2> {
        self.bodies
            .get(body)
            .and_then(|bound| self.engine.velocity(bound.handle))
    }

    pub(in crate::app) fn set_velocity(&mut self, body: usize, velocity: Vec2) {
        if let Some(bound) = self.bodies.get(body) {
            self.engine.set_velocity(bound.handle, velocity);
        }
    }

    pub(in crate::app) fn apply_force(&mut self, body: usize, force: Vec2) {
        if let Some(bound) = self.bodies.get(body) {
            self.engine.apply_force(bound.handle, force);
        }
    }
}
