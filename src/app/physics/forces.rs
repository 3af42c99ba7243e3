use eframe::egui::{Vec2, vec2};

use super::super::config::ForceConfig;
use super::{PhysicsAdapter, PhysicsEngine, separation_direction};

/// Per-frame forces layered on top of the engine: pairwise repulsion between free
/// bodies, velocity damping, and an optional downward bias.
pub(in crate::app) struct ForceModel {
    pub(in crate::app) config: ForceConfig,
    positions: Vec<(usize, Vec2)>,
    forces: Vec<Vec2>,
}

impl ForceModel {
    pub(in crate::app) fn new(config: ForceConfig) -> Self {
        Self {
            config,
            positions: Vec::new(),
            forces: Vec::new(),
        }
    }

    pub(in crate::app) fn repulsion_magnitude(&self, distance: f32) -> f32 {
        let softened = (distance.max(0.0) + self.config.softening_offset).max(f32::EPSILON);
        self.config.repulsion_strength / (softened * softened)
    }

    /// Repulsion acting on `b`; `a` receives the opposite force.
    pub(in crate::app) fn pair_force(&self, a: Vec2, b: Vec2, a_index: usize, b_index: usize) -> Vec2 {
        let delta = b - a;
        let distance = delta.length();
        separation_direction(delta, distance, b_index, a_index) * self.repulsion_magnitude(distance)
    }

    pub(in crate::app) fn apply<E: PhysicsEngine>(&mut self, physics: &mut PhysicsAdapter<E>) {
        self.apply_repulsion(physics);
        self.apply_damping(physics);
        self.apply_gravity(physics);
    }

    pub(in crate::app) fn apply_repulsion<E: PhysicsEngine>(&mut self, physics: &mut PhysicsAdapter<E>) {
        self.positions.clear();
        for (index, body) in physics.bodies().iter().enumerate() {
            if body.is_anchored {
                continue;
            }
            if let Some(position) = physics.position(index)
                && position.is_finite()
            {
                self.positions.push((index, position));
            }
        }

        let count = self.positions.len();
        self.forces.clear();
        self.forces.resize(count, Vec2::ZERO);

        for i in 0..count {
            for j in (i + 1)..count {
                let (a_index, a) = self.positions[i];
                let (b_index, b) = self.positions[j];
                let force = self.pair_force(a, b, a_index, b_index);
                if !force.is_finite() {
                    continue;
                }
                self.forces[i] -= force;
                self.forces[j] += force;
            }
        }

        for (&(body, _), &force) in self.positions.iter().zip(&self.forces) {
            physics.apply_force(body, force);
        }
    }

    pub(in crate::app) fn apply_damping<E: PhysicsEngine>(&self, physics: &mut PhysicsAdapter<E>) {
        let keep = 1.0 - self.config.damping.clamp(0.0, 1.0);
        for body in 0..physics.bodies().len() {
            if physics.bodies()[body].is_anchored {
                continue;
            }
            if let Some(velocity) = physics.velocity(body) {
                physics.set_velocity(body, velocity * keep);
            }
        }
    }

    pub(in crate::app) fn apply_gravity<E: PhysicsEngine>(&self, physics: &mut PhysicsAdapter<E>) {
        if self.config.gravity == 0.0 {
            return;
        }
        let force = vec2(0.0, self.config.gravity);
        for body in 0..physics.bodies().len() {
            if !physics.bodies()[body].is_anchored {
                physics.apply_force(body, force);
            }
        }
    }
}
