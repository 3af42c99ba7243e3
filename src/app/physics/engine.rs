use std::f32::consts::PI;

use eframe::egui::Vec2;
use log::debug;

use super::separation_direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintHandle(usize);

/// Rigid-body world the layout runs on.
///
/// Forces passed to `apply_force` accumulate until the next `step`, which integrates
/// them, solves constraints, and clears the accumulators.
pub trait PhysicsEngine {
    fn add_circle(&mut self, position: Vec2, radius: f32, is_static: bool) -> BodyHandle;
    fn add_spring(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        rest_length: f32,
        stiffness: f32,
    ) -> ConstraintHandle;
    fn step(&mut self, dt_ms: f32);
    fn apply_force(&mut self, body: BodyHandle, force: Vec2);
    fn position(&self, body: BodyHandle) -> Option<Vec2>;
    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);
    fn constraint_count(&self) -> usize;
}

struct Circle {
    position: Vec2,
    velocity: Vec2,
    force: Vec2,
    radius: f32,
    inverse_mass: f32,
    is_static: bool,
}

struct Spring {
    a: usize,
    b: usize,
    rest_length: f32,
    stiffness: f32,
}

/// Small position-based engine: explicit force integration, positional spring
/// solving with the correction fed back into velocity, and circle overlap resolution.
///
/// Units follow the usual browser physics conventions: mass is `density * area` and a
/// force produces `force / mass * dt_ms^2` of velocity change per step.
pub struct SpringWorld {
    bodies: Vec<Circle>,
    springs: Vec<Spring>,
    density: f32,
    resolve_collisions: bool,
    previous_positions: Vec<Vec2>,
}

impl SpringWorld {
    pub fn new(density: f32, resolve_collisions: bool) -> Self {
        Self {
            bodies: Vec::new(),
            springs: Vec::new(),
            density,
            resolve_collisions,
            previous_positions: Vec::new(),
        }
    }

    fn solve_springs(&mut self) {
        for spring in &self.springs {
            if spring.a == spring.b {
                continue;
            }
            let (inverse_a, inverse_b) = (
                self.bodies[spring.a].inverse_mass,
                self.bodies[spring.b].inverse_mass,
            );
            let inverse_sum = inverse_a + inverse_b;
            if inverse_sum <= 0.0 {
                continue;
            }

            let delta = self.bodies[spring.b].position - self.bodies[spring.a].position;
            let distance = delta.length();
            if distance <= 0.0001 {
                continue;
            }

            let correction = delta * ((distance - spring.rest_length) / distance * spring.stiffness);
            let share_a = correction * (inverse_a / inverse_sum);
            let share_b = correction * (inverse_b / inverse_sum);

            let body_a = &mut self.bodies[spring.a];
            body_a.position += share_a;
            body_a.velocity += share_a;
            let body_b = &mut self.bodies[spring.b];
            body_b.position -= share_b;
            body_b.velocity -= share_b;
        }
    }

    fn resolve_overlaps(&mut self) {
        let count = self.bodies.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (inverse_i, inverse_j) =
                    (self.bodies[i].inverse_mass, self.bodies[j].inverse_mass);
                let inverse_sum = inverse_i + inverse_j;
                if inverse_sum <= 0.0 {
                    continue;
                }

                let delta = self.bodies[i].position - self.bodies[j].position;
                let distance = delta.length();
                let min_distance = self.bodies[i].radius + self.bodies[j].radius;
                if distance >= min_distance {
                    continue;
                }

                let push = separation_direction(delta, distance, i, j) * (min_distance - distance);
                self.bodies[i].position += push * (inverse_i / inverse_sum);
                self.bodies[j].position -= push * (inverse_j / inverse_sum);
            }
        }
    }

    fn sanitize(&mut self) {
        for (index, body) in self.bodies.iter_mut().enumerate() {
            if !body.position.is_finite() {
                debug!("body {index} left the finite range; restoring last position");
                body.position = self.previous_positions[index];
                body.velocity = Vec2::ZERO;
            } else if !body.velocity.is_finite() {
                debug!("body {index} has a non-finite velocity; zeroing it");
                body.velocity = Vec2::ZERO;
            }
        }
    }
}

impl PhysicsEngine for SpringWorld {
    fn add_circle(&mut self, position: Vec2, radius: f32, is_static: bool) -> BodyHandle {
        let mass = self.density * PI * radius * radius;
        let inverse_mass = if is_static || mass <= 0.0 {
            0.0
        } else {
            1.0 / mass
        };
        self.bodies.push(Circle {
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            radius,
            inverse_mass,
            is_static,
        });
        BodyHandle(self.bodies.len() - 1)
    }

    fn add_spring(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        rest_length: f32,
        stiffness: f32,
    ) -> ConstraintHandle {
        self.springs.push(Spring {
            a: a.0,
            b: b.0,
            rest_length,
            stiffness: stiffness.clamp(0.0, 1.0),
        });
        ConstraintHandle(self.springs.len() - 1)
    }

    fn step(&mut self, dt_ms: f32) {
        let dt_sq = dt_ms * dt_ms;

        self.previous_positions.clear();
        self.previous_positions
            .extend(self.bodies.iter().map(|body| body.position));

        for body in &mut self.bodies {
            if !body.is_static {
                body.velocity += body.force * (body.inverse_mass * dt_sq);
                body.position += body.velocity;
            }
            body.force = Vec2::ZERO;
        }

        self.solve_springs();
        if self.resolve_collisions {
            self.resolve_overlaps();
        }
        self.sanitize();
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2) {
        if let Some(body) = self.bodies.get_mut(body.0)
            && !body.is_static
        {
            body.force += force;
        }
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body.0).map(|body| body.position)
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body.0).map(|body| body.velocity)
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(body.0)
            && !body.is_static
        {
            body.velocity = velocity;
        }
    }

    fn constraint_count(&self) -> usize {
        self.springs.len()
    }
}
