use eframe::egui::{Vec2, vec2};

use crate::graph::RootPolicy;

/// Milliseconds per frame at 60 Hz.
pub const DEFAULT_TIME_STEP_MS: f32 = 1000.0 / 60.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub body_radius: f32,
    pub rest_length: f32,
    pub stiffness: f32,
    pub density: f32,
    pub time_step_ms: f32,
    pub resolve_collisions: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            body_radius: 10.0,
            rest_length: 20.0,
            stiffness: 0.02,
            density: 0.001,
            time_step_ms: DEFAULT_TIME_STEP_MS,
            resolve_collisions: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceConfig {
    pub repulsion_strength: f32,
    /// Added to the pair distance before squaring; keeps near-field repulsion bounded.
    pub softening_offset: f32,
    /// Fraction of velocity removed every frame.
    pub damping: f32,
    /// Constant downward force on every free body.
    pub gravity: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            repulsion_strength: 0.5,
            softening_offset: 80.0,
            damping: 0.1,
            gravity: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementConfig {
    pub root_policy: RootPolicy,
    pub anchor_first_node: bool,
    pub anchor_root: bool,
    pub viewport: Vec2,
    /// How far ordinary nodes are scattered from the view center, as a fraction of
    /// half the viewport.
    pub seed_spread: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            root_policy: RootPolicy::Metadata,
            anchor_first_node: true,
            anchor_root: true,
            viewport: vec2(1280.0, 800.0),
            seed_spread: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub forces: ForceConfig,
    pub placement: PlacementConfig,
}
