use eframe::egui::{Pos2, Vec2, vec2};

use super::camera::Camera;
use super::physics::{PhysicsAdapter, PhysicsEngine};

/// Screen-space distance from the pointer to the tooltip's top-left corner.
pub(in crate::app) const TOOLTIP_OFFSET: Vec2 = vec2(10.0, 10.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Hit {
    pub(in crate::app) body: usize,
    pub(in crate::app) distance: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) struct HoverState {
    pub(in crate::app) body: Option<usize>,
    pub(in crate::app) pointer: Option<Pos2>,
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct Tooltip {
    pub(in crate::app) text: String,
    pub(in crate::app) anchor: Pos2,
}

/// Nearest body whose center lies within one body radius of the pointer, measured in
/// world units.
pub(in crate::app) fn pick_body<E: PhysicsEngine>(
    physics: &PhysicsAdapter<E>,
    camera: &Camera,
    screen: Pos2,
) -> Option<Hit> {
    let world = camera.screen_to_world(screen);
    let radius = physics.radius();

    (0..physics.bodies().len())
        .filter_map(|body| {
            let distance = (physics.position(body)? - world).length();
            (distance < radius).then_some(Hit { body, distance })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
