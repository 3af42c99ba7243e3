use eframe::egui::{Pos2, Vec2, pos2, vec2};
use log::debug;

const WHEEL_ZOOM_OUT: f32 = 0.9;
const WHEEL_ZOOM_IN: f32 = 1.1;

/// Pan/zoom transform between world space and screen space.
///
/// `screen = world * scale + pan`. Neither value is clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pan: Vec2,
    pub scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Camera {
    pub fn world_to_screen(&self, world: Vec2) -> Pos2 {
        pos2(
            world.x * self.scale + self.pan.x,
            world.y * self.scale + self.pan.y,
        )
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        vec2(
            (screen.x - self.pan.x) / self.scale,
            (screen.y - self.pan.y) / self.scale,
        )
    }

    /// Scales by `factor` while keeping the world point under `screen` in place.
    ///
    /// A zoom that would leave the scale subnormal, infinite, or the pan non-finite is
    /// dropped, so the camera never reaches a state it cannot zoom back out of.
    pub fn zoom_at(&mut self, screen: Pos2, factor: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            debug!("ignoring zoom factor {factor}");
            return;
        }

        let previous = self.scale;
        let scale = previous * factor;
        let pan = vec2(
            (self.pan.x / previous + screen.x * (1.0 / scale - 1.0 / previous)) * scale,
            (self.pan.y / previous + screen.y * (1.0 / scale - 1.0 / previous)) * scale,
        );
        if !(scale.is_normal() && pan.is_finite()) {
            debug!("zoom to scale {scale} leaves the representable range; keeping {previous}");
            return;
        }

        self.scale = scale;
        self.pan = pan;
    }

    /// Pans so that `world` lands on the screen point `screen`.
    pub fn center_on(&mut self, world: Vec2, screen: Pos2) {
        self.pan += screen - self.world_to_screen(world);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Wheel deltas follow the browser convention: positive scrolls down and zooms out.
pub fn wheel_zoom_factor(delta_y: f32) -> f32 {
    if delta_y > 0.0 {
        WHEEL_ZOOM_OUT
    } else {
        WHEEL_ZOOM_IN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f32, b: f32, tolerance: f32) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn identity_by_default() {
        let camera = Camera::default();
        assert_eq!(camera.world_to_screen(vec2(3.0, -4.0)), pos2(3.0, -4.0));
        assert_eq!(camera.screen_to_world(pos2(3.0, -4.0)), vec2(3.0, -4.0));
    }

    #[test]
    fn zoom_at_origin_only_scales() {
        let mut camera = Camera::default();
        camera.zoom_at(Pos2::ZERO, 2.0);
        assert_eq!(camera.pan, Vec2::ZERO);
        assert_eq!(camera.world_to_screen(vec2(5.0, 5.0)), pos2(10.0, 10.0));
    }

    #[test]
    fn invalid_factor_is_ignored() {
        let mut camera = Camera::default();
        camera.zoom_at(pos2(100.0, 100.0), 0.0);
        camera.zoom_at(pos2(100.0, 100.0), f32::NAN);
        assert_eq!(camera, Camera::default());
    }

    #[test]
    fn repeated_wheel_zoom_stays_recoverable() {
        let pointer = pos2(300.0, 200.0);
        let mut camera = Camera::default();
        for _ in 0..1200 {
            camera.zoom_at(pointer, wheel_zoom_factor(120.0));
        }
        assert!(camera.scale.is_normal());

        camera.zoom_at(pointer, wheel_zoom_factor(-120.0));
        let world = camera.screen_to_world(pointer);
        assert!(camera.pan.is_finite() && world.is_finite());

        for _ in 0..2400 {
            camera.zoom_at(pointer, wheel_zoom_factor(-120.0));
        }
        assert!(camera.scale.is_normal());
        assert!(camera.pan.is_finite());
        assert!(camera.screen_to_world(pointer).is_finite());
    }

    #[test]
    fn center_on_moves_world_point_to_screen_point() {
        let mut camera = Camera {
            pan: vec2(-40.0, 15.0),
            scale: 2.0,
        };
        camera.center_on(vec2(100.0, 50.0), pos2(400.0, 300.0));
        assert_eq!(camera.world_to_screen(vec2(100.0, 50.0)), pos2(400.0, 300.0));
        assert_eq!(camera.scale, 2.0);
    }

    #[test]
    fn wheel_direction() {
        assert_eq!(wheel_zoom_factor(120.0), 0.9);
        assert_eq!(wheel_zoom_factor(-120.0), 1.1);
    }

    proptest! {
        #[test]
        fn screen_world_round_trip(
            sx in -2000.0f32..2000.0,
            sy in -2000.0f32..2000.0,
            pan_x in -500.0f32..500.0,
            pan_y in -500.0f32..500.0,
            scale in 0.25f32..4.0,
        ) {
            let camera = Camera { pan: vec2(pan_x, pan_y), scale };
            let back = camera.world_to_screen(camera.screen_to_world(pos2(sx, sy)));
            prop_assert!(close(back.x, sx, 1e-2));
            prop_assert!(close(back.y, sy, 1e-2));
        }

        #[test]
        fn zoom_keeps_cursor_anchored(
            sx in 0.0f32..2000.0,
            sy in 0.0f32..2000.0,
            pan_x in -500.0f32..500.0,
            pan_y in -500.0f32..500.0,
            scale in 0.25f32..4.0,
            factor in 0.5f32..2.0,
        ) {
            let mut camera = Camera { pan: vec2(pan_x, pan_y), scale };
            let before = camera.screen_to_world(pos2(sx, sy));
            camera.zoom_at(pos2(sx, sy), factor);
            let after = camera.screen_to_world(pos2(sx, sy));
            prop_assert!(close(before.x, after.x, 0.05));
            prop_assert!(close(before.y, after.y, 0.05));
        }
    }
}
