use eframe::egui::Context;

use super::super::ViewModel;

const SMOOTHING: f32 = 0.1;
/// Per-frame decay of the worst-frame marker, so one hitch fades after a few seconds.
const WORST_DECAY: f32 = 0.99;

/// Smoothed frame rate plus a slowly decaying worst frame time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) struct FrameStats {
    fps: f32,
    worst_ms: f32,
}

impl FrameStats {
    pub(in crate::app) fn record(&mut self, dt_secs: f32) {
        if !(dt_secs.is_finite() && dt_secs > f32::EPSILON) {
            return;
        }

        let fps = (1.0 / dt_secs).min(1000.0);
        self.fps = if self.fps == 0.0 {
            fps
        } else {
            self.fps + (fps - self.fps) * SMOOTHING
        };
        self.worst_ms = (self.worst_ms * WORST_DECAY).max(dt_secs * 1000.0);
    }

    pub(in crate::app) fn text(&self) -> Option<String> {
        (self.fps > 0.0).then(|| format!("{:.0} fps | worst {:.1} ms", self.fps, self.worst_ms))
    }
}

impl ViewModel {
    pub(in crate::app) fn update_frame_stats(&mut self, ctx: &Context) {
        let dt = ctx.input(|input| input.unstable_dt);
        self.frame_stats.record(dt);
    }

    pub(in crate::app) fn frame_stats_text(&self) -> Option<String> {
        if self.show_fps_bar {
            self.frame_stats.text()
        } else {
            None
        }
    }

    pub(in crate::app) fn zoom_text(&self) -> String {
        format!("zoom {:.0}%", self.simulation.camera().scale * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_is_taken_as_is_then_smoothed() {
        let mut stats = FrameStats::default();
        assert_eq!(stats.text(), None);

        stats.record(0.02);
        assert_eq!(stats.text().as_deref(), Some("50 fps | worst 20.0 ms"));

        stats.record(0.01);
        assert!((stats.fps - 55.0).abs() < 1e-3);
        assert!((stats.worst_ms - 19.8).abs() < 1e-3);
    }

    #[test]
    fn bad_frame_times_are_ignored() {
        let mut stats = FrameStats::default();
        stats.record(0.0);
        stats.record(f32::NAN);
        stats.record(-1.0);
        assert_eq!(stats, FrameStats::default());
    }
}
