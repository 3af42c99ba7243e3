use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use super::super::ViewModel;
use super::super::simulation::ViewEvent;

impl ViewModel {
    /// Translates this frame's egui input into canvas-relative view events.
    pub(in crate::app) fn collect_view_events(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) -> Vec<ViewEvent> {
        let mut events = Vec::new();
        let to_canvas = |pos: Pos2| (pos - rect.min).to_pos2();

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pos| rect.contains(*pos));

        if response.hovered()
            && let Some(pointer) = pointer
        {
            let position = to_canvas(pointer);
            if self.last_pointer != Some(position) {
                self.last_pointer = Some(position);
                events.push(ViewEvent::PointerMove { position });
            }

            // egui reports scrolling down as a negative y delta.
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                events.push(ViewEvent::Wheel {
                    delta_y: -scroll,
                    position,
                });
            }
        } else if self.last_pointer.take().is_some() {
            events.push(ViewEvent::PointerLeave);
        }

        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                events.push(ViewEvent::Drag { delta });
            }
        }

        events
    }
}
