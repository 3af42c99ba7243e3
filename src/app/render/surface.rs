use eframe::egui::{Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};

/// Immediate-mode 2D drawing target with a canvas-style transform stack.
///
/// `translate` and `scale` compose onto the current transform; coordinates passed to
/// the drawing calls are mapped through it.
pub(in crate::app) trait Surface {
    fn clear(&mut self, color: Color32);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn scale(&mut self, factor: f32);
    fn fill_circle(&mut self, center: Pos2, radius: f32, fill: Color32, outline: Stroke);
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
    fn label(&mut self, anchor: Pos2, text: &str);
}

#[derive(Clone, Copy, Debug)]
struct Transform {
    offset: Vec2,
    scale: f32,
}

/// Surface backed by an egui painter clipped to `rect`. Screen coordinates are relative
/// to the rect's top-left corner.
pub(in crate::app) struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
    current: Transform,
    stack: Vec<Transform>,
}

impl<'a> PainterSurface<'a> {
    pub(in crate::app) fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self {
            painter,
            rect,
            current: Transform {
                offset: rect.min.to_vec2(),
                scale: 1.0,
            },
            stack: Vec::new(),
        }
    }

    fn map(&self, point: Pos2) -> Pos2 {
        (self.current.offset + point.to_vec2() * self.current.scale).to_pos2()
    }

    fn map_stroke(&self, stroke: Stroke) -> Stroke {
        Stroke::new(stroke.width * self.current.scale, stroke.color)
    }
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.rect, 0.0, color);
    }

    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(previous) = self.stack.pop() {
            self.current = previous;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.current.offset += offset * self.current.scale;
    }

    fn scale(&mut self, factor: f32) {
        self.current.scale *= factor;
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, fill: Color32, outline: Stroke) {
        self.painter.circle(
            self.map(center),
            radius * self.current.scale,
            fill,
            self.map_stroke(outline),
        );
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter
            .line_segment([self.map(from), self.map(to)], self.map_stroke(stroke));
    }

    fn label(&mut self, anchor: Pos2, text: &str) {
        let text_color = Color32::from_gray(240);
        let galley =
            self.painter
                .layout_no_wrap(text.to_owned(), FontId::proportional(13.0), text_color);
        let position = self.map(anchor);
        let frame = Rect::from_min_size(position, galley.size()).expand(4.0);
        self.painter
            .rect_filled(frame, 3.0, Color32::from_rgba_unmultiplied(18, 22, 28, 230));
        self.painter.galley(position, galley, text_color);
    }
}

#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum DrawCall {
    Clear,
    Save,
    Restore,
    Translate(Vec2),
    Scale(f32),
    Circle { center: Pos2, radius: f32, fill: Color32 },
    Line { from: Pos2, to: Pos2 },
    Label { anchor: Pos2, text: String },
}

#[cfg(test)]
#[derive(Default)]
pub(in crate::app) struct RecordingSurface {
    pub(in crate::app) calls: Vec<DrawCall>,
}

#[cfg(test)]
impl RecordingSurface {
    pub(in crate::app) fn line_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Line { .. }))
            .count()
    }

    pub(in crate::app) fn circles(&self) -> Vec<(Pos2, Color32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Circle { center, fill, .. } => Some((*center, *fill)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn clear(&mut self, _color: Color32) {
        self.calls.push(DrawCall::Clear);
    }

    fn save(&mut self) {
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.calls.push(DrawCall::Translate(offset));
    }

    fn scale(&mut self, factor: f32) {
        self.calls.push(DrawCall::Scale(factor));
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, fill: Color32, _outline: Stroke) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            fill,
        });
    }

    fn line(&mut self, from: Pos2, to: Pos2, _stroke: Stroke) {
        self.calls.push(DrawCall::Line { from, to });
    }

    fn label(&mut self, anchor: Pos2, text: &str) {
        self.calls.push(DrawCall::Label {
            anchor,
            text: text.to_owned(),
        });
    }
}
