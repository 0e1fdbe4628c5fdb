//! Canvas seam and stroke replay.
//!
//! [`replay`] draws the whole drawing from scratch. Each stroke becomes one
//! path: a move to the first coordinate, one quadratic segment per point
//! (control point = previous point, end = midpoint to the current point),
//! and a closing straight line to the last point.

use crate::stroke::{Point, Stroke};

/// Rendered box of the canvas in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Paint settings applied before each stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub width: f64,
    pub color: String,
    pub shadow_blur: f64,
    pub shadow_color: String,
}

impl LineStyle {
    pub const WIDTH: f64 = 5.0;
    pub const SHADOW_BLUR: f64 = 2.0;

    /// Round-capped brush in `color`, with a soft shadow of the same colour.
    pub fn brush(color: &str) -> Self {
        Self {
            width: Self::WIDTH,
            color: color.to_owned(),
            shadow_blur: Self::SHADOW_BLUR,
            shadow_color: color.to_owned(),
        }
    }
}

/// 2D drawing surface. Line joins and caps are always round.
pub trait Canvas {
    /// Backing store width in pixels.
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn bounding_client_rect(&self) -> ClientRect;

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&mut self);
    fn set_line_style(&mut self, style: &LineStyle);
    fn move_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);
}

/// Map a client position into the unit square of the canvas box.
///
/// Independent of the backing store size, so stored geometry does not
/// depend on any participant's display.
pub fn normalize(rect: &ClientRect, client_x: f64, client_y: f64) -> Point {
    Point::new(
        (client_x - rect.left) / rect.width,
        (client_y - rect.top) / rect.height,
    )
}

/// Clear `canvas` and draw every stroke in order.
pub fn replay(canvas: &mut dyn Canvas, strokes: &[Stroke]) {
    let width = canvas.width();
    let height = canvas.height();
    canvas.clear_rect(0.0, 0.0, width, height);

    for stroke in strokes {
        canvas.begin_path();
        canvas.set_line_style(&LineStyle::brush(&stroke.color));
        canvas.move_to(stroke.coordinate.x * width, stroke.coordinate.y * height);

        let mut last = stroke.coordinate;
        for point in &stroke.path {
            let between = last.midpoint(point);
            canvas.quadratic_curve_to(last.x * width, last.y * height, between.x * width, between.y * height);
            last = *point;
        }
        canvas.line_to(last.x * width, last.y * height);
        canvas.stroke();
    }
}

/// One call made on a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    BeginPath,
    LineStyle(LineStyle),
    MoveTo { x: f64, y: f64 },
    QuadraticCurveTo { cpx: f64, cpy: f64, x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Stroke,
}

/// Canvas that records commands instead of painting.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    rect: ClientRect,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Square canvas of `size` pixels, displayed at the same size at the origin.
    pub fn new(size: f64) -> Self {
        Self::with_rect(
            size,
            size,
            ClientRect {
                left: 0.0,
                top: 0.0,
                width: size,
                height: size,
            },
        )
    }

    pub fn with_rect(width: f64, height: f64, rect: ClientRect) -> Self {
        Self {
            width,
            height,
            rect,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of full-canvas clears, i.e. redraw passes.
    pub fn clears(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::ClearRect { .. }))
            .count()
    }

    /// Colours of the strokes drawn since the last clear.
    pub fn visible_colors(&self) -> Vec<&str> {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::ClearRect { .. }))
            .map_or(0, |i| i + 1);
        self.commands[start..]
            .iter()
            .filter_map(|c| match c {
                DrawCommand::LineStyle(style) => Some(style.color.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn bounding_client_rect(&self) -> ClientRect {
        self.rect
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect { x, y, width, height });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn set_line_style(&mut self, style: &LineStyle) {
        self.commands.push(DrawCommand::LineStyle(style.clone()));
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.commands.push(DrawCommand::QuadraticCurveTo { cpx, cpy, x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::PATH_TYPE;

    fn stroke(color: &str, coordinate: Point, path: Vec<Point>) -> Stroke {
        Stroke {
            color: color.into(),
            kind: PATH_TYPE.into(),
            coordinate,
            path,
        }
    }

    #[test]
    fn test_normalize_against_rendered_box() {
        let rect = ClientRect {
            left: 100.0,
            top: 50.0,
            width: 400.0,
            height: 200.0,
        };
        assert_eq!(normalize(&rect, 180.0, 110.0), Point::new(0.2, 0.3));
        assert_eq!(normalize(&rect, 100.0, 50.0), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_replay_smooths_through_midpoints() {
        let mut canvas = RecordingCanvas::new(100.0);
        let strokes = [stroke(
            "#333",
            Point::new(0.0, 0.0),
            vec![Point::new(0.2, 0.0), Point::new(0.2, 0.4)],
        )];
        replay(&mut canvas, &strokes);

        assert_eq!(
            canvas.commands(),
            &[
                DrawCommand::ClearRect { x: 0.0, y: 0.0, width: 100.0, height: 100.0 },
                DrawCommand::BeginPath,
                DrawCommand::LineStyle(LineStyle::brush("#333")),
                DrawCommand::MoveTo { x: 0.0, y: 0.0 },
                DrawCommand::QuadraticCurveTo { cpx: 0.0, cpy: 0.0, x: 10.0, y: 0.0 },
                DrawCommand::QuadraticCurveTo { cpx: 20.0, cpy: 0.0, x: 20.0, y: 20.0 },
                DrawCommand::LineTo { x: 20.0, y: 40.0 },
                DrawCommand::Stroke,
            ]
        );
    }

    #[test]
    fn test_replay_single_point_stroke_ends_on_its_origin() {
        let mut canvas = RecordingCanvas::new(10.0);
        replay(&mut canvas, &[stroke("#6eeb83", Point::new(0.5, 0.5), Vec::new())]);
        assert_eq!(
            &canvas.commands()[3..],
            &[
                DrawCommand::MoveTo { x: 5.0, y: 5.0 },
                DrawCommand::LineTo { x: 5.0, y: 5.0 },
                DrawCommand::Stroke,
            ]
        );
    }

    #[test]
    fn test_replay_keeps_sequence_order() {
        let mut canvas = RecordingCanvas::new(10.0);
        let strokes = [
            stroke("#333", Point::default(), Vec::new()),
            stroke("#ffbc42", Point::default(), Vec::new()),
        ];
        replay(&mut canvas, &strokes);
        replay(&mut canvas, &strokes[1..]);
        assert_eq!(canvas.clears(), 2);
        assert_eq!(canvas.visible_colors(), vec!["#ffbc42"]);
    }

    #[test]
    fn test_brush_style() {
        let style = LineStyle::brush("#30bced");
        assert_eq!(style.width, 5.0);
        assert_eq!(style.shadow_blur, 2.0);
        assert_eq!(style.shadow_color, "#30bced");
    }
}
