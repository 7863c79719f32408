use sot_core::{dial_endpoint, ObjectPosition, Point};

const MARGIN: f32 = 20.0;
const HEADER: f32 = 40.0;
const FOOTER: f32 = 110.0;
/// Gap between the dial circle and the edge of its response area.
const DIAL_PADDING: f64 = 20.0;

/// Axis-aligned screen rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Frame {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w * 0.5, self.y + self.h * 0.5)
    }
}

/// The response dial: a circle whose 0° points up, at the facing object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialLayout {
    pub center: Point,
    pub radius: f64,
}

impl DialLayout {
    /// Whether `(x, y)` is inside the square response area around the dial.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let reach = self.radius + DIAL_PADDING;
        (x - self.center.x).abs() <= reach && (y - self.center.y).abs() <= reach
    }

    /// Pointer position relative to the dial centre, in screen axes.
    pub fn pointer_offset(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.center.x, y - self.center.y)
    }

    pub fn endpoint(&self, angle: f64) -> Point {
        dial_endpoint(self.center, self.radius, angle)
    }
}

/// Where everything goes for a window of a given size: the object scene on
/// the left two thirds, the dial on the right, prompt text underneath.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub scene: Frame,
    pub dial: DialLayout,
    pub prompt_top: f32,
}

impl Layout {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let scene_w = (w * 2.0 / 3.0 - 1.5 * MARGIN).max(1.0);
        let scene_h = (h - HEADER - FOOTER - MARGIN).max(1.0);
        let scene = Frame {
            x: MARGIN,
            y: HEADER,
            w: scene_w,
            h: scene_h,
        };

        let panel_x = scene.x + scene.w + MARGIN;
        let panel_w = (w - panel_x - MARGIN).max(1.0);
        let side = panel_w.min(scene_h) as f64;
        let dial = DialLayout {
            center: Point::new(
                (panel_x + panel_w * 0.5) as f64,
                (scene.y + scene_h * 0.5) as f64,
            ),
            radius: (side * 0.5 - DIAL_PADDING).max(10.0),
        };

        Self {
            width,
            height,
            scene,
            dial,
            prompt_top: scene.y + scene.h + MARGIN,
        }
    }

    /// Screen point for a catalog position given in percent of the scene.
    pub fn object_point(&self, pos: &ObjectPosition) -> (f32, f32) {
        (
            self.scene.x + (pos.x as f32 / 100.0) * self.scene.w,
            self.scene.y + (pos.y as f32 / 100.0) * self.scene.h,
        )
    }
}
