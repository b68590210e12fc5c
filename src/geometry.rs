//! Joint angle computation from three landmarks.

use crate::landmark::LandmarkPoint;

/// Below this product of segment lengths the points are treated as coincident.
pub const MIN_SEGMENT_PRODUCT: f64 = 1e-6;

/// Angle returned for degenerate input (coincident points).
pub const DEGENERATE_ANGLE: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn scaled(self, width: f64, height: f64) -> Self {
        Self::new(self.x * width, self.y * height)
    }

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    fn length(self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl From<&LandmarkPoint> for Point2 {
    fn from(p: &LandmarkPoint) -> Self {
        Point2::new(p.x, p.y)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from(v: (f64, f64)) -> Self {
        Point2::new(v.0, v.1)
    }
}

/// Vertex angle at `b`, in degrees, formed by segments `b→a` and `b→c`.
///
/// Coordinates are normalized; they are scaled to pixel space first so the
/// result matches what a renderer would measure on the frame. Returns
/// [`DEGENERATE_ANGLE`] when either segment has (near) zero length.
pub fn joint_angle(a: Point2, b: Point2, c: Point2, frame_width: f64, frame_height: f64) -> f64 {
    let a = a.scaled(frame_width, frame_height);
    let b = b.scaled(frame_width, frame_height);
    let c = c.scaled(frame_width, frame_height);

    let ba = a.sub(b);
    let bc = c.sub(b);
    let denom = ba.length() * bc.length();
    if denom < MIN_SEGMENT_PRODUCT {
        return DEGENERATE_ANGLE;
    }

    let cos_angle = (ba.dot(bc) / denom).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}
