//! Angle and distance helpers for the wheel.
//!
//! Angles are in degrees, 0° points up (negative y in screen space) and grow clockwise.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(&self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        let (dx, dy) = self.offset_from(other);
        dx.hypot(dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open on the far edges, so adjacent buttons never both claim a point.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Angle of `(dx, dy)` measured clockwise from up, in `[0, 360)`.
///
/// The zero vector has no direction; callers classify it by radius first.
pub fn angle_clockwise_from_up(dx: f64, dy: f64) -> f64 {
    normalize_degrees(dx.atan2(-dy).to_degrees())
}

/// Whether `angle` falls in the clockwise span `[start, end)`.
///
/// A span with `start > end` wraps through 0°.
pub fn angle_in_span(angle: f64, start: f64, end: f64) -> bool {
    if start <= end {
        angle >= start && angle < end
    } else {
        angle >= start || angle < end
    }
}
