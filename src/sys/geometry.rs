use serde::{Deserialize, Serialize};
use tracing::warn;

/// A point in either device-pixel space (`Point<i32>`) or monitor-relative
/// unit-square space (`Point<f64>`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub const fn new(x: T, y: T) -> Self { Self { x, y } }
}

/// An axis-aligned rectangle. Device-pixel rectangles are `Rect<i32>`;
/// unit-square rectangles are `Rect<f64>` with every component in `[0, 1]`,
/// always derived by normalizing a device rectangle against a monitor's
/// working area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T> Rect<T> {
    pub const fn new(x: T, y: T, width: T, height: T) -> Self {
        Self { x, y, width, height }
    }
}

impl<T: Copy> Rect<T> {
    pub fn origin(&self) -> Point<T> { Point::new(self.x, self.y) }
}

impl Rect<i32> {
    /// Inclusive on all four edges.
    pub fn contains_point(&self, point: Point<i32>) -> bool {
        self.x <= point.x
            && point.x <= self.x + self.width
            && self.y <= point.y
            && point.y <= self.y + self.height
    }

    /// Normalizes `rect` into the unit square relative to this working area.
    /// A degenerate working area clamps to the zero rectangle instead of
    /// dividing by zero.
    pub fn normalize_rect(&self, rect: Rect<i32>) -> Rect<f64> {
        if self.width <= 0 || self.height <= 0 {
            warn!("normalizing against degenerate working area {self:?}");
            return Rect::default();
        }
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        Rect {
            x: f64::from(rect.x - self.x) / w,
            y: f64::from(rect.y - self.y) / h,
            width: f64::from(rect.width) / w,
            height: f64::from(rect.height) / h,
        }
    }

    /// Scales a pixel delta into unit-square space.
    pub fn normalize_delta(&self, delta: Point<i32>) -> Point<f64> {
        if self.width <= 0 || self.height <= 0 {
            warn!("normalizing delta against degenerate working area {self:?}");
            return Point::default();
        }
        Point {
            x: f64::from(delta.x) / f64::from(self.width),
            y: f64::from(delta.y) / f64::from(self.height),
        }
    }

    /// Inverse of [`Rect::normalize_rect`]: maps a unit rectangle back into
    /// this working area's device space.
    pub fn to_device(&self, unit: Rect<f64>) -> Rect<i32> {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        Rect {
            x: self.x + (unit.x * w).round() as i32,
            y: self.y + (unit.y * h).round() as i32,
            width: (unit.width * w).round() as i32,
            height: (unit.height * h).round() as i32,
        }
    }
}
