//! Geometry Primitives
//!
//! Axis-aligned rectangles in canvas space: origin at the top-left corner,
//! y grows downward. Coordinates are `f64` because layout arithmetic (scaled
//! icons, proportional bar sizing, fractional off-screen offsets) is not
//! pixel-aligned until the render pass rounds it.

use serde::{Deserialize, Serialize};

/// A point in canvas space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Size {
    /// Create a new size
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel dimensions, rounded to the nearest integer
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixels(&self) -> (u32, u32) {
        (
            self.width.max(0.0).round() as u32,
            self.height.max(0.0).round() as u32,
        )
    }
}

/// Axis-aligned rectangle
///
/// Width and height may be negative while layout code is still doing
/// arithmetic on them. Such rectangles are degenerate and must be filtered
/// before they are used as labels or paint regions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from a position and a size
    #[must_use]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Build a rectangle from its edges
    #[must_use]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Right edge (`x + width`)
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`)
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Top-left corner
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center point
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Area (zero for degenerate rectangles)
    #[must_use]
    pub fn area(&self) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// True when the rectangle has no interior
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict overlap test
    ///
    /// Rectangles that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x >= other.right()
            || self.right() <= other.x
            || self.y >= other.bottom()
            || self.bottom() <= other.y)
    }

    /// True when `other` lies entirely inside `self`
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Clip to `[0, bounds.width] x [0, bounds.height]`
    ///
    /// The result may be degenerate when the rectangle lies entirely
    /// off-canvas.
    #[must_use]
    pub fn clip_to(&self, bounds: Size) -> Rect {
        let left = self.x.max(0.0).min(bounds.width);
        let top = self.y.max(0.0).min(bounds.height);
        let right = self.right().min(bounds.width).max(0.0);
        let bottom = self.bottom().min(bounds.height).max(0.0);
        Rect::from_edges(left, top, right, bottom)
    }

    /// Overlapping region of two rectangles, if any
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        Some(Rect::from_edges(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        ))
    }

    /// Move by an offset
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shrink by `amount` on every side (grows when negative)
    #[must_use]
    pub fn inset(&self, amount: f64) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }

    /// Integer pixel edges `(left, top, right, bottom)`, rounded
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pixel_edges(&self) -> (i64, i64, i64, i64) {
        (
            self.x.round() as i64,
            self.y.round() as i64,
            self.right().round() as i64,
            self.bottom().round() as i64,
        )
    }
}

/// Which screen edge a bar is docked to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Docked to the left edge
    Left,
    /// Docked to the right edge
    Right,
    /// Docked to the top edge
    Top,
    /// Docked to the bottom edge
    Bottom,
}

impl Edge {
    /// All edges
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Whether the bar runs vertically (left/right docking)
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }

    /// Parse a lowercase edge name
    ///
    /// # Errors
    ///
    /// Returns an error naming the value when it is not a known edge.
    pub fn parse(value: &str) -> Result<Self, crate::config::ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Edge::Left),
            "right" => Ok(Edge::Right),
            "top" => Ok(Edge::Top),
            "bottom" => Ok(Edge::Bottom),
            other => Err(crate::config::ConfigError::Invalid {
                key: "orientation",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));

        let c = Rect::new(9.5, 9.5, 1.0, 1.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_clip_inside_is_identity() {
        let r = Rect::new(100.0, 100.0, 200.0, 200.0);
        assert_eq!(r.clip_to(Size::new(1000.0, 800.0)), r);
    }

    #[test]
    fn test_clip_partially_offscreen() {
        let r = Rect::new(-50.0, 700.0, 200.0, 200.0);
        let clipped = r.clip_to(Size::new(1000.0, 800.0));
        assert_eq!(clipped, Rect::new(0.0, 700.0, 150.0, 100.0));
    }

    #[test]
    fn test_clip_fully_offscreen_is_degenerate() {
        let r = Rect::new(1200.0, 10.0, 50.0, 50.0);
        assert!(r.clip_to(Size::new(1000.0, 800.0)).is_degenerate());

        let negative = Rect::new(10.0, 10.0, -5.0, 20.0);
        assert!(negative.clip_to(Size::new(1000.0, 800.0)).is_degenerate());
    }

    #[test]
    fn test_intersection_and_containment() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert!(a.contains_rect(&Rect::new(1.0, 1.0, 2.0, 2.0)));
        assert!(!a.contains_rect(&b));
    }

    #[test]
    fn test_edge_parse() {
        assert_eq!(Edge::parse("Bottom").unwrap(), Edge::Bottom);
        assert!(Edge::parse("diagonal").is_err());
        assert!(Edge::Left.is_vertical());
        assert!(!Edge::Top.is_vertical());
    }
}
