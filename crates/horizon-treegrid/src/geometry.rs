//! Geometry types used for pointer hit-testing and drop-zone collision.
//!
//! The grid never lays anything out itself; the host reports row rectangles
//! and pointer positions in whatever coordinate space it paints in, and these
//! types carry them into the drag-and-drop engine.

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance_to(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// A rectangle defined by origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from origin and size.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            width,
            height,
        }
    }

    /// Empty rectangle at origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// A zero-sized rectangle at a point, used for pointer collisions.
    #[inline]
    pub const fn at_point(point: Point) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.height
    }

    /// Area of the rectangle (zero for empty rectangles).
    #[inline]
    pub fn area(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// Check if the rectangle is empty (zero or negative size).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    ///
    /// The top and left edges are inclusive, the bottom and right exclusive,
    /// so vertically stacked rectangles never both claim a point.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Area shared by two rectangles.
    #[inline]
    pub fn overlap_area(&self, other: &Rect) -> f32 {
        self.intersect(other).map_or(0.0, |r| r.area())
    }

    /// Translate the rectangle.
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.origin.x + dx, self.origin.y + dy, self.width, self.height)
    }

    /// Split the rectangle into three horizontal bands of equal height.
    pub fn split_thirds(&self) -> [Rect; 3] {
        let third = self.height / 3.0;
        [
            Rect::new(self.left(), self.top(), self.width, third),
            Rect::new(self.left(), self.top() + third, self.width, third),
            Rect::new(self.left(), self.top() + 2.0 * third, self.width, self.height - 2.0 * third),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges() {
        let rect = Rect::new(0.0, 0.0, 10.0, 30.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(!rect.contains(Point::new(10.0, 5.0)));
        assert!(!rect.contains(Point::new(5.0, 30.0)));
    }

    #[test]
    fn test_intersect_and_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.overlap_area(&b), 25.0);
        assert_eq!(a.overlap_area(&Rect::new(20.0, 20.0, 1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_split_thirds() {
        let [top, middle, bottom] = Rect::new(0.0, 30.0, 100.0, 30.0).split_thirds();
        assert_eq!(top, Rect::new(0.0, 30.0, 100.0, 10.0));
        assert_eq!(middle, Rect::new(0.0, 40.0, 100.0, 10.0));
        assert_eq!(bottom, Rect::new(0.0, 50.0, 100.0, 10.0));
    }

    #[test]
    fn test_distance() {
        assert_eq!(Point::ZERO.distance_to(Point::new(3.0, 4.0)), 5.0);
    }
}
