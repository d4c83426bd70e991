/// An axis-aligned rectangle used only while laying out a floor.
///
/// `x2`/`y2` are the far edges (`x1 + w`, `y1 + h`); the carved interior is
/// the open range between them, leaving a one-tile wall on every side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x1: i32,
    /// Top edge.
    pub y1: i32,
    /// Right edge.
    pub x2: i32,
    /// Bottom edge.
    pub y2: i32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + w,
            y2: y + h,
        }
    }

    /// The rectangle's center, rounded toward the top-left.
    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Edge-inclusive overlap test: touching rectangles intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_inside_interior() {
        let room = Rect::new(10, 10, 6, 4);
        let (cx, cy) = room.center();
        assert!(cx > room.x1 && cx < room.x2);
        assert!(cy > room.y1 && cy < room.y2);
    }

    #[test]
    fn touching_edges_count_as_intersecting() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(5, 0, 5, 5);
        assert!(a.intersects(&b));
    }

    #[test]
    fn separated_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(6, 6, 5, 5);
        assert!(!a.intersects(&b));
    }
}
