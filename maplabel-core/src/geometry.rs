use glam::DVec2;

/// A geographic coordinate, carried through unmodified so the emitter can
/// place the original point feature; the core never recomputes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Axis-aligned rectangle in pixel space, stored as two opposite corners
/// with `min` always the bottom-left and `max` always the top-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Rect {
            min: DVec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: DVec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_center_size(center: DVec2, width: f64, height: f64) -> Self {
        let half = DVec2::new(width / 2.0, height / 2.0);
        Rect::from_corners(center - half, center + half)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Grow the rect by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Rect {
        let pad = DVec2::splat(amount);
        Rect {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Smallest rect containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// True if the two rects share interior area. Touching edges (zero
    /// overlap width or height) do not count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Euclidean distance between two points.
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    hypot(a.x - b.x, a.y - b.y)
}

pub fn hypot(dx: f64, dy: f64) -> f64 {
    dx.hypot(dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inflate_grows_all_sides() {
        let r = Rect::from_corners(DVec2::new(0.0, 0.0), DVec2::new(10.0, 4.0));
        let grown = r.inflate(2.0);
        assert_eq!(grown.min, DVec2::new(-2.0, -2.0));
        assert_eq!(grown.max, DVec2::new(12.0, 6.0));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::from_corners(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0));
        let b = Rect::from_corners(DVec2::new(10.0, 0.0), DVec2::new(20.0, 10.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn overlapping_rects_intersect() {
        let a = Rect::from_corners(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0));
        let b = Rect::from_corners(DVec2::new(5.0, 5.0), DVec2::new(15.0, 15.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn union_is_the_bounding_box() {
        let a = Rect::from_corners(DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0));
        let b = Rect::from_corners(DVec2::new(5.0, -3.0), DVec2::new(6.0, -2.0));
        let u = a.union(&b);
        assert_eq!(u.min, DVec2::new(0.0, -3.0));
        assert_eq!(u.max, DVec2::new(6.0, 1.0));
    }

    #[test]
    fn hypot_matches_pythagoras() {
        assert!((hypot(3.0, 4.0) - 5.0).abs() < 1e-12);
    }
}
