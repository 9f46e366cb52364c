//! Planar geometry primitives
//!
//! Points are `glam::Vec2` values; a [`Segment`] is an ordered pair of
//! endpoints. The crossing test is the classic CCW orientation test over a
//! two-valued predicate.

use glam::Vec2;

/// Turn direction of the ordered triple (a, b, c)
///
/// Returns the sign of the cross product as a boolean, so only two classes
/// are distinguished: exactly-collinear triples fall arbitrarily into one
/// branch. This is an accepted approximation for floating random
/// coordinates, where collinear triples are vanishingly rare; it is not a
/// degeneracy handler.
#[inline]
pub fn orientation(a: Vec2, b: Vec2, c: Vec2) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// A directed line segment between two points
///
/// Segments are plain value types; equality is endpoint equality. Two
/// segments sharing an endpoint are defined as non-crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point
    pub start: Vec2,
    /// End point
    pub end: Vec2,
}

impl Segment {
    /// Create a segment from two endpoints
    #[inline]
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Euclidean length of the segment
    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// True if the segments have a coinciding endpoint in any pairing
    #[inline]
    fn shares_endpoint(&self, other: &Segment) -> bool {
        self.start == other.start
            || self.start == other.end
            || self.end == other.start
            || self.end == other.end
    }

    /// Test for a proper crossing between two segments
    ///
    /// Returns `false` immediately when the segments share an endpoint
    /// (a degenerate touch is not an intersection), otherwise applies the
    /// CCW test: the segments cross iff each straddles the line through the
    /// other.
    ///
    /// # Known limitation
    ///
    /// Because [`orientation`] is two-valued, collinear overlaps and
    /// interior touches are not specially detected and may be
    /// misclassified. Generation only ever compares segments with distinct
    /// random endpoints, where these cases do not arise in practice.
    pub fn properly_intersects(&self, other: &Segment) -> bool {
        if self.shares_endpoint(other) {
            return false;
        }

        let (a, b) = (self.start, self.end);
        let (c, d) = (other.start, other.end);

        orientation(a, c, d) != orientation(b, c, d)
            && orientation(a, b, c) != orientation(a, b, d)
    }

    /// Compute the crossing point of two segments, if one exists
    ///
    /// Solves the parametric line equations and returns the point only when
    /// it falls strictly inside both spans. Parallel (and collinear)
    /// segments yield `None`.
    pub fn intersection_point(&self, other: &Segment) -> Option<Vec2> {
        let r = self.end - self.start;
        let s = other.end - other.start;

        let denom = r.perp_dot(s);
        if denom == 0.0 {
            return None;
        }

        let offset = other.start - self.start;
        let t = offset.perp_dot(s) / denom;
        let u = offset.perp_dot(r) / denom;

        if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
            Some(self.start + r * t)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(ax: f32, ay: f32, bx: f32, by: f32) -> Segment {
        Segment::new(Vec2::new(ax, ay), Vec2::new(bx, by))
    }

    #[test]
    fn test_orientation_turns() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!(orientation(a, b, Vec2::new(5.0, 5.0)));
        assert!(!orientation(a, b, Vec2::new(5.0, -5.0)));
    }

    #[test]
    fn test_length() {
        assert_relative_eq!(seg(0.0, 0.0, 3.0, 4.0).length(), 5.0);
        assert_relative_eq!(seg(2.0, 2.0, 2.0, 2.0).length(), 0.0);
    }

    #[test]
    fn test_crossing_segments() {
        let s1 = seg(0.0, 0.0, 10.0, 10.0);
        let s2 = seg(0.0, 10.0, 10.0, 0.0);
        assert!(s1.properly_intersects(&s2));
        assert!(s2.properly_intersects(&s1));
    }

    #[test]
    fn test_disjoint_segments() {
        let s1 = seg(0.0, 0.0, 10.0, 0.0);
        let s2 = seg(0.0, 5.0, 10.0, 5.0);
        assert!(!s1.properly_intersects(&s2));
    }

    #[test]
    fn test_shared_endpoint_is_not_crossing() {
        let s1 = seg(0.0, 0.0, 10.0, 0.0);
        let s2 = seg(10.0, 0.0, 10.0, 10.0);
        assert!(!s1.properly_intersects(&s2));

        // Reversed pairing counts as shared too
        let s3 = seg(5.0, 5.0, 0.0, 0.0);
        assert!(!s1.properly_intersects(&s3));
    }

    #[test]
    fn test_intersection_point_of_cross() {
        let s1 = seg(0.0, 0.0, 10.0, 10.0);
        let s2 = seg(0.0, 10.0, 10.0, 0.0);
        let p = s1.intersection_point(&s2).unwrap();
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 5.0);
    }

    #[test]
    fn test_intersection_point_parallel() {
        let s1 = seg(0.0, 0.0, 10.0, 0.0);
        let s2 = seg(0.0, 1.0, 10.0, 1.0);
        assert!(s1.intersection_point(&s2).is_none());
    }

    #[test]
    fn test_intersection_point_out_of_span() {
        // Lines cross at (15, 0), outside both segments
        let s1 = seg(0.0, 0.0, 10.0, 0.0);
        let s2 = seg(15.0, -5.0, 15.0, 5.0);
        assert!(s1.intersection_point(&s2).is_none());
        assert!(!s1.properly_intersects(&s2));
    }
}
