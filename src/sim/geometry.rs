//! Planar geometry for walls, zones and pickups
//!
//! Walls are polylines, zones are simple closed polygons, and every body the
//! player interacts with is tested as a circle against one of those.

use glam::Vec2;

/// Squared length below which a segment is treated as a single point
const DEGENERATE_SEGMENT_SQ: f32 = 1e-8;

/// Contact between a circle and a wall segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentContact {
    /// Closest point on the segment to the circle center
    pub point: Vec2,
    /// Unit normal at the contact, facing the circle center
    pub normal: Vec2,
    /// Distance from the circle center to `point`
    pub distance: f32,
}

/// Rotate a vector by 90 degrees: (-y, x)
///
/// Orientation is arbitrary relative to any body; callers flip it to face
/// whatever they are pushing away.
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Closest point to `p` on the segment `a..b`
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < DEGENERATE_SEGMENT_SQ {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Even-odd ray casting test
///
/// Points exactly on an edge may land on either side; the answer is stable for
/// identical input.
pub fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    for current in 0..n {
        let vc = polygon[current];
        let vn = polygon[(current + 1) % n];

        let straddles = (vc.y > p.y && vn.y < p.y) || (vc.y < p.y && vn.y > p.y);
        if straddles && p.x < (vn.x - vc.x) * (p.y - vc.y) / (vn.y - vc.y) + vc.x {
            inside = !inside;
        }
    }
    inside
}

/// Circle vs polygon overlap
///
/// Hit when the center is inside (if `contained_is_hit`), when any vertex lies in
/// the circle, or when any edge passes through the circle.
pub fn circle_intersects_polygon(
    center: Vec2,
    radius: f32,
    polygon: &[Vec2],
    contained_is_hit: bool,
) -> bool {
    if contained_is_hit && point_in_polygon(center, polygon) {
        return true;
    }

    let radius_sq = radius * radius;
    if polygon
        .iter()
        .any(|vertex| vertex.distance_squared(center) <= radius_sq)
    {
        return true;
    }

    let n = polygon.len();
    (0..n).any(|i| {
        let closest = closest_point_on_segment(center, polygon[i], polygon[(i + 1) % n]);
        closest.distance_squared(center) <= radius_sq
    })
}

/// Circle vs circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) <= reach * reach
}

/// Contact between a circle and a segment, if they are closer than `reach`
///
/// `reach` is the sum of the circle radius and the segment's half-thickness.
/// The normal is the segment perpendicular, flipped toward the circle center.
pub fn circle_segment_contact(center: Vec2, reach: f32, a: Vec2, b: Vec2) -> Option<SegmentContact> {
    let point = closest_point_on_segment(center, a, b);
    let offset = center - point;
    let distance = offset.length();
    if distance >= reach {
        return None;
    }

    let mut normal = perpendicular(b - a).normalize_or_zero();
    if normal == Vec2::ZERO {
        // Zero-length segment: push straight out from the point
        normal = offset.normalize_or_zero();
        if normal == Vec2::ZERO {
            return None;
        }
    }
    if offset.dot(normal) < 0.0 {
        normal = -normal;
    }

    Some(SegmentContact {
        point,
        normal,
        distance,
    })
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_perpendicular() {
        assert_eq!(perpendicular(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0));
        assert_eq!(perpendicular(Vec2::new(3.0, 4.0)), Vec2::new(-4.0, 3.0));
    }

    #[test]
    fn test_closest_point_clamps_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(Vec2::new(5.0, 3.0), a, b), Vec2::new(5.0, 0.0));
        assert_eq!(closest_point_on_segment(Vec2::new(-4.0, 3.0), a, b), a);
        assert_eq!(closest_point_on_segment(Vec2::new(14.0, -3.0), a, b), b);
    }

    #[test]
    fn test_closest_point_degenerate_segment() {
        let a = Vec2::new(7.0, -2.0);
        assert_eq!(closest_point_on_segment(Vec2::new(100.0, 50.0), a, a), a);
    }

    #[test]
    fn test_point_in_polygon_concave() {
        // U shape: the notch at the top middle is outside
        let u = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(30.0, 0.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(20.0, 30.0),
            Vec2::new(20.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 30.0),
            Vec2::new(0.0, 30.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 20.0), &u));
        assert!(point_in_polygon(Vec2::new(15.0, 5.0), &u));
        assert!(!point_in_polygon(Vec2::new(15.0, 20.0), &u));
    }

    #[test]
    fn test_point_in_polygon_winding_insensitive() {
        let mut poly = square();
        let p = Vec2::new(40.0, 60.0);
        assert!(point_in_polygon(p, &poly));
        poly.reverse();
        assert!(point_in_polygon(p, &poly));
    }

    #[test]
    fn test_point_in_polygon_boundary_is_stable() {
        let poly = square();
        let edge = Vec2::new(100.0, 50.0);
        let first = point_in_polygon(edge, &poly);
        for _ in 0..10 {
            assert_eq!(point_in_polygon(edge, &poly), first);
        }
    }

    #[test]
    fn test_circle_polygon_cases() {
        let poly = square();
        // Contained
        assert!(circle_intersects_polygon(Vec2::new(50.0, 50.0), 1.0, &poly, true));
        assert!(!circle_intersects_polygon(Vec2::new(50.0, 50.0), 1.0, &poly, false));
        // Touching a vertex from outside
        assert!(circle_intersects_polygon(Vec2::new(-5.0, -5.0), 8.0, &poly, true));
        // Crossing an edge away from any vertex
        assert!(circle_intersects_polygon(Vec2::new(50.0, -5.0), 6.0, &poly, false));
        // Clear miss
        assert!(!circle_intersects_polygon(Vec2::new(50.0, -50.0), 6.0, &poly, true));
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(25.0, 0.0), 10.0));
    }

    #[test]
    fn test_segment_contact_normal_faces_circle() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);

        let below = circle_segment_contact(Vec2::new(50.0, -5.0), 14.0, a, b).unwrap();
        assert!((below.normal - Vec2::new(0.0, -1.0)).length() < 0.0001);
        assert!((below.distance - 5.0).abs() < 0.0001);

        // Same segment, reversed direction: normal still faces the circle
        let above = circle_segment_contact(Vec2::new(50.0, 5.0), 14.0, b, a).unwrap();
        assert!((above.normal - Vec2::new(0.0, 1.0)).length() < 0.0001);

        assert!(circle_segment_contact(Vec2::new(50.0, 14.0), 14.0, a, b).is_none());
    }

    #[test]
    fn test_reflect_velocity() {
        // Moving right, hitting a wall whose normal points left
        let reflected = reflect_velocity(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x + 100.0).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    proptest! {
        #[test]
        fn prop_interior_points_are_inside(x in 1.0f32..99.0, y in 1.0f32..99.0) {
            prop_assert!(point_in_polygon(Vec2::new(x, y), &square()));
        }

        #[test]
        fn prop_far_points_are_outside(x in 200.0f32..1000.0, y in -1000.0f32..1000.0) {
            prop_assert!(!point_in_polygon(Vec2::new(x, y), &square()));
            prop_assert!(!point_in_polygon(Vec2::new(-x, y), &square()));
        }

        #[test]
        fn prop_closest_point_is_on_segment(
            px in -500.0f32..500.0, py in -500.0f32..500.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
        ) {
            let a = Vec2::new(-10.0, 20.0);
            let b = Vec2::new(bx, by);
            let c = closest_point_on_segment(Vec2::new(px, py), a, b);
            let len = a.distance(b);
            prop_assert!(a.distance(c) <= len + 0.01);
            prop_assert!(b.distance(c) <= len + 0.01);
        }
    }
}
