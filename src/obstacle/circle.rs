//! Circular obstacle (furniture, pillars).

use crate::geometry::{Bounds, EPSILON};

use super::{LineOfSight, ObstacleError, check_attenuation, check_extent, check_finite};

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    cx: f64,
    cy: f64,
    radius: f64,
    attenuation: f64,
}

impl Circle {
    pub fn new(cx: f64, cy: f64, radius: f64, attenuation: f64) -> Result<Self, ObstacleError> {
        check_finite("cx", cx)?;
        check_finite("cy", cy)?;
        check_extent("radius", radius)?;
        check_attenuation(attenuation)?;
        Ok(Circle { cx, cy, radius, attenuation })
    }

    pub fn center(&self) -> (f64, f64) {
        (self.cx, self.cy)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl LineOfSight for Circle {
    fn is_point_inside(&self, px: f64, py: f64) -> bool {
        point_in_circle(self.cx, self.cy, self.radius, px, py)
    }

    fn crosses_segment(&self, px: f64, py: f64, emitter_x: f64, emitter_y: f64) -> bool {
        segment_crosses_circle(self.cx, self.cy, self.radius, px, py, emitter_x, emitter_y)
    }

    fn expanded_bounds(&self) -> Bounds {
        Bounds::around(self.cx, self.cy, self.radius)
    }

    fn attenuation(&self) -> f64 {
        self.attenuation
    }
}

#[inline]
pub(crate) fn point_in_circle(cx: f64, cy: f64, radius: f64, px: f64, py: f64) -> bool {
    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy <= radius * radius + EPSILON
}

/// Whether the segment from the emitter to `(px, py)` meets the circle
/// boundary, i.e. a root of `|E + t·D - C|² = r²` lies in `[0, 1]`.
pub(crate) fn segment_crosses_circle(cx: f64, cy: f64, radius: f64, px: f64, py: f64, emitter_x: f64, emitter_y: f64) -> bool {
    let dx = px - emitter_x;
    let dy = py - emitter_y;
    let fx = emitter_x - cx;
    let fy = emitter_y - cy;

    let a = dx * dx + dy * dy;
    if a < EPSILON * EPSILON {
        // Zero-length segment: only containment can block it
        return false;
    }
    let b = 2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return false;
    }
    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);

    (0.0..=1.0).contains(&t1) || (0.0..=1.0).contains(&t2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_inside_includes_the_rim() {
        let circle = Circle::new(70.0, 70.0, 10.0, 6.0).unwrap();
        assert!(circle.is_point_inside(70.0, 70.0));
        assert!(circle.is_point_inside(80.0, 70.0));
        assert!(!circle.is_point_inside(80.5, 70.0));
    }

    #[test]
    fn segment_through_the_circle_blocks() {
        let circle = Circle::new(70.0, 70.0, 10.0, 6.0).unwrap();
        assert!(circle.is_blocking(95.0, 95.0, 40.0, 40.0));
        // Misses to the side
        assert!(!circle.is_blocking(40.0, 90.0, 95.0, 90.0));
        // Line would hit, but the segment stops before the circle
        assert!(!circle.is_blocking(50.0, 50.0, 40.0, 40.0));
    }

    #[test]
    fn zero_length_segment_outside_does_not_block() {
        let circle = Circle::new(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(!circle.is_blocking(5.0, 5.0, 5.0, 5.0));
        assert!(circle.is_blocking(0.5, 0.0, 0.5, 0.0));
    }

    #[test]
    fn bounds_are_the_enclosing_square() {
        let circle = Circle::new(3.0, -2.0, 1.5, 0.0).unwrap();
        assert_eq!(circle.center(), (3.0, -2.0));
        assert_eq!(circle.radius(), 1.5);
        assert_eq!(circle.expanded_bounds(), Bounds::new(1.5, -3.5, 4.5, -0.5));
    }
}
