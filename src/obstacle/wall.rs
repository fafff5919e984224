//! Thick wall segment with arbitrary orientation.
//!
//! All queries run in the wall's local frame, so the blocking test is exact
//! whatever the rotation:
//! - containment compares projections against the half-extents
//! - blocking is a separating-axis test with Liang-Barsky clipping on the
//!   along and perpendicular axes
//!
//! Zero-length walls degrade to a disc of radius `thickness / 2`.

use crate::geometry::{Bounds, EPSILON, LocalFrame, clip_to_slab};

use super::circle::{point_in_circle, segment_crosses_circle};
use super::{LineOfSight, ObstacleError, check_wall};

/// Wall from `(x1, y1)` to `(x2, y2)`, `thickness` wide.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedWall {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    thickness: f64,
    attenuation: f64,
    frame: LocalFrame,
}

impl OrientedWall {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, thickness: f64, attenuation: f64) -> Result<Self, ObstacleError> {
        check_wall(x1, y1, x2, y2, thickness, attenuation)?;
        Ok(OrientedWall {
            x1,
            y1,
            x2,
            y2,
            thickness,
            attenuation,
            frame: LocalFrame::new(x1, y1, x2, y2, thickness),
        })
    }

    pub fn endpoints(&self) -> ((f64, f64), (f64, f64)) {
        ((self.x1, self.y1), (self.x2, self.y2))
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn is_degenerate(&self) -> bool {
        self.frame.degenerate
    }
}

impl LineOfSight for OrientedWall {
    fn is_point_inside(&self, px: f64, py: f64) -> bool {
        let f = &self.frame;
        if f.degenerate {
            return point_in_circle(f.mid_x, f.mid_y, f.half_thickness, px, py);
        }
        let (along, perp) = f.project(px, py);
        along.abs() <= f.half_length + EPSILON && perp.abs() <= f.half_thickness + EPSILON
    }

    fn crosses_segment(&self, px: f64, py: f64, emitter_x: f64, emitter_y: f64) -> bool {
        let f = &self.frame;
        if f.degenerate {
            return segment_crosses_circle(f.mid_x, f.mid_y, f.half_thickness, px, py, emitter_x, emitter_y);
        }
        let emitter = f.project(emitter_x, emitter_y);
        let target = f.project(px, py);
        separating_axis_test(emitter, target, f.half_length, f.half_thickness)
    }

    fn expanded_bounds(&self) -> Bounds {
        self.frame.bounds()
    }

    fn attenuation(&self) -> f64 {
        self.attenuation
    }
}

/// Segment-vs-centered-rectangle test in local coordinates.
///
/// `emitter` and `target` are `(along, perp)` projections; the rectangle is
/// `[-half_length, half_length] x [-half_thickness, half_thickness]`.
pub(crate) fn separating_axis_test(emitter: (f64, f64), target: (f64, f64), half_length: f64, half_thickness: f64) -> bool {
    let (e_along, e_perp) = emitter;
    let (t_along, t_perp) = target;

    // Bounding-box reject
    if e_along.max(t_along) < -half_length - EPSILON || e_along.min(t_along) > half_length + EPSILON {
        return false;
    }
    if e_perp.max(t_perp) < -half_thickness - EPSILON || e_perp.min(t_perp) > half_thickness + EPSILON {
        return false;
    }

    let mut t_enter = 0.0;
    let mut t_exit = 1.0;
    if !clip_to_slab(e_along, t_along - e_along, -half_length, half_length, &mut t_enter, &mut t_exit) {
        return false;
    }
    if !clip_to_slab(e_perp, t_perp - e_perp, -half_thickness, half_thickness, &mut t_enter, &mut t_exit) {
        return false;
    }

    t_enter <= t_exit && t_exit >= 0.0 && t_enter <= 1.0
}
