//! Vertical or horizontal wall with a face-intersection fast path.
//!
//! Answers the same questions as `OrientedWall` without projecting into a
//! rotated frame. Walls that are not axis-aligned are rejected at
//! construction; zero-length walls act as a disc like their oriented
//! counterpart.

use crate::geometry::{Bounds, EPSILON, LocalFrame, ranges_overlap};

use super::circle::{point_in_circle, segment_crosses_circle};
use super::{LineOfSight, ObstacleError, check_wall};

/// Which world axis the wall runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Constant x, spans y
    Vertical,
    /// Constant y, spans x
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisAlignedWall {
    // Endpoints are stored normalized: `x1 <= x2`, `y1 <= y2`
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    thickness: f64,
    orientation: Orientation,
    attenuation: f64,
    frame: LocalFrame,
}

impl AxisAlignedWall {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, thickness: f64, attenuation: f64) -> Result<Self, ObstacleError> {
        check_wall(x1, y1, x2, y2, thickness, attenuation)?;

        // Zero-length walls land in the vertical branch
        let orientation = if (x1 - x2).abs() < EPSILON {
            Orientation::Vertical
        } else if (y1 - y2).abs() < EPSILON {
            Orientation::Horizontal
        } else {
            return Err(ObstacleError::NotAxisAligned { x1, y1, x2, y2 });
        };

        let (x1, x2) = (x1.min(x2), x1.max(x2));
        let (y1, y2) = (y1.min(y2), y1.max(y2));
        Ok(AxisAlignedWall {
            x1,
            y1,
            x2,
            y2,
            thickness,
            orientation,
            attenuation,
            frame: LocalFrame::new(x1, y1, x2, y2, thickness),
        })
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Normalized endpoints, lowest coordinates first.
    pub fn endpoints(&self) -> ((f64, f64), (f64, f64)) {
        ((self.x1, self.y1), (self.x2, self.y2))
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn is_degenerate(&self) -> bool {
        self.frame.degenerate
    }

    /// `(faces, span)` in world coordinates: the two face positions on the
    /// crossing axis and the covered range on the running axis.
    fn faces_and_span(&self) -> ((f64, f64), (f64, f64)) {
        let half = self.thickness * 0.5;
        match self.orientation {
            Orientation::Vertical => ((self.x1 - half, self.x1 + half), (self.y1, self.y2)),
            Orientation::Horizontal => ((self.y1 - half, self.y1 + half), (self.x1, self.x2)),
        }
    }

    /// Split a world point into `(across, along)` for this orientation.
    #[inline]
    fn split(&self, x: f64, y: f64) -> (f64, f64) {
        match self.orientation {
            Orientation::Vertical => (x, y),
            Orientation::Horizontal => (y, x),
        }
    }
}

impl LineOfSight for AxisAlignedWall {
    fn is_point_inside(&self, px: f64, py: f64) -> bool {
        let f = &self.frame;
        if f.degenerate {
            return point_in_circle(f.mid_x, f.mid_y, f.half_thickness, px, py);
        }
        let ((face_lo, face_hi), (span_lo, span_hi)) = self.faces_and_span();
        let (across, along) = self.split(px, py);
        across >= face_lo - EPSILON && across <= face_hi + EPSILON && along >= span_lo - EPSILON && along <= span_hi + EPSILON
    }

    fn crosses_segment(&self, px: f64, py: f64, emitter_x: f64, emitter_y: f64) -> bool {
        let f = &self.frame;
        if f.degenerate {
            return segment_crosses_circle(f.mid_x, f.mid_y, f.half_thickness, px, py, emitter_x, emitter_y);
        }
        let (faces, span) = self.faces_and_span();
        let emitter = self.split(emitter_x, emitter_y);
        let target = self.split(px, py);
        crosses_faces(emitter, target, faces, span)
    }

    fn expanded_bounds(&self) -> Bounds {
        self.frame.bounds()
    }

    fn attenuation(&self) -> f64 {
        self.attenuation
    }
}

/// Face test in `(across, along)` coordinates.
///
/// The wall occupies `faces.0 <= across <= faces.1` and
/// `span.0 <= along <= span.1`. The part of the segment between the two
/// faces is found by intersecting it with each face (clamped to the segment
/// when an endpoint already sits between them); the wall is crossed when
/// that part overlaps the span.
fn crosses_faces(emitter: (f64, f64), target: (f64, f64), faces: (f64, f64), span: (f64, f64)) -> bool {
    let (e_across, e_along) = emitter;
    let (t_across, t_along) = target;
    let (face_lo, face_hi) = faces;
    let (span_lo, span_hi) = span;

    // Both endpoints on the same side of the wall
    if (e_across < face_lo - EPSILON && t_across < face_lo - EPSILON)
        || (e_across > face_hi + EPSILON && t_across > face_hi + EPSILON)
    {
        return false;
    }

    let d_across = t_across - e_across;
    if d_across.abs() <= EPSILON {
        // Runs parallel to the faces, between them
        return ranges_overlap(e_along, t_along, span_lo, span_hi);
    }

    let t_lo = (face_lo - e_across) / d_across;
    let t_hi = (face_hi - e_across) / d_across;
    let t_enter = t_lo.min(t_hi).max(0.0);
    let t_exit = t_lo.max(t_hi).min(1.0);
    if t_enter > t_exit {
        return false;
    }

    let d_along = t_along - e_along;
    let along_enter = e_along + t_enter * d_along;
    let along_exit = e_along + t_exit * d_along;
    ranges_overlap(along_enter, along_exit, span_lo, span_hi)
}
