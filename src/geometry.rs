//! Shared geometry helpers: tolerance, bounding boxes, local wall frames and
//! parametric segment clipping.

/// Fixed floating-point tolerance used by every geometric comparison.
pub const EPSILON: f64 = 1e-6;

/// Axis-aligned bounding box in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Bounds { min_x, min_y, max_x, max_y }
    }

    /// Square box of half-side `half` centered on `(cx, cy)`.
    pub fn around(cx: f64, cy: f64, half: f64) -> Self {
        Bounds::new(cx - half, cy - half, cx + half, cy + half)
    }

    /// Smallest box containing every point.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let mut bounds = Bounds::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points {
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }
        bounds
    }

    /// Inclusive range of grid cells covered by the box, clipped to a
    /// `width x height` grid. `None` when the box misses the grid entirely.
    pub fn cell_range(&self, width: usize, height: usize) -> Option<((usize, usize), (usize, usize))> {
        if width == 0 || height == 0 {
            return None;
        }
        let start_x = self.min_x.floor().max(0.0);
        let start_y = self.min_y.floor().max(0.0);
        let end_x = self.max_x.ceil().min((width - 1) as f64);
        let end_y = self.max_y.ceil().min((height - 1) as f64);
        if !(start_x <= end_x && start_y <= end_y) {
            return None;
        }
        Some(((start_x as usize, start_y as usize), (end_x as usize, end_y as usize)))
    }
}

/// Pre-computed local coordinate frame of a thick segment.
///
/// The "along" axis runs from the first endpoint to the second, the
/// "perpendicular" axis is the direction rotated a quarter turn
/// counter-clockwise. Both are unit length unless the segment is degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub mid_x: f64,
    pub mid_y: f64,
    pub dir_x: f64,
    pub dir_y: f64,
    pub perp_x: f64,
    pub perp_y: f64,
    pub half_length: f64,
    pub half_thickness: f64,
    pub degenerate: bool,
}

impl LocalFrame {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, thickness: f64) -> Self {
        let dx = x2 - x1;
        let dy = y2 - y1;
        let length_sq = dx * dx + dy * dy;
        let mid_x = (x1 + x2) * 0.5;
        let mid_y = (y1 + y2) * 0.5;
        let half_thickness = thickness * 0.5;

        if length_sq < EPSILON * EPSILON {
            return LocalFrame {
                mid_x,
                mid_y,
                dir_x: 0.0,
                dir_y: 0.0,
                perp_x: 0.0,
                perp_y: 0.0,
                half_length: 0.0,
                half_thickness,
                degenerate: true,
            };
        }

        let length = length_sq.sqrt();
        let dir_x = dx / length;
        let dir_y = dy / length;
        LocalFrame {
            mid_x,
            mid_y,
            dir_x,
            dir_y,
            perp_x: -dir_y,
            perp_y: dir_x,
            half_length: length * 0.5,
            half_thickness,
            degenerate: false,
        }
    }

    /// Project a world point into the frame, returning `(along, perp)`.
    #[inline]
    pub fn project(&self, px: f64, py: f64) -> (f64, f64) {
        let lx = px - self.mid_x;
        let ly = py - self.mid_y;
        (lx * self.dir_x + ly * self.dir_y, lx * self.perp_x + ly * self.perp_y)
    }

    /// The four corners of the thickened segment in world space.
    pub fn corners(&self) -> [(f64, f64); 4] {
        let ax = self.dir_x * self.half_length;
        let ay = self.dir_y * self.half_length;
        let px = self.perp_x * self.half_thickness;
        let py = self.perp_y * self.half_thickness;
        [
            (self.mid_x - ax + px, self.mid_y - ay + py),
            (self.mid_x - ax - px, self.mid_y - ay - py),
            (self.mid_x + ax + px, self.mid_y + ay + py),
            (self.mid_x + ax - px, self.mid_y + ay - py),
        ]
    }

    pub fn bounds(&self) -> Bounds {
        if self.degenerate {
            Bounds::around(self.mid_x, self.mid_y, self.half_thickness)
        } else {
            Bounds::from_points(&self.corners())
        }
    }
}

/// Narrow the parametric interval `[t_enter, t_exit]` of the segment
/// `start + t * delta` to the slab `[lo, hi]` on one axis.
///
/// Returns `false` as soon as the interval becomes empty. Axes on which the
/// segment does not move (|delta| <= EPSILON) leave the interval untouched;
/// the caller's bounding-box reject covers them.
#[inline]
pub fn clip_to_slab(start: f64, delta: f64, lo: f64, hi: f64, t_enter: &mut f64, t_exit: &mut f64) -> bool {
    if delta.abs() <= EPSILON {
        return true;
    }
    let mut t1 = (lo - start) / delta;
    let mut t2 = (hi - start) / delta;
    if t1 > t2 {
        std::mem::swap(&mut t1, &mut t2);
    }
    *t_enter = t_enter.max(t1);
    *t_exit = t_exit.min(t2);
    *t_enter <= *t_exit
}

/// True if the closed ranges `[a0, a1]` (any order) and `[lo, hi]` overlap
/// within EPSILON.
#[inline]
pub fn ranges_overlap(a0: f64, a1: f64, lo: f64, hi: f64) -> bool {
    a0.min(a1) <= hi + EPSILON && a0.max(a1) >= lo - EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_of_vertical_segment() {
        let frame = LocalFrame::new(50.0, 0.0, 50.0, 100.0, 10.0);
        assert!(!frame.degenerate);
        assert_eq!((frame.mid_x, frame.mid_y), (50.0, 50.0));
        assert_eq!((frame.dir_x, frame.dir_y), (0.0, 1.0));
        assert_eq!((frame.perp_x, frame.perp_y), (-1.0, 0.0));
        assert_eq!(frame.half_length, 50.0);
        assert_eq!(frame.half_thickness, 5.0);

        let (along, perp) = frame.project(53.0, 80.0);
        assert!((along - 30.0).abs() < EPSILON);
        assert!((perp + 3.0).abs() < EPSILON);
    }

    #[test]
    fn frame_bounds_cover_thickness() {
        let bounds = LocalFrame::new(50.0, 0.0, 50.0, 100.0, 10.0).bounds();
        assert!((bounds.min_x - 45.0).abs() < EPSILON);
        assert!((bounds.max_x - 55.0).abs() < EPSILON);
        assert!((bounds.min_y - 0.0).abs() < EPSILON);
        assert!((bounds.max_y - 100.0).abs() < EPSILON);

        // Degenerate segment: square of side `thickness`
        let frame = LocalFrame::new(10.0, 10.0, 10.0, 10.0, 4.0);
        assert!(frame.degenerate);
        assert_eq!(frame.bounds(), Bounds::new(8.0, 8.0, 12.0, 12.0));
    }

    #[test]
    fn cell_range_is_clipped_to_grid() {
        let bounds = Bounds::new(-3.5, 2.2, 12.1, 40.0);
        assert_eq!(bounds.cell_range(10, 20), Some(((0, 2), (9, 19))));

        let outside = Bounds::new(30.0, 30.0, 40.0, 40.0);
        assert_eq!(outside.cell_range(10, 10), None);
        assert_eq!(bounds.cell_range(0, 0), None);
    }

    #[test]
    fn slab_clipping_narrows_interval() {
        let (mut t0, mut t1) = (0.0, 1.0);
        // Segment 0 -> 10 against slab [2, 4]
        assert!(clip_to_slab(0.0, 10.0, 2.0, 4.0, &mut t0, &mut t1));
        assert!((t0 - 0.2).abs() < EPSILON && (t1 - 0.4).abs() < EPSILON);

        // Second slab disjoint from the first interval
        assert!(!clip_to_slab(0.0, 10.0, 6.0, 8.0, &mut t0, &mut t1));
    }
}
