//! Layer 2: Obstacles that attenuate line-of-sight paths
//!
//! Every obstacle variant implements the `LineOfSight` trait. The room engine
//! only talks to the closed `Obstacle` enum, which dispatches by variant.

pub mod axis_wall;
pub mod circle;
pub mod wall;

pub use axis_wall::{AxisAlignedWall, Orientation};
pub use circle::Circle;
pub use wall::OrientedWall;

use crate::geometry::Bounds;

/// Geometric queries shared by all obstacle variants.
pub trait LineOfSight {
    /// Whether `(px, py)` lies inside the obstacle or on its edge.
    fn is_point_inside(&self, px: f64, py: f64) -> bool;

    /// Whether the segment between the two points crosses the obstacle's
    /// geometry. Containment of the endpoints is handled by `is_blocking`.
    fn crosses_segment(&self, px: f64, py: f64, emitter_x: f64, emitter_y: f64) -> bool;

    /// Bounding box of the obstacle's full footprint.
    fn expanded_bounds(&self) -> Bounds;

    /// Loss in dB applied to every path the obstacle blocks.
    fn attenuation(&self) -> f64;

    /// Whether the obstacle blocks the path from the emitter to `(px, py)`.
    ///
    /// An endpoint inside the obstacle always counts as blocked, whatever the
    /// crossing test says.
    fn is_blocking(&self, px: f64, py: f64, emitter_x: f64, emitter_y: f64) -> bool {
        if self.is_point_inside(px, py) || self.is_point_inside(emitter_x, emitter_y) {
            return true;
        }
        self.crosses_segment(px, py, emitter_x, emitter_y)
    }
}

/// Closed set of obstacle shapes placed in a room.
#[derive(Debug, Clone, PartialEq)]
pub enum Obstacle {
    OrientedWall(OrientedWall),
    AxisAlignedWall(AxisAlignedWall),
    Circle(Circle),
}

impl Obstacle {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Obstacle::OrientedWall(_) => "oriented wall",
            Obstacle::AxisAlignedWall(_) => "axis-aligned wall",
            Obstacle::Circle(_) => "circle",
        }
    }
}

impl std::fmt::Display for Obstacle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Obstacle::OrientedWall(wall) if wall.is_degenerate() => {
                let ((x, y), _) = wall.endpoints();
                write!(f, "zero-length wall at ({}, {}), {} thick", x, y, wall.thickness())
            }
            Obstacle::OrientedWall(wall) => {
                let ((x1, y1), (x2, y2)) = wall.endpoints();
                write!(f, "{} ({}, {}) -> ({}, {}), {} thick", self.kind(), x1, y1, x2, y2, wall.thickness())
            }
            Obstacle::AxisAlignedWall(wall) if wall.is_degenerate() => {
                let ((x, y), _) = wall.endpoints();
                write!(f, "zero-length wall at ({}, {}), {} thick", x, y, wall.thickness())
            }
            Obstacle::AxisAlignedWall(wall) => {
                let ((x1, y1), (x2, y2)) = wall.endpoints();
                let direction = match wall.orientation() {
                    Orientation::Vertical => "vertical",
                    Orientation::Horizontal => "horizontal",
                };
                write!(f, "{} wall ({}, {}) -> ({}, {}), {} thick", direction, x1, y1, x2, y2, wall.thickness())
            }
            Obstacle::Circle(circle) => {
                let (cx, cy) = circle.center();
                write!(f, "{} at ({}, {}), radius {}", self.kind(), cx, cy, circle.radius())
            }
        }?;
        write!(f, ", {} dB", self.attenuation())
    }
}

impl LineOfSight for Obstacle {
    fn is_point_inside(&self, px: f64, py: f64) -> bool {
        match self {
            Obstacle::OrientedWall(wall) => wall.is_point_inside(px, py),
            Obstacle::AxisAlignedWall(wall) => wall.is_point_inside(px, py),
            Obstacle::Circle(circle) => circle.is_point_inside(px, py),
        }
    }

    fn crosses_segment(&self, px: f64, py: f64, emitter_x: f64, emitter_y: f64) -> bool {
        match self {
            Obstacle::OrientedWall(wall) => wall.crosses_segment(px, py, emitter_x, emitter_y),
            Obstacle::AxisAlignedWall(wall) => wall.crosses_segment(px, py, emitter_x, emitter_y),
            Obstacle::Circle(circle) => circle.crosses_segment(px, py, emitter_x, emitter_y),
        }
    }

    fn expanded_bounds(&self) -> Bounds {
        match self {
            Obstacle::OrientedWall(wall) => wall.expanded_bounds(),
            Obstacle::AxisAlignedWall(wall) => wall.expanded_bounds(),
            Obstacle::Circle(circle) => circle.expanded_bounds(),
        }
    }

    fn attenuation(&self) -> f64 {
        match self {
            Obstacle::OrientedWall(wall) => wall.attenuation(),
            Obstacle::AxisAlignedWall(wall) => wall.attenuation(),
            Obstacle::Circle(circle) => circle.attenuation(),
        }
    }
}

impl From<OrientedWall> for Obstacle {
    fn from(wall: OrientedWall) -> Self {
        Obstacle::OrientedWall(wall)
    }
}

impl From<AxisAlignedWall> for Obstacle {
    fn from(wall: AxisAlignedWall) -> Self {
        Obstacle::AxisAlignedWall(wall)
    }
}

impl From<Circle> for Obstacle {
    fn from(circle: Circle) -> Self {
        Obstacle::Circle(circle)
    }
}

/// Reasons an obstacle cannot be constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum ObstacleError {
    /// A coordinate or extent is NaN or infinite.
    NonFinite(&'static str),
    /// Thickness or radius below zero.
    NegativeExtent(&'static str, f64),
    /// Attenuation below zero.
    NegativeAttenuation(f64),
    /// Axis-aligned wall whose endpoints are neither vertical nor horizontal.
    NotAxisAligned { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl std::fmt::Display for ObstacleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObstacleError::NonFinite(field) => write!(f, "{} must be finite", field),
            ObstacleError::NegativeExtent(field, value) => write!(f, "{} must be >= 0, got {}", field, value),
            ObstacleError::NegativeAttenuation(value) => write!(f, "attenuation must be >= 0 dB, got {}", value),
            ObstacleError::NotAxisAligned { x1, y1, x2, y2 } => {
                write!(f, "wall ({}, {}) -> ({}, {}) is neither vertical nor horizontal", x1, y1, x2, y2)
            }
        }
    }
}

impl std::error::Error for ObstacleError {}

fn check_finite(field: &'static str, value: f64) -> Result<(), ObstacleError> {
    if value.is_finite() { Ok(()) } else { Err(ObstacleError::NonFinite(field)) }
}

fn check_extent(field: &'static str, value: f64) -> Result<(), ObstacleError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(ObstacleError::NegativeExtent(field, value));
    }
    Ok(())
}

fn check_attenuation(value: f64) -> Result<(), ObstacleError> {
    check_finite("attenuation", value)?;
    if value < 0.0 {
        return Err(ObstacleError::NegativeAttenuation(value));
    }
    Ok(())
}

/// Validation shared by both wall variants.
fn check_wall(x1: f64, y1: f64, x2: f64, y2: f64, thickness: f64, attenuation: f64) -> Result<(), ObstacleError> {
    check_finite("x1", x1)?;
    check_finite("y1", y1)?;
    check_finite("x2", x2)?;
    check_finite("y2", y2)?;
    check_extent("thickness", thickness)?;
    check_attenuation(attenuation)
}
