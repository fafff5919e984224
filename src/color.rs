//! Heat palette for power maps.
//!
//! Weak signal is red, medium yellow, strong green. Sentinel cells are
//! painted a solid dark gray.

/// RGBA color with floating point components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RGBA {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl RGBA {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        RGBA { r, g, b, a }
    }

    /// Color used for obstacle footprints and the room border.
    pub fn occupied() -> Self {
        RGBA { r: 0.15, g: 0.15, b: 0.15, a: 1.0 }
    }
}

/// Map a power value onto the red→yellow→green palette.
///
/// `min` and `max` are the observed range; values outside it are clamped.
/// A flat range (max == min) renders as the strongest color.
pub fn heat_color(power: f64, min: f64, max: f64) -> RGBA {
    let span = max - min;
    let normalized = if span.abs() < f64::EPSILON {
        1.0
    } else {
        ((power - min) / span).clamp(0.0, 1.0) as f32
    };

    if normalized < 0.5 {
        // Red (weak) to yellow (medium)
        RGBA::new(1.0, normalized * 2.0, 0.0, 1.0)
    } else {
        // Yellow to green (strong)
        let t = (normalized - 0.5) * 2.0;
        RGBA::new(1.0 - t, 1.0, 0.0, 1.0)
    }
}
