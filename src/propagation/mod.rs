//! Layer 1: Free-space propagation (pure physics)
//!
//! Received power from a single emitter with no obstruction. Obstacles are
//! applied on top of this by the room engine.

pub mod emitter;

pub use emitter::Emitter;

/// Grid units per meter. A distance of 100 cells is one meter in the model.
pub const RESOLUTION_FACTOR: f64 = 100.0;

/// Propagation speed in m/s.
pub const SPEED_OF_LIGHT: f64 = 3e8;

/// Distances (in meters) below this are treated as "at the emitter".
pub const MIN_DISTANCE_M: f64 = 0.001;

/// Free-space path loss in dB for a distance in meters and a frequency in Hz.
///
/// `FSPL = 20·log10(d) + 20·log10(f) + 20·log10(4π / c)`
#[inline]
pub fn free_space_path_loss(distance_m: f64, frequency_hz: f64) -> f64 {
    20.0 * distance_m.log10()
        + 20.0 * frequency_hz.log10()
        + 20.0 * (4.0 * std::f64::consts::PI / SPEED_OF_LIGHT).log10()
}
