//! Point emitter with a transmit power and a carrier frequency.

use serde::Deserialize;

use super::{MIN_DISTANCE_M, RESOLUTION_FACTOR, free_space_path_loss};

/// A transmitter placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Emitter {
    pub x: f64,
    pub y: f64,
    /// Transmit power in dBm
    transmit_power: f64,
    /// Carrier frequency in Hz
    frequency: f64,
}

impl Emitter {
    pub fn new(x: f64, y: f64, transmit_power: f64, frequency: f64) -> Self {
        Emitter { x, y, transmit_power, frequency }
    }

    pub fn transmit_power(&self) -> f64 {
        self.transmit_power
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Move the emitter. Power and frequency are fixed for its lifetime.
    pub fn relocate(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Unobstructed received power (dBm) at a grid point.
    ///
    /// Returns the raw transmit power when the target is (numerically) on
    /// top of the emitter, avoiding `log10(0)`.
    pub fn compute_power(&self, px: f64, py: f64) -> f64 {
        let dx = (px - self.x) / RESOLUTION_FACTOR;
        let dy = (py - self.y) / RESOLUTION_FACTOR;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance < MIN_DISTANCE_M {
            return self.transmit_power;
        }
        self.transmit_power - free_space_path_loss(distance, self.frequency)
    }
}
