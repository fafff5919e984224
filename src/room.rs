//! Layer 3: Room grid and signal aggregation
//!
//! The room owns its emitters and obstacles and a flat power map
//! (row-major: index = y * width + x). Computation runs in two passes:
//! - `compute_signal_map`: strongest emitter per cell, minus the attenuation
//!   of every obstacle on that emitter's line of sight
//! - `mark_obstacles_on_power_map`: overwrite obstacle footprints and a
//!   2-cell border with `OBSTACLE_SENTINEL` and flag them in the occupancy mask
//!
//! Cells are independent once emitters and obstacles are fixed, so the
//! default pass splits rows across the rayon pool.

use rayon::prelude::*;

use crate::obstacle::{LineOfSight, Obstacle};
use crate::propagation::Emitter;

/// Fill value before any computation (background noise floor).
pub const BACKGROUND_NOISE_DBM: f64 = -90.0;

/// Lowest power a computed cell can report.
pub const POWER_FLOOR_DBM: f64 = -100.0;

/// Marks a cell as obstacle footprint or room border. Not a power value.
pub const OBSTACLE_SENTINEL: f64 = -555.0;

/// Width in cells of the frame marked around the room.
pub const BORDER_WIDTH: usize = 2;

/// Rectangular room sampled on an integer grid.
#[derive(Debug, Clone)]
pub struct Room {
    width: usize,
    height: usize,
    emitters: Vec<Emitter>,
    obstacles: Vec<Obstacle>,
    power_map: Vec<f64>,
    occupancy: Vec<bool>,
}

impl Room {
    pub fn new(width: usize, height: usize) -> Self {
        Room {
            width,
            height,
            emitters: Vec::new(),
            obstacles: Vec::new(),
            power_map: vec![BACKGROUND_NOISE_DBM; width * height],
            occupancy: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    // ------------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------------

    pub fn add_emitter(&mut self, emitter: Emitter) {
        self.emitters.push(emitter);
    }

    pub fn add_obstacle(&mut self, obstacle: impl Into<Obstacle>) {
        self.obstacles.push(obstacle.into());
    }

    /// Move emitter `index`. Returns `false` if there is no such emitter.
    pub fn relocate_emitter(&mut self, index: usize, x: f64, y: f64) -> bool {
        match self.emitters.get_mut(index) {
            Some(emitter) => {
                emitter.relocate(x, y);
                true
            }
            None => false,
        }
    }

    pub fn remove_emitter(&mut self, index: usize) -> Option<Emitter> {
        (index < self.emitters.len()).then(|| self.emitters.remove(index))
    }

    pub fn remove_obstacle(&mut self, index: usize) -> Option<Obstacle> {
        (index < self.obstacles.len()).then(|| self.obstacles.remove(index))
    }

    /// Drop every obstacle. Emitters and the current map are kept.
    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    /// Index of the emitter closest to `(x, y)` within `max_distance` cells.
    pub fn nearest_emitter(&self, x: f64, y: f64, max_distance: f64) -> Option<usize> {
        self.emitters
            .iter()
            .enumerate()
            .map(|(i, e)| (i, (e.x - x).hypot(e.y - y)))
            .filter(|&(_, d)| d <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    // ------------------------------------------------------------------------
    // Computation
    // ------------------------------------------------------------------------

    /// Power at a single point: the strongest emitter after subtracting the
    /// attenuation of every obstacle blocking its path, never below
    /// `POWER_FLOOR_DBM`.
    pub fn signal_at(&self, x: f64, y: f64) -> f64 {
        let mut best = POWER_FLOOR_DBM;
        for emitter in &self.emitters {
            let mut power = emitter.compute_power(x, y);
            for obstacle in &self.obstacles {
                if obstacle.is_blocking(x, y, emitter.x, emitter.y) {
                    power -= obstacle.attenuation();
                }
            }
            best = best.max(power);
        }
        best
    }

    /// Fill every cell with `signal_at`, one row per rayon task.
    pub fn compute_signal_map(&mut self) {
        let width = self.width;
        if width == 0 {
            return;
        }
        let mut power_map = std::mem::take(&mut self.power_map);
        {
            let room = &*self;
            power_map.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = room.signal_at(x as f64, y as f64);
                }
            });
        }
        self.power_map = power_map;
        self.occupancy.fill(false);
        log::debug!(
            "computed {}x{} signal map ({} emitters, {} obstacles)",
            self.width,
            self.height,
            self.emitters.len(),
            self.obstacles.len()
        );
    }

    /// Same result as `compute_signal_map` on the calling thread only.
    pub fn compute_signal_map_sequential(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let value = self.signal_at(x as f64, y as f64);
                self.power_map[y * self.width + x] = value;
            }
        }
        self.occupancy.fill(false);
    }

    /// Overwrite obstacle footprints and the room border with the sentinel.
    ///
    /// Meant to run after `compute_signal_map`; the power of marked cells is
    /// lost.
    pub fn mark_obstacles_on_power_map(&mut self) {
        for obstacle in &self.obstacles {
            let Some(((start_x, start_y), (end_x, end_y))) = obstacle.expanded_bounds().cell_range(self.width, self.height)
            else {
                log::debug!("{} lies outside the room, nothing to mark", obstacle);
                continue;
            };
            for y in start_y..=end_y {
                for x in start_x..=end_x {
                    if obstacle.is_point_inside(x as f64, y as f64) {
                        let idx = y * self.width + x;
                        self.power_map[idx] = OBSTACLE_SENTINEL;
                        self.occupancy[idx] = true;
                    }
                }
            }
        }
        self.mark_room_boundaries();
    }

    /// Mark a `BORDER_WIDTH`-cell frame around the whole room.
    pub fn mark_room_boundaries(&mut self) {
        let (w, h) = (self.width, self.height);
        for y in 0..h {
            for x in 0..w {
                let on_border = x < BORDER_WIDTH || y < BORDER_WIDTH || x + BORDER_WIDTH >= w || y + BORDER_WIDTH >= h;
                if on_border {
                    self.power_map[y * w + x] = OBSTACLE_SENTINEL;
                    self.occupancy[y * w + x] = true;
                }
            }
        }
    }

    /// Full refresh after an edit: compute, then mark.
    pub fn recompute(&mut self) {
        self.compute_signal_map();
        self.mark_obstacles_on_power_map();
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Value of cell `(x, y)`; `None` outside the grid.
    pub fn power_at(&self, x: usize, y: usize) -> Option<f64> {
        (x < self.width && y < self.height).then(|| self.power_map[y * self.width + x])
    }

    /// Whether cell `(x, y)` is an obstacle footprint or border cell.
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.occupancy[y * self.width + x]
    }

    /// Flat row-major power map.
    pub fn power_map(&self) -> &[f64] {
        &self.power_map
    }

    /// Flat row-major occupancy mask, parallel to `power_map`.
    pub fn occupancy(&self) -> &[bool] {
        &self.occupancy
    }

    /// Rows of the power map, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics; an empty room has no rows
        self.power_map.chunks(self.width.max(1)).take(self.height)
    }
}
