//! Rendering functions for converting power maps to displayable formats

use crate::color::{RGBA, heat_color};
use crate::room::OBSTACLE_SENTINEL;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Observed range of real power values in a map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerRange {
    pub min: f64,
    pub max: f64,
}

/// Convert a float value (0.0-1.0) to a byte (0-255)
#[inline]
pub fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Whether a value is a sentinel rather than a power reading.
#[inline]
pub fn is_sentinel(value: f64) -> bool {
    value == OBSTACLE_SENTINEL
}

/// Min/max over values that are neither NaN nor the sentinel.
/// `None` if no such value exists.
pub fn power_range(values: &[f64]) -> Option<PowerRange> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan() && !is_sentinel(*v))
        .fold(None, |range, v| match range {
            None => Some(PowerRange { min: v, max: v }),
            Some(r) => Some(PowerRange { min: r.min.min(v), max: r.max.max(v) }),
        })
}

/// Replace NaN entries (imported data) with the observed minimum.
pub fn fill_missing(values: &mut [f64]) {
    let Some(range) = power_range(values) else {
        return;
    };
    for value in values.iter_mut().filter(|v| v.is_nan()) {
        *value = range.min;
    }
}

/// Occupancy recovered from sentinel cells, for maps read back from CSV.
pub fn occupancy_from_sentinel(values: &[f64]) -> Vec<bool> {
    values.iter().map(|&v| is_sentinel(v)).collect()
}

/// Color every cell of a flat power map. Cells flagged in `occupancy` are
/// drawn in the occupied color.
pub fn power_map_to_rgba(values: &[f64], occupancy: &[bool]) -> Vec<RGBA> {
    let range = power_range(values).unwrap_or(PowerRange { min: 0.0, max: 0.0 });
    values
        .iter()
        .zip(occupancy)
        .map(|(&v, &occupied)| {
            if occupied {
                RGBA::occupied()
            } else if v.is_nan() {
                heat_color(range.min, range.min, range.max)
            } else {
                heat_color(v, range.min, range.max)
            }
        })
        .collect()
}

/// Pack a color as 0x00RRGGBB (minifb buffer layout).
#[inline]
pub fn pack_rgb(pixel: &RGBA) -> u32 {
    ((to_byte(pixel.r) as u32) << 16) | ((to_byte(pixel.g) as u32) << 8) | to_byte(pixel.b) as u32
}

/// Save a flat `width x height` power map as a PPM heatmap, each cell drawn
/// as a `scale x scale` block.
pub fn save_ppm(
    values: &[f64],
    occupancy: &[bool],
    width: usize,
    height: usize,
    path: impl AsRef<Path>,
    scale: usize,
) -> io::Result<()> {
    if values.len() != width * height || occupancy.len() != values.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "map has {} values and {} occupancy flags, expected {}x{}",
                values.len(),
                occupancy.len(),
                width,
                height
            ),
        ));
    }
    let colors = power_map_to_rgba(values, occupancy);
    let img_width = width * scale;
    let img_height = height * scale;

    let mut file = BufWriter::new(File::create(path.as_ref())?);
    writeln!(file, "P3")?;
    writeln!(file, "{} {}", img_width, img_height)?;
    writeln!(file, "255")?;

    for img_y in 0..img_height {
        for img_x in 0..img_width {
            let pixel = &colors[(img_y / scale) * width + img_x / scale];
            write!(file, "{} {} {} ", to_byte(pixel.r), to_byte(pixel.g), to_byte(pixel.b))?;
        }
        writeln!(file)?;
    }

    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_ignores_sentinel_and_nan() {
        let values = [-555.0, -40.0, f64::NAN, -80.0, -555.0, -35.5];
        assert_eq!(power_range(&values), Some(PowerRange { min: -80.0, max: -35.5 }));
        assert_eq!(power_range(&[-555.0, f64::NAN]), None);
    }

    #[test]
    fn missing_values_take_the_minimum() {
        let mut values = vec![-50.0, f64::NAN, -555.0, -70.0];
        fill_missing(&mut values);
        assert_eq!(values, vec![-50.0, -70.0, -555.0, -70.0]);
    }

    #[test]
    fn sentinel_cells_render_as_occupied() {
        let values = [-555.0, -30.0, -90.0];
        let colors = power_map_to_rgba(&values, &occupancy_from_sentinel(&values));
        assert_eq!(colors[0], RGBA::occupied());
        assert_eq!(pack_rgb(&colors[1]), 0x00FF00);
        assert_eq!(pack_rgb(&colors[2]), 0xFF0000);
    }

    #[test]
    fn occupancy_mask_drives_the_occupied_color() {
        let values = [-30.0, -60.0, -90.0];
        let colors = power_map_to_rgba(&values, &[false, true, false]);
        assert_eq!(colors[1], RGBA::occupied());
        assert_eq!(pack_rgb(&colors[0]), 0x00FF00);
        assert_eq!(pack_rgb(&colors[2]), 0xFF0000);
    }

    #[test]
    fn ppm_header_and_size() {
        let path = std::env::temp_dir().join(format!("signal_grid_render_{}.ppm", std::process::id()));
        let values = [-30.0, -60.0, -555.0, -90.0];
        save_ppm(&values, &occupancy_from_sentinel(&values), 2, 2, &path, 3).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("P3"));
        assert_eq!(lines.next(), Some("6 6"));
        assert_eq!(lines.next(), Some("255"));
        assert_eq!(lines.count(), 6);
    }

    #[test]
    fn ppm_rejects_mismatched_dimensions() {
        let path = std::env::temp_dir().join("signal_grid_bad.ppm");
        assert!(save_ppm(&[1.0, 2.0, 3.0], &[false; 3], 2, 2, &path, 1).is_err());
        assert!(save_ppm(&[1.0, 2.0, 3.0, 4.0], &[false; 3], 2, 2, &path, 1).is_err());
    }
}
