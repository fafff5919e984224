//! Flat CSV export and import of power maps.
//!
//! One line per grid row, comma-separated values, no header. Importers map
//! unparsable tokens to NaN.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::room::Room;

/// Write the room's power map as CSV.
pub fn write_csv<W: Write>(room: &Room, mut out: W) -> io::Result<()> {
    for row in room.rows() {
        let line = row.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

/// Save the room's power map to a CSV file.
pub fn export_to_csv(room: &Room, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(room, BufWriter::new(file))?;
    log::info!("exported {}x{} power map to {}", room.width(), room.height(), path.display());
    Ok(())
}

/// Parse CSV rows of floats. Empty lines are skipped, bad tokens become NaN.
pub fn read_csv<R: BufRead>(input: R) -> io::Result<Vec<Vec<f64>>> {
    let mut grid = Vec::new();
    for line in input.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let row: Vec<f64> = line.split(',').map(|token| token.trim().parse().unwrap_or(f64::NAN)).collect();
        grid.push(row);
    }
    Ok(grid)
}

/// Load a CSV file written by `export_to_csv` (or any compatible tool).
pub fn load_csv(path: impl AsRef<Path>) -> io::Result<Vec<Vec<f64>>> {
    let path = path.as_ref();
    let grid = read_csv(BufReader::new(File::open(path)?))?;
    log::info!(
        "loaded {}x{} grid from {}",
        grid.first().map_or(0, |r| r.len()),
        grid.len(),
        path.display()
    );
    Ok(grid)
}
