mod color;
mod export;
mod geometry;
mod interactive;
mod obstacle;
mod propagation;
mod render;
mod room;
mod scene;

#[cfg(test)]
mod tests;

use std::time::Instant;

use interactive::{InteractiveViewer, ViewerConfig};
use render::power_range;
use room::Room;
use scene::Scene;

/// Parsed command line
struct Options {
    interactive: bool,
    benchmark: bool,
    scene: Option<String>,
    export: Option<String>,
    ppm: Option<String>,
    from_csv: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options { interactive: false, benchmark: false, scene: None, export: None, ppm: None, from_csv: None };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--interactive" => options.interactive = true,
            "--benchmark" => options.benchmark = true,
            "--scene" => options.scene = Some(iter.next().ok_or("--scene needs a file")?.clone()),
            "--export" => options.export = Some(iter.next().ok_or("--export needs a file")?.clone()),
            "--ppm" => options.ppm = Some(iter.next().ok_or("--ppm needs a file")?.clone()),
            "--from-csv" => options.from_csv = Some(iter.next().ok_or("--from-csv needs a file")?.clone()),
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(options)
}

fn print_usage() {
    println!("Signal Grid");
    println!("Usage: signal_grid [--scene FILE] [--export FILE.csv] [--ppm FILE.ppm] [--interactive | --benchmark]");
    println!("       signal_grid --from-csv FILE.csv [--ppm FILE.ppm]");
    println!("  --scene FILE   Load a JSON scene (default: built-in office)");
    println!("  --export FILE  Write the power map as CSV");
    println!("  --ppm FILE     Write the power map as a PPM heatmap");
    println!("  --interactive  Open the minifb viewer");
    println!("  --benchmark    Compare sequential and parallel computation");
    println!("  --from-csv     Render a previously exported CSV instead of computing");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(options: &Options) -> anyhow::Result<()> {
    if let Some(path) = &options.from_csv {
        let ppm = options.ppm.as_deref().unwrap_or("heatmap.ppm");
        return render_csv(path, ppm);
    }

    let scene = match &options.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::default_office(),
    };
    let room = scene.build_room()?;

    if options.benchmark {
        run_benchmark(room);
        return Ok(());
    }
    if options.interactive {
        run_interactive(room, options);
        return Ok(());
    }
    run_batch(room, options);
    Ok(())
}

fn run_batch(mut room: Room, options: &Options) {
    let start = Instant::now();
    room.recompute();
    let elapsed = start.elapsed();

    match power_range(room.power_map()) {
        Some(range) => log::info!(
            "power map {}x{} computed in {:.1} ms, range {:.1} .. {:.1} dBm",
            room.width(),
            room.height(),
            elapsed.as_secs_f64() * 1000.0,
            range.min,
            range.max
        ),
        None => log::warn!("power map has no cells outside obstacles"),
    }

    // Export failures are reported and leave the computed map untouched
    if let Some(path) = &options.export {
        if let Err(e) = export::export_to_csv(&room, path) {
            log::error!("CSV export to {} failed: {}", path, e);
        }
    }
    if let Some(path) = &options.ppm {
        match render::save_ppm(room.power_map(), room.occupancy(), room.width(), room.height(), path, 1) {
            Ok(()) => log::info!("saved heatmap to {}", path),
            Err(e) => log::error!("PPM export to {} failed: {}", path, e),
        }
    }
    if options.export.is_none() && options.ppm.is_none() {
        println!("Power map computed; pass --export or --ppm to save it, --interactive to explore it");
    }
}

/// Render an exported (or externally produced) CSV grid as a PPM heatmap.
fn render_csv(csv_path: &str, ppm_path: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    let grid = export::load_csv(csv_path).with_context(|| format!("failed to load {}", csv_path))?;
    let height = grid.len();
    let width = grid.first().map_or(0, |row| row.len());
    if grid.iter().any(|row| row.len() != width) {
        anyhow::bail!("{} has rows of different lengths", csv_path);
    }

    let mut values: Vec<f64> = grid.into_iter().flatten().collect();
    render::fill_missing(&mut values);
    let occupancy = render::occupancy_from_sentinel(&values);
    render::save_ppm(&values, &occupancy, width, height, ppm_path, 1)
        .with_context(|| format!("failed to write {}", ppm_path))?;
    log::info!("rendered {} to {}", csv_path, ppm_path);
    Ok(())
}

fn run_benchmark(mut room: Room) {
    println!("=== Signal Map Benchmark ===\n");
    println!(
        "Room: {}x{}, {} emitters, {} obstacles",
        room.width(),
        room.height(),
        room.emitters().len(),
        room.obstacles().len()
    );
    println!("-----------------------");

    let iterations = 5;

    let start = Instant::now();
    for _ in 0..iterations {
        room.compute_signal_map_sequential();
    }
    let avg_sequential_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;
    let sequential = room.power_map().to_vec();

    let start = Instant::now();
    for _ in 0..iterations {
        room.compute_signal_map();
    }
    let avg_parallel_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

    println!("  Sequential: {:.3} ms/iter", avg_sequential_ms);
    println!("  Parallel:   {:.3} ms/iter ({} threads)", avg_parallel_ms, rayon::current_num_threads());
    println!("  Speedup: {:.2}x", avg_sequential_ms / avg_parallel_ms);
    if sequential.as_slice() != room.power_map() {
        log::warn!("sequential and parallel maps differ");
    }
}

fn run_interactive(room: Room, options: &Options) {
    let mut config = ViewerConfig::default();
    if let Some(path) = &options.export {
        config.csv_path = path.clone();
    }
    if let Some(path) = &options.ppm {
        config.ppm_path = path.clone();
    }

    match InteractiveViewer::new(room, config) {
        Ok(mut viewer) => {
            if let Err(e) = viewer.run() {
                eprintln!("Error: {}", e);
            }
        }
        Err(e) => {
            eprintln!("Failed to create viewer: {}", e);
        }
    }
}
