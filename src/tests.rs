//! Tests for the signal map engine

use crate::obstacle::{AxisAlignedWall, Circle, LineOfSight, OrientedWall};
use crate::propagation::{Emitter, free_space_path_loss};
use crate::room::{OBSTACLE_SENTINEL, Room};

fn scenario_a() -> Room {
    let mut room = Room::new(100, 100);
    room.add_emitter(Emitter::new(50.0, 50.0, -30.0, 2.4e9));
    room
}

fn cell(room: &Room, x: usize, y: usize) -> f64 {
    room.power_at(x, y).unwrap()
}

#[test]
fn test_scenario_a_unobstructed() {
    let mut room = scenario_a();
    room.compute_signal_map();

    assert_eq!(cell(&room, 50, 50), -30.0);
    let expected = -30.0 - free_space_path_loss(10.0 / 100.0, 2.4e9);
    assert!((cell(&room, 60, 50) - expected).abs() < 1e-12);
    println!("Cell (60,50): {:.4} dBm", cell(&room, 60, 50));
}

#[test]
fn test_unobstructed_cells_match_best_emitter() {
    let mut room = Room::new(60, 40);
    let emitters = [Emitter::new(10.0, 10.0, -30.0, 2.4e9), Emitter::new(45.0, 30.0, -25.0, 5e9)];
    for e in emitters {
        room.add_emitter(e);
    }
    room.compute_signal_map();

    for y in 0..40 {
        for x in 0..60 {
            let expected = emitters
                .iter()
                .map(|e| e.compute_power(x as f64, y as f64))
                .fold(f64::NEG_INFINITY, f64::max)
                .max(-100.0);
            assert_eq!(cell(&room, x, y), expected, "cell ({}, {})", x, y);
        }
    }
}

#[test]
fn test_monotonic_along_a_ray() {
    let room = scenario_a();
    let mut previous = f64::INFINITY;
    for x in 50..100 {
        let value = room.signal_at(x as f64, 50.0);
        assert!(value <= previous, "x = {}: {} > {}", x, value, previous);
        previous = value;
    }
}

#[test]
fn test_scenario_b_wall_costs_five_db() {
    let mut room = Room::new(100, 100);
    let emitter = Emitter::new(20.0, 50.0, -30.0, 2.4e9);
    room.add_emitter(emitter);
    room.add_obstacle(OrientedWall::new(50.0, 0.0, 50.0, 100.0, 10.0, 5.0).unwrap());
    room.recompute();

    assert_eq!(cell(&room, 50, 50), OBSTACLE_SENTINEL);
    assert!(room.is_occupied(50, 50));

    // Every cell behind the wall loses exactly 5 dB
    for y in 10..90 {
        for x in 60..95 {
            let free = emitter.compute_power(x as f64, y as f64);
            let value = cell(&room, x, y);
            assert!((value - (free - 5.0)).abs() < 1e-12, "cell ({}, {}): {} vs {}", x, y, value, free - 5.0);
        }
    }
    // Cells on the emitter's side are untouched
    assert_eq!(cell(&room, 30, 50), emitter.compute_power(30.0, 50.0));
}

#[test]
fn test_scenario_b_axis_aligned_variant_matches() {
    let build = |axis: bool| {
        let mut room = Room::new(100, 100);
        room.add_emitter(Emitter::new(20.0, 37.0, -30.0, 2.4e9));
        if axis {
            room.add_obstacle(AxisAlignedWall::new(50.0, 0.0, 50.0, 100.0, 10.0, 5.0).unwrap());
        } else {
            room.add_obstacle(OrientedWall::new(50.0, 0.0, 50.0, 100.0, 10.0, 5.0).unwrap());
        }
        room.recompute();
        room
    };
    let fast = build(true);
    let generic = build(false);
    assert_eq!(fast.power_map(), generic.power_map());
}

#[test]
fn test_scenario_c_circle() {
    let mut room = scenario_a();
    room.add_obstacle(OrientedWall::new(50.0, 0.0, 50.0, 100.0, 10.0, 5.0).unwrap());
    let circle = Circle::new(70.0, 70.0, 10.0, 6.0).unwrap();
    room.add_obstacle(circle.clone());
    room.recompute();

    assert_eq!(cell(&room, 70, 70), OBSTACLE_SENTINEL);

    // Far outside on one side to far outside on the other, through the center
    assert!(circle.is_blocking(95.0, 95.0, 45.0, 45.0));

    let mut far = Room::new(100, 100);
    let emitter = Emitter::new(55.0, 55.0, -30.0, 2.4e9);
    far.add_emitter(emitter);
    far.add_obstacle(circle);
    far.compute_signal_map();
    let free = emitter.compute_power(90.0, 90.0);
    assert!((cell(&far, 90, 90) - (free - 6.0)).abs() < 1e-12);
}

#[test]
fn test_border_is_always_marked() {
    let mut room = Room::new(37, 23);
    room.add_emitter(Emitter::new(18.0, 11.0, -20.0, 2.4e9));
    room.recompute();

    let (w, h) = (37, 23);
    for y in 0..h {
        for x in 0..w {
            let border = x < 2 || y < 2 || x >= w - 2 || y >= h - 2;
            if border {
                assert_eq!(cell(&room, x, y), OBSTACLE_SENTINEL, "border cell ({}, {})", x, y);
            } else {
                assert_ne!(cell(&room, x, y), OBSTACLE_SENTINEL, "interior cell ({}, {})", x, y);
            }
            assert_eq!(room.is_occupied(x, y), border);
        }
    }
}

#[test]
fn test_occupancy_mask_matches_sentinel() {
    let mut room = crate::scene::Scene::default_office().build_room().unwrap();
    room.recompute();
    for (value, occupied) in room.power_map().iter().zip(room.occupancy()) {
        assert_eq!(*value == OBSTACLE_SENTINEL, *occupied);
    }
    assert!(room.occupancy().iter().any(|&o| o));
}

#[test]
fn test_idempotent_recomputation() {
    let mut room = scenario_a();
    room.add_obstacle(OrientedWall::new(20.0, 20.0, 80.0, 35.0, 3.0, 4.0).unwrap());
    room.add_obstacle(Circle::new(30.0, 70.0, 8.0, 2.5).unwrap());
    room.compute_signal_map();
    let first = room.power_map().to_vec();
    room.compute_signal_map();
    assert_eq!(first.as_slice(), room.power_map());
}

#[test]
fn test_parallel_matches_sequential() {
    let mut room = crate::scene::Scene::default_office().build_room().unwrap();
    room.compute_signal_map();
    let parallel = room.power_map().to_vec();
    room.compute_signal_map_sequential();
    assert_eq!(parallel.as_slice(), room.power_map());
}

#[test]
fn test_embedded_emitter_is_always_blocked() {
    let mut room = Room::new(40, 40);
    let emitter = Emitter::new(20.0, 20.0, -30.0, 2.4e9);
    room.add_emitter(emitter);
    room.add_obstacle(Circle::new(20.0, 20.0, 3.0, 7.0).unwrap());
    room.compute_signal_map();

    // Every cell sees the emitter through the circle it sits in
    for &(x, y) in &[(5, 5), (35, 20), (20, 34)] {
        let free = emitter.compute_power(x as f64, y as f64);
        assert!((cell(&room, x, y) - (free - 7.0)).abs() < 1e-12);
    }
}

#[test]
fn test_relocating_an_emitter_moves_the_peak() {
    let mut room = scenario_a();
    room.recompute();
    assert_eq!(cell(&room, 50, 50), -30.0);

    assert!(room.relocate_emitter(0, 20.0, 70.0));
    room.recompute();
    assert_eq!(cell(&room, 20, 70), -30.0);
    assert!(cell(&room, 50, 50) < -30.0);
}

#[test]
fn test_parse_args() {
    let args: Vec<String> = ["--scene", "office.json", "--export", "out.csv", "--benchmark"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let options = crate::parse_args(&args).unwrap();
    assert!(options.benchmark && !options.interactive);
    assert_eq!(options.scene.as_deref(), Some("office.json"));
    assert_eq!(options.export.as_deref(), Some("out.csv"));
    assert!(options.ppm.is_none());

    assert!(crate::parse_args(&["--export".to_string()]).is_err());
    assert!(crate::parse_args(&["--bogus".to_string()]).is_err());
}
