//! Scene description: room size, emitters and obstacles.
//!
//! Scenes are JSON files. Obstacles are tagged by `kind`:
//!
//! ```json
//! {
//!   "width": 400, "height": 300,
//!   "emitters": [{ "x": 150, "y": 150, "transmit_power": -30, "frequency": 2.4e9 }],
//!   "obstacles": [
//!     { "kind": "axis_aligned_wall", "x1": 100, "y1": 200, "x2": 100, "y2": 300, "thickness": 10, "attenuation": 5 },
//!     { "kind": "oriented_wall", "x1": 200, "y1": 50, "x2": 300, "y2": 150, "thickness": 5, "attenuation": 10 },
//!     { "kind": "circle", "cx": 200, "cy": 250, "radius": 15, "attenuation": 5 }
//!   ]
//! }
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::obstacle::{AxisAlignedWall, Circle, Obstacle, ObstacleError, OrientedWall};
use crate::propagation::Emitter;
use crate::room::Room;

/// Largest room a scene may describe (cells).
pub const MAX_CELLS: usize = 1 << 26;

#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub emitters: Vec<Emitter>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleDef>,
}

/// Obstacle as written in a scene file, validated when the room is built.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObstacleDef {
    OrientedWall { x1: f64, y1: f64, x2: f64, y2: f64, thickness: f64, attenuation: f64 },
    AxisAlignedWall { x1: f64, y1: f64, x2: f64, y2: f64, thickness: f64, attenuation: f64 },
    Circle { cx: f64, cy: f64, radius: f64, attenuation: f64 },
}

impl ObstacleDef {
    pub fn build(&self) -> Result<Obstacle, ObstacleError> {
        Ok(match *self {
            ObstacleDef::OrientedWall { x1, y1, x2, y2, thickness, attenuation } => {
                OrientedWall::new(x1, y1, x2, y2, thickness, attenuation)?.into()
            }
            ObstacleDef::AxisAlignedWall { x1, y1, x2, y2, thickness, attenuation } => {
                AxisAlignedWall::new(x1, y1, x2, y2, thickness, attenuation)?.into()
            }
            ObstacleDef::Circle { cx, cy, radius, attenuation } => Circle::new(cx, cy, radius, attenuation)?.into(),
        })
    }
}

impl Scene {
    /// Parse a scene from JSON text.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid scene JSON")
    }

    /// Read and parse a scene file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("failed to read scene {}", path.display()))?;
        let scene = Self::from_json(&text).with_context(|| format!("failed to parse scene {}", path.display()))?;
        log::info!(
            "loaded scene {} ({}x{}, {} emitters, {} obstacles)",
            path.display(),
            scene.width,
            scene.height,
            scene.emitters.len(),
            scene.obstacles.len()
        );
        Ok(scene)
    }

    /// Two access points in an office with straight and slanted walls and
    /// round furniture.
    pub fn default_office() -> Self {
        Scene {
            width: 1220,
            height: 600,
            emitters: vec![Emitter::new(150.0, 150.0, -30.0, 2.4e9), Emitter::new(500.0, 500.0, -28.0, 2.4e9)],
            obstacles: vec![
                ObstacleDef::AxisAlignedWall { x1: 100.0, y1: 200.0, x2: 100.0, y2: 300.0, thickness: 10.0, attenuation: 5.0 },
                ObstacleDef::AxisAlignedWall { x1: 50.0, y1: 50.0, x2: 250.0, y2: 50.0, thickness: 15.0, attenuation: 20.0 },
                ObstacleDef::OrientedWall { x1: 400.0, y1: 450.0, x2: 600.0, y2: 650.0, thickness: 5.0, attenuation: 10.0 },
                ObstacleDef::Circle { cx: 200.0, cy: 300.0, radius: 15.0, attenuation: 5.0 },
                ObstacleDef::Circle { cx: 600.0, cy: 200.0, radius: 30.0, attenuation: 10.0 },
            ],
        }
    }

    /// Build a room from the scene. Fails on an oversized grid or on the
    /// first invalid obstacle.
    pub fn build_room(&self) -> anyhow::Result<Room> {
        match self.width.checked_mul(self.height) {
            Some(cells) if cells <= MAX_CELLS => {}
            _ => anyhow::bail!(
                "room of {}x{} cells exceeds the limit of {} cells",
                self.width,
                self.height,
                MAX_CELLS
            ),
        }

        let mut room = Room::new(self.width, self.height);
        for emitter in &self.emitters {
            log::debug!(
                "emitter at ({}, {}): {} dBm, {} Hz",
                emitter.x,
                emitter.y,
                emitter.transmit_power(),
                emitter.frequency()
            );
            room.add_emitter(*emitter);
        }
        for (index, def) in self.obstacles.iter().enumerate() {
            let obstacle = def.build().with_context(|| format!("obstacle #{} is invalid", index))?;
            log::debug!("obstacle #{}: {}", index, obstacle);
            room.add_obstacle(obstacle);
        }
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::LineOfSight;

    const SAMPLE: &str = r#"{
        "width": 40, "height": 30,
        "emitters": [{ "x": 5, "y": 5, "transmit_power": -30, "frequency": 2.4e9 }],
        "obstacles": [
            { "kind": "axis_aligned_wall", "x1": 20, "y1": 0, "x2": 20, "y2": 30, "thickness": 2, "attenuation": 5 },
            { "kind": "oriented_wall", "x1": 25, "y1": 5, "x2": 35, "y2": 15, "thickness": 1, "attenuation": 3 },
            { "kind": "circle", "cx": 30, "cy": 25, "radius": 3, "attenuation": 6 }
        ]
    }"#;

    #[test]
    fn parses_tagged_obstacles() {
        let scene = Scene::from_json(SAMPLE).unwrap();
        assert_eq!((scene.width, scene.height), (40, 30));
        assert_eq!(scene.emitters[0], Emitter::new(5.0, 5.0, -30.0, 2.4e9));

        let room = scene.build_room().unwrap();
        let kinds: Vec<&str> = room.obstacles().iter().map(|o| o.kind()).collect();
        assert_eq!(kinds, vec!["axis-aligned wall", "oriented wall", "circle"]);
        assert_eq!(room.obstacles()[2].attenuation(), 6.0);
    }

    #[test]
    fn invalid_obstacle_is_reported_with_its_index() {
        let text = r#"{ "width": 10, "height": 10,
            "obstacles": [{ "kind": "axis_aligned_wall", "x1": 0, "y1": 0, "x2": 5, "y2": 5, "thickness": 1, "attenuation": 1 }] }"#;
        let err = Scene::from_json(text).unwrap().build_room().unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("obstacle #0"), "{}", message);
        assert!(message.contains("neither vertical nor horizontal"), "{}", message);
    }

    #[test]
    fn oversized_rooms_are_rejected() {
        let text = format!(r#"{{ "width": {}, "height": 2 }}"#, usize::MAX);
        let err = Scene::from_json(&text).unwrap().build_room().unwrap_err();
        assert!(err.to_string().contains("exceeds the limit"), "{}", err);

        let huge = Scene { width: 100_000, height: 100_000, emitters: Vec::new(), obstacles: Vec::new() };
        assert!(huge.build_room().is_err());

        let edge = Scene { width: MAX_CELLS, height: 1, emitters: Vec::new(), obstacles: Vec::new() };
        assert!(Scene { height: 2, ..edge }.build_room().is_err());
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let text = r#"{ "width": 10, "height": 10, "obstacles": [{ "kind": "triangle" }] }"#;
        assert!(Scene::from_json(text).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Scene::load("/definitely/not/a/scene.json").is_err());
    }

    #[test]
    fn default_office_builds() {
        let room = Scene::default_office().build_room().unwrap();
        assert_eq!((room.width(), room.height()), (1220, 600));
        assert_eq!(room.emitters().len(), 2);
        assert_eq!(room.obstacles().len(), 5);
    }
}
