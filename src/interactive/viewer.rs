//! Interactive heatmap viewer - drag emitters with the mouse and watch the
//! power map update

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::export::export_to_csv;
use crate::propagation::Emitter;
use crate::render::{pack_rgb, power_map_to_rgba, save_ppm};
use crate::room::Room;

/// Configuration for the interactive viewer
#[derive(Clone)]
pub struct ViewerConfig {
    /// Pixel scale factor (each cell = scale x scale pixels)
    pub scale: usize,
    /// Frame rate cap
    pub target_fps: usize,
    /// Transmit power (dBm) of emitters added with the right button
    pub new_emitter_power: f64,
    /// Frequency (Hz) of emitters added with the right button
    pub new_emitter_frequency: f64,
    /// How close (in cells) a click must be to grab an emitter
    pub grab_radius: f64,
    /// Destination of the `E` key
    pub csv_path: String,
    /// Destination of the `P` key
    pub ppm_path: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scale: 1,
            target_fps: 30,
            new_emitter_power: -30.0,
            new_emitter_frequency: 2.4e9,
            grab_radius: 20.0,
            csv_path: "heatmap.csv".to_string(),
            ppm_path: "heatmap.ppm".to_string(),
        }
    }
}

/// Interactive viewer for a room's power map
pub struct InteractiveViewer {
    config: ViewerConfig,
    room: Room,
    window: Window,
    buffer: Vec<u32>,
    /// Emitter currently being dragged
    dragging: Option<usize>,
    left_was_down: bool,
    right_was_down: bool,
    /// Last title set on the window
    title: String,
}

impl InteractiveViewer {
    /// Create a viewer showing `room`
    pub fn new(room: Room, config: ViewerConfig) -> Result<Self, String> {
        if room.width() == 0 || room.height() == 0 {
            return Err("room has no cells to display".to_string());
        }
        let scale = config.scale.max(1);
        let window_w = room.width() * scale;
        let window_h = room.height() * scale;

        let window = Window::new(
            "Signal Grid - Heatmap (ESC to exit)",
            window_w,
            window_h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        Ok(Self {
            config: ViewerConfig { scale, ..config },
            room,
            window,
            buffer: vec![0u32; window_w * window_h],
            dragging: None,
            left_was_down: false,
            right_was_down: false,
            title: String::new(),
        })
    }

    /// Run the viewer loop until the window closes
    pub fn run(&mut self) -> Result<(), String> {
        let scale = self.config.scale;
        let (window_w, window_h) = (self.room.width() * scale, self.room.height() * scale);
        self.window.set_target_fps(self.config.target_fps);

        println!("=== Interactive Signal Viewer ===");
        println!("Controls:");
        println!("  Left drag   - Move the nearest emitter");
        println!("  Right click - Add an emitter");
        println!("  D           - Remove the emitter under the cursor");
        println!("  Backspace   - Remove the last obstacle");
        println!("  C           - Clear obstacles");
        println!("  E           - Export CSV to {}", self.config.csv_path);
        println!("  P           - Save PPM to {}", self.config.ppm_path);
        println!("  ESC         - Exit");
        println!();

        self.refresh();

        while self.window.is_open() && !self.window.is_key_down(Key::Escape) {
            if self.window.is_key_pressed(Key::C, KeyRepeat::No) {
                self.room.clear_obstacles();
                log::info!("obstacles cleared");
                self.refresh();
            }
            if self.window.is_key_pressed(Key::Backspace, KeyRepeat::No) {
                let last = self.room.obstacles().len().checked_sub(1);
                if let Some(obstacle) = last.and_then(|index| self.room.remove_obstacle(index)) {
                    log::info!("removed {}", obstacle);
                    self.refresh();
                }
            }
            if self.window.is_key_pressed(Key::E, KeyRepeat::No) {
                // Export failures only abort the export
                if let Err(e) = export_to_csv(&self.room, &self.config.csv_path) {
                    log::error!("CSV export to {} failed: {}", self.config.csv_path, e);
                }
            }
            if self.window.is_key_pressed(Key::P, KeyRepeat::No) {
                let (w, h) = (self.room.width(), self.room.height());
                match save_ppm(self.room.power_map(), self.room.occupancy(), w, h, &self.config.ppm_path, scale) {
                    Ok(()) => log::info!("saved heatmap to {}", self.config.ppm_path),
                    Err(e) => log::error!("PPM export to {} failed: {}", self.config.ppm_path, e),
                }
            }

            if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Discard) {
                let cell_x = (mx / scale as f32) as f64;
                let cell_y = (my / scale as f32) as f64;
                if self.window.is_key_pressed(Key::D, KeyRepeat::No) {
                    self.remove_emitter_near(cell_x, cell_y);
                }
                self.handle_mouse(cell_x, cell_y);
                self.update_title(cell_x as usize, cell_y as usize);
            }

            self.window
                .update_with_buffer(&self.buffer, window_w, window_h)
                .map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    fn handle_mouse(&mut self, cell_x: f64, cell_y: f64) {
        let left_down = self.window.get_mouse_down(MouseButton::Left);
        let right_down = self.window.get_mouse_down(MouseButton::Right);

        if left_down && !self.left_was_down {
            self.dragging = self.room.nearest_emitter(cell_x, cell_y, self.config.grab_radius);
        }
        if !left_down {
            self.dragging = None;
        }
        if let Some(index) = self.dragging {
            let emitter = self.room.emitters()[index];
            if emitter.x.round() != cell_x.round() || emitter.y.round() != cell_y.round() {
                self.room.relocate_emitter(index, cell_x.round(), cell_y.round());
                self.refresh();
            }
        }

        if right_down && !self.right_was_down {
            let emitter = Emitter::new(
                cell_x.round(),
                cell_y.round(),
                self.config.new_emitter_power,
                self.config.new_emitter_frequency,
            );
            log::info!("added emitter at ({}, {})", emitter.x, emitter.y);
            self.room.add_emitter(emitter);
            self.refresh();
        }

        self.left_was_down = left_down;
        self.right_was_down = right_down;
    }

    fn remove_emitter_near(&mut self, cell_x: f64, cell_y: f64) {
        let Some(index) = self.room.nearest_emitter(cell_x, cell_y, self.config.grab_radius) else {
            return;
        };
        if let Some(emitter) = self.room.remove_emitter(index) {
            log::info!("removed emitter at ({}, {})", emitter.x, emitter.y);
            self.dragging = None;
            self.refresh();
        }
    }

    /// Show the reading under the cursor in the window title
    fn update_title(&mut self, x: usize, y: usize) {
        let reading = match self.room.power_at(x, y) {
            Some(_) if self.room.is_occupied(x, y) => "obstacle".to_string(),
            Some(power) => format!("{:.1} dBm", power),
            None => return,
        };
        let title = format!("Signal Grid - ({}, {}): {} (ESC to exit)", x, y, reading);
        if title != self.title {
            self.window.set_title(&title);
            self.title = title;
        }
    }

    /// Recompute the room and redraw the pixel buffer
    fn refresh(&mut self) {
        self.room.recompute();
        self.render_to_buffer();
    }

    /// Render the power map to the pixel buffer, emitters as white dots
    fn render_to_buffer(&mut self) {
        let (grid_w, grid_h) = (self.room.width(), self.room.height());
        let scale = self.config.scale;
        let window_w = grid_w * scale;
        let colors = power_map_to_rgba(self.room.power_map(), self.room.occupancy());

        for gy in 0..grid_h {
            for gx in 0..grid_w {
                let color_u32 = pack_rgb(&colors[gy * grid_w + gx]);
                for sy in 0..scale {
                    let row = (gy * scale + sy) * window_w;
                    for sx in 0..scale {
                        self.buffer[row + gx * scale + sx] = color_u32;
                    }
                }
            }
        }

        for emitter in self.room.emitters() {
            let (ex, ey) = (emitter.x.round() as i64, emitter.y.round() as i64);
            for dy in -2..=2 {
                for dx in -2..=2 {
                    let (x, y) = (ex + dx, ey + dy);
                    if x < 0 || y < 0 || x as usize >= grid_w || y as usize >= grid_h {
                        continue;
                    }
                    let (x, y) = (x as usize * scale, y as usize * scale);
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.buffer[(y + sy) * window_w + x + sx] = 0xFFFFFF;
                        }
                    }
                }
            }
        }
    }
}
