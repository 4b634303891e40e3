#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{Controls, RotationMode};
use cgmath::prelude::*;
use cgmath::{Deg, Matrix4, Quaternion, Vector3};
use std::collections::HashSet;

/// Keys the viewer reacts to, named after `KeyboardEvent.code` values.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Key {
    Escape,
    Digit1,
    Digit2,
    R,
    E,
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "Escape" => Self::Escape,
            "Digit1" | "Numpad1" => Self::Digit1,
            "Digit2" | "Numpad2" => Self::Digit2,
            "KeyR" => Self::R,
            "KeyE" => Self::E,
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            "ArrowUp" => Self::Up,
            "ArrowDown" => Self::Down,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerPhase {
    Running,
    Closing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillMode {
    Fill,
    Wireframe,
}

/// Everything user input can change between two frames.
#[derive(Debug)]
pub struct ViewerState {
    model: Matrix4<f32>,

    // arrow key accumulators in degrees, and which key of each pair was last
    rotate_x: f32,
    rotate_y: f32,
    last_up: bool,
    last_left: bool,

    roughness: f32,
    exposure: f32,
    fill_mode: FillMode,
    phase: ViewerPhase,

    held_keys: HashSet<Key>,
    dragging: bool,
    last_cursor: Option<(f32, f32)>,
    close_requested: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            model: Matrix4::identity(),
            rotate_x: 0.0,
            rotate_y: 0.0,
            last_up: false,
            last_left: false,
            roughness: 0.0,
            exposure: 1.0,
            fill_mode: FillMode::Fill,
            phase: ViewerPhase::Running,
            held_keys: HashSet::new(),
            dragging: false,
            last_cursor: None,
            close_requested: false,
        }
    }
}

impl ViewerState {
    pub fn model(&self) -> Matrix4<f32> {
        self.model
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn phase(&self) -> ViewerPhase {
        self.phase
    }

    pub fn is_closing(&self) -> bool {
        self.phase == ViewerPhase::Closing
    }

    pub fn key_down(&mut self, key: Key) {
        self.held_keys.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.held_keys.remove(&key);
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Tracks the left button; other buttons are ignored.
    pub fn mouse_button(&mut self, button: i16, pressed: bool) {
        if button != 0 {
            return;
        }

        self.dragging = pressed;
        self.last_cursor = None;
    }

    /// Applies a drag rotation for the pointer movement since the last sample.
    ///
    /// The first sample after a button press only records the position.
    pub fn cursor_moved(&mut self, x: f32, y: f32, controls: &Controls) {
        let sensitivity = match controls.rotation {
            RotationMode::Drag { sensitivity } => sensitivity,
            RotationMode::Keys { .. } => return,
        };

        if !self.dragging {
            return;
        }

        let (last_x, last_y) = self.last_cursor.unwrap_or((x, y));
        self.last_cursor = Some((x, y));

        if (x, y) == (last_x, last_y) {
            return;
        }

        let dx = (x - last_x) * sensitivity;
        let dy = (y - last_y) * sensitivity;

        let orientation = Quaternion::from_axis_angle(Vector3::unit_x(), Deg(dy))
            * Quaternion::from_axis_angle(Vector3::unit_y(), Deg(dx));

        self.model = Matrix4::from(orientation.normalize()) * self.model;
    }

    /// Rotates the model about one of its own axes.
    pub fn rotate(&mut self, axis: Vector3<f32>, angle: Deg<f32>) {
        self.model = self.model * Matrix4::from_axis_angle(axis, angle);
    }

    /// Applies held keys for one frame and returns whether to keep running.
    pub fn step(&mut self, controls: &Controls) -> bool {
        if self.is_closing() {
            return false;
        }

        if self.close_requested || self.held(Key::Escape) {
            self.phase = ViewerPhase::Closing;
            info!("viewer closing");
            return false;
        }

        if self.held(Key::Digit1) {
            self.fill_mode = FillMode::Wireframe;
        }

        if self.held(Key::Digit2) {
            self.fill_mode = FillMode::Fill;
        }

        if self.held(Key::R) {
            self.roughness = bounded_increment(
                self.roughness,
                controls.roughness_step,
                controls.roughness_limit,
            );
            self.log_material();
        }

        if self.held(Key::E) {
            self.exposure = bounded_increment(
                self.exposure,
                controls.exposure_step,
                controls.exposure_limit,
            );
            self.log_material();
        }

        if let RotationMode::Keys { step } = controls.rotation {
            self.apply_rotation_keys(step);
        }

        true
    }

    fn apply_rotation_keys(&mut self, step: f32) {
        if self.held(Key::Right) {
            if self.last_left {
                self.rotate_y = 0.0;
            }

            self.last_left = false;
            self.rotate_y += step;
            self.rotate(Vector3::unit_y(), Deg(self.rotate_y));
        }

        if self.held(Key::Down) {
            if self.last_up {
                self.rotate_x = 0.0;
            }

            self.last_up = false;
            self.rotate_x -= step;
            self.rotate(Vector3::unit_x(), Deg(self.rotate_x));
        }

        if self.held(Key::Up) {
            if !self.last_up {
                self.rotate_x = 0.0;
            }

            self.last_up = true;
            self.rotate_x += step;
            self.rotate(Vector3::unit_x(), Deg(self.rotate_x));
        }

        if self.held(Key::Left) {
            if !self.last_left {
                self.rotate_y = 0.0;
            }

            self.last_left = true;
            self.rotate_y -= step;
            self.rotate(Vector3::unit_y(), Deg(self.rotate_y));
        }
    }

    fn held(&self, key: Key) -> bool {
        self.held_keys.contains(&key)
    }

    fn log_material(&self) {
        info!(
            "roughness: {:.4}   exposure: {:.4}",
            self.roughness, self.exposure
        );
    }
}

fn bounded_increment(value: f32, step: f32, limit: Option<f32>) -> f32 {
    match limit {
        Some(limit) if value >= limit => value,
        Some(limit) => (value + step).min(limit),
        None => value + step,
    }
}
