use glam::Vec2;

use crate::config::SPEED_SMOOTHING;

/// Host surface rectangle, in the same units as the pointer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    /// Rectangle anchored at the origin
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }
}

/// What the simulation sees of the pointer on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Normalized position, origin bottom-left
    pub position: Vec2,
    /// Exponentially smoothed per-tick travel
    pub speed: f32,
    /// Unit direction of the last non-zero move
    pub direction: Vec2,
}

/// Event-driven writer, tick-driven reader. Move events overwrite the
/// current position; `sample` runs once per tick and advances the rest.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    current: Vec2,
    previous: Vec2,
    speed: f32,
    direction: Vec2,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest pointer position. Last write wins until the next tick.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, rect: SurfaceRect) {
        // A collapsed surface has no meaningful uv space
        if !(rect.width > 0.0 && rect.height > 0.0) {
            return;
        }
        self.current = Vec2::new(
            (x - rect.left) / rect.width,
            1.0 - (y - rect.top) / rect.height,
        );
    }

    /// Advance speed and direction from the travel since the previous tick.
    pub fn sample(&mut self) -> PointerSample {
        let delta = self.current - self.previous;
        self.speed += (delta.length() - self.speed) * SPEED_SMOOTHING;
        if let Some(direction) = delta.try_normalize() {
            self.direction = direction;
        }
        self.previous = self.current;

        PointerSample {
            position: self.current,
            speed: self.speed,
            direction: self.direction,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.current
    }
}
