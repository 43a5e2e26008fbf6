use crate::config::FADE_SNAP;

/// Eased opacity multiplier for mounting and unmounting the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityFade {
    current: f32,
    target: f32,
}

impl Default for OpacityFade {
    fn default() -> Self {
        Self::visible()
    }
}

impl OpacityFade {
    /// Fully visible, nothing to animate
    pub fn visible() -> Self {
        Self {
            current: 1.0,
            target: 1.0,
        }
    }

    pub fn fade_in(&mut self) {
        self.target = 1.0;
    }

    pub fn fade_out(&mut self) {
        self.target = 0.0;
    }

    /// Start from transparent and ease towards fully visible
    pub fn from_transparent() -> Self {
        Self {
            current: 0.0,
            target: 1.0,
        }
    }

    /// Move one tick closer to the target, snapping once close enough.
    pub fn advance(&mut self, step: f32) -> f32 {
        let diff = self.target - self.current;
        if diff.abs() > FADE_SNAP {
            self.current += diff * step;
        } else {
            self.current = self.target;
        }
        self.current
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    /// A fade-out has run to completion
    pub fn finished_out(&self) -> bool {
        self.target == 0.0 && self.current == 0.0
    }
}
