use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::InkError;

/// Compute shader workgroup size
pub const WORKGROUP_SIZE: u32 = 16;

/// Viewport height the brush radius is specified against
pub const REFERENCE_HEIGHT: f32 = 1080.0;

// ============================================
// Pointer Tracking
// ============================================

/// Exponential smoothing factor applied to pointer speed once per tick
pub const SPEED_SMOOTHING: f32 = 0.1;

// ============================================
// Simulation Stage
// ============================================

/// Central-difference step used to derive curl from the noise potential
pub const CURL_EPSILON: f32 = 0.1;

/// Spatial frequency of the noise potential (uv multiplier)
pub const NOISE_SCALE: f32 = 0.5;

/// Drift of the noise potential per second of elapsed time
pub const NOISE_TIME_SCALE: f32 = 0.1;

/// Backward-advection distance per unit of curl velocity
pub const ADVECTION_SCALE: f32 = 0.001;

/// Weight of each tap of the 5-tap diffusion kernel
pub const DIFFUSION_WEIGHT: f32 = 0.2;

/// Upper bound of the ink field before decay is subtracted
pub const FIELD_CEILING: f32 = 0.95;

/// Pointer speed at which the injection gate is fully open
pub const INJECTION_GATE: f32 = 0.01;

/// Fixed gain applied to the gaussian brush
pub const BRUSH_GAIN: f32 = 0.5;

// ============================================
// Dither Stage
// ============================================

/// Side length of the ordered-dither threshold matrix
pub const BAYER_SIZE: usize = 8;

/// Signals below this floor never produce ink, whatever the threshold
pub const MASK_FLOOR: f32 = 0.01;

// ============================================
// Opacity Fade
// ============================================

/// Fade distance below which the opacity snaps to its target
pub const FADE_SNAP: f32 = 0.001;

/// How the overlay is positioned relative to the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SurfacePositioning {
    /// Pinned over the whole viewport, above other content
    #[default]
    Fixed,
    /// Sized and placed by the host like ordinary content
    Absolute,
}

/// Linear RGB triple in [0, 1], parsed from `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Parse a six-digit hex colour; the leading `#` is optional.
    pub fn from_hex(text: &str) -> Result<Self, InkError> {
        let hex = text.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(InkError::InvalidColor(text.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| InkError::InvalidColor(text.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(f, "#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl TryFrom<String> for Rgb {
    type Error = InkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Configuration record supplied by the host. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Screen-space size of one dither cell, in logical pixels
    pub dither_size: f32,
    /// Brush radius in uv units at a 1080-pixel-tall viewport
    pub radius: f32,
    /// Gamma applied to the ink value before quantization
    pub exponent: f32,
    /// Ink removed from every texel per tick
    pub decay: f32,
    /// Brush strength
    pub intensity: f32,
    pub color: Rgb,
    pub opacity: f32,
    pub surface_positioning: SurfacePositioning,
    /// Narrowest logical viewport on which the effect is mounted
    pub min_viewport_width: f32,
    /// Per-tick approach factor of the opacity fade
    pub fade_step: f32,
    /// Simulation buffer resolution relative to the logical surface
    pub resolution_scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dither_size: 3.0,
            radius: 0.075,
            exponent: 3.0,
            decay: 0.005,
            intensity: 0.5,
            color: Rgb {
                r: 0xa2 as f32 / 255.0,
                g: 0xa3 as f32 / 255.0,
                b: 0xe9 as f32 / 255.0,
            },
            opacity: 1.0,
            surface_positioning: SurfacePositioning::Fixed,
            min_viewport_width: 768.0,
            fade_step: 0.02,
            resolution_scale: 1.0,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(text: &str) -> Result<Self, InkError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InkError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| InkError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Whether a viewport of this logical width should carry the effect at all
    pub fn should_mount(&self, logical_width: f32) -> bool {
        logical_width >= self.min_viewport_width
    }

    /// Resolution scale restricted to (0, 1]
    pub fn clamped_resolution_scale(&self) -> f32 {
        if self.resolution_scale.is_finite() && self.resolution_scale > 0.0 {
            self.resolution_scale.min(1.0)
        } else {
            1.0
        }
    }

    /// Brush radius rescaled so it keeps the same on-screen size at any height
    pub fn normalized_radius(&self, logical_height: f32) -> f32 {
        self.radius * (REFERENCE_HEIGHT / logical_height.max(1.0))
    }
}
