use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong around the overlay. The per-tick math itself
/// never fails; these come from configuration and from acquiring rendering
/// resources, and the host treats the GPU variants as "disable the effect".
#[derive(Debug, Error)]
pub enum InkError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("no suitable GPU adapter")]
    NoAdapter,

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to request GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface not supported by adapter")]
    SurfaceUnsupported,

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl InkError {
    /// Whether the error means the environment cannot host the effect at all
    pub fn is_capability_failure(&self) -> bool {
        matches!(
            self,
            Self::NoAdapter
                | Self::CreateSurface(_)
                | Self::RequestDevice(_)
                | Self::SurfaceUnsupported
                | Self::Surface(wgpu::SurfaceError::OutOfMemory)
        )
    }
}
