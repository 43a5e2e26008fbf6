//! Pointer-reactive dithered ink overlay.
//!
//! A fading, flow-distorted trail follows the pointer. It is simulated in a
//! pair of ping-pong buffers and shown through an 8x8 ordered dither as a
//! stippled single-colour mask:
//! - `simulation`: noise and Bayer kernels, pointer tracking, CPU stages
//! - `gpu`: the same stages as a wgpu compute pass and fragment pass
//! - `scheduler`: per-tick sequencing, resize deferral, mount lifetime

pub mod app;
pub mod config;
pub mod error;
pub mod fade;
pub mod gpu;
pub mod scheduler;
pub mod simulation;

pub use config::{Rgb, Settings, SurfacePositioning};
pub use error::InkError;
pub use scheduler::{FrameScheduler, InkBackend, TickOutcome, Viewport};
