//! CPU side of the ink pipeline: pure kernels, pointer tracking, the
//! ping-pong field and a reference backend running both stages.

pub mod bayer;
pub mod cpu;
pub mod dither;
pub mod field;
pub mod noise;
pub mod params;
pub mod pointer;
pub mod stage;

pub use cpu::CpuBackend;
pub use field::{Field, FieldSize, PingPong};
pub use params::{DitherParams, SimParams};
pub use pointer::{PointerSample, PointerTracker, SurfaceRect};
