mod backend;
mod buffers;
mod compute;
mod context;
mod render;

pub use backend::GpuBackend;
pub use buffers::FieldBuffers;
pub use compute::ComputePipeline;
pub use context::GpuContext;
pub use render::RenderPipeline;
