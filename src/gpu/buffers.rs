use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::simulation::{DitherParams, FieldSize, PingPong, SimParams};

/// Ping-pong storage buffers for the ink field plus the per-pass uniforms
pub struct FieldBuffers {
    /// Buffer A / buffer B of the field, with the parity flag
    pub fields: PingPong<Buffer>,
    /// Uniform buffer for simulation parameters
    pub params_buffer: Buffer,
    /// Uniform buffer for dither parameters
    pub dither_params_buffer: Buffer,
    pub size: FieldSize,
}

impl FieldBuffers {
    /// Create both field buffers. wgpu zero-initialises new buffers, so the
    /// field starts empty.
    pub fn new(device: &Device, size: FieldSize) -> Self {
        let buffer_size = (size.texel_count() * std::mem::size_of::<f32>()) as u64;

        let field_buffer = |label| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: buffer_size,
                usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let fields = PingPong::new(field_buffer("ink-field-a"), field_buffer("ink-field-b"));

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sim-params-buffer"),
            size: std::mem::size_of::<SimParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let dither_params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("dither-params-buffer"),
            size: std::mem::size_of::<DitherParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            fields,
            params_buffer,
            dither_params_buffer,
            size,
        }
    }

    /// Update simulation parameters
    pub fn update_params(&self, queue: &Queue, params: &SimParams) {
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(params));
    }

    /// Update dither parameters
    pub fn update_dither_params(&self, queue: &Queue, params: &DitherParams) {
        queue.write_buffer(&self.dither_params_buffer, 0, bytemuck::bytes_of(params));
    }
}
