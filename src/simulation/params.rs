/// Per-tick inputs of the simulation pass (48 bytes, aligned to 16).
/// Field order matches `SimParams` in `shaders/simulation.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SimParams {
    // Field info (16 bytes)
    pub field_width: u32,
    pub field_height: u32,
    pub time: f32,
    pub radius: f32,

    // Pointer (16 bytes), vec2<f32> has 8-byte alignment
    pub pointer: [f32; 2],
    pub direction: [f32; 2],

    // Brush (16 bytes)
    pub speed: f32,
    pub decay: f32,
    pub intensity: f32,
    pub _padding: f32,
}

/// Per-tick inputs of the dither pass (64 bytes, aligned to 16).
/// Field order matches `DitherParams` in `shaders/dither.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DitherParams {
    // Surface and field info (16 bytes)
    pub surface_size: [f32; 2],
    pub field_size: [u32; 2],

    // rgb + unused (16 bytes), avoids the vec3 alignment trap
    pub color: [f32; 4],

    // Quantization (16 bytes)
    pub dither_size: f32,
    pub exponent: f32,
    pub opacity: f32,
    pub pixel_ratio: f32,

    // Output encoding (16 bytes): 1 = write premultiplied colour
    pub premultiply: u32,
    pub _padding: [u32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<SimParams>(), 48);
        assert_eq!(std::mem::size_of::<DitherParams>(), 64);
    }
}
