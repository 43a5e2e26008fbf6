use glam::Vec2;

use crate::config::MASK_FLOOR;
use crate::simulation::bayer;
use crate::simulation::field::Field;
use crate::simulation::params::DitherParams;

/// Binary coverage of one device pixel. Pixel (0, 0) is bottom-left and
/// its centre is at (0.5, 0.5), matching fragment coordinates.
pub fn mask_bit(sim_value: f32, pixel: Vec2, dither_size: f32, pixel_ratio: f32, exponent: f32) -> bool {
    let signal = sim_value.max(0.0).powf(exponent);
    if signal < MASK_FLOOR {
        return false;
    }
    let threshold = bayer::threshold(pixel / (dither_size * pixel_ratio));
    threshold <= signal
}

/// Straight-alpha RGBA for a mask bit. Opacity only scales alpha.
pub fn shade(mask: bool, params: &DitherParams) -> [u8; 4] {
    let alpha = if mask { params.opacity.clamp(0.0, 1.0) } else { 0.0 };
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        byte(params.color[0]),
        byte(params.color[1]),
        byte(params.color[2]),
        byte(alpha),
    ]
}

/// Quantize the whole surface. `mask` and `rgba` are surface-sized, row 0
/// at the bottom.
pub fn dither(field: &Field, params: &DitherParams, mask: &mut [u8], rgba: &mut [[u8; 4]]) {
    let width = params.surface_size[0].max(1.0) as usize;
    let height = params.surface_size[1].max(1.0) as usize;
    debug_assert_eq!(mask.len(), width * height);
    debug_assert_eq!(rgba.len(), width * height);

    for y in 0..height {
        for x in 0..width {
            let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let uv = pixel / Vec2::new(width as f32, height as f32);
            let bit = mask_bit(
                field.sample(uv),
                pixel,
                params.dither_size,
                params.pixel_ratio,
                params.exponent,
            );
            let idx = y * width + x;
            mask[idx] = bit as u8;
            rgba[idx] = shade(bit, params);
        }
    }
}
