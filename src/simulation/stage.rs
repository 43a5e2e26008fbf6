use glam::Vec2;

use crate::config::{
    ADVECTION_SCALE, BRUSH_GAIN, DIFFUSION_WEIGHT, FIELD_CEILING, INJECTION_GATE, NOISE_SCALE,
    NOISE_TIME_SCALE,
};
use crate::simulation::field::Field;
use crate::simulation::noise::{curl, smoothstep};
use crate::simulation::params::SimParams;

/// Gaussian brush contribution at `uv`. Gated on pointer motion: with the
/// gate edge at 0.01 it is effectively on/off rather than speed-graded.
pub fn brush(uv: Vec2, aspect: f32, params: &SimParams) -> f32 {
    let pointer = Vec2::from(params.pointer);
    let dist = ((uv - pointer) * Vec2::new(aspect, 1.0)).length();
    let falloff = (-(dist / params.radius).powi(2)).exp();
    falloff * params.intensity * smoothstep(0.0, INJECTION_GATE, params.speed) * BRUSH_GAIN
}

/// Value of one texel after a tick, before the storage clamp.
pub fn texel_value(read: &Field, uv: Vec2, params: &SimParams) -> f32 {
    let size = read.size();
    let texel = size.texel();

    let velocity = curl(uv * NOISE_SCALE + Vec2::splat(params.time * NOISE_TIME_SCALE));
    let advected = uv - velocity * ADVECTION_SCALE;

    let diffused = (read.sample(advected)
        + read.sample(advected + Vec2::new(0.0, texel.y))
        + read.sample(advected - Vec2::new(0.0, texel.y))
        + read.sample(advected - Vec2::new(texel.x, 0.0))
        + read.sample(advected + Vec2::new(texel.x, 0.0)))
        * DIFFUSION_WEIGHT;

    (diffused + brush(uv, size.aspect(), params)).min(FIELD_CEILING) - params.decay
}

/// Advance the ink field one tick: advect, diffuse, inject, decay.
/// `read` and `write` must have the same size.
pub fn advance(read: &Field, write: &mut Field, params: &SimParams) {
    debug_assert_eq!(read.size(), write.size());
    let size = write.size();

    for y in 0..size.height {
        for x in 0..size.width {
            let uv = write.texel_center(x, y);
            // Storage is unsigned, like the render target it stands in for
            write.set(x, y, texel_value(read, uv, params).max(0.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::field::FieldSize;

    fn params(size: FieldSize) -> SimParams {
        SimParams {
            field_width: size.width,
            field_height: size.height,
            time: 0.0,
            radius: 0.1,
            pointer: [0.5, 0.5],
            direction: [1.0, 0.0],
            speed: 0.0,
            decay: 0.005,
            intensity: 0.5,
            _padding: 0.0,
        }
    }

    #[test]
    fn test_uniform_field_decays_linearly() {
        let size = FieldSize::new(16, 12);
        let mut read = Field::new(size);
        let mut write = Field::new(size);
        read.fill(0.5);
        let p = params(size);

        for _ in 0..10 {
            advance(&read, &mut write, &p);
            std::mem::swap(&mut read, &mut write);
        }
        for &v in read.data() {
            assert!((v - 0.45).abs() < 1e-5, "got {v}");
        }
    }

    #[test]
    fn test_no_injection_without_motion() {
        let size = FieldSize::new(16, 16);
        let read = Field::new(size);
        let mut write = Field::new(size);
        advance(&read, &mut write, &params(size));
        assert_eq!(write.max_value(), 0.0);
    }

    #[test]
    fn test_moving_pointer_injects_at_pointer() {
        let size = FieldSize::new(32, 32);
        let read = Field::new(size);
        let mut write = Field::new(size);
        let mut p = params(size);
        p.speed = 0.05;
        advance(&read, &mut write, &p);

        let center = write.get(16, 16);
        let expected = brush(write.texel_center(16, 16), 1.0, &p) - p.decay;
        assert!((center - expected).abs() < 1e-5, "center {center}");
        // Close to the full 0.5 * 0.5 gain right under the pointer
        assert!(center > 0.2);
        assert_eq!(write.get(0, 0), 0.0);
    }

    #[test]
    fn test_brush_is_aspect_corrected() {
        let p = SimParams {
            speed: 1.0,
            ..params(FieldSize::new(2, 1))
        };
        let horizontal = brush(Vec2::new(0.55, 0.5), 2.0, &p);
        let vertical = brush(Vec2::new(0.5, 0.6), 2.0, &p);
        assert!((horizontal - vertical).abs() < 1e-6);
    }

    #[test]
    fn test_field_capped_below_ceiling() {
        let size = FieldSize::new(8, 8);
        let mut read = Field::new(size);
        let mut write = Field::new(size);
        read.fill(0.95);
        let mut p = params(size);
        p.speed = 1.0;
        p.intensity = 10.0;
        advance(&read, &mut write, &p);
        for &v in write.data() {
            assert!(v <= FIELD_CEILING - p.decay + 1e-6);
        }
    }
}
