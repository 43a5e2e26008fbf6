//! 2D simplex noise and the curl field derived from it.
//!
//! Pure functions only; the WGSL simulation shader carries the same math so
//! the CPU and GPU stages agree.

use glam::{Vec2, Vec3};

use crate::config::CURL_EPSILON;

/// Skew/unskew constants of the 2D simplex lattice:
/// (3 - sqrt(3)) / 6, (sqrt(3) - 1) / 2, -1 + 2 * first, 1 / 41
const C: [f32; 4] = [
    0.211_324_87,
    0.366_025_42,
    -0.577_350_26,
    0.024_390_243,
];

fn mod289_2(x: Vec2) -> Vec2 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn mod289_3(x: Vec3) -> Vec3 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn permute(x: Vec3) -> Vec3 {
    mod289_3((x * 34.0 + 1.0) * x)
}

/// Gradient noise in roughly [-1, 1].
pub fn simplex2(v: Vec2) -> f32 {
    // Skew into the lattice and find the containing simplex
    let i = (v + Vec2::splat(v.dot(Vec2::splat(C[1])))).floor();
    let x0 = v - i + Vec2::splat(i.dot(Vec2::splat(C[0])));
    let i1 = if x0.x > x0.y { Vec2::X } else { Vec2::Y };
    let x1 = x0 + Vec2::splat(C[0]) - i1;
    let x2 = x0 + Vec2::splat(C[2]);

    let i = mod289_2(i);
    let p = permute(
        permute(Vec3::splat(i.y) + Vec3::new(0.0, i1.y, 1.0)) + Vec3::splat(i.x) + Vec3::new(0.0, i1.x, 1.0),
    );

    let mut m = (Vec3::splat(0.5) - Vec3::new(x0.dot(x0), x1.dot(x1), x2.dot(x2))).max(Vec3::ZERO);
    m = m * m;
    m = m * m;

    // Gradients from 41 points on a line, mapped onto a diamond
    let scaled = p * C[3];
    let x = 2.0 * (scaled - scaled.floor()) - 1.0;
    let h = x.abs() - 0.5;
    let ox = (x + 0.5).floor();
    let a0 = x - ox;

    // Normalise gradients implicitly by scaling m
    m *= 1.792_842_9 - 0.853_734_73 * (a0 * a0 + h * h);

    let g = Vec3::new(
        a0.x * x0.x + h.x * x0.y,
        a0.y * x1.x + h.y * x1.y,
        a0.z * x2.x + h.z * x2.y,
    );
    130.0 * m.dot(g)
}

/// Central-difference gradient of the noise potential.
pub fn gradient(p: Vec2) -> Vec2 {
    let dy = Vec2::new(0.0, CURL_EPSILON);
    let dx = Vec2::new(CURL_EPSILON, 0.0);

    Vec2::new(
        (simplex2(p + dx) - simplex2(p - dx)) / (2.0 * CURL_EPSILON),
        (simplex2(p + dy) - simplex2(p - dy)) / (2.0 * CURL_EPSILON),
    )
}

/// Divergence-free velocity: the 2D curl `(dN/dy, -dN/dx)` of the noise
/// potential, so the flow runs along its isolines.
pub fn curl(p: Vec2) -> Vec2 {
    let g = gradient(p);
    Vec2::new(g.y, -g.x)
}

/// Hermite step between two edges, as in GLSL/WGSL.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_deterministic() {
        let p = Vec2::new(12.34, -5.67);
        assert_eq!(simplex2(p), simplex2(p));
        assert_eq!(curl(p), curl(p));
    }

    #[test]
    fn test_noise_range() {
        for iy in 0..40 {
            for ix in 0..40 {
                let p = Vec2::new(ix as f32 * 0.173 - 3.0, iy as f32 * 0.291 - 5.0);
                let n = simplex2(p);
                assert!(n.is_finite());
                assert!(n.abs() <= 1.2, "noise out of range at {p}: {n}");
            }
        }
    }

    #[test]
    fn test_noise_vanishes_on_lattice_points() {
        // Every corner contribution is orthogonal to its own offset at a vertex
        assert!(simplex2(Vec2::ZERO).abs() < 1e-6);
    }

    #[test]
    fn test_noise_varies() {
        let a = simplex2(Vec2::new(0.3, 0.7));
        let b = simplex2(Vec2::new(1.9, 2.3));
        assert!((a - b).abs() > 1e-4);
    }

    #[test]
    fn test_curl_runs_along_isolines() {
        for i in 0..10 {
            let p = Vec2::new(0.37 * i as f32, 0.11 * i as f32 + 0.5);
            let v = curl(p);
            let g = gradient(p);
            assert!(v.dot(g).abs() < 1e-6, "curl not orthogonal to gradient at {p}");
            assert!((v.length() - g.length()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_curl_has_no_net_outflow() {
        // Flux of the curl field through a closed square is the telescoping
        // sum of the potential around its corners, so it nearly cancels
        let center = Vec2::new(0.8, 1.3);
        let half = 0.05;
        let steps = 64;
        let ds = 2.0 * half / steps as f32;
        let mut flux = 0.0;
        let mut speed = 0.0;
        for k in 0..steps {
            let t = -half + (k as f32 + 0.5) * ds;
            let right = curl(center + Vec2::new(half, t));
            let left = curl(center + Vec2::new(-half, t));
            let top = curl(center + Vec2::new(t, half));
            let bottom = curl(center + Vec2::new(t, -half));
            flux += (right.x - left.x + top.y - bottom.y) * ds;
            speed += (right.length() + left.length() + top.length() + bottom.length()) * ds;
        }
        assert!(flux.abs() < 0.1 * speed.max(1e-3), "flux {flux} vs speed {speed}");
    }

    #[test]
    fn test_smoothstep_gate() {
        assert_eq!(smoothstep(0.0, 0.01, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 0.01, 0.01), 1.0);
        assert_eq!(smoothstep(0.0, 0.01, 0.5), 1.0);
        assert!((smoothstep(0.0, 0.01, 0.005) - 0.5).abs() < 1e-6);
    }
}
