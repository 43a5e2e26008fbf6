use glam::Vec2;

use crate::config::BAYER_SIZE;

/// Classic 8x8 ordered-dither index matrix, row-major, values 0..63.
pub const BAYER_8X8: [[u8; BAYER_SIZE]; BAYER_SIZE] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Threshold in [0, 1) for a position measured in dither cells.
/// Both axes wrap every 8 cells, negative positions included.
pub fn threshold(cell: Vec2) -> f32 {
    let size = BAYER_SIZE as f32;
    let x = cell.x.rem_euclid(size) as usize % BAYER_SIZE;
    let y = cell.y.rem_euclid(size) as usize % BAYER_SIZE;
    BAYER_8X8[y][x] as f32 / (BAYER_SIZE * BAYER_SIZE) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_is_permutation() {
        let mut seen = [false; 64];
        for row in &BAYER_8X8 {
            for &v in row {
                assert!(!seen[v as usize], "duplicate entry {v}");
                seen[v as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_threshold_tiles() {
        for y in 0..8 {
            for x in 0..8 {
                let base = threshold(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                assert_eq!(base, threshold(Vec2::new(x as f32 + 8.5, y as f32 + 16.5)));
                assert_eq!(base, threshold(Vec2::new(x as f32 - 7.5, y as f32 - 7.5)));
                assert_eq!(base, BAYER_8X8[y][x] as f32 / 64.0);
            }
        }
    }

    #[test]
    fn test_threshold_range() {
        assert_eq!(threshold(Vec2::new(0.2, 0.2)), 0.0);
        assert_eq!(threshold(Vec2::new(0.5, 7.5)), 63.0 / 64.0);
    }
}
