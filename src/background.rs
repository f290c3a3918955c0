//! Decorative backdrop, drawn straight into the color buffer after the
//! clear and before any draw call. Purely cosmetic and stateless - it
//! shares nothing with the rasterization pipeline, and the depth buffer is
//! untouched so the mesh pass always draws over it.

use crate::pipeline::buffer::Buffer;
use crate::util::Color;

/// Vertical two-color gradient, top color on row 0.
pub fn draw_gradient(target: &mut Buffer<Color>, top: Color, bottom: Color) {
    let height = target.height();
    for y in 0..height {
        let t = y as f32 / height as f32;
        let row_color = Color::blend(bottom, top, t);
        for x in 0..target.width() {
            *target.item(x, y) = row_color;
        }
    }
}

/// Scatters single-pixel stars of varying brightness over the backdrop.
/// A small fixed-seed LCG keeps the sky identical between frames and runs.
pub fn scatter_stars(target: &mut Buffer<Color>, count: u32, seed: u64) {
    let mut state = seed;
    let mut next = |modulo: u32| -> u32 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        return ((state >> 33) as u32) % modulo;
    };
    for _ in 0..count {
        let x = next(target.width());
        let y = next(target.height());
        let brightness = (128 + next(128)) as u8;
        *target.item(x, y) = Color { r: brightness, g: brightness, b: brightness };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_hits_both_endpoint_colors() {
        let top = Color { r: 10, g: 20, b: 40 };
        let bottom = Color { r: 200, g: 100, b: 50 };
        let mut target = Buffer::<Color>::new(4, 8);
        draw_gradient(&mut target, top, bottom);
        assert_eq!(target.get(0, 0), top);
        // Last row is one step short of the pure bottom color.
        let last = target.get(0, 7);
        assert!(last.r > 150 && last.r < 210);
    }

    #[test]
    fn star_scatter_is_deterministic() {
        let mut first = Buffer::<Color>::new(16, 16);
        let mut second = Buffer::<Color>::new(16, 16);
        scatter_stars(&mut first, 32, 7);
        scatter_stars(&mut second, 32, 7);
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(first.get(x, y), second.get(x, y));
            }
        }
    }
}
