use nalgebra as na;
use na::{vector, Vector3, Vector4};

use crate::pipeline::buffer::Buffer;

/// Struct, representing raw rgb8 pixel data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Get convex combination of two colors: t * c_1 + (1 - t) * c_2.
    /// t is unrestricted.
    pub fn blend(color_1: Color, color_2: Color, t: f32) -> Color {
        return Color {
            r: (t * color_1.r as f32 + (1.0 - t) * color_2.r as f32) as u8,
            g: (t * color_1.g as f32 + (1.0 - t) * color_2.g as f32) as u8,
            b: (t * color_1.b as f32 + (1.0 - t) * color_2.b as f32) as u8,
        };
    }

    /// Packing of a float color with channels in [0.0, 1.0] into rgb8.
    /// Out of range channels are clamped instead of wrapping around.
    pub fn from_unit(v: Vector3<f32>) -> Color {
        return Color {
            r: (v.x.clamp(0.0, 1.0) * 255.0) as u8,
            g: (v.y.clamp(0.0, 1.0) * 255.0) as u8,
            b: (v.z.clamp(0.0, 1.0) * 255.0) as u8,
        };
    }
}

/// Transformation of a point to homogenous coordinates.
pub fn to_hom_point(v: Vector3<f32>) -> Vector4<f32> {
    return vector![v.x, v.y, v.z, 1.0];
}

/// Transformation of a vector to homogenous coordinates.
pub fn to_hom_vector(v: Vector3<f32>) -> Vector4<f32> {
    return vector![v.x, v.y, v.z, 0.0];
}

/// Transformation of a vector from homogenous coordinates.
pub fn from_hom_vector(v: Vector4<f32>) -> Vector3<f32> {
    return vector![v.x, v.y, v.z];
}

/// Flattens a color buffer into rgb8 byte data, row 0 first.
/// This is the layout both the window and the png writer expect.
pub fn buffer_to_rgb8(buffer: &Buffer<Color>) -> Vec<u8> {
    let mut data = Vec::with_capacity((3 * buffer.width() * buffer.height()) as usize);
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let color = buffer.get(x, y);
            data.push(color.r);
            data.push(color.g);
            data.push(color.b);
        }
    }
    return data;
}

/// Persists the rendered color buffer as a png at the given path.
pub fn save_image(buffer: &Buffer<Color>, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let data = buffer_to_rgb8(buffer);
    let image = image::RgbImage::from_raw(buffer.width(), buffer.height(), data)
        .ok_or("pixel data does not match buffer dimensions")?;
    image.save(path)?;
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        let white = Color { r: 255, g: 255, b: 255 };
        let black = Color { r: 0, g: 0, b: 0 };
        assert_eq!(Color::blend(white, black, 1.0), white);
        assert_eq!(Color::blend(white, black, 0.0), black);
    }

    #[test]
    fn from_unit_clamps() {
        assert_eq!(Color::from_unit(vector![2.0, -1.0, 0.0]), Color { r: 255, g: 0, b: 0 });
    }
}
