use std::ops::{Add, Mul};

use nalgebra as na;
use na::Vector4;

/// Anything the rasterizer is asked to interpolate has to support linear
/// combination, i.e. scalar multiply and add.
pub trait Interpolate: Copy + Add<Output = Self> + Mul<f32, Output = Self> {}

impl<T> Interpolate for T where T: Copy + Add<Output = T> + Mul<f32, Output = T> {}

/// Output of the vertex shader - a homogenous clip-space position paired
/// with the vertex attributes, which are carried forward unchanged in type
/// but reinterpolated in value downstream.
#[derive(Debug, Clone, Copy)]
pub struct ClipVertex<V> {
    pub position: Vector4<f32>,
    pub data: V,
}

/// Vertices with w at or below this are treated as behind the near plane.
/// Keeping it strictly positive means everything surviving the clip is safe
/// to perspective-divide.
pub const W_CLIP: f32 = 1e-5;

fn lerp_clip_vertex<V: Interpolate>(a: &ClipVertex<V>, b: &ClipVertex<V>, t: f32) -> ClipVertex<V> {
    return ClipVertex {
        position: a.position * (1.0 - t) + b.position * t,
        data: a.data * (1.0 - t) + b.data * t,
    };
}

/// Clips a triangle against the near plane w = W_CLIP and re-triangulates
/// the surviving polygon as a fan. Positions and attributes are lerped
/// linearly in clip space, which is where that is actually correct.
///
/// Returns 0 triangles when the input is entirely behind the plane, 1 when
/// it is entirely in front, and 1 or 2 when it straddles the plane.
pub fn clip_triangle_near<V: Interpolate>(triangle: [ClipVertex<V>; 3]) -> Vec<[ClipVertex<V>; 3]> {
    let inside = |v: &ClipVertex<V>| v.position.w > W_CLIP;

    // Common case first: nothing to clip.
    if triangle.iter().all(inside) {
        return vec![triangle];
    }
    if !triangle.iter().any(inside) {
        return Vec::new();
    }

    // Sutherland-Hodgman against the single w = W_CLIP plane. The clipped
    // polygon has at most 4 vertices.
    let mut polygon: Vec<ClipVertex<V>> = Vec::with_capacity(4);
    for i in 0..3 {
        let current = &triangle[i];
        let next = &triangle[(i + 1) % 3];
        let current_inside = inside(current);
        let next_inside = inside(next);
        if current_inside {
            polygon.push(*current);
        }
        if current_inside != next_inside {
            // Edge crosses the plane, emit the intersection point.
            let t = (W_CLIP - current.position.w) / (next.position.w - current.position.w);
            polygon.push(lerp_clip_vertex(current, next, t));
        }
    }

    if polygon.len() < 3 {
        return Vec::new();
    }
    let mut triangles = Vec::with_capacity(polygon.len() - 2);
    for i in 1..polygon.len() - 1 {
        triangles.push([polygon[0], polygon[i], polygon[i + 1]]);
    }
    return triangles;
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn clip_vertex(x: f32, y: f32, z: f32, w: f32, data: f32) -> ClipVertex<f32> {
        return ClipVertex { position: vector![x, y, z, w], data };
    }

    #[test]
    fn fully_in_front_passes_through() {
        let triangle = [
            clip_vertex(-1.0, -1.0, 0.0, 1.0, 0.0),
            clip_vertex(1.0, -1.0, 0.0, 1.0, 0.5),
            clip_vertex(0.0, 1.0, 0.0, 1.0, 1.0),
        ];
        let out = clip_triangle_near(triangle);
        assert_eq!(out.len(), 1);
        for i in 0..3 {
            assert_eq!(out[0][i].position, triangle[i].position);
        }
    }

    #[test]
    fn fully_behind_clips_to_nothing() {
        let triangle = [
            clip_vertex(0.0, 0.0, -1.0, -1.0, 0.0),
            clip_vertex(1.0, 0.0, -1.0, 0.0, 0.0),
            clip_vertex(0.0, 1.0, -1.0, -2.0, 0.0),
        ];
        assert!(clip_triangle_near(triangle).is_empty());
    }

    #[test]
    fn one_vertex_behind_yields_two_triangles_with_positive_w() {
        let triangle = [
            clip_vertex(0.0, 0.0, 0.0, -1.0, 0.0),
            clip_vertex(1.0, 0.0, 0.0, 1.0, 1.0),
            clip_vertex(0.0, 1.0, 0.0, 1.0, 1.0),
        ];
        let out = clip_triangle_near(triangle);
        assert_eq!(out.len(), 2);
        for tri in &out {
            for v in tri {
                assert!(v.position.w > 0.0);
                assert!(v.position.iter().all(|c| c.is_finite()));
                assert!(v.data.is_finite());
            }
        }
    }

    #[test]
    fn two_vertices_behind_yields_one_triangle() {
        let triangle = [
            clip_vertex(0.0, 0.0, 0.0, 1.0, 1.0),
            clip_vertex(1.0, 0.0, 0.0, -1.0, 0.0),
            clip_vertex(0.0, 1.0, 0.0, -1.0, 0.0),
        ];
        let out = clip_triangle_near(triangle);
        assert_eq!(out.len(), 1);
        for v in &out[0] {
            assert!(v.position.w > 0.0);
        }
    }

    #[test]
    fn attributes_lerp_along_the_clipped_edge() {
        // Edge from w = 1 to w = -1 crosses the plane halfway, so the
        // emitted vertex carries the halfway attribute value.
        let triangle = [
            clip_vertex(0.0, 0.0, 0.0, 1.0, 0.0),
            clip_vertex(2.0, 0.0, 0.0, -1.0, 1.0),
            clip_vertex(0.0, 2.0, 0.0, 1.0, 0.0),
        ];
        let out = clip_triangle_near(triangle);
        let mut found_halfway = false;
        for tri in &out {
            for v in tri {
                if (v.data - 0.5).abs() < 1e-4 {
                    found_halfway = true;
                }
            }
        }
        assert!(found_halfway);
    }
}
