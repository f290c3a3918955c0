use super::buffer::Buffer;
use super::geometry::{ClipVertex, Interpolate, W_CLIP};

/// Vertex after perspective divide and viewport transform: pixel x/y, NDC z
/// kept as the depth value, and 1/w retained for perspective-correct
/// attribute interpolation.
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    z: f32,
    inv_w: f32,
}

/// Interpolation denominators below this are considered collapsed and the
/// pixel is skipped instead of producing NaN attributes.
const DENOM_EPSILON: f32 = 1e-12;

/// Signed edge function: twice the signed area of the triangle (a, b, p).
/// Positive when p is to the left of the directed edge a -> b in the
/// y-down pixel coordinate system.
fn edge_function(a: &ScreenVertex, b: &ScreenVertex, px: f32, py: f32) -> f32 {
    return (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x);
}

/// Tie-break for pixel centers landing exactly on an edge: only top and
/// left edges own their pixels. For an edge shared by two triangles the two
/// directed traversals are opposite, so exactly one triangle claims the
/// pixel - no double shade, no gap.
fn is_top_left(a: &ScreenVertex, b: &ScreenVertex) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    if dy != 0.0 {
        return dy > 0.0;
    }
    return dx < 0.0;
}

fn edge_accepts(w: f32, a: &ScreenVertex, b: &ScreenVertex) -> bool {
    return w > 0.0 || (w == 0.0 && is_top_left(a, b));
}

/// Scan-converts one clip-space triangle into the bound buffers.
///
/// Steps: perspective divide, viewport transform (NDC [-1, 1] to pixels,
/// +y NDC mapping to the top of the image), clamped integer bounding box,
/// edge-function barycentric rasterization sampled at pixel centers,
/// perspective-correct attribute interpolation, screen-linear depth and a
/// strict smaller-wins depth test. On a depth test failure nothing is
/// written at all.
///
/// Triangles are expected to be pre-clipped against the near plane; any
/// vertex with w <= W_CLIP rejects the whole triangle here as a numeric
/// safety net. Zero screen-space area rasterizes nothing.
pub fn draw_triangle<V, C>(
    triangle: &[ClipVertex<V>; 3],
    width: u32,
    height: u32,
    render_target: &mut Buffer<C>,
    depth_buffer: &mut Buffer<f32>,
    pixel_shader: &dyn Fn(&V, f32) -> C,
) where
    V: Interpolate,
    C: Copy + Default,
{
    if triangle.iter().any(|v| v.position.w <= W_CLIP) {
        return;
    }

    // Perspective divide and viewport transform.
    let mut screen = [ScreenVertex { x: 0.0, y: 0.0, z: 0.0, inv_w: 0.0 }; 3];
    let mut data = [triangle[0].data, triangle[1].data, triangle[2].data];
    for i in 0..3 {
        let p = triangle[i].position;
        let inv_w = 1.0 / p.w;
        screen[i] = ScreenVertex {
            x: (p.x * inv_w + 1.0) * 0.5 * width as f32,
            y: (1.0 - p.y * inv_w) * 0.5 * height as f32,
            z: p.z * inv_w,
            inv_w,
        };
    }

    // Normalizing the winding so that the interior has all-positive edge
    // functions, which also makes the fill rule below winding-independent.
    let mut area = edge_function(&screen[0], &screen[1], screen[2].x, screen[2].y);
    if area < 0.0 {
        screen.swap(1, 2);
        data.swap(1, 2);
        area = -area;
    }
    if area == 0.0 {
        return;
    }

    // Integer pixel bounding box, clamped to the viewport.
    let min_xf = screen[0].x.min(screen[1].x).min(screen[2].x);
    let max_xf = screen[0].x.max(screen[1].x).max(screen[2].x);
    let min_yf = screen[0].y.min(screen[1].y).min(screen[2].y);
    let max_yf = screen[0].y.max(screen[1].y).max(screen[2].y);
    if max_xf < 0.0 || max_yf < 0.0 || min_xf >= width as f32 || min_yf >= height as f32 {
        return;
    }
    let min_x = min_xf.floor().max(0.0) as u32;
    let min_y = min_yf.floor().max(0.0) as u32;
    let max_x = (max_xf.ceil() as u32).min(width - 1);
    let max_y = (max_yf.ceil() as u32).min(height - 1);

    for y in min_y..=max_y {
        let py = y as f32 + 0.5;
        for x in min_x..=max_x {
            let px = x as f32 + 0.5;
            // Barycentric weight of vertex i comes from the opposite edge.
            let w0 = edge_function(&screen[1], &screen[2], px, py);
            let w1 = edge_function(&screen[2], &screen[0], px, py);
            let w2 = edge_function(&screen[0], &screen[1], px, py);
            if !(edge_accepts(w0, &screen[1], &screen[2])
                && edge_accepts(w1, &screen[2], &screen[0])
                && edge_accepts(w2, &screen[0], &screen[1]))
            {
                continue;
            }
            let b0 = w0 / area;
            let b1 = w1 / area;
            let b2 = w2 / area;

            // Depth interpolates linearly in screen space.
            let z = b0 * screen[0].z + b1 * screen[1].z + b2 * screen[2].z;
            let depth = depth_buffer.item(x, y);
            if z >= *depth {
                continue;
            }

            // Attributes need the 1/w weighting to stay perspective-correct.
            let denom = b0 * screen[0].inv_w + b1 * screen[1].inv_w + b2 * screen[2].inv_w;
            if denom.abs() < DENOM_EPSILON {
                continue;
            }
            let attributes = data[0] * (b0 * screen[0].inv_w / denom)
                + data[1] * (b1 * screen[1].inv_w / denom)
                + data[2] * (b2 * screen[2].inv_w / denom);

            *depth = z;
            *render_target.item(x, y) = pixel_shader(&attributes, z);
        }
    }
}
