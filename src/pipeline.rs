pub mod buffer;
pub mod geometry;
pub mod raster;

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra as na;
use na::{Vector3, Vector4};

use crate::util;
use buffer::Buffer;
use geometry::{ClipVertex, Interpolate};

/// What the pipeline needs from a vertex record: linear combination for
/// interpolation, plus the object-space position to feed the vertex shader.
pub trait PipelineVertex: Interpolate {
    fn position(&self) -> Vector3<f32>;
}

/// Vertex shader: gets the homogenous object-space position and the vertex
/// record, returns the clip-space position paired with (possibly derived)
/// attributes. The caller composes its transform once per frame and closes
/// over it.
pub type VertexShader<V> = Box<dyn Fn(Vector4<f32>, &V) -> ClipVertex<V>>;

/// Pixel shader: interpolated attributes and depth in, final color out.
pub type PixelShader<V, C> = Box<dyn Fn(&V, f32) -> C>;

/// The two programmable stages, rebound per frame/draw.
pub struct ShaderPair<V, C> {
    pub vertex: VertexShader<V>,
    pub pixel: PixelShader<V, C>,
}

/// Software rasterization pipeline: owns the viewport, shared color and
/// depth buffers, the bound geometry sources and the current shader pair,
/// and turns indexed triangles into shaded pixels one draw call at a time.
///
/// Malformed bindings (missing buffers, mismatched sizes, out-of-range
/// indices, a draw count that is not a multiple of 3) are caller errors and
/// panic instead of being reported.
pub struct Pipeline<V, C> {
    viewport_width: u32,
    viewport_height: u32,
    render_target: Option<Rc<RefCell<Buffer<C>>>>,
    depth_buffer: Option<Rc<RefCell<Buffer<f32>>>>,
    vertex_buffer: Option<Rc<Vec<V>>>,
    index_buffer: Option<Rc<Vec<u32>>>,
    shaders: Option<ShaderPair<V, C>>,
}

impl<V, C> Pipeline<V, C>
where
    V: PipelineVertex,
    C: Copy + Default,
{
    pub fn new() -> Pipeline<V, C> {
        return Pipeline {
            viewport_width: 0,
            viewport_height: 0,
            render_target: None,
            depth_buffer: None,
            vertex_buffer: None,
            index_buffer: None,
            shaders: None,
        };
    }

    /// Stores the dimensions of the NDC-to-pixel mapping. The caller keeps
    /// these consistent with the render target size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Binds the two output buffers. Both must have equal dimensions.
    pub fn set_render_target(&mut self, color: Rc<RefCell<Buffer<C>>>, depth: Rc<RefCell<Buffer<f32>>>) {
        {
            let color_ref = color.borrow();
            let depth_ref = depth.borrow();
            assert!(
                color_ref.width() == depth_ref.width() && color_ref.height() == depth_ref.height(),
                "color and depth buffer dimensions differ"
            );
        }
        self.render_target = Some(color);
        self.depth_buffer = Some(depth);
    }

    /// Rebinds the vertex source. Takes effect on the next draw.
    pub fn set_vertex_buffer(&mut self, vertex_buffer: Rc<Vec<V>>) {
        self.vertex_buffer = Some(vertex_buffer);
    }

    /// Rebinds the index source. Takes effect on the next draw.
    pub fn set_index_buffer(&mut self, index_buffer: Rc<Vec<u32>>) {
        self.index_buffer = Some(index_buffer);
    }

    /// Rebinds the programmable stages for the coming draw calls.
    pub fn bind_shaders(&mut self, shaders: ShaderPair<V, C>) {
        self.shaders = Some(shaders);
    }

    /// Fills the color buffer with the given value and resets the depth
    /// buffer to the far sentinel (f32::MAX, since smaller depth wins), so a
    /// fresh frame depth-tests correctly without a separate depth clear.
    pub fn clear_render_target(&mut self, value: C) {
        let render_target = self.render_target.as_ref().expect("no render target bound");
        let depth_buffer = self.depth_buffer.as_ref().expect("no depth buffer bound");
        render_target.borrow_mut().clear(value);
        depth_buffer.borrow_mut().clear(f32::MAX);
    }

    /// Draws vertex_count indices from the bound index buffer, starting at
    /// start_index, as consecutive triangles. For each triple: fetch the
    /// vertices, run the vertex shader, clip against the near plane, then
    /// scan-convert into the bound buffers through the pixel shader and the
    /// depth test. The call runs to completion before returning.
    pub fn draw(&mut self, vertex_count: u32, start_index: u32) {
        assert!(vertex_count % 3 == 0, "draw count must be a multiple of 3");
        let shaders = self.shaders.as_ref().expect("no shaders bound");
        let vertex_buffer = self.vertex_buffer.as_ref().expect("no vertex buffer bound");
        let index_buffer = self.index_buffer.as_ref().expect("no index buffer bound");
        let render_target = self.render_target.as_ref().expect("no render target bound");
        let depth_buffer = self.depth_buffer.as_ref().expect("no depth buffer bound");
        let end = (start_index + vertex_count) as usize;
        assert!(end <= index_buffer.len(), "draw range exceeds the index buffer");

        let mut render_target = render_target.borrow_mut();
        let mut depth_buffer = depth_buffer.borrow_mut();

        for triangle_start in (start_index as usize..end).step_by(3) {
            let clip_triangle: [ClipVertex<V>; 3] = std::array::from_fn(|i| {
                let index = index_buffer[triangle_start + i] as usize;
                assert!(index < vertex_buffer.len(), "index {} out of vertex buffer range", index);
                let vertex = &vertex_buffer[index];
                return (shaders.vertex)(util::to_hom_point(vertex.position()), vertex);
            });

            for triangle in geometry::clip_triangle_near(clip_triangle) {
                raster::draw_triangle(
                    &triangle,
                    self.viewport_width,
                    self.viewport_height,
                    &mut render_target,
                    &mut depth_buffer,
                    &shaders.pixel,
                );
            }
        }
    }
}
