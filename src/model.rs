use std::fs::File;
use std::io::BufReader;
use std::ops::{Add, Mul};
use std::rc::Rc;

use nalgebra as na;
use na::{vector, Matrix4, Vector3};
use obj::{load_obj, Obj};

use crate::pipeline::PipelineVertex;

/// Fixed-layout vertex record: position plus the shading attributes the
/// rasterizer interpolates across triangles.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub ambient: Vector3<f32>,
}

// Component-wise linear combination, so the whole record interpolates.
impl Add for Vertex {
    type Output = Vertex;

    fn add(self, rhs: Vertex) -> Vertex {
        return Vertex {
            position: self.position + rhs.position,
            normal: self.normal + rhs.normal,
            ambient: self.ambient + rhs.ambient,
        };
    }
}

impl Mul<f32> for Vertex {
    type Output = Vertex;

    fn mul(self, rhs: f32) -> Vertex {
        return Vertex {
            position: self.position * rhs,
            normal: self.normal * rhs,
            ambient: self.ambient * rhs,
        };
    }
}

impl PipelineVertex for Vertex {
    fn position(&self) -> Vector3<f32> {
        return self.position;
    }
}

/// One loaded shape: geometry buffers ready for binding plus its world
/// transform.
pub struct Model {
    pub vertex_buffer: Rc<Vec<Vertex>>,
    pub index_buffer: Rc<Vec<u32>>,
    pub world_matrix: Matrix4<f32>,
}

/// Loads a wavefront obj into pipeline-ready buffers. Indices are read as
/// u32, so they bind directly as the index buffer.
pub fn load_model(path: &str) -> Result<Model, Box<dyn std::error::Error>> {
    let obj: Obj<obj::Vertex, u32> = load_obj(BufReader::new(File::open(path)?))?;
    println!("Number of vertices - {}", obj.vertices.len());
    println!("Number of indices  - {}", obj.indices.len());

    let vertices: Vec<Vertex> = obj
        .vertices
        .iter()
        .map(|v| Vertex {
            position: vector![v.position[0], v.position[1], v.position[2]],
            normal: vector![v.normal[0], v.normal[1], v.normal[2]],
            ambient: vector![0.9, 0.9, 0.9],
        })
        .collect();

    return Ok(Model {
        vertex_buffer: Rc::new(vertices),
        index_buffer: Rc::new(obj.indices),
        world_matrix: Matrix4::identity(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_linear_combination_is_component_wise() {
        let a = Vertex {
            position: vector![1.0, 0.0, 0.0],
            normal: vector![0.0, 1.0, 0.0],
            ambient: vector![1.0, 1.0, 1.0],
        };
        let b = Vertex {
            position: vector![0.0, 2.0, 0.0],
            normal: vector![0.0, 0.0, 2.0],
            ambient: vector![0.0, 0.0, 0.0],
        };
        let mixed = a * 0.5 + b * 0.5;
        assert_eq!(mixed.position, vector![0.5, 1.0, 0.0]);
        assert_eq!(mixed.normal, vector![0.0, 0.5, 1.0]);
        assert_eq!(mixed.ambient, vector![0.5, 0.5, 0.5]);
    }
}
