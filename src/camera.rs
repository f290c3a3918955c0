use nalgebra as na;
use na::{matrix, Matrix4, Vector3};

/// Camera collaborator. Produces the view and projection matrices that the
/// application composes (together with the world matrix) into the single
/// transform handed to the vertex shader once per frame.
pub struct Camera {
    pub look_from: Vector3<f32>,
    pub look_at: Vector3<f32>,
    pub up: Vector3<f32>,
    pub fov_y: f32, // Vertical field of view in radians.
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    /// Builds the orthonormal basis around the camera and bakes the
    /// translation to the camera origin into the same matrix.
    pub fn get_view_matrix(&self) -> Matrix4<f32> {
        let new_z = (self.look_from - self.look_at).normalize();
        let new_x = self.up.cross(&new_z).normalize();
        let new_y = new_z.cross(&new_x);
        return matrix![
            new_x.x, new_x.y, new_x.z, -new_x.dot(&self.look_from);
            new_y.x, new_y.y, new_y.z, -new_y.dot(&self.look_from);
            new_z.x, new_z.y, new_z.z, -new_z.dot(&self.look_from);
            0.0,     0.0,     0.0,     1.0
        ];
    }

    /// Right-handed perspective projection, NDC z in [-1, 1]. Points in
    /// front of the camera come out with positive clip-space w, which is
    /// what the near-plane clipper keys on.
    pub fn get_projection_matrix(&self) -> Matrix4<f32> {
        let f = 1.0 / (self.fov_y / 2.0).tan();
        let depth = self.z_near - self.z_far;
        return matrix![
            f / self.aspect, 0.0, 0.0,                                  0.0;
            0.0,             f,   0.0,                                  0.0;
            0.0,             0.0, (self.z_far + self.z_near) / depth,   2.0 * self.z_far * self.z_near / depth;
            0.0,             0.0, -1.0,                                 0.0
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn camera() -> Camera {
        return Camera {
            look_from: vector![0.0, 0.0, 0.0],
            look_at: vector![0.0, 0.0, -1.0],
            up: vector![0.0, 1.0, 0.0],
            fov_y: std::f32::consts::FRAC_PI_2,
            aspect: 1.0,
            z_near: 1.0,
            z_far: 10.0,
        };
    }

    #[test]
    fn points_in_front_get_positive_w() {
        let camera = camera();
        let clip = camera.get_projection_matrix()
            * camera.get_view_matrix()
            * vector![0.0, 0.0, -5.0, 1.0];
        assert!(clip.w > 0.0);
        let ndc_z = clip.z / clip.w;
        assert!(ndc_z > -1.0 && ndc_z < 1.0);
    }

    #[test]
    fn near_and_far_planes_map_to_ndc_extremes() {
        let camera = camera();
        let matrix = camera.get_projection_matrix() * camera.get_view_matrix();
        let near = matrix * vector![0.0, 0.0, -1.0, 1.0];
        let far = matrix * vector![0.0, 0.0, -10.0, 1.0];
        assert!((near.z / near.w - -1.0).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn points_behind_the_camera_get_non_positive_w() {
        let camera = camera();
        let clip = camera.get_projection_matrix()
            * camera.get_view_matrix()
            * vector![0.0, 0.0, 2.0, 1.0];
        assert!(clip.w <= 0.0);
    }
}
