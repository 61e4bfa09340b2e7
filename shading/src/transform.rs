//! Per-frame transform pipeline.
//!
//! The camera matrices are computed once per frame into an immutable
//! [`FrameTransforms`], every object then derives its own
//! [`ObjectTransforms`] from it. Nothing here is mutated in place across
//! frames.

use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 45.0f32.to_radians(),
            near: 0.5,
            far: 100.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    pub fn with_aspect(self, aspect: f32) -> Self {
        Self { aspect, ..self }
    }

    /// Camera-to-world matrix, the inverse of the view matrix. Its translation
    /// column is the eye position.
    pub fn generate_camera_matrix(&self) -> Mat4 {
        debug_assert!(
            self.eye != self.target,
            "camera eye and target must differ"
        );
        let z_axis = (self.eye - self.target).normalize();
        let x_axis = self.up.cross(z_axis).normalize();
        let y_axis = z_axis.cross(x_axis).normalize();
        Mat4::from_cols(
            x_axis.extend(0.0),
            y_axis.extend(0.0),
            z_axis.extend(0.0),
            self.eye.extend(1.0),
        )
    }

    pub fn generate_view_matrix(&self) -> Mat4 {
        self.generate_camera_matrix().inverse()
    }

    /// OpenGL style projection, clip depth in [-1, 1].
    pub fn generate_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn frame(&self) -> FrameTransforms {
        let camera = self.generate_camera_matrix();
        let view = camera.inverse();
        let projection = self.generate_projection_matrix();
        FrameTransforms {
            camera,
            view,
            projection,
            view_projection: projection * view,
        }
    }
}

/// Camera matrices for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub camera: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
}

impl FrameTransforms {
    pub fn eye(&self) -> Vec3 {
        self.camera.w_axis.truncate()
    }
}

/// Matrices consumed by the shading stage for one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransforms {
    pub world: Mat4,
    pub world_inverse_transpose: Mat4,
    pub world_view_projection: Mat4,
}

impl Default for ObjectTransforms {
    fn default() -> Self {
        Self {
            world: Mat4::IDENTITY,
            world_inverse_transpose: Mat4::IDENTITY,
            world_view_projection: Mat4::IDENTITY,
        }
    }
}

impl ObjectTransforms {
    /// `spin` holds the angular velocities around x, y and z in radians per
    /// second. The world matrix must be invertible, which always holds for
    /// translation plus rotation.
    pub fn compute(frame: &FrameTransforms, translation: Vec3, spin: Vec3, time: f32) -> Self {
        let world = world_matrix(translation, spin, time);
        debug_assert!(
            world.determinant().abs() > f32::EPSILON,
            "world matrix is singular"
        );
        Self {
            world,
            world_inverse_transpose: world.inverse().transpose(),
            world_view_projection: frame.view_projection * world,
        }
    }
}

/// `translate × rotX × rotY × rotZ`, rotations scaled by elapsed time.
pub fn world_matrix(translation: Vec3, spin: Vec3, time: f32) -> Mat4 {
    Mat4::from_translation(translation)
        * Mat4::from_rotation_x(time * spin.x)
        * Mat4::from_rotation_y(time * spin.y)
        * Mat4::from_rotation_z(time * spin.z)
}
