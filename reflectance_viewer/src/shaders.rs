use std::sync::Arc;

use rasterizer::math_prelude::*;
use rasterizer::{FragmentShader, Interpolate, VertexShader};
use shading::{Light, Material, ObjectTransforms, ReflectanceModel, SurfaceSample};

use crate::primitives::MeshVertex;

/// Everything both shader stages read for one draw.
pub struct ObjectUniform {
    pub transforms: ObjectTransforms,
    /// Camera position in world space.
    pub eye: Vec3,
    pub material: Material,
    pub lights: Arc<[Light]>,
    pub model: ReflectanceModel,
}

/// World space varyings.
#[derive(Debug, Interpolate)]
pub struct SurfaceVaryings {
    pub position: Vec3,
    pub normal: Vec3,
    pub to_view: Vec3,
    pub uv: Vec2,
}

pub struct SurfaceVertexShader;
impl VertexShader for SurfaceVertexShader {
    type VertexData = MeshVertex;
    type Uniform = ObjectUniform;
    type SharedData = SurfaceVaryings;

    fn vertex(
        &self,
        vertex: &Self::VertexData,
        uniform: &Self::Uniform,
    ) -> (Vec4, Self::SharedData) {
        let transforms = &uniform.transforms;
        let position = vertex.position.extend(1.0);
        let world_position = (transforms.world * position).xyz();
        let normal = (transforms.world_inverse_transpose * vertex.normal.extend(0.0)).xyz();

        let data = Self::SharedData {
            position: world_position,
            normal,
            to_view: uniform.eye - world_position,
            uv: vertex.texcoord,
        };
        (transforms.world_view_projection * position, data)
    }
}

pub struct ReflectanceFragmentShader;
impl FragmentShader for ReflectanceFragmentShader {
    type Uniform = ObjectUniform;
    type SharedData = SurfaceVaryings;

    fn fragment(&self, shared: &Self::SharedData, uniform: &Self::Uniform) -> Vec4 {
        let sample = SurfaceSample {
            position: shared.position,
            normal: shared.normal,
            to_view: shared.to_view,
            uv: shared.uv,
        };
        uniform
            .model
            .shade(&sample, &uniform.material, &uniform.lights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shading::Camera;

    fn uniform(translation: Vec3) -> ObjectUniform {
        let frame = Camera::default().frame();
        ObjectUniform {
            transforms: ObjectTransforms::compute(&frame, translation, Vec3::ZERO, 0.0),
            eye: frame.eye(),
            material: Material::new(Vec4::ONE),
            lights: Arc::from(vec![Light::ambient(Vec4::ONE, 1.0)]),
            model: ReflectanceModel::BlinnPhong,
        }
    }

    #[test]
    fn vertex_outputs_world_space_varyings() {
        let uniform = uniform(Vec3::new(1.0, 2.0, 3.0));
        let vertex = MeshVertex {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            texcoord: Vec2::new(0.25, 0.5),
        };
        let (clip, data) = SurfaceVertexShader.vertex(&vertex, &uniform);

        assert!(data.position.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
        assert!(data.normal.abs_diff_eq(Vec3::Y, 1e-6));
        assert!(data
            .to_view
            .abs_diff_eq(Vec3::new(0.0, 10.0, 10.0) - data.position, 1e-5));
        assert_eq!(data.uv, Vec2::new(0.25, 0.5));
        assert_eq!(
            clip,
            uniform.transforms.world_view_projection * Vec4::new(0.0, 0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn fragment_uses_the_selected_model() {
        let uniform = uniform(Vec3::ZERO);
        let varyings = SurfaceVaryings {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            to_view: Vec3::Y,
            uv: Vec2::ZERO,
        };
        let color = ReflectanceFragmentShader.fragment(&varyings, &uniform);
        assert!(color.abs_diff_eq(Vec4::ONE, 1e-6));
    }
}
