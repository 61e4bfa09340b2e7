//! Shading core of the reflectance viewer.
//!
//! Two pieces live here: the per-frame transform pipeline that produces the
//! world/view/projection matrices for every object, and the per-fragment
//! evaluators for the Blinn–Phong and Cook–Torrance reflectance models. Both
//! are plain functions over `glam` types so they can be driven by the software
//! rasterizer or tested on their own.

pub mod blinn_phong;
pub mod cook_torrance;
mod error;
pub mod evaluator;
pub mod light;
pub mod material;
pub mod texture;
pub mod transform;

pub use error::ShadingError;
pub use evaluator::{ReflectanceModel, SurfaceSample};
pub use light::{Incidence, Light};
pub use material::{BlinnPhongParams, CookTorranceParams, Material};
pub use texture::Texture;
pub use transform::{Camera, FrameTransforms, ObjectTransforms};

pub mod math_prelude {
    pub use glam::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};
}

use glam::Vec4;

/// Drops the alpha produced by the lighting sums, fragments are always opaque.
pub(crate) fn opaque(color: Vec4) -> Vec4 {
    color.truncate().extend(1.0)
}
