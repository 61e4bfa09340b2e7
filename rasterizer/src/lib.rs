pub mod rasterizer;
pub use rasterizer::*;
// same name as the trait: `use rasterizer::Interpolate` brings in both
pub use rasterizer_macros::Interpolate;

pub mod math_prelude {
    pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec3Swizzles, Vec4, Vec4Swizzles};
}
