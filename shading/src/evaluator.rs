use std::{fmt, str::FromStr};

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::{blinn_phong, cook_torrance, Light, Material, ShadingError};

/// Interpolated fragment inputs, all in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub position: Vec3,
    pub normal: Vec3,
    /// Surface to camera.
    pub to_view: Vec3,
    pub uv: Vec2,
}

impl SurfaceSample {
    pub fn normalized(&self) -> Self {
        Self {
            normal: self.normal.normalize_or_zero(),
            to_view: self.to_view.normalize_or_zero(),
            ..*self
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReflectanceModel {
    #[default]
    BlinnPhong,
    CookTorrance,
}

impl ReflectanceModel {
    pub const ALL: [ReflectanceModel; 2] = [Self::BlinnPhong, Self::CookTorrance];

    pub fn name(&self) -> &'static str {
        match self {
            Self::BlinnPhong => "blinn-phong",
            Self::CookTorrance => "cook-torrance",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::BlinnPhong => Self::CookTorrance,
            Self::CookTorrance => Self::BlinnPhong,
        }
    }

    /// Final fragment color. Deterministic in its inputs; a non finite result
    /// comes back as opaque black.
    pub fn shade(&self, sample: &SurfaceSample, material: &Material, lights: &[Light]) -> Vec4 {
        let sample = sample.normalized();
        let surface_color = material.surface_color(sample.uv);
        let color = match self {
            Self::BlinnPhong => {
                blinn_phong::shade(&sample, surface_color, &material.blinn_phong, lights)
            }
            Self::CookTorrance => {
                cook_torrance::shade(&sample, surface_color, &material.cook_torrance, lights)
            }
        };

        if color.is_finite() {
            color
        } else {
            Vec4::W
        }
    }
}

impl fmt::Display for ReflectanceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReflectanceModel {
    type Err = ShadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|model| model.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ShadingError::UnknownModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_from_above() -> Vec<Light> {
        vec![
            Light::ambient(Vec4::ONE, 0.2),
            Light::directional(Vec3::new(0.3, -1.0, 0.1), Vec4::ONE),
            Light::point(Vec3::new(-10.0, 10.0, 0.0), Vec4::ONE, 20.0),
        ]
    }

    #[test]
    fn parse_and_display() {
        for model in ReflectanceModel::ALL {
            assert_eq!(model.to_string().parse::<ReflectanceModel>(), Ok(model));
        }
        assert_eq!(
            "Cook-Torrance".parse::<ReflectanceModel>(),
            Ok(ReflectanceModel::CookTorrance)
        );
        assert!("phong".parse::<ReflectanceModel>().is_err());
        assert_eq!(
            ReflectanceModel::BlinnPhong.toggle(),
            ReflectanceModel::CookTorrance
        );
    }

    #[test]
    fn unnormalized_inputs_are_normalized() {
        let material = Material::default();
        let lights = lit_from_above();
        let unit = SurfaceSample {
            position: Vec3::new(1.0, 0.0, 2.0),
            normal: Vec3::new(0.0, 1.0, 0.0),
            to_view: Vec3::new(0.0, 0.6, 0.8),
            uv: Vec2::ZERO,
        };
        let scaled = SurfaceSample {
            normal: unit.normal * 7.0,
            to_view: unit.to_view * 0.25,
            ..unit
        };
        for model in ReflectanceModel::ALL {
            let a = model.shade(&unit, &material, &lights);
            let b = model.shade(&scaled, &material, &lights);
            assert!(a.abs_diff_eq(b, 1e-5), "{model}: {a} != {b}");
        }
    }

    #[test]
    fn shading_is_deterministic() {
        let material = Material::new(Vec4::new(0.9, 0.3, 0.1, 1.0));
        let lights = lit_from_above();
        let sample = SurfaceSample {
            position: Vec3::new(-2.0, 0.5, 1.0),
            normal: Vec3::new(0.2, 0.9, 0.1),
            to_view: Vec3::new(0.0, 9.5, 9.0),
            uv: Vec2::new(0.3, 0.7),
        };
        for model in ReflectanceModel::ALL {
            assert_eq!(
                model.shade(&sample, &material, &lights),
                model.shade(&sample, &material, &lights)
            );
        }
    }

    #[test]
    fn non_finite_color_becomes_black() {
        let material = Material::new(Vec4::splat(f32::NAN));
        let sample = SurfaceSample {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            to_view: Vec3::Y,
            uv: Vec2::ZERO,
        };
        for model in ReflectanceModel::ALL {
            assert_eq!(model.shade(&sample, &material, &lit_from_above()), Vec4::W);
        }
    }

    #[test]
    fn zero_normal_only_gets_ambient() {
        let material = Material::default();
        let sample = SurfaceSample {
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            to_view: Vec3::Y,
            uv: Vec2::ZERO,
        };
        let color = ReflectanceModel::BlinnPhong.shade(&sample, &material, &lit_from_above());
        assert!(color.abs_diff_eq(Vec4::new(0.2, 0.2, 0.2, 1.0), 1e-6));
    }
}
