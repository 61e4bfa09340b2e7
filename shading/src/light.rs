use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::ShadingError;

/// A light source. Lights are configured once per session and only read by
/// the evaluators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    Ambient {
        color: Vec4,
        intensity: f32,
    },
    /// `direction` is the way the light travels, surfaces are lit from
    /// `-direction`.
    Directional { direction: Vec3, color: Vec4 },
    Point {
        position: Vec3,
        color: Vec4,
        /// Distance at which the light falls to a quarter of its strength.
        radius: f32,
    },
}

/// What a non ambient light delivers to a surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incidence {
    /// Unit vector from the surface towards the light.
    pub direction: Vec3,
    pub color: Vec4,
    pub attenuation: f32,
}

impl Light {
    pub fn ambient(color: Vec4, intensity: f32) -> Self {
        Self::Ambient { color, intensity }
    }

    pub fn directional(direction: Vec3, color: Vec4) -> Self {
        Self::Directional {
            direction: direction.normalize_or_zero(),
            color,
        }
    }

    pub fn point(position: Vec3, color: Vec4, radius: f32) -> Self {
        Self::Point {
            position,
            color,
            radius,
        }
    }

    pub fn validate(&self) -> Result<(), ShadingError> {
        match *self {
            Self::Ambient { .. } => Ok(()),
            Self::Directional { direction, .. } => {
                if direction.length_squared() > 0.0 {
                    Ok(())
                } else {
                    Err(ShadingError::LightDirection)
                }
            }
            Self::Point { radius, .. } => {
                if radius > 0.0 {
                    Ok(())
                } else {
                    Err(ShadingError::LightRadius(radius))
                }
            }
        }
    }

    /// Direction, color and falloff of this light at `position`, `None` for
    /// ambient lights.
    pub fn incidence(&self, position: Vec3) -> Option<Incidence> {
        match *self {
            Self::Ambient { .. } => None,
            Self::Directional { direction, color } => Some(Incidence {
                direction: (-direction).normalize_or_zero(),
                color,
                attenuation: 1.0,
            }),
            Self::Point {
                position: light_position,
                color,
                radius,
            } => {
                let to_light = light_position - position;
                Some(Incidence {
                    direction: to_light.normalize_or_zero(),
                    color,
                    attenuation: point_attenuation(to_light.length(), radius),
                })
            }
        }
    }

    pub fn ambient_contribution(&self) -> Vec4 {
        match *self {
            Self::Ambient { color, intensity } => color * intensity,
            _ => Vec4::ZERO,
        }
    }
}

/// `1 / (1 + distance / radius)²`: 1 at the light, 1/4 at `radius`.
pub fn point_attenuation(distance: f32, radius: f32) -> f32 {
    let falloff = 1.0 + distance / radius;
    1.0 / (falloff * falloff)
}

pub fn ambient_sum(lights: &[Light]) -> Vec4 {
    lights.iter().map(Light::ambient_contribution).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attenuation_at_radius_is_a_quarter() {
        assert_eq!(point_attenuation(3.0, 3.0), 0.25);
        assert_eq!(point_attenuation(0.0, 3.0), 1.0);
    }

    #[test]
    fn directional_light_points_back_at_the_source() {
        let light = Light::directional(Vec3::new(0.0, -2.0, 0.0), Vec4::ONE);
        let incidence = light.incidence(Vec3::new(4.0, 1.0, -3.0)).unwrap();
        assert_eq!(incidence.direction, Vec3::Y);
        assert_eq!(incidence.attenuation, 1.0);
    }

    #[test]
    fn point_light_direction_and_falloff() {
        let light = Light::point(Vec3::new(0.0, 4.0, 0.0), Vec4::ONE, 2.0);
        let incidence = light.incidence(Vec3::ZERO).unwrap();
        assert!(incidence.direction.abs_diff_eq(Vec3::Y, 1e-6));
        assert!((incidence.attenuation - 1.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn ambient_lights_only_contribute_ambient() {
        let lights = [
            Light::ambient(Vec4::ONE, 0.5),
            Light::ambient(Vec4::new(1.0, 0.0, 0.0, 1.0), 0.25),
            Light::point(Vec3::ZERO, Vec4::ONE, 1.0),
        ];
        assert!(lights[0].incidence(Vec3::ZERO).is_none());
        assert_eq!(ambient_sum(&lights), Vec4::new(0.75, 0.5, 0.5, 0.75));
    }

    #[test]
    fn validation_rejects_degenerate_lights() {
        assert_eq!(
            Light::point(Vec3::ZERO, Vec4::ONE, 0.0).validate(),
            Err(ShadingError::LightRadius(0.0))
        );
        assert_eq!(
            Light::directional(Vec3::ZERO, Vec4::ONE).validate(),
            Err(ShadingError::LightDirection)
        );
        assert!(Light::ambient(Vec4::ONE, 0.5).validate().is_ok());
    }
}
