//! Blinn–Phong reflectance.

use std::f32::consts::PI;

use glam::{Vec3, Vec4};

use crate::{light::ambient_sum, opaque, BlinnPhongParams, Light, SurfaceSample};

pub fn half_vector(to_light: Vec3, to_view: Vec3) -> Vec3 {
    (to_light + to_view).normalize_or_zero()
}

// Inputs are unit vectors, the upper clamp only absorbs rounding.
pub fn diffuse_term(normal: Vec3, to_light: Vec3) -> f32 {
    normal.dot(to_light).clamp(0.0, 1.0)
}

/// No highlight on surfaces facing away from the light.
pub fn specular_term(normal: Vec3, half: Vec3, shininess: f32, diffuse: f32) -> f32 {
    if diffuse > 0.0 {
        normal.dot(half).clamp(0.0, 1.0).powf(shininess)
    } else {
        0.0
    }
}

/// Shades a fragment whose normal and view vectors are already normalized.
pub fn shade(
    sample: &SurfaceSample,
    surface_color: Vec4,
    params: &BlinnPhongParams,
    lights: &[Light],
) -> Vec4 {
    let diffuse_scale = if params.normalize_diffuse {
        params.diffuse_constant / PI
    } else {
        params.diffuse_constant
    };

    let mut light = ambient_sum(lights);
    for incidence in lights.iter().filter_map(|l| l.incidence(sample.position)) {
        let diffuse = diffuse_term(sample.normal, incidence.direction);
        let half = half_vector(incidence.direction, sample.to_view);
        let specular = specular_term(sample.normal, half, params.shininess, diffuse);

        light += incidence.color * (diffuse * diffuse_scale);
        light += incidence.color
            * params.specular_color
            * (params.specular_factor * specular * incidence.attenuation);
    }

    opaque(light * surface_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn sample(normal: Vec3, to_view: Vec3) -> SurfaceSample {
        SurfaceSample {
            position: Vec3::ZERO,
            normal,
            to_view,
            uv: Vec2::ZERO,
        }
    }

    #[test]
    fn aligned_vectors_give_full_diffuse_and_specular() {
        let n = Vec3::Y;
        let h = half_vector(n, n);
        let diffuse = diffuse_term(n, n);
        assert_eq!(h, n);
        assert_eq!(diffuse, 1.0);
        assert_eq!(specular_term(n, h, 150.0, diffuse), 1.0);
    }

    #[test]
    fn back_facing_light_has_no_specular() {
        let n = Vec3::Y;
        let l = -Vec3::Y;
        let diffuse = diffuse_term(n, l);
        assert_eq!(diffuse, 0.0);
        assert_eq!(specular_term(n, Vec3::Y, 8.0, diffuse), 0.0);
    }

    #[test]
    fn single_light_matches_classic_formula() {
        let params = BlinnPhongParams::default();
        let lights = [
            Light::ambient(Vec4::ONE, 0.5),
            Light::directional(-Vec3::Y, Vec4::ONE),
        ];
        let surface = Vec4::new(0.2, 0.4, 0.6, 1.0);
        let color = shade(&sample(Vec3::Y, Vec3::Y), surface, &params, &lights);
        // ambient 0.5 + diffuse 1 + specular 1.5
        let expected = (surface * 3.0).truncate().extend(1.0);
        assert!(color.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn normalized_diffuse_divides_by_pi() {
        let params = BlinnPhongParams {
            specular_factor: 0.0,
            normalize_diffuse: true,
            ..BlinnPhongParams::default()
        };
        let lights = [Light::directional(-Vec3::Y, Vec4::ONE)];
        let color = shade(&sample(Vec3::Y, Vec3::Y), Vec4::ONE, &params, &lights);
        assert!((color.x - 1.0 / PI).abs() < 1e-6);
        assert_eq!(color.w, 1.0);
    }

    #[test]
    fn point_light_attenuates_specular_only() {
        let params = BlinnPhongParams::default();
        let lights = [Light::point(Vec3::new(0.0, 2.0, 0.0), Vec4::ONE, 2.0)];
        let color = shade(&sample(Vec3::Y, Vec3::Y), Vec4::ONE, &params, &lights);
        // diffuse 1 + specular 1.5 * 0.25
        assert!((color.x - 1.375).abs() < 1e-6);
    }

    #[test]
    fn lights_accumulate() {
        let params = BlinnPhongParams {
            specular_factor: 0.0,
            ..BlinnPhongParams::default()
        };
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);
        let lights = [
            Light::directional(-Vec3::Y, red),
            Light::directional(-Vec3::Y, blue),
        ];
        let color = shade(&sample(Vec3::Y, Vec3::Y), Vec4::ONE, &params, &lights);
        assert!(color.abs_diff_eq(Vec4::new(1.0, 0.0, 1.0, 1.0), 1e-6));
    }
}
