//! Cook–Torrance microfacet reflectance with a Beckmann distribution and the
//! Schlick style Fresnel approximation for conductors and dielectrics.

use std::f32::consts::PI;

use glam::Vec4;

use crate::{light::ambient_sum, opaque, CookTorranceParams, Light, SurfaceSample};

/// Smallest value the `4·(n·l)·(n·v)` denominator is allowed to take.
pub const MIN_DENOMINATOR: f32 = 1e-4;

/// Beckmann normal distribution function.
pub fn beckmann(dot_nh: f32, roughness: f32) -> f32 {
    if !(dot_nh > 0.0) {
        return 0.0;
    }
    let dnh2 = dot_nh * dot_nh;
    let m2 = roughness * roughness;
    let numerator = ((dnh2 - 1.0) / (m2 * dnh2)).exp();
    if numerator == 0.0 {
        return 0.0;
    }
    numerator / (PI * m2 * dnh2 * dnh2)
}

/// Masking and shadowing between microfacets.
pub fn geometric_masking(dot_nh: f32, dot_vh: f32, dot_nv: f32, dot_nl: f32) -> f32 {
    if dot_vh > 0.0 {
        let nhv = 2.0 * dot_nh / dot_vh;
        1.0f32.min((dot_nv * nhv).min(dot_nl * nhv))
    } else {
        0.0
    }
}

/// Lazanyi and Szirmay-Kalos approximation, `ior` is `n` and `absorption` is `k`.
pub fn fresnel(dot_vh: f32, ior: f32, absorption: f32) -> f32 {
    let xp = (1.0 - dot_vh).powi(5);
    let k2 = absorption * absorption;
    let top = (ior - 1.0) * (ior - 1.0) + 4.0 * ior * xp + k2;
    let bot = (ior + 1.0) * (ior + 1.0) + k2;
    top / bot
}

/// `D·F·G / (4·(n·l)·(n·v))`, zero at grazing angles.
pub fn microfacet_specular(d: f32, f: f32, g: f32, dot_nl: f32, dot_nv: f32) -> f32 {
    if dot_nl <= 0.0 || dot_nv <= 0.0 {
        return 0.0;
    }
    d * f * g / (4.0 * dot_nl * dot_nv).max(MIN_DENOMINATOR)
}

pub fn specular_reflectance(
    params: &CookTorranceParams,
    dot_nh: f32,
    dot_nv: f32,
    dot_nl: f32,
    dot_vh: f32,
) -> f32 {
    let d = beckmann(dot_nh, params.roughness);
    let f = fresnel(dot_vh, params.ior, params.absorption);
    let g = geometric_masking(dot_nh, dot_vh, dot_nv, dot_nl);
    microfacet_specular(d, f, g, dot_nl, dot_nv)
}

pub fn lambertian(diffuse_constant: f32) -> f32 {
    diffuse_constant / PI
}

/// Shades a fragment whose normal and view vectors are already normalized.
pub fn shade(
    sample: &SurfaceSample,
    surface_color: Vec4,
    params: &CookTorranceParams,
    lights: &[Light],
) -> Vec4 {
    let n = sample.normal;
    let v = sample.to_view;
    let diffuse = lambertian(params.diffuse_constant);
    let dot_nv = n.dot(v).max(0.0);

    let mut color = surface_color * ambient_sum(lights);
    for incidence in lights.iter().filter_map(|l| l.incidence(sample.position)) {
        let l = incidence.direction;
        let h = (l + v).normalize_or_zero();

        let dot_nh = n.dot(h).max(0.0);
        let dot_nl = n.dot(l).max(0.0);
        let dot_vh = v.dot(h).max(0.0);

        let rs = specular_reflectance(params, dot_nh, dot_nv, dot_nl, dot_vh);
        color += surface_color * incidence.color * ((rs + diffuse) * dot_nl);
    }

    opaque(color)
}
