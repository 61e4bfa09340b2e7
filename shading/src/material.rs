use std::sync::Arc;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::{ShadingError, Texture};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinnPhongParams {
    pub specular_color: Vec4,
    pub shininess: f32,
    pub specular_factor: f32,
    pub diffuse_constant: f32,
    /// Divide the diffuse term by π.
    pub normalize_diffuse: bool,
}

impl Default for BlinnPhongParams {
    fn default() -> Self {
        Self {
            specular_color: Vec4::ONE,
            shininess: 250.0,
            specular_factor: 1.5,
            diffuse_constant: 1.0,
            normalize_diffuse: false,
        }
    }
}

impl BlinnPhongParams {
    pub fn validate(&self) -> Result<(), ShadingError> {
        if self.shininess >= 0.0 {
            Ok(())
        } else {
            Err(ShadingError::Shininess(self.shininess))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookTorranceParams {
    /// Beckmann distribution width `m`.
    pub roughness: f32,
    /// Index of refraction `n`.
    pub ior: f32,
    /// Absorption coefficient `k`.
    pub absorption: f32,
    pub diffuse_constant: f32,
}

impl Default for CookTorranceParams {
    fn default() -> Self {
        Self {
            roughness: 0.1,
            ior: 0.5,
            absorption: 1.0,
            diffuse_constant: 1.5,
        }
    }
}

impl CookTorranceParams {
    pub fn validate(&self) -> Result<(), ShadingError> {
        if !(self.roughness > 0.0) {
            return Err(ShadingError::Roughness(self.roughness));
        }
        if !(self.ior >= 0.0) {
            return Err(ShadingError::RefractiveIndex(self.ior));
        }
        Ok(())
    }
}

/// Surface description shared by both reflectance models. Both parameter sets
/// are kept so the model can be switched without rebuilding the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub base_color: Vec4,
    pub texture: Option<Arc<Texture>>,
    pub blinn_phong: BlinnPhongParams,
    pub cook_torrance: CookTorranceParams,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}

impl Material {
    pub fn new(base_color: Vec4) -> Self {
        Self {
            base_color,
            texture: None,
            blinn_phong: BlinnPhongParams::default(),
            cook_torrance: CookTorranceParams::default(),
        }
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn validate(&self) -> Result<(), ShadingError> {
        self.blinn_phong.validate()?;
        self.cook_torrance.validate()
    }

    /// Texture sample tinted by the base color.
    pub fn surface_color(&self, uv: Vec2) -> Vec4 {
        match &self.texture {
            Some(texture) => texture.sample(uv) * self.base_color,
            None => self.base_color,
        }
    }
}
