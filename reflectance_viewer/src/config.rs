//! Viewer configuration, read from a TOML file. Every field is optional and
//! falls back to the demo scene defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rasterizer::math_prelude::*;
use serde::{Deserialize, Serialize};
use shading::{
    BlinnPhongParams, Camera, CookTorranceParams, Light, ReflectanceModel, ShadingError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    #[error("invalid shading parameters")]
    Invalid(#[from] ShadingError),
    #[error("invalid setting `{name}`: {reason}")]
    Setting { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            eye: camera.eye,
            target: camera.target,
            up: camera.up,
            fov_degrees: camera.fov_y.to_degrees(),
            near: camera.near,
            far: camera.far,
        }
    }
}

impl CameraConfig {
    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.eye,
            target: self.target,
            up: self.up,
            fov_y: self.fov_degrees.to_radians(),
            near: self.near,
            far: self.far,
            aspect,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(setting("camera.fov_degrees", "must be in (0, 180)"));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(setting("camera.far", "need 0 < near < far"));
        }
        if (self.eye - self.target).cross(self.up).length_squared() == 0.0 {
            return Err(setting("camera.up", "must not be parallel to the view direction"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub blinn_phong: BlinnPhongParams,
    pub cook_torrance: CookTorranceParams,
    /// Modulate every object with the 2x2 checker texture.
    pub textured: bool,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            blinn_phong: BlinnPhongParams::default(),
            cook_torrance: CookTorranceParams::default(),
            textured: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for colors and spins, random when missing.
    pub seed: Option<u64>,
    /// Spin velocities are drawn from `[-spin_limit, spin_limit]` rad/s.
    pub spin_limit: f32,
    pub plane_color: Vec4,
    pub saturation: f32,
    /// Shape hues are `base + U(0, hue_spread)` degrees.
    pub hue_spread: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            spin_limit: 0.4,
            plane_color: Vec4::new(0.8, 0.8, 0.8, 1.0),
            saturation: 0.75,
            hue_spread: 90.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub frames: u32,
    pub fps: f32,
    /// Scene time of the first frame, in seconds.
    pub start_time: f32,
    pub model: ReflectanceModel,
    pub output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            frames: 1,
            fps: 30.0,
            start_time: 0.0,
            model: ReflectanceModel::default(),
            output: PathBuf::from("frames"),
        }
    }
}

impl RenderConfig {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(setting("render.width", "framebuffer must not be empty"));
        }
        if !(self.fps > 0.0) {
            return Err(setting("render.fps", "must be positive"));
        }
        if !(self.start_time >= 0.0) {
            return Err(setting("render.start_time", "must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub lights: Vec<Light>,
    pub material: MaterialConfig,
    pub scene: SceneConfig,
    pub render: RenderConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            lights: default_lights(),
            material: MaterialConfig::default(),
            scene: SceneConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

/// White ambient at half intensity and a white point light up and to the left.
pub fn default_lights() -> Vec<Light> {
    vec![
        Light::ambient(Vec4::ONE, 0.5),
        Light::point(Vec3::new(-10.0, 10.0, 0.0), Vec4::ONE, 20.0),
    ]
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(contents)?;
        if config.lights.is_empty() {
            log::warn!("no lights configured, using the default lights");
            config.lights = default_lights();
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.render.validate()?;
        for light in &self.lights {
            light.validate()?;
        }
        self.material.blinn_phong.validate()?;
        self.material.cook_torrance.validate()?;
        if !(0.0..=1.0).contains(&self.scene.saturation) {
            return Err(setting("scene.saturation", "must be in [0, 1]"));
        }
        if !(self.scene.spin_limit >= 0.0) {
            return Err(setting("scene.spin_limit", "must not be negative"));
        }
        if !(self.scene.hue_spread >= 0.0) {
            return Err(setting("scene.hue_spread", "must not be negative"));
        }
        Ok(())
    }

    pub fn camera(&self) -> Camera {
        self.camera.camera(self.render.aspect())
    }
}

fn setting(name: &'static str, reason: &str) -> ConfigError {
    ConfigError::Setting {
        name,
        reason: reason.to_string(),
    }
}
