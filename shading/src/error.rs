use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShadingError {
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    EmptyTexture { width: usize, height: usize },

    #[error("a {width}x{height} RGBA texture needs {expected} bytes, got {actual}")]
    TextureSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("roughness must be positive, got {0}")]
    Roughness(f32),

    #[error("shininess must not be negative, got {0}")]
    Shininess(f32),

    #[error("index of refraction must not be negative, got {0}")]
    RefractiveIndex(f32),

    #[error("point light radius must be positive, got {0}")]
    LightRadius(f32),

    #[error("directional light needs a non-zero direction")]
    LightDirection,

    #[error("unknown reflectance model `{0}`, expected `blinn-phong` or `cook-torrance`")]
    UnknownModel(String),
}
