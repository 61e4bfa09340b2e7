use glam::{Vec2, Vec4};

use crate::ShadingError;

/// RGBA texture sampled with nearest filtering and repeat wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    colors: Vec<Vec4>,
    width: usize,
    height: usize,
}

impl Texture {
    /// Texels of the 2x2 checker the demo objects are painted with.
    pub const CHECKER_TEXELS: [u8; 16] = [
        255, 255, 255, 255, //
        168, 168, 168, 255, //
        168, 168, 168, 255, //
        255, 255, 255, 255, //
    ];

    /// `bytes` holds rows of RGBA8 texels, row 0 is at `v = 0`.
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, ShadingError> {
        if width == 0 || height == 0 {
            return Err(ShadingError::EmptyTexture { width, height });
        }
        let expected = width * height * 4;
        if bytes.len() != expected {
            return Err(ShadingError::TextureSize {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self::from_valid_rgba8(width, height, bytes))
    }

    pub fn checker() -> Self {
        Self::from_valid_rgba8(2, 2, &Self::CHECKER_TEXELS)
    }

    /// `bytes` must already hold exactly `width * height` texels.
    fn from_valid_rgba8(width: usize, height: usize, bytes: &[u8]) -> Self {
        let colors = bytes
            .chunks_exact(4)
            .map(|p| Vec4::new(p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32) / 255.0)
            .collect();
        Self {
            colors,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let x = texel_index(uv.x, self.width);
        let y = texel_index(uv.y, self.height);
        self.color_at(x, y)
    }

    fn color_at(&self, x: usize, y: usize) -> Vec4 {
        self.colors[x + y * self.width]
    }
}

fn texel_index(coord: f32, size: usize) -> usize {
    let wrapped = coord.rem_euclid(1.0);
    // NaN saturates to 0 in the cast
    ((wrapped * size as f32) as usize).min(size - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: f32 = 168.0 / 255.0;

    #[test]
    fn checker_quadrants() {
        let tex = Texture::checker();
        assert_eq!(tex.sample(Vec2::new(0.25, 0.25)), Vec4::ONE);
        assert_eq!(
            tex.sample(Vec2::new(0.75, 0.25)),
            Vec4::new(GRAY, GRAY, GRAY, 1.0)
        );
        assert_eq!(
            tex.sample(Vec2::new(0.25, 0.75)),
            Vec4::new(GRAY, GRAY, GRAY, 1.0)
        );
        assert_eq!(tex.sample(Vec2::new(0.75, 0.75)), Vec4::ONE);
    }

    #[test]
    fn sampling_repeats() {
        let tex = Texture::checker();
        assert_eq!(
            tex.sample(Vec2::new(1.25, -0.75)),
            tex.sample(Vec2::new(0.25, 0.25))
        );
        assert_eq!(tex.sample(Vec2::new(1.0, 1.0)), tex.sample(Vec2::ZERO));
    }

    #[test]
    fn from_rgba8_matches_checker() {
        let tex = Texture::from_rgba8(2, 2, &Texture::CHECKER_TEXELS).unwrap();
        assert_eq!(tex, Texture::checker());
    }

    #[test]
    fn wrong_byte_count_is_rejected() {
        let err = Texture::from_rgba8(2, 2, &[0; 12]).unwrap_err();
        assert_eq!(
            err,
            ShadingError::TextureSize {
                width: 2,
                height: 2,
                expected: 16,
                actual: 12
            }
        );
        assert!(Texture::from_rgba8(0, 2, &[]).is_err());
    }
}
