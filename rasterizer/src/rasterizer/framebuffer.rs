use crate::math_prelude::*;

/// Linear RGB color target the fragment stage writes into.
pub struct Framebuffer {
    pub(super) width: u32,
    pub(super) height: u32,
    pub(super) color: Vec<Vec3>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            color: vec![Vec3::ZERO; size],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color(&self) -> impl Iterator<Item = (u32, u32, &Vec3)> {
        self.color.iter().enumerate().map(move |(i, c)| {
            let (x, y) = self.index_to_coords(i as u32);
            (x, y, c)
        })
    }

    pub fn get_color(&self, x: u32, y: u32) -> Option<&Vec3> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.color.get(self.coords_to_index(x, y) as usize)
    }

    pub fn fill(&mut self, color: Vec3) {
        self.color.fill(color);
    }

    /// Packs the colors as RGBA8, clamping to [0, 1] and forcing alpha to 255.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(self.color.len() * 4);
        for c in &self.color {
            let c = (c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
            pixels.extend_from_slice(&[c.x as u8, c.y as u8, c.z as u8, 255]);
        }
        pixels
    }

    fn coords_to_index(&self, x: u32, y: u32) -> u32 {
        x + y * self.width
    }

    fn index_to_coords(&self, index: u32) -> (u32, u32) {
        let x = index % self.width;
        let y = index / self.width;
        (x, y)
    }
}
