use std::ops::Range;

/// Pixel rectangle, `x`/`y` is the top left corner.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn x(&self) -> u32 {
        self.x
    }
    pub fn y(&self) -> u32 {
        self.y
    }
    pub fn width(&self) -> u32 {
        self.w
    }
    pub fn height(&self) -> u32 {
        self.h
    }

    pub fn columns(&self) -> Range<u32> {
        self.x..self.x + self.w
    }

    pub fn rows(&self) -> Range<u32> {
        self.y..self.y + self.h
    }

    /// Index of a pixel inside this box, row major.
    pub fn local_index(&self, x: u32, y: u32) -> usize {
        ((x - self.x) + (y - self.y) * self.w) as usize
    }

    /// Shared area of both boxes, `None` when they do not touch.
    pub fn overlap(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let maxl = self.x.max(other.x);
        let minr = (self.x + self.w).min(other.x + other.w);
        if minr <= maxl {
            return None;
        }

        let maxt = self.y.max(other.y);
        let minb = (self.y + self.h).min(other.y + other.h);
        if minb <= maxt {
            return None;
        }

        Some(BoundingBox::new(maxl, maxt, minr - maxl, minb - maxt))
    }
}
