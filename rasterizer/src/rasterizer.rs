mod bounding_box;
mod framebuffer;
mod frametime;
mod shader;

use std::time::Instant;

use bounding_box::BoundingBox;

pub use framebuffer::Framebuffer;
pub use frametime::FrameTime;
pub use shader::{FragmentShader, Interpolate, ShaderData, VertexShader};

use itertools::Itertools;
use rayon::prelude::*;

use crate::math_prelude::*;

#[derive(Debug, Clone, Copy)]
struct Fragment {
    //Index to ProcessedFace of the current draw
    face: usize,
    //Perspective corrected barycentric weights
    ratios: Vec3,
}

impl Fragment {
    const INVALID_FACE_INDEX: usize = usize::MAX;

    fn is_valid(&self) -> bool {
        self.face != Self::INVALID_FACE_INDEX
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self {
            face: Self::INVALID_FACE_INDEX,
            ratios: Vec3::ZERO,
        }
    }
}

struct FrameBlock {
    // The block on the screen this struct represents
    bounding_box: BoundingBox,
    //indices to ProcessedFace
    face_indices: Vec<usize>,
    fragments: Vec<Fragment>,
    //NDC depth, kept across draws until the next clear
    depth: Vec<f32>,
}

impl FrameBlock {
    fn new(bounding_box: BoundingBox) -> Self {
        let size = (bounding_box.width() * bounding_box.height()) as usize;
        Self {
            bounding_box,
            face_indices: Vec::with_capacity(128),
            fragments: vec![Fragment::default(); size],
            depth: vec![f32::INFINITY; size],
        }
    }

    fn reset_fragments(&mut self) {
        self.face_indices.clear();
        self.fragments
            .iter_mut()
            .for_each(|f| f.face = Fragment::INVALID_FACE_INDEX);
    }

    fn clear(&mut self) {
        self.reset_fragments();
        self.depth.fill(f32::INFINITY);
    }
}

struct TriangleInteriorChecker {
    vertex0: Vec3,
    inv_col1: Vec2,
    inv_col2: Vec2,
}

impl TriangleInteriorChecker {
    //None for triangles with no area on screen
    fn new(v0: &Vec3, v1: &Vec3, v2: &Vec3) -> Option<Self> {
        let col1 = *v1 - *v0;
        let col2 = *v2 - *v0;
        let det = col1.x * col2.y - col2.x * col1.y;
        if det.abs() <= f32::EPSILON * f32::EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let inv_col1 = Vec2::new(col2.y, -col1.y) * inv_det;
        let inv_col2 = Vec2::new(-col2.x, col1.x) * inv_det;
        Some(Self {
            vertex0: *v0,
            inv_col1,
            inv_col2,
        })
    }

    fn to_triangle_coords(&self, point: &Vec2) -> Vec2 {
        let (target_x, target_y) = (point.x - self.vertex0.x, point.y - self.vertex0.y);
        let newbase_x = self.inv_col1.x * target_x + self.inv_col2.x * target_y;
        let newbase_y = self.inv_col1.y * target_x + self.inv_col2.y * target_y;
        Vec2::new(newbase_x, newbase_y)
    }

    //A point in triangle coords
    fn is_point_in_triangle(&self, triangle_point: &Vec2) -> bool {
        0.0 <= triangle_point.x
            && 0.0 <= triangle_point.y
            && (triangle_point.x + triangle_point.y) <= 1.0
    }
}

struct ProcessedFace {
    //Normalized device coordinates
    positions: [Vec3; 3],
    inv_w: Vec3,
    //Indices into the vertex shader output
    vertices: [usize; 3],
    bounding_box: BoundingBox,
}

impl ProcessedFace {
    const MIN_W: f32 = 1e-5;

    //Triangles touching the camera plane are dropped instead of clipped
    fn new(vertices: [usize; 3], clip: [Vec4; 3], width: u32, height: u32) -> Option<Self> {
        if clip.iter().any(|c| !(c.w > Self::MIN_W)) {
            return None;
        }
        let positions = clip.map(|c| c.xyz() / c.w);
        if is_trivially_outside(&positions) {
            return None;
        }
        let bounding_box =
            bounding_box_from_vertices(&positions[0], &positions[1], &positions[2], width, height);
        Some(Self {
            positions,
            inv_w: Vec3::new(1.0 / clip[0].w, 1.0 / clip[1].w, 1.0 / clip[2].w),
            vertices,
            bounding_box,
        })
    }
}

pub struct Rasterizer {
    framebuffer: Framebuffer,
    frame_blocks: Vec<FrameBlock>,
    frame_time: FrameTime,
}

impl Rasterizer {
    const BLOCK_SIZE: u32 = 64;

    pub fn new(width: u32, height: u32) -> Self {
        let framebuffer = Framebuffer::new(width, height);
        let mut frame_blocks = Vec::new();

        for y in (0..height).step_by(Self::BLOCK_SIZE as usize) {
            for x in (0..width).step_by(Self::BLOCK_SIZE as usize) {
                let w = Self::BLOCK_SIZE.min(width - x);
                let h = Self::BLOCK_SIZE.min(height - y);
                let bb = BoundingBox::new(x, y, w, h);
                frame_blocks.push(FrameBlock::new(bb));
            }
        }
        Self {
            framebuffer,
            frame_blocks,
            frame_time: FrameTime::zero(),
        }
    }

    /// Draws an indexed triangle list. Depth is tested against everything drawn
    /// since the last clear.
    pub fn render_mesh<VS, FS, SD, V, U>(
        &mut self,
        vertices: &[V],
        indices: &[u32],
        vertex_shader: &VS,
        fragment_shader: &FS,
        uniform: &U,
    ) where
        V: Send + Sync,
        U: Send + Sync,
        SD: ShaderData,
        VS: VertexShader<VertexData = V, Uniform = U, SharedData = SD>,
        FS: FragmentShader<Uniform = U, SharedData = SD>,
    {
        let (width, height) = (self.width(), self.height());
        //Taken out so the blocks can be mutated while self is borrowed
        let mut frame_blocks = std::mem::take(&mut self.frame_blocks);

        let start = Instant::now();
        //Vertex shader stage, every vertex is shaded once
        let shaded: Vec<(Vec4, SD)> = vertices
            .par_iter()
            .map(|vertex| vertex_shader.vertex(vertex, uniform))
            .collect();

        debug_assert!(
            indices.iter().all(|&i| (i as usize) < shaded.len()),
            "index out of range"
        );
        let processed_faces: Vec<ProcessedFace> = indices
            .par_chunks_exact(3)
            .filter_map(|triangle| {
                let face = [
                    triangle[0] as usize,
                    triangle[1] as usize,
                    triangle[2] as usize,
                ];
                if face.iter().any(|&i| i >= shaded.len()) {
                    return None;
                }
                let clip = face.map(|i| shaded[i].0);
                ProcessedFace::new(face, clip, width, height)
            })
            .collect();

        //Put all the faces in their respective blocks so we can multi thread this
        frame_blocks.par_iter_mut().for_each(FrameBlock::reset_fragments);
        for (face_index, face) in processed_faces.iter().enumerate() {
            for block_index in self.frame_blocks_in_bounding_box(&face.bounding_box) {
                frame_blocks[block_index].face_indices.push(face_index);
            }
        }

        let vertex_shader_duration = start.elapsed();
        let start = Instant::now();

        frame_blocks.par_iter_mut().for_each(|block| {
            for &face_index in block.face_indices.iter() {
                let face = &processed_faces[face_index];
                let rasterize_box = match block.bounding_box.overlap(&face.bounding_box) {
                    Some(bb) => bb,
                    None => continue,
                };
                let [v0, v1, v2] = &face.positions;
                let triangle_checker = match TriangleInteriorChecker::new(v0, v1, v2) {
                    Some(checker) => checker,
                    None => continue,
                };

                for (y, x) in rasterize_box
                    .rows()
                    .cartesian_product(rasterize_box.columns())
                {
                    let (nx, ny) = screen_to_normalized(x, y, width, height);
                    let triangle_point = triangle_checker.to_triangle_coords(&Vec2::new(nx, ny));
                    if !triangle_checker.is_point_in_triangle(&triangle_point) {
                        continue;
                    }

                    let ratio_2 = triangle_point.y;
                    let ratio_1 = triangle_point.x;
                    let ratio_0 = 1.0 - ratio_1 - ratio_2;
                    let fragment_depth = ratio_0 * v0.z + ratio_1 * v1.z + ratio_2 * v2.z;
                    if !(-1.0..=1.0).contains(&fragment_depth) {
                        continue;
                    }

                    let fragment_index = block.bounding_box.local_index(x, y);
                    if fragment_depth < block.depth[fragment_index] {
                        block.depth[fragment_index] = fragment_depth;
                        block.fragments[fragment_index] = Fragment {
                            face: face_index,
                            ratios: perspective_correct(
                                Vec3::new(ratio_0, ratio_1, ratio_2),
                                face.inv_w,
                            ),
                        };
                    }
                }
            }
        });

        let rasterization_duration = start.elapsed();
        let start = Instant::now();

        //Fragment shader stage
        let width = width as usize;
        let blocks_width = self.frame_blocks_width() as usize;
        let block_size = Self::BLOCK_SIZE as usize;
        let blocks = &frame_blocks;
        self.framebuffer
            .color
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, color)| {
                let x = index % width;
                let y = index / width;
                let block = &blocks[x / block_size + (y / block_size) * blocks_width];
                let fragment = &block.fragments[block.bounding_box.local_index(x as u32, y as u32)];
                if fragment.is_valid() {
                    let face = &processed_faces[fragment.face];
                    let [i0, i1, i2] = face.vertices;
                    let interpolated = SD::interpolate(
                        &shaded[i0].1,
                        &shaded[i1].1,
                        &shaded[i2].1,
                        fragment.ratios.x,
                        fragment.ratios.y,
                        fragment.ratios.z,
                    );
                    *color = fragment_shader.fragment(&interpolated, uniform).xyz();
                }
            });

        let fragment_shader_duration = start.elapsed();

        self.frame_time += FrameTime::new(
            vertex_shader_duration,
            rasterization_duration,
            fragment_shader_duration,
        );
        self.frame_blocks = frame_blocks;
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn clear(&mut self) {
        self.clear_color(Vec3::ZERO)
    }

    pub fn clear_color(&mut self, color: Vec3) {
        self.frame_blocks.par_iter_mut().for_each(FrameBlock::clear);
        self.framebuffer.fill(color);
        self.frame_time = FrameTime::zero();
    }

    /// Stage timings of every draw since the last clear.
    pub fn frametime(&self) -> &FrameTime {
        &self.frame_time
    }

    //Number of frameblocks per line
    fn frame_blocks_width(&self) -> u32 {
        (self.width() + Self::BLOCK_SIZE - 1) / Self::BLOCK_SIZE
    }

    fn frame_blocks_in_bounding_box(
        &self,
        bounding_box: &BoundingBox,
    ) -> impl Iterator<Item = usize> {
        let last_x = (bounding_box.x() + bounding_box.width())
            .saturating_sub(1)
            .min(self.width() - 1);
        let last_y = (bounding_box.y() + bounding_box.height())
            .saturating_sub(1)
            .min(self.height() - 1);
        let left_block = bounding_box.x() / Self::BLOCK_SIZE;
        let right_block = last_x / Self::BLOCK_SIZE;
        let top_block = bounding_box.y() / Self::BLOCK_SIZE;
        let bot_block = last_y / Self::BLOCK_SIZE;
        let blocks_width = self.frame_blocks_width();

        (top_block..=bot_block)
            .cartesian_product(left_block..=right_block)
            .map(move |(y, x)| (x + y * blocks_width) as usize)
    }
}

//Every vertex beyond the same side of the view volume
fn is_trivially_outside(positions: &[Vec3; 3]) -> bool {
    let beyond = |axis: usize, sign: f32| positions.iter().all(|p| p[axis] * sign > 1.0);
    (0..3).any(|axis| beyond(axis, 1.0) || beyond(axis, -1.0))
}

fn perspective_correct(ratios: Vec3, inv_w: Vec3) -> Vec3 {
    let weighted = ratios * inv_w;
    let sum = weighted.x + weighted.y + weighted.z;
    if sum > 0.0 {
        weighted / sum
    } else {
        ratios
    }
}

fn bounding_box_from_vertices(
    v0: &Vec3,
    v1: &Vec3,
    v2: &Vec3,
    width: u32,
    height: u32,
) -> BoundingBox {
    let min_x = v0.x.min(v1.x.min(v2.x));
    let min_y = v0.y.min(v1.y.min(v2.y));
    let max_x = v0.x.max(v1.x.max(v2.x));
    let max_y = v0.y.max(v1.y.max(v2.y));

    let (tlx, tly) = normalized_to_screen(min_x, max_y, width, height);
    let (brx, bry) = normalized_to_screen(max_x, min_y, width, height);

    //we add 1 to round it up so the box completly fills the triangle otherwise some triangles will render weirdly
    BoundingBox::new(tlx, tly, brx - tlx + 1, bry - tly + 1)
}

fn normalized_to_screen(mut x: f32, mut y: f32, width: u32, height: u32) -> (u32, u32) {
    x = (x + 1.0) / 2.0;
    y = (-y + 1.0) / 2.0;
    //negative values saturate to 0
    let screen_x = ((x * width as f32) as u32).min(width - 1);
    let screen_y = ((y * height as f32) as u32).min(height - 1);
    (screen_x, screen_y)
}

//Sampled at the pixel center
fn screen_to_normalized(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
    let normalized_x = ((x as f32 + 0.5) / width as f32) * 2.0 - 1.0;
    let normalized_y = -(((y as f32 + 0.5) / height as f32) * 2.0 - 1.0);
    (normalized_x, normalized_y)
}
