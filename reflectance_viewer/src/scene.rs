use std::sync::Arc;

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rasterizer::math_prelude::*;
use rayon::prelude::*;
use shading::{Camera, FrameTransforms, Light, Material, ObjectTransforms, Texture};

use crate::{
    config::ViewerConfig,
    primitives::{self, Mesh, PrimitiveError},
};

pub struct DrawableObject {
    pub name: &'static str,
    pub mesh: Mesh,
    pub material: Material,
    pub translation: Vec3,
    /// Angular velocities around x, y and z in radians per second.
    pub spin: Vec3,
    pub transforms: ObjectTransforms,
}

impl DrawableObject {
    pub fn new(name: &'static str, mesh: Mesh, material: Material) -> Self {
        Self {
            name,
            mesh,
            material,
            translation: Vec3::ZERO,
            spin: Vec3::ZERO,
            transforms: ObjectTransforms::default(),
        }
    }
}

pub struct Scene {
    pub camera: Camera,
    pub lights: Arc<[Light]>,
    pub objects: Vec<DrawableObject>,
}

impl Scene {
    pub const GRID_ROWS: usize = 2;
    pub const GRID_COLUMNS: usize = 3;

    /// The demo layout: a large floor plane with six spinning shapes above it.
    pub fn demo(config: &ViewerConfig) -> Result<Self, PrimitiveError> {
        let seed = config.scene.seed.unwrap_or_else(rand::random);
        info!("scene seed {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);

        let texture = config.material.textured.then(|| Arc::new(Texture::checker()));
        let material = |color: Vec4| Material {
            base_color: color,
            texture: texture.clone(),
            blinn_phong: config.material.blinn_phong,
            cook_torrance: config.material.cook_torrance,
        };

        let mut plane = DrawableObject::new(
            "plane",
            primitives::plane(25.0, 25.0, 1, 1)?,
            material(config.scene.plane_color),
        );
        plane.translation = Vec3::new(0.0, -5.0, 0.0);

        let shapes = [
            ("cylinder", primitives::cylinder(1.0, 2.0, 24, 2)?),
            (
                "crescent",
                primitives::crescent(1.5, 1.0, 0.15, 0.25, 24)?,
            ),
            (
                "truncated cone",
                primitives::truncated_cone(1.5, 0.5, 1.5, 32, 1)?,
            ),
            ("torus", primitives::torus(1.0, 0.5, 32, 24)?),
            ("sphere", primitives::sphere(1.5, 24, 24)?),
            ("cube", primitives::cube(2.0)),
        ];
        debug_assert_eq!(shapes.len(), Self::GRID_ROWS * Self::GRID_COLUMNS);

        let base_hue = rng.gen_range(0.0..360.0f32);
        let spin_limit = config.scene.spin_limit;
        let mut objects = vec![plane];
        for (index, (name, mesh)) in shapes.into_iter().enumerate() {
            let row = index / Self::GRID_COLUMNS;
            let column = index % Self::GRID_COLUMNS;
            let hue = (base_hue + rng.gen_range(0.0..=config.scene.hue_spread)) % 360.0;

            let mut object =
                DrawableObject::new(name, mesh, material(hsv(hue, config.scene.saturation, 1.0)));
            object.spin = Vec3::new(
                rng.gen_range(-spin_limit..=spin_limit),
                rng.gen_range(-spin_limit..=spin_limit),
                rng.gen_range(-spin_limit..=spin_limit),
            );
            object.translation =
                Vec3::new(-5.0 + 5.0 * column as f32, 0.0, -3.0 + 5.0 * row as f32);
            debug!(
                "{} at {} hue {:.1} spin {}",
                name, object.translation, hue, object.spin
            );
            objects.push(object);
        }

        Ok(Self {
            camera: config.camera(),
            lights: Arc::from(config.lights.clone()),
            objects,
        })
    }

    /// Computes the camera matrices for `time`, then every object's transforms
    /// from them.
    pub fn update(&mut self, time: f32) -> FrameTransforms {
        let frame = self.camera.frame();
        self.objects.par_iter_mut().for_each(|object| {
            object.transforms =
                ObjectTransforms::compute(&frame, object.translation, object.spin, time);
        });
        frame
    }
}

/// `hue` in degrees, `saturation` and `value` in [0, 1]. Alpha is 1.
pub fn hsv(hue: f32, saturation: f32, value: f32) -> Vec4 {
    let hue = hue.rem_euclid(360.0) / 60.0;
    let chroma = value * saturation;
    let x = chroma * (1.0 - (hue % 2.0 - 1.0).abs());
    let (r, g, b) = match hue as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = value - chroma;
    Vec4::new(r + m, g + m, b + m, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.scene.seed = Some(seed);
        config
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv(0.0, 1.0, 1.0), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(hsv(120.0, 1.0, 1.0), Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(hsv(240.0, 1.0, 1.0), Vec4::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(hsv(360.0, 1.0, 1.0), hsv(0.0, 1.0, 1.0));
        assert!(hsv(0.0, 0.0, 0.8).abs_diff_eq(Vec4::new(0.8, 0.8, 0.8, 1.0), 1e-6));
    }

    #[test]
    fn demo_layout() {
        let scene = Scene::demo(&seeded(1)).unwrap();
        assert_eq!(scene.objects.len(), 7);
        assert_eq!(scene.objects[0].name, "plane");
        assert_eq!(scene.objects[0].translation, Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(scene.objects[0].spin, Vec3::ZERO);

        let names: Vec<_> = scene.objects[1..].iter().map(|o| o.name).collect();
        assert_eq!(
            names,
            ["cylinder", "crescent", "truncated cone", "torus", "sphere", "cube"]
        );
        assert_eq!(scene.objects[1].translation, Vec3::new(-5.0, 0.0, -3.0));
        assert_eq!(scene.objects[3].translation, Vec3::new(5.0, 0.0, -3.0));
        assert_eq!(scene.objects[6].translation, Vec3::new(5.0, 0.0, 2.0));

        for object in &scene.objects[1..] {
            assert!(object.spin.abs().max_element() <= 0.4);
            assert_eq!(object.material.base_color.w, 1.0);
            assert!(object.material.texture.is_some());
        }
    }

    #[test]
    fn same_seed_same_scene() {
        let a = Scene::demo(&seeded(99)).unwrap();
        let b = Scene::demo(&seeded(99)).unwrap();
        for (a, b) in a.objects.iter().zip(&b.objects) {
            assert_eq!(a.spin, b.spin);
            assert_eq!(a.material, b.material);
        }
    }

    #[test]
    fn update_uses_the_shared_frame() {
        let mut scene = Scene::demo(&seeded(5)).unwrap();
        let frame = scene.update(2.5);
        for object in &scene.objects {
            assert_eq!(
                object.transforms.world_view_projection,
                frame.view_projection * object.transforms.world
            );
        }
        assert_eq!(
            scene.objects[0].transforms.world,
            Mat4::from_translation(Vec3::new(0.0, -5.0, 0.0))
        );
    }
}
