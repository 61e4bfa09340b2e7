//! Procedural meshes for the demo scene.
//!
//! Every generator returns an indexed triangle list with positions, unit
//! normals and texture coordinates in `[0, 1]`, centred on the origin.

use std::f32::consts::{PI, TAU};

use rasterizer::math_prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
}

impl MeshVertex {
    fn new(position: Vec3, normal: Vec3, texcoord: Vec2) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        //a-b on one edge, c-d on the opposite one
        self.indices.extend_from_slice(&[a, b, c, b, d, c]);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    #[error("{shape}: {parameter} must be at least 1")]
    ZeroSubdivisions {
        shape: &'static str,
        parameter: &'static str,
    },
}

fn require_subdivisions(
    shape: &'static str,
    parameter: &'static str,
    count: u32,
) -> Result<(), PrimitiveError> {
    if count == 0 {
        Err(PrimitiveError::ZeroSubdivisions { shape, parameter })
    } else {
        Ok(())
    }
}

/// Flat grid on the XZ plane facing +Y.
pub fn plane(
    width: f32,
    depth: f32,
    subdivisions_width: u32,
    subdivisions_depth: u32,
) -> Result<Mesh, PrimitiveError> {
    require_subdivisions("plane", "subdivisions_width", subdivisions_width)?;
    require_subdivisions("plane", "subdivisions_depth", subdivisions_depth)?;

    let mut mesh = Mesh::default();
    for z in 0..=subdivisions_depth {
        for x in 0..=subdivisions_width {
            let u = x as f32 / subdivisions_width as f32;
            let v = z as f32 / subdivisions_depth as f32;
            mesh.vertices.push(MeshVertex::new(
                Vec3::new(width * (u - 0.5), 0.0, depth * (v - 0.5)),
                Vec3::Y,
                Vec2::new(u, v),
            ));
        }
    }

    let row = subdivisions_width + 1;
    for z in 0..subdivisions_depth {
        for x in 0..subdivisions_width {
            let near = z * row + x;
            let far = (z + 1) * row + x;
            mesh.push_quad(near, far, near + 1, far + 1);
        }
    }
    Ok(mesh)
}

/// UV sphere, poles on the Y axis.
pub fn sphere(
    radius: f32,
    subdivisions_axis: u32,
    subdivisions_height: u32,
) -> Result<Mesh, PrimitiveError> {
    require_subdivisions("sphere", "subdivisions_axis", subdivisions_axis)?;
    require_subdivisions("sphere", "subdivisions_height", subdivisions_height)?;

    let mut mesh = Mesh::default();
    for y in 0..=subdivisions_height {
        for x in 0..=subdivisions_axis {
            let u = x as f32 / subdivisions_axis as f32;
            let v = y as f32 / subdivisions_height as f32;
            let theta = TAU * u;
            let phi = PI * v;
            let normal = Vec3::new(theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
            mesh.vertices
                .push(MeshVertex::new(normal * radius, normal, Vec2::new(1.0 - u, v)));
        }
    }

    let ring = subdivisions_axis + 1;
    for y in 0..subdivisions_height {
        for x in 0..subdivisions_axis {
            let top = y * ring + x;
            let bottom = (y + 1) * ring + x;
            mesh.push_quad(top, top + 1, bottom, bottom + 1);
        }
    }
    Ok(mesh)
}

/// Axis aligned cube with a separate set of vertices per face.
pub fn cube(size: f32) -> Mesh {
    // face normal and the two axes spanning the face
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    const CORNERS: [Vec2; 4] = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
    ];

    let half = size / 2.0;
    let mut mesh = Mesh::default();
    for (normal, u_axis, v_axis) in FACES {
        let base = mesh.vertices.len() as u32;
        for corner in CORNERS {
            let offset = u_axis * (corner.x * 2.0 - 1.0) + v_axis * (corner.y * 2.0 - 1.0);
            mesh.vertices
                .push(MeshVertex::new((normal + offset) * half, normal, corner));
        }
        mesh.push_quad(base, base + 1, base + 2, base + 3);
    }
    mesh
}

/// Cone with both ends cut off, closed by flat caps. The axis is Y and the
/// mesh spans `[-height / 2, height / 2]`.
pub fn truncated_cone(
    bottom_radius: f32,
    top_radius: f32,
    height: f32,
    radial_subdivisions: u32,
    vertical_subdivisions: u32,
) -> Result<Mesh, PrimitiveError> {
    require_subdivisions("truncated_cone", "radial_subdivisions", radial_subdivisions)?;
    require_subdivisions(
        "truncated_cone",
        "vertical_subdivisions",
        vertical_subdivisions,
    )?;

    let slant = (bottom_radius - top_radius).atan2(height);
    let (slant_sin, slant_cos) = slant.sin_cos();
    let vertical = vertical_subdivisions as i64;

    // Two extra rings per cap: one on the rim with the cap normal and one
    // collapsed onto the axis.
    let mut mesh = Mesh::default();
    for ring in -2..=vertical + 2 {
        let (ring_radius, y, v, cap_normal) = if ring < 0 {
            let radius = if ring == -2 { 0.0 } else { bottom_radius };
            (radius, 0.0, 1.0, Some(Vec3::NEG_Y))
        } else if ring > vertical {
            let radius = if ring == vertical + 2 { 0.0 } else { top_radius };
            (radius, height, 1.0, Some(Vec3::Y))
        } else {
            let v = ring as f32 / vertical as f32;
            let radius = bottom_radius + (top_radius - bottom_radius) * v;
            (radius, height * v, v, None)
        };
        let v = if ring_radius == 0.0 && cap_normal.is_some() {
            0.0
        } else {
            v
        };

        for step in 0..=radial_subdivisions {
            let u = step as f32 / radial_subdivisions as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            let normal = cap_normal.unwrap_or(Vec3::new(sin * slant_cos, slant_sin, cos * slant_cos));
            mesh.vertices.push(MeshVertex::new(
                Vec3::new(sin * ring_radius, y - height / 2.0, cos * ring_radius),
                normal,
                Vec2::new(u, 1.0 - v),
            ));
        }
    }

    let ring_size = radial_subdivisions + 1;
    let rings = vertical_subdivisions + 4;
    for ring in 0..rings {
        for step in 0..radial_subdivisions {
            let lower = ring * ring_size + step;
            let upper = (ring + 1) * ring_size + step;
            mesh.push_quad(lower, lower + 1, upper, upper + 1);
        }
    }
    Ok(mesh)
}

pub fn cylinder(
    radius: f32,
    height: f32,
    radial_subdivisions: u32,
    vertical_subdivisions: u32,
) -> Result<Mesh, PrimitiveError> {
    truncated_cone(
        radius,
        radius,
        height,
        radial_subdivisions,
        vertical_subdivisions,
    )
}

/// Ring around the Y axis. `radius` goes to the middle of the tube.
pub fn torus(
    radius: f32,
    thickness: f32,
    radial_subdivisions: u32,
    body_subdivisions: u32,
) -> Result<Mesh, PrimitiveError> {
    require_subdivisions("torus", "radial_subdivisions", radial_subdivisions)?;
    require_subdivisions("torus", "body_subdivisions", body_subdivisions)?;

    let mut mesh = Mesh::default();
    for slice in 0..=radial_subdivisions {
        let v = slice as f32 / radial_subdivisions as f32;
        let (slice_sin, slice_cos) = (v * TAU).sin_cos();
        for ring in 0..=body_subdivisions {
            let u = ring as f32 / body_subdivisions as f32;
            let (ring_sin, ring_cos) = (u * TAU).sin_cos();
            let distance = radius + ring_cos * thickness;
            mesh.vertices.push(MeshVertex::new(
                Vec3::new(slice_cos * distance, ring_sin * thickness, slice_sin * distance),
                Vec3::new(slice_cos * ring_cos, ring_sin, slice_sin * ring_cos),
                Vec2::new(u, 1.0 - v),
            ));
        }
    }

    let ring_size = body_subdivisions + 1;
    for slice in 0..radial_subdivisions {
        for ring in 0..body_subdivisions {
            let current = slice * ring_size + ring;
            let next = (slice + 1) * ring_size + ring;
            mesh.push_quad(current, next, current + 1, next + 1);
        }
    }
    Ok(mesh)
}

/// Half moon shaped slab: an outer and an inner arc joined at the tips,
/// extruded `thickness` to each side along X.
pub fn crescent(
    vertical_radius: f32,
    outer_radius: f32,
    inner_radius: f32,
    thickness: f32,
    subdivisions_down: u32,
) -> Result<Mesh, PrimitiveError> {
    require_subdivisions("crescent", "subdivisions_down", subdivisions_down)?;

    struct ArcProfile {
        radius: f32,
        // Curved surface normal, otherwise the flat side normal
        curved: bool,
        texcoord_u: Option<f32>,
    }
    let arcs = [
        ArcProfile {
            radius: outer_radius,
            curved: true,
            texcoord_u: None,
        },
        ArcProfile {
            radius: outer_radius,
            curved: false,
            texcoord_u: Some(0.0),
        },
        ArcProfile {
            radius: inner_radius,
            curved: true,
            texcoord_u: None,
        },
        ArcProfile {
            radius: inner_radius,
            curved: false,
            texcoord_u: Some(1.0),
        },
    ];

    let mut mesh = Mesh::default();
    for side in [0.0f32, 1.0] {
        let x = (side - 0.5) * 2.0;
        for arc in &arcs {
            for step in 0..=subdivisions_down {
                let v = step as f32 / subdivisions_down as f32;
                let (sin, cos) = (v * PI).sin_cos();
                let radius = vertical_radius + (arc.radius - vertical_radius) * sin;
                let normal = if arc.curved {
                    Vec3::new(0.0, sin, cos)
                } else {
                    Vec3::new(x, 0.0, 0.0)
                };
                mesh.vertices.push(MeshVertex::new(
                    Vec3::new(x * thickness, cos * vertical_radius, sin * radius),
                    normal,
                    Vec2::new(arc.texcoord_u.unwrap_or(side), v),
                ));
            }
        }
    }

    // arcs 0..4 are the left side, 4..8 the right side
    let arc_len = subdivisions_down + 1;
    let mut surface = |left: u32, right: u32| {
        for step in 0..subdivisions_down {
            let l = left * arc_len + step;
            let r = right * arc_len + step;
            mesh.push_quad(l, l + 1, r, r + 1);
        }
    };
    // outer
    surface(0, 4);
    // right flat side
    surface(5, 7);
    // inner
    surface(6, 2);
    // left flat side
    surface(3, 1);
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_mesh(mesh: &Mesh) {
        assert_eq!(mesh.indices.len() % 3, 0);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        for vertex in &mesh.vertices {
            assert!(
                (vertex.normal.length() - 1.0).abs() < 1e-5,
                "normal {}",
                vertex.normal
            );
            let uv = vertex.texcoord;
            assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
        }
    }

    #[test]
    fn plane_counts() {
        let mesh = plane(25.0, 25.0, 1, 1).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        check_mesh(&mesh);

        let mesh = plane(2.0, 4.0, 3, 2).unwrap();
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.indices.len(), 3 * 2 * 6);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.position.x.abs() <= 1.0 && v.position.z.abs() <= 2.0 && v.position.y == 0.0));
        check_mesh(&mesh);
    }

    #[test]
    fn sphere_counts() {
        let mesh = sphere(1.5, 24, 24).unwrap();
        assert_eq!(mesh.vertices.len(), 25 * 25);
        assert_eq!(mesh.indices.len(), 24 * 24 * 6);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| (v.position.length() - 1.5).abs() < 1e-5));
        check_mesh(&mesh);
    }

    #[test]
    fn cube_counts() {
        let mesh = cube(2.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.position.abs().max_element() == 1.0));
        // every vertex lies on the face its normal points out of
        assert!(mesh
            .vertices
            .iter()
            .all(|v| (v.position.dot(v.normal) - 1.0).abs() < 1e-6));
        check_mesh(&mesh);
    }

    #[test]
    fn truncated_cone_counts() {
        let mesh = truncated_cone(1.5, 0.5, 1.5, 32, 1).unwrap();
        assert_eq!(mesh.vertices.len(), 33 * (1 + 1 + 4));
        assert_eq!(mesh.indices.len(), 32 * (1 + 4) * 6);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.position.y.abs() <= 0.75 + 1e-6));
        check_mesh(&mesh);
    }

    #[test]
    fn cylinder_side_normals_are_horizontal() {
        let mesh = cylinder(1.0, 2.0, 24, 2).unwrap();
        assert_eq!(mesh.vertices.len(), 25 * (2 + 1 + 4));
        let side = &mesh.vertices[25 * 2..25 * 5];
        assert!(side.iter().all(|v| v.normal.y.abs() < 1e-6));
        assert!(side
            .iter()
            .all(|v| (Vec2::new(v.position.x, v.position.z).length() - 1.0).abs() < 1e-5));
        check_mesh(&mesh);
    }

    #[test]
    fn torus_counts() {
        let mesh = torus(1.0, 0.5, 32, 24).unwrap();
        assert_eq!(mesh.vertices.len(), 33 * 25);
        assert_eq!(mesh.indices.len(), 32 * 24 * 6);
        check_mesh(&mesh);
    }

    #[test]
    fn crescent_counts() {
        let mesh = crescent(1.5, 1.0, 0.15, 0.25, 24).unwrap();
        assert_eq!(mesh.vertices.len(), 25 * 8);
        assert_eq!(mesh.indices.len(), 24 * 4 * 6);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.position.x.abs() == 0.25));
        check_mesh(&mesh);
    }

    #[test]
    fn zero_subdivisions_are_rejected() {
        assert_eq!(
            plane(1.0, 1.0, 0, 1).unwrap_err(),
            PrimitiveError::ZeroSubdivisions {
                shape: "plane",
                parameter: "subdivisions_width"
            }
        );
        assert!(sphere(1.0, 12, 0).is_err());
        assert!(cylinder(1.0, 1.0, 0, 1).is_err());
        assert!(truncated_cone(1.0, 0.5, 1.0, 8, 0).is_err());
        assert!(torus(1.0, 0.5, 0, 8).is_err());
        assert!(crescent(1.0, 1.0, 0.5, 0.1, 0).is_err());
    }
}
