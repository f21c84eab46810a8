use bevy_ecs::resource::Resource;
use glam::Vec3;

/// CPU-side vertex, interleaved the way the GPU pipeline expects it.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Local-space bounding box; None for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from(v.position));
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = min.min(p);
            max = max.max(p);
        }
        Some((min, max))
    }
}

/// Immutable bank of shared mesh data. Parts reference geometry by
/// handle; the 300 keyboard keys all point at one entry.
#[derive(Resource, Default)]
pub struct GeometryStore {
    meshes: Vec<MeshData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub usize);

impl GeometryStore {
    pub fn add(&mut self, mesh: MeshData) -> GeometryHandle {
        self.meshes.push(mesh);
        GeometryHandle(self.meshes.len() - 1)
    }

    pub fn get(&self, handle: GeometryHandle) -> &MeshData {
        &self.meshes[handle.0]
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

fn quad(mesh: &mut MeshData, corners: [Vec3; 4], normal: Vec3) {
    let base = mesh.vertices.len() as u32;
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    for (corner, uv) in corners.iter().zip(uvs) {
        mesh.vertices.push(Vertex {
            position: (*corner).into(),
            normal: normal.into(),
            uv,
        });
    }
    mesh.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// Axis-aligned box centered at the origin, one quad per face so the
/// normals stay hard.
pub fn cuboid(size_x: f32, size_y: f32, size_z: f32) -> MeshData {
    let (hx, hy, hz) = (size_x / 2.0, size_y / 2.0, size_z / 2.0);
    let mut mesh = MeshData::default();

    // +Z
    quad(
        &mut mesh,
        [
            Vec3::new(-hx, -hy, hz),
            Vec3::new(hx, -hy, hz),
            Vec3::new(hx, hy, hz),
            Vec3::new(-hx, hy, hz),
        ],
        Vec3::Z,
    );
    // -Z
    quad(
        &mut mesh,
        [
            Vec3::new(hx, -hy, -hz),
            Vec3::new(-hx, -hy, -hz),
            Vec3::new(-hx, hy, -hz),
            Vec3::new(hx, hy, -hz),
        ],
        -Vec3::Z,
    );
    // +X
    quad(
        &mut mesh,
        [
            Vec3::new(hx, -hy, hz),
            Vec3::new(hx, -hy, -hz),
            Vec3::new(hx, hy, -hz),
            Vec3::new(hx, hy, hz),
        ],
        Vec3::X,
    );
    // -X
    quad(
        &mut mesh,
        [
            Vec3::new(-hx, -hy, -hz),
            Vec3::new(-hx, -hy, hz),
            Vec3::new(-hx, hy, hz),
            Vec3::new(-hx, hy, -hz),
        ],
        -Vec3::X,
    );
    // +Y
    quad(
        &mut mesh,
        [
            Vec3::new(-hx, hy, hz),
            Vec3::new(hx, hy, hz),
            Vec3::new(hx, hy, -hz),
            Vec3::new(-hx, hy, -hz),
        ],
        Vec3::Y,
    );
    // -Y
    quad(
        &mut mesh,
        [
            Vec3::new(-hx, -hy, -hz),
            Vec3::new(hx, -hy, -hz),
            Vec3::new(hx, -hy, hz),
            Vec3::new(-hx, -hy, hz),
        ],
        -Vec3::Y,
    );

    mesh
}

/// Single quad in the XY plane facing +Z; used for the screen, poster,
/// labels and hot-spot icons.
pub fn plane(size_x: f32, size_y: f32) -> MeshData {
    let (hx, hy) = (size_x / 2.0, size_y / 2.0);
    let mut mesh = MeshData::default();
    quad(
        &mut mesh,
        [
            Vec3::new(-hx, -hy, 0.0),
            Vec3::new(hx, -hy, 0.0),
            Vec3::new(hx, hy, 0.0),
            Vec3::new(-hx, hy, 0.0),
        ],
        Vec3::Z,
    );
    mesh
}

/// Cylinder along the Y axis, capped, with independent top and bottom
/// radii (a cone frustum when they differ, like the speaker drivers).
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let hy = height / 2.0;
    let segments = segments.max(3);

    // Side wall: one ring of quads.
    for i in 0..segments {
        let a0 = (i as f32 / segments as f32) * std::f32::consts::TAU;
        let a1 = ((i + 1) as f32 / segments as f32) * std::f32::consts::TAU;
        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();

        let base = mesh.vertices.len() as u32;
        let ring = [
            (Vec3::new(c0 * radius_bottom, -hy, s0 * radius_bottom), c0, s0, 0.0),
            (Vec3::new(c1 * radius_bottom, -hy, s1 * radius_bottom), c1, s1, 0.0),
            (Vec3::new(c1 * radius_top, hy, s1 * radius_top), c1, s1, 1.0),
            (Vec3::new(c0 * radius_top, hy, s0 * radius_top), c0, s0, 1.0),
        ];
        for (pos, c, s, v) in ring {
            mesh.vertices.push(Vertex {
                position: pos.into(),
                normal: [c, 0.0, s],
                uv: [v, v],
            });
        }
        mesh.indices
            .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    // Caps: triangle fans around the axis.
    for (y, radius, normal) in [(hy, radius_top, Vec3::Y), (-hy, radius_bottom, -Vec3::Y)] {
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(Vertex {
            position: [0.0, y, 0.0],
            normal: normal.into(),
            uv: [0.5, 0.5],
        });
        for i in 0..=segments {
            let a = (i as f32 / segments as f32) * std::f32::consts::TAU;
            let (s, c) = a.sin_cos();
            mesh.vertices.push(Vertex {
                position: [c * radius, y, s * radius],
                normal: normal.into(),
                uv: [c * 0.5 + 0.5, s * 0.5 + 0.5],
            });
        }
        for i in 0..segments {
            let (a, b) = (center + 1 + i, center + 2 + i);
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[center, b, a]);
            } else {
                mesh.indices.extend_from_slice(&[center, a, b]);
            }
        }
    }

    mesh
}

/// Sweeps a circular cross-section along a sampled path. Open-ended;
/// the cable radius is small enough that caps would never be seen.
pub fn tube(path: &[Vec3], radius: f32, radial_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    if path.len() < 2 {
        return mesh;
    }
    let radial_segments = radial_segments.max(3);

    // One orthonormal frame per path sample. The up hint only has to
    // avoid being parallel to the tangent; the cable never runs
    // vertically so Y is safe.
    for (i, center) in path.iter().enumerate() {
        let tangent = if i + 1 < path.len() {
            (path[i + 1] - path[i]).normalize_or_zero()
        } else {
            (path[i] - path[i - 1]).normalize_or_zero()
        };
        let side = tangent.cross(Vec3::Y).normalize_or_zero();
        let side = if side.length_squared() < 1e-6 {
            Vec3::X
        } else {
            side
        };
        let up = side.cross(tangent);

        for j in 0..=radial_segments {
            let a = (j as f32 / radial_segments as f32) * std::f32::consts::TAU;
            let (s, c) = a.sin_cos();
            let normal = side * c + up * s;
            mesh.vertices.push(Vertex {
                position: (*center + normal * radius).into(),
                normal: normal.into(),
                uv: [
                    i as f32 / (path.len() - 1) as f32,
                    j as f32 / radial_segments as f32,
                ],
            });
        }
    }

    let ring = radial_segments + 1;
    for i in 0..(path.len() as u32 - 1) {
        for j in 0..radial_segments {
            let a = i * ring + j;
            let b = a + 1;
            let c = a + ring;
            let d = c + 1;
            mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_has_24_vertices_and_12_triangles() {
        let m = cuboid(1.0, 2.0, 3.0);
        assert_eq!(m.vertices.len(), 24);
        assert_eq!(m.indices.len(), 36);
        let (min, max) = m.bounds().unwrap();
        assert!((min - Vec3::new(-0.5, -1.0, -1.5)).length() < 1e-6);
        assert!((max - Vec3::new(0.5, 1.0, 1.5)).length() < 1e-6);
    }

    #[test]
    fn plane_faces_positive_z() {
        let m = plane(2.0, 1.0);
        assert_eq!(m.vertices.len(), 4);
        assert!(m.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn cylinder_bounds_match_radius_and_height() {
        let m = cylinder(0.5, 0.5, 2.0, 16);
        let (min, max) = m.bounds().unwrap();
        assert!((max.y - 1.0).abs() < 1e-6 && (min.y + 1.0).abs() < 1e-6);
        assert!(max.x <= 0.5 + 1e-6 && min.x >= -0.5 - 1e-6);
    }

    #[test]
    fn tube_index_count_matches_segments() {
        let path = [
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.1, 0.0),
        ];
        let m = tube(&path, 0.1, 8);
        // 2 spans * 8 radial segments * 2 triangles * 3 indices
        assert_eq!(m.indices.len(), 2 * 8 * 2 * 3);
        assert!(m.indices.iter().all(|&i| (i as usize) < m.vertices.len()));
    }

    #[test]
    fn store_hands_out_stable_handles() {
        let mut store = GeometryStore::default();
        let a = store.add(plane(1.0, 1.0));
        let b = store.add(cuboid(1.0, 1.0, 1.0));
        assert_ne!(a, b);
        assert_eq!(store.get(a).vertices.len(), 4);
        assert_eq!(store.len(), 2);
    }
}
