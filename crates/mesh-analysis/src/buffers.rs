//! Vertex-buffer assembly for the rendering collaborator.
//!
//! The renderer consumes a fixed interleaved layout: position (3 floats),
//! normal (3 floats), color (3 floats), plus an index buffer. Two shapes of
//! output exist: an indexed buffer for smooth shading, and a flat-shaded
//! buffer where every triangle owns three duplicated vertices so it can
//! carry a uniform face color and normal.

use bytemuck::{Pod, Zeroable};
use nalgebra::Vector3;

use crate::colormap::scalar_to_rgb;
use crate::fields::{FieldDomain, ScalarField};
use crate::types::Mesh;

/// Color used when no analysis field is active.
const NEUTRAL_COLOR: [f32; 3] = [0.7, 0.7, 0.7];

/// Interleaved vertex layout consumed by the renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// A complete vertex + index buffer pair.
#[derive(Debug, Clone, Default)]
pub struct RenderBuffers {
    pub vertices: Vec<RenderVertex>,
    pub indices: Vec<u32>,
}

impl RenderBuffers {
    /// Build an indexed, smooth-shaded buffer with per-vertex colors.
    ///
    /// `field` must be vertex-domain (or `None` for the neutral color);
    /// triangle-domain fields require [`RenderBuffers::flat`].
    pub fn smooth(mesh: &Mesh, field: Option<&ScalarField>) -> Self {
        let vertices = (0..mesh.vertex_count())
            .map(|v| {
                let p = mesh.positions[v];
                let n = mesh.normals.get(v).copied().unwrap_or_else(Vector3::zeros);
                let color = match field {
                    Some(f) if f.domain == FieldDomain::Vertex => {
                        scalar_to_rgb(f.values.get(v).copied().unwrap_or(0.0))
                    }
                    _ => NEUTRAL_COLOR,
                };
                RenderVertex {
                    position: [p.x as f32, p.y as f32, p.z as f32],
                    normal: [n.x as f32, n.y as f32, n.z as f32],
                    color,
                }
            })
            .collect();

        let indices = mesh.faces.iter().flatten().copied().collect();

        Self { vertices, indices }
    }

    /// Build a flat-shaded buffer: three duplicated vertices per triangle,
    /// each carrying the face normal, with a sequential index buffer.
    ///
    /// Triangle-domain fields color each face uniformly (the per-triangle
    /// value repeated three times); vertex-domain fields keep per-corner
    /// colors on the duplicated vertices.
    pub fn flat(mesh: &Mesh, field: Option<&ScalarField>) -> Self {
        let mut vertices = Vec::with_capacity(mesh.face_count() * 3);

        for (face_idx, face) in mesh.faces.iter().enumerate() {
            let tri = match mesh.triangle(face_idx) {
                Some(t) => t,
                None => continue,
            };
            let face_normal = tri.normal().unwrap_or_else(Vector3::zeros);

            for &v in face {
                let p = mesh.positions[v as usize];
                let color = match field {
                    Some(f) => match f.domain {
                        FieldDomain::Triangle => {
                            scalar_to_rgb(f.values.get(face_idx).copied().unwrap_or(0.0))
                        }
                        FieldDomain::Vertex => {
                            scalar_to_rgb(f.values.get(v as usize).copied().unwrap_or(0.0))
                        }
                    },
                    None => NEUTRAL_COLOR,
                };
                vertices.push(RenderVertex {
                    position: [p.x as f32, p.y as f32, p.z as f32],
                    normal: [face_normal.x as f32, face_normal.y as f32, face_normal.z as f32],
                    color,
                });
            }
        }

        let indices = (0..vertices.len() as u32).collect();

        Self { vertices, indices }
    }

    /// Number of vertices in the buffer.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Raw bytes of the vertex buffer, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Positions of a geodesic path, ready for a line vertex buffer.
pub fn path_positions(mesh: &Mesh, path: &[u32]) -> Vec<[f32; 3]> {
    path.iter()
        .filter_map(|&v| mesh.positions.get(v as usize))
        .map(|p| [p.x as f32, p.y as f32, p.z as f32])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::triangle_quality;
    use nalgebra::Point3;

    fn quad_mesh() -> Mesh {
        let mut mesh = Mesh::from_raw(
            "quad",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap();
        mesh.compute_vertex_normals();
        mesh
    }

    #[test]
    fn test_smooth_buffer_shape() {
        let mesh = quad_mesh();
        let buffers = RenderBuffers::smooth(&mesh, None);
        assert_eq!(buffers.vertex_count(), 4);
        assert_eq!(buffers.indices, vec![0, 1, 2, 0, 2, 3]);
        for v in &buffers.vertices {
            assert_eq!(v.color, NEUTRAL_COLOR);
        }
    }

    #[test]
    fn test_flat_buffer_duplicates_vertices() {
        let mesh = quad_mesh();
        let buffers = RenderBuffers::flat(&mesh, None);
        assert_eq!(buffers.vertex_count(), 6);
        assert_eq!(buffers.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_flat_buffer_uniform_face_color() {
        let mesh = quad_mesh();
        let field = triangle_quality(&mesh);
        let buffers = RenderBuffers::flat(&mesh, Some(&field));

        // All three corners of a face share the triangle color.
        for face in 0..2 {
            let base = face * 3;
            assert_eq!(buffers.vertices[base].color, buffers.vertices[base + 1].color);
            assert_eq!(buffers.vertices[base].color, buffers.vertices[base + 2].color);
        }
    }

    #[test]
    fn test_vertex_bytes_layout() {
        let mesh = quad_mesh();
        let buffers = RenderBuffers::smooth(&mesh, None);
        // position + normal + color = 9 floats = 36 bytes per vertex.
        assert_eq!(buffers.vertex_bytes().len(), buffers.vertex_count() * 36);
    }

    #[test]
    fn test_path_positions_skips_invalid_indices() {
        let mesh = quad_mesh();
        let positions = path_positions(&mesh, &[0, 2, 99]);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0], [0.0, 0.0, 0.0]);
    }
}
