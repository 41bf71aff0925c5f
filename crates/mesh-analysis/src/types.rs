//! Core mesh data types.

use nalgebra::{Point3, Vector3};

use crate::error::{AnalysisError, AnalysisResult};

/// A triangle mesh with indexed vertices and faces.
///
/// Positions and normals are parallel arrays; faces index into them.
/// Each face is `[v0, v1, v2]` with counter-clockwise winding.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Name used to derive export filenames (e.g. `M_for_<name>.out`).
    pub name: String,

    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,

    /// Per-vertex unit normals. May be empty until
    /// [`Mesh::compute_vertex_normals`] is called.
    pub normals: Vec<Vector3<f64>>,

    /// Triangle faces as indices into the position array.
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positions: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from raw position and index data.
    ///
    /// This is the input contract for mesh-loading collaborators: a flat
    /// position list and a triangle index list. Normals are left empty;
    /// call [`Mesh::compute_vertex_normals`] to derive them.
    pub fn from_raw(
        name: impl Into<String>,
        positions: Vec<Point3<f64>>,
        faces: Vec<[u32; 3]>,
    ) -> AnalysisResult<Self> {
        let mesh = Self {
            name: name.into(),
            positions,
            normals: Vec::new(),
            faces,
        };
        mesh.validate_indices()?;
        Ok(mesh)
    }

    /// Number of vertices in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces (triangles) in the mesh.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if mesh is empty (no vertices or faces).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.faces.is_empty()
    }

    /// Verify that every face index refers to an existing vertex.
    pub fn validate_indices(&self) -> AnalysisResult<()> {
        let n = self.positions.len() as u32;
        for (face_idx, face) in self.faces.iter().enumerate() {
            for &v in face {
                if v >= n {
                    return Err(AnalysisError::face_index_out_of_bounds(
                        face_idx, v, self.positions.len(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh is empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        if self.positions.is_empty() {
            return None;
        }

        let mut min = self.positions[0];
        let mut max = self.positions[0];

        for p in &self.positions[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Iterate over triangles, yielding [`Triangle`] structs with actual
    /// vertex positions.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|&[i0, i1, i2]| Triangle {
            v0: self.positions[i0 as usize],
            v1: self.positions[i1 as usize],
            v2: self.positions[i2 as usize],
        })
    }

    /// Get a specific triangle by face index.
    pub fn triangle(&self, face_idx: usize) -> Option<Triangle> {
        self.faces.get(face_idx).map(|&[i0, i1, i2]| Triangle {
            v0: self.positions[i0 as usize],
            v1: self.positions[i1 as usize],
            v2: self.positions[i2 as usize],
        })
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|tri| tri.area()).sum()
    }

    /// Compute per-vertex normals from face normals (area-weighted average).
    ///
    /// Degenerate faces contribute nothing. Vertices with no non-degenerate
    /// incident face get a zero normal rather than NaN.
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vector3::zeros(); self.positions.len()];

        for &[i0, i1, i2] in &self.faces {
            let t = Triangle::new(
                self.positions[i0 as usize],
                self.positions[i1 as usize],
                self.positions[i2 as usize],
            );
            // Unnormalized cross product weights the sum by face area.
            let n = t.normal_unnormalized();
            if n.norm_squared() > f64::EPSILON {
                accum[i0 as usize] += n;
                accum[i1 as usize] += n;
                accum[i2 as usize] += n;
            }
        }

        self.normals = accum
            .into_iter()
            .map(|n| {
                let len = n.norm();
                if len > f64::EPSILON {
                    n / len
                } else {
                    Vector3::zeros()
                }
            })
            .collect();
    }
}

/// A triangle with concrete vertex positions.
///
/// Stateless utility type for geometric calculations. Winding is
/// counter-clockwise when viewed from the front.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Compute the (unnormalized) face normal via cross product.
    #[inline]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the unit face normal.
    /// Returns None for degenerate triangles (zero area).
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len_sq = n.norm_squared();
        if len_sq > f64::EPSILON {
            Some(n / len_sq.sqrt())
        } else {
            None
        }
    }

    /// Compute the area of the triangle.
    #[inline]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Compute the lengths of the three edges.
    /// Returns `[len01, len12, len20]`.
    #[inline]
    pub fn edge_lengths(&self) -> [f64; 3] {
        [
            (self.v1 - self.v0).norm(),
            (self.v2 - self.v1).norm(),
            (self.v0 - self.v2).norm(),
        ]
    }

    /// Get the length of the shortest edge.
    #[inline]
    pub fn min_edge_length(&self) -> f64 {
        let lengths = self.edge_lengths();
        lengths[0].min(lengths[1]).min(lengths[2])
    }

    /// Compute the circumradius: `(a·b·c) / (4·area)`.
    ///
    /// Returns 0.0 for degenerate triangles instead of Inf/NaN.
    pub fn circumradius(&self) -> f64 {
        let area = self.area();
        if area < f64::EPSILON {
            return 0.0;
        }
        let [a, b, c] = self.edge_lengths();
        (a * b * c) / (4.0 * area)
    }

    /// Triangle shape quality: circumradius over minimum edge length.
    ///
    /// An equilateral triangle scores `1/sqrt(3)`; thin slivers score high.
    /// Degenerate triangles (zero area or a zero-length edge) score 0.0.
    pub fn quality(&self) -> f64 {
        let min_edge = self.min_edge_length();
        if min_edge < f64::EPSILON {
            return 0.0;
        }
        self.circumradius() / min_edge
    }

    /// Interior angle (radians) at the given corner (0, 1, or 2).
    ///
    /// Returns 0.0 when either incident edge is degenerate.
    pub fn angle_at(&self, corner: usize) -> f64 {
        self.cos_angle_at(corner).acos()
    }

    /// Cosine of the interior angle at the given corner (0, 1, or 2).
    ///
    /// Returns 1.0 (zero angle) when either incident edge is degenerate.
    pub fn cos_angle_at(&self, corner: usize) -> f64 {
        let (apex, p, q) = match corner {
            0 => (self.v0, self.v1, self.v2),
            1 => (self.v1, self.v2, self.v0),
            _ => (self.v2, self.v0, self.v1),
        };
        let e1 = p - apex;
        let e2 = q - apex;
        let denom = e1.norm() * e2.norm();
        if denom < f64::EPSILON {
            return 1.0;
        }
        (e1.dot(&e2) / denom).clamp(-1.0, 1.0)
    }

    /// Estimate an orthonormal tangent frame for the triangle.
    ///
    /// The tangent follows the first edge; the bitangent completes a
    /// right-handed frame with the face normal. Returns None for
    /// degenerate triangles.
    pub fn tangent_basis(&self) -> Option<(Vector3<f64>, Vector3<f64>)> {
        let normal = self.normal()?;
        let e1 = self.v1 - self.v0;
        let len = e1.norm();
        if len < f64::EPSILON {
            return None;
        }
        let tangent = e1 / len;
        let bitangent = normal.cross(&tangent);
        Some((tangent, bitangent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn test_triangle_normal() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );

        let normal = tri.normal().expect("non-degenerate triangle");
        assert!(approx_eq(normal.x, 0.0));
        assert!(approx_eq(normal.y, 0.0));
        assert!(approx_eq(normal.z, 1.0));
    }

    #[test]
    fn test_degenerate_triangle_normal() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!(tri.normal().is_none());
        assert!(approx_eq(tri.circumradius(), 0.0));
        assert!(approx_eq(tri.quality(), 0.0));
    }

    #[test]
    fn test_triangle_area() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!(approx_eq(tri.area(), 0.5));
    }

    #[test]
    fn test_circumradius_right_triangle() {
        // Right triangle: circumradius is half the hypotenuse.
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        );
        assert!(approx_eq(tri.circumradius(), 2.5));
    }

    #[test]
    fn test_quality_equilateral() {
        // circumradius / edge = 1/sqrt(3) for an equilateral triangle.
        let sqrt3 = 3.0_f64.sqrt();
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, sqrt3, 0.0),
        );
        let expected = 1.0 / sqrt3;
        assert!(
            (tri.quality() - expected).abs() < 1e-4,
            "equilateral quality should be 1/sqrt(3), got {}",
            tri.quality()
        );
    }

    #[test]
    fn test_angle_at_right_corner() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!((tri.angle_at(0) - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
        assert!((tri.angle_at(1) - std::f64::consts::FRAC_PI_4).abs() < 1e-10);
    }

    #[test]
    fn test_tangent_basis_orthonormal() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        );
        let (t, b) = tri.tangent_basis().expect("non-degenerate");
        let n = tri.normal().unwrap();
        assert!(approx_eq(t.norm(), 1.0));
        assert!(approx_eq(b.norm(), 1.0));
        assert!(approx_eq(t.dot(&b), 0.0));
        assert!(approx_eq(t.dot(&n), 0.0));
    }

    #[test]
    fn test_validate_indices_rejects_out_of_bounds() {
        let mesh = Mesh {
            name: "bad".into(),
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            normals: Vec::new(),
            faces: vec![[0, 1, 3]],
        };
        assert!(mesh.validate_indices().is_err());
    }

    #[test]
    fn test_from_raw_valid() {
        let mesh = Mesh::from_raw(
            "tri",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .expect("valid mesh");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_compute_vertex_normals_flat_plane() {
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

        assert_eq!(mesh.normals.len(), 4);
        for n in &mesh.normals {
            assert!(approx_eq(n.z, 1.0), "plane normal should be +Z, got {:?}", n);
        }
    }

    #[test]
    fn test_empty_mesh_bounds() {
        let mesh = Mesh::new("empty");
        assert!(mesh.bounds().is_none());
        assert!(mesh.is_empty());
    }
}
