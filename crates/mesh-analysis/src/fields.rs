//! Per-vertex and per-triangle scalar fields derived from mesh geometry.
//!
//! Three calculators feed the color-mapping stage:
//!
//! - average geodesic distance via farthest-point sampling,
//! - Gaussian curvature (angle-deficit style approximation),
//! - triangle shape quality (circumradius over minimum edge).
//!
//! Every field is normalized into `[0, 1]` before it leaves this module.
//! A zero or absent maximum normalizes to all-zero values instead of NaN.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::adjacency::VertexAdjacency;
use crate::error::AnalysisResult;
use crate::geodesic::GeodesicSolver;
use crate::types::Mesh;

/// What the scalar values of a field are attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDomain {
    /// One value per mesh vertex.
    Vertex,
    /// One value per triangle; expanded x3 for flat-shaded buffers.
    Triangle,
}

/// A normalized scalar field over the mesh. Values lie in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct ScalarField {
    pub domain: FieldDomain,
    pub values: Vec<f64>,
}

impl ScalarField {
    /// Normalize raw values by their maximum finite entry.
    ///
    /// Non-finite entries (unreachable vertices) clamp to 1.0; a
    /// non-positive maximum yields all zeros.
    fn normalized(domain: FieldDomain, raw: Vec<f64>) -> Self {
        let max = raw
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        let values = if max > 0.0 {
            raw.iter()
                .map(|&v| if v.is_finite() { (v / max).clamp(0.0, 1.0) } else { 1.0 })
                .collect()
        } else {
            if raw.iter().any(|v| !v.is_finite() || *v != 0.0) {
                warn!(
                    target: "mesh_analysis::fields",
                    "Field maximum is zero; collapsing to the zero color"
                );
            }
            vec![0.0; raw.len()]
        };

        Self { domain, values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parameters for the average-geodesic-distance field.
#[derive(Debug, Clone)]
pub struct AgdParams {
    /// Number of farthest-point samples to average over.
    pub samples: usize,
    /// Seed for the initial random sample. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for AgdParams {
    fn default() -> Self {
        Self {
            samples: 10,
            seed: None,
        }
    }
}

/// Select sample vertices by farthest-point sampling.
///
/// The first sample is random; each subsequent sample is the vertex whose
/// minimum straight-line distance to the current sample set is largest.
/// Selection uses Euclidean distance even though the averaging step uses
/// geodesic distance; this mirrors the observed behavior of the original
/// editor. Stops early when the best remaining candidate coincides with an
/// existing sample (max-min distance of zero).
pub fn farthest_point_samples(mesh: &Mesh, count: usize, seed: Option<u64>) -> Vec<u32> {
    let n = mesh.vertex_count();
    if n == 0 || count == 0 {
        return Vec::new();
    }

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut samples = vec![rng.gen_range(0..n as u32)];
    // Minimum distance from each vertex to the current sample set.
    let mut min_dist = vec![f64::INFINITY; n];

    while samples.len() < count.min(n) {
        let last = *samples.last().unwrap() as usize;
        for v in 0..n {
            let d = (mesh.positions[v] - mesh.positions[last]).norm();
            if d < min_dist[v] {
                min_dist[v] = d;
            }
        }

        let mut best = 0;
        let mut best_dist = -1.0;
        for (v, &d) in min_dist.iter().enumerate() {
            if d > best_dist {
                best_dist = d;
                best = v;
            }
        }

        if best_dist <= 0.0 {
            // No geometrically distinct point remains.
            break;
        }
        samples.push(best as u32);
    }

    samples
}

/// Average geodesic distance field.
///
/// Runs the shortest-path engine from each sample vertex and averages the
/// per-vertex distances. Vertices unreachable from any sample keep an
/// infinite average and clamp to 1.0 after normalization.
pub fn average_geodesic_distance(
    mesh: &Mesh,
    adjacency: &VertexAdjacency,
    solver: &mut GeodesicSolver,
    params: &AgdParams,
) -> AnalysisResult<ScalarField> {
    let n = mesh.vertex_count();
    if n == 0 {
        return Ok(ScalarField {
            domain: FieldDomain::Vertex,
            values: Vec::new(),
        });
    }

    let samples = farthest_point_samples(mesh, params.samples, params.seed);
    debug!(
        target: "mesh_analysis::fields",
        requested = params.samples,
        selected = samples.len(),
        "Farthest-point sampling complete"
    );

    let mut sums = vec![0.0_f64; n];
    for &s in &samples {
        solver.solve(mesh, adjacency, s)?;
        for (v, sum) in sums.iter_mut().enumerate() {
            // Infinity propagates: an unreachable vertex stays infinite.
            *sum += solver.distance(v as u32);
        }
    }

    let k = samples.len().max(1) as f64;
    let averages: Vec<f64> = sums.into_iter().map(|s| s / k).collect();

    Ok(ScalarField::normalized(FieldDomain::Vertex, averages))
}

/// Gaussian curvature field, angle-deficit style.
///
/// Per vertex, sums `2π − cos(corner angle)` over all incident triangles.
/// Degenerate corners (a zero-length incident edge) are skipped. The raw
/// totals are normalized by the mesh-wide maximum.
pub fn gaussian_curvature(mesh: &Mesh) -> ScalarField {
    use std::f64::consts::TAU;

    let mut totals = vec![0.0_f64; mesh.vertex_count()];

    for (face_idx, face) in mesh.faces.iter().enumerate() {
        let tri = match mesh.triangle(face_idx) {
            Some(t) => t,
            None => continue,
        };
        for (corner, &v) in face.iter().enumerate() {
            let lengths = tri.edge_lengths();
            // Edges meeting at this corner.
            let (e1, e2) = match corner {
                0 => (lengths[0], lengths[2]),
                1 => (lengths[0], lengths[1]),
                _ => (lengths[1], lengths[2]),
            };
            if e1 < f64::EPSILON || e2 < f64::EPSILON {
                continue;
            }
            totals[v as usize] += TAU - tri.cos_angle_at(corner);
        }
    }

    ScalarField::normalized(FieldDomain::Vertex, totals)
}

/// Triangle quality field: circumradius over minimum edge, per triangle.
///
/// Normalized by the maximum across the mesh; degenerate triangles score 0.
pub fn triangle_quality(mesh: &Mesh) -> ScalarField {
    let raw: Vec<f64> = mesh.triangles().map(|t| t.quality()).collect();
    ScalarField::normalized(FieldDomain::Triangle, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesic::SolveMethod;
    use nalgebra::Point3;

    fn quad_mesh() -> Mesh {
        Mesh::from_raw(
            "quad",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_farthest_point_sampling_deterministic_with_seed() {
        let mesh = quad_mesh();
        let a = farthest_point_samples(&mesh, 3, Some(7));
        let b = farthest_point_samples(&mesh, 3, Some(7));
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn test_farthest_point_sampling_no_duplicates() {
        let mesh = quad_mesh();
        let samples = farthest_point_samples(&mesh, 4, Some(1));
        let mut unique = samples.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), samples.len());
    }

    #[test]
    fn test_farthest_point_sampling_aborts_on_coincident_points() {
        // All four vertices at the same location: only one distinct point.
        let mesh = Mesh::from_raw(
            "degenerate",
            vec![Point3::origin(); 4],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap();
        let samples = farthest_point_samples(&mesh, 4, Some(1));
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_agd_values_in_unit_range() {
        let mesh = quad_mesh();
        let adj = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
        let field = average_geodesic_distance(
            &mesh,
            &adj,
            &mut solver,
            &AgdParams {
                samples: 4,
                seed: Some(3),
            },
        )
        .unwrap();

        assert_eq!(field.domain, FieldDomain::Vertex);
        assert_eq!(field.len(), 4);
        for &v in &field.values {
            assert!((0.0..=1.0).contains(&v), "AGD value out of range: {}", v);
        }
        // At least one vertex sits at the normalization maximum.
        assert!(field.values.iter().any(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_agd_unreachable_component_clamps_to_one() {
        let mesh = Mesh::from_raw(
            "split",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(11.0, 0.0, 0.0),
                Point3::new(10.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [3, 4, 5]],
        )
        .unwrap();
        let adj = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);

        // One sample: whatever component it lands in, the other component is
        // unreachable and must clamp to 1.0 rather than leak infinity.
        let field = average_geodesic_distance(
            &mesh,
            &adj,
            &mut solver,
            &AgdParams {
                samples: 1,
                seed: Some(0),
            },
        )
        .unwrap();

        for &v in &field.values {
            assert!(v.is_finite());
            assert!((0.0..=1.0).contains(&v));
        }
        assert!(field.values.iter().filter(|&&v| (v - 1.0).abs() < 1e-12).count() >= 3);
    }

    #[test]
    fn test_curvature_values_in_unit_range() {
        let mesh = quad_mesh();
        let field = gaussian_curvature(&mesh);
        assert_eq!(field.domain, FieldDomain::Vertex);
        for &v in &field.values {
            assert!((0.0..=1.0).contains(&v));
        }
        assert!(field.values.iter().any(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_curvature_corner_count_matters() {
        // Vertices 0 and 2 touch two triangles; 1 and 3 touch one. With the
        // per-corner 2π − cos(angle) accumulation, the two-triangle vertices
        // must score strictly higher raw totals, hence normalized 1.0.
        let mesh = quad_mesh();
        let field = gaussian_curvature(&mesh);
        assert!(field.values[0] > field.values[1]);
        assert!(field.values[2] > field.values[3]);
    }

    #[test]
    fn test_quality_per_triangle_domain() {
        let mesh = quad_mesh();
        let field = triangle_quality(&mesh);
        assert_eq!(field.domain, FieldDomain::Triangle);
        assert_eq!(field.len(), mesh.face_count());
        for &v in &field.values {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_quality_degenerate_triangle_scores_zero() {
        let mesh = Mesh::from_raw(
            "sliver",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 3], [0, 1, 2]],
        )
        .unwrap();
        let field = triangle_quality(&mesh);
        assert_eq!(field.values[1], 0.0);
    }

    #[test]
    fn test_normalization_zero_max_yields_zeros() {
        let field = ScalarField::normalized(FieldDomain::Vertex, vec![0.0, 0.0, 0.0]);
        assert!(field.values.iter().all(|&v| v == 0.0));
    }
}
