//! Procedural test shapes.
//!
//! The analysis engine consumes meshes through the raw position/index
//! contract; importing model files is out of scope. These constructors give
//! the CLI and the test suites real geometry to analyze without an importer.

use std::f64::consts::{PI, TAU};

use nalgebra::Point3;

use crate::types::Mesh;

/// A square grid plane on the XY plane, centered on the origin.
///
/// `size` is the edge length; `divisor` is the number of cells per side,
/// giving `(divisor+1)²` vertices and `2·divisor²` triangles.
pub fn grid_plane(size: f64, divisor: u32) -> Mesh {
    let divisor = divisor.max(1);
    let step = size / divisor as f64;
    let half = size / 2.0;

    let mut positions = Vec::with_capacity(((divisor + 1) * (divisor + 1)) as usize);
    for i in 0..=divisor {
        let y = -half + step * i as f64;
        for j in 0..=divisor {
            let x = -half + step * j as f64;
            positions.push(Point3::new(x, y, 0.0));
        }
    }

    let stride = divisor + 1;
    let mut faces = Vec::with_capacity((divisor * divisor * 2) as usize);
    for i in 0..divisor {
        for j in 0..divisor {
            faces.push([i * stride + j, i * stride + j + 1, (i + 1) * stride + j + 1]);
            faces.push([i * stride + j, (i + 1) * stride + j + 1, (i + 1) * stride + j]);
        }
    }

    let mut mesh = Mesh {
        name: "plane".into(),
        positions,
        normals: Vec::new(),
        faces,
    };
    mesh.compute_vertex_normals();
    mesh
}

/// A UV sphere centered on the origin.
///
/// `sectors` is the longitudinal resolution, `stacks` the latitudinal one.
/// Pole caps use triangle fans; the body uses two triangles per quad.
pub fn uv_sphere(radius: f64, sectors: u32, stacks: u32) -> Mesh {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);

    let mut positions = Vec::new();
    for i in 0..=stacks {
        let phi = PI * i as f64 / stacks as f64;
        for j in 0..sectors {
            let theta = TAU * j as f64 / sectors as f64;
            positions.push(Point3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }

    let mut faces = Vec::new();
    for i in 0..stacks {
        for j in 0..sectors {
            let next_j = (j + 1) % sectors;
            let a = i * sectors + j;
            let b = i * sectors + next_j;
            let c = (i + 1) * sectors + j;
            let d = (i + 1) * sectors + next_j;

            if i > 0 {
                faces.push([a, c, b]);
            }
            if i + 1 < stacks {
                faces.push([b, c, d]);
            }
        }
    }

    let mut mesh = Mesh {
        name: "sphere".into(),
        positions,
        normals: Vec::new(),
        faces,
    };
    mesh.compute_vertex_normals();
    mesh
}

/// A unit cube from (0,0,0) to (1,1,1), CCW winding viewed from outside.
pub fn unit_cube() -> Mesh {
    let positions = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];

    let faces = vec![
        // Bottom (z=0)
        [0, 2, 1],
        [0, 3, 2],
        // Top (z=1)
        [4, 5, 6],
        [4, 6, 7],
        // Front (y=0)
        [0, 1, 5],
        [0, 5, 4],
        // Back (y=1)
        [3, 7, 6],
        [3, 6, 2],
        // Left (x=0)
        [0, 4, 7],
        [0, 7, 3],
        // Right (x=1)
        [1, 2, 6],
        [1, 6, 5],
    ];

    let mut mesh = Mesh {
        name: "cube".into(),
        positions,
        normals: Vec::new(),
        faces,
    };
    mesh.compute_vertex_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_plane_counts() {
        let mesh = grid_plane(2.0, 4);
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.face_count(), 32);
        assert!(mesh.validate_indices().is_ok());
    }

    #[test]
    fn test_grid_plane_single_cell() {
        let mesh = grid_plane(2.0, 1);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let mesh = uv_sphere(2.0, 12, 8);
        assert!(mesh.validate_indices().is_ok());
        for p in &mesh.positions {
            let r = p.coords.norm();
            assert!((r - 2.0).abs() < 1e-9, "vertex off sphere surface: {}", r);
        }
    }

    #[test]
    fn test_sphere_is_connected() {
        use crate::adjacency::VertexAdjacency;
        use crate::geodesic::{GeodesicSolver, SolveMethod};

        let mesh = uv_sphere(1.0, 8, 6);
        let adj = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
        solver.solve(&mesh, &adj, 0).unwrap();

        // Duplicated pole-ring vertices that no face references stay
        // unreachable; every referenced vertex must be reached.
        let mut referenced = vec![false; mesh.vertex_count()];
        for face in &mesh.faces {
            for &v in face {
                referenced[v as usize] = true;
            }
        }
        for v in 0..mesh.vertex_count() as u32 {
            if referenced[v as usize] {
                assert!(
                    solver.distance(v).is_finite(),
                    "referenced vertex {} unreachable",
                    v
                );
            }
        }
    }

    #[test]
    fn test_unit_cube_watertight_counts() {
        let mesh = unit_cube();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        assert!((mesh.surface_area() - 6.0).abs() < 1e-10);
    }
}
