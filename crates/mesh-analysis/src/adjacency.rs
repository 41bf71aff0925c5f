//! Vertex adjacency derived from the triangle index list.
//!
//! The shortest-path engine operates on the mesh's 1-skeleton: the graph of
//! vertices connected by triangle edges. This module derives that graph once
//! per topology change. Callers rebuild rather than append; [`VertexAdjacency::build`]
//! always starts from a fresh graph, so rebuilding from the same face list
//! yields identical neighbor sets.

use hashbrown::HashSet;
use tracing::debug;

/// Undirected vertex-adjacency graph of a triangle mesh.
///
/// Invariant: symmetric — if `b` is a neighbor of `a`, `a` is a neighbor of
/// `b`. Neighbor lists contain no duplicates; order is not meaningful.
#[derive(Debug, Clone)]
pub struct VertexAdjacency {
    neighbors: Vec<Vec<u32>>,
    edge_count: usize,
}

impl VertexAdjacency {
    /// Build the adjacency graph from a triangle index list.
    ///
    /// For each triangle `(i, j, k)` the three undirected edges `ij`, `jk`,
    /// `ki` are inserted. A mesh with zero faces yields a graph with empty
    /// neighbor sets.
    pub fn build(vertex_count: usize, faces: &[[u32; 3]]) -> Self {
        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
        let mut edges: HashSet<(u32, u32)> = HashSet::new();

        for &[i, j, k] in faces {
            for (a, b) in [(i, j), (j, k), (k, i)] {
                if a == b {
                    // Degenerate face edge; a self-loop has no length.
                    continue;
                }
                let key = if a < b { (a, b) } else { (b, a) };
                if edges.insert(key) {
                    neighbors[a as usize].push(b);
                    neighbors[b as usize].push(a);
                }
            }
        }

        let edge_count = edges.len();
        debug!(
            target: "mesh_analysis::adjacency",
            vertices = vertex_count,
            faces = faces.len(),
            edges = edge_count,
            "Built vertex adjacency"
        );

        Self {
            neighbors,
            edge_count,
        }
    }

    /// Neighbors of the given vertex. Out-of-range vertices have none.
    #[inline]
    pub fn neighbors(&self, vertex: u32) -> &[u32] {
        self.neighbors
            .get(vertex as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of vertices the graph was built over.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of undirected edges in the graph.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
