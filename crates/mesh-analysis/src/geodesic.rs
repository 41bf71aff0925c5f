//! Single-source shortest paths over the mesh 1-skeleton.
//!
//! Edge weights are Euclidean 3D distances between vertex positions, so all
//! weights are non-negative and plain Dijkstra applies. Two interchangeable
//! strategies share one observable contract:
//!
//! - [`SolveMethod::MinHeap`]: binary min-heap ordered by the current
//!   distance estimate, with lazy re-push on improvement. Stale heap entries
//!   are skipped via the `visited` flag. O((V+E) log V).
//! - [`SolveMethod::LinearScan`]: a candidate list scanned in full for the
//!   minimum-estimate unvisited vertex each round. O(V²). Kept for
//!   performance comparison, not production speed.
//!
//! Vertices unreachable from the source retain an infinite distance and no
//! predecessor. Ties between equal estimates resolve in an unspecified
//! order; only the reported distances are deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::adjacency::VertexAdjacency;
use crate::error::{AnalysisError, AnalysisResult};
use crate::types::Mesh;

/// Strategy used to select the next vertex to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolveMethod {
    /// Binary min-heap priority queue.
    #[default]
    MinHeap,
    /// Full linear scan of the candidate list.
    LinearScan,
}

impl SolveMethod {
    /// Human-readable strategy name for display surfaces.
    pub fn name(&self) -> &'static str {
        match self {
            SolveMethod::MinHeap => "min-heap",
            SolveMethod::LinearScan => "linear-scan",
        }
    }
}

/// Per-vertex working state for a single-source run.
#[derive(Debug, Clone, Copy)]
pub struct VertexNode {
    /// Predecessor on the current shortest path, if any.
    pub prev: Option<u32>,
    /// Current shortest-path estimate from the source.
    pub distance: f64,
    /// Settled: the estimate is final and the vertex is never reprocessed.
    pub visited: bool,
    /// Enqueued at least once this run.
    pub seen: bool,
}

impl VertexNode {
    fn initial() -> Self {
        Self {
            prev: None,
            distance: f64::INFINITY,
            visited: false,
            seen: false,
        }
    }
}

/// Heap entry ordered by distance estimate (min-heap via reversed compare).
#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    distance: f64,
    vertex: u32,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.vertex == other.vertex
    }
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the smallest estimate first.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source shortest-path solver owning its private node table.
///
/// The interactive pipeline and the matrix exporter each hold their own
/// solver; the tables are never shared, so a background export cannot
/// corrupt interactive state. Each [`GeodesicSolver::solve`] call resets
/// the table before running, so results from one source never leak into
/// the next run.
#[derive(Debug, Clone)]
pub struct GeodesicSolver {
    nodes: Vec<VertexNode>,
    method: SolveMethod,
    last_solve_ms: f64,
}

impl GeodesicSolver {
    /// Create a solver for a mesh with `vertex_count` vertices.
    pub fn new(vertex_count: usize, method: SolveMethod) -> Self {
        Self {
            nodes: vec![VertexNode::initial(); vertex_count],
            method,
            last_solve_ms: 0.0,
        }
    }

    /// Change the selection strategy for subsequent runs.
    pub fn set_method(&mut self, method: SolveMethod) {
        self.method = method;
    }

    /// The currently selected strategy.
    #[inline]
    pub fn method(&self) -> SolveMethod {
        self.method
    }

    /// Resize the node table after a topology change.
    pub fn resize(&mut self, vertex_count: usize) {
        self.nodes.clear();
        self.nodes.resize(vertex_count, VertexNode::initial());
    }

    /// Reset every node to its initial state.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            *node = VertexNode::initial();
        }
    }

    /// Wall-clock duration of the most recent [`GeodesicSolver::solve`], in
    /// milliseconds.
    #[inline]
    pub fn last_solve_ms(&self) -> f64 {
        self.last_solve_ms
    }

    /// Shortest-path distance from the last run's source to `vertex`.
    ///
    /// Infinite for unreachable vertices, and for all vertices before the
    /// first run.
    #[inline]
    pub fn distance(&self, vertex: u32) -> f64 {
        self.nodes
            .get(vertex as usize)
            .map(|n| n.distance)
            .unwrap_or(f64::INFINITY)
    }

    /// Predecessor of `vertex` on the shortest path from the last source.
    #[inline]
    pub fn predecessor(&self, vertex: u32) -> Option<u32> {
        self.nodes.get(vertex as usize).and_then(|n| n.prev)
    }

    /// The full node table from the last run.
    #[inline]
    pub fn nodes(&self) -> &[VertexNode] {
        &self.nodes
    }

    /// Copy the distance row from the last run.
    pub fn distance_row(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.distance).collect()
    }

    /// Run a single-source shortest-path computation from `source`.
    ///
    /// Resets the node table, then runs the selected strategy. After the
    /// call, [`GeodesicSolver::distance`] and [`GeodesicSolver::predecessor`]
    /// describe the shortest-path tree rooted at `source`.
    pub fn solve(
        &mut self,
        mesh: &Mesh,
        adjacency: &VertexAdjacency,
        source: u32,
    ) -> AnalysisResult<()> {
        if (source as usize) >= mesh.vertex_count() {
            return Err(AnalysisError::invalid_vertex_index(
                source,
                mesh.vertex_count(),
            ));
        }
        if self.nodes.len() != mesh.vertex_count() {
            self.resize(mesh.vertex_count());
        }

        let start = std::time::Instant::now();
        self.reset();

        match self.method {
            SolveMethod::MinHeap => self.solve_min_heap(mesh, adjacency, source),
            SolveMethod::LinearScan => self.solve_linear_scan(mesh, adjacency, source),
        }

        self.last_solve_ms = start.elapsed().as_secs_f64() * 1000.0;
        trace!(
            target: "mesh_analysis::geodesic",
            source,
            method = self.method.name(),
            elapsed_ms = format!("{:.3}", self.last_solve_ms),
            "Single-source run complete"
        );
        Ok(())
    }

    fn solve_min_heap(&mut self, mesh: &Mesh, adjacency: &VertexAdjacency, source: u32) {
        let mut heap = BinaryHeap::new();

        self.nodes[source as usize].distance = 0.0;
        self.nodes[source as usize].seen = true;
        heap.push(HeapEntry {
            distance: 0.0,
            vertex: source,
        });

        while let Some(HeapEntry { vertex, .. }) = heap.pop() {
            let current = vertex as usize;
            if self.nodes[current].visited {
                // Stale entry from a superseded estimate.
                continue;
            }
            self.nodes[current].visited = true;
            let current_distance = self.nodes[current].distance;

            for &n in adjacency.neighbors(vertex) {
                let neighbor = n as usize;
                if self.nodes[neighbor].visited {
                    continue;
                }

                let edge = (mesh.positions[current] - mesh.positions[neighbor]).norm();
                let candidate = current_distance + edge;

                if candidate < self.nodes[neighbor].distance {
                    self.nodes[neighbor].distance = candidate;
                    self.nodes[neighbor].prev = Some(vertex);
                    self.nodes[neighbor].seen = true;
                    heap.push(HeapEntry {
                        distance: candidate,
                        vertex: n,
                    });
                }
            }
        }
    }

    fn solve_linear_scan(&mut self, mesh: &Mesh, adjacency: &VertexAdjacency, source: u32) {
        let mut candidates: Vec<u32> = Vec::new();

        self.nodes[source as usize].distance = 0.0;
        self.nodes[source as usize].seen = true;
        candidates.push(source);

        while !candidates.is_empty() {
            // Full scan for the minimum-estimate candidate.
            let mut best = 0;
            for (i, &v) in candidates.iter().enumerate() {
                if self.nodes[v as usize].distance
                    < self.nodes[candidates[best] as usize].distance
                {
                    best = i;
                }
            }
            let vertex = candidates.swap_remove(best);
            let current = vertex as usize;

            self.nodes[current].visited = true;
            let current_distance = self.nodes[current].distance;

            for &n in adjacency.neighbors(vertex) {
                let neighbor = n as usize;
                if self.nodes[neighbor].visited {
                    continue;
                }

                let edge = (mesh.positions[current] - mesh.positions[neighbor]).norm();
                let candidate = current_distance + edge;

                if candidate < self.nodes[neighbor].distance {
                    self.nodes[neighbor].distance = candidate;
                    self.nodes[neighbor].prev = Some(vertex);
                }

                if !self.nodes[neighbor].seen {
                    self.nodes[neighbor].seen = true;
                    candidates.push(n);
                }
            }
        }
    }

    /// Reconstruct the vertex index chain from `source` to `target` using
    /// the predecessor links of the most recent run.
    ///
    /// Returns an empty path when `target` equals `source`, either index is
    /// out of range, or the predecessor chain breaks before reaching the
    /// source (unreachable target). The returned chain starts at `source`
    /// and ends at `target`.
    pub fn shortest_path(&self, source: u32, target: u32) -> Vec<u32> {
        let n = self.nodes.len() as u32;
        if source >= n || target >= n || source == target {
            return Vec::new();
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(prev) = self.nodes[current as usize].prev {
            path.push(prev);
            current = prev;
        }

        if current != source {
            // Chain broke before the source: target is unreachable.
            return Vec::new();
        }

        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    /// Unit square: 4 vertices, 2 triangles sharing the 0-2 diagonal.
    fn unit_square() -> (Mesh, VertexAdjacency) {
        let mesh = Mesh::from_raw(
            "square",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap();
        let adj = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
        (mesh, adj)
    }

    /// Two disconnected triangles: 6 vertices, no shared indices.
    fn disconnected_triangles() -> (Mesh, VertexAdjacency) {
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
        (mesh, adj)
    }

    #[test]
    fn test_unit_square_distances_min_heap() {
        let (mesh, adj) = unit_square();
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
        solver.solve(&mesh, &adj, 0).unwrap();

        assert!((solver.distance(0) - 0.0).abs() < 1e-5);
        assert!((solver.distance(1) - 1.0).abs() < 1e-5);
        assert!((solver.distance(2) - 2.0f64.sqrt()).abs() < 1e-5);
        assert!((solver.distance(3) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_unit_square_distances_linear_scan() {
        let (mesh, adj) = unit_square();
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::LinearScan);
        solver.solve(&mesh, &adj, 0).unwrap();

        assert!((solver.distance(0) - 0.0).abs() < 1e-5);
        assert!((solver.distance(1) - 1.0).abs() < 1e-5);
        assert!((solver.distance(2) - 2.0f64.sqrt()).abs() < 1e-5);
        assert!((solver.distance(3) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_unit_square_predecessor_of_diagonal() {
        // Both triangles share the 0-2 diagonal, so vertex 2 is reached
        // directly (length sqrt(2)), strictly shorter than the rim route
        // of length 2.
        let (mesh, adj) = unit_square();
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
        solver.solve(&mesh, &adj, 0).unwrap();
        assert_eq!(solver.predecessor(2), Some(0));
    }

    #[test]
    fn test_strategies_agree() {
        let (mesh, adj) = unit_square();
        let mut heap = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
        let mut linear = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::LinearScan);

        for source in 0..mesh.vertex_count() as u32 {
            heap.solve(&mesh, &adj, source).unwrap();
            linear.solve(&mesh, &adj, source).unwrap();
            for v in 0..mesh.vertex_count() as u32 {
                assert!(
                    (heap.distance(v) - linear.distance(v)).abs() < 1e-9,
                    "strategies disagree at source {} vertex {}",
                    source,
                    v
                );
            }
        }
    }

    #[test]
    fn test_unreachable_component_stays_infinite() {
        let (mesh, adj) = disconnected_triangles();
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
        solver.solve(&mesh, &adj, 0).unwrap();

        for v in 3..6 {
            assert!(solver.distance(v).is_infinite());
            assert_eq!(solver.predecessor(v), None);
        }
    }

    #[test]
    fn test_path_to_unreachable_is_empty() {
        let (mesh, adj) = disconnected_triangles();
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
        solver.solve(&mesh, &adj, 0).unwrap();
        assert!(solver.shortest_path(0, 4).is_empty());
    }

    #[test]
    fn test_path_endpoints_and_order() {
        let (mesh, adj) = unit_square();
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
        solver.solve(&mesh, &adj, 0).unwrap();

        let path = solver.shortest_path(0, 2);
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&2));
    }

    #[test]
    fn test_path_same_endpoints_is_empty() {
        let (mesh, adj) = unit_square();
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
        solver.solve(&mesh, &adj, 0).unwrap();
        assert!(solver.shortest_path(0, 0).is_empty());
    }

    #[test]
    fn test_solve_rejects_out_of_range_source() {
        let (mesh, adj) = unit_square();
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
        assert!(solver.solve(&mesh, &adj, 99).is_err());
    }

    #[test]
    fn test_rerun_resets_previous_state() {
        let (mesh, adj) = unit_square();
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);

        solver.solve(&mesh, &adj, 0).unwrap();
        let from_zero = solver.distance(2);

        solver.solve(&mesh, &adj, 2).unwrap();
        assert!((solver.distance(2) - 0.0).abs() < 1e-12);
        assert!((solver.distance(0) - from_zero).abs() < 1e-9);
    }

    #[test]
    fn test_triangle_inequality_on_square() {
        let (mesh, adj) = unit_square();
        let n = mesh.vertex_count() as u32;
        let mut rows = Vec::new();
        let mut solver = GeodesicSolver::new(mesh.vertex_count(), SolveMethod::MinHeap);
        for s in 0..n {
            solver.solve(&mesh, &adj, s).unwrap();
            rows.push(solver.distance_row());
        }

        for a in 0..n as usize {
            for b in 0..n as usize {
                for c in 0..n as usize {
                    assert!(
                        rows[a][c] <= rows[a][b] + rows[b][c] + 1e-9,
                        "triangle inequality violated for ({}, {}, {})",
                        a,
                        b,
                        c
                    );
                }
            }
        }
    }
}
