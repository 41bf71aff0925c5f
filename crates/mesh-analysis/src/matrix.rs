//! Dense N×N geodesic distance matrix computation and export.
//!
//! One shortest-path run per source vertex yields a full pairwise distance
//! matrix. The computation is O(V·(V+E) log V) with the heap strategy and
//! worse with the linear scan, so the public entry point offloads it to a
//! worker thread; the caller polls or joins an [`ExportHandle`].
//!
//! Every row is solved on a row-private node table, never the interactive
//! one, so a running export cannot corrupt interactive analysis state.
//! Rows are independent and are computed in parallel with rayon.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::adjacency::VertexAdjacency;
use crate::error::{AnalysisError, AnalysisResult};
use crate::geodesic::{GeodesicSolver, SolveMethod};
use crate::progress::ProgressTracker;
use crate::tracing_ext::OperationTimer;
use crate::types::Mesh;

/// Dense matrix of pairwise geodesic distances.
///
/// Mathematically symmetric; the stored floats may differ across the
/// diagonal by rounding, and entries between disconnected components are
/// infinite. Built on demand, written out, then discardable.
#[derive(Debug, Clone)]
pub struct GeodesicMatrix {
    size: usize,
    rows: Vec<Vec<f64>>,
}

impl GeodesicMatrix {
    /// Compute the full matrix, one shortest-path run per vertex.
    pub fn compute(
        mesh: &Mesh,
        adjacency: &VertexAdjacency,
        method: SolveMethod,
    ) -> AnalysisResult<Self> {
        Self::compute_with_progress(mesh, adjacency, method, None)
    }

    /// Compute the full matrix, reporting per-row progress and honoring
    /// cancellation between rows.
    pub fn compute_with_progress(
        mesh: &Mesh,
        adjacency: &VertexAdjacency,
        method: SolveMethod,
        tracker: Option<&ProgressTracker>,
    ) -> AnalysisResult<Self> {
        if mesh.is_empty() {
            return Err(AnalysisError::empty_mesh(mesh.name.clone()));
        }

        let n = mesh.vertex_count();
        let _timer = OperationTimer::with_context("geodesic_matrix", mesh.face_count(), n);

        let rows: Vec<Option<AnalysisResult<Vec<f64>>>> = (0..n as u32)
            .into_par_iter()
            .map_init(
                || GeodesicSolver::new(n, method),
                |solver, source| {
                    if let Some(t) = tracker {
                        if t.is_cancelled() {
                            return None;
                        }
                    }
                    let row = solver
                        .solve(mesh, adjacency, source)
                        .map(|_| solver.distance_row());
                    if let Some(t) = tracker {
                        t.increment();
                    }
                    Some(row)
                },
            )
            .collect();

        let mut out = Vec::with_capacity(n);
        for row in rows {
            match row {
                Some(r) => out.push(r?),
                None => {
                    let done = tracker.map(|t| t.current() as usize).unwrap_or(out.len());
                    warn!(
                        target: "mesh_analysis::matrix",
                        rows_done = done,
                        rows_total = n,
                        "Matrix computation cancelled"
                    );
                    return Err(AnalysisError::ExportCancelled {
                        rows_done: done,
                        rows_total: n,
                    });
                }
            }
        }

        Ok(Self { size: n, rows: out })
    }

    /// Matrix dimension (vertex count).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance between vertices `i` and `j`. Infinite when disconnected
    /// or out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.rows
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Serialize the matrix: one row per line, values separated by single
    /// spaces, no header, no trailing delimiter on the last value or row.
    pub fn write_to(&self, writer: &mut impl Write) -> std::io::Result<()> {
        for (i, row) in self.rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                write!(writer, "{}", value)?;
                if j + 1 < row.len() {
                    write!(writer, " ")?;
                }
            }
            if i + 1 < self.rows.len() {
                writeln!(writer)?;
            }
        }
        Ok(())
    }

    /// Write the matrix to `dir/M_for_<meshName>.out`.
    pub fn export(&self, mesh_name: &str, dir: &Path) -> AnalysisResult<PathBuf> {
        let path = dir.join(export_file_name(mesh_name));
        let file = File::create(&path).map_err(|e| AnalysisError::export_io(&path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| AnalysisError::export_io(&path, e))?;

        info!(
            target: "mesh_analysis::matrix",
            path = path.display().to_string(),
            size = self.size,
            "Exported geodesic distance matrix"
        );
        Ok(path)
    }
}

/// File name used for the matrix export of a given mesh.
pub fn export_file_name(mesh_name: &str) -> String {
    format!("M_for_{}.out", mesh_name)
}

/// Handle to a background matrix export.
///
/// Holding the handle is what prevents a second concurrent export for the
/// same mesh; start a new one only after this one finishes.
pub struct ExportHandle {
    thread: JoinHandle<AnalysisResult<PathBuf>>,
    tracker: Arc<ProgressTracker>,
}

impl ExportHandle {
    /// Fraction of rows completed so far.
    pub fn progress(&self) -> f64 {
        self.tracker.fraction()
    }

    /// Check whether the worker has finished (successfully or not).
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Request cancellation. The worker stops between rows and the export
    /// fails with [`AnalysisError::ExportCancelled`].
    pub fn cancel(&self) {
        self.tracker.cancel();
    }

    /// Block until the worker completes and surface its result, including
    /// any I/O failure that would otherwise be lost.
    pub fn join(self) -> AnalysisResult<PathBuf> {
        match self.thread.join() {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::export_io(
                PathBuf::new(),
                std::io::Error::new(std::io::ErrorKind::Other, "export worker panicked"),
            )),
        }
    }
}

/// Start a background matrix export.
///
/// The worker owns its own copy of the mesh, builds its own adjacency and
/// per-row node tables, and writes `M_for_<name>.out` into `dir`. Write
/// failures surface on [`ExportHandle::join`] instead of being silently
/// discarded.
pub fn export_in_background(mesh: Mesh, method: SolveMethod, dir: PathBuf) -> ExportHandle {
    let tracker = Arc::new(ProgressTracker::new(mesh.vertex_count() as u64));
    let worker_tracker = Arc::clone(&tracker);

    let thread = std::thread::spawn(move || {
        debug!(
            target: "mesh_analysis::matrix",
            mesh = mesh.name.as_str(),
            vertices = mesh.vertex_count(),
            method = method.name(),
            "Background matrix export started"
        );
        let adjacency = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
        let matrix =
            GeodesicMatrix::compute_with_progress(&mesh, &adjacency, method, Some(&worker_tracker))?;
        matrix.export(&mesh.name, &dir)
    });

    ExportHandle { thread, tracker }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn square_mesh() -> Mesh {
        Mesh::from_raw(
            "square",
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
    fn test_matrix_diagonal_is_zero() {
        let mesh = square_mesh();
        let adj = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
        let matrix = GeodesicMatrix::compute(&mesh, &adj, SolveMethod::MinHeap).unwrap();

        for i in 0..matrix.size() {
            assert!((matrix.get(i, i)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_matrix_symmetry() {
        let mesh = square_mesh();
        let adj = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
        let matrix = GeodesicMatrix::compute(&mesh, &adj, SolveMethod::MinHeap).unwrap();

        for i in 0..matrix.size() {
            for j in 0..matrix.size() {
                assert!(
                    (matrix.get(i, j) - matrix.get(j, i)).abs() < 1e-9,
                    "matrix not symmetric at ({}, {})",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        let mesh = Mesh::new("empty");
        let adj = VertexAdjacency::build(0, &[]);
        assert!(GeodesicMatrix::compute(&mesh, &adj, SolveMethod::MinHeap).is_err());
    }

    #[test]
    fn test_write_format_no_trailing_delimiters() {
        let mesh = square_mesh();
        let adj = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
        let matrix = GeodesicMatrix::compute(&mesh, &adj, SolveMethod::MinHeap).unwrap();

        let mut out = Vec::new();
        matrix.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(!text.ends_with('\n'));
        assert_eq!(text.lines().count(), 4);
        for line in text.lines() {
            assert!(!line.ends_with(' '));
            assert_eq!(line.split(' ').count(), 4);
        }
    }

    #[test]
    fn test_written_values_round_trip() {
        let mesh = square_mesh();
        let adj = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
        let matrix = GeodesicMatrix::compute(&mesh, &adj, SolveMethod::MinHeap).unwrap();

        let mut out = Vec::new();
        matrix.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let parsed: Vec<Vec<f64>> = text
            .lines()
            .map(|line| {
                line.split(' ')
                    .map(|v| v.parse::<f64>().unwrap())
                    .collect()
            })
            .collect();
        assert!((parsed[0][2] - 2.0_f64.sqrt()).abs() < 1e-6);
        assert!((parsed[0][1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("bunny"), "M_for_bunny.out");
    }
}
