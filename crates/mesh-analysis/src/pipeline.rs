//! The interactive analysis pipeline.
//!
//! Owns a mesh together with everything derived from it: the vertex
//! adjacency, the interactive shortest-path solver, the active color field,
//! the render buffers and the visualized geodesic path. A topology or
//! position edit triggers [`AnalysisPipeline::rebuild`], which re-derives
//! the full chain synchronously on the calling thread. Callers rebuild on
//! user-triggered changes, not every frame.
//!
//! The matrix exporter never touches this pipeline's solver; it runs on its
//! own node tables (see [`crate::matrix`]).

use tracing::{debug, info};

use crate::adjacency::VertexAdjacency;
use crate::buffers::{path_positions, RenderBuffers};
use crate::error::AnalysisResult;
use crate::fields::{
    average_geodesic_distance, gaussian_curvature, triangle_quality, AgdParams, ScalarField,
};
use crate::geodesic::{GeodesicSolver, SolveMethod};
use crate::tracing_ext::{log_mesh_stats, OperationTimer};
use crate::types::Mesh;

/// Which derived quantity is mapped to vertex colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Neutral color, no analysis field.
    #[default]
    None,
    /// Average geodesic distance (smooth shading).
    AverageGeodesic,
    /// Gaussian curvature (smooth shading).
    Curvature,
    /// Triangle quality (flat shading, per-face color).
    Quality,
}

/// Configuration surface consumed by the pipeline.
///
/// Plain data, passed in explicitly; display state never lives in
/// process-wide statics.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Shortest-path strategy selector.
    pub method: SolveMethod,
    /// Sampling parameters for the average-geodesic-distance field.
    pub agd: AgdParams,
    /// Active color field.
    pub color_mode: ColorMode,
    /// Start vertex for on-demand path visualization.
    pub path_start: Option<u32>,
    /// End vertex for on-demand path visualization.
    pub path_end: Option<u32>,
}

/// Interactive mesh-analysis pipeline.
pub struct AnalysisPipeline {
    mesh: Mesh,
    config: AnalysisConfig,
    adjacency: VertexAdjacency,
    solver: GeodesicSolver,
    field: Option<ScalarField>,
    buffers: RenderBuffers,
    path: Vec<u32>,
}

impl AnalysisPipeline {
    /// Create a pipeline and run the initial derivation.
    pub fn new(mesh: Mesh, config: AnalysisConfig) -> AnalysisResult<Self> {
        mesh.validate_indices()?;

        let adjacency = VertexAdjacency::build(mesh.vertex_count(), &mesh.faces);
        let solver = GeodesicSolver::new(mesh.vertex_count(), config.method);
        let mut pipeline = Self {
            mesh,
            config,
            adjacency,
            solver,
            field: None,
            buffers: RenderBuffers::default(),
            path: Vec::new(),
        };
        pipeline.rebuild()?;
        Ok(pipeline)
    }

    /// Re-derive everything after a topology or position change.
    pub fn rebuild(&mut self) -> AnalysisResult<()> {
        let _timer = OperationTimer::with_context(
            "pipeline_rebuild",
            self.mesh.face_count(),
            self.mesh.vertex_count(),
        );
        log_mesh_stats(&self.mesh, "rebuild");

        self.adjacency = VertexAdjacency::build(self.mesh.vertex_count(), &self.mesh.faces);
        self.solver.resize(self.mesh.vertex_count());
        self.solver.set_method(self.config.method);
        if self.mesh.normals.len() != self.mesh.positions.len() {
            self.mesh.compute_vertex_normals();
        }

        self.recompute_field()?;
        self.recompute_path()?;
        Ok(())
    }

    /// Switch the active color field and re-derive it.
    pub fn set_color_mode(&mut self, mode: ColorMode) -> AnalysisResult<()> {
        if self.config.color_mode != mode {
            self.config.color_mode = mode;
            self.recompute_field()?;
        }
        Ok(())
    }

    /// Switch the shortest-path strategy. Distances are re-derived so the
    /// active field and path stay consistent with the selector.
    pub fn set_method(&mut self, method: SolveMethod) -> AnalysisResult<()> {
        if self.config.method != method {
            self.config.method = method;
            self.solver.set_method(method);
            self.recompute_field()?;
            self.recompute_path()?;
        }
        Ok(())
    }

    /// Set the endpoints of the visualized geodesic path.
    ///
    /// Out-of-range or equal endpoints clear the path instead of failing;
    /// an interactive picker routinely passes transient invalid state.
    pub fn set_path_endpoints(
        &mut self,
        start: Option<u32>,
        end: Option<u32>,
    ) -> AnalysisResult<()> {
        self.config.path_start = start;
        self.config.path_end = end;
        self.recompute_path()
    }

    /// Replace the mesh and re-derive everything.
    pub fn replace_mesh(&mut self, mesh: Mesh) -> AnalysisResult<()> {
        mesh.validate_indices()?;
        self.mesh = mesh;
        self.rebuild()
    }

    /// Apply an edit to the vertex positions, then re-derive. Topology is
    /// unchanged, but distances, fields and buffers all depend on
    /// positions, so the full chain runs.
    pub fn edit_positions(
        &mut self,
        edit: impl FnOnce(&mut Vec<nalgebra::Point3<f64>>),
    ) -> AnalysisResult<()> {
        edit(&mut self.mesh.positions);
        self.mesh.compute_vertex_normals();
        self.rebuild()
    }

    fn recompute_field(&mut self) -> AnalysisResult<()> {
        self.field = match self.config.color_mode {
            ColorMode::None => None,
            ColorMode::AverageGeodesic => Some(average_geodesic_distance(
                &self.mesh,
                &self.adjacency,
                &mut self.solver,
                &self.config.agd,
            )?),
            ColorMode::Curvature => Some(gaussian_curvature(&self.mesh)),
            ColorMode::Quality => Some(triangle_quality(&self.mesh)),
        };

        // Quality is a per-triangle field; it needs flat-shading duplication.
        self.buffers = match self.config.color_mode {
            ColorMode::Quality => RenderBuffers::flat(&self.mesh, self.field.as_ref()),
            _ => RenderBuffers::smooth(&self.mesh, self.field.as_ref()),
        };

        debug!(
            target: "mesh_analysis::pipeline",
            mode = ?self.config.color_mode,
            buffer_vertices = self.buffers.vertex_count(),
            "Color field updated"
        );
        Ok(())
    }

    fn recompute_path(&mut self) -> AnalysisResult<()> {
        self.path.clear();

        let (start, end) = match (self.config.path_start, self.config.path_end) {
            (Some(s), Some(e)) => (s, e),
            _ => return Ok(()),
        };
        let n = self.mesh.vertex_count() as u32;
        if start >= n || end >= n || start == end {
            // Recovered locally: an invalid selection is a no-op.
            return Ok(());
        }

        self.solver.solve(&self.mesh, &self.adjacency, start)?;
        self.path = self.solver.shortest_path(start, end);

        info!(
            target: "mesh_analysis::pipeline",
            start,
            end,
            length = self.path.len(),
            distance = self.solver.distance(end),
            elapsed_ms = format!("{:.3}", self.solver.last_solve_ms()),
            "Geodesic path updated"
        );
        Ok(())
    }

    /// The analyzed mesh.
    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The current configuration.
    #[inline]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The derived vertex adjacency.
    #[inline]
    pub fn adjacency(&self) -> &VertexAdjacency {
        &self.adjacency
    }

    /// The active normalized color field, if any.
    #[inline]
    pub fn field(&self) -> Option<&ScalarField> {
        self.field.as_ref()
    }

    /// The render buffers for the current mode.
    #[inline]
    pub fn buffers(&self) -> &RenderBuffers {
        &self.buffers
    }

    /// The visualized geodesic path as vertex indices (empty when no valid
    /// path is selected or the target is unreachable).
    #[inline]
    pub fn path(&self) -> &[u32] {
        &self.path
    }

    /// The visualized geodesic path as line-strip positions.
    pub fn path_line(&self) -> Vec<[f32; 3]> {
        path_positions(&self.mesh, &self.path)
    }

    /// Geodesic distance from the last solved source to `vertex`.
    pub fn distance(&self, vertex: u32) -> f64 {
        self.solver.distance(vertex)
    }

    /// Wall-clock time of the most recent shortest-path run, milliseconds.
    pub fn last_solve_ms(&self) -> f64 {
        self.solver.last_solve_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::grid_plane;
    use nalgebra::Point3;

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            agd: AgdParams {
                samples: 4,
                seed: Some(11),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_pipeline_initial_buffers() {
        let pipeline = AnalysisPipeline::new(grid_plane(2.0, 2), config()).unwrap();
        assert_eq!(pipeline.buffers().vertex_count(), 9);
        assert!(pipeline.path().is_empty());
    }

    #[test]
    fn test_color_mode_switches_buffer_shape() {
        let mut pipeline = AnalysisPipeline::new(grid_plane(2.0, 2), config()).unwrap();

        pipeline.set_color_mode(ColorMode::Quality).unwrap();
        // Flat shading: 3 vertices per face.
        assert_eq!(
            pipeline.buffers().vertex_count(),
            pipeline.mesh().face_count() * 3
        );

        pipeline.set_color_mode(ColorMode::Curvature).unwrap();
        assert_eq!(
            pipeline.buffers().vertex_count(),
            pipeline.mesh().vertex_count()
        );
    }

    #[test]
    fn test_path_selection_and_clearing() {
        let mut pipeline = AnalysisPipeline::new(grid_plane(2.0, 2), config()).unwrap();

        pipeline.set_path_endpoints(Some(0), Some(8)).unwrap();
        let path = pipeline.path().to_vec();
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&8));
        assert!(!pipeline.path_line().is_empty());

        // Equal endpoints clear the path without erroring.
        pipeline.set_path_endpoints(Some(3), Some(3)).unwrap();
        assert!(pipeline.path().is_empty());

        // Out-of-range endpoints clear the path without erroring.
        pipeline.set_path_endpoints(Some(0), Some(99)).unwrap();
        assert!(pipeline.path().is_empty());
    }

    #[test]
    fn test_method_switch_keeps_distances() {
        let mut pipeline = AnalysisPipeline::new(grid_plane(2.0, 2), config()).unwrap();
        pipeline.set_path_endpoints(Some(0), Some(8)).unwrap();
        let d_heap = pipeline.distance(8);

        pipeline.set_method(SolveMethod::LinearScan).unwrap();
        let d_linear = pipeline.distance(8);
        assert!((d_heap - d_linear).abs() < 1e-9);
    }

    #[test]
    fn test_edit_positions_rederives() {
        let mut pipeline = AnalysisPipeline::new(grid_plane(2.0, 1), config()).unwrap();
        pipeline.set_path_endpoints(Some(0), Some(3)).unwrap();
        let before = pipeline.distance(3);

        pipeline
            .edit_positions(|positions| {
                positions[3] = Point3::new(0.0, 5.0, 0.0);
            })
            .unwrap();

        let after = pipeline.distance(3);
        assert!(after > before);
    }

    #[test]
    fn test_invalid_mesh_rejected() {
        let mesh = Mesh {
            name: "bad".into(),
            positions: vec![Point3::origin()],
            normals: Vec::new(),
            faces: vec![[0, 1, 2]],
        };
        assert!(AnalysisPipeline::new(mesh, config()).is_err());
    }
}
