//! Mesh analysis engine for interactive geometry-processing editors.
//!
//! This crate computes per-vertex and per-triangle differential-geometry
//! quantities over triangle meshes and turns them into color fields and
//! render buffers for a display layer:
//!
//! - **Geodesic distances**: single-source shortest paths over the mesh
//!   1-skeleton with Euclidean edge weights, via a binary min-heap or a
//!   linear-scan strategy with identical semantics.
//! - **Derived fields**: average geodesic distance (farthest-point
//!   sampling), Gaussian curvature (angle-deficit approximation), and
//!   triangle quality (circumradius over minimum edge), all normalized to
//!   `[0, 1]` and mapped through a fixed HSV hue gradient.
//! - **N×N distance matrix export**: one shortest-path run per vertex,
//!   serialized to a plain-text matrix file on a background worker.
//!
//! The windowing, UI and GPU layers are external collaborators. They talk
//! to this crate through two narrow interfaces: a raw mesh blueprint
//! (positions plus a triangle index list) in, and interleaved
//! position/normal/color vertex buffers out.
//!
//! # Quick Start
//!
//! ```
//! use mesh_analysis::{AnalysisConfig, AnalysisPipeline, ColorMode, shapes};
//!
//! let mesh = shapes::uv_sphere(1.0, 16, 12);
//! let mut pipeline = AnalysisPipeline::new(mesh, AnalysisConfig::default()).unwrap();
//!
//! // Color the mesh by Gaussian curvature.
//! pipeline.set_color_mode(ColorMode::Curvature).unwrap();
//! let buffers = pipeline.buffers();
//! assert_eq!(buffers.vertex_count(), pipeline.mesh().vertex_count());
//!
//! // Visualize a geodesic path between two vertices.
//! pipeline.set_path_endpoints(Some(0), Some(42)).unwrap();
//! let line = pipeline.path_line();
//! ```
//!
//! # Background export
//!
//! ```no_run
//! use mesh_analysis::{matrix, shapes, SolveMethod};
//!
//! let mesh = shapes::grid_plane(2.0, 16);
//! let handle = matrix::export_in_background(mesh, SolveMethod::MinHeap, ".".into());
//! // ... keep interacting; the export owns its own solver state ...
//! let path = handle.join().unwrap();
//! println!("matrix written to {:?}", path);
//! ```
//!
//! # Logging
//!
//! Operations emit `tracing` events; initialize a subscriber and set
//! `RUST_LOG=mesh_analysis=debug` for details or
//! `RUST_LOG=mesh_analysis::timing=debug` for timings.

mod error;
mod types;

pub mod adjacency;
pub mod buffers;
pub mod colormap;
pub mod fields;
pub mod geodesic;
pub mod matrix;
pub mod pipeline;
pub mod progress;
pub mod shapes;
pub mod tracing_ext;

// Re-export core types at crate root
pub use error::{AnalysisError, AnalysisErrorCode, AnalysisResult};
pub use types::{Mesh, Triangle};

pub use adjacency::VertexAdjacency;
pub use buffers::{path_positions, RenderBuffers, RenderVertex};
pub use colormap::{hsv_to_rgb, scalar_to_rgb};
pub use fields::{
    average_geodesic_distance, farthest_point_samples, gaussian_curvature, triangle_quality,
    AgdParams, FieldDomain, ScalarField,
};
pub use geodesic::{GeodesicSolver, SolveMethod, VertexNode};
pub use matrix::{export_file_name, export_in_background, ExportHandle, GeodesicMatrix};
pub use pipeline::{AnalysisConfig, AnalysisPipeline, ColorMode};
pub use progress::ProgressTracker;
pub use tracing_ext::OperationTimer;
