//! Error types for mesh analysis with rich diagnostics.
//!
//! Most degenerate conditions in the analysis pipeline are recovered inline
//! by clamping or skipping (zero-area triangles, unreachable vertices,
//! invalid path endpoints). Only conditions the caller must act on surface
//! here: malformed input topology and export I/O failures.
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `GEO-XXXX`:
//! - `GEO-1xxx`: Input validation errors
//! - `GEO-2xxx`: Export errors

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Machine-readable error codes for analysis operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisErrorCode {
    /// GEO-1001: Vertex index out of range
    InvalidVertexIndex = 1001,
    /// GEO-1002: Mesh has no vertices or faces
    EmptyMesh = 1002,
    /// GEO-1003: Face references a vertex that does not exist
    FaceIndexOutOfBounds = 1003,

    /// GEO-2001: Matrix export failed to write its output file
    ExportIo = 2001,
    /// GEO-2002: Matrix export was cancelled before completion
    ExportCancelled = 2002,
}

impl AnalysisErrorCode {
    /// Returns the error code as a string in the format `GEO-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisErrorCode::InvalidVertexIndex => "GEO-1001",
            AnalysisErrorCode::EmptyMesh => "GEO-1002",
            AnalysisErrorCode::FaceIndexOutOfBounds => "GEO-1003",
            AnalysisErrorCode::ExportIo => "GEO-2001",
            AnalysisErrorCode::ExportCancelled => "GEO-2002",
        }
    }
}

impl std::fmt::Display for AnalysisErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during mesh analysis.
#[derive(Debug, Error, Diagnostic)]
pub enum AnalysisError {
    /// A vertex index is outside `[0, vertex_count)`.
    #[error("vertex index {index} is out of range (mesh has {vertex_count} vertices)")]
    #[diagnostic(
        code(mesh_analysis::input::invalid_vertex_index),
        help("Valid vertex indices are 0..{}", vertex_count.saturating_sub(1))
    )]
    InvalidVertexIndex { index: u32, vertex_count: usize },

    /// The mesh has no vertices or faces.
    #[error("mesh '{name}' is empty")]
    #[diagnostic(
        code(mesh_analysis::input::empty_mesh),
        help("The mesh must have at least one vertex and one face before analysis.")
    )]
    EmptyMesh { name: String },

    /// A face references a vertex index beyond the position array.
    #[error(
        "face {face_index} references vertex {vertex_index}, but the mesh has only {vertex_count} vertices"
    )]
    #[diagnostic(
        code(mesh_analysis::input::face_index_out_of_bounds),
        help("Every index in the triangle list must be < vertex count. Check the mesh source.")
    )]
    FaceIndexOutOfBounds {
        face_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    },

    /// The matrix export could not write its output file.
    #[error("failed to write geodesic distance matrix to {path:?}")]
    #[diagnostic(
        code(mesh_analysis::export::io),
        help("Check that the output directory exists and is writable.")
    )]
    ExportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The matrix export was cancelled before completion.
    #[error("geodesic distance matrix export was cancelled after {rows_done} of {rows_total} rows")]
    #[diagnostic(code(mesh_analysis::export::cancelled))]
    ExportCancelled { rows_done: usize, rows_total: usize },
}

impl AnalysisError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> AnalysisErrorCode {
        match self {
            AnalysisError::InvalidVertexIndex { .. } => AnalysisErrorCode::InvalidVertexIndex,
            AnalysisError::EmptyMesh { .. } => AnalysisErrorCode::EmptyMesh,
            AnalysisError::FaceIndexOutOfBounds { .. } => AnalysisErrorCode::FaceIndexOutOfBounds,
            AnalysisError::ExportIo { .. } => AnalysisErrorCode::ExportIo,
            AnalysisError::ExportCancelled { .. } => AnalysisErrorCode::ExportCancelled,
        }
    }

    // Constructor helpers

    /// Create an invalid vertex index error.
    pub fn invalid_vertex_index(index: u32, vertex_count: usize) -> Self {
        AnalysisError::InvalidVertexIndex {
            index,
            vertex_count,
        }
    }

    /// Create an empty mesh error.
    pub fn empty_mesh(name: impl Into<String>) -> Self {
        AnalysisError::EmptyMesh { name: name.into() }
    }

    /// Create a face index out of bounds error.
    pub fn face_index_out_of_bounds(
        face_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    ) -> Self {
        AnalysisError::FaceIndexOutOfBounds {
            face_index,
            vertex_index,
            vertex_count,
        }
    }

    /// Create an export I/O error.
    pub fn export_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::ExportIo {
            path: path.into(),
            source,
        }
    }
}
