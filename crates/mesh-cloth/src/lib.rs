//! Mass-spring cloth simulation.
//!
//! A square cloth grid of Verlet-integrated particles connected by
//! rest-length constraints, relaxed Gauss-Seidel style a fixed number of
//! iterations per step. Forces (gravity, per-triangle wind) accumulate
//! between steps; a sphere collider pushes penetrating particles back out.
//!
//! The engine runs its own fixed-timestep loop, independent of the mesh
//! analysis pipeline, and has no failure modes: degenerate configurations
//! (coincident particles, zero-area triangles) are guarded and skipped
//! rather than surfaced as errors.
//!
//! # Example
//!
//! ```
//! use mesh_cloth::{Cloth, DEFAULT_GRAVITY};
//! use nalgebra::Vector3;
//!
//! let mut cloth = Cloth::new(4.0, 8);
//! cloth.pin_top_row();
//!
//! for _ in 0..60 {
//!     cloth.add_gravity(DEFAULT_GRAVITY);
//!     cloth.add_wind(Vector3::new(0.2, 0.0, 0.4));
//!     cloth.step();
//! }
//!
//! let vertices = cloth.vertex_buffer();
//! let indices = cloth.index_buffer();
//! assert_eq!(vertices.len(), 81);
//! assert_eq!(indices.len(), 8 * 8 * 2 * 3);
//! ```

mod cloth;
mod constraint;
mod particle;

pub use cloth::{
    Cloth, ClothVertex, CONSTRAINT_ITERATIONS, DAMPING, DEFAULT_GRAVITY, TIME_STEP2,
};
pub use constraint::Constraint;
pub use particle::Particle;
