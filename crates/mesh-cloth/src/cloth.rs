//! The cloth grid and its fixed-timestep simulation loop.
//!
//! Structure mirrors the mesh-analysis pattern of deriving a constraint
//! structure once, then iteratively propagating over it: the grid and its
//! rest-length constraints are built at construction; every step
//! integrates forces, relaxes the constraints a fixed number of times, and
//! recomputes surface normals.

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::constraint::Constraint;
use crate::particle::Particle;

/// Velocity damping applied in the Verlet update.
pub const DAMPING: f64 = 0.01;
/// Squared timestep used by the integrator.
pub const TIME_STEP2: f64 = 0.5 * 0.5 * 0.025;
/// Gauss-Seidel relaxation iterations per step. The solve is approximate
/// by design; real-time cloth trades exactness for stability.
pub const CONSTRAINT_ITERATIONS: usize = 3;
/// Sphere collision push-out overshoot, to keep particles from hovering
/// at the surface and jittering back in.
const COLLISION_OVERSHOOT: f64 = 1.4;

/// Default gravity acceleration.
pub const DEFAULT_GRAVITY: Vector3<f64> = Vector3::new(0.0, -0.2, 0.0);

/// Interleaved vertex layout for the cloth's dynamic vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ClothVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// A square cloth grid simulated as a mass-spring system.
///
/// `size` is the edge length; `divisor` the number of cells per side. The
/// grid starts on the XY plane centered on the origin. Constraints span
/// the four edges of every quad cell (horizontal and vertical neighbor
/// links); the cell diagonals are left unconstrained.
pub struct Cloth {
    size: f64,
    divisor: u32,
    particles: Vec<Particle>,
    constraints: Vec<Constraint>,
    faces: Vec<[u32; 3]>,
    tex_coords: Vec<[f32; 2]>,
}

impl Cloth {
    /// Build a cloth grid of `(divisor+1)²` particles.
    pub fn new(size: f64, divisor: u32) -> Self {
        let divisor = divisor.max(1);
        let step = size / divisor as f64;
        let half = size / 2.0;
        let stride = divisor + 1;

        let mut particles = Vec::with_capacity((stride * stride) as usize);
        let mut tex_coords = Vec::with_capacity((stride * stride) as usize);
        for i in 0..stride {
            let y = -half + step * i as f64;
            for j in 0..stride {
                let x = -half + step * j as f64;
                particles.push(Particle::new(Point3::new(x, y, 0.0)));
                tex_coords.push([
                    ((x + half) / size) as f32,
                    ((y + half) / size) as f32,
                ]);
            }
        }

        let mut faces = Vec::with_capacity((divisor * divisor * 2) as usize);
        for i in 0..divisor {
            for j in 0..divisor {
                faces.push([i * stride + j, i * stride + j + 1, (i + 1) * stride + j + 1]);
                faces.push([i * stride + j, (i + 1) * stride + j + 1, (i + 1) * stride + j]);
            }
        }

        // Quad-edge constraints: right and up neighbor of every particle.
        let mut constraints = Vec::new();
        for i in 0..stride {
            for j in 0..stride {
                let here = (i * stride + j) as usize;
                if j + 1 < stride {
                    constraints.push(Constraint::new(&particles, here, here + 1));
                }
                if i + 1 < stride {
                    constraints.push(Constraint::new(&particles, here, here + stride as usize));
                }
            }
        }

        debug!(
            target: "mesh_cloth::grid",
            particles = particles.len(),
            constraints = constraints.len(),
            faces = faces.len(),
            "Built cloth grid"
        );

        Self {
            size,
            divisor,
            particles,
            constraints,
            faces,
            tex_coords,
        }
    }

    /// Edge length of the cloth.
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Cells per side.
    #[inline]
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// The particle arena.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The rest-length constraints.
    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Triangle index list (two triangles per cell).
    #[inline]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Pin a particle in place. Out-of-range indices are ignored.
    pub fn pin(&mut self, index: usize) {
        if let Some(p) = self.particles.get_mut(index) {
            p.pin();
        }
    }

    /// Pin the entire top row (the highest-Y edge of the grid).
    pub fn pin_top_row(&mut self) {
        let stride = (self.divisor + 1) as usize;
        let start = stride * self.divisor as usize;
        for index in start..start + stride {
            self.particles[index].pin();
        }
    }

    /// Apply a uniform gravity acceleration to every particle.
    pub fn add_gravity(&mut self, gravity: Vector3<f64>) {
        for p in &mut self.particles {
            let mass = p.mass;
            p.add_force(gravity * mass);
        }
    }

    /// Apply a wind force.
    ///
    /// Per triangle: project the wind direction onto the face normal and
    /// distribute the area-weighted result equally to the three particles.
    /// Degenerate triangles contribute nothing.
    pub fn add_wind(&mut self, direction: Vector3<f64>) {
        for face_idx in 0..self.faces.len() {
            let [a, b, c] = self.faces[face_idx];
            self.apply_wind_to_triangle(a as usize, b as usize, c as usize, direction);
        }
    }

    fn apply_wind_to_triangle(&mut self, a: usize, b: usize, c: usize, direction: Vector3<f64>) {
        let normal = face_normal_unnormalized(
            self.particles[a].position,
            self.particles[b].position,
            self.particles[c].position,
        );
        let len = normal.norm();
        if len < f64::EPSILON {
            return;
        }
        let force = normal * (normal / len).dot(&direction);

        self.particles[a].add_force(force);
        self.particles[b].add_force(force);
        self.particles[c].add_force(force);
    }

    /// Advance the simulation by one fixed timestep:
    /// integrate accumulated forces, relax the constraints
    /// [`CONSTRAINT_ITERATIONS`] times, then recompute normals.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.integrate(DAMPING, TIME_STEP2);
        }

        for _ in 0..CONSTRAINT_ITERATIONS {
            for constraint in &self.constraints {
                constraint.satisfy(&mut self.particles);
            }
        }

        self.update_normals();
    }

    /// Push particles out of a sphere collider.
    ///
    /// Particles strictly inside the radius are moved radially outward past
    /// the surface by the collision overshoot factor. A particle exactly at
    /// the center has no radial direction and is left alone for the step.
    pub fn sphere_collision(&mut self, center: Point3<f64>, radius: f64) {
        for p in &mut self.particles {
            let v = p.position - center;
            let distance = v.norm();
            if distance < f64::EPSILON || distance >= radius {
                continue;
            }
            p.offset(v / distance * (radius * COLLISION_OVERSHOOT - distance));
        }
    }

    /// Rebuild per-particle normals from the current face geometry.
    pub fn update_normals(&mut self) {
        for p in &mut self.particles {
            p.reset_normal();
        }
        for face_idx in 0..self.faces.len() {
            let [a, b, c] = self.faces[face_idx];
            let n = face_normal_unnormalized(
                self.particles[a as usize].position,
                self.particles[b as usize].position,
                self.particles[c as usize].position,
            );
            self.particles[a as usize].add_normal(n);
            self.particles[b as usize].add_normal(n);
            self.particles[c as usize].add_normal(n);
        }
    }

    /// Build the interleaved vertex buffer for the renderer.
    pub fn vertex_buffer(&self) -> Vec<ClothVertex> {
        self.particles
            .iter()
            .zip(&self.tex_coords)
            .map(|(p, &tex_coord)| {
                let len = p.normal.norm();
                let n = if len > f64::EPSILON {
                    p.normal / len
                } else {
                    Vector3::zeros()
                };
                ClothVertex {
                    position: [
                        p.position.x as f32,
                        p.position.y as f32,
                        p.position.z as f32,
                    ],
                    normal: [n.x as f32, n.y as f32, n.z as f32],
                    tex_coord,
                }
            })
            .collect()
    }

    /// Flattened triangle index buffer.
    pub fn index_buffer(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }
}

/// Unnormalized face normal of a triangle (right-hand rule, CCW winding).
fn face_normal_unnormalized(
    v1: Point3<f64>,
    v2: Point3<f64>,
    v3: Point3<f64>,
) -> Vector3<f64> {
    (v2 - v1).cross(&(v3 - v1))
}
