//! Cloth particles with position-based Verlet integration.

use nalgebra::{Point3, Vector3};

/// A single cloth particle.
///
/// Integration is velocity-free Verlet: the previous position doubles as
/// the velocity state. A particle with `movable == false` is pinned and
/// never changes position, neither through integration nor through
/// constraint corrections.
#[derive(Debug, Clone)]
pub struct Particle {
    pub mass: f64,
    pub movable: bool,
    pub position: Point3<f64>,
    pub old_position: Point3<f64>,
    pub acceleration: Vector3<f64>,
    /// Accumulated (unnormalized) surface normal, rebuilt every step.
    pub normal: Vector3<f64>,
}

impl Particle {
    /// Create a movable particle of unit mass at `position`.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            mass: 1.0,
            movable: true,
            position,
            old_position: position,
            acceleration: Vector3::zeros(),
            normal: Vector3::zeros(),
        }
    }

    /// Accumulate a force for the next integration step.
    pub fn add_force(&mut self, force: Vector3<f64>) {
        if self.mass > f64::EPSILON {
            self.acceleration += force / self.mass;
        }
    }

    /// Verlet position update: `pos' = pos + (pos − old)·(1 − damping) + a·dt²`.
    ///
    /// Pinned particles only clear their accumulated acceleration.
    pub fn integrate(&mut self, damping: f64, dt2: f64) {
        if self.movable {
            let temp = self.position;
            self.position +=
                (self.position - self.old_position) * (1.0 - damping) + self.acceleration * dt2;
            self.old_position = temp;
        }
        self.acceleration = Vector3::zeros();
    }

    /// Displace the particle, respecting the pin flag.
    #[inline]
    pub fn offset(&mut self, offset: Vector3<f64>) {
        if self.movable {
            self.position += offset;
        }
    }

    /// Pin the particle in place.
    #[inline]
    pub fn pin(&mut self) {
        self.movable = false;
    }

    /// Accumulate a face normal contribution (normalized before adding).
    pub fn add_normal(&mut self, n: Vector3<f64>) {
        let len = n.norm();
        if len > f64::EPSILON {
            self.normal += n / len;
        }
    }

    /// Clear the accumulated normal.
    #[inline]
    pub fn reset_normal(&mut self) {
        self.normal = Vector3::zeros();
    }
}
