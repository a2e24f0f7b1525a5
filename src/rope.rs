//! Verlet particle chain used to simulate the lanyard band.
//!
//! The band is a 1-D chain of unit-mass particles joined by distance
//! constraints. Velocity is never stored: it is implied by the difference
//! between a particle's current and previous position.
//!
//! Each frame the caller runs, in this order:
//!
//! ```ignore
//! rope.step(dt, gravity);        // accumulate forces + integrate
//! rope.pin(0, anchor);           // re-assert both anchors
//! rope.pin(last, card_attach);
//! rope.relax();                  // satisfy segment lengths
//! ```
//!
//! Pinning between integration and relaxation keeps the anchors from ever
//! drifting, even transiently.

use glam::Vec3;

/// Distances below this are treated as this, to avoid dividing by zero.
pub const MIN_SEGMENT_DISTANCE: f32 = 1e-6;

/// A single point mass in the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Current position.
    pub position: Vec3,
    /// Position one step back.
    pub previous_position: Vec3,
    /// Force accumulated since the last integration (unit mass).
    pub accumulated_force: Vec3,
    /// Pinned particles are only moved by [`Rope::pin`].
    pub is_pinned: bool,
}

impl Particle {
    fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            previous_position: position,
            accumulated_force: Vec3::ZERO,
            is_pinned: false,
        }
    }

    /// Displacement over the last step.
    #[inline]
    pub fn displacement(&self) -> Vec3 {
        self.position - self.previous_position
    }
}

/// An ordered chain of particles with uniform rest length.
#[derive(Debug, Clone)]
pub struct Rope {
    particles: Vec<Particle>,
    rest_segment_length: f32,
    relaxation_iterations: usize,
    damping: f32,
}

impl Rope {
    /// Create a straight chain of `count` particles from `start` to `end`.
    ///
    /// The rest length of every segment is the straight-line distance
    /// divided by `count - 1`. No particle is pinned yet.
    ///
    /// # Panics
    ///
    /// Panics if `count < 2`.
    pub fn new(start: Vec3, end: Vec3, count: usize) -> Self {
        assert!(count >= 2, "a rope needs at least two particles");

        let particles = (0..count)
            .map(|i| {
                let t = i as f32 / (count - 1) as f32;
                Particle::at_rest(start.lerp(end, t))
            })
            .collect();

        Self {
            particles,
            rest_segment_length: start.distance(end) / (count - 1) as f32,
            relaxation_iterations: 6,
            damping: 0.985,
        }
    }

    /// Set the number of constraint passes run by [`relax`](Self::relax).
    pub fn with_relaxation_iterations(mut self, iterations: usize) -> Self {
        self.relaxation_iterations = iterations;
        self
    }

    /// Set the velocity retention factor used by [`integrate`](Self::integrate).
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always false; a rope has at least two particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of distance constraints (`len() - 1`).
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.particles.len() - 1
    }

    #[inline]
    pub fn rest_segment_length(&self) -> f32 {
        self.rest_segment_length
    }

    #[inline]
    pub fn relaxation_iterations(&self) -> usize {
        self.relaxation_iterations
    }

    #[inline]
    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Index of the free end.
    #[inline]
    pub fn last_index(&self) -> usize {
        self.particles.len() - 1
    }

    /// Read a particle.
    #[inline]
    pub fn particle(&self, index: usize) -> &Particle {
        &self.particles[index]
    }

    /// All particles in chain order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Snapshot of current positions in chain order.
    pub fn positions(&self) -> Vec<Vec3> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Add `gravity` to the force of every free particle.
    pub fn apply_gravity(&mut self, gravity: Vec3) {
        for p in self.particles.iter_mut().filter(|p| !p.is_pinned) {
            p.accumulated_force += gravity;
        }
    }

    /// Verlet-integrate every free particle over `dt` seconds.
    ///
    /// `dt` is not clamped here; keep it small (≤ 1/30 s) or the explicit
    /// scheme becomes unstable.
    pub fn integrate(&mut self, dt: f32) {
        let dt2 = dt * dt;
        let damping = self.damping;
        for p in self.particles.iter_mut().filter(|p| !p.is_pinned) {
            let current = p.position;
            p.position = current + (current - p.previous_position) * damping + p.accumulated_force * dt2;
            p.previous_position = current;
            p.accumulated_force = Vec3::ZERO;
        }
    }

    /// Accumulate gravity and integrate.
    pub fn step(&mut self, dt: f32, gravity: Vec3) {
        self.apply_gravity(gravity);
        self.integrate(dt);
    }

    /// Force particle `index` to `position` and mark it pinned.
    ///
    /// Both the current and previous position are set, so the particle
    /// carries no implied velocity.
    pub fn pin(&mut self, index: usize, position: Vec3) {
        let p = &mut self.particles[index];
        p.position = position;
        p.previous_position = position;
        p.accumulated_force = Vec3::ZERO;
        p.is_pinned = true;
    }

    /// Release a pinned particle. It keeps its position and has no velocity.
    pub fn unpin(&mut self, index: usize) {
        self.particles[index].is_pinned = false;
    }

    /// Run the configured number of distance-constraint passes.
    pub fn relax(&mut self) {
        let rest = self.rest_segment_length;
        for _ in 0..self.relaxation_iterations {
            for i in 0..self.particles.len() - 1 {
                let (head, tail) = self.particles.split_at_mut(i + 1);
                let a = &mut head[i];
                let b = &mut tail[0];

                if a.is_pinned && b.is_pinned {
                    continue;
                }

                let delta = b.position - a.position;
                let dist = delta.length().max(MIN_SEGMENT_DISTANCE);
                let diff = (dist - rest) / dist;

                if a.is_pinned {
                    b.position -= delta * diff;
                } else if b.is_pinned {
                    a.position += delta * diff;
                } else {
                    a.position += delta * (0.5 * diff);
                    b.position -= delta * (0.5 * diff);
                }
            }
        }
    }

    /// Length of segment `i` (between particles `i` and `i + 1`).
    pub fn segment_length(&self, i: usize) -> f32 {
        self.particles[i].position.distance(self.particles[i + 1].position)
    }

    /// Largest deviation of any segment from the rest length.
    pub fn max_segment_error(&self) -> f32 {
        (0..self.segment_count())
            .map(|i| (self.segment_length(i) - self.rest_segment_length).abs())
            .fold(0.0, f32::max)
    }

    /// Sum of particle displacements over the last step.
    pub fn total_displacement(&self) -> f32 {
        self.particles.iter().map(|p| p.displacement().length()).sum()
    }

    /// Unit direction of the last segment, from the second-to-last particle
    /// to the free end. Zero if the two coincide.
    pub fn last_segment_direction(&self) -> Vec3 {
        let n = self.particles.len();
        (self.particles[n - 1].position - self.particles[n - 2].position).normalize_or_zero()
    }
}
