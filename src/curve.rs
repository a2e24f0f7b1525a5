//! Catmull-Rom spline through the band particles.
//!
//! The curve passes through every control point in order. The outer control
//! points of an open curve are extrapolated by reflection, so the curve
//! starts exactly at the first point and ends exactly at the last.
//!
//! Parameter `t` runs over `[0, 1]` with equal spans per segment; `u` (used
//! by the `*_at` methods) is the normalised arc length.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Number of samples in the arc-length table.
pub const ARC_LENGTH_DIVISIONS: usize = 200;

const TANGENT_DELTA: f32 = 1e-4;
const MIN_KNOT_SPACING: f32 = 1e-4;

/// Knot parameterisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CurveKind {
    /// Uniform knots with the given tension (0.5 is the classic spline).
    Uniform { tension: f32 },
    /// Knot spacing = sqrt(distance). Avoids cusps and self-intersections.
    Centripetal,
    /// Knot spacing = distance.
    Chordal,
}

impl Default for CurveKind {
    fn default() -> Self {
        CurveKind::Centripetal
    }
}

/// Cubic polynomial `c0 + c1 t + c2 t² + c3 t³` for one segment.
#[derive(Debug, Clone, Copy)]
struct CubicPoly {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl CubicPoly {
    /// Hermite form from endpoints and end tangents.
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn uniform(x0: Vec3, x1: Vec3, x2: Vec3, x3: Vec3, tension: f32) -> Self {
        Self::hermite(x1, x2, tension * (x2 - x0), tension * (x3 - x1))
    }

    /// Non-uniform Catmull-Rom with knot spacings `dt0..dt2`, rescaled to
    /// the `[0, 1]` span of the middle segment.
    fn non_uniform(x0: Vec3, x1: Vec3, x2: Vec3, x3: Vec3, dt0: f32, dt1: f32, dt2: f32) -> Self {
        let t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
        Self::hermite(x1, x2, t1 * dt1, t2 * dt1)
    }

    #[inline]
    fn eval(&self, t: f32) -> Vec3 {
        let t2 = t * t;
        let t3 = t2 * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t3
    }
}

/// Open Catmull-Rom curve through an ordered point list.
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    kind: CurveKind,
    /// Cumulative chord lengths over `ARC_LENGTH_DIVISIONS` even `t` steps.
    lengths: Vec<f32>,
}

impl CatmullRomCurve {
    /// Build a curve through `points`.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two points are given.
    pub fn new(points: Vec<Vec3>, kind: CurveKind) -> Self {
        assert!(points.len() >= 2, "a curve needs at least two points");
        let mut curve = Self {
            points,
            kind,
            lengths: Vec::new(),
        };
        curve.lengths = curve.compute_lengths(ARC_LENGTH_DIVISIONS);
        curve
    }

    /// Control points in order.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    /// Approximate total arc length.
    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at curve parameter `t` in `[0, 1]`.
    pub fn point(&self, t: f32) -> Vec3 {
        let pts = &self.points;
        let l = pts.len();
        let p = (l - 1) as f32 * t.clamp(0.0, 1.0);
        let mut seg = p.floor() as usize;
        let mut weight = p - seg as f32;

        if seg >= l - 1 {
            seg = l - 2;
            weight = 1.0;
        }

        let p1 = pts[seg];
        let p2 = pts[seg + 1];
        let p0 = if seg > 0 { pts[seg - 1] } else { 2.0 * p1 - p2 };
        let p3 = if seg + 2 < l { pts[seg + 2] } else { 2.0 * p2 - p1 };

        let poly = match self.kind {
            CurveKind::Uniform { tension } => CubicPoly::uniform(p0, p1, p2, p3, tension),
            CurveKind::Centripetal => Self::knot_poly(p0, p1, p2, p3, 0.25),
            CurveKind::Chordal => Self::knot_poly(p0, p1, p2, p3, 0.5),
        };
        poly.eval(weight)
    }

    /// Knot spacing is `|Δ|^(2·pow)`, computed from squared distances.
    fn knot_poly(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, pow: f32) -> CubicPoly {
        let mut dt0 = p0.distance_squared(p1).powf(pow);
        let mut dt1 = p1.distance_squared(p2).powf(pow);
        let mut dt2 = p2.distance_squared(p3).powf(pow);

        if dt1 < MIN_KNOT_SPACING {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT_SPACING {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT_SPACING {
            dt2 = dt1;
        }
        CubicPoly::non_uniform(p0, p1, p2, p3, dt0, dt1, dt2)
    }

    /// Unit tangent at curve parameter `t`, by central difference.
    pub fn tangent(&self, t: f32) -> Vec3 {
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        (self.point(t2) - self.point(t1)).normalize_or_zero()
    }

    /// Map normalised arc length `u` to curve parameter `t`.
    pub fn u_to_t(&self, u: f32) -> f32 {
        let lengths = &self.lengths;
        let total = self.length();
        if total <= f32::EPSILON {
            return u.clamp(0.0, 1.0);
        }

        let target = u.clamp(0.0, 1.0) * total;
        let last = lengths.len() - 1;
        // Index of the last table entry not exceeding the target.
        let i = lengths.partition_point(|&len| len <= target).saturating_sub(1).min(last);

        if i == last || lengths[i] == target {
            return i as f32 / last as f32;
        }

        let before = lengths[i];
        let span = lengths[i + 1] - before;
        let fraction = if span > 0.0 { (target - before) / span } else { 0.0 };
        (i as f32 + fraction) / last as f32
    }

    /// Point at normalised arc length `u`.
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at normalised arc length `u`.
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        self.tangent(self.u_to_t(u))
    }

    fn compute_lengths(&self, divisions: usize) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);
        for d in 1..=divisions {
            let current = self.point(d as f32 / divisions as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        lengths
    }
}
