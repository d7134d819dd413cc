use crate::config::{
    SADDLE_FALLBACK_COEFFICIENT, SADDLE_SAMPLES, SHOOTING_MAX_ITERATIONS,
    TORUS_FALLBACK_MAJOR_RADIUS, TORUS_FALLBACK_MINOR_RADIUS, TORUS_SAMPLES,
};
use crate::error::EngineError;
use crate::geodesic::surface::{self, ParametricSurface};
use crate::geom::{BBox, Vec3};
use crate::normalize::Normalization;
use crate::result::Curve;

/// A torus surface inferred from a normalised vertex cloud: major radius
/// `major`, minor radius `minor`, centred at `centre`.
pub struct TorusSurface {
    pub centre: Vec3,
    pub major: f64,
    pub minor: f64,
}

impl TorusSurface {
    /// Fit `(centre, R, r)` by closed-form averages over `vertices`
    /// (already in normalised space). Falls back to `R=1, r=0.25` when the
    /// fit degenerates.
    #[must_use]
    pub fn fit(vertices: &[Vec3]) -> Self {
        let centre = BBox::from_points(vertices)
            .map(BBox::center)
            .unwrap_or(Vec3::ZERO);

        let mut rho_sum = 0.0;
        let mut count = 0usize;
        for v in vertices {
            let q = *v - centre;
            let rho = (q.x * q.x + q.y * q.y).sqrt();
            if rho.is_finite() {
                rho_sum += rho;
                count += 1;
            }
        }
        let major = if count > 0 { rho_sum / count as f64 } else { f64::NAN };

        let mut minor_sum = 0.0;
        let mut minor_count = 0usize;
        for v in vertices {
            let q = *v - centre;
            let rho = (q.x * q.x + q.y * q.y).sqrt();
            let d = ((rho - major).powi(2) + q.z * q.z).sqrt();
            if d.is_finite() {
                minor_sum += d;
                minor_count += 1;
            }
        }
        let minor = if minor_count > 0 {
            minor_sum / minor_count as f64
        } else {
            f64::NAN
        };

        if !major.is_finite() || !minor.is_finite() || major <= 0.0 {
            Self {
                centre,
                major: TORUS_FALLBACK_MAJOR_RADIUS,
                minor: TORUS_FALLBACK_MINOR_RADIUS,
            }
        } else {
            Self { centre, major, minor }
        }
    }

    /// `(u, v)` parameters of a point already known to lie near this torus.
    #[must_use]
    pub fn params_of(&self, p: Vec3) -> (f64, f64) {
        let q = p - self.centre;
        let rho = (q.x * q.x + q.y * q.y).sqrt();
        let u = q.y.atan2(q.x);
        let v = q.z.atan2(rho - self.major);
        (u, v)
    }
}

impl ParametricSurface for TorusSurface {
    fn point_at(&self, u: f64, v: f64) -> Vec3 {
        let ring = self.major + self.minor * v.cos();
        self.centre
            + Vec3::new(ring * u.cos(), ring * u.sin(), self.minor * v.sin())
    }
}

/// A saddle surface `z = a(x² - y²)` fit to a normalised vertex cloud.
pub struct SaddleSurface {
    pub centre: Vec3,
    pub coefficient: f64,
}

impl SaddleSurface {
    #[must_use]
    pub fn fit(vertices: &[Vec3]) -> Self {
        let centre = BBox::from_points(vertices)
            .map(BBox::center)
            .unwrap_or(Vec3::ZERO);

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for v in vertices {
            let q = *v - centre;
            let basis = q.x * q.x - q.y * q.y;
            if basis.is_finite() && q.z.is_finite() {
                numerator += basis * q.z;
                denominator += basis * basis;
            }
        }

        let coefficient = if denominator.abs() > 1e-12 && numerator.is_finite() {
            numerator / denominator
        } else {
            SADDLE_FALLBACK_COEFFICIENT
        };

        Self { centre, coefficient }
    }

    #[must_use]
    pub fn params_of(&self, p: Vec3) -> (f64, f64) {
        let q = p - self.centre;
        (q.x, q.y)
    }
}

impl ParametricSurface for SaddleSurface {
    fn point_at(&self, u: f64, v: f64) -> Vec3 {
        self.centre
            + Vec3::new(u, v, self.coefficient * (u * u - v * v))
    }
}

/// Wrap `x` into `(-π, π]`, used to put the torus's angular target on the
/// shortest branch from the start angle.
fn wrap_to_pi(x: f64) -> f64 {
    let two_pi = std::f64::consts::TAU;
    let mut r = x % two_pi;
    if r > std::f64::consts::PI {
        r -= two_pi;
    } else if r <= -std::f64::consts::PI {
        r += two_pi;
    }
    r
}

fn shoot_or_fallback(
    surface: &dyn ParametricSurface,
    u0: f64,
    v0: f64,
    u1: f64,
    v1: f64,
    steps: usize,
) -> Vec<(f64, f64)> {
    let (trajectory, converged) = surface::shoot(surface, u0, v0, u1, v1, steps);
    if converged {
        return trajectory;
    }
    log::warn!(
        "{}",
        EngineError::ShootingFailed {
            iterations: SHOOTING_MAX_ITERATIONS
        }
    );
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            (u0 + (u1 - u0) * t, v0 + (v1 - v0) * t)
        })
        .collect()
}

/// Torus geodesic between `p1` and `p2` (original, un-normalised
/// coordinates), inferring the torus from `normalized_vertices`.
#[must_use]
pub fn torus_curve(p1: Vec3, p2: Vec3, normalized_vertices: &[Vec3], norm: &Normalization) -> Curve {
    let surface = TorusSurface::fit(normalized_vertices);
    let (u0, v0) = surface.params_of(norm.apply(p1));
    let (u1, v1) = surface.params_of(norm.apply(p2));
    let u1 = u0 + wrap_to_pi(u1 - u0);
    let v1 = v0 + wrap_to_pi(v1 - v0);

    let trajectory = shoot_or_fallback(&surface, u0, v0, u1, v1, TORUS_SAMPLES - 1);
    let normalized_points: Vec<Vec3> = trajectory
        .iter()
        .map(|&(u, v)| surface.point_at(u, v))
        .collect();
    let length = norm.unapply_length(crate::result::chord_length(&normalized_points));
    let mut points: Vec<Vec3> = normalized_points.iter().map(|&p| norm.unapply(p)).collect();
    points[0] = p1;
    *points.last_mut().unwrap() = p2;

    Curve::with_length("torus_geodesic", points, length)
}

/// Saddle geodesic between `p1` and `p2`, fitting the saddle from
/// `normalized_vertices`.
#[must_use]
pub fn saddle_curve(
    p1: Vec3,
    p2: Vec3,
    normalized_vertices: &[Vec3],
    norm: &Normalization,
) -> Curve {
    let surface = SaddleSurface::fit(normalized_vertices);
    let (u0, v0) = surface.params_of(norm.apply(p1));
    let (u1, v1) = surface.params_of(norm.apply(p2));

    let trajectory = shoot_or_fallback(&surface, u0, v0, u1, v1, SADDLE_SAMPLES - 1);
    let normalized_points: Vec<Vec3> = trajectory
        .iter()
        .map(|&(u, v)| surface.point_at(u, v))
        .collect();
    let length = norm.unapply_length(crate::result::chord_length(&normalized_points));
    let mut points: Vec<Vec3> = normalized_points.iter().map(|&p| norm.unapply(p)).collect();
    points[0] = p1;
    *points.last_mut().unwrap() = p2;

    Curve::with_length("saddle_geodesic", points, length)
}
