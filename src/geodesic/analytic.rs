use crate::config::{PLANE_SAMPLES, SPHERE_ANTIPODAL_SLACK, SPHERE_COINCIDENT_ANGLE, SPHERE_SAMPLES};
use crate::geom::Vec3;
use crate::result::Curve;

/// Pin the first and last sample to the original endpoints exactly, as
/// required of every analytic/numeric curve regardless of how the
/// intermediate samples were generated.
fn pin_endpoints(points: &mut [Vec3], p1: Vec3, p2: Vec3) {
    if let Some(first) = points.first_mut() {
        *first = p1;
    }
    if let Some(last) = points.last_mut() {
        *last = p2;
    }
}

/// Straight line segment between `p1` and `p2`, sampled at
/// [`PLANE_SAMPLES`] points.
#[must_use]
pub fn plane_curve(p1: Vec3, p2: Vec3) -> Curve {
    let n = PLANE_SAMPLES;
    let mut points: Vec<Vec3> = (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            p1.lerp(p2, t)
        })
        .collect();
    pin_endpoints(&mut points, p1, p2);
    let length = (p2 - p1).length();
    Curve::with_length("plane_straight_line", points, length)
}

/// Pick a unit vector orthogonal to `a`, trying the coordinate axes in
/// order until one is not nearly parallel to `a`.
fn orthogonal_unit_vector(a: Vec3) -> Vec3 {
    for candidate in [Vec3::X, Vec3::Y, Vec3::Z] {
        let perp = candidate - a.mul_scalar(candidate.dot(a));
        if let Some(unit) = perp.normalized() {
            if perp.length() > 1e-6 {
                return unit;
            }
        }
    }
    Vec3::Y
}

/// Great-circle arc between `p1` and `p2`, sampled at [`SPHERE_SAMPLES`]
/// points, including the coincident and antipodal special cases.
#[must_use]
pub fn sphere_curve(p1: Vec3, p2: Vec3) -> Curve {
    let n = SPHERE_SAMPLES;
    let r = (p1.length() + p2.length()) * 0.5;
    let a = p1.normalized().unwrap_or(Vec3::X);
    let b = p2.normalized().unwrap_or(Vec3::X);
    let theta = a.dot(b).clamp(-1.0, 1.0).acos();

    let mut points: Vec<Vec3>;
    let length: f64;

    if theta <= SPHERE_COINCIDENT_ANGLE {
        points = vec![a.mul_scalar(r); n];
        length = 0.0;
    } else if (std::f64::consts::PI - theta).abs() <= SPHERE_ANTIPODAL_SLACK {
        let u = orthogonal_unit_vector(a);
        points = (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                let angle = std::f64::consts::PI * t;
                (a.mul_scalar(angle.cos()) + u.mul_scalar(angle.sin())).mul_scalar(r)
            })
            .collect();
        length = std::f64::consts::PI * r;
    } else {
        let sin_theta = theta.sin();
        points = (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                let w1 = ((1.0 - t) * theta).sin() / sin_theta;
                let w2 = (t * theta).sin() / sin_theta;
                (a.mul_scalar(w1) + b.mul_scalar(w2)).mul_scalar(r)
            })
            .collect();
        length = r * theta;
    }

    pin_endpoints(&mut points, p1, p2);
    Curve::with_length("sphere_great_circle", points, length)
}
