pub mod analytic;
pub mod numeric;
pub mod surface;

pub use analytic::{plane_curve, sphere_curve};
pub use numeric::{saddle_curve, torus_curve};
