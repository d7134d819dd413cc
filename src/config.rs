//! Numeric step sizes used across the solvers, centralised so the contract
//! in the design notes lives in one place instead of scattered literals.

use crate::geom::Tolerance;

/// Step used for forward-differencing the metric tensor (§4.5).
pub const METRIC_DIFFERENCE_STEP: f64 = Tolerance::DERIVATIVE.eps;

/// Perturbation used to build the shooting-method Jacobian by finite
/// difference.
pub const SHOOTING_JACOBIAN_STEP: f64 = Tolerance::SHOOTING_JACOBIAN.eps;

/// Target residual norm for the shooting method's Newton iteration.
pub const SHOOTING_TARGET_TOLERANCE: f64 = 1e-3;

/// Maximum Newton iterations attempted by the shooting method.
pub const SHOOTING_MAX_ITERATIONS: usize = 8;

/// Below this determinant the shooting Jacobian is considered singular.
pub const SHOOTING_SINGULAR_DETERMINANT: f64 = 1e-10;

/// Below this determinant the metric tensor is considered degenerate and
/// integration continues with an identity inverse.
pub const METRIC_DEGENERATE_DETERMINANT: f64 = Tolerance::ZERO_LENGTH.eps;

/// Convergence tolerance (on `‖r‖`) for both conjugate-gradient solves.
pub const CG_TOLERANCE: f64 = Tolerance::CG.eps;

/// Maximum iterations for the heat-diffusion CG solve.
pub const CG_MAX_ITERATIONS_HEAT: usize = 600;

/// Maximum iterations for the Poisson CG solve.
pub const CG_MAX_ITERATIONS_POISSON: usize = 1000;

/// Strict-descent margin for greedy path extraction on the heat field.
pub const STRICT_DESCENT_MARGIN: f64 = Tolerance::STRICT_DESCENT.eps;

/// Plateau-escape margin: a step to a neighbour whose `phi` is within this
/// of the current value is allowed once no strictly-descending neighbour
/// exists.
pub const PLATEAU_ESCAPE_MARGIN: f64 = 1e-6;

/// Triangles with area at or below this are skipped during Laplacian
/// assembly; gradients below this magnitude are skipped during vector-field
/// construction.
pub const AREA_DEGENERACY: f64 = Tolerance::ZERO_LENGTH.eps;

/// Large finite sentinel used for unreachable vertices in
/// `DijkstraResult::all_distances` (design note (b)). Any value beyond half
/// of `f64::MAX` should be treated as unreachable by consumers.
pub const UNREACHABLE_DISTANCE: f64 = f64::MAX / 4.0;

/// Sample counts for the analytic/numeric curve families.
pub const PLANE_SAMPLES: usize = 64;
pub const SPHERE_SAMPLES: usize = 128;
pub const TORUS_SAMPLES: usize = 160;
pub const SADDLE_SAMPLES: usize = 160;

/// Sphere-curve angular thresholds.
pub const SPHERE_COINCIDENT_ANGLE: f64 = 1e-8;
pub const SPHERE_ANTIPODAL_SLACK: f64 = 1e-5;

/// Fallback torus/saddle parameters used when the closed-form estimator
/// degenerates.
pub const TORUS_FALLBACK_MAJOR_RADIUS: f64 = 1.0;
pub const TORUS_FALLBACK_MINOR_RADIUS: f64 = 0.25;
pub const SADDLE_FALLBACK_COEFFICIENT: f64 = 0.5;

/// Cap on the number of steps the greedy heat-path walk may take before it
/// is considered to have failed, as a multiple of vertex count.
pub const HEAT_PATH_STEP_BUDGET_FACTOR: usize = 3;
