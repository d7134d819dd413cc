use std::collections::HashSet;

use crate::config::{
    AREA_DEGENERACY, CG_MAX_ITERATIONS_HEAT, CG_MAX_ITERATIONS_POISSON, CG_TOLERANCE,
    HEAT_PATH_STEP_BUDGET_FACTOR, PLATEAU_ESCAPE_MARGIN, STRICT_DESCENT_MARGIN,
};
use crate::dijkstra;
use crate::error::{EngineError, EngineResult};
use crate::geom::Vec3;
use crate::heat::cg;
use crate::heat::laplacian::{triangle_geometry, CotangentLaplacian};
use crate::mesh::Mesh;
use crate::normalize::Normalization;
use crate::result::{chord_length, Curve};

/// Run the Heat Method end to end and return the recovered geodesic curve.
///
/// The solve itself runs entirely in normalised vertex space: the mass
/// matrix, cotangent Laplacian, heat diffusion and Poisson solves all use
/// absolute tolerances (see the solver-wide numeric constants) calibrated
/// for a unit-scale mesh, so an arbitrarily-scaled input is rescaled first.
/// The recovered path and curve length are mapped back to the mesh's
/// original coordinates on the way out.
pub fn solve(mesh: &Mesh, start: usize, end: usize) -> EngineResult<Curve> {
    mesh.check_index(start)?;
    mesh.check_index(end)?;
    if mesh.face_count() == 0 {
        return Err(EngineError::DegenerateTopology);
    }

    let norm = Normalization::from_vertices(mesh.vertices());
    let normalized_vertices = norm.apply_all(mesh.vertices());
    let normalized_mesh = Mesh::new(normalized_vertices, mesh.faces().to_vec());

    let laplacian = CotangentLaplacian::assemble(&normalized_mesh);
    if laplacian.mass[start] <= AREA_DEGENERACY {
        return Err(EngineError::DegenerateSource { index: start });
    }

    let u = diffuse_heat(&normalized_mesh, &laplacian, start);
    let divergence = vector_field_divergence(&normalized_mesh, &u);
    let phi = solve_poisson(&normalized_mesh, &laplacian, &divergence, start);

    let path = match greedy_descent(&normalized_mesh, &phi, start, end) {
        Some(path) => path,
        None => {
            log::warn!("heat path extraction did not reach start; falling back to Dijkstra");
            dijkstra::shortest_path(mesh, start, end)?.path
        }
    };

    let normalized_points: Vec<Vec3> = path.iter().map(|&i| normalized_mesh.vertices()[i]).collect();
    let length = norm.unapply_length(chord_length(&normalized_points));
    let mut points: Vec<Vec3> = normalized_points.iter().map(|&p| norm.unapply(p)).collect();
    if let Some(first) = points.first_mut() {
        *first = mesh.vertices()[start];
    }
    if let Some(last) = points.last_mut() {
        *last = mesh.vertices()[end];
    }
    Ok(Curve::with_length("heat_geodesic", points, length))
}

/// Backward-Euler heat diffusion: solve `(M - tL) u = b` with `b[start] =
/// mass[start]`, `t = h²` where `h` is the mean edge length.
fn diffuse_heat(mesh: &Mesh, laplacian: &CotangentLaplacian, start: usize) -> Vec<f64> {
    let n = mesh.vertex_count();
    let h = CotangentLaplacian::mean_edge_length(mesh);
    let t = h * h;

    let mut b = vec![0.0; n];
    b[start] = laplacian.mass[start];

    let (u, converged) = cg::solve(
        n,
        CG_TOLERANCE,
        CG_MAX_ITERATIONS_HEAT,
        |x| {
            let lx = laplacian.apply(x);
            (0..n).map(|i| laplacian.mass[i] * x[i] - t * lx[i]).collect()
        },
        &b,
    );
    if !converged {
        log::warn!(
            "{}",
            EngineError::SolverDiverged {
                max_iterations: CG_MAX_ITERATIONS_HEAT
            }
        );
    }
    u
}

/// Per-triangle normalised negative gradient field, scattered into a
/// per-vertex divergence.
fn vector_field_divergence(mesh: &Mesh, u: &[f64]) -> Vec<f64> {
    let n = mesh.vertex_count();
    let mut divergence = vec![0.0; n];

    for &[i, j, k] in mesh.faces() {
        let (pi, pj, pk) = (mesh.vertices()[i], mesh.vertices()[j], mesh.vertices()[k]);
        let Some(geom) = triangle_geometry(pi, pj, pk) else {
            continue;
        };
        let two_area = 2.0 * geom.area;
        let grad = (geom.normal.cross(pk - pj).mul_scalar(u[i])
            + geom.normal.cross(pi - pk).mul_scalar(u[j])
            + geom.normal.cross(pj - pi).mul_scalar(u[k]))
        .mul_scalar(1.0 / two_area);

        let grad_len = grad.length();
        if grad_len <= AREA_DEGENERACY {
            continue;
        }
        let field = grad.mul_scalar(-1.0 / grad_len);

        let [cot_i, cot_j, cot_k] = geom.cot;
        divergence[i] += 0.5 * (cot_j * (pk - pi).dot(field) + cot_k * (pj - pi).dot(field));
        divergence[j] += 0.5 * (cot_k * (pi - pj).dot(field) + cot_i * (pk - pj).dot(field));
        divergence[k] += 0.5 * (cot_i * (pj - pk).dot(field) + cot_j * (pi - pk).dot(field));
    }

    divergence
}

/// Solve `L φ = div` with `φ[start]` pinned to zero via a row-identity
/// substitution, then shift the solution so its minimum is zero.
fn solve_poisson(
    mesh: &Mesh,
    laplacian: &CotangentLaplacian,
    divergence: &[f64],
    start: usize,
) -> Vec<f64> {
    let n = mesh.vertex_count();
    let mut b = divergence.to_vec();
    b[start] = 0.0;

    let (mut phi, converged) = cg::solve(
        n,
        CG_TOLERANCE,
        CG_MAX_ITERATIONS_POISSON,
        |x| {
            let mut lx = laplacian.apply(x);
            lx[start] = x[start];
            lx
        },
        &b,
    );
    if !converged {
        log::warn!(
            "{}",
            EngineError::SolverDiverged {
                max_iterations: CG_MAX_ITERATIONS_POISSON
            }
        );
    }

    let min_phi = phi.iter().copied().fold(f64::INFINITY, f64::min);
    if min_phi.is_finite() {
        for v in &mut phi {
            *v -= min_phi;
        }
    }
    phi
}

/// Greedy descent from `end` toward `start` on the `phi` field: prefer a
/// strictly smaller neighbour; failing that, take one unvisited neighbour
/// within the plateau-escape margin. Returns the path in `start..end`
/// order, or `None` if the walk exhausts its step budget without reaching
/// `start`.
fn greedy_descent(mesh: &Mesh, phi: &[f64], start: usize, end: usize) -> Option<Vec<usize>> {
    let max_steps = HEAT_PATH_STEP_BUDGET_FACTOR * mesh.vertex_count();
    let mut path = vec![end];
    let mut visited = HashSet::new();
    visited.insert(end);
    let mut current = end;

    for _ in 0..max_steps {
        if current == start {
            break;
        }
        let neighbors = mesh.neighbors(current);

        let mut best: Option<(usize, f64)> = None;
        for &(candidate, _) in neighbors {
            if phi[candidate] < phi[current] - STRICT_DESCENT_MARGIN
                && best.is_none_or(|(_, best_phi)| phi[candidate] < best_phi)
            {
                best = Some((candidate, phi[candidate]));
            }
        }

        let next = match best {
            Some((candidate, _)) => Some(candidate),
            None => neighbors
                .iter()
                .find(|&&(candidate, _)| {
                    !visited.contains(&candidate)
                        && (phi[candidate] - phi[current]).abs() <= PLATEAU_ESCAPE_MARGIN
                })
                .map(|&(candidate, _)| candidate),
        };

        match next {
            Some(candidate) => {
                path.push(candidate);
                visited.insert(candidate);
                current = candidate;
            }
            None => break,
        }
    }

    if current == start {
        path.reverse();
        Some(path)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Mesh {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
        Mesh::new(vertices, faces)
    }

    #[test]
    fn scenario_heat_on_unit_tetrahedron() {
        let mesh = tetrahedron();
        let curve = solve(&mesh, 0, 2).unwrap();
        assert_eq!(curve.points[0], mesh.vertices()[0]);
        assert_eq!(*curve.points.last().unwrap(), mesh.vertices()[2]);

        let dijkstra_length = dijkstra::shortest_path(&mesh, 0, 2)
            .unwrap()
            .total_distance
            .unwrap();
        assert!(curve.length <= dijkstra_length * 1.10);
    }

    #[test]
    fn result_is_stable_under_uniform_rescaling_of_the_input_mesh() {
        let unit = tetrahedron();
        let scaled = Mesh::new(
            unit.vertices().iter().map(|&v| v.mul_scalar(1000.0)).collect(),
            unit.faces().to_vec(),
        );

        let unit_curve = solve(&unit, 0, 2).unwrap();
        let scaled_curve = solve(&scaled, 0, 2).unwrap();

        assert_eq!(scaled_curve.points.len(), unit_curve.points.len());
        assert!((scaled_curve.length - unit_curve.length * 1000.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_topology_without_faces_is_an_error() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let mesh = Mesh::new(vertices, vec![]);
        assert!(matches!(
            solve(&mesh, 0, 1),
            Err(EngineError::DegenerateTopology)
        ));
    }

    #[test]
    fn start_equals_end_yields_single_point_curve() {
        let mesh = tetrahedron();
        let curve = solve(&mesh, 1, 1).unwrap();
        assert_eq!(curve.points.len(), 1);
        assert_eq!(curve.length, 0.0);
    }
}
