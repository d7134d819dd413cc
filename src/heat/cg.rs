/// Matrix-free conjugate gradient: solves `A x = b` given only a callback
/// that applies `A`, so no sparse matrix is ever materialised. Starts from
/// a zero initial guess and uses no preconditioner, per the design
/// contract. Returns the solution and whether it converged within
/// `max_iterations` to `‖r‖ < tolerance`; non-convergence is not an error
/// here, only a signal for the caller to log and continue.
pub fn solve(
    n: usize,
    tolerance: f64,
    max_iterations: usize,
    mut apply: impl FnMut(&[f64]) -> Vec<f64>,
    b: &[f64],
) -> (Vec<f64>, bool) {
    let mut x = vec![0.0; n];
    let mut r = b.to_vec();
    let mut p = r.clone();
    let mut rs_old = dot(&r, &r);

    if rs_old.sqrt() < tolerance {
        return (x, true);
    }

    for _ in 0..max_iterations {
        let ap = apply(&p);
        let denom = dot(&p, &ap);
        if denom.abs() < 1e-300 {
            break;
        }
        let alpha = rs_old / denom;
        for i in 0..n {
            x[i] += alpha * p[i];
            r[i] -= alpha * ap[i];
        }
        let rs_new = dot(&r, &r);
        if rs_new.sqrt() < tolerance {
            return (x, true);
        }
        let beta = rs_new / rs_old;
        for i in 0..n {
            p[i] = r[i] + beta * p[i];
        }
        rs_old = rs_new;
    }

    (x, false)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_a_diagonal_system() {
        let diag = [2.0, 4.0, 8.0];
        let b = [2.0, 8.0, 16.0];
        let (x, converged) = solve(
            3,
            1e-9,
            100,
            |p| p.iter().zip(diag).map(|(v, d)| v * d).collect(),
            &b,
        );
        assert!(converged);
        assert!((x[0] - 1.0).abs() < 1e-6);
        assert!((x[1] - 2.0).abs() < 1e-6);
        assert!((x[2] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn reports_non_convergence_within_budget() {
        // A deliberately tiny iteration budget on a nontrivial system.
        let diag = [1.0, 100.0, 0.5, 7.0];
        let b = [1.0, 1.0, 1.0, 1.0];
        let (_x, converged) = solve(
            4,
            1e-12,
            0,
            |p| p.iter().zip(diag).map(|(v, d)| v * d).collect(),
            &b,
        );
        assert!(!converged);
    }
}
