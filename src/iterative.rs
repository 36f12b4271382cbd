//! Iterative solvers for square linear systems: Jacobi and Gauss-Seidel.
//!
//! Both stop when the largest componentwise change drops below `eps`.
//! When the iteration cap runs out first they return the last iterate
//! with `converged: false` and log a warning, rather than failing — the
//! partial answer is still informative for diagnosing a system that is
//! not diagonally dominant.

use crate::error::NumError;
use crate::linear::check_square;
use crate::result::VectorSolution;
use ndarray::{Array1, Array2};

fn residual_norm(a: &Array2<f64>, b: &Array1<f64>, x: &Array1<f64>) -> f64 {
    let r = a.dot(x) - b;
    r.iter().map(|v| v * v).sum::<f64>().sqrt()
}

fn prepare(
    a: &Array2<f64>,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
    eps: f64,
) -> Result<(usize, Array1<f64>), NumError> {
    let n = check_square(a, b)?;
    if eps <= 0.0 {
        return Err(NumError::BadTolerance);
    }
    for i in 0..n {
        if a[[i, i]] == 0.0 {
            return Err(NumError::ZeroDiagonal(i));
        }
    }
    // starting from b when no initial guess is given, as the coursework
    // scripts did
    let x = match x0 {
        Some(v) => {
            if v.len() != n {
                return Err(NumError::DimensionMismatch(format!(
                    "initial guess has {} entries for a {}-unknown system",
                    v.len(),
                    n
                )));
            }
            v.clone()
        }
        None => b.clone(),
    };
    Ok((n, x))
}

/// Jacobi iteration: every component of the next iterate is computed
/// from the previous iterate.
pub fn jacobi(
    a: &Array2<f64>,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
    eps: f64,
    max_iter: usize,
) -> Result<VectorSolution, NumError> {
    let (n, mut x) = prepare(a, b, x0, eps)?;

    for k in 1..=max_iter {
        let mut next = Array1::zeros(n);
        for i in 0..n {
            let mut s = 0.0;
            for j in 0..n {
                if j != i {
                    s += a[[i, j]] * x[j];
                }
            }
            next[i] = (b[i] - s) / a[[i, i]];
        }
        let delta = next
            .iter()
            .zip(x.iter())
            .map(|(u, v)| (u - v).abs())
            .fold(0.0, f64::max);
        x = next;
        if delta < eps {
            return Ok(VectorSolution {
                residual: residual_norm(a, b, &x),
                x,
                iterations: k,
                converged: true,
            });
        }
    }

    let solution = VectorSolution {
        residual: residual_norm(a, b, &x),
        x,
        iterations: max_iter,
        converged: false,
    };
    solution.warn_not_converged("jacobi");
    Ok(solution)
}

/// Gauss-Seidel iteration: components are updated in place, so each one
/// already sees the fresh values computed before it this sweep.
pub fn gauss_seidel(
    a: &Array2<f64>,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
    eps: f64,
    max_iter: usize,
) -> Result<VectorSolution, NumError> {
    let (n, mut x) = prepare(a, b, x0, eps)?;

    for k in 1..=max_iter {
        let mut delta: f64 = 0.0;
        for i in 0..n {
            let mut s = 0.0;
            for j in 0..n {
                if j != i {
                    s += a[[i, j]] * x[j];
                }
            }
            let next = (b[i] - s) / a[[i, i]];
            delta = delta.max((next - x[i]).abs());
            x[i] = next;
        }
        if delta < eps {
            return Ok(VectorSolution {
                residual: residual_norm(a, b, &x),
                x,
                iterations: k,
                converged: true,
            });
        }
    }

    let solution = VectorSolution {
        residual: residual_norm(a, b, &x),
        x,
        iterations: max_iter,
        converged: false,
    };
    solution.warn_not_converged("gauss-seidel");
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::solve_gauss;
    use crate::test_utils::test_rel;
    use ndarray::{arr1, arr2};

    fn dominant_system() -> (Array2<f64>, Array1<f64>) {
        (
            arr2(&[[10.0, 1.0, 1.0], [2.0, 10.0, 1.0], [2.0, 2.0, 10.0]]),
            arr1(&[12.0, 13.0, 14.0]),
        )
    }

    #[test]
    fn test_jacobi_matches_direct_solver() {
        let (a, b) = dominant_system();
        let direct = solve_gauss(&a, &b).unwrap();
        let iter = jacobi(&a, &b, None, 1e-10, 1000).unwrap();
        assert!(iter.converged);
        for (u, v) in iter.x.iter().zip(direct.iter()) {
            test_rel(*u, *v, 1e-8);
        }
        assert!(iter.residual < 1e-8);
    }

    #[test]
    fn test_gauss_seidel_matches_direct_solver() {
        let (a, b) = dominant_system();
        let direct = solve_gauss(&a, &b).unwrap();
        let iter = gauss_seidel(&a, &b, None, 1e-10, 1000).unwrap();
        assert!(iter.converged);
        for (u, v) in iter.x.iter().zip(direct.iter()) {
            test_rel(*u, *v, 1e-8);
        }
    }

    #[test]
    fn test_seidel_needs_fewer_iterations() {
        let (a, b) = dominant_system();
        let j = jacobi(&a, &b, None, 1e-10, 1000).unwrap();
        let s = gauss_seidel(&a, &b, None, 1e-10, 1000).unwrap();
        assert!(s.iterations <= j.iterations);
    }

    #[test]
    fn test_initial_guess_is_honored() {
        let (a, b) = dominant_system();
        let exact = solve_gauss(&a, &b).unwrap();
        let warm = jacobi(&a, &b, Some(&exact), 1e-8, 100).unwrap();
        assert!(warm.converged);
        assert!(warm.iterations <= 2);
    }

    #[test]
    fn test_zero_diagonal_rejected() {
        let a = arr2(&[[0.0, 1.0], [1.0, 2.0]]);
        let b = arr1(&[1.0, 2.0]);
        assert_eq!(
            jacobi(&a, &b, None, 1e-6, 100).unwrap_err(),
            NumError::ZeroDiagonal(0)
        );
        assert_eq!(
            gauss_seidel(&a, &b, None, 1e-6, 100).unwrap_err(),
            NumError::ZeroDiagonal(0)
        );
    }

    #[test]
    fn test_exhausted_iterations_returns_last_iterate() {
        let (a, b) = dominant_system();
        let out = jacobi(&a, &b, None, 1e-14, 2).unwrap();
        assert!(!out.converged);
        assert_eq!(out.iterations, 2);
        assert!(out.x.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_bad_tolerance_rejected() {
        let (a, b) = dominant_system();
        assert_eq!(
            jacobi(&a, &b, None, -1.0, 10).unwrap_err(),
            NumError::BadTolerance
        );
    }
}
