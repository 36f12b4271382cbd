//! Direct solvers for square linear systems: Gaussian elimination,
//! Cramer's rule, and the inverse-matrix method, plus the determinant
//! and Gauss-Jordan inverse they are built on.

use crate::error::NumError;
use ndarray::{Array1, Array2};

pub(crate) fn check_square(a: &Array2<f64>, b: &Array1<f64>) -> Result<usize, NumError> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(NumError::DimensionMismatch(format!(
            "matrix is {}x{}",
            n,
            a.ncols()
        )));
    }
    if b.len() != n {
        return Err(NumError::DimensionMismatch(format!(
            "matrix is {}x{} but right-hand side has {} entries",
            n,
            n,
            b.len()
        )));
    }
    if n == 0 {
        return Err(NumError::DimensionMismatch("empty system".to_string()));
    }
    Ok(n)
}

/// Index of the largest-magnitude pivot candidate in column `col`, at or
/// below the diagonal.
fn pivot_row(a: &Array2<f64>, col: usize) -> usize {
    let mut p = col;
    for j in (col + 1)..a.nrows() {
        if a[[j, col]].abs() > a[[p, col]].abs() {
            p = j;
        }
    }
    p
}

fn swap_rows(a: &mut Array2<f64>, i: usize, j: usize) {
    for k in 0..a.ncols() {
        a.swap([i, k], [j, k]);
    }
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting and
/// back substitution.
///
/// # Examples
///
/// ```
/// use ndarray::{arr1, arr2};
/// use numlab::linear::solve_gauss;
///
/// let a = arr2(&[[2.0, 1.0], [1.0, 3.0]]);
/// let x = solve_gauss(&a, &arr1(&[3.0, 5.0])).unwrap();
/// assert!((x[0] - 0.8).abs() < 1e-12 && (x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn solve_gauss(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, NumError> {
    let n = check_square(a, b)?;
    let mut a = a.clone();
    let mut b = b.clone();

    for i in 0..n {
        let p = pivot_row(&a, i);
        if a[[p, i]] == 0.0 {
            return Err(NumError::SingularMatrix);
        }
        if p != i {
            swap_rows(&mut a, i, p);
            b.swap(i, p);
        }

        let pivot = a[[i, i]];
        for k in i..n {
            a[[i, k]] /= pivot;
        }
        b[i] /= pivot;

        for j in (i + 1)..n {
            let factor = a[[j, i]];
            if factor != 0.0 {
                for k in i..n {
                    let lead = a[[i, k]];
                    a[[j, k]] -= factor * lead;
                }
                let lead = b[i];
                b[j] -= factor * lead;
            }
        }
    }

    // diagonal is normalized to one, so back substitution is a plain sum
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut s = b[i];
        for k in (i + 1)..n {
            s -= a[[i, k]] * x[k];
        }
        x[i] = s;
    }
    Ok(x)
}

/// Determinant by elimination, tracking the sign of row swaps.
pub fn determinant(a: &Array2<f64>) -> Result<f64, NumError> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(NumError::DimensionMismatch(format!(
            "matrix is {}x{}",
            n,
            a.ncols()
        )));
    }
    let mut m = a.clone();
    let mut det = 1.0;

    for i in 0..n {
        let p = pivot_row(&m, i);
        if m[[p, i]] == 0.0 {
            return Ok(0.0);
        }
        if p != i {
            swap_rows(&mut m, i, p);
            det = -det;
        }
        det *= m[[i, i]];
        for j in (i + 1)..n {
            let factor = m[[j, i]] / m[[i, i]];
            if factor != 0.0 {
                for k in i..n {
                    let lead = m[[i, k]];
                    m[[j, k]] -= factor * lead;
                }
            }
        }
    }
    Ok(det)
}

/// Matrix inverse by Gauss-Jordan elimination on `[A | I]`.
pub fn invert(a: &Array2<f64>) -> Result<Array2<f64>, NumError> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(NumError::DimensionMismatch(format!(
            "matrix is {}x{}",
            n,
            a.ncols()
        )));
    }
    if n == 0 {
        return Err(NumError::DimensionMismatch("empty matrix".to_string()));
    }
    let mut m = a.clone();
    let mut inv: Array2<f64> = Array2::eye(n);

    for i in 0..n {
        let p = pivot_row(&m, i);
        if m[[p, i]] == 0.0 {
            return Err(NumError::SingularMatrix);
        }
        if p != i {
            swap_rows(&mut m, i, p);
            swap_rows(&mut inv, i, p);
        }

        let pivot = m[[i, i]];
        for k in 0..n {
            m[[i, k]] /= pivot;
            inv[[i, k]] /= pivot;
        }

        for j in 0..n {
            if j == i {
                continue;
            }
            let factor = m[[j, i]];
            if factor != 0.0 {
                for k in 0..n {
                    let lead = m[[i, k]];
                    m[[j, k]] -= factor * lead;
                    let lead = inv[[i, k]];
                    inv[[j, k]] -= factor * lead;
                }
            }
        }
    }
    Ok(inv)
}

/// Cramer's rule: `x_i = det(A_i) / det(A)` with the i-th column
/// replaced by `b`. Cubic cost per unknown; kept for its textbook value,
/// not its efficiency.
pub fn solve_cramer(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, NumError> {
    let n = check_square(a, b)?;
    let det = determinant(a)?;
    if det == 0.0 {
        return Err(NumError::SingularMatrix);
    }

    let mut x = Array1::zeros(n);
    for i in 0..n {
        let mut ai = a.clone();
        ai.column_mut(i).assign(b);
        x[i] = determinant(&ai)? / det;
    }
    Ok(x)
}

/// Inverse-matrix method: `x = A^{-1} b`.
pub fn solve_inverse(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, NumError> {
    check_square(a, b)?;
    Ok(invert(a)?.dot(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_rel;
    use ndarray::{arr1, arr2};

    fn sample_system() -> (Array2<f64>, Array1<f64>) {
        (
            arr2(&[[8.0, 5.0, -2.0], [3.0, 3.0, -3.0], [4.0, -5.0, -1.0]]),
            arr1(&[2.0, 0.0, 1.0]),
        )
    }

    fn assert_solves(a: &Array2<f64>, b: &Array1<f64>, x: &Array1<f64>) {
        let r = a.dot(x) - b;
        for v in r.iter() {
            assert!(v.abs() < 1e-10, "residual {:?}", r);
        }
    }

    #[test]
    fn test_gauss_solves_sample() {
        let (a, b) = sample_system();
        let x = solve_gauss(&a, &b).unwrap();
        assert_solves(&a, &b, &x);
    }

    #[test]
    fn test_cramer_matches_gauss() {
        let (a, b) = sample_system();
        let g = solve_gauss(&a, &b).unwrap();
        let c = solve_cramer(&a, &b).unwrap();
        for (u, v) in g.iter().zip(c.iter()) {
            test_rel(*u, *v, 1e-10);
        }
    }

    #[test]
    fn test_inverse_method_matches_gauss() {
        let (a, b) = sample_system();
        let g = solve_gauss(&a, &b).unwrap();
        let inv = solve_inverse(&a, &b).unwrap();
        for (u, v) in g.iter().zip(inv.iter()) {
            test_rel(*u, *v, 1e-10);
        }
    }

    #[test]
    fn test_determinant_2x2() {
        let a = arr2(&[[3.0, 7.0], [1.0, -4.0]]);
        test_rel(determinant(&a).unwrap(), -19.0, 1e-13);
    }

    #[test]
    fn test_determinant_with_zero_leading_pivot() {
        // forces a row swap on the first column
        let a = arr2(&[[0.0, 2.0], [1.0, 5.0]]);
        test_rel(determinant(&a).unwrap(), -2.0, 1e-13);
        let x = solve_gauss(&a, &arr1(&[4.0, 7.0])).unwrap();
        assert_solves(&a, &arr1(&[4.0, 7.0]), &x);
    }

    #[test]
    fn test_invert_round_trip() {
        let (a, _) = sample_system();
        let inv = invert(&a).unwrap();
        let prod = a.dot(&inv);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((prod[[i, j]] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_singular_matrix_rejected() {
        let a = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        let b = arr1(&[1.0, 2.0]);
        assert_eq!(solve_gauss(&a, &b).unwrap_err(), NumError::SingularMatrix);
        assert_eq!(solve_cramer(&a, &b).unwrap_err(), NumError::SingularMatrix);
        assert_eq!(invert(&a).unwrap_err(), NumError::SingularMatrix);
        test_rel(determinant(&a).unwrap(), 0.0, 1e-13);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        assert!(matches!(
            solve_gauss(&a, &arr1(&[1.0, 2.0, 3.0])).unwrap_err(),
            NumError::DimensionMismatch(_)
        ));
    }
}
