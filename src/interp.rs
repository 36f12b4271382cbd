//! Lagrange interpolation: the classic double-product form, and a
//! barycentric interpolant that precomputes its weights for repeated
//! evaluation.

use crate::error::NumError;

fn check_nodes(xs: &[f64], ys: &[f64]) -> Result<(), NumError> {
    if xs.len() != ys.len() {
        return Err(NumError::DimensionMismatch(format!(
            "{} nodes for {} values",
            xs.len(),
            ys.len()
        )));
    }
    if xs.is_empty() {
        return Err(NumError::NotEnoughPoints);
    }
    for i in 0..xs.len() {
        for j in (i + 1)..xs.len() {
            if xs[i] == xs[j] {
                return Err(NumError::DuplicateNodes);
            }
        }
    }
    Ok(())
}

/// Evaluate the Lagrange interpolating polynomial through `(xs, ys)` at
/// `x`, using the direct double-product formula.
///
/// # Examples
///
/// ```
/// use numlab::interp::lagrange_value;
///
/// // the parabola through three of its own points
/// let y = lagrange_value(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0], 1.5).unwrap();
/// assert!((y - 2.25).abs() < 1e-12);
/// ```
pub fn lagrange_value(xs: &[f64], ys: &[f64], x: f64) -> Result<f64, NumError> {
    check_nodes(xs, ys)?;
    let n = xs.len();
    let mut result = 0.0;
    for i in 0..n {
        let mut term = 1.0;
        for j in 0..n {
            if i != j {
                term *= (x - xs[j]) / (xs[i] - xs[j]);
            }
        }
        result += ys[i] * term;
    }
    Ok(result)
}

/// Lagrange interpolant in barycentric form.
///
/// Weights `w_i = 1 / prod_{j != i} (x_i - x_j)` are computed once, so
/// each evaluation costs one pass over the nodes instead of the direct
/// form's quadratic product.
#[derive(Debug)]
pub struct LagrangeInterpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
    weights: Vec<f64>,
}

impl LagrangeInterpolant {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<LagrangeInterpolant, NumError> {
        check_nodes(&xs, &ys)?;
        let n = xs.len();
        let mut weights = vec![1.0; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    weights[i] /= xs[i] - xs[j];
                }
            }
        }
        Ok(LagrangeInterpolant { xs, ys, weights })
    }

    pub fn nodes(&self) -> &[f64] {
        &self.xs
    }

    /// Interpolated value at `x`; exact at the nodes, where the
    /// barycentric quotient itself would divide by zero.
    pub fn value(&self, x: f64) -> f64 {
        for (i, &xi) in self.xs.iter().enumerate() {
            if x == xi {
                return self.ys[i];
            }
        }
        let mut num = 0.0;
        let mut den = 0.0;
        for i in 0..self.xs.len() {
            let q = self.weights[i] / (x - self.xs[i]);
            num += q * self.ys[i];
            den += q;
        }
        num / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_rel;

    fn cubic_points() -> (Vec<f64>, Vec<f64>) {
        let xs = vec![-1.0, 0.0, 1.0, 2.0];
        let ys = xs.iter().map(|&x| x * x * x - 2.0 * x + 1.0).collect();
        (xs, ys)
    }

    #[test]
    fn test_direct_form_reproduces_cubic() {
        let (xs, ys) = cubic_points();
        for &x in &[-0.5, 0.25, 1.7] {
            let expected = x * x * x - 2.0 * x + 1.0;
            test_rel(lagrange_value(&xs, &ys, x).unwrap(), expected, 1e-12);
        }
    }

    #[test]
    fn test_direct_form_exact_at_nodes() {
        let (xs, ys) = cubic_points();
        for (&x, &y) in xs.iter().zip(&ys) {
            test_rel(lagrange_value(&xs, &ys, x).unwrap(), y, 1e-13);
        }
    }

    #[test]
    fn test_barycentric_matches_direct_form() {
        let (xs, ys) = cubic_points();
        let interp = LagrangeInterpolant::new(xs.clone(), ys.clone()).unwrap();
        for &x in &[-0.9, 0.1, 0.5, 1.99] {
            test_rel(
                interp.value(x),
                lagrange_value(&xs, &ys, x).unwrap(),
                1e-11,
            );
        }
    }

    #[test]
    fn test_barycentric_exact_at_nodes() {
        let (xs, ys) = cubic_points();
        let interp = LagrangeInterpolant::new(xs, ys.clone()).unwrap();
        for (i, &y) in ys.iter().enumerate() {
            assert_eq!(interp.value(interp.nodes()[i]), y);
        }
    }

    #[test]
    fn test_single_node_is_constant() {
        let interp = LagrangeInterpolant::new(vec![2.0], vec![7.0]).unwrap();
        assert_eq!(interp.value(100.0), 7.0);
        test_rel(lagrange_value(&[2.0], &[7.0], -3.0).unwrap(), 7.0, 1e-15);
    }

    #[test]
    fn test_duplicate_nodes_rejected() {
        assert_eq!(
            lagrange_value(&[1.0, 1.0], &[2.0, 3.0], 0.5).unwrap_err(),
            NumError::DuplicateNodes
        );
        assert_eq!(
            LagrangeInterpolant::new(vec![0.0, 1.0, 0.0], vec![1.0, 2.0, 3.0]).unwrap_err(),
            NumError::DuplicateNodes
        );
    }

    #[test]
    fn test_empty_nodes_rejected() {
        assert_eq!(
            lagrange_value(&[], &[], 1.0).unwrap_err(),
            NumError::NotEnoughPoints
        );
    }
}
