//! Numerical differentiation by central difference, with a report that
//! checks the estimate against the symbolically exact derivative.

use crate::error::NumError;
use crate::expr::Expr;

/// Step used by [`derivative_check`].
pub const DEFAULT_STEP: f64 = 1e-5;

/// Symmetric difference quotient `(f(x+h) - f(x-h)) / 2h`.
pub fn central_difference<F>(f: F, x: f64, h: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// A central-difference estimate side by side with the exact value.
#[derive(Clone, Debug)]
pub struct DerivativeCheck {
    /// Symbolic derivative of the input expression.
    pub symbolic: Expr,
    /// Central-difference estimate at the point.
    pub numeric: f64,
    /// The symbolic derivative evaluated at the point.
    pub exact: f64,
    /// `|numeric - exact|`.
    pub abs_error: f64,
}

/// Differentiate `f` at `x` both numerically and symbolically.
pub fn derivative_check(f: &Expr, var: &str, x: f64) -> Result<DerivativeCheck, NumError> {
    let h = DEFAULT_STEP;
    let numeric = (f.eval_at(var, x + h)? - f.eval_at(var, x - h)?) / (2.0 * h);
    let symbolic = f.diff(var)?;
    let exact = symbolic.eval_at(var, x)?;
    Ok(DerivativeCheck {
        abs_error: (numeric - exact).abs(),
        symbolic,
        numeric,
        exact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::test_utils::test_rel;

    #[test]
    fn test_central_difference_on_sine() {
        let d = central_difference(|x: f64| x.sin(), 0.0, 1e-6);
        test_rel(d, 1.0, 1e-9);
    }

    #[test]
    fn test_check_on_cubic() {
        let f = parse("x^3").unwrap();
        let check = derivative_check(&f, "x", 2.0).unwrap();
        test_rel(check.exact, 12.0, 1e-12);
        test_rel(check.numeric, 12.0, 1e-8);
        assert!(check.abs_error < 1e-8);
    }

    #[test]
    fn test_check_reports_symbolic_form() {
        let f = parse("sin(x)").unwrap();
        let check = derivative_check(&f, "x", 0.3).unwrap();
        // the symbolic derivative must itself be cos
        test_rel(
            check.symbolic.eval_at("x", 1.1).unwrap(),
            1.1f64.cos(),
            1e-14,
        );
        test_rel(check.exact, 0.3f64.cos(), 1e-14);
    }

    #[test]
    fn test_check_propagates_domain_error() {
        // sampling ln below zero: x - h goes negative
        let f = parse("ln(x)").unwrap();
        assert!(matches!(
            derivative_check(&f, "x", 5e-6),
            Err(NumError::EvalFailure(_))
        ));
    }

    #[test]
    fn test_check_propagates_non_differentiable() {
        let f = parse("abs(x)").unwrap();
        assert_eq!(
            derivative_check(&f, "x", 2.0).unwrap_err(),
            NumError::NotDifferentiable("abs")
        );
    }
}
