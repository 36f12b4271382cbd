//! The six quadrature rules and the comparison engine that runs all of
//! them over one integrand.
//!
//! The rule functions are pure: deterministic, no side effects, usable
//! with plain closures. Fallible integrands (expression evaluation can
//! hit domain errors) enter through [`integrate_all`], which aborts the
//! whole comparison on the first failed sample.

use crate::error::NumError;
use crate::expr::{Context, Expr};
use crate::legendre;
use crate::parser::parse;
use crate::result::QuadratureReport;
use num::Float;
use std::cell::RefCell;

/// Highest Gauss-Legendre degree the engine will use; larger step-count
/// requests are capped here.
pub const MAX_GAUSS_DEGREE: usize = 90;

/// Left-rectangle rule: `h * sum f(a + i*h)` for `i = 0..n-1`.
///
/// All rule functions assume `n >= 1`; the engine rejects `n == 0`
/// before any rule runs.
///
/// # Examples
///
/// ```
/// use numlab::quad::rectangle_left;
///
/// let est = rectangle_left(|x: f64| x, 0.0, 1.0, 10);
/// assert!((est - 0.45).abs() < 1e-12);
/// ```
pub fn rectangle_left<T, F>(f: F, a: T, b: T, n: usize) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    let h = (b - a) / T::from(n).unwrap();
    let mut sum = T::zero();
    for i in 0..n {
        sum = sum + f(a + T::from(i).unwrap() * h);
    }
    sum * h
}

/// Right-rectangle rule: `h * sum f(a + (i+1)*h)`.
pub fn rectangle_right<T, F>(f: F, a: T, b: T, n: usize) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    let h = (b - a) / T::from(n).unwrap();
    let mut sum = T::zero();
    for i in 0..n {
        sum = sum + f(a + T::from(i + 1).unwrap() * h);
    }
    sum * h
}

/// Midpoint rule: `h * sum f(a + (i+0.5)*h)`.
pub fn rectangle_mid<T, F>(f: F, a: T, b: T, n: usize) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    let h = (b - a) / T::from(n).unwrap();
    let half = T::from(0.5).unwrap();
    let mut sum = T::zero();
    for i in 0..n {
        sum = sum + f(a + (T::from(i).unwrap() + half) * h);
    }
    sum * h
}

/// Composite trapezoid rule over `n + 1` equally spaced samples.
pub fn trapezoid<T, F>(f: F, a: T, b: T, n: usize) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    let h = (b - a) / T::from(n).unwrap();
    let mut sum = (f(a) + f(b)) * T::from(0.5).unwrap();
    for i in 1..n {
        sum = sum + f(a + T::from(i).unwrap() * h);
    }
    sum * h
}

/// Composite Simpson rule.
///
/// An odd `n` is silently incremented to the next even value before `h`
/// is computed, so the effective subdivision may differ from the request
/// by one. This matches the long-standing behavior callers rely on and
/// is deliberately left as is.
pub fn simpson<T, F>(f: F, a: T, b: T, n: usize) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    let n = if n % 2 != 0 { n + 1 } else { n };
    let h = (b - a) / T::from(n).unwrap();
    let mut sum = f(a) + f(b);
    for i in 1..n {
        let weight = if i % 2 == 1 { 4 } else { 2 };
        sum = sum + T::from(weight).unwrap() * f(a + T::from(i).unwrap() * h);
    }
    sum * h / T::from(3).unwrap()
}

/// Fixed-order Gauss-Legendre quadrature with degree `min(n, 90)`, via
/// the standard change of variables from `[-1, 1]` to `[a, b]`. Exact
/// for polynomials of degree `2*deg - 1`.
///
/// Node tables are computed and cached in `f64`, then converted to `T`.
pub fn gauss_legendre<T, F>(f: F, a: T, b: T, n: usize) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    let deg = n.min(MAX_GAUSS_DEGREE);
    let table = legendre::leggauss(deg);
    let half = T::from(0.5).unwrap();
    let width = b - a;
    let mut sum = T::zero();
    for (x, w) in table.0.iter().zip(table.1.iter()) {
        let t = half * (T::from(*x).unwrap() + T::one()) * width + a;
        sum = sum + T::from(*w).unwrap() * f(t);
    }
    half * width * sum
}

/// Run all six rules over the same fallible integrand and collect the
/// estimates under their fixed names.
///
/// The first evaluation failure aborts the whole comparison; no partial
/// results are returned. `n == 0` is rejected up front.
pub fn integrate_all<F>(f: F, a: f64, b: f64, n: usize) -> Result<QuadratureReport, NumError>
where
    F: Fn(f64) -> Result<f64, NumError>,
{
    if n == 0 {
        return Err(NumError::InvalidStepCount);
    }

    // The rule functions only understand pure closures, so the first
    // evaluation error is parked here and checked after each rule. The
    // NaN stand-in never escapes: `check` runs before a value is used.
    let failure: RefCell<Option<NumError>> = RefCell::new(None);
    let g = |x: f64| match f(x) {
        Ok(y) => y,
        Err(e) => {
            let mut slot = failure.borrow_mut();
            if slot.is_none() {
                *slot = Some(e);
            }
            f64::NAN
        }
    };
    let check = |value: f64| match failure.borrow_mut().take() {
        Some(e) => Err(e),
        None => Ok(value),
    };

    let rect_left = check(rectangle_left(&g, a, b, n))?;
    let rect_right = check(rectangle_right(&g, a, b, n))?;
    let rect_mid = check(rectangle_mid(&g, a, b, n))?;
    let trapezoid = check(trapezoid(&g, a, b, n))?;
    let simpson = check(simpson(&g, a, b, n))?;
    let gauss = check(gauss_legendre(&g, a, b, n))?;

    Ok(QuadratureReport {
        rect_left,
        rect_right,
        rect_mid,
        trapezoid,
        simpson,
        gauss,
    })
}

/// Compare all six rules over a parsed expression with `x` bound to the
/// integration variable.
pub fn integrate_expr(expr: &Expr, a: f64, b: f64, n: usize) -> Result<QuadratureReport, NumError> {
    let ctx = RefCell::new(Context::new());
    integrate_all(
        |x| {
            let mut ctx = ctx.borrow_mut();
            ctx.set("x", x);
            expr.eval(&ctx)
        },
        a,
        b,
        n,
    )
}

/// Parse `src` and compare all six rules over it — the engine-level
/// operation behind the original browser front end.
///
/// # Examples
///
/// ```
/// use numlab::quad::integrate_expression;
///
/// let report = integrate_expression("x^2", 0.0, 1.0, 1000).unwrap();
/// assert!((report.simpson - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn integrate_expression(
    src: &str,
    a: f64,
    b: f64,
    n: usize,
) -> Result<QuadratureReport, NumError> {
    let expr = parse(src)?;
    integrate_expr(&expr, a, b, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_rel;

    fn all_methods(f: impl Fn(f64) -> f64 + Copy, a: f64, b: f64, n: usize) -> [f64; 6] {
        [
            rectangle_left(f, a, b, n),
            rectangle_right(f, a, b, n),
            rectangle_mid(f, a, b, n),
            trapezoid(f, a, b, n),
            simpson(f, a, b, n),
            gauss_legendre(f, a, b, n),
        ]
    }

    #[test]
    fn test_constant_exact_on_all_methods() {
        for &c in &[1.0, -2.5, 7.25] {
            for est in &all_methods(move |_| c, -1.0, 3.0, 17) {
                test_rel(*est, c * 4.0, 1e-13);
            }
        }
    }

    #[test]
    fn test_linear_scenario() {
        // f(x) = x on [0, 1] with n = 10, the textbook comparison table
        let f = |x: f64| x;
        test_rel(rectangle_left(f, 0.0, 1.0, 10), 0.45, 1e-12);
        test_rel(rectangle_right(f, 0.0, 1.0, 10), 0.55, 1e-12);
        test_rel(rectangle_mid(f, 0.0, 1.0, 10), 0.5, 1e-12);
        test_rel(trapezoid(f, 0.0, 1.0, 10), 0.5, 1e-12);
        test_rel(simpson(f, 0.0, 1.0, 10), 0.5, 1e-12);
        test_rel(gauss_legendre(f, 0.0, 1.0, 10), 0.5, 1e-12);
    }

    #[test]
    fn test_trapezoid_exact_on_linear_for_any_n() {
        for &n in &[1, 2, 3, 7, 100] {
            test_rel(trapezoid(|x: f64| 3.0 * x - 1.0, 0.0, 2.0, n), 4.0, 1e-12);
        }
    }

    #[test]
    fn test_simpson_exact_on_cubic() {
        // integral of x^3 - x over [0, 2] is 2
        for &n in &[2, 4, 10, 50] {
            test_rel(simpson(|x: f64| x * x * x - x, 0.0, 2.0, n), 2.0, 1e-12);
        }
    }

    #[test]
    fn test_simpson_odd_n_matches_next_even() {
        let f = |x: f64| (x + 1.0).ln() * x;
        for &n in &[1usize, 7, 99] {
            let odd = simpson(f, 0.5, 2.5, n);
            let even = simpson(f, 0.5, 2.5, n + 1);
            assert_eq!(odd.to_bits(), even.to_bits());
        }
    }

    #[test]
    fn test_gauss_exact_up_to_degree_2d_minus_1() {
        // degree 3 integrates x^5 exactly: integral over [0, 1] is 1/6
        test_rel(gauss_legendre(|x: f64| x.powi(5), 0.0, 1.0, 3), 1.0 / 6.0, 1e-13);
        // degree 2 integrates x^3 exactly: integral over [0, 2] is 4
        test_rel(gauss_legendre(|x: f64| x.powi(3), 0.0, 2.0, 2), 4.0, 1e-13);
    }

    #[test]
    fn test_gauss_degree_cap() {
        // above the cap the rule degenerates to degree 90, so the two
        // requests must agree exactly
        let f = |x: f64| (x * x).sin();
        let capped = gauss_legendre(f, 0.0, 3.0, 500);
        let at_cap = gauss_legendre(f, 0.0, 3.0, MAX_GAUSS_DEGREE);
        assert_eq!(capped.to_bits(), at_cap.to_bits());
    }

    #[test]
    fn test_convergence_orders_on_x_squared() {
        let f = |x: f64| x * x;
        let exact = 1.0 / 3.0;
        let err = |est: f64| (est - exact).abs();

        let mut prev_mid = f64::MAX;
        let mut prev_trap = f64::MAX;
        for &n in &[10, 100, 1000] {
            let e_mid = err(rectangle_mid(f, 0.0, 1.0, n));
            let e_trap = err(trapezoid(f, 0.0, 1.0, n));
            assert!(e_mid < prev_mid && e_trap < prev_trap);
            // one decade in n is two decades in error for both rules
            if prev_mid != f64::MAX {
                assert!(prev_mid / e_mid > 50.0);
                assert!(prev_trap / e_trap > 50.0);
            }
            prev_mid = e_mid;
            prev_trap = e_trap;
            // Simpson is exact on quadratics up to roundoff
            assert!(err(simpson(f, 0.0, 1.0, n)) < 1e-12);
        }
    }

    #[test]
    fn test_simpson_fourth_order_on_quartic() {
        let f = |x: f64| x.powi(4);
        let exact = 0.2;
        let e10 = (simpson(f, 0.0, 1.0, 10) - exact).abs();
        let e20 = (simpson(f, 0.0, 1.0, 20) - exact).abs();
        // halving h divides the error by about 16
        assert!(e10 / e20 > 12.0 && e10 / e20 < 20.0);
    }

    #[test]
    fn test_sine_over_half_period() {
        for est in &all_methods(|x: f64| x.sin(), 0.0, std::f64::consts::PI, 1000) {
            test_rel(*est, 2.0, 1e-3);
        }
    }

    #[test]
    fn test_reversed_interval_flips_sign() {
        let f = |x: f64| x * x;
        for &n in &[10, 11] {
            test_rel(
                simpson(f, 1.0, 0.0, n) + simpson(f, 0.0, 1.0, n),
                0.0,
                1e-14,
            );
            test_rel(
                gauss_legendre(f, 1.0, 0.0, n) + gauss_legendre(f, 0.0, 1.0, n),
                0.0,
                1e-14,
            );
        }
    }

    #[test]
    fn test_degenerate_interval_is_zero() {
        let report = integrate_expression("1/x", 2.0, 2.0, 10).unwrap();
        for (_, value) in report.entries().iter() {
            assert_eq!(*value, 0.0);
        }
    }

    #[test]
    fn test_engine_rejects_zero_steps() {
        assert_eq!(
            integrate_expression("x", 0.0, 1.0, 0),
            Err(NumError::InvalidStepCount)
        );
    }

    #[test]
    fn test_engine_aborts_on_domain_error() {
        // ln is sampled at negative points over [-1, 1]
        assert!(matches!(
            integrate_expression("ln(x)", -1.0, 1.0, 10),
            Err(NumError::EvalFailure(_))
        ));
    }

    #[test]
    fn test_engine_report_keys() {
        let report = integrate_expression("x", 0.0, 1.0, 10).unwrap();
        let names: Vec<&str> = report.entries().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec!["rect_left", "rect_right", "rect_mid", "trapezoid", "simpson", "gauss"]
        );
        test_rel(report.rect_left, 0.45, 1e-12);
        test_rel(report.gauss, 0.5, 1e-12);
    }

    #[test]
    fn test_engine_matches_direct_calls() {
        let report = integrate_expression("sin(x)", 0.0, 2.0, 40).unwrap();
        test_rel(report.trapezoid, trapezoid(|x: f64| x.sin(), 0.0, 2.0, 40), 1e-15);
        test_rel(report.simpson, simpson(|x: f64| x.sin(), 0.0, 2.0, 40), 1e-15);
    }
}
