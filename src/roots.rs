//! Root finding for scalar nonlinear equations: bisection, Newton,
//! chord (secant with a fixed end), and fixed-point iteration with the
//! contraction check.

use crate::error::NumError;
use crate::expr::Expr;
use crate::result::RootResult;
use num::Float;

/// Bisection over the bracket `[a, b]`, halving until the bracket is
/// shorter than `eps`. The function must change sign over the bracket.
///
/// # Examples
///
/// ```
/// use numlab::roots::bisection;
///
/// let r = bisection(|x: f64| x * x - 2.0, 0.0, 2.0, 1e-9).unwrap();
/// assert!((r.root - 2f64.sqrt()).abs() < 1e-8);
/// ```
pub fn bisection<T, F>(f: F, a: T, b: T, eps: T) -> Result<RootResult<T>, NumError>
where
    T: Float,
    F: Fn(T) -> T,
{
    if eps <= T::zero() {
        return Err(NumError::BadTolerance);
    }
    let half = T::from(0.5).unwrap();
    let (mut a, mut b) = (a, b);
    if f(a) * f(b) > T::zero() {
        return Err(NumError::NoSignChange);
    }

    let mut iterations = 0;
    while (b - a).abs() > eps {
        let mid = (a + b) * half;
        iterations += 1;
        if f(a) * f(mid) <= T::zero() {
            b = mid;
        } else {
            a = mid;
        }
    }

    let root = (a + b) * half;
    Ok(RootResult {
        root,
        iterations,
        residual: f(root),
    })
}

/// Newton's method: `x1 = x0 - f(x0)/f'(x0)` until the correction drops
/// below `eps`.
pub fn newton<T, F, D>(f: F, df: D, x0: T, eps: T, max_iter: usize) -> Result<RootResult<T>, NumError>
where
    T: Float,
    F: Fn(T) -> T,
    D: Fn(T) -> T,
{
    if eps <= T::zero() {
        return Err(NumError::BadTolerance);
    }
    let mut x = x0;
    for k in 1..=max_iter {
        let slope = df(x);
        if slope == T::zero() {
            return Err(NumError::VanishingDerivative);
        }
        let next = x - f(x) / slope;
        if (next - x).abs() < eps {
            return Ok(RootResult {
                root: next,
                iterations: k,
                residual: f(next),
            });
        }
        x = next;
    }
    Err(NumError::MaxIterations(max_iter))
}

/// Newton's method with the derivative obtained symbolically from the
/// expression, the way the desktop front ends differentiated their
/// inputs before iterating.
pub fn newton_symbolic(
    f: &Expr,
    var: &str,
    x0: f64,
    eps: f64,
    max_iter: usize,
) -> Result<RootResult<f64>, NumError> {
    if eps <= 0.0 {
        return Err(NumError::BadTolerance);
    }
    let df = f.diff(var)?;
    let mut x = x0;
    for k in 1..=max_iter {
        let slope = df.eval_at(var, x)?;
        if slope == 0.0 {
            return Err(NumError::VanishingDerivative);
        }
        let next = x - f.eval_at(var, x)? / slope;
        if (next - x).abs() < eps {
            return Ok(RootResult {
                root: next,
                iterations: k,
                residual: f.eval_at(var, next)?,
            });
        }
        x = next;
    }
    Err(NumError::MaxIterations(max_iter))
}

/// Chord method: secant update `x = b - f(b)(b - a)/(f(b) - f(a))` with
/// the bracket sliding along the iterates.
pub fn chord<T, F>(f: F, a: T, b: T, eps: T, max_iter: usize) -> Result<RootResult<T>, NumError>
where
    T: Float,
    F: Fn(T) -> T,
{
    if eps <= T::zero() {
        return Err(NumError::BadTolerance);
    }
    let (mut a, mut b) = (a, b);
    let mut prev = b;
    for k in 1..=max_iter {
        let denom = f(b) - f(a);
        if denom == T::zero() {
            return Err(NumError::VanishingDerivative);
        }
        let x = b - f(b) * (b - a) / denom;
        if (x - prev).abs() < eps {
            return Ok(RootResult {
                root: x,
                iterations: k,
                residual: f(x),
            });
        }
        a = b;
        b = x;
        prev = x;
    }
    Err(NumError::MaxIterations(max_iter))
}

/// Fixed-point iteration `x <- phi(x)`.
///
/// Rejected up front when `|phi'(x0)| >= 1`, since the iteration has no
/// contraction guarantee there; the offending slope is carried in the
/// error. The derivative of `phi` is obtained symbolically.
pub fn fixed_point(
    phi: &Expr,
    var: &str,
    x0: f64,
    eps: f64,
    max_iter: usize,
) -> Result<RootResult<f64>, NumError> {
    if eps <= 0.0 {
        return Err(NumError::BadTolerance);
    }
    let slope = phi.diff(var)?.eval_at(var, x0)?.abs();
    if slope >= 1.0 {
        return Err(NumError::ConvergenceNotGuaranteed(slope));
    }

    let mut x = x0;
    for k in 1..=max_iter {
        let next = phi.eval_at(var, x)?;
        if (next - x).abs() <= eps {
            return Ok(RootResult {
                root: next,
                iterations: k,
                residual: (next - x).abs(),
            });
        }
        x = next;
    }
    Err(NumError::MaxIterations(max_iter))
}
