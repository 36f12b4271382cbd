//! Polynomial least-squares fitting via the normal equations, plus the
//! usual fit-quality metrics.

use crate::error::NumError;
use crate::linear::solve_gauss;
use ndarray::{Array1, Array2};

/// Dense polynomial with coefficients stored in ascending order:
/// `coeffs[k]` multiplies `x^k`.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(coeffs: Vec<f64>) -> Polynomial {
        let coeffs = if coeffs.is_empty() { vec![0.0] } else { coeffs };
        Polynomial { coeffs }
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Horner evaluation.
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }
}

/// Fit a polynomial of the given degree to `(xs, ys)` by least squares.
///
/// Builds the power-sum moment matrix `sum x^(i+j)` and right-hand side
/// `sum y*x^i`, then solves the normal equations. Needs strictly more
/// points than the degree.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Polynomial, NumError> {
    if xs.len() != ys.len() {
        return Err(NumError::DimensionMismatch(format!(
            "{} x values for {} y values",
            xs.len(),
            ys.len()
        )));
    }
    let m = degree + 1;
    if xs.len() < m {
        return Err(NumError::NotEnoughPoints);
    }

    let mut moments = vec![0.0; 2 * degree + 1];
    let mut rhs = vec![0.0; m];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut p = 1.0;
        for k in 0..moments.len() {
            moments[k] += p;
            if k < m {
                rhs[k] += y * p;
            }
            p *= x;
        }
    }

    let mut a = Array2::zeros((m, m));
    for i in 0..m {
        for j in 0..m {
            a[[i, j]] = moments[i + j];
        }
    }
    let coeffs = solve_gauss(&a, &Array1::from(rhs))?;
    Ok(Polynomial {
        coeffs: coeffs.to_vec(),
    })
}

/// Mean squared error of the fit over the given points.
pub fn mse(p: &Polynomial, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.is_empty() {
        return 0.0;
    }
    let sum: f64 = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| (p.eval(x) - y).powi(2))
        .sum();
    sum / xs.len() as f64
}

/// Mean absolute error of the fit over the given points.
pub fn mae(p: &Polynomial, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.is_empty() {
        return 0.0;
    }
    let sum: f64 = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| (p.eval(x) - y).abs())
        .sum();
    sum / xs.len() as f64
}
