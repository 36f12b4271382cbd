//! Solvers for square systems of nonlinear equations.
//!
//! Newton's method differentiates the equations symbolically, so the
//! Jacobian is exact rather than finite-differenced; the two fixed-point
//! schemes iterate user-supplied update functions either from the old
//! iterate (simple) or reusing components as they are computed (Seidel).

use crate::error::NumError;
use crate::expr::{Context, Expr};
use crate::linear::solve_gauss;
use crate::result::VectorSolution;
use log::debug;
use ndarray::{Array1, Array2};

/// Update scheme for [`fixed_point_system`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IterationScheme {
    /// Every component of the next iterate comes from the previous one.
    Simple,
    /// Components are written back immediately, Gauss-Seidel style.
    Seidel,
}

/// A square system `f_i(x_1..x_n) = 0`.
pub struct NonlinearSystem {
    funcs: Vec<Expr>,
    vars: Vec<String>,
}

impl NonlinearSystem {
    pub fn new(funcs: Vec<Expr>, vars: &[&str]) -> Result<NonlinearSystem, NumError> {
        if funcs.is_empty() || funcs.len() != vars.len() {
            return Err(NumError::DimensionMismatch(format!(
                "{} equations for {} variables",
                funcs.len(),
                vars.len()
            )));
        }
        Ok(NonlinearSystem {
            funcs,
            vars: vars.iter().map(|v| v.to_string()).collect(),
        })
    }

    fn bind(&self, ctx: &mut Context, x: &Array1<f64>) {
        for (name, value) in self.vars.iter().zip(x.iter()) {
            ctx.set(name, *value);
        }
    }

    fn residual(&self, ctx: &Context) -> Result<Array1<f64>, NumError> {
        let mut r = Array1::zeros(self.funcs.len());
        for (i, f) in self.funcs.iter().enumerate() {
            r[i] = f.eval(ctx)?;
        }
        Ok(r)
    }

    /// Multivariate Newton iteration from `x0`.
    ///
    /// Each step solves `J(x)·delta = F(x)` by Gaussian elimination and
    /// takes `x - delta`; convergence is judged on the infinity norm of
    /// the step. A singular Jacobian surfaces as [`NumError::SingularMatrix`].
    pub fn newton(
        &self,
        x0: &[f64],
        eps: f64,
        max_iter: usize,
    ) -> Result<VectorSolution, NumError> {
        let n = self.funcs.len();
        if x0.len() != n {
            return Err(NumError::DimensionMismatch(format!(
                "start point has {} entries for a {}-unknown system",
                x0.len(),
                n
            )));
        }
        if eps <= 0.0 {
            return Err(NumError::BadTolerance);
        }

        // symbolic Jacobian, one derivative per equation/variable pair
        let mut jac: Vec<Vec<Expr>> = Vec::with_capacity(n);
        for f in &self.funcs {
            let mut row = Vec::with_capacity(n);
            for v in &self.vars {
                row.push(f.diff(v)?);
            }
            jac.push(row);
        }

        let mut x = Array1::from(x0.to_vec());
        let mut ctx = Context::new();
        for k in 1..=max_iter {
            self.bind(&mut ctx, &x);
            let fval = self.residual(&ctx)?;
            let mut jval = Array2::zeros((n, n));
            for i in 0..n {
                for j in 0..n {
                    jval[[i, j]] = jac[i][j].eval(&ctx)?;
                }
            }

            let delta = solve_gauss(&jval, &fval)?;
            x = &x - &delta;
            let step = delta.iter().fold(0.0f64, |m, v| m.max(v.abs()));
            debug!("newton step {}: x = {}, step = {:e}", k, x, step);

            if step < eps {
                self.bind(&mut ctx, &x);
                let r = self.residual(&ctx)?;
                let residual = r.iter().fold(0.0f64, |m, v| m.max(v.abs()));
                return Ok(VectorSolution {
                    x,
                    iterations: k,
                    residual,
                    converged: true,
                });
            }
        }
        Err(NumError::MaxIterations(max_iter))
    }
}

/// Fixed-point iteration `x <- phi(x)` on a system, with the chosen
/// update scheme. Convergence is judged on the infinity norm of the
/// change; the residual reported is `max|phi_i(x) - x_i|`.
pub fn fixed_point_system(
    phi: &[Expr],
    vars: &[&str],
    x0: &[f64],
    eps: f64,
    max_iter: usize,
    scheme: IterationScheme,
) -> Result<VectorSolution, NumError> {
    let n = phi.len();
    if n == 0 || vars.len() != n || x0.len() != n {
        return Err(NumError::DimensionMismatch(format!(
            "{} update functions, {} variables, {} start values",
            n,
            vars.len(),
            x0.len()
        )));
    }
    if eps <= 0.0 {
        return Err(NumError::BadTolerance);
    }

    let mut x = Array1::from(x0.to_vec());
    let mut ctx = Context::new();
    for k in 1..=max_iter {
        let old = x.clone();
        match scheme {
            IterationScheme::Simple => {
                for (name, value) in vars.iter().zip(old.iter()) {
                    ctx.set(name, *value);
                }
                let mut next = Array1::zeros(n);
                for i in 0..n {
                    next[i] = phi[i].eval(&ctx)?;
                }
                x = next;
            }
            IterationScheme::Seidel => {
                for i in 0..n {
                    for (name, value) in vars.iter().zip(x.iter()) {
                        ctx.set(name, *value);
                    }
                    x[i] = phi[i].eval(&ctx)?;
                }
            }
        }

        let step = x
            .iter()
            .zip(old.iter())
            .map(|(u, v)| (u - v).abs())
            .fold(0.0f64, f64::max);
        debug!("{:?} step {}: x = {}, step = {:e}", scheme, k, x, step);

        if step < eps {
            for (name, value) in vars.iter().zip(x.iter()) {
                ctx.set(name, *value);
            }
            let mut residual: f64 = 0.0;
            for i in 0..n {
                residual = residual.max((phi[i].eval(&ctx)? - x[i]).abs());
            }
            return Ok(VectorSolution {
                x,
                iterations: k,
                residual,
                converged: true,
            });
        }
    }
    Err(NumError::MaxIterations(max_iter))
}
