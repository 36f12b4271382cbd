use log::warn;
use ndarray::Array1;

/// Estimates of one definite integral as computed by each of the six
/// quadrature rules. Produced by [`crate::quad::integrate_all`];
/// immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadratureReport {
    pub rect_left: f64,
    pub rect_right: f64,
    pub rect_mid: f64,
    pub trapezoid: f64,
    pub simpson: f64,
    pub gauss: f64,
}

impl QuadratureReport {
    /// Name/value pairs in the fixed presentation order.
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("rect_left", self.rect_left),
            ("rect_right", self.rect_right),
            ("rect_mid", self.rect_mid),
            ("trapezoid", self.trapezoid),
            ("simpson", self.simpson),
            ("gauss", self.gauss),
        ]
    }
}

/// Result of a scalar root search.
#[derive(Clone, Copy, Debug)]
pub struct RootResult<T> {
    /// Final approximation of the root.
    pub root: T,
    /// Iterations actually performed.
    pub iterations: usize,
    /// `f` at the root, or the size of the last correction for
    /// fixed-point iteration.
    pub residual: T,
}

/// Result of a vector-valued solve.
#[derive(Clone, Debug)]
pub struct VectorSolution {
    pub x: Array1<f64>,
    pub iterations: usize,
    /// `||A·x - b||_2` for linear solvers, `max|f_i(x)|` for nonlinear
    /// systems.
    pub residual: f64,
    /// False when the iteration cap ran out first; the last iterate is
    /// still returned.
    pub converged: bool,
}

impl VectorSolution {
    pub(crate) fn warn_not_converged(&self, method: &str) {
        if !self.converged {
            warn!(
                "{}: tolerance not reached after {} iterations (residual {:e})",
                method, self.iterations, self.residual
            );
        }
    }
}
